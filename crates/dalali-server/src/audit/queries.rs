//! Database queries for audit logs

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::models::{
    AuditEntry, AuditQuery, CreateAuditEntry, ResourceType, DEFAULT_AUDIT_QUERY_LIMIT,
    MAX_AUDIT_QUERY_LIMIT,
};
use crate::error::ServerResult;

const AUDIT_COLUMNS: &str = "id, user_id, action, resource_type, resource_id, \
                             changes, ip_address, user_agent, timestamp, metadata";

pub async fn create_audit_entry(
    pool: &PgPool,
    entry: CreateAuditEntry,
) -> ServerResult<AuditEntry> {
    let sql = format!(
        "INSERT INTO audit_log (user_id, action, resource_type, resource_id, \
         changes, ip_address, user_agent, metadata) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
        AUDIT_COLUMNS
    );
    let record = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(entry.resource_type.as_str())
        .bind(entry.resource_id)
        .bind(&entry.changes)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.metadata)
        .fetch_one(pool)
        .await?;

    debug!(
        audit_id = %record.id,
        action = %entry.action,
        resource_type = %entry.resource_type,
        "Created audit log entry"
    );

    Ok(record)
}

/// Audit entries matching every filter set in `query`, newest first.
pub async fn query_audit_logs(pool: &PgPool, query: AuditQuery) -> ServerResult<Vec<AuditEntry>> {
    let limit = query.limit.clamp(1, MAX_AUDIT_QUERY_LIMIT);

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM audit_log WHERE TRUE", AUDIT_COLUMNS));

    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(action) = query.action {
        builder.push(" AND action = ").push_bind(action.as_str());
    }
    if let Some(resource_type) = query.resource_type {
        builder.push(" AND resource_type = ").push_bind(resource_type.as_str());
    }
    if let Some(resource_id) = query.resource_id {
        builder.push(" AND resource_id = ").push_bind(resource_id);
    }
    if let Some(start_time) = query.start_time {
        builder.push(" AND timestamp >= ").push_bind(start_time);
    }
    if let Some(end_time) = query.end_time {
        builder.push(" AND timestamp <= ").push_bind(end_time);
    }

    builder
        .push(" ORDER BY timestamp DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(query.offset.max(0));

    let records = builder
        .build_query_as::<AuditEntry>()
        .fetch_all(pool)
        .await?;

    debug!(count = records.len(), "Queried audit logs");

    Ok(records)
}

/// Audit trail of one resource, newest first.
pub async fn get_audit_trail(
    pool: &PgPool,
    resource_type: ResourceType,
    resource_id: Uuid,
    limit: Option<i64>,
) -> ServerResult<Vec<AuditEntry>> {
    let limit = limit
        .unwrap_or(DEFAULT_AUDIT_QUERY_LIMIT)
        .clamp(1, MAX_AUDIT_QUERY_LIMIT);

    let sql = format!(
        "SELECT {} FROM audit_log WHERE resource_type = $1 AND resource_id = $2 \
         ORDER BY timestamp DESC LIMIT $3",
        AUDIT_COLUMNS
    );
    let records = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(resource_type.as_str())
        .bind(resource_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    debug!(
        resource_type = %resource_type,
        resource_id = %resource_id,
        count = records.len(),
        "Retrieved audit trail"
    );

    Ok(records)
}
