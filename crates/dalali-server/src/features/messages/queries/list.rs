//! List messages query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::auth::Actor;
use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{Message, MESSAGE_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(skip)]
    pub viewer: Option<Actor>,
    /// `true` limits the list to unread messages received by the caller.
    pub unread: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct UnreadCountQuery {
    pub viewer: Actor,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

impl Request<Result<Paginated<Message>, sqlx::Error>> for ListMessagesQuery {}

impl crate::cqrs::middleware::Query for ListMessagesQuery {}

impl Request<Result<UnreadCount, sqlx::Error>> for UnreadCountQuery {}

impl crate::cqrs::middleware::Query for UnreadCountQuery {}

impl ListMessagesQuery {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        let Some(viewer) = self.viewer else {
            builder.push(" WHERE FALSE");
            return;
        };
        if self.unread == Some(true) {
            builder
                .push(" WHERE recipient_id = ")
                .push_bind(viewer.user_id)
                .push(" AND NOT is_read");
        } else {
            builder
                .push(" WHERE (sender_id = ")
                .push_bind(viewer.user_id)
                .push(" OR recipient_id = ")
                .push_bind(viewer.user_id)
                .push(")");
        }
    }
}

/// Messages the caller sent or received, newest first.
#[tracing::instrument(skip(pool, query), fields(unread = ?query.unread))]
pub async fn handle(pool: PgPool, query: ListMessagesQuery) -> Result<Paginated<Message>, sqlx::Error> {
    let params = PaginationParams::new(query.page, query.per_page);

    let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM messages");
    query.push_where(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM messages", MESSAGE_COLUMNS));
    query.push_where(&mut select);
    select
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let items = select.build_query_as::<Message>().fetch_all(&pool).await?;
    Ok(Paginated::new(items, &params, total))
}

#[tracing::instrument(skip(pool, query), fields(user_id = %query.viewer.user_id))]
pub async fn unread_count(pool: PgPool, query: UnreadCountQuery) -> Result<UnreadCount, sqlx::Error> {
    let unread: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND NOT is_read")
            .bind(query.viewer.user_id)
            .fetch_one(&pool)
            .await?;
    Ok(UnreadCount { unread })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use uuid::Uuid;

    fn sql_for(unread: Option<bool>) -> String {
        let query = ListMessagesQuery {
            viewer: Some(Actor::new(Uuid::new_v4(), Role::Customer)),
            unread,
            ..Default::default()
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM messages");
        query.push_where(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_inbox_and_outbox() {
        let sql = sql_for(None);
        assert!(sql.contains("sender_id ="));
        assert!(sql.contains("recipient_id ="));
    }

    #[test]
    fn test_unread_only_received() {
        let sql = sql_for(Some(true));
        assert!(!sql.contains("sender_id"));
        assert!(sql.contains("NOT is_read"));
    }
}
