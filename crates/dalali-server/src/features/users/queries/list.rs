//! List users query (admins)

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::auth::{Actor, Role};
use crate::features::shared::{contains_pattern, Paginated, PaginationParams};
use crate::models::{User, UserProfile, USER_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {
    #[serde(skip)]
    pub viewer: Option<Actor>,
    /// Matches username, email or phone number
    pub q: Option<String>,
    pub role: Option<Role>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListUsersError {
    #[error("Only administrators can list users")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<UserProfile>, ListUsersError>> for ListUsersQuery {}

impl crate::cqrs::middleware::Query for ListUsersQuery {}

impl ListUsersQuery {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE TRUE");
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = contains_pattern(q);
            builder
                .push(" AND (username ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR phone_number ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(role) = self.role {
            builder.push(" AND role = ").push_bind(role);
        }
    }
}

#[tracing::instrument(skip(pool, query), fields(q = ?query.q))]
pub async fn handle(pool: PgPool, query: ListUsersQuery) -> Result<Paginated<UserProfile>, ListUsersError> {
    if !query.viewer.is_some_and(|v| v.is_admin()) {
        return Err(ListUsersError::Forbidden);
    }

    let params = PaginationParams::new(query.page, query.per_page);

    let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM users");
    query.push_where(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
    query.push_where(&mut select);
    select
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let users = select.build_query_as::<User>().fetch_all(&pool).await?;
    let items = users.into_iter().map(UserProfile::from).collect();
    Ok(Paginated::new(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_covers_contact_fields() {
        let query = ListUsersQuery {
            q: Some("juma".to_string()),
            ..Default::default()
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM users");
        query.push_where(&mut builder);
        let sql = builder.sql();
        assert!(sql.contains("username ILIKE"));
        assert!(sql.contains("email ILIKE"));
        assert!(sql.contains("phone_number ILIKE"));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = ListUsersQuery {
            q: Some("  ".to_string()),
            ..Default::default()
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM users");
        query.push_where(&mut builder);
        assert!(!builder.sql().contains("ILIKE"));
    }
}
