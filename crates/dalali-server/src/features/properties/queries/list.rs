//! List properties query
//!
//! Public catalogue search. Callers other than admins only see listings that
//! are on the market; `mine` lists the caller's own listings in any status.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::{contains_pattern, Paginated, PaginationParams, ValidationError};
use crate::guard::DateRange;
use crate::models::{Property, PropertyType, PROPERTY_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOrdering {
    PriceAsc,
    PriceDesc,
    CreatedAsc,
    CreatedDesc,
}

impl PropertyOrdering {
    fn sql(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price ASC, created_at DESC",
            Self::PriceDesc => "price DESC, created_at DESC",
            Self::CreatedAsc => "created_at ASC",
            Self::CreatedDesc => "created_at DESC",
        }
    }
}

impl FromStr for PropertyOrdering {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::PriceAsc),
            "-price" => Ok(Self::PriceDesc),
            "created_at" => Ok(Self::CreatedAsc),
            "-created_at" => Ok(Self::CreatedDesc),
            other => Err(ValidationError::Invalid(format!(
                "Unknown ordering '{}', expected price, -price, created_at or -created_at",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPropertiesQuery {
    #[serde(skip)]
    pub viewer: Option<Actor>,
    /// Only the viewer's own listings, any status
    #[serde(skip)]
    pub mine: bool,
    pub seller_id: Option<Uuid>,
    pub property_type: Option<PropertyType>,
    pub location: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub min_bedrooms: Option<i32>,
    pub q: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub ordering: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListPropertiesError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Property>, ListPropertiesError>> for ListPropertiesQuery {}

impl crate::cqrs::middleware::Query for ListPropertiesQuery {}

/// Validated filters
#[derive(Debug)]
struct Filters {
    ordering: PropertyOrdering,
    free_during: Option<DateRange>,
}

impl ListPropertiesQuery {
    fn filters(&self) -> Result<Filters, ValidationError> {
        let ordering = match self.ordering.as_deref() {
            Some(raw) => raw.parse()?,
            None => PropertyOrdering::CreatedDesc,
        };

        let free_during = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(
                DateRange::new(start, end).map_err(|e| ValidationError::Invalid(e.to_string()))?,
            ),
            (None, None) => None,
            _ => {
                return Err(ValidationError::Invalid(
                    "start_date and end_date must be given together".to_string(),
                ))
            },
        };

        if let (Some(min), Some(max)) = (&self.min_price, &self.max_price) {
            if min > max {
                return Err(ValidationError::Invalid(
                    "min_price cannot exceed max_price".to_string(),
                ));
            }
        }

        Ok(Filters {
            ordering,
            free_during,
        })
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>, filters: &Filters) {
        builder.push(" WHERE TRUE");

        let is_admin = self.viewer.is_some_and(|v| v.is_admin());
        match (self.mine, self.viewer) {
            (true, Some(viewer)) => {
                builder.push(" AND seller_id = ").push_bind(viewer.user_id);
            },
            (true, None) => {
                builder.push(" AND FALSE");
            },
            (false, _) if !is_admin => {
                builder.push(" AND is_available");
            },
            _ => {},
        }

        if let Some(seller_id) = self.seller_id {
            builder.push(" AND seller_id = ").push_bind(seller_id);
        }
        if let Some(property_type) = self.property_type {
            builder.push(" AND property_type = ").push_bind(property_type);
        }
        if let Some(location) = self.location.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            builder
                .push(" AND location ILIKE ")
                .push_bind(contains_pattern(location));
        }
        if let Some(min_price) = &self.min_price {
            builder.push(" AND price >= ").push_bind(min_price.clone());
        }
        if let Some(max_price) = &self.max_price {
            builder.push(" AND price <= ").push_bind(max_price.clone());
        }
        if let Some(min_bedrooms) = self.min_bedrooms {
            builder.push(" AND bedrooms >= ").push_bind(min_bedrooms);
        }
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(q);
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR location ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(range) = filters.free_during {
            builder
                .push(
                    " AND NOT EXISTS (SELECT 1 FROM bookings b WHERE b.property_id = properties.id \
                     AND b.status IN ('pending', 'confirmed') AND b.start_date <= ",
                )
                .push_bind(range.end)
                .push(" AND b.end_date >= ")
                .push_bind(range.start)
                .push(")");
        }
    }
}

#[tracing::instrument(skip(pool, query), fields(page = ?query.page, per_page = ?query.per_page, mine = query.mine))]
pub async fn handle(
    pool: PgPool,
    query: ListPropertiesQuery,
) -> Result<Paginated<Property>, ListPropertiesError> {
    let filters = query.filters()?;
    let params = PaginationParams::new(query.page, query.per_page);

    let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM properties");
    query.push_where(&mut count, &filters);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM properties", PROPERTY_COLUMNS));
    query.push_where(&mut select, &filters);
    select
        .push(" ORDER BY ")
        .push(filters.ordering.sql())
        .push(" LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let items = select.build_query_as::<Property>().fetch_all(&pool).await?;

    tracing::debug!(count = items.len(), total, "Listed properties");
    Ok(Paginated::new(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test]
    fn test_ordering_parse() {
        assert_eq!("price".parse::<PropertyOrdering>().unwrap(), PropertyOrdering::PriceAsc);
        assert_eq!("-created_at".parse::<PropertyOrdering>().unwrap(), PropertyOrdering::CreatedDesc);
        assert!("bedrooms".parse::<PropertyOrdering>().is_err());
    }

    #[test]
    fn test_date_filter_requires_both_ends() {
        let query = ListPropertiesQuery {
            start_date: Some(d(1)),
            ..Default::default()
        };
        assert!(query.filters().is_err());

        let query = ListPropertiesQuery {
            start_date: Some(d(5)),
            end_date: Some(d(5)),
            ..Default::default()
        };
        assert!(query.filters().is_err());

        let query = ListPropertiesQuery {
            start_date: Some(d(1)),
            end_date: Some(d(5)),
            ..Default::default()
        };
        assert_eq!(query.filters().unwrap().free_during, Some(DateRange::new(d(1), d(5)).unwrap()));
    }

    #[test]
    fn test_price_bounds() {
        let query = ListPropertiesQuery {
            min_price: Some(BigDecimal::from(500)),
            max_price: Some(BigDecimal::from(100)),
            ..Default::default()
        };
        assert!(query.filters().is_err());
    }

    #[test]
    fn test_non_admins_only_see_available() {
        let filters = ListPropertiesQuery::default().filters().unwrap();

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM properties");
        ListPropertiesQuery::default().push_where(&mut builder, &filters);
        assert!(builder.sql().contains("is_available"));

        let admin = ListPropertiesQuery {
            viewer: Some(Actor::new(Uuid::new_v4(), crate::auth::Role::Admin)),
            ..Default::default()
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM properties");
        admin.push_where(&mut builder, &filters);
        assert!(!builder.sql().contains("is_available"));
    }
}
