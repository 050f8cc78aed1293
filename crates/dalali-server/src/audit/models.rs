//! Audit data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Default number of audit entries returned per query
pub const DEFAULT_AUDIT_QUERY_LIMIT: i64 = 100;

/// Maximum number of audit entries that can be returned in a single query.
pub const MAX_AUDIT_QUERY_LIMIT: i64 = 1000;

/// Request body fields replaced before a body is stored as `changes`.
pub const REDACTED_FIELDS: &[&str] = &["password", "confirm_password", "refresh", "access", "token"];

/// Audit log entry from the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: Uuid,
    /// Caller, when the request carried a valid token
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    /// Request body with secrets redacted
    pub changes: Option<JsonValue>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<JsonValue>,
}

/// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Read,
    Login,
    Register,
    Confirm,
    Reject,
    Cancel,
    Complete,
    Resolve,
    Other,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Read => "read",
            Self::Login => "login",
            Self::Register => "register",
            Self::Confirm => "confirm",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
            Self::Resolve => "resolve",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resource types that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    User,
    Property,
    PropertyImage,
    Booking,
    Transaction,
    Subscription,
    Message,
    Report,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Property => "property",
            Self::PropertyImage => "property_image",
            Self::Booking => "booking",
            Self::Transaction => "transaction",
            Self::Subscription => "subscription",
            Self::Message => "message",
            Self::Report => "report",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query parameters for audit logs
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub resource_type: Option<ResourceType>,
    pub resource_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_AUDIT_QUERY_LIMIT
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            user_id: None,
            action: None,
            resource_type: None,
            resource_id: None,
            start_time: None,
            end_time: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Input for creating an audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<Uuid>,
    pub changes: Option<JsonValue>,
    pub metadata: Option<JsonValue>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl CreateAuditEntry {
    pub fn new(action: AuditAction, resource_type: ResourceType) -> Self {
        Self {
            user_id: None,
            action,
            resource_type,
            resource_id: None,
            changes: None,
            metadata: None,
            ip_address: None,
            user_agent: None,
        }
    }
}

/// Replace the value of every [`REDACTED_FIELDS`] key, at any depth.
pub fn redact_secrets(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => {
            for (key, field) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = JsonValue::String("[redacted]".to_string());
                } else {
                    redact_secrets(field);
                }
            }
        },
        JsonValue::Array(items) => items.iter_mut().for_each(redact_secrets),
        _ => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_str_matches_serde() {
        for action in [AuditAction::Create, AuditAction::Confirm, AuditAction::Resolve] {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, JsonValue::String(action.as_str().to_string()));
        }
        let json = serde_json::to_value(ResourceType::PropertyImage).unwrap();
        assert_eq!(json, json!("property_image"));
    }

    #[test]
    fn test_redacts_nested_secrets() {
        let mut body = json!({
            "username": "amina",
            "password": "hunter22",
            "profile": {"token": "abc"},
            "items": [{"refresh": "xyz", "keep": 1}]
        });
        redact_secrets(&mut body);
        assert_eq!(body["username"], "amina");
        assert_eq!(body["password"], "[redacted]");
        assert_eq!(body["profile"]["token"], "[redacted]");
        assert_eq!(body["items"][0]["refresh"], "[redacted]");
        assert_eq!(body["items"][0]["keep"], 1);
    }

    #[test]
    fn test_audit_query_defaults() {
        let query: AuditQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.limit, DEFAULT_AUDIT_QUERY_LIMIT);
        assert_eq!(query.offset, 0);
    }
}
