//! Audit logging middleware for tracking commands
//!
//! - Only commands (POST, PUT, PATCH, DELETE) are audited
//! - The request body is kept, with secrets redacted, as the entry's `changes`
//! - The caller is taken from a valid Bearer token when one is present
//! - Entries are written after the inner service answers with a 2xx status

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request},
    http::{Method, Uri},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::models::{redact_secrets, AuditAction, CreateAuditEntry, ResourceType};
use super::queries::create_audit_entry;
use crate::auth::{bearer_token, JwtKeys, TokenType};
use crate::cqrs::middleware::is_command_method;

/// Audit logging layer
#[derive(Clone)]
pub struct AuditLayer {
    pool: PgPool,
    jwt: JwtKeys,
}

impl AuditLayer {
    pub fn new(pool: PgPool, jwt: JwtKeys) -> Self {
        Self { pool, jwt }
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            pool: self.pool.clone(),
            jwt: self.jwt.clone(),
        }
    }
}

/// Audit middleware service
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    pool: PgPool,
    jwt: JwtKeys,
}

impl<S> Service<Request> for AuditMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let pool = self.pool.clone();
        let jwt = self.jwt.clone();

        Box::pin(async move {
            let method = request.method().clone();
            let uri = request.uri().clone();

            if !is_command_method(&method) {
                return inner.call(request).await;
            }

            let ip_address = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string());

            let user_agent = request
                .headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            let user_id = bearer_token(request.headers())
                .and_then(|token| jwt.verify(token, TokenType::Access).ok())
                .map(|claims| claims.sub);

            let (parts, body) = request.into_parts();
            let body_bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(method = %method, uri = %uri, error = %e, "Failed to capture request body");
                    Bytes::new()
                },
            };

            let request = Request::from_parts(parts, Body::from(body_bytes.clone()));

            debug!(
                method = %method,
                uri = %uri,
                ip = ?ip_address,
                user_id = ?user_id,
                "Auditable command received"
            );

            let response = inner.call(request).await?;

            if !response.status().is_success() {
                warn!(
                    method = %method,
                    uri = %uri,
                    status = %response.status(),
                    "Command failed or returned non-success status"
                );
                return Ok(response);
            }

            let (resource_type, resource_id) = infer_resource(&uri);
            let changes = if body_bytes.is_empty() {
                None
            } else {
                serde_json::from_slice::<JsonValue>(&body_bytes)
                    .ok()
                    .map(|mut body| {
                        redact_secrets(&mut body);
                        body
                    })
            };

            let mut metadata = serde_json::Map::new();
            metadata.insert("method".to_string(), JsonValue::String(method.to_string()));
            metadata.insert("uri".to_string(), JsonValue::String(uri.to_string()));
            metadata.insert(
                "status".to_string(),
                JsonValue::Number(response.status().as_u16().into()),
            );

            let entry = CreateAuditEntry {
                user_id,
                action: infer_action(&method, &uri),
                resource_type,
                resource_id,
                changes,
                metadata: Some(JsonValue::Object(metadata)),
                ip_address,
                user_agent,
            };

            tokio::spawn(async move {
                match create_audit_entry(&pool, entry).await {
                    Ok(entry) => {
                        info!(
                            audit_id = %entry.id,
                            action = %entry.action,
                            resource_type = %entry.resource_type,
                            "Audit log entry created"
                        );
                    },
                    Err(e) => {
                        error!(error = %e, "Failed to create audit log entry");
                    },
                }
            });

            Ok(response)
        })
    }
}

/// Infer audit action from HTTP method and URI
fn infer_action(method: &Method, uri: &Uri) -> AuditAction {
    let last = uri.path().trim_end_matches('/').rsplit('/').next().unwrap_or_default();

    match *method {
        Method::POST => match last {
            "token" | "refresh" => AuditAction::Login,
            "register" => AuditAction::Register,
            "confirm" => AuditAction::Confirm,
            "reject" => AuditAction::Reject,
            "cancel" => AuditAction::Cancel,
            "complete" => AuditAction::Complete,
            "resolve" => AuditAction::Resolve,
            "read" => AuditAction::Read,
            "primary" => AuditAction::Update,
            _ => AuditAction::Create,
        },
        Method::PUT | Method::PATCH => AuditAction::Update,
        Method::DELETE => AuditAction::Delete,
        _ => AuditAction::Other,
    }
}

/// Infer resource type and ID from URI. The innermost resource wins, so
/// `/properties/{id}/images/{image_id}` is an image.
fn infer_resource(uri: &Uri) -> (ResourceType, Option<Uuid>) {
    let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();

    let resource_id = segments
        .iter()
        .rev()
        .find_map(|segment| Uuid::parse_str(segment).ok());

    let resource_type = segments
        .iter()
        .rev()
        .find_map(|segment| match *segment {
            "images" => Some(ResourceType::PropertyImage),
            "properties" => Some(ResourceType::Property),
            "bookings" => Some(ResourceType::Booking),
            "transactions" => Some(ResourceType::Transaction),
            "subscriptions" => Some(ResourceType::Subscription),
            "messages" => Some(ResourceType::Message),
            "reports" => Some(ResourceType::Report),
            "users" | "auth" => Some(ResourceType::User),
            _ => None,
        })
        .unwrap_or(ResourceType::Other);

    (resource_type, resource_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(path: &str) -> Uri {
        path.parse().unwrap()
    }

    #[test]
    fn test_infer_action() {
        let bookings = uri("/api/v1/bookings");
        assert_eq!(infer_action(&Method::POST, &bookings), AuditAction::Create);
        assert_eq!(infer_action(&Method::PATCH, &bookings), AuditAction::Update);
        assert_eq!(infer_action(&Method::DELETE, &bookings), AuditAction::Delete);

        let id = Uuid::new_v4();
        let cases = [
            ("/api/v1/auth/token", AuditAction::Login),
            ("/api/v1/auth/register", AuditAction::Register),
            ("confirm", AuditAction::Confirm),
            ("reject", AuditAction::Reject),
            ("cancel", AuditAction::Cancel),
            ("complete", AuditAction::Complete),
        ];
        for (path, expected) in cases {
            let path = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/api/v1/bookings/{}/{}", id, path)
            };
            assert_eq!(infer_action(&Method::POST, &uri(&path)), expected, "{path}");
        }
        assert_eq!(
            infer_action(&Method::POST, &uri(&format!("/api/v1/reports/{}/resolve", id))),
            AuditAction::Resolve
        );
    }

    #[test]
    fn test_infer_resource() {
        let (resource_type, resource_id) = infer_resource(&uri("/api/v1/properties"));
        assert_eq!(resource_type, ResourceType::Property);
        assert!(resource_id.is_none());

        let property = Uuid::new_v4();
        let image = Uuid::new_v4();
        let (resource_type, resource_id) =
            infer_resource(&uri(&format!("/api/v1/properties/{}/images/{}/primary", property, image)));
        assert_eq!(resource_type, ResourceType::PropertyImage);
        assert_eq!(resource_id, Some(image));

        let booking = Uuid::new_v4();
        let (resource_type, resource_id) =
            infer_resource(&uri(&format!("/api/v1/bookings/{}/confirm", booking)));
        assert_eq!(resource_type, ResourceType::Booking);
        assert_eq!(resource_id, Some(booking));
    }

    #[test]
    fn test_infer_various_resources() {
        let test_cases = vec![
            ("/api/v1/auth/register", ResourceType::User),
            ("/api/v1/users/me", ResourceType::User),
            ("/api/v1/transactions", ResourceType::Transaction),
            ("/api/v1/subscriptions", ResourceType::Subscription),
            ("/api/v1/messages", ResourceType::Message),
            ("/api/v1/reports", ResourceType::Report),
            ("/health", ResourceType::Other),
        ];

        for (path, expected_type) in test_cases {
            let (resource_type, _) = infer_resource(&uri(path));
            assert_eq!(resource_type, expected_type, "{path}");
        }
    }
}
