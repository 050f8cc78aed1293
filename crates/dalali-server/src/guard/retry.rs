use std::future::Future;

use super::GuardError;
use crate::db::is_transient;

/// Runs `attempt`, retrying once when it fails with a serialization failure
/// or deadlock. A second transient failure is reported as a conflict.
pub(crate) async fn retry_transient_once<T, F, Fut>(
    operation: &'static str,
    mut attempt: F,
) -> Result<T, GuardError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GuardError>>,
{
    match attempt().await {
        Err(GuardError::Database(err)) if is_transient(&err) => {
            tracing::warn!(operation, error = %err, "Transient database failure, retrying once");
            match attempt().await {
                Err(GuardError::Database(err)) if is_transient(&err) => {
                    tracing::warn!(operation, error = %err, "Retry failed, reporting conflict");
                    Err(GuardError::Conflict(format!(
                        "Could not {} because of concurrent changes, please try again",
                        operation
                    )))
                },
                other => other,
            }
        },
        other => other,
    }
}
