//! Uniform deadline for remote calls

use std::future::Future;
use std::time::Duration;

use crate::{Error, Result, Service};

/// Default bound applied to every remote capability call
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Run a remote call under `limit`, mapping expiry to an upstream error
/// attributed to `service`.
pub async fn with_timeout<T, F>(service: Service, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(service = %service, timeout_ms = limit.as_millis() as u64, "Remote call timed out");
            Err(Error::upstream(
                service,
                format!("{} service timed out after {}s", service, limit.as_secs_f32()),
            ))
        }
    }
}
