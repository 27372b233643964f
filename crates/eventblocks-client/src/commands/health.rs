//! Upstream health check.

use tracing::debug;

use crate::api::EventsApi;
use crate::error::ClientResult;

/// Query `/health` and print the result.
pub async fn health(api: &EventsApi) -> ClientResult<()> {
    debug!(url = %api.base_url(), "Checking service health");
    let status = api.health().await?;

    match status.service {
        Some(service) => println!("{} ({}): {}", service, api.base_url(), status.status),
        None => println!("{}: {}", api.base_url(), status.status),
    }
    Ok(())
}
