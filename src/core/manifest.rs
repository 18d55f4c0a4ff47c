use crate::core::registry::GatewayRegistry;
use crate::domain::model::CarrierApi;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};

/// End-of-day manifest document returned by a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Default manifest window: from now until tomorrow.
pub fn default_range() -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    (now, now + Duration::days(1))
}

/// Fetches the manifest for one carrier API over a date range. Returns
/// `None` when no gateway handles the API's method.
pub async fn fetch_manifest(
    registry: &GatewayRegistry,
    api: &CarrierApi,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Option<Manifest>> {
    let Some(gateway) = registry.resolve(api.method) else {
        tracing::warn!(
            "manifest requested but no gateway registered for method '{}'",
            api.method
        );
        return Ok(None);
    };

    tracing::info!(
        "fetching manifest from '{}' for {} .. {}",
        api.name,
        from,
        to
    );
    let data = gateway.get_manifest(api, from, to).await?;
    let file_name = format!(
        "{}-manifest-{}-{}.pdf",
        api.method,
        from.format("%Y%m%d"),
        to.format("%Y%m%d")
    );
    Ok(Some(Manifest { file_name, data }))
}
