use crate::core::checks;
use crate::core::registry::GatewayRegistry;
use crate::domain::model::{CarrierApi, Shipment};
use crate::utils::error::Result;
use crate::utils::text::slugify;

/// A single shipment's label prepared for the host's print subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDocument {
    /// Printer/report target configured on the carrier API.
    pub print_target: String,
    pub data: Vec<u8>,
    pub direct_print: bool,
    pub file_name: String,
}

/// Builds the printable label document for one shipment: reuses the stored
/// tracking label when present, otherwise fetches one through the gateway.
/// Returns `None` whenever there is nothing to print: no resolvable API,
/// no print target configured, or no label available.
pub async fn label_report(
    registry: &GatewayRegistry,
    apis: &[CarrierApi],
    shipment: &Shipment,
) -> Result<Option<LabelDocument>> {
    let Ok(api) = checks::resolve_api(apis, shipment) else {
        return Ok(None);
    };
    let Some(print_target) = api.print_report.as_deref() else {
        return Ok(None);
    };

    let data = match &shipment.tracking_label {
        Some(label) => label.clone(),
        None => {
            let Some(gateway) = registry.resolve(api.method) else {
                return Ok(None);
            };
            let labels = gateway.print_labels(api, shipment).await?;
            let Some(first) = labels.first() else {
                return Ok(None);
            };
            std::fs::read(first)?
        }
    };

    Ok(Some(LabelDocument {
        print_target: print_target.to_string(),
        data,
        direct_print: api.direct_print,
        file_name: slugify(&format!("{}-{}", api.method, print_target)),
    }))
}
