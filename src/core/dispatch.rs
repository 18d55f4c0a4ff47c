use crate::config::DispatchConfig;
use crate::core::bundle::{bundle_labels, LabelBundle};
use crate::core::checks;
use crate::core::registry::GatewayRegistry;
use crate::domain::model::Shipment;
use crate::utils::error::{DispatchError, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// What a dispatch batch hands back to the user: tracking references and
/// error texts per shipment, the labels collapsed into one artifact, and a
/// joined summary.
#[derive(Debug)]
pub struct BatchOutcome {
    pub references: Vec<String>,
    pub errors: Vec<String>,
    pub labels: LabelBundle,
    pub summary: String,
}

impl BatchOutcome {
    fn new(references: Vec<String>, errors: Vec<String>, labels: LabelBundle) -> Self {
        let summary = format!(
            "References: {}\nErrors: {}",
            references.join(", "),
            errors.join(", ")
        );
        Self {
            references,
            errors,
            labels,
            summary,
        }
    }
}

/// Batch dispatch of shipments through their carrier gateways.
///
/// Runs in two phases with different error policies: [`preflight`] rejects
/// the whole batch on the first shipment that is not fit to send (the user
/// fixes it and retries), while [`dispatch`] accumulates address and
/// carrier-call failures per shipment and always finishes the batch.
///
/// [`preflight`]: DispatchOrchestrator::preflight
/// [`dispatch`]: DispatchOrchestrator::dispatch
pub struct DispatchOrchestrator {
    config: DispatchConfig,
    registry: Arc<GatewayRegistry>,
}

impl DispatchOrchestrator {
    pub fn new(config: DispatchConfig, registry: Arc<GatewayRegistry>) -> Self {
        Self { config, registry }
    }

    /// Validates every shipment before anything is sent: eligible state,
    /// carrier assigned, not already sent, exactly one API, destination
    /// not in the API's postal-code exclusion list.
    pub fn preflight(&self, shipments: &[Shipment]) -> Result<()> {
        for shipment in shipments {
            checks::check_state(shipment)?;
            checks::check_carrier(shipment)?;
            checks::check_not_sent(shipment)?;
            let api = checks::resolve_api(&self.config.carrier_apis, shipment)?;
            checks::check_postal_code(api, shipment)?;
        }
        Ok(())
    }

    /// Sends the batch. Shipments that fail the address check or whose
    /// carrier call fails are reported in the outcome and skipped; the
    /// rest of the batch still goes out.
    pub async fn dispatch(&self, shipments: &mut [Shipment]) -> Result<BatchOutcome> {
        self.preflight(shipments)?;

        let mut references: Vec<String> = Vec::new();
        let mut labels: Vec<PathBuf> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for shipment in shipments.iter_mut() {
            if let Err(e) = checks::check_address(shipment) {
                tracing::warn!("{}", e);
                errors.push(e.to_string());
                continue;
            }

            let api = match checks::resolve_api(&self.config.carrier_apis, shipment) {
                Ok(api) => api,
                Err(e) => {
                    errors.push(e.to_string());
                    continue;
                }
            };

            let Some(gateway) = self.registry.resolve(api.method) else {
                let message =
                    format!("no gateway registered for carrier method '{}'", api.method);
                tracing::warn!("{}", message);
                errors.push(message);
                continue;
            };

            tracing::info!(
                "sending shipment {} through '{}' ({})",
                shipment.number,
                api.name,
                api.method
            );
            match gateway.send(api, shipment).await {
                Ok(outcome) => {
                    if outcome.errors.is_empty() {
                        shipment.send_date = Some(Utc::now());
                    }
                    references.extend(outcome.references);
                    labels.extend(outcome.labels);
                    errors.extend(outcome.errors);
                }
                Err(e) => {
                    let failure = DispatchError::CarrierFailure {
                        shipment: shipment.number.clone(),
                        message: e.to_string(),
                    };
                    tracing::warn!("{}", failure);
                    errors.push(failure.to_string());
                }
            }
        }

        let bundle = bundle_labels(&self.config.archive_prefix, &labels)?;
        Ok(BatchOutcome::new(references, errors, bundle))
    }
}
