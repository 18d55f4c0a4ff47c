use crate::config::DispatchConfig;
use crate::core::bundle::{bundle_labels, LabelBundle};
use crate::core::checks;
use crate::core::registry::GatewayRegistry;
use crate::domain::model::Shipment;
use crate::domain::ports::AttachmentStore;
use crate::utils::error::Result;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// Label retrieval for already-dispatched shipments. Mirrors the dispatch
/// orchestrator without the send step: resolve the API, ask the gateway
/// for labels, optionally persist them as attachments, bundle the result.
pub struct PrintFlow {
    config: DispatchConfig,
    registry: Arc<GatewayRegistry>,
    attachments: Option<Arc<dyn AttachmentStore>>,
}

impl PrintFlow {
    pub fn new(config: DispatchConfig, registry: Arc<GatewayRegistry>) -> Self {
        Self {
            config,
            registry,
            attachments: None,
        }
    }

    pub fn with_attachment_store(mut self, store: Arc<dyn AttachmentStore>) -> Self {
        self.attachments = Some(store);
        self
    }

    /// A label only exists for shipments the carrier already knows about.
    pub fn preflight(&self, shipments: &[Shipment]) -> Result<()> {
        for shipment in shipments {
            checks::check_tracking_ref(shipment)?;
        }
        Ok(())
    }

    pub async fn run(&self, shipments: &mut [Shipment]) -> Result<LabelBundle> {
        self.preflight(shipments)?;

        let mut labels: Vec<PathBuf> = Vec::new();

        for shipment in shipments.iter_mut() {
            // Shipments without a usable carrier setup are skipped, not
            // reported: the user asked for whatever labels exist.
            if shipment.carrier.is_none() {
                continue;
            }
            let Ok(api) = checks::resolve_api(&self.config.carrier_apis, shipment) else {
                continue;
            };
            let Some(gateway) = self.registry.resolve(api.method) else {
                tracing::warn!("no gateway registered for carrier method '{}'", api.method);
                continue;
            };

            let shipment_labels = gateway.print_labels(api, shipment).await?;
            if shipment_labels.is_empty() {
                continue;
            }

            if self.config.attach_label {
                if let Some(store) = &self.attachments {
                    let data = std::fs::read(&shipment_labels[0])?;
                    let name = Utc::now().format("%y/%m/%d %H:%M:%S").to_string();
                    store.attach(&shipment.number, &name, &data).await?;
                }
            }

            shipment.printed = true;
            labels.extend(shipment_labels);
        }

        bundle_labels(&self.config.archive_prefix, &labels)
    }
}
