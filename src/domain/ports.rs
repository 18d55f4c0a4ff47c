use crate::domain::model::{CarrierApi, SendOutcome, Shipment};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Capability interface every carrier integration implements. One gateway is
/// registered per [`crate::domain::model::CarrierMethod`]; the actual client
/// code (web services, SOAP, file drops) lives outside this crate.
#[async_trait]
pub trait CarrierGateway: Send + Sync {
    /// Registers the shipment with the carrier. Per-shipment problems are
    /// reported inside the outcome's `errors`; an `Err` means the call
    /// itself could not be made.
    async fn send(&self, api: &CarrierApi, shipment: &mut Shipment) -> Result<SendOutcome>;

    /// Produces label files for an already-registered shipment.
    async fn print_labels(&self, api: &CarrierApi, shipment: &Shipment) -> Result<Vec<PathBuf>>;

    /// End-of-day manifest covering everything dispatched in the range.
    async fn get_manifest(
        &self,
        api: &CarrierApi,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<u8>>;
}

/// Host-side attachment storage. The ERP decides where label documents end
/// up; this module only hands them over.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn attach(&self, resource: &str, name: &str, data: &[u8]) -> Result<()>;
}
