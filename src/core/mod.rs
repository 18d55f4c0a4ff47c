pub mod bundle;
pub mod checks;
pub mod dispatch;
pub mod labels;
pub mod manifest;
pub mod registry;
pub mod report;

pub use crate::domain::model::{CarrierApi, CarrierMethod, SendOutcome, Shipment};
pub use crate::domain::ports::{AttachmentStore, CarrierGateway};
pub use crate::utils::error::Result;
