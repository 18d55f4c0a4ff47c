pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::DispatchConfig;
pub use crate::core::bundle::LabelBundle;
pub use crate::core::dispatch::{BatchOutcome, DispatchOrchestrator};
pub use crate::core::labels::PrintFlow;
pub use crate::core::manifest::{default_range, fetch_manifest, Manifest};
pub use crate::core::registry::GatewayRegistry;
pub use crate::core::report::{label_report, LabelDocument};
pub use crate::domain::model::{
    Address, CarrierApi, CarrierMethod, CarrierService, ContactMechanism, MechanismKind, Party,
    Sale, SendOutcome, Shipment, ShipmentKind, ShipmentState, WeightUnit,
};
pub use crate::domain::ports::{AttachmentStore, CarrierGateway};
pub use crate::utils::error::{DispatchError, Result};
