use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("shipment {shipment} is in state '{state}', expected one of: {expected}")]
    StateMismatch {
        shipment: String,
        state: String,
        expected: String,
    },

    #[error("shipment {shipment} has no carrier assigned")]
    MissingCarrier { shipment: String },

    #[error("shipment {shipment} was already sent (tracking reference {reference})")]
    AlreadySent { shipment: String, reference: String },

    #[error("no carrier API configured for carrier '{carrier}'")]
    MissingApi { carrier: String },

    #[error("{count} carrier APIs match carrier '{carrier}', exactly one expected")]
    AmbiguousApi { carrier: String, count: usize },

    #[error("shipment {shipment}: postal code {postal_code} is excluded by carrier API '{api}'")]
    PostalCodeExcluded {
        shipment: String,
        postal_code: String,
        api: String,
    },

    #[error("shipment {shipment}: delivery address is missing {missing}")]
    IncompleteAddress { shipment: String, missing: String },

    #[error("shipment {shipment} has no tracking reference yet")]
    MissingTrackingRef { shipment: String },

    #[error("carrier call failed for shipment {shipment}: {message}")]
    CarrierFailure { shipment: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("configuration error in '{field}': {reason}")]
    ConfigError { field: String, reason: String },

    #[error("invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DispatchError>;
