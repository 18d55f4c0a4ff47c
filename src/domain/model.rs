use crate::utils::text::{comment_to_notes, unspaces};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentState {
    Draft,
    Waiting,
    Assigned,
    Packed,
    Done,
    Cancelled,
}

impl fmt::Display for ShipmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShipmentState::Draft => "draft",
            ShipmentState::Waiting => "waiting",
            ShipmentState::Assigned => "assigned",
            ShipmentState::Packed => "packed",
            ShipmentState::Done => "done",
            ShipmentState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentKind {
    Outgoing,
    Return,
}

impl ShipmentKind {
    /// States a shipment must be in before it may be handed to a carrier.
    pub fn dispatchable_states(self) -> &'static [ShipmentState] {
        match self {
            ShipmentKind::Outgoing => &[ShipmentState::Packed, ShipmentState::Done],
            ShipmentKind::Return => &[ShipmentState::Draft],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKind {
    Phone,
    Mobile,
    Fax,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMechanism {
    pub kind: MechanismKind,
    pub value: String,
    pub create_date: DateTime<Utc>,
    pub write_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub comment_shipment: Option<String>,
    #[serde(default)]
    pub mechanisms: Vec<ContactMechanism>,
}

impl Party {
    /// Most recently touched mechanism of the given kind, preferring the
    /// last write over the last creation.
    pub fn latest_mechanism(&self, kind: MechanismKind) -> Option<&str> {
        self.mechanisms
            .iter()
            .filter(|m| m.kind == kind)
            .max_by_key(|m| m.write_date.unwrap_or(m.create_date))
            .map(|m| m.value.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub comment_shipment: Option<String>,
}

impl Address {
    /// Names of the address fields a carrier requires but this address lacks.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&self.street) {
            missing.push("street");
        }
        if blank(&self.postal_code) {
            missing.push("postal code");
        }
        if blank(&self.city) {
            missing.push("city");
        }
        if blank(&self.country) {
            missing.push("country");
        }
        missing
    }
}

/// Weight units understood by carrier endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Gram,
    Kilogram,
    Pound,
}

impl Default for WeightUnit {
    fn default() -> Self {
        WeightUnit::Kilogram
    }
}

impl WeightUnit {
    fn to_kilograms(self) -> f64 {
        match self {
            WeightUnit::Gram => 0.001,
            WeightUnit::Kilogram => 1.0,
            WeightUnit::Pound => 0.453_592_37,
        }
    }

    pub fn convert(self, quantity: f64, target: WeightUnit) -> f64 {
        quantity * self.to_kilograms() / target.to_kilograms()
    }
}

/// An existing stock shipment decorated with the carrier attributes this
/// module reads and mutates. The shipment itself is owned by the host ERP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub number: String,
    pub kind: ShipmentKind,
    pub state: ShipmentState,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub carrier_service: Option<String>,
    #[serde(default)]
    pub customer: Party,
    #[serde(default)]
    pub delivery_address: Address,
    #[serde(default)]
    pub carrier_notes: Option<String>,
    #[serde(default)]
    pub tracking_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_label: Option<Vec<u8>>,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub printed: bool,
    #[serde(default)]
    pub send_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
}

impl Shipment {
    pub fn new(number: impl Into<String>, kind: ShipmentKind, state: ShipmentState) -> Self {
        Self {
            number: number.into(),
            kind,
            state,
            carrier: None,
            carrier_service: None,
            customer: Party::default(),
            delivery_address: Address::default(),
            carrier_notes: None,
            tracking_ref: None,
            tracking_label: None,
            delivered: false,
            printed: false,
            send_date: None,
            weight: None,
            weight_unit: WeightUnit::default(),
        }
    }

    /// Weight as the carrier API expects it. Carriers reject zero-weight
    /// packages, so absent or zero weight is coerced to 1.0 before the
    /// unit conversion.
    pub fn carrier_weight(&self, api: &CarrierApi) -> f64 {
        let weight = match self.weight {
            Some(w) if w > 0.0 => w,
            _ => 1.0,
        };
        self.weight_unit.convert(weight, api.weight_unit)
    }

    /// Contact value for the carrier: the delivery address wins, then the
    /// customer's most recently touched mechanism of that kind.
    pub fn contact(&self, kind: MechanismKind) -> Option<String> {
        let from_address = match kind {
            MechanismKind::Phone | MechanismKind::Mobile | MechanismKind::Fax => {
                self.delivery_address.phone.as_deref()
            }
            MechanismKind::Email => self.delivery_address.email.as_deref(),
        };
        from_address
            .filter(|v| !v.is_empty())
            .or_else(|| self.customer.latest_mechanism(kind))
            .map(|v| v.to_string())
    }
}

/// Integration methods this module knows how to route to a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierMethod {
    Seur,
    Mrw,
    Gls,
    Envialia,
    CorreosExpress,
    Dhl,
}

impl fmt::Display for CarrierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CarrierMethod::Seur => "seur",
            CarrierMethod::Mrw => "mrw",
            CarrierMethod::Gls => "gls",
            CarrierMethod::Envialia => "envialia",
            CarrierMethod::CorreosExpress => "correos_express",
            CarrierMethod::Dhl => "dhl",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierService {
    pub code: String,
    pub name: String,
}

/// Read-only carrier API descriptor: which integration method applies, which
/// carriers it serves and how labels/manifests should be produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierApi {
    pub name: String,
    pub method: CarrierMethod,
    #[serde(default)]
    pub carriers: Vec<String>,
    #[serde(default)]
    pub services: Vec<CarrierService>,
    #[serde(default)]
    pub excluded_postal_codes: Vec<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub print_report: Option<String>,
    #[serde(default)]
    pub direct_print: bool,
    /// Free-form per-carrier settings passed through to the gateway.
    #[serde(default)]
    pub options: serde_json::Value,
}

impl CarrierApi {
    pub fn serves(&self, carrier: &str) -> bool {
        self.carriers.iter().any(|c| c == carrier)
    }

    /// Postal codes are compared space-insensitively: both the configured
    /// exclusion list and user-entered addresses carry stray spaces.
    pub fn excludes_postal_code(&self, postal_code: &str) -> bool {
        let normalized = unspaces(postal_code);
        self.excluded_postal_codes
            .iter()
            .any(|code| unspaces(code) == normalized)
    }
}

/// Ephemeral per-shipment result of a carrier send: tracking references,
/// label files written by the gateway, and user-facing error messages.
/// Concatenated across a batch, never persisted.
#[derive(Debug, Clone, Default)]
pub struct SendOutcome {
    pub references: Vec<String>,
    pub labels: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// The sale attributes that get copied onto shipments created from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sale {
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub carrier_service: Option<String>,
}

impl Sale {
    /// Decorates freshly created shipments with the sale's carrier service
    /// and with notes taken from the delivery address comment, falling back
    /// to the customer's shipment comment.
    pub fn decorate_shipments(&self, shipments: &mut [Shipment]) {
        for shipment in shipments.iter_mut() {
            if self.carrier.is_some() && self.carrier_service.is_some() {
                shipment.carrier_service = self.carrier_service.clone();
            }
            let notes = shipment
                .delivery_address
                .comment_shipment
                .as_deref()
                .or(shipment.customer.comment_shipment.as_deref())
                .map(comment_to_notes);
            if notes.is_some() {
                shipment.carrier_notes = notes;
            }
        }
    }
}
