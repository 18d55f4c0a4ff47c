//! Precondition stages run before a shipment batch is handed to any
//! carrier gateway. Each stage returns a typed error naming the offending
//! shipment; callers decide whether a failure aborts the batch or only
//! skips the shipment.

use crate::domain::model::{CarrierApi, Shipment};
use crate::utils::error::{DispatchError, Result};

pub fn check_state(shipment: &Shipment) -> Result<()> {
    let expected = shipment.kind.dispatchable_states();
    if expected.contains(&shipment.state) {
        return Ok(());
    }
    Err(DispatchError::StateMismatch {
        shipment: shipment.number.clone(),
        state: shipment.state.to_string(),
        expected: expected
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

pub fn check_carrier(shipment: &Shipment) -> Result<&str> {
    shipment
        .carrier
        .as_deref()
        .ok_or_else(|| DispatchError::MissingCarrier {
            shipment: shipment.number.clone(),
        })
}

pub fn check_not_sent(shipment: &Shipment) -> Result<()> {
    match shipment.tracking_ref.as_deref() {
        Some(reference) => Err(DispatchError::AlreadySent {
            shipment: shipment.number.clone(),
            reference: reference.to_string(),
        }),
        None => Ok(()),
    }
}

/// Exactly one API must serve the shipment's carrier. None and several are
/// both terminal for the shipment.
pub fn resolve_api<'a>(apis: &'a [CarrierApi], shipment: &Shipment) -> Result<&'a CarrierApi> {
    let carrier = check_carrier(shipment)?;
    let mut matches = apis.iter().filter(|api| api.serves(carrier));
    match (matches.next(), matches.next()) {
        (Some(api), None) => Ok(api),
        (None, _) => Err(DispatchError::MissingApi {
            carrier: carrier.to_string(),
        }),
        (Some(_), Some(_)) => Err(DispatchError::AmbiguousApi {
            carrier: carrier.to_string(),
            count: apis.iter().filter(|api| api.serves(carrier)).count(),
        }),
    }
}

pub fn check_postal_code(api: &CarrierApi, shipment: &Shipment) -> Result<()> {
    if let Some(postal_code) = shipment.delivery_address.postal_code.as_deref() {
        if api.excludes_postal_code(postal_code) {
            return Err(DispatchError::PostalCodeExcluded {
                shipment: shipment.number.clone(),
                postal_code: postal_code.to_string(),
                api: api.name.clone(),
            });
        }
    }
    Ok(())
}

pub fn check_address(shipment: &Shipment) -> Result<()> {
    let missing = shipment.delivery_address.missing_fields();
    if missing.is_empty() {
        return Ok(());
    }
    Err(DispatchError::IncompleteAddress {
        shipment: shipment.number.clone(),
        missing: missing.join(", "),
    })
}

pub fn check_tracking_ref(shipment: &Shipment) -> Result<()> {
    if shipment.tracking_ref.is_none() {
        return Err(DispatchError::MissingTrackingRef {
            shipment: shipment.number.clone(),
        });
    }
    Ok(())
}
