// Domain layer: carrier/shipment models and ports (interfaces).

pub mod model;
pub mod ports;
