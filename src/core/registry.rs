use crate::domain::model::CarrierMethod;
use crate::domain::ports::CarrierGateway;
use std::collections::HashMap;
use std::sync::Arc;

/// Explicit mapping from carrier method to its gateway implementation.
/// Replaces lookup of handlers by string-built names: an unregistered
/// method resolves to `None` instead of a reflection failure.
#[derive(Default)]
pub struct GatewayRegistry {
    gateways: HashMap<CarrierMethod, Arc<dyn CarrierGateway>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, method: CarrierMethod, gateway: Arc<dyn CarrierGateway>) {
        if self.gateways.insert(method, gateway).is_some() {
            tracing::warn!("gateway for method '{}' was replaced", method);
        }
    }

    pub fn with_gateway(
        mut self,
        method: CarrierMethod,
        gateway: Arc<dyn CarrierGateway>,
    ) -> Self {
        self.register(method, gateway);
        self
    }

    pub fn resolve(&self, method: CarrierMethod) -> Option<Arc<dyn CarrierGateway>> {
        self.gateways.get(&method).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}
