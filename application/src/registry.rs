//! Capability Registry
//!
//! The [`CapabilityRegistry`] maps capability names to [`Capability`]
//! implementations. It is built once per session and then shared read-only
//! (behind an `Arc`) by every strategy.
//!
//! # Usage
//!
//! ```ignore
//! use orchestra_application::{CapabilityRegistry, GetCurrentUtcTime};
//!
//! let registry = CapabilityRegistry::new()
//!     .with(Arc::new(GetCurrentUtcTime::new()))?
//!     .with(Arc::new(GetWeatherForCity::new(weather, chat.clone())))?;
//!
//! assert!(registry.contains("get_current_utc_time"));
//! let descriptors = registry.descriptors(); // registration order
//! ```

use crate::ports::capability::Capability;
use orchestra_domain::{CapabilityDescriptor, DomainError};
use std::collections::HashMap;
use std::sync::Arc;

/// Name-indexed set of capabilities, in registration order.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    capabilities: Vec<Arc<dyn Capability>>,
    /// Capability name -> position in `capabilities`
    index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability.
    ///
    /// Fails with `DuplicateCapability` if the name is taken and with
    /// `InvalidCapability` if the descriptor is malformed.
    pub fn register(&mut self, capability: Arc<dyn Capability>) -> Result<(), DomainError> {
        let descriptor = capability.descriptor();
        descriptor.validate()?;

        if self.index.contains_key(&descriptor.name) {
            return Err(DomainError::DuplicateCapability(descriptor.name.clone()));
        }

        tracing::debug!(capability = %descriptor.name, "Registered capability");
        self.index
            .insert(descriptor.name.clone(), self.capabilities.len());
        self.capabilities.push(capability);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, capability: Arc<dyn Capability>) -> Result<Self, DomainError> {
        self.register(capability)?;
        Ok(self)
    }

    /// Look up a capability by name.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Capability>, DomainError> {
        self.index
            .get(name)
            .map(|&i| &self.capabilities[i])
            .ok_or_else(|| DomainError::UnknownCapability(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All capabilities in registration order
    pub fn list(&self) -> impl Iterator<Item = &Arc<dyn Capability>> {
        self.capabilities.iter()
    }

    /// Descriptors of all capabilities in registration order
    pub fn descriptors(&self) -> Vec<CapabilityDescriptor> {
        self.capabilities
            .iter()
            .map(|c| c.descriptor().clone())
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.capabilities.iter().map(|c| c.descriptor().name.as_str())
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubCapability;

    #[test]
    fn test_register_preserves_order() {
        let registry = CapabilityRegistry::new()
            .with(StubCapability::arc("get_weather_for_city", "sunny"))
            .unwrap()
            .with(StubCapability::arc("get_current_utc_time", "now"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["get_weather_for_city", "get_current_utc_time"]
        );
        assert_eq!(registry.descriptors()[1].name, "get_current_utc_time");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = CapabilityRegistry::new();
        registry
            .register(StubCapability::arc("get_current_utc_time", "a"))
            .unwrap();

        let err = registry
            .register(StubCapability::arc("get_current_utc_time", "b"))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateCapability("get_current_utc_time".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_lookup_fails() {
        let registry = CapabilityRegistry::new()
            .with(StubCapability::arc("get_current_utc_time", "now"))
            .unwrap();

        assert!(registry.get("get_current_utc_time").is_ok());
        assert!(!registry.contains("send_email"));
        assert!(matches!(
            registry.get("send_email"),
            Err(DomainError::UnknownCapability(name)) if name == "send_email"
        ));
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        let mut registry = CapabilityRegistry::new();
        let blank = StubCapability::with_descriptor(
            CapabilityDescriptor::new("get_current_utc_time", "  "),
            "now",
        );
        assert!(matches!(
            registry.register(Arc::new(blank)),
            Err(DomainError::InvalidCapability { .. })
        ));
        assert!(registry.is_empty());
    }
}
