use std::sync::Arc;

use mercato_core::connector::MercatoConnector;
use mercato_core::{AppConfig, MercatoError, SymbolRegistry};

/// Orchestrator that holds the loaded configuration, the symbol registry
/// built from it, and the registered provider connectors.
///
/// The registry is constructed exactly once, here, and handed to jobs by
/// reference; nothing reads configuration ambiently.
pub struct Mercato {
    pub(crate) registry: Arc<SymbolRegistry>,
    pub(crate) config: AppConfig,
    pub(crate) connectors: Vec<Arc<dyn MercatoConnector>>,
}

impl std::fmt::Debug for Mercato {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mercato")
            .field("config", &self.config)
            .field("connectors", &self.connectors.len())
            .finish()
    }
}

/// Builder for constructing a [`Mercato`] orchestrator.
pub struct MercatoBuilder {
    config: Option<AppConfig>,
    connectors: Vec<Arc<dyn MercatoConnector>>,
}

impl Default for MercatoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MercatoBuilder {
    /// Create a new builder with no configuration and no connectors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            connectors: vec![],
        }
    }

    /// Provide the parsed configuration document.
    #[must_use]
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.config = Some(cfg);
        self
    }

    /// Register a provider connector.
    ///
    /// When several connectors offer the same capability, the first
    /// registered one wins; registration order is the priority order.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn MercatoConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no configuration was provided or no
    /// connectors are registered, and `Config` when the symbol sections are
    /// inconsistent (duplicate provider symbols within a namespace).
    pub fn build(self) -> Result<Mercato, MercatoError> {
        let config = self.config.ok_or_else(|| {
            MercatoError::InvalidArg("no configuration provided; call config(...)".to_string())
        })?;
        if self.connectors.is_empty() {
            return Err(MercatoError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        let registry = SymbolRegistry::from_config(&config.symbols)?;
        Ok(Mercato {
            registry: Arc::new(registry),
            config,
            connectors: self.connectors,
        })
    }
}

impl Mercato {
    /// Start building a new `Mercato` instance.
    #[must_use]
    pub fn builder() -> MercatoBuilder {
        MercatoBuilder::new()
    }

    /// The symbol registry built from the loaded configuration.
    #[must_use]
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// The loaded configuration document.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Find the first registered connector offering a capability.
    pub(crate) fn capability<'a, T: ?Sized>(
        &'a self,
        pick: impl Fn(&'a dyn MercatoConnector) -> Option<&'a T>,
        label: &'static str,
    ) -> Result<&'a T, MercatoError> {
        self.connectors
            .iter()
            .find_map(|c| pick(c.as_ref()))
            .ok_or_else(|| MercatoError::unsupported(label))
    }
}
