//! Memoization of built tuning configurations, keyed by verbatim declaration text.
//!
//! Equality is textual: two declarations that differ only cosmetically are
//! built separately. The cache is meant to live for one editing session and be
//! cleared when the document closes or the configuration is reloaded. Hosts
//! that share it between threads wrap it in a `Mutex`; the configurations
//! themselves are immutable and can be read through the `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::options::EngineOptions;
use crate::symbols::SymbolResolver;
use crate::tuning::TuningConfig;

/// Declaration text -> built configuration.
#[derive(Debug, Default)]
pub struct TuningCache {
    options: EngineOptions,
    entries: HashMap<String, Arc<TuningConfig>>,
}

impl TuningCache {
    /// Empty cache building with `options`.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
        }
    }

    /// Options every cached configuration was built with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Configuration previously built from exactly `text`.
    pub fn get(&self, text: &str) -> Option<Arc<TuningConfig>> {
        self.entries.get(text).cloned()
    }

    /// Store `config` as the result of building `text`.
    pub fn insert(&mut self, text: &str, config: Arc<TuningConfig>) {
        self.entries.insert(text.to_string(), config);
    }

    /// Return the cached configuration for `text`, building it on a miss.
    /// A failed build leaves the cache untouched.
    pub fn get_or_build(
        &mut self,
        text: &str,
        resolver: &dyn SymbolResolver,
    ) -> Result<Arc<TuningConfig>> {
        if let Some(config) = self.get(text) {
            debug!("tuning cache hit ({} entries)", self.entries.len());
            return Ok(config);
        }
        debug!("tuning cache miss, building");
        let config = Arc::new(TuningConfig::from_text(text, resolver, &self.options)?);
        self.insert(text, Arc::clone(&config));
        Ok(config)
    }

    /// Drop every cached configuration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached configurations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
