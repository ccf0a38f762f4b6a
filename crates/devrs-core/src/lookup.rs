// Devrs Device Lookup
// Cached device-name / notch-height resolution with change detection

use crate::model::ModelProvider;
use crate::source::{SourceError, TableSource};
use crate::table::DeviceTable;

/// Errors that can occur during a reload
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("device table unavailable: {0}")]
    ResourceUnavailable(#[from] SourceError),
}

/// Cached device identification for the current hardware model.
///
/// Owns a [`ModelProvider`] (where the identifier comes from) and a
/// [`TableSource`] (where the table text comes from), both injected at
/// construction. The table is re-parsed and re-scanned on every reload;
/// between reloads only three scalars are cached.
///
/// Single-threaded by design: reloads are synchronous and complete
/// before control returns, and nothing here is shared across threads.
pub struct DeviceLookup {
    provider: Box<dyn ModelProvider>,
    source: Box<dyn TableSource>,

    /// Identifier the cache was last populated for
    last_model: Option<String>,
    /// Resolved display name. Deliberately NOT cleared when a reload
    /// finds no match, so it can hold a stale value from an earlier
    /// supported device.
    device_name: String,
    notch_height: u32,
    supported: bool,
}

impl DeviceLookup {
    /// Create a lookup with no cached result. Nothing is loaded until
    /// the first [`refresh_if_changed`](Self::refresh_if_changed) or
    /// [`force_reload`](Self::force_reload).
    pub fn new(provider: Box<dyn ModelProvider>, source: Box<dyn TableSource>) -> Self {
        Self {
            provider,
            source,
            last_model: None,
            device_name: String::new(),
            notch_height: 0,
            supported: false,
        }
    }

    /// Cached resolved device name.
    ///
    /// Empty before the first successful load; may retain a stale prior
    /// value after an unsupported lookup (see struct docs).
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Cached resolved notch height; 0 when unsupported or unset.
    pub fn notch_height(&self) -> u32 {
        self.notch_height
    }

    /// Whether the last load matched a known row.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Identifier used to populate the cache, if any load ran yet.
    pub fn last_model(&self) -> Option<&str> {
        self.last_model.as_deref()
    }

    /// Reload if the provider now reports a different identifier than
    /// the one the cache was populated for (including the very first
    /// call, where there is no prior value).
    ///
    /// Returns whether a reload ran. Call once per polling tick in
    /// interactive contexts, or at least once at startup where the
    /// device model is fixed for the process lifetime.
    pub fn refresh_if_changed(&mut self) -> Result<bool, LookupError> {
        let model = self.provider.current_model();
        if self.last_model.as_deref() == Some(model.as_str()) {
            return Ok(false);
        }
        self.force_reload()?;
        Ok(true)
    }

    /// Entry point for hosts with real device-transition events: skip
    /// the change check and reload now.
    pub fn notify_model_changed(&mut self) -> Result<(), LookupError> {
        self.force_reload()
    }

    /// Unconditionally re-parse the table and re-scan for the current
    /// identifier.
    ///
    /// On a failed acquisition the height/support reset has already
    /// happened and the name keeps its previous value; there is no
    /// retry, the next trigger simply attempts again.
    pub fn force_reload(&mut self) -> Result<(), LookupError> {
        let model = self.provider.current_model();
        self.last_model = Some(model.clone());
        self.notch_height = 0;
        self.supported = false;

        let text = match self.source.load() {
            Ok(text) => text,
            Err(e) => {
                log::warn!("device table load failed: {}", e);
                return Err(e.into());
            }
        };

        let table = DeviceTable::parse(text.as_str());
        if let Some(row) = table.find(&model) {
            self.device_name = row.device_name.clone();
            self.notch_height = row.notch_height;
            self.supported = true;
            log::debug!("device model found for {}", self.device_name);
        } else {
            log::debug!("no table row for model {:?}", model);
        }

        // Released on every exit path after a successful load.
        self.source.release(text);
        Ok(())
    }

    /// Discard the cached state entirely.
    ///
    /// Development-session teardown: without this, a stale identifier
    /// from a previous run session would suppress the reload the next
    /// session needs.
    pub fn reset(&mut self) {
        self.last_model = None;
        self.device_name.clear();
        self.notch_height = 0;
        self.supported = false;
    }
}
