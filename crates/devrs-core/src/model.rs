// Devrs Model Provider
// Capability trait for querying the current hardware model identifier

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Trait for device-model identifier providers
///
/// Implementations answer "what device is this running on right now?"
/// with the host-reported hardware model string (e.g. "iPhone14,2").
/// The query must be cheap: interactive contexts call it once per tick.
pub trait ModelProvider {
    /// The current hardware model identifier.
    fn current_model(&self) -> String;
}

/// Provider returning a fixed identifier.
///
/// Matches production contexts where the device model cannot change for
/// the lifetime of the process.
#[derive(Debug, Clone)]
pub struct FixedModelProvider {
    model: String,
}

impl FixedModelProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

impl ModelProvider for FixedModelProvider {
    fn current_model(&self) -> String {
        self.model.clone()
    }
}

/// Provider backed by a shared, mutable identifier.
///
/// Clones share the same value, so a simulator harness (or a test) can
/// switch the "device" at runtime while a lookup holds the other handle.
#[derive(Debug, Clone, Default)]
pub struct SharedModelProvider {
    model: Rc<RefCell<String>>,
}

impl SharedModelProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: Rc::new(RefCell::new(model.into())),
        }
    }

    /// Switch the identifier reported by all clones.
    pub fn set_model(&self, model: impl Into<String>) {
        *self.model.borrow_mut() = model.into();
    }
}

impl ModelProvider for SharedModelProvider {
    fn current_model(&self) -> String {
        self.model.borrow().clone()
    }
}

/// Provider reading the identifier from an environment variable.
///
/// An unset variable reads as the empty string, which no table row
/// claims, so the lookup degrades to "unsupported".
#[derive(Debug, Clone)]
pub struct EnvModelProvider {
    var: String,
}

impl EnvModelProvider {
    /// Variable read when none is named explicitly.
    pub const DEFAULT_VAR: &'static str = "DEVRS_MODEL";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvModelProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl ModelProvider for EnvModelProvider {
    fn current_model(&self) -> String {
        std::env::var(&self.var).unwrap_or_default()
    }
}

/// Provider reading the identifier from a file, fresh on every query.
///
/// Simulator-style switching: writing a new identifier to the file
/// changes the reported device between polling ticks. Surrounding
/// whitespace (trailing newlines in particular) is trimmed.
#[derive(Debug, Clone)]
pub struct FileModelProvider {
    path: PathBuf,
}

impl FileModelProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ModelProvider for FileModelProvider {
    fn current_model(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::warn!("could not read model file {}: {}", self.path.display(), e);
                String::new()
            }
        }
    }
}
