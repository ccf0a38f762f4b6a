// Devrs Core Library
// Device-model identification against a CSV lookup table

pub mod config;
pub mod csv;
pub mod lookup;
pub mod model;
pub mod source;
pub mod table;

pub use config::{default_config_content, Config, ConfigError};
pub use lookup::{DeviceLookup, LookupError};
pub use model::{
    EnvModelProvider, FileModelProvider, FixedModelProvider, ModelProvider, SharedModelProvider,
};
pub use source::{FsTableSource, SourceError, StaticTableSource, TableSource, TableText};
pub use table::{ColumnLayout, DeviceRow, DeviceTable};
