//! Version registry read contract.
//!
//! The registry decides which scanned component files are published and
//! supplies their version, status, exports and modification time. It is an
//! external collaborator: this module only reads it.
//!
//! # Example
//!
//! ```ignore
//! use docscope::registry::{JsonFileRegistry, VersionRegistry};
//!
//! let registry = JsonFileRegistry::new("component-versions.json");
//! let snapshot = registry.load()?;
//! for entry in snapshot.iter() {
//!     println!("{}@{}", entry.name, entry.current_version);
//! }
//! ```

pub mod json_file;
pub mod types;

pub use json_file::{parse_file, parse_str, validate, JsonFileRegistry, RegistryError, RegistryResult};
pub use types::{RegistryEntry, RegistrySnapshot};

/// Source of registry entries, consulted on every cache refresh.
pub trait VersionRegistry: Send + Sync {
    fn load(&self) -> RegistryResult<RegistrySnapshot>;
}

/// Fixed in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: Vec<RegistryEntry>,
}

impl StaticRegistry {
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }
}

impl VersionRegistry for StaticRegistry {
    fn load(&self) -> RegistryResult<RegistrySnapshot> {
        Ok(RegistrySnapshot::new(self.entries.clone()))
    }
}
