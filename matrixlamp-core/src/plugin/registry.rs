//! Plugin registry
//!
//! Ordered set of plugins. Insertion order is the cycling order. The set is
//! filled during initialization and sealed when the scheduler starts.

use core::fmt;

use heapless::Vec;

use super::{Plugin, MAX_ID_LEN, MAX_PLUGINS};

/// Registration errors
///
/// All of these are configuration mistakes and abort start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Another plugin already uses this id
    DuplicateId,
    /// Id is empty, too long or contains whitespace/control characters
    InvalidId,
    /// Scheduler already started
    Sealed,
    /// Registry is at capacity
    Full,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateId => f.write_str("duplicate plugin id"),
            RegistryError::InvalidId => f.write_str("invalid plugin id"),
            RegistryError::Sealed => f.write_str("registry sealed after start"),
            RegistryError::Full => f.write_str("too many plugins"),
        }
    }
}

/// Plugin lookup error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectError {
    /// No plugin with this id
    NotFound,
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::NotFound => f.write_str("plugin not found"),
        }
    }
}

fn valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Ordered plugin collection
pub struct Registry<'a> {
    plugins: Vec<&'a mut dyn Plugin, MAX_PLUGINS>,
    sealed: bool,
}

impl<'a> Default for Registry<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Registry<'a> {
    pub const fn new() -> Self {
        Self {
            plugins: Vec::new(),
            sealed: false,
        }
    }

    /// Append a plugin, returning its index
    pub fn register(&mut self, plugin: &'a mut dyn Plugin) -> Result<usize, RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed);
        }
        let id = plugin.id();
        if !valid_id(id) {
            return Err(RegistryError::InvalidId);
        }
        if self.resolve(id).is_ok() {
            return Err(RegistryError::DuplicateId);
        }

        let index = self.plugins.len();
        self.plugins.push(plugin).map_err(|_| RegistryError::Full)?;
        debug!("registered plugin {} at {}", id, index);
        Ok(index)
    }

    /// Find the index of the plugin with this id
    pub fn resolve(&self, id: &str) -> Result<usize, SelectError> {
        self.plugins
            .iter()
            .position(|p| p.id() == id)
            .ok_or(SelectError::NotFound)
    }

    pub fn at(&self, index: usize) -> Option<&(dyn Plugin + 'a)> {
        self.plugins.get(index).map(|p| &**p)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut (dyn Plugin + 'a)> {
        self.plugins.get_mut(index).map(|p| &mut **p)
    }

    /// Id of the plugin at `index`
    pub fn id_at(&self, index: usize) -> Option<&'static str> {
        self.plugins.get(index).map(|p| p.id())
    }

    pub fn count(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Check if registration is closed
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Close registration
    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    /// Snapshot of the id table for use outside the control loop
    pub fn directory(&self) -> PluginDirectory {
        let mut ids = Vec::new();
        for plugin in self.plugins.iter() {
            // Same capacity as the registry
            let _ = ids.push(plugin.id());
        }
        PluginDirectory { ids }
    }
}

/// Immutable id → index table
///
/// Lets the remote link validate and resolve ids on its own execution
/// context, then hand the scheduler a plain index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginDirectory {
    ids: Vec<&'static str, MAX_PLUGINS>,
}

impl PluginDirectory {
    pub fn resolve(&self, id: &str) -> Result<usize, SelectError> {
        self.ids
            .iter()
            .position(|&known| known == id)
            .ok_or(SelectError::NotFound)
    }

    pub fn id(&self, index: usize) -> Option<&'static str> {
        self.ids.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ids.iter().copied()
    }
}
