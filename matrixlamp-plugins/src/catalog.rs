//! Plugin catalog
//!
//! Owns one instance of every built-in plugin and registers them in the
//! order given by `[plugins] order` in `lamp.toml`.

use core::fmt;

use heapless::String;
use matrixlamp_core::plugin::{Plugin, Registry, RegistryError, MAX_ID_LEN};

use crate::{
    BreakoutPlugin, CirclePlugin, DrawPlugin, FireworkPlugin, LifePlugin, LinesPlugin, RainPlugin,
    SnakePlugin, StarsPlugin,
};

/// Built-in cycling order, used when the configured order is empty
pub const BUILTIN_ORDER: [&str; 9] = [
    "draw", "snake", "life", "stars", "lines", "circle", "rain", "breakout", "firework",
];

/// Catalog registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CatalogError {
    /// Configured id names no built-in plugin
    UnknownPlugin,
    Registry(RegistryError),
}

impl From<RegistryError> for CatalogError {
    fn from(err: RegistryError) -> Self {
        CatalogError::Registry(err)
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownPlugin => f.write_str("unknown plugin id"),
            CatalogError::Registry(err) => err.fmt(f),
        }
    }
}

/// One instance of each built-in plugin
pub struct PluginCatalog {
    draw: DrawPlugin,
    snake: SnakePlugin,
    life: LifePlugin,
    stars: StarsPlugin,
    lines: LinesPlugin,
    circle: CirclePlugin,
    rain: RainPlugin,
    breakout: BreakoutPlugin,
    firework: FireworkPlugin,
}

impl PluginCatalog {
    /// Create the catalog; `seed` feeds the random plugins
    pub fn new(seed: u32) -> Self {
        Self {
            draw: DrawPlugin::new(),
            snake: SnakePlugin::new(seed),
            life: LifePlugin::new(seed.rotate_left(8)),
            stars: StarsPlugin::new(seed.rotate_left(16)),
            lines: LinesPlugin::new(),
            circle: CirclePlugin::new(),
            rain: RainPlugin::new(seed.rotate_left(24)),
            breakout: BreakoutPlugin::new(seed ^ 0x5555_5555),
            firework: FireworkPlugin::new(seed.rotate_left(12) ^ 0xAAAA_AAAA),
        }
    }

    /// Check if `id` names a built-in plugin
    pub fn knows(id: &str) -> bool {
        BUILTIN_ORDER.contains(&id)
    }

    /// Register plugins with `registry`
    ///
    /// An empty `order` registers everything in [`BUILTIN_ORDER`]. Otherwise
    /// only the listed plugins are registered, in the listed order. Returns
    /// the number registered.
    pub fn register_into<'a>(
        &'a mut self,
        registry: &mut Registry<'a>,
        order: &[String<MAX_ID_LEN>],
    ) -> Result<usize, CatalogError> {
        // Same order as BUILTIN_ORDER
        let mut slots: [Option<&'a mut dyn Plugin>; BUILTIN_ORDER.len()] = [
            Some(&mut self.draw),
            Some(&mut self.snake),
            Some(&mut self.life),
            Some(&mut self.stars),
            Some(&mut self.lines),
            Some(&mut self.circle),
            Some(&mut self.rain),
            Some(&mut self.breakout),
            Some(&mut self.firework),
        ];

        if order.is_empty() {
            for slot in slots.iter_mut() {
                if let Some(plugin) = slot.take() {
                    registry.register(plugin)?;
                }
            }
            return Ok(BUILTIN_ORDER.len());
        }

        for id in order {
            let index = BUILTIN_ORDER
                .iter()
                .position(|&known| known == id.as_str())
                .ok_or(CatalogError::UnknownPlugin)?;
            let plugin = slots[index].take().ok_or(RegistryError::DuplicateId)?;
            registry.register(plugin)?;
        }
        Ok(order.len())
    }
}
