//! Built-in plugins
//!
//! Each plugin is an independent implementation of
//! [`Plugin`](matrixlamp_core::Plugin). [`PluginCatalog`] owns one instance
//! of each and registers them with the scheduler's registry in the
//! configured order.
//!
//! | id         | Program                                  | Remote input        |
//! |------------|------------------------------------------|---------------------|
//! | `draw`     | Canvas painted over the remote link      | `SetPixel`, `Clear` |
//! | `snake`    | Self-playing snake                       | `Steer`             |
//! | `life`     | Conway's Game of Life on a torus         |                     |
//! | `stars`    | Twinkling star field                     |                     |
//! | `lines`    | Sweeping scan lines                      |                     |
//! | `circle`   | Expanding rings                          |                     |
//! | `rain`     | Falling drops with trails                |                     |
//! | `breakout` | Self-playing Breakout                    |                     |
//! | `firework` | Rockets bursting into sparks             |                     |

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod breakout;
pub mod catalog;
pub mod circle;
pub mod draw;
pub mod firework;
pub mod life;
pub mod lines;
pub mod pace;
pub mod rain;
pub mod rng;
pub mod snake;
pub mod stars;

pub use breakout::BreakoutPlugin;
pub use catalog::{CatalogError, PluginCatalog, BUILTIN_ORDER};
pub use circle::CirclePlugin;
pub use draw::DrawPlugin;
pub use firework::FireworkPlugin;
pub use life::LifePlugin;
pub use lines::LinesPlugin;
pub use rain::RainPlugin;
pub use snake::SnakePlugin;
pub use stars::StarsPlugin;
