//! Falling sand over a static obstacle mask.
//!
//! Each frame the front end feeds pointer and key events into a
//! [`Universe`], which stamps sand or obstacles under the pointer and then
//! advances the [`Grid`] by one double-buffered [`step`]. The renderer reads
//! the two matrices back out, either as quads ([`render::quads`]) or as an
//! RGBA cell image.

pub mod config;
pub mod grid;
pub mod input;
pub mod render;
pub mod step;
pub mod universe;


pub use config::{Config, ConfigError};
pub use grid::Grid;
pub use universe::Universe;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed, which is fine.
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("sandfall wasm module loaded");
}
