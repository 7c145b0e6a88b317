//! WASM-facing wrapper: owns the grid, the held input and the burst RNG, and
//! runs one frame per call from the browser's animation loop.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::input::{self, InputEvent, InputState, Key};
use crate::render::{self, QuadKind};
use crate::step::StepReport;
use crate::Grid;

#[wasm_bindgen]
#[derive(Debug)]
pub struct Universe {
    grid: Grid,
    config: Config,
    input: InputState,
    rng: Pcg32,
    rgba: Vec<u8>,
    /// Set once a frame has completed after quit.
    halted: bool,
}

impl Universe {
    #[must_use]
    pub fn from_config(config: Config, seed: u64) -> Self {
        let grid = Grid::from_config(&config);
        log::info!(
            "universe {}x{} cells ({}px), seed {seed}",
            grid.width,
            grid.height,
            grid.cell_size
        );
        let rgba = vec![0; grid.width * grid.height * 4];
        Self {
            grid,
            config,
            input: InputState::default(),
            rng: Pcg32::seed_from_u64(seed),
            rgba,
            halted: false,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn handle(&mut self, event: InputEvent) {
        self.input.handle(event);
    }

    /// Apply held input, then advance one tick.
    pub fn step_frame(&mut self) -> StepReport {
        input::apply_frame_input(&mut self.grid, &self.input, &self.config, &mut self.rng);
        self.grid.tick()
    }
}

#[wasm_bindgen]
impl Universe {
    /// Default 800×600 screen with 5px cells.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_config(Config::default(), seed)
    }

    /// Build from a JSON config; missing fields use the defaults.
    ///
    /// # Errors
    ///
    /// Malformed JSON or an invalid value.
    pub fn with_config(json: &str, seed: u64) -> Result<Universe, JsError> {
        let config = Config::from_json(json)?;
        Ok(Self::from_config(config, seed))
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) {
        self.handle(InputEvent::PointerMove { x, y });
    }

    pub fn pointer_down(&mut self) {
        self.handle(InputEvent::PointerDown);
    }

    pub fn pointer_up(&mut self) {
        self.handle(InputEvent::PointerUp);
    }

    pub fn key_down(&mut self, code: u8) {
        match Key::from_code(code) {
            Some(key) => self.handle(InputEvent::KeyDown(key)),
            None => log::debug!("ignoring key code {code}"),
        }
    }

    pub fn key_up(&mut self, code: u8) {
        if let Some(key) = Key::from_code(code) {
            self.handle(InputEvent::KeyUp(key));
        }
    }

    pub fn quit(&mut self) {
        self.handle(InputEvent::Quit);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.input.quit
    }

    /// Run one frame. A quit received before this call still lets the frame
    /// finish; returns `false` once the loop should stop.
    pub fn frame(&mut self) -> bool {
        if self.halted {
            return false;
        }
        self.step_frame();
        self.halted = self.input.quit;
        !self.halted
    }

    /// Tick without applying input. Returns the number of grains that moved.
    pub fn tick(&mut self) -> u32 {
        self.grid.tick().moved as u32
    }

    pub fn spawn_sand(&mut self, x: i32, y: i32) -> bool {
        self.grid.spawn_sand(x, y)
    }

    /// Stamp or erase an obstacle square with the configured radius.
    pub fn set_obstacle(&mut self, x: i32, y: i32, remove: bool) {
        self.grid.set_obstacle(x, y, remove, self.config.obstacle_radius);
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.grid.width as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.grid.height as u32
    }

    #[must_use]
    pub fn cell_size(&self) -> u32 {
        self.grid.cell_size
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.grid.generation
    }

    #[must_use]
    pub fn sand_count(&self) -> u32 {
        self.grid.sand_count() as u32
    }

    /// Occupancy as one byte per cell, row-major.
    #[must_use]
    pub fn sand_cells(&self) -> Vec<u8> {
        self.grid.sand().iter().map(|&s| u8::from(s)).collect()
    }

    #[must_use]
    pub fn obstacle_cells(&self) -> Vec<u8> {
        self.grid.obstacles().iter().map(|&o| u8::from(o)).collect()
    }

    /// Quads as flat `[x, y, size, kind]` groups, `kind` 0 for sand and 1 for
    /// obstacle, in draw order.
    #[must_use]
    pub fn quad_buffer(&self) -> Vec<u32> {
        render::quads(&self.grid)
            .flat_map(|q| {
                let kind = match q.kind {
                    QuadKind::Sand => 0,
                    QuadKind::Obstacle => 1,
                };
                [q.x, q.y, q.size, kind]
            })
            .collect()
    }

    /// Refresh the RGBA cell image; read it through `rgba_ptr`/`rgba_len`.
    pub fn render(&mut self) {
        render::fill_rgba(&self.grid, &mut self.rgba);
    }

    #[must_use]
    pub fn rgba_ptr(&self) -> *const u8 {
        self.rgba.as_ptr()
    }

    #[must_use]
    pub fn rgba_len(&self) -> usize {
        self.rgba.len()
    }
}
