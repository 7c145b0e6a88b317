//! Pointer and keyboard state, and what a frame of held input does to the grid.

use rand::Rng;

use crate::config::Config;
use crate::Grid;

/// Keys the front end forwards. Codes are the values passed across the WASM
/// boundary.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    /// "1": stamp obstacles while held.
    PlaceObstacle = 1,
    /// "2": erase obstacles while held.
    RemoveObstacle = 2,
    /// Either Shift: spray extra sand around the pointer.
    Burst = 3,
}

impl Key {
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::PlaceObstacle),
            2 => Some(Self::RemoveObstacle),
            3 => Some(Self::Burst),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    /// Pointer position in window pixels.
    PointerMove { x: i32, y: i32 },
    PointerDown,
    PointerUp,
    KeyDown(Key),
    KeyUp(Key),
    Quit,
}

/// Held signals accumulated from events.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InputState {
    pub pointer: (i32, i32),
    pub primary_held: bool,
    pub place_mode: bool,
    pub remove_mode: bool,
    pub burst_held: bool,
    pub quit: bool,
}

impl InputState {
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer = (x, y),
            InputEvent::PointerDown => self.primary_held = true,
            InputEvent::PointerUp => self.primary_held = false,
            InputEvent::KeyDown(key) => self.set_key(key, true),
            InputEvent::KeyUp(key) => self.set_key(key, false),
            InputEvent::Quit => {
                log::info!("quit requested");
                self.quit = true;
            }
        }
    }

    fn set_key(&mut self, key: Key, held: bool) {
        match key {
            Key::PlaceObstacle => self.place_mode = held,
            Key::RemoveObstacle => self.remove_mode = held,
            Key::Burst => self.burst_held = held,
        }
    }

    /// What the primary action does this frame. Place wins over remove.
    #[must_use]
    pub fn action(&self) -> Action {
        if !self.primary_held {
            Action::Idle
        } else if self.place_mode {
            Action::PlaceObstacle
        } else if self.remove_mode {
            Action::RemoveObstacle
        } else if self.burst_held {
            Action::SpawnBurst
        } else {
            Action::Spawn
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Idle,
    PlaceObstacle,
    RemoveObstacle,
    Spawn,
    /// The centred spawn plus `burst_count` jittered ones.
    SpawnBurst,
}

/// Apply one frame of held input at the current pointer position.
pub fn apply_frame_input<R: Rng + ?Sized>(
    grid: &mut Grid,
    input: &InputState,
    config: &Config,
    rng: &mut R,
) {
    let (x, y) = input.pointer;
    match input.action() {
        Action::Idle => {}
        Action::PlaceObstacle => grid.set_obstacle(x, y, false, config.obstacle_radius),
        Action::RemoveObstacle => grid.set_obstacle(x, y, true, config.obstacle_radius),
        Action::Spawn => {
            grid.spawn_sand(x, y);
        }
        Action::SpawnBurst => {
            grid.spawn_sand(x, y);
            spawn_burst(grid, x, y, config, rng);
        }
    }
}

/// Scatter `burst_count` spawns around a pixel, each offset by a whole number
/// of cells drawn from `[-burst_jitter, burst_jitter)` on both axes.
pub fn spawn_burst<R: Rng + ?Sized>(grid: &mut Grid, x: i32, y: i32, config: &Config, rng: &mut R) {
    if config.burst_jitter <= 0 {
        for _ in 0..config.burst_count {
            grid.spawn_sand(x, y);
        }
        return;
    }
    let jitter = config.burst_jitter;
    let step = config.cell_size as i32;
    for _ in 0..config.burst_count {
        let dx = rng.random_range(-jitter..jitter);
        let dy = rng.random_range(-jitter..jitter);
        // Saturates so pointers near the i32 limits land off-grid instead of wrapping.
        grid.spawn_sand(
            x.saturating_add(dx.saturating_mul(step)),
            y.saturating_add(dy.saturating_mul(step)),
        );
    }
}
