//! Native driver: runs the frame loop at the configured rate with a scripted
//! pointer, then prints the final grid.
//!
//! Usage: `sandfall-headless [frames] [--fast]`. `--fast` skips the frame cap.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{Duration, Instant};

    use sandfall::input::{InputEvent, Key};
    use sandfall::render::{self, QuadKind};
    use sandfall::{Config, Universe};

    env_logger::init();

    let mut frames: u32 = 600;
    let mut fast = false;
    for arg in std::env::args().skip(1) {
        if arg == "--fast" {
            fast = true;
        } else if let Ok(n) = arg.parse() {
            frames = n;
        } else {
            log::warn!("ignoring argument {arg:?}");
        }
    }

    let config = Config {
        screen_width: 400,
        screen_height: 200,
        ..Config::default()
    };
    let frame_period = Duration::from_micros(config.frame_micros());
    let mut universe = Universe::from_config(config, 0x5a4d);
    log::info!("running {frames} frames");

    // A sloped shelf of obstacles across the middle of the screen.
    universe.handle(InputEvent::KeyDown(Key::PlaceObstacle));
    universe.handle(InputEvent::PointerDown);
    for x in (60..340).step_by(10) {
        universe.handle(InputEvent::PointerMove { x, y: 120 + x / 20 });
        universe.frame();
    }
    universe.handle(InputEvent::PointerUp);
    universe.handle(InputEvent::KeyUp(Key::PlaceObstacle));

    // Pour from above with the burst modifier for the first half.
    universe.handle(InputEvent::PointerMove { x: 200, y: 20 });
    universe.handle(InputEvent::PointerDown);
    universe.handle(InputEvent::KeyDown(Key::Burst));

    let started = Instant::now();
    let mut frame = 0;
    loop {
        let frame_start = Instant::now();
        if frame == frames / 2 {
            universe.handle(InputEvent::PointerUp);
        }
        if frame + 1 >= frames {
            universe.handle(InputEvent::Quit);
        }
        if !universe.frame() {
            break;
        }
        frame += 1;
        if !fast {
            if let Some(rest) = frame_period.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    let (sand_quads, obstacle_quads) =
        render::quads(universe.grid()).fold((0, 0), |(s, o), quad| match quad.kind {
            QuadKind::Sand => (s + 1, o),
            QuadKind::Obstacle => (s, o + 1),
        });
    log::info!("final frame draws {sand_quads} sand and {obstacle_quads} obstacle quads");
    log::info!(
        "{} grains, {} obstacle cells, {} ticks in {:?}",
        universe.grid().sand_count(),
        universe.grid().obstacle_count(),
        universe.grid().generation,
        started.elapsed()
    );
    print!("{}", universe.grid());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser drives `Universe` directly; nothing to run here.
}
