//! Sand and obstacle matrices plus the pixel-to-cell mapping.

use std::fmt;

use crate::config::Config;
use crate::step::{self, StepReport};

/// Two `width × height` boolean matrices, row-major.
///
/// Out-of-bounds reads see an obstacle and no sand; out-of-bounds writes are
/// no-ops. A cell may hold sand and obstacle at once: stamping an obstacle
/// never clears the sand underneath.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    /// Edge length of one cell in pixels, at least 1.
    pub cell_size: u32,
    /// Ticks completed since construction.
    pub generation: u64,
    sand: Vec<bool>,
    obstacles: Vec<bool>,
    /// Write buffer for the next tick, swapped with `sand` afterwards.
    back: Vec<bool>,
}

impl Grid {
    #[must_use]
    pub fn new(width: usize, height: usize, cell_size: u32) -> Self {
        let len = width * height;
        log::debug!("allocating {width}x{height} grid, {cell_size}px cells");
        Self {
            width,
            height,
            cell_size: cell_size.max(1),
            generation: 0,
            sand: vec![false; len],
            obstacles: vec![false; len],
            back: vec![false; len],
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.grid_width(), config.grid_height(), config.cell_size)
    }

    #[must_use]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && (col as usize) < self.width && row >= 0 && (row as usize) < self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.in_bounds(col, row)
            .then(|| row as usize * self.width + col as usize)
    }

    /// Floor division of both pixel coordinates by the cell size.
    ///
    /// Rounds toward negative infinity, so pixel `-1` lands in column `-1`
    /// and stays out of bounds.
    #[must_use]
    pub fn map_to_cell(&self, px: i32, py: i32) -> (i32, i32) {
        let size = self.cell_size as i32;
        (px.div_euclid(size), py.div_euclid(size))
    }

    #[must_use]
    pub fn is_sand(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_some_and(|i| self.sand[i])
    }

    #[must_use]
    pub fn is_obstacle(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_none_or(|i| self.obstacles[i])
    }

    /// Raw cell write, ignoring obstacles.
    pub fn set_sand(&mut self, col: i32, row: i32, sand: bool) {
        if let Some(i) = self.index(col, row) {
            self.sand[i] = sand;
        }
    }

    pub fn set_obstacle_cell(&mut self, col: i32, row: i32, obstacle: bool) {
        if let Some(i) = self.index(col, row) {
            self.obstacles[i] = obstacle;
        }
    }

    /// Drop a grain at a pixel position.
    ///
    /// Returns `false` when the pixel is off the grid or over an obstacle;
    /// neither case is an error.
    pub fn spawn_sand(&mut self, px: i32, py: i32) -> bool {
        let (col, row) = self.map_to_cell(px, py);
        match self.index(col, row) {
            Some(i) if !self.obstacles[i] => {
                self.sand[i] = true;
                true
            }
            _ => false,
        }
    }

    /// Stamp (or erase, with `remove`) a square of obstacles of half-width
    /// `radius` centred on a pixel.
    ///
    /// The centre cell must be on the grid; neighbours that fall off an edge
    /// are skipped. Writes are overwrites, so repeating a call is a no-op.
    pub fn set_obstacle(&mut self, px: i32, py: i32, remove: bool, radius: i32) {
        let (col, row) = self.map_to_cell(px, py);
        if !self.in_bounds(col, row) {
            return;
        }
        // Only the on-grid part of the square is walked, so huge radii stay cheap.
        let last_col = i32::try_from(self.width - 1).unwrap_or(i32::MAX);
        let last_row = i32::try_from(self.height - 1).unwrap_or(i32::MAX);
        let cols = col.saturating_sub(radius).max(0)..=col.saturating_add(radius).min(last_col);
        let rows = row.saturating_sub(radius).max(0)..=row.saturating_add(radius).min(last_row);
        for r in rows {
            for c in cols.clone() {
                self.set_obstacle_cell(c, r, !remove);
            }
        }
    }

    /// Advance one tick: fill the back buffer from the frozen sand matrix,
    /// then swap it in.
    pub fn tick(&mut self) -> StepReport {
        self.generation = self.generation.wrapping_add(1);
        let report = step::step(
            &self.sand,
            &self.obstacles,
            &mut self.back,
            self.width,
            self.height,
        );
        std::mem::swap(&mut self.sand, &mut self.back);
        log::trace!("tick {}: {} grains moved", self.generation, report.moved);
        report
    }

    /// Row-major occupancy, `width * height` long.
    #[must_use]
    pub fn sand(&self) -> &[bool] {
        &self.sand
    }

    #[must_use]
    pub fn obstacles(&self) -> &[bool] {
        &self.obstacles
    }

    #[must_use]
    pub fn sand_count(&self) -> usize {
        self.sand.iter().filter(|&&s| s).count()
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.iter().filter(|&&o| o).count()
    }
}

/// One line per row: `.` empty, `s` sand, `#` obstacle, `@` both.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.width.max(1);
        for (sand_row, obstacle_row) in self.sand.chunks(w).zip(self.obstacles.chunks(w)) {
            for (&sand, &obstacle) in sand_row.iter().zip(obstacle_row) {
                let c = match (sand, obstacle) {
                    (false, false) => '.',
                    (true, false) => 's',
                    (false, true) => '#',
                    (true, true) => '@',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl Grid {
    /// Build a grid with 1px cells from rows drawn in the `Display` alphabet.
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut grid = Self::new(width, height, 1);
        for (row, line) in rows.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                let (col, row) = (col as i32, row as i32);
                grid.set_sand(col, row, matches!(c, 's' | '@'));
                grid.set_obstacle_cell(col, row, matches!(c, '#' | '@'));
            }
        }
        grid
    }
}
