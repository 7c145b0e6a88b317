//! Read-only views of a [`Grid`] for the renderer.

use crate::Grid;

pub const BACKGROUND_RGB: [f32; 3] = [0.0, 0.0, 0.0];
pub const SAND_RGB: [f32; 3] = [0.76, 0.70, 0.50];
pub const OBSTACLE_RGB: [f32; 3] = [0.6, 0.2, 0.2];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuadKind {
    Sand,
    Obstacle,
}

impl QuadKind {
    #[must_use]
    pub fn rgb(self) -> [f32; 3] {
        match self {
            Self::Sand => SAND_RGB,
            Self::Obstacle => OBSTACLE_RGB,
        }
    }
}

/// A filled square in window pixels, top-left origin.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Quad {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub kind: QuadKind,
}

fn layer(cells: &[bool], width: usize, size: u32, kind: QuadKind) -> impl Iterator<Item = Quad> + '_ {
    cells
        .iter()
        .enumerate()
        .filter(|(_, &set)| set)
        .map(move |(i, _)| Quad {
            x: (i % width) as u32 * size,
            y: (i / width) as u32 * size,
            size,
            kind,
        })
}

/// One quad per set cell: all sand first, then all obstacles, so obstacles
/// paint over sand sharing their cell.
pub fn quads(grid: &Grid) -> impl Iterator<Item = Quad> + '_ {
    let (width, size) = (grid.width.max(1), grid.cell_size);
    layer(grid.sand(), width, size, QuadKind::Sand)
        .chain(layer(grid.obstacles(), width, size, QuadKind::Obstacle))
}

fn to_rgba8(rgb: [f32; 3]) -> [u8; 4] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(rgb[0]), channel(rgb[1]), channel(rgb[2]), 255]
}

/// Write one RGBA pixel per cell into `out` (`width * height * 4` bytes).
///
/// The front end scales the image up by `cell_size` when it blits.
pub fn fill_rgba(grid: &Grid, out: &mut [u8]) {
    debug_assert_eq!(out.len(), grid.sand().len() * 4);
    let background = to_rgba8(BACKGROUND_RGB);
    let sand = to_rgba8(SAND_RGB);
    let obstacle = to_rgba8(OBSTACLE_RGB);

    for ((pixel, &is_sand), &is_obstacle) in out
        .chunks_exact_mut(4)
        .zip(grid.sand())
        .zip(grid.obstacles())
    {
        let color = if is_obstacle {
            obstacle
        } else if is_sand {
            sand
        } else {
            background
        };
        pixel.copy_from_slice(&color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quads_are_sand_then_obstacles() {
        let mut grid = Grid::new(4, 3, 5);
        grid.set_obstacle_cell(0, 0, true);
        grid.set_sand(3, 2, true);
        grid.set_sand(1, 0, true);

        let got: Vec<Quad> = quads(&grid).collect();
        assert_eq!(
            got,
            vec![
                Quad { x: 5, y: 0, size: 5, kind: QuadKind::Sand },
                Quad { x: 15, y: 10, size: 5, kind: QuadKind::Sand },
                Quad { x: 0, y: 0, size: 5, kind: QuadKind::Obstacle },
            ]
        );
    }

    #[test]
    fn empty_grid_has_no_quads() {
        assert_eq!(quads(&Grid::new(16, 16, 5)).count(), 0);
    }

    #[test]
    fn rgba_obstacle_paints_over_sand() {
        let mut grid = Grid::new(3, 1, 5);
        grid.set_sand(0, 0, true);
        grid.set_sand(1, 0, true);
        grid.set_obstacle_cell(1, 0, true);

        let mut out = vec![0; 3 * 4];
        fill_rgba(&grid, &mut out);
        assert_eq!(out[0..4], to_rgba8(SAND_RGB));
        assert_eq!(out[4..8], to_rgba8(OBSTACLE_RGB));
        assert_eq!(out[8..12], [0, 0, 0, 255]);
        assert_eq!(to_rgba8(OBSTACLE_RGB), [153, 51, 51, 255]);
    }

    #[test]
    fn quad_kind_colors() {
        assert_eq!(QuadKind::Sand.rgb(), SAND_RGB);
        assert_eq!(QuadKind::Obstacle.rgb(), OBSTACLE_RGB);
    }
}
