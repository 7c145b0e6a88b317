//! One tick of gravity: sand falls down, then down-left, then down-right.
//!
//! Every decision reads the frozen `current` buffer and writes only `next`,
//! so scan order cannot cause a grain to move twice in one tick. Two grains
//! that pick the same empty destination both write it and merge into one.

/// Where a grain goes this tick, in priority order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Move {
    Down,
    DownLeft,
    DownRight,
}

impl Move {
    /// Column offset of the destination; the row offset is always +1.
    #[must_use]
    pub fn dx(self) -> isize {
        match self {
            Self::Down => 0,
            Self::DownLeft => -1,
            Self::DownRight => 1,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct StepReport {
    /// Source cells that vacated this tick.
    pub moved: usize,
}

impl StepReport {
    /// Nothing moved, so every following tick is a no-op too.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.moved == 0
    }
}

/// Pick the move for the grain at `(col, row)`, reading only `current`.
///
/// Returns `None` on the last row or when all three targets are sand or
/// obstacle.
#[must_use]
pub fn choose_move(
    current: &[bool],
    obstacles: &[bool],
    width: usize,
    height: usize,
    col: usize,
    row: usize,
) -> Option<Move> {
    if row + 1 >= height {
        return None;
    }
    let below = (row + 1) * width + col;
    let open = |idx: usize| !current[idx] && !obstacles[idx];

    if open(below) {
        Some(Move::Down)
    } else if col > 0 && open(below - 1) {
        Some(Move::DownLeft)
    } else if col + 1 < width && open(below + 1) {
        Some(Move::DownRight)
    } else {
        None
    }
}

/// Compute `next` from `current`. Both buffers are `width * height`, row-major.
///
/// Rows are scanned from `height - 2` up to 0, columns left to right.
pub fn step(
    current: &[bool],
    obstacles: &[bool],
    next: &mut [bool],
    width: usize,
    height: usize,
) -> StepReport {
    debug_assert_eq!(current.len(), width * height);
    debug_assert_eq!(obstacles.len(), current.len());
    debug_assert_eq!(next.len(), current.len());

    next.copy_from_slice(current);
    let mut report = StepReport::default();
    if height < 2 {
        return report;
    }

    for row in (0..height - 1).rev() {
        for col in 0..width {
            let here = row * width + col;
            if !current[here] {
                continue;
            }
            // `here` is sand in `current`, so no other grain can target it:
            // clearing it never erases a grain that just arrived.
            if let Some(mv) = choose_move(current, obstacles, width, height, col, row) {
                let dest = (here + width).wrapping_add_signed(mv.dx());
                next[here] = false;
                next[dest] = true;
                report.moved += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: usize = 4;
    const H: usize = 3;

    fn idx(col: usize, row: usize) -> usize {
        row * W + col
    }

    fn run(current: &[bool], obstacles: &[bool]) -> (Vec<bool>, StepReport) {
        let mut next = vec![false; current.len()];
        let report = step(current, obstacles, &mut next, W, H);
        (next, report)
    }

    #[test]
    fn falls_straight_down_first() {
        let mut sand = vec![false; W * H];
        sand[idx(1, 0)] = true;
        let (next, report) = run(&sand, &[false; W * H]);
        assert!(!next[idx(1, 0)]);
        assert!(next[idx(1, 1)]);
        assert_eq!(report.moved, 1);
    }

    #[test]
    fn obstacle_below_forces_down_left() {
        let mut sand = vec![false; W * H];
        let mut obstacles = vec![false; W * H];
        sand[idx(1, 0)] = true;
        obstacles[idx(1, 1)] = true;
        let (next, _) = run(&sand, &obstacles);
        assert!(next[idx(0, 1)]);
        assert!(!next[idx(1, 1)]);
        assert!(!next[idx(1, 0)]);
    }

    #[test]
    fn left_edge_skips_down_left() {
        let mut sand = vec![false; W * H];
        let mut obstacles = vec![false; W * H];
        sand[idx(0, 0)] = true;
        obstacles[idx(0, 1)] = true;
        let (next, _) = run(&sand, &obstacles);
        assert!(next[idx(1, 1)]);
    }

    #[test]
    fn right_edge_with_all_blocked_stays() {
        let mut sand = vec![false; W * H];
        let mut obstacles = vec![false; W * H];
        sand[idx(3, 0)] = true;
        obstacles[idx(3, 1)] = true;
        obstacles[idx(2, 1)] = true;
        let (next, report) = run(&sand, &obstacles);
        assert!(next[idx(3, 0)]);
        assert!(report.is_settled());
    }

    #[test]
    fn sand_below_blocks_like_an_obstacle() {
        let mut sand = vec![false; W * H];
        for col in 0..W {
            sand[idx(col, 2)] = true;
        }
        sand[idx(2, 1)] = true;
        let (next, report) = run(&sand, &[false; W * H]);
        assert_eq!(next, sand);
        assert_eq!(report.moved, 0);
    }

    #[test]
    fn frozen_reads_prevent_cascading_falls() {
        // A column of two grains: the lower one falls, and the upper one
        // still sees the lower grain in `current` and slides diagonally.
        let mut sand = vec![false; W * H];
        sand[idx(1, 0)] = true;
        sand[idx(1, 1)] = true;
        let (next, report) = run(&sand, &[false; W * H]);
        assert!(next[idx(1, 2)]);
        assert!(next[idx(0, 1)]);
        assert!(!next[idx(1, 1)]);
        assert_eq!(report.moved, 2);
    }

    #[test]
    fn last_row_never_moves() {
        assert_eq!(choose_move(&[true; W * H], &[false; W * H], W, H, 0, H - 1), None);
    }

    #[test]
    fn single_row_grid_is_static() {
        let sand = [true, false, true];
        let mut next = [false; 3];
        let report = step(&sand, &[false; 3], &mut next, 3, 1);
        assert_eq!(next, sand);
        assert!(report.is_settled());
    }

    #[test]
    fn empty_grid_does_nothing() {
        let mut next: [bool; 0] = [];
        assert!(step(&[], &[], &mut next, 0, 0).is_settled());
    }

    fn arb_buffers(w: usize, h: usize) -> impl Strategy<Value = (Vec<bool>, Vec<bool>)> {
        (
            proptest::collection::vec(any::<bool>(), w * h),
            proptest::collection::vec(prop::bool::weighted(0.2), w * h),
        )
    }

    proptest! {
        #[test]
        fn prop_each_grain_stays_or_lands_on_its_chosen_target(
            (sand, obstacles) in arb_buffers(12, 10),
        ) {
            let (w, h) = (12, 10);
            let mut next = vec![false; w * h];
            step(&sand, &obstacles, &mut next, w, h);

            for row in 0..h - 1 {
                for col in 0..w {
                    let here = row * w + col;
                    if !sand[here] {
                        continue;
                    }
                    match choose_move(&sand, &obstacles, w, h, col, row) {
                        None => prop_assert!(next[here]),
                        Some(mv) => {
                            let dest = (here + w).wrapping_add_signed(mv.dx());
                            prop_assert!(!next[here]);
                            prop_assert!(next[dest]);
                            prop_assert!(!sand[dest] && !obstacles[dest]);
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_sand_count_never_increases(
            (sand, obstacles) in arb_buffers(16, 16),
        ) {
            let mut next = vec![false; sand.len()];
            let report = step(&sand, &obstacles, &mut next, 16, 16);
            let before = sand.iter().filter(|&&s| s).count();
            let after = next.iter().filter(|&&s| s).count();
            prop_assert!(after <= before);
            prop_assert!(before - after <= report.moved);
        }

        #[test]
        fn prop_grains_never_land_on_obstacles(
            (sand, obstacles) in arb_buffers(16, 16),
        ) {
            let mut next = vec![false; sand.len()];
            step(&sand, &obstacles, &mut next, 16, 16);
            for i in 0..sand.len() {
                if next[i] && !sand[i] {
                    prop_assert!(!obstacles[i]);
                }
            }
        }
    }
}
