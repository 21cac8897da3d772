//! Point constrainers: collaborators that snap free-floating points, used by
//! the connect gesture before a tracked offset is stored.

use glam::{DVec2, dvec2};

use super::defaults;

/// A point-snapping policy.
pub trait Constrain {
    fn constrain_point(&self, p: DVec2) -> DVec2;
}

/// Snaps points to the nearest grid intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConstrainer {
    pub cell: DVec2,
}

impl Default for GridConstrainer {
    fn default() -> Self {
        GridConstrainer {
            cell: DVec2::splat(defaults::GRID_SIZE),
        }
    }
}

impl GridConstrainer {
    pub fn new(cell_width: f64, cell_height: f64) -> GridConstrainer {
        GridConstrainer {
            cell: dvec2(cell_width, cell_height),
        }
    }
}

impl Constrain for GridConstrainer {
    fn constrain_point(&self, p: DVec2) -> DVec2 {
        dvec2(
            (p.x / self.cell.x).round() * self.cell.x,
            (p.y / self.cell.y).round() * self.cell.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_constrainer_rounds_to_nearest_cell() {
        let grid = GridConstrainer::new(10.0, 10.0);
        assert_eq!(grid.constrain_point(dvec2(14.0, 26.0)), dvec2(10.0, 30.0));
        assert_eq!(grid.constrain_point(dvec2(15.0, 25.0)), dvec2(20.0, 30.0));
        assert_eq!(grid.constrain_point(dvec2(-4.0, -6.0)), dvec2(-0.0, -10.0));
    }

    #[test]
    fn default_grid_uses_the_default_cell() {
        let grid = GridConstrainer::default();
        assert_eq!(grid.cell, DVec2::splat(defaults::GRID_SIZE));
    }
}
