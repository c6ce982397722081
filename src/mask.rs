//! Heart silhouette on a square cell grid.
//!
//! Classic implicit heart `(x² + y² - 1)³ - x²y³ <= 0`, evaluated on
//! independently scaled axes (narrower in x, taller in y) with a tightened
//! threshold. The raw curve leaves two "ears" at the top; a rectangular
//! valley around the centre line is carved out so the top reads as a heart.

use crate::config::FxConfig;
use crate::surface::Viewport;

/// Cells with `v` above this are dropped (keeps only strong inside points).
pub const INSIDE_THRESHOLD: f64 = -0.11;
/// Horizontal scale as a fraction of `cols`.
pub const X_SCALE: f64 = 0.30;
/// Vertical scale as a fraction of `rows`.
pub const Y_SCALE: f64 = 0.40;
/// Valley carve: `|nx| < VALLEY_HALF_WIDTH && VALLEY_Y.0 < ny < VALLEY_Y.1`.
pub const VALLEY_HALF_WIDTH: f64 = 0.35;
pub const VALLEY_Y: (f64, f64) = (0.65, 1.18);

/// Square grid centred in the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Heart square side in logical pixels.
    pub size: f64,
    pub cell: u32,
    pub cols: u32,
    pub rows: u32,
    /// Top-left corner of the grid in logical pixels.
    pub left: f64,
    pub top: f64,
}

impl GridLayout {
    pub fn for_viewport(viewport: &Viewport, cfg: &FxConfig) -> Self {
        let size = viewport.min_side() * cfg.size_fraction;
        let cell = cfg.min_cell.max((size / cfg.cells_across as f64).floor() as u32);
        let cols = (size / cell as f64).floor() as u32;
        let rows = cols;
        Self {
            size,
            cell,
            cols,
            rows,
            left: (viewport.width - size) / 2.0,
            top: (viewport.height - size) / 2.0,
        }
    }

    /// Logical pixel position of the top-left corner of cell `(x, y)`.
    pub fn cell_origin(&self, x: f64, y: f64) -> (f64, f64) {
        let c = self.cell as f64;
        (self.left + x.floor() * c, self.top + y.floor() * c)
    }
}

/// Centred, scaled coordinates of a cell; `ny` grows toward the top.
pub fn normalize(x: u32, y: u32, cols: u32, rows: u32) -> (f64, f64) {
    let (cols, rows) = (cols as f64, rows as f64);
    let nx = (x as f64 - cols / 2.0) / (cols * X_SCALE);
    let ny = -(y as f64 - rows / 2.0) / (rows * Y_SCALE);
    (nx, ny)
}

pub fn heart_value(nx: f64, ny: f64) -> f64 {
    let a = nx * nx + ny * ny - 1.0;
    a * a * a - (nx * nx) * (ny * ny * ny)
}

pub fn in_valley(nx: f64, ny: f64) -> bool {
    nx.abs() < VALLEY_HALF_WIDTH && ny > VALLEY_Y.0 && ny < VALLEY_Y.1
}

pub fn is_inside(nx: f64, ny: f64) -> bool {
    heart_value(nx, ny) <= INSIDE_THRESHOLD && !in_valley(nx, ny)
}

/// Inside cells for one run, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeartMask {
    pub cols: u32,
    pub rows: u32,
    cells: Vec<(u32, u32)>,
}

impl HeartMask {
    pub fn generate(cols: u32, rows: u32) -> Self {
        let mut cells = Vec::new();
        for y in 0..rows {
            for x in 0..cols {
                let (nx, ny) = normalize(x, y, cols, rows);
                if is_inside(nx, ny) {
                    cells.push((x, y));
                }
            }
        }
        Self { cols, rows, cells }
    }

    pub fn for_layout(layout: &GridLayout) -> Self {
        Self::generate(layout.cols, layout.rows)
    }

    pub fn cells(&self) -> &[(u32, u32)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        // row-major order == lexicographic on (y, x)
        self.cells
            .binary_search_by(|&(cx, cy)| (cy, cx).cmp(&(y, x)))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_for_1000px_viewport() {
        let vp = Viewport::new(1000.0, 1400.0, 1.0);
        let layout = GridLayout::for_viewport(&vp, &FxConfig::default());
        assert!((layout.size - 580.0).abs() < 1e-9);
        assert_eq!(layout.cell, 7);
        assert_eq!(layout.cols, 82);
        assert_eq!(layout.rows, 82);
        assert!((layout.left - 210.0).abs() < 1e-9);
        assert!((layout.top - 410.0).abs() < 1e-9);
    }

    #[test]
    fn small_viewport_uses_min_cell() {
        let vp = Viewport::new(320.0, 640.0, 3.0);
        let layout = GridLayout::for_viewport(&vp, &FxConfig::default());
        assert_eq!(layout.cell, 6);
        assert_eq!(layout.cols, (320.0 * 0.58 / 6.0_f64).floor() as u32);
    }

    #[test]
    fn degenerate_viewport_gives_empty_grid() {
        let layout = GridLayout::for_viewport(&Viewport::new(0.0, 0.0, 1.0), &FxConfig::default());
        assert_eq!(layout.cols, 0);
        assert!(HeartMask::for_layout(&layout).is_empty());
    }

    #[test]
    fn centre_is_inside_corners_are_not() {
        let mask = HeartMask::generate(82, 82);
        assert!(mask.contains(41, 45));
        assert!(!mask.contains(0, 0));
        assert!(!mask.contains(81, 81));
    }

    #[test]
    fn valley_region_is_excluded() {
        // Straight above the centre, inside the valley band.
        assert!(in_valley(0.0, 0.9));
        assert!(!is_inside(0.0, 0.9));
        assert!(!in_valley(0.0, 0.65));
        assert!(!in_valley(0.35, 0.9));
    }

    #[test]
    fn cell_origin_floors_position() {
        let layout = GridLayout {
            size: 70.0,
            cell: 7,
            cols: 10,
            rows: 10,
            left: 5.0,
            top: 15.0,
        };
        assert_eq!(layout.cell_origin(2.9, 0.1), (19.0, 15.0));
        assert_eq!(layout.cell_origin(-0.5, 1.0), (-2.0, 22.0));
    }
}
