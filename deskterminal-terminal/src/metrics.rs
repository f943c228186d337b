//! Cell metrics and pixel → grid conversion.

use alacritty_terminal::grid::Dimensions;
use portable_pty::PtySize;

/// Size in points of one terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Advance width of `'M'` in the terminal font
    pub char_width: f32,
    pub line_height: f32,
}

impl CellMetrics {
    /// Measure `'M'` in `font_id` using the fonts loaded into `painter`'s context.
    pub fn measure(painter: &egui::Painter, font_id: &egui::FontId) -> Self {
        let galley = painter.layout_no_wrap("M".to_string(), font_id.clone(), egui::Color32::WHITE);
        let size = galley.size();
        Self {
            char_width: size.x.max(1.0),
            line_height: size.y.max(1.0),
        }
    }
}

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub cols: u16,
    pub rows: u16,
}

impl GridSize {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Grid that fits in `width` × `height`, keeping one spare column and row
    /// so the last cell is never clipped at the right or bottom edge.
    ///
    /// Never returns fewer than one column or row.
    pub fn from_pixels(width: f32, height: f32, metrics: CellMetrics) -> Self {
        let fit = |extent: f32, cell: f32| -> u16 {
            if !(extent.is_finite() && cell > 0.0) {
                return 1;
            }
            let cells = (extent / cell).floor() - 1.0;
            cells.clamp(1.0, f32::from(u16::MAX)) as u16
        };
        Self {
            cols: fit(width, metrics.char_width),
            rows: fit(height, metrics.line_height),
        }
    }

    pub fn pty_size(&self) -> PtySize {
        PtySize {
            rows: self.rows,
            cols: self.cols,
            pixel_width: 0,
            pixel_height: 0,
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl Dimensions for GridSize {
    fn total_lines(&self) -> usize {
        self.screen_lines()
    }

    fn screen_lines(&self) -> usize {
        usize::from(self.rows)
    }

    fn columns(&self) -> usize {
        usize::from(self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: CellMetrics = CellMetrics {
        char_width: 8.0,
        line_height: 16.0,
    };

    #[test]
    fn keeps_one_spare_cell() {
        // 600 / 8 = 75 columns, 800 / 16 = 50 rows
        assert_eq!(GridSize::from_pixels(600.0, 800.0, METRICS), GridSize::new(74, 49));
    }

    #[test]
    fn partial_cells_are_floored() {
        assert_eq!(GridSize::from_pixels(607.9, 815.0, METRICS), GridSize::new(74, 49));
    }

    #[test]
    fn tiny_windows_still_get_a_cell() {
        assert_eq!(GridSize::from_pixels(4.0, 4.0, METRICS), GridSize::new(1, 1));
        assert_eq!(GridSize::from_pixels(0.0, -10.0, METRICS), GridSize::new(1, 1));
    }

    #[test]
    fn degenerate_metrics_do_not_divide_by_zero() {
        let zero = CellMetrics {
            char_width: 0.0,
            line_height: 0.0,
        };
        assert_eq!(GridSize::from_pixels(600.0, 800.0, zero), GridSize::new(1, 1));
    }

    #[test]
    fn pty_size_matches_grid() {
        let size = GridSize::new(120, 40).pty_size();
        assert_eq!((size.cols, size.rows), (120, 40));
    }
}
