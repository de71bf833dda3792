use crate::color::ColorScheme;
use crate::simulation::Cell;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Half-block rendering: each terminal character shows two vertically
/// stacked grid cells through `▀`, with the foreground color carrying the
/// upper cell and the background color the lower one. One character column
/// therefore maps to one grid column and one character row to two grid rows.
pub const HALF_BLOCK: char = '▀';

/// Smallest grid dimension the auto-sizer will produce
const MIN_GRID_DIM: usize = 16;

/// Colors for a single rendered character cell
#[derive(Clone, Copy)]
pub struct BlockCell {
    pub fg: Color,
    pub bg: Color,
}

/// Render a grid snapshot to half-block cells, nearest-point sampling when
/// the grid and canvas resolutions differ. Cells come back row-major,
/// `canvas_width` per row.
pub fn render_to_blocks(
    snapshot: &[Cell],
    grid_width: usize,
    grid_height: usize,
    canvas_width: u16,
    canvas_height: u16,
    scheme: ColorScheme,
) -> Vec<BlockCell> {
    if grid_width == 0 || grid_height == 0 {
        return Vec::new();
    }
    let rows = (canvas_height as usize * 2).max(1);
    let scale_x = grid_width as f32 / (canvas_width as f32).max(1.0);
    let scale_y = grid_height as f32 / rows as f32;

    let sample = |block_x: usize, block_y: usize| -> Cell {
        let x = ((block_x as f32 * scale_x) as usize).min(grid_width - 1);
        let y = ((block_y as f32 * scale_y) as usize).min(grid_height - 1);
        snapshot[y * grid_width + x]
    };

    let mut cells = Vec::with_capacity(canvas_width as usize * canvas_height as usize);
    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let top = sample(cx as usize, cy as usize * 2);
            let bottom = sample(cx as usize, cy as usize * 2 + 1);
            cells.push(BlockCell {
                fg: scheme.cell_color(top),
                bg: scheme.cell_color(bottom),
            });
        }
    }
    cells
}

/// Grid size matching the canvas resolution (two grid rows per character row)
pub fn calculate_simulation_size(canvas_width: u16, canvas_height: u16) -> (usize, usize) {
    let width = (canvas_width as usize).max(MIN_GRID_DIM);
    let height = (canvas_height as usize * 2).max(MIN_GRID_DIM);
    (width, height)
}

/// Translate a mouse position (terminal coordinates) into the grid cell
/// under the upper half of the clicked character. Returns None outside the
/// canvas. This is the input collaborator's pixel-to-cell division: the
/// character cell is the fixed-size square region, sized one grid column by
/// two grid rows.
pub fn map_click(
    column: u16,
    row: u16,
    canvas: Rect,
    grid_width: usize,
    grid_height: usize,
) -> Option<(usize, usize)> {
    if grid_width == 0 || grid_height == 0 {
        return None;
    }
    if column < canvas.x
        || row < canvas.y
        || column >= canvas.x + canvas.width
        || row >= canvas.y + canvas.height
    {
        return None;
    }
    let rows = (canvas.height as usize * 2).max(1);
    let scale_x = grid_width as f32 / (canvas.width as f32).max(1.0);
    let scale_y = grid_height as f32 / rows as f32;

    let gx = (((column - canvas.x) as f32) * scale_x) as usize;
    let gy = ((((row - canvas.y) as usize * 2) as f32) * scale_y) as usize;
    Some((gx.min(grid_width - 1), gy.min(grid_height - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_size_is_double_height() {
        assert_eq!(calculate_simulation_size(80, 24), (80, 48));
        // Tiny canvases still get a usable grid
        assert_eq!(calculate_simulation_size(2, 2), (16, 16));
    }

    #[test]
    fn test_render_covers_the_whole_canvas() {
        let snapshot = vec![Cell::Tree; 10 * 20];
        let cells = render_to_blocks(&snapshot, 10, 20, 10, 10, ColorScheme::Classic);
        assert_eq!(cells.len(), 100);
        let scheme = ColorScheme::Classic;
        // All-tree grid renders tree-on-tree everywhere
        for cell in &cells {
            assert_eq!(cell.fg, scheme.cell_color(Cell::Tree));
            assert_eq!(cell.bg, scheme.cell_color(Cell::Tree));
        }
    }

    #[test]
    fn test_render_splits_character_rows() {
        // Alternating rows: even rows trees, odd rows empty
        let mut snapshot = vec![Cell::Empty; 4 * 4];
        for y in (0..4).step_by(2) {
            for x in 0..4 {
                snapshot[y * 4 + x] = Cell::Tree;
            }
        }
        let scheme = ColorScheme::Classic;
        let cells = render_to_blocks(&snapshot, 4, 4, 4, 2, scheme);
        for cell in &cells {
            assert_eq!(cell.fg, scheme.cell_color(Cell::Tree));
            assert_eq!(cell.bg, scheme.cell_color(Cell::Empty));
        }
    }

    #[test]
    fn test_map_click_identity_scale() {
        let canvas = Rect {
            x: 3,
            y: 2,
            width: 10,
            height: 10,
        };
        // Grid exactly matches the canvas resolution
        assert_eq!(map_click(3, 2, canvas, 10, 20), Some((0, 0)));
        assert_eq!(map_click(7, 5, canvas, 10, 20), Some((4, 6)));
        assert_eq!(map_click(12, 11, canvas, 10, 20), Some((9, 18)));
    }

    #[test]
    fn test_map_click_outside_canvas() {
        let canvas = Rect {
            x: 3,
            y: 2,
            width: 10,
            height: 10,
        };
        assert_eq!(map_click(2, 5, canvas, 10, 20), None);
        assert_eq!(map_click(13, 5, canvas, 10, 20), None);
        assert_eq!(map_click(5, 1, canvas, 10, 20), None);
        assert_eq!(map_click(5, 12, canvas, 10, 20), None);
    }

    #[test]
    fn test_map_click_scales_to_fixed_grid() {
        let canvas = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        // 40x40 grid shown on a 10x10 canvas (20 visible sub-rows)
        let (gx, gy) = map_click(9, 9, canvas, 40, 40).unwrap();
        assert_eq!(gx, 36);
        assert_eq!(gy, 36);
        assert_eq!(map_click(0, 0, canvas, 40, 40), Some((0, 0)));
    }
}
