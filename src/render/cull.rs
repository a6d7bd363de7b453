//! Viewport culling for tile layers.

use crate::camera::Camera;

/// Visible cell window of one tile layer, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    /// First visible column.
    pub start_col: u32,
    /// First visible row.
    pub start_row: u32,
    /// One past the last visible column.
    pub end_col: u32,
    /// One past the last visible row.
    pub end_row: u32,
    /// Camera-space x of column `start_col`.
    pub offset_x: f32,
    /// Camera-space y of row `start_row`.
    pub offset_y: f32,
}

impl ViewWindow {
    /// True when no cell is visible.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_col >= self.end_col || self.start_row >= self.end_row
    }

    /// Row-major `(col, row)` pairs inside the window.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let cols = self.start_col..self.end_col;
        (self.start_row..self.end_row).flat_map(move |row| cols.clone().map(move |col| (col, row)))
    }
}

/// Computes the window of cells the camera can see on a `layer_w` x `layer_h` grid.
///
/// One extra column and two extra rows are included so a camera sitting mid-tile never
/// shows a seam. When the window is clamped at the low edge, the matching offset is zeroed.
pub fn visible_window(
    camera: &Camera,
    tile_w: f32,
    tile_h: f32,
    layer_w: u32,
    layer_h: u32,
) -> ViewWindow {
    let mut start_col = (camera.x / tile_w).floor() as i64;
    let mut start_row = (camera.y / tile_h).floor() as i64;
    let end_col = start_col + (camera.width / tile_w).ceil() as i64 + 1;
    let end_row = start_row + (camera.height / tile_h).ceil() as i64 + 2;

    let mut offset_x = start_col as f32 * tile_w - camera.x;
    let mut offset_y = start_row as f32 * tile_h - camera.y;

    if start_col < 0 {
        start_col = 0;
        offset_x = 0.0;
    }
    if start_row < 0 {
        start_row = 0;
        offset_y = 0.0;
    }

    let clamp = |v: i64, max: u32| v.clamp(0, i64::from(max)) as u32;
    let end_col = clamp(end_col, layer_w);
    let end_row = clamp(end_row, layer_h);

    ViewWindow {
        start_col: clamp(start_col, layer_w).min(end_col),
        start_row: clamp(start_row, layer_h).min(end_row),
        end_col,
        end_row,
        offset_x,
        offset_y,
    }
}
