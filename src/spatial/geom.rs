use macroquad::prelude::Rect;
use std::ops::RangeInclusive;

/// Strict AABB overlap: rectangles that only share an edge do not intersect.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

/// Grid cell containing a pixel coordinate. Negative coordinates give negative cells.
#[inline]
pub fn cell_of(px: f32, tile_size: f32) -> i32 {
    (px / tile_size).floor() as i32
}

/// Columns and rows a rectangle touches, unclamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    /// Column indices, both ends included.
    pub cols: RangeInclusive<i32>,
    /// Row indices, both ends included.
    pub rows: RangeInclusive<i32>,
}

impl CellRange {
    /// Row-major `(col, row)` pairs. The iterator owns copies of both ranges.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> {
        let cols = self.cols.clone();
        self.rows
            .clone()
            .flat_map(move |row| cols.clone().map(move |col| (col, row)))
    }
}

/// Cells from `floor(left / tw)` to `floor(right / tw)` and likewise for rows.
pub fn overlapped_cells(rect: &Rect, tile_w: f32, tile_h: f32) -> CellRange {
    CellRange {
        cols: cell_of(rect.x, tile_w)..=cell_of(rect.x + rect.w, tile_w),
        rows: cell_of(rect.y, tile_h)..=cell_of(rect.y + rect.h, tile_h),
    }
}
