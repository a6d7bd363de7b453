//! GID decoding and grid geometry.

mod geom;
mod gid;

pub use geom::{cell_of, intersects, overlapped_cells, CellRange};
pub use gid::{Gid, TileFlags, FLAG_MASK, FLIP_D, FLIP_H, FLIP_V, GID_MASK, ROTATE_HEX_120};
