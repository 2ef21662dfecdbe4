pub use self::{grid::*, piece::*, placement::*, shape::*};

pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod placement;
pub(crate) mod shape;
