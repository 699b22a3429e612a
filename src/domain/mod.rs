//! Pure domain types with minimal dependencies
//!
//! Nothing in here touches pixels or async machinery.

pub mod action;
pub mod geometry;
pub mod selection;

pub use action::*;
pub use geometry::*;
pub use selection::*;
