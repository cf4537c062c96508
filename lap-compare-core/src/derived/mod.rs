//! Derived comparison signals
//!
//! Everything computed after alignment: the running time delta, sector boundary
//! distances and heading series. All functions are pure and fail as a whole.

pub mod delta;
pub mod heading;
pub mod sectors;

// Re-export key functions for convenience
pub use delta::compute_delta;
pub use heading::{compute_heading, derive_headings, HeadingSample};
pub use sectors::compute_sector_boundaries;
