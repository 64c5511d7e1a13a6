//! Chart-ready data series derived from metric maps and delta tables.
//!
//! Nothing here draws; each function shapes pipeline output into the
//! rows, grids and scaled vectors a chart front end consumes.

mod bullet;
mod dumbbell;
mod heatmap;
mod parallel;
mod radar;

pub use bullet::{bullet, BulletRow};
pub use dumbbell::{axis_range, dumbbell, Dumbbell, DumbbellRow};
pub use heatmap::{heatmap, Heatmap};
pub use parallel::{parallel_coordinates, ParallelCoordinates, PARALLEL_METRICS};
pub use radar::{radar, Radar};
