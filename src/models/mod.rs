pub mod report;
pub mod resort;

pub use report::{DataOrigin, ForecastDay, GroundingSource, Provenance, ResortInfo};
pub use resort::{MapCoords, Resort};
