//! Hokkaido Snow Grid API.
//!
//! Batched snow forecasts for nine Hokkaido ski resorts. Two generative-model
//! calls (a schema-constrained forecast request and a maps-grounded travel
//! request) are reconciled into one `ResortInfo` per requested resort.
//! Upstream failures never escape: the worst case is an offline placeholder
//! for every resort.

pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

pub use models::{Resort, ResortInfo};
pub use services::report::{ReportSettings, SnowReportService};
