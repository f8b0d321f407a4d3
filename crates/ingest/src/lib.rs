//! `adspend-ingest` — media-spend ingestion engine.
//!
//! Pure engine crate: receives pre-loaded rows, returns campaign trees.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod budget;
pub mod classify;
pub mod config;
pub mod dates;
pub mod error;
pub mod model;
pub mod month;
pub mod normalize;
pub mod schema;

pub use config::PipelineConfig;
pub use error::ParseError;
pub use model::{BudgetCampaign, Campaign, RawRow, RowTable, SpendRow};
pub use month::Month;
