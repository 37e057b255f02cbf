pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::report::{emitter_for, CsvEmitter, JsonEmitter, TextEmitter};
pub use config::dataset::{Dataset, DatasetBootstrap};
pub use config::{AppSettings, ReportFormat};
pub use core::{queries::QueryEngine, report::ReportRunner, store::EntityStore};
pub use utils::error::{Result, SchoolError};
