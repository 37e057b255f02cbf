pub mod queries;
pub mod relations;
pub mod report;
pub mod session;
pub mod store;

pub use crate::domain::model::{Aggregate, SalaryReport, StudentTutorPair, Subject, Tutor};
pub use crate::domain::ports::{ReportEmitter, ReportSettings, StoreBootstrap};
pub use crate::domain::report::{ReportSection, Task};
pub use crate::utils::error::Result;
