//! Input surfaces for the payroll engine: flat requests with string keys
//! and comma-separated lists, CSV scenario batches and TOML fiscal-year
//! snapshots.

pub mod request;
pub mod scenarios;
pub mod snapshot;

pub use request::{IncrementRequest, RequestError, SalaryRequest, parse_bool_list, parse_int_list};
pub use scenarios::{Scenario, ScenarioLoadError};
pub use snapshot::SnapshotError;
