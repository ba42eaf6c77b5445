//! Gross-to-net payroll engine for Spanish IRPF and social security.
//!
//! [`models`] holds the value types and the fiscal-year constants;
//! [`calculations`] holds the pure functions and the [`NetPayCalculator`]
//! that chains them.

pub mod calculations;
pub mod models;

pub use calculations::{NetPayCalculator, PayrollError};
pub use models::*;
