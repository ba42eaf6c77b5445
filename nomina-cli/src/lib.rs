//! Support code for the `nomina` binary: logging setup, argument parsing
//! helpers and report rendering.

pub mod logging;
pub mod report;
pub mod utils;
