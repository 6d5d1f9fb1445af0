//! Concurrent atomic accumulation: N threads each add a step to one shared
//! counter a fixed number of times, and the total is reported once all of
//! them have been joined.

pub mod cli;
pub mod counter;
pub mod error;
pub mod logging;
pub mod runner;

pub use counter::SharedCounter;
pub use error::{AppError, CliError, ParseNumberError, RunError};
pub use runner::{run, RunConfig, RunPhase, RunReport};
