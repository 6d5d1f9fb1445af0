use std::io;
use thiserror::Error;

/// Exit code for a run that was aborted after validation succeeded.
pub const EXIT_RUN_ABORTED: u8 = 5;

// =============================================================================
// Numeric argument parsing
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseNumberError {
    #[error("empty value")]
    Empty,

    #[error("invalid digit for base {radix}")]
    InvalidDigit { radix: u32 },

    #[error("negative values are not allowed")]
    Negative,

    #[error("value does not fit in {max}")]
    Overflow { max: u64 },

    #[error("value must be at least 1")]
    Zero,
}

// =============================================================================
// Command line errors
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("wrong number of arguments (expected 2 or 3, got {given})")]
    ArgumentCount { given: usize },

    #[error("invalid loop cycles '{value}': {source}")]
    InvalidLoopCycles {
        value: String,
        source: ParseNumberError,
    },

    #[error("invalid step size '{value}': {source}")]
    InvalidStepSize {
        value: String,
        source: ParseNumberError,
    },

    #[error("invalid thread count '{value}': {source}")]
    InvalidThreadCount {
        value: String,
        source: ParseNumberError,
    },
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ArgumentCount { .. } => 1,
            CliError::InvalidLoopCycles { .. } => 2,
            CliError::InvalidStepSize { .. } => 3,
            CliError::InvalidThreadCount { .. } => 4,
        }
    }
}

// =============================================================================
// Run errors
// =============================================================================

#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to spawn worker {index} of {requested}: {source}")]
    Spawn {
        index: usize,
        requested: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker {index} panicked before finishing its cycles")]
    WorkerPanicked { index: usize },
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        EXIT_RUN_ABORTED
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Run(#[from] RunError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Cli(err) => err.exit_code(),
            AppError::Run(err) => err.exit_code(),
        }
    }

    /// Usage errors get the usage reminder, run failures do not.
    pub fn wants_usage(&self) -> bool {
        matches!(self, AppError::Cli(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_argument_position() {
        let bad = ParseNumberError::InvalidDigit { radix: 10 };
        assert_eq!(CliError::ArgumentCount { given: 0 }.exit_code(), 1);
        assert_eq!(
            CliError::InvalidLoopCycles { value: "x".into(), source: bad.clone() }.exit_code(),
            2
        );
        assert_eq!(
            CliError::InvalidStepSize { value: "x".into(), source: bad.clone() }.exit_code(),
            3
        );
        assert_eq!(
            CliError::InvalidThreadCount { value: "x".into(), source: bad }.exit_code(),
            4
        );
    }

    #[test]
    fn test_run_error_is_distinct_from_parse_errors() {
        let err = RunError::Spawn {
            index: 3,
            requested: 8,
            source: io::Error::new(io::ErrorKind::WouldBlock, "no more threads"),
        };
        assert_eq!(err.exit_code(), EXIT_RUN_ABORTED);
        let display = err.to_string();
        assert!(display.contains("worker 3 of 8"));
        assert!(display.contains("no more threads"));

        let app: AppError = err.into();
        assert!(!app.wants_usage());
    }

    #[test]
    fn test_cli_error_display() {
        let err = CliError::InvalidLoopCycles {
            value: "abc".to_string(),
            source: ParseNumberError::InvalidDigit { radix: 10 },
        };
        let display = format!("{}", err);
        assert!(display.contains("invalid loop cycles"));
        assert!(display.contains("'abc'"));
        assert!(display.contains("base 10"));

        let app: AppError = err.into();
        assert!(app.wants_usage());
        assert_eq!(app.exit_code(), 2);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<AppError>();
        assert_sync::<AppError>();
    }
}
