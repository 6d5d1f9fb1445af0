use crate::error::{CliError, ParseNumberError};
use crate::runner::RunConfig;
use std::num::{IntErrorKind, NonZeroUsize};

pub const PROGRAM_NAME: &str = "atomic_count";

// =============================================================================
// Numbers with C-style base prefixes
// =============================================================================

/// Parses an unsigned integer the way C's `strtoul(.., 0)` picks its base:
/// `0x`/`0X` means hexadecimal, a leading `0` octal, anything else decimal.
///
/// Surrounding whitespace and one leading `+` are accepted. Unlike `strtoul`
/// the whole token has to be a number, and negative or out of range values
/// are errors instead of wrapping or saturating.
pub fn parse_c_integer(text: &str) -> Result<u64, ParseNumberError> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(ParseNumberError::Negative);
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned.is_empty() {
        return Err(ParseNumberError::Empty);
    }

    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    // from_str_radix would also take a sign here; only bare digits are valid.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseNumberError::InvalidDigit { radix });
    }

    u64::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => ParseNumberError::Overflow { max: u64::MAX },
        _ => ParseNumberError::InvalidDigit { radix },
    })
}

pub fn parse_loop_cycles(text: &str) -> Result<u64, ParseNumberError> {
    parse_c_integer(text)
}

pub fn parse_step_size(text: &str) -> Result<i64, ParseNumberError> {
    let value = parse_c_integer(text)?;
    i64::try_from(value).map_err(|_| ParseNumberError::Overflow {
        max: i64::MAX as u64,
    })
}

pub fn parse_thread_count(text: &str) -> Result<NonZeroUsize, ParseNumberError> {
    let value = parse_c_integer(text)?;
    let value = usize::try_from(value).map_err(|_| ParseNumberError::Overflow {
        max: usize::MAX as u64,
    })?;
    NonZeroUsize::new(value).ok_or(ParseNumberError::Zero)
}

// =============================================================================
// Argument vector
// =============================================================================

/// Builds a run configuration from the full argument vector, program name
/// included. Arguments are checked left to right and the first bad one wins.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<RunConfig, CliError> {
    if !(3..=4).contains(&args.len()) {
        return Err(CliError::ArgumentCount {
            given: args.len().saturating_sub(1),
        });
    }

    let cycles_arg: &str = args[1].as_ref();
    let cycle_count = parse_loop_cycles(cycles_arg).map_err(|source| {
        CliError::InvalidLoopCycles {
            value: cycles_arg.to_string(),
            source,
        }
    })?;

    let step_arg: &str = args[2].as_ref();
    let step_size = parse_step_size(step_arg).map_err(|source| CliError::InvalidStepSize {
        value: step_arg.to_string(),
        source,
    })?;

    match args.get(3) {
        Some(arg) => {
            let threads_arg: &str = arg.as_ref();
            let thread_count =
                parse_thread_count(threads_arg).map_err(|source| CliError::InvalidThreadCount {
                    value: threads_arg.to_string(),
                    source,
                })?;
            Ok(RunConfig::new(cycle_count, step_size, thread_count))
        }
        None => Ok(RunConfig::with_default_threads(cycle_count, step_size)),
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Counter using atomic fetch-add\n\
         Usage: {program} loop-cycles step-size [thread-count]"
    )
}
