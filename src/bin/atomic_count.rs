//==============================================================================
// atomic_count <loop-cycles> <step-size> [thread-count]
//==============================================================================

use atomic_count::cli::{self, PROGRAM_NAME};
use atomic_count::{logging, runner, AppError, RunReport};
use colored::Colorize;
use std::process::ExitCode;

fn execute(args: &[String]) -> Result<RunReport, AppError> {
    let config = cli::parse_args(args)?;
    log::debug!("parsed {config:?}");
    Ok(runner::run(&config)?)
}

fn main() -> ExitCode {
    logging::init_from_env();

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let program = args.first().map(String::as_str).unwrap_or(PROGRAM_NAME);

    match execute(&args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            if err.wants_usage() {
                eprintln!("{}", cli::usage(program));
            }
            ExitCode::from(err.exit_code())
        }
    }
}
