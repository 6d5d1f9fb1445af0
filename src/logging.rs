/// Filter for the logger, in `env_logger` syntax (`debug`, `atomic_count=trace`, ...).
pub const LOG_ENV: &str = "ATOMIC_COUNT_LOG";
/// `auto`, `always` or `never`.
pub const LOG_STYLE_ENV: &str = "ATOMIC_COUNT_LOG_STYLE";

/// Installs the logger when `ATOMIC_COUNT_LOG` is set. Without it nothing is
/// logged and stderr only ever carries user-facing errors.
pub fn init_from_env() {
    if std::env::var_os(LOG_ENV).is_none() {
        return;
    }

    let env = env_logger::Env::new()
        .filter(LOG_ENV)
        .write_style(LOG_STYLE_ENV);
    if let Err(err) = env_logger::Builder::from_env(env)
        .format_timestamp_micros()
        .try_init()
    {
        // Some other logger got there first; report through it.
        log::debug!("keeping the existing logger: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_keeps_first_logger() {
        std::env::set_var(LOG_ENV, "warn");
        init_from_env();
        init_from_env();
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }
}
