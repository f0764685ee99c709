use crate::config::{Config, LoggingBackend};

pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    match config.logging_backend {
        LoggingBackend::EnvLogger => init_env_logger(config),
        LoggingBackend::SystemdJournalLogger => init_systemd_journal_logger(config),
    }
}

fn init_env_logger(config: &Config) -> anyhow::Result<()> {
    let mut log_builder = env_logger::builder();
    if config.disable_timestamps {
        log_builder.format_timestamp(None);
    }
    if let Some(log_level) = config.log_level {
        log_builder.filter_level(log_level);
    }
    log_builder.init();
    Ok(())
}

#[cfg(unix)]
fn init_systemd_journal_logger(config: &Config) -> anyhow::Result<()> {
    use anyhow::Context;

    systemd_journal_logger::JournalLog::new()
        .context("Failed to create journal log")?
        .install()
        .context("Failed to install journal log")?;
    if let Some(log_level) = config.log_level {
        log::set_max_level(log_level);
    }
    Ok(())
}

#[cfg(not(unix))]
fn init_systemd_journal_logger(_config: &Config) -> anyhow::Result<()> {
    anyhow::bail!("SystemdJournalLogger is only available on unix")
}
