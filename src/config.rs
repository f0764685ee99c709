use std::net::SocketAddr;

use anyhow::Context;

#[derive(Debug, PartialEq, Eq)]
pub enum LoggingBackend {
    EnvLogger,
    SystemdJournalLogger,
}

#[derive(thiserror::Error, Debug)]
pub enum LoggingBackendParseError {
    #[error("No matches for LoggingBackend")]
    InvalidValue,
}

impl std::str::FromStr for LoggingBackend {
    type Err = LoggingBackendParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EnvLogger" => Ok(LoggingBackend::EnvLogger),
            "SystemdJournalLogger" => Ok(LoggingBackend::SystemdJournalLogger),
            _ => Err(Self::Err::InvalidValue),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub user: Option<String>,
    pub log_level: Option<log::LevelFilter>,
    pub logging_backend: LoggingBackend,

    pub disable_timestamps: bool,
    pub local_address: SocketAddr,
}

/// Values from the command line; anything unset may come from the toml file.
#[derive(Debug, Default)]
struct CliValues {
    config_path: Option<String>,
    disable_timestamps: bool,
    local_address: Option<SocketAddr>,
}

pub fn parse_config() -> anyhow::Result<Config> {
    let cli = clap::command!()
        .arg(
            clap::Arg::new("config_path")
                .long("config-path")
                .short('c')
                .help("Alternative toml config file"),
        )
        .arg(
            clap::Arg::new("disable_timestamps")
                .long("disable-timestamps")
                .help("Disable timestamps in log messages. By default they are enabled")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("local_address")
                .long("local-address")
                .short('l')
                .value_parser(clap::value_parser!(SocketAddr))
                .help("Where to bind the echo UDP socket"),
        )
        .get_matches();

    let cli_values = CliValues {
        config_path: cli.get_one::<String>("config_path").cloned(),
        disable_timestamps: cli.get_flag("disable_timestamps"),
        local_address: cli.get_one::<SocketAddr>("local_address").copied(),
    };
    let toml = match &cli_values.config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {path}"))?;
            let table: toml::Table = content
                .parse()
                .with_context(|| format!("Failed to parse toml config from {path}"))?;
            Some(table)
        }
        None => None,
    };
    merge_config(cli_values, toml.as_ref())
}

fn merge_config(cli: CliValues, toml: Option<&toml::Table>) -> anyhow::Result<Config> {
    let mut user = None;
    let mut log_level = None;
    let mut logging_backend = LoggingBackend::EnvLogger;
    let mut disable_timestamps = cli.disable_timestamps;
    let mut local_address = cli.local_address;

    if let Some(toml) = toml {
        if let Some(v) = toml.get("user") {
            user = Some(v.as_str().context("user must be string")?.to_string())
        };
        if let Some(v) = toml.get("log_level") {
            let level_str = v.as_str().context("log_level must be string")?;
            log_level = Some(
                level_str
                    .parse()
                    .with_context(|| format!("Invalid value for log_level: '{level_str}'"))?,
            );
        };
        if let Some(v) = toml.get("logging_backend") {
            let tmp_str = v.as_str().context("logging_backend must be string")?;
            logging_backend = tmp_str
                .parse()
                .with_context(|| format!("Invalid value for logging_backend: '{tmp_str}'"))?;
        };
        if let Some(v) = toml.get("disable_timestamps") {
            if !disable_timestamps {
                disable_timestamps = v.as_bool().context("disable_timestamps must be bool")?
            }
        };
        if let Some(v) = toml.get("local_address") {
            if local_address.is_none() {
                local_address = Some(
                    v.as_str()
                        .context("local_address must be string")?
                        .parse()
                        .context("Failed to parse local_address")?,
                )
            }
        };
    }

    let local_address = local_address.context("local_address is not set")?;
    Ok(Config {
        user,
        log_level,
        logging_backend,
        disable_timestamps,
        local_address,
    })
}
