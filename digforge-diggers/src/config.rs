use digforge_core::{FillPolicy, UnknownFillPolicy};
use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_OUTPUT: &str = "world.bin.lz4";
pub const DEFAULT_ITERATIONS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Snapshot to continue from. A fresh world is created when absent.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub iterations: u64,
    pub seed: u64,
    pub fill: FillPolicy,
    pub log_level: Level,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            iterations: DEFAULT_ITERATIONS,
            seed: 0,
            fill: FillPolicy::default(),
            log_level: Level::INFO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(SimConfig),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("{flag} requires {expected}, got {value:?}")]
    InvalidValue {
        flag: String,
        value: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Fill(#[from] UnknownFillPolicy),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// Parses command line arguments, program name excluded.
pub fn parse_args<I>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = SimConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-i" | "--input" => config.input = Some(PathBuf::from(value(&arg, &mut args)?)),
            "-o" | "--output" => config.output = PathBuf::from(value(&arg, &mut args)?),
            "-n" | "--iterations" => {
                config.iterations = number(&arg, value(&arg, &mut args)?)?;
            }
            "-s" | "--seed" => config.seed = number(&arg, value(&arg, &mut args)?)?,
            "--fill" => config.fill = value(&arg, &mut args)?.parse()?,
            "--log-level" => {
                let level = value(&arg, &mut args)?;
                config.log_level = level.parse().map_err(|_| ConfigError::InvalidValue {
                    flag: arg.clone(),
                    value: level,
                    expected: "one of trace, debug, info, warn, error",
                })?;
            }
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(ConfigError::UnknownArgument(arg)),
        }
    }

    Ok(Command::Run(config))
}

fn value(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String, ConfigError> {
    args.next()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_owned()))
}

fn number(flag: &str, value: String) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_owned(),
        value,
        expected: "a non-negative integer",
    })
}

pub fn usage() -> String {
    format!(
        "Usage: digforge-diggers [OPTIONS]

Options:
  -i, --input <FILE>       Continue from this snapshot instead of a new world
  -o, --output <FILE>      Write the final snapshot here (default: {DEFAULT_OUTPUT})
                           A .json extension writes plain JSON
  -n, --iterations <N>     Number of simulation steps (default: {DEFAULT_ITERATIONS})
  -s, --seed <N>           Random seed (default: 0)
      --fill <POLICY>      ground-slab, below-zero or solid-ground (default: ground-slab)
      --log-level <LEVEL>  trace, debug, info, warn or error (default: info)
  -h, --help               Show this help"
    )
}
