use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use common::Team;
use thiserror::Error;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Join,
}

impl Role {
    /// The host always plays White and moves first.
    pub fn team(self) -> Team {
        match self {
            Role::Host => Team::White,
            Role::Join => Team::Black,
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6321))
}

fn default_tick_millis() -> u64 {
    50
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub role: Role,
    #[serde(default = "default_address")]
    pub address: SocketAddr,
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "default_tick_millis")]
    tick_millis: u64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] io::Error),
    #[error("config file incorrectly formatted: {0}")]
    Format(#[from] toml::de::Error),
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Config::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn name(&self) -> &str {
        match self.name {
            Some(ref name) if !name.is_empty() => name.as_str(),
            _ => match self.role {
                Role::Host => "Host",
                Role::Join => "Client",
            },
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}
