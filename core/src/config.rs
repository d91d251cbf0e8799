use crate::Error;
use std::path::PathBuf;

pub const WORKERS_ENV: &str = "PARLEY_WORKERS";
pub const QUEUE_ENV: &str = "PARLEY_QUEUE";
pub const RESOURCES_ENV: &str = "PARLEY_RESOURCES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of server workers, each serving one connection at a time.
    pub workers: usize,
    /// Accepted connections allowed to wait for a free worker.
    pub queue: usize,
    /// Directory searched first for static resources such as `help.txt`.
    pub resources: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 4,
            queue: 16,
            resources: PathBuf::from("./resources"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();
        if let Some(value) = lookup(WORKERS_ENV) {
            config.workers = positive(WORKERS_ENV, &value)?;
        }
        if let Some(value) = lookup(QUEUE_ENV) {
            config.queue = positive(QUEUE_ENV, &value)?;
        }
        if let Some(value) = lookup(RESOURCES_ENV) {
            config.resources = PathBuf::from(value);
        }
        Ok(config)
    }
}

fn positive(key: &'static str, value: &str) -> Result<usize, Error> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config {
            key,
            value: value.to_owned(),
        }),
    }
}
