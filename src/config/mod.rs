//! Configuration types for a collection run

pub mod defaults;

use std::path::PathBuf;
use std::time::Duration;

/// Error returned when a [`RunConfig`] fails validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No ASN was given
    #[error("ASN must be specified")]
    MissingAsn,

    /// The registry host is empty
    #[error("WHOIS host must not be empty")]
    MissingWhoisHost,

    /// The WHOIS client command is empty
    #[error("WHOIS command must not be empty")]
    MissingWhoisCommand,

    /// The WHOIS timeout is zero
    #[error("WHOIS timeout must be greater than 0")]
    ZeroTimeout,

    /// The worker pool has no slots
    #[error("workers must be at least 1")]
    ZeroWorkers,
}

/// Configuration for a single ASN collection run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// ASN as typed by the user, normalized later
    pub asn: String,
    /// File receiving one address per line
    pub output: PathBuf,
    /// Routing registry host passed to the WHOIS client (default: whois.radb.net)
    pub whois_host: String,
    /// WHOIS client executable (default: whois)
    pub whois_command: String,
    /// Timeout for the WHOIS query (default: 30s)
    pub whois_timeout: Duration,
    /// Concurrent expansion workers (default: 10)
    pub workers: usize,
    /// Skip the interactive confirmation prompt
    pub batch: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            asn: String::new(),
            output: PathBuf::from(defaults::DEFAULT_OUTPUT),
            whois_host: defaults::DEFAULT_WHOIS_HOST.to_string(),
            whois_command: defaults::DEFAULT_WHOIS_COMMAND.to_string(),
            whois_timeout: defaults::whois_timeout(),
            workers: defaults::DEFAULT_WORKERS,
            batch: false,
        }
    }
}

impl RunConfig {
    /// Create a new RunConfig builder
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asn.trim().is_empty() {
            return Err(ConfigError::MissingAsn);
        }
        if self.whois_host.trim().is_empty() {
            return Err(ConfigError::MissingWhoisHost);
        }
        if self.whois_command.trim().is_empty() {
            return Err(ConfigError::MissingWhoisCommand);
        }
        if self.whois_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

/// Builder for RunConfig
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
        }
    }

    /// Set the ASN to resolve
    pub fn asn(mut self, asn: impl Into<String>) -> Self {
        self.config.asn = asn.into();
        self
    }

    /// Set the output file path
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    /// Set the routing registry host
    pub fn whois_host(mut self, host: impl Into<String>) -> Self {
        self.config.whois_host = host.into();
        self
    }

    /// Set the WHOIS client executable
    pub fn whois_command(mut self, command: impl Into<String>) -> Self {
        self.config.whois_command = command.into();
        self
    }

    /// Set the WHOIS query timeout
    pub fn whois_timeout(mut self, timeout: Duration) -> Self {
        self.config.whois_timeout = timeout;
        self
    }

    /// Set the number of concurrent expansion workers
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Skip the confirmation prompt
    pub fn batch(mut self, batch: bool) -> Self {
        self.config.batch = batch;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
