//! Prefix resolution through a WHOIS routing registry
//!
//! The registry is asked for every route object whose `origin` is the ASN
//! (`whois -h <host> -- -i origin <ASN>`). Only the `route:` attribute of each
//! object is used; anything containing a `/` is treated as a CIDR prefix.

use crate::asn::normalize::Asn;
use crate::config::RunConfig;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Deduplicated prefixes, ordered for stable display
pub type PrefixSet = BTreeSet<String>;

const ROUTE_LABEL: &str = "route:";

/// Error type for prefix resolution.
///
/// An ASN with no route objects is not an error; it resolves to an empty
/// [`PrefixSet`]. These variants all mean the lookup itself failed.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The WHOIS client could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Executable that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The WHOIS client exited unsuccessfully
    #[error("WHOIS exited with {}: {stderr}", exit_label(.code))]
    Exit {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The WHOIS client did not finish in time
    #[error("WHOIS query timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The response could not be read as text
    #[error("unreadable WHOIS response: {0}")]
    Parse(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}

/// Something that can answer an inverse `origin` query for an ASN
#[async_trait]
pub trait WhoisSource: Send + Sync {
    /// Return the raw registry response for route objects originated by `asn`
    async fn query_origin(&self, asn: &Asn) -> Result<String, ResolveError>;
}

/// Runs an external WHOIS client as a subprocess
#[derive(Debug, Clone)]
pub struct WhoisCommand {
    program: String,
    host: String,
    timeout: Duration,
}

impl WhoisCommand {
    /// Create a WHOIS runner
    ///
    /// # Arguments
    ///
    /// * `program` - WHOIS client executable
    /// * `host` - Routing registry passed with `-h`
    /// * `timeout` - Hard limit for the whole query; the child is killed when it elapses
    pub fn new(program: impl Into<String>, host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            host: host.into(),
            timeout,
        }
    }

    /// Create a WHOIS runner from the run configuration
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.whois_command.clone(),
            config.whois_host.clone(),
            config.whois_timeout,
        )
    }

    /// Arguments passed to the client for `asn`
    pub fn args(&self, asn: &Asn) -> Vec<String> {
        vec![
            "-h".to_string(),
            self.host.clone(),
            "--".to_string(),
            "-i".to_string(),
            "origin".to_string(),
            asn.to_string(),
        ]
    }
}

#[async_trait]
impl WhoisSource for WhoisCommand {
    async fn query_origin(&self, asn: &Asn) -> Result<String, ResolveError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.args(asn))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(program = %self.program, host = %self.host, %asn, "running whois");

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|source| ResolveError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => return Err(ResolveError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(ResolveError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(bytes = output.stdout.len(), "whois response received");

        String::from_utf8(output.stdout).map_err(|e| ResolveError::Parse(e.to_string()))
    }
}

/// Extract every `route:` prefix from a registry response, in response order.
///
/// Lines are trimmed before matching, so `route6:` and other attributes are
/// ignored. The value ends at a repeated `route:` label, if any. Values
/// without a `/` are dropped.
pub fn parse_route_lines(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(ROUTE_LABEL))
        .filter_map(|line| line.split(ROUTE_LABEL).nth(1))
        .map(str::trim)
        .filter(|value| value.contains('/'))
        .map(str::to_string)
        .collect()
}

/// Resolve `asn` to the set of prefixes it originates.
pub async fn resolve_prefixes(
    source: &dyn WhoisSource,
    asn: &Asn,
) -> Result<PrefixSet, ResolveError> {
    println!("Getting prefixes for {asn}...");

    let response = source.query_origin(asn).await.map_err(|e| {
        tracing::error!("Error resolving prefixes for {asn}: {e}");
        e
    })?;

    let routes = parse_route_lines(&response);
    println!("Found {} prefixes for {asn}", routes.len());

    Ok(routes.into_iter().collect())
}
