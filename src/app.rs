//! End-to-end collection flow behind the command-line tool
//!
//! Resolution and confirmation are injected so the whole flow can run against
//! canned WHOIS output and a fixed answer.

use crate::asn::{normalize_asn, resolve_prefixes, ResolveError, WhoisSource};
use crate::collector::{collect, CollectError, CollectSummary};
use crate::config::{ConfigError, RunConfig};
use crate::confirm::Confirm;
use crate::format::group_thousands;

const RULE_WIDTH: usize = 60;

/// Prompt shown before collection starts
pub const CONFIRM_PROMPT: &str = "Do you want to continue? (yes/no): ";

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Every prefix was collected
    Completed(CollectSummary),
    /// The registry lookup worked but the ASN originates no routes
    NoPrefixes,
    /// The registry lookup itself failed
    LookupFailed(ResolveError),
    /// The user declined the confirmation prompt
    Declined,
}

impl RunOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed(_) | RunOutcome::Declined => 0,
            RunOutcome::NoPrefixes | RunOutcome::LookupFailed(_) => 1,
        }
    }
}

/// Error type for a run that could not finish
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The configuration is invalid
    #[error("Invalid configuration - {0}")]
    Config(#[from] ConfigError),

    /// The confirmation answer could not be read
    #[error("failed to read confirmation: {0}")]
    Confirm(#[source] std::io::Error),

    /// The output file could not be produced
    #[error(transparent)]
    Collect(#[from] CollectError),
}

/// Resolve, confirm and collect according to `config`.
///
/// Progress and the final summary go to stdout. `confirm` runs synchronously
/// on the calling task, after resolution and before any expansion worker or
/// the output file exists.
pub async fn run(
    config: &RunConfig,
    whois: &dyn WhoisSource,
    confirm: &mut dyn Confirm,
) -> Result<RunOutcome, RunError> {
    config.validate()?;

    let asn = normalize_asn(&config.asn);
    println!("ASN: {asn}");
    println!("Output: {}", config.output.display());

    let prefixes = match resolve_prefixes(whois, &asn).await {
        Ok(prefixes) if prefixes.is_empty() => {
            println!("No prefixes found");
            return Ok(RunOutcome::NoPrefixes);
        }
        Ok(prefixes) => prefixes,
        Err(e) => {
            println!("No prefixes found");
            return Ok(RunOutcome::LookupFailed(e));
        }
    };

    println!("\nTotal prefixes found: {}", prefixes.len());

    if !config.batch {
        println!("\n{}", "=".repeat(RULE_WIDTH));
        println!("WARNING: You will collect A LOT of IP addresses!");
        let proceed = confirm
            .confirm(CONFIRM_PROMPT)
            .map_err(RunError::Confirm)?;
        if !proceed {
            println!("Operation cancelled.");
            return Ok(RunOutcome::Declined);
        }
    }

    println!("\nCollecting IP addresses in {}...", config.output.display());
    println!("\nCollecting all IP addresses");
    println!("{}", "=".repeat(RULE_WIDTH));

    let summary = collect(&prefixes, &config.output, config.workers, |stat| {
        println!(
            "Collected {}: {} IP addresses",
            stat.prefix,
            group_thousands(stat.count)
        );
    })
    .await?;

    println!("\nCollection complete!");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("File: {}", summary.output.display());
    println!(
        "Total IP addresses collected: {}",
        group_thousands(summary.total)
    );
    println!("Total prefixes processed: {}", summary.prefixes_processed());

    Ok(RunOutcome::Completed(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn::Asn;
    use crate::confirm::FixedAnswer;
    use async_trait::async_trait;
    use std::io;

    struct CannedWhois(&'static str);

    #[async_trait]
    impl WhoisSource for CannedWhois {
        async fn query_origin(&self, _asn: &Asn) -> Result<String, ResolveError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingWhois;

    #[async_trait]
    impl WhoisSource for FailingWhois {
        async fn query_origin(&self, _asn: &Asn) -> Result<String, ResolveError> {
            Err(ResolveError::Timeout(std::time::Duration::from_secs(30)))
        }
    }

    /// Counts how often the user was asked
    struct CountingConfirm {
        answer: bool,
        asked: usize,
    }

    impl Confirm for CountingConfirm {
        fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
            assert_eq!(prompt, CONFIRM_PROMPT);
            self.asked += 1;
            Ok(self.answer)
        }
    }

    /// Records whether the output file already existed when asked
    struct WatchingConfirm {
        output: std::path::PathBuf,
        output_existed: Option<bool>,
    }

    impl Confirm for WatchingConfirm {
        fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
            self.output_existed = Some(self.output.exists());
            Ok(true)
        }
    }

    struct BrokenConfirm;

    impl Confirm for BrokenConfirm {
        fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed"))
        }
    }

    const ROUTES: &str = "route: 10.0.0.0/30\nroute: 10.0.1.0/29\nroute:  10.0.0.0/30\n";

    fn config_in(dir: &tempfile::TempDir, batch: bool) -> RunConfig {
        RunConfig::builder()
            .asn("64500")
            .output(dir.path().join("out.txt"))
            .batch(batch)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_batch_run_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, true);
        let mut confirm = CountingConfirm {
            answer: false,
            asked: 0,
        };

        let outcome = run(&config, &CannedWhois(ROUTES), &mut confirm)
            .await
            .unwrap();

        assert_eq!(confirm.asked, 0);
        assert_eq!(outcome.exit_code(), 0);
        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.total, 12);
                assert_eq!(summary.prefixes_processed(), 2);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written.lines().count(), 12);
    }

    #[tokio::test]
    async fn test_declined_prompt_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, false);
        let mut confirm = CountingConfirm {
            answer: false,
            asked: 0,
        };

        let outcome = run(&config, &CannedWhois(ROUTES), &mut confirm)
            .await
            .unwrap();

        assert_eq!(confirm.asked, 1);
        assert!(matches!(outcome, RunOutcome::Declined));
        assert_eq!(outcome.exit_code(), 0);
        assert!(!dir.path().join("out.txt").exists());
    }

    #[tokio::test]
    async fn test_accepted_prompt_collects() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, false);

        let outcome = run(&config, &CannedWhois(ROUTES), &mut FixedAnswer(true))
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert!(dir.path().join("out.txt").exists());
    }

    #[tokio::test]
    async fn test_prompt_comes_before_output_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, false);
        let mut confirm = WatchingConfirm {
            output: config.output.clone(),
            output_existed: None,
        };

        let outcome = run(&config, &CannedWhois(ROUTES), &mut confirm)
            .await
            .unwrap();

        assert_eq!(confirm.output_existed, Some(false));
        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert!(config.output.exists());
    }

    #[tokio::test]
    async fn test_no_routes_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, true);

        let outcome = run(&config, &CannedWhois("% No entries found\n"), &mut FixedAnswer(true))
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::NoPrefixes));
        assert_eq!(outcome.exit_code(), 1);
        assert!(!dir.path().join("out.txt").exists());
    }

    #[tokio::test]
    async fn test_lookup_failure_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, true);

        let outcome = run(&config, &FailingWhois, &mut FixedAnswer(true))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::LookupFailed(ResolveError::Timeout(_))
        ));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_confirm_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, false);

        let result = run(&config, &CannedWhois(ROUTES), &mut BrokenConfirm).await;
        assert!(matches!(result, Err(RunError::Confirm(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = RunConfig {
            workers: 0,
            asn: "AS1".to_string(),
            ..RunConfig::default()
        };

        let result = run(&config, &CannedWhois(ROUTES), &mut FixedAnswer(true)).await;
        assert!(matches!(
            result,
            Err(RunError::Config(ConfigError::ZeroWorkers))
        ));
    }
}
