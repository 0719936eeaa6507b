//! Parallel expansion of a prefix set into an address file
//!
//! Each prefix is expanded on the blocking pool, at most `workers` at a time.
//! Finished expansions are drained in completion order by the single task
//! that owns the output file, so writes never interleave and the statistics
//! need no locking.

use crate::asn::PrefixSet;
use crate::expand::{expand_prefix, Expansion};
use futures::stream::{self, StreamExt};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Addresses formatted per write call
const WRITE_CHUNK: usize = 4096;

/// Error type for collection.
///
/// Only failures that stop the whole run are reported here; a prefix that
/// cannot be expanded or written is logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The output file could not be created
    #[error("cannot create {}: {source}", path.display())]
    Create {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Buffered output could not be flushed
    #[error("cannot flush {}: {source}", path.display())]
    Flush {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Addresses written for one prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixStat {
    /// Prefix as resolved
    pub prefix: String,
    /// Number of addresses written
    pub count: u64,
}

/// Result of a completed collection
#[derive(Debug, Clone)]
pub struct CollectSummary {
    /// File the addresses were written to
    pub output: PathBuf,
    /// Total addresses written
    pub total: u64,
    /// Per-prefix counts in completion order
    pub stats: Vec<PrefixStat>,
}

impl CollectSummary {
    fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            total: 0,
            stats: Vec::new(),
        }
    }

    fn record(&mut self, stat: PrefixStat) {
        self.total += stat.count;
        self.stats.push(stat);
    }

    /// Number of prefixes that were collected
    pub fn prefixes_processed(&self) -> usize {
        self.stats.len()
    }
}

/// Expand every prefix and write the addresses to `output`, one per line.
///
/// The file is truncated first. `on_progress` is called once per collected
/// prefix, in completion order.
pub async fn collect<F>(
    prefixes: &PrefixSet,
    output: &Path,
    workers: usize,
    on_progress: F,
) -> Result<CollectSummary, CollectError>
where
    F: FnMut(&PrefixStat),
{
    let file = File::create(output)
        .await
        .map_err(|source| CollectError::Create {
            path: output.to_path_buf(),
            source,
        })?;
    let mut writer = BufWriter::new(file);
    let mut summary = CollectSummary::new(output);

    let stats = collect_into(&mut writer, prefixes, workers, expand_prefix, on_progress).await;
    for stat in stats {
        summary.record(stat);
    }

    writer
        .flush()
        .await
        .map_err(|source| CollectError::Flush {
            path: output.to_path_buf(),
            source,
        })?;

    Ok(summary)
}

/// Run `expand` for every prefix on the blocking pool and drain the results
/// into `writer`.
///
/// A prefix whose worker panics or whose block cannot be written is logged
/// and left out of the returned stats.
async fn collect_into<W, E, F>(
    writer: &mut W,
    prefixes: &PrefixSet,
    workers: usize,
    expand: E,
    mut on_progress: F,
) -> Vec<PrefixStat>
where
    W: AsyncWrite + Unpin,
    E: Fn(String) -> Expansion + Clone + Send + 'static,
    F: FnMut(&PrefixStat),
{
    tracing::debug!(prefixes = prefixes.len(), workers, "starting expansion");

    let mut completed = stream::iter(prefixes.iter().cloned())
        .map(|prefix| {
            let task = tokio::task::spawn_blocking({
                let prefix = prefix.clone();
                let expand = expand.clone();
                move || expand(prefix)
            });
            async move { (prefix, task.await) }
        })
        .buffer_unordered(workers.max(1));

    let mut stats = Vec::with_capacity(prefixes.len());
    while let Some((prefix, joined)) = completed.next().await {
        let expansion = match joined {
            Ok(expansion) => expansion,
            Err(e) => {
                tracing::error!("Error collecting {prefix}: {e}");
                continue;
            }
        };

        if let Err(e) = write_addresses(writer, &expansion.addresses).await {
            tracing::error!("Error collecting {prefix}: {e}");
            continue;
        }

        let stat = PrefixStat {
            count: expansion.count(),
            prefix: expansion.prefix,
        };
        on_progress(&stat);
        stats.push(stat);
    }

    stats
}

/// Write `addresses` one per line
pub async fn write_addresses<W>(writer: &mut W, addresses: &[IpAddr]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut chunk = String::with_capacity(WRITE_CHUNK * 16);
    for batch in addresses.chunks(WRITE_CHUNK) {
        chunk.clear();
        for addr in batch {
            chunk.push_str(&addr.to_string());
            chunk.push('\n');
        }
        writer.write_all(chunk.as_bytes()).await?;
    }
    Ok(())
}
