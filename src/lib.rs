//! asn-ips - Expand an Autonomous System's announced prefixes into addresses
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`normalize_asn`] puts the ASN into `AS<digits>` form.
//! 2. [`resolve_prefixes`] asks a WHOIS routing registry for the ASN's
//!    `route:` objects.
//! 3. [`collect`] expands every prefix on a bounded worker pool and writes the
//!    addresses to a file as each prefix completes.
//!
//! [`app::run`] ties these together the way the `asn-ips` binary uses them.

pub mod app;
pub mod asn;
pub mod collector;
pub mod config;
pub mod confirm;
pub mod expand;
pub mod format;

// Re-export core types for library users
pub use app::{run, RunError, RunOutcome};
pub use asn::{
    normalize_asn, parse_route_lines, resolve_prefixes, Asn, PrefixSet, ResolveError,
    WhoisCommand, WhoisSource,
};
pub use collector::{collect, CollectError, CollectSummary, PrefixStat};
pub use config::{ConfigError, RunConfig, RunConfigBuilder};
pub use confirm::{is_affirmative, Confirm, FixedAnswer, LineConfirm, StdinConfirm};
pub use expand::{expand_prefix, try_expand, ExpandError, Expansion};
