//! Compile-time defaults for a collection run
//!
//! Every value here can be overridden through [`crate::RunConfigBuilder`] or the
//! matching command-line flag.

use std::time::Duration;

/// Routing registry queried for route objects
pub const DEFAULT_WHOIS_HOST: &str = "whois.radb.net";

/// WHOIS client executable looked up on `PATH`
pub const DEFAULT_WHOIS_COMMAND: &str = "whois";

/// Hard limit on a single WHOIS query in seconds
pub const DEFAULT_WHOIS_TIMEOUT_SECS: u64 = 30;

/// Number of prefixes expanded concurrently
pub const DEFAULT_WORKERS: usize = 10;

/// Output file written when no path is given
pub const DEFAULT_OUTPUT: &str = "ALL_IPS_ASN.txt";

/// Largest network (in addresses) the expander will materialize.
///
/// This is the size of the whole IPv4 space; any IPv6 network wider than a
/// /96 is refused.
pub const MAX_PREFIX_ADDRESSES: u128 = 1 << 32;

/// Default WHOIS timeout as a [`Duration`]
pub fn whois_timeout() -> Duration {
    Duration::from_secs(DEFAULT_WHOIS_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(whois_timeout(), Duration::from_secs(30));
        assert_eq!(DEFAULT_WORKERS, 10);
        assert_eq!(DEFAULT_OUTPUT, "ALL_IPS_ASN.txt");
        assert_eq!(MAX_PREFIX_ADDRESSES, 4_294_967_296);
    }
}
