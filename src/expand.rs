//! Prefix expansion into individual addresses
//!
//! Expansion is exhaustive: the network and broadcast addresses
//! of IPv4 prefixes are included, and IPv6 prefixes get no subnet-router
//! anycast exclusion. Host bits set in the input are masked off rather than
//! rejected, so `10.0.0.5/30` expands the same as `10.0.0.4/30`.

use crate::config::defaults::MAX_PREFIX_ADDRESSES;
use ipnet::{IpAddrRange, IpNet, Ipv4AddrRange, Ipv6AddrRange};
use std::net::IpAddr;

/// Error type for prefix expansion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    /// The text is not a CIDR network
    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix {
        /// Prefix as given
        prefix: String,
        /// Parser message
        reason: String,
    },

    /// The network holds more addresses than can be materialized
    #[error("prefix {prefix} holds {size} addresses, too many to expand")]
    TooLarge {
        /// Prefix as given
        prefix: String,
        /// Number of addresses in the network
        size: u128,
    },
}

/// The addresses contained in one prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Prefix exactly as it was submitted
    pub prefix: String,
    /// Every address in the network, ascending
    pub addresses: Vec<IpAddr>,
}

impl Expansion {
    /// Number of addresses produced
    pub fn count(&self) -> u64 {
        self.addresses.len() as u64
    }

    /// An expansion that produced nothing
    pub fn empty(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            addresses: Vec::new(),
        }
    }
}

/// Parse `prefix` non-strictly, masking off any host bits.
pub fn parse_network(prefix: &str) -> Result<IpNet, ExpandError> {
    prefix
        .trim()
        .parse::<IpNet>()
        .map(|net| net.trunc())
        .map_err(|e| ExpandError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: e.to_string(),
        })
}

/// Number of addresses in `net`, saturating for an IPv6 /0
pub fn network_size(net: &IpNet) -> u128 {
    let host_bits = u32::from(net.max_prefix_len() - net.prefix_len());
    1u128.checked_shl(host_bits).unwrap_or(u128::MAX)
}

/// Every address from the network address through the broadcast address
pub fn address_range(net: &IpNet) -> IpAddrRange {
    match net {
        IpNet::V4(n) => IpAddrRange::from(Ipv4AddrRange::new(n.network(), n.broadcast())),
        IpNet::V6(n) => IpAddrRange::from(Ipv6AddrRange::new(n.network(), n.broadcast())),
    }
}

/// Expand `prefix` into all of its addresses, ascending.
pub fn try_expand(prefix: &str) -> Result<Vec<IpAddr>, ExpandError> {
    let net = parse_network(prefix)?;
    let size = network_size(&net);
    if size > MAX_PREFIX_ADDRESSES {
        return Err(ExpandError::TooLarge {
            prefix: prefix.to_string(),
            size,
        });
    }

    let mut addresses = Vec::with_capacity(size as usize);
    addresses.extend(address_range(&net));
    Ok(addresses)
}

/// Expand `prefix`, logging and returning an empty [`Expansion`] on failure.
pub fn expand_prefix(prefix: String) -> Expansion {
    match try_expand(&prefix) {
        Ok(addresses) => Expansion { prefix, addresses },
        Err(e) => {
            tracing::error!("Error at prefix {prefix}: {e}");
            Expansion::empty(prefix)
        }
    }
}
