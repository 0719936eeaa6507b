//! ASN handling: normalization and prefix resolution

pub mod normalize;
pub mod resolver;

pub use normalize::{normalize_asn, Asn};
pub use resolver::{
    parse_route_lines, resolve_prefixes, PrefixSet, ResolveError, WhoisCommand, WhoisSource,
};
