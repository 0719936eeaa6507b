//! ASN normalization

use std::fmt;

/// An Autonomous System Number in canonical `AS<digits>` form.
///
/// Only the `AS` prefix is guaranteed; the remainder is not checked, so a
/// malformed ASN simply yields no route objects from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asn(String);

impl Asn {
    /// The canonical text, e.g. `AS8945`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Asn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Uppercase `raw` and prepend `AS` when it is missing.
pub fn normalize_asn(raw: &str) -> Asn {
    let upper = raw.trim().to_uppercase();
    if upper.starts_with("AS") {
        Asn(upper)
    } else {
        Asn(format!("AS{upper}"))
    }
}
