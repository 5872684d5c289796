//!
//! ACL entries and the `scheme:id:perms` token grammar.
//!
//! The identity segment is opaque and may itself contain colons (x509 distinguished
//! names, for example), so a token is split on its *first* colon for the scheme and
//! on its *last* colon for the permissions. Everything in between is the identity.

use std::fmt;
use std::str::FromStr;

use crate::error::AclError;
use crate::rights::{self, Perms};

/// A single ACL entry: who (`scheme` + `id`) may do what (`perms`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct AclEntry {
    pub scheme: String,
    pub id: String,
    pub perms: Perms,
}

impl AclEntry {
    pub fn new(scheme: impl Into<String>, id: impl Into<String>, perms: Perms) -> Self {
        AclEntry { scheme: scheme.into(), id: id.into(), perms }
    }
}

impl FromStr for AclEntry {
    type Err = AclError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || AclError::Malformed { token: token.to_string() };
        let first = token.find(':').ok_or_else(malformed)?;
        let last = token.rfind(':').ok_or_else(malformed)?;
        if first == last {
            return Err(malformed());
        }
        let decoded = rights::decode_perms(&token[last + 1..]);
        Ok(AclEntry::new(&token[..first], &token[first + 1..last], decoded.perms))
    }
}

/// Renders one entry in the report layout, indented under its node path.
impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  Scheme: {}, Id: {}, Perms: {}", self.scheme, self.id, self.perms)
    }
}

/// Parses ACL tokens in order.
///
/// Fails on the first malformed token; no partial result is returned. Unknown
/// permission characters are logged and otherwise ignored.
pub fn parse_acls<I, S>(tokens: I) -> Result<Vec<AclEntry>, AclError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens.into_iter().map(|t| t.as_ref().parse::<AclEntry>()).collect()
}
