//!
//! Permission algebra for znode ACLs.
//! Defines the permission bit flags recognized by the coordination service and the
//! canonical single-character encoding used on the command line and in reports.

use std::fmt;

bitflags::bitflags! {
    /// Permissions granted by a single ACL entry.
    ///
    /// Bit values match the ones used by the coordination service on the wire, so a
    /// set can be handed to a client library without translation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Perms: u32 {
        /// Permission to read node data and list children.
        const READ = 1 << 0; // 0b00001
        /// Permission to set node data.
        const WRITE = 1 << 1; // 0b00010
        /// Permission to create children.
        const CREATE = 1 << 2; // 0b00100
        /// Permission to delete children.
        const DELETE = 1 << 3; // 0b01000
        /// Permission to set the node's ACL.
        const ADMIN = 1 << 4; // 0b10000
    }
}

/// Display order of the permission characters. Encoding walks this table front to back.
pub const DISPLAY_ORDER: [(Perms, char); 5] = [
    (Perms::CREATE, 'c'),
    (Perms::DELETE, 'd'),
    (Perms::READ, 'r'),
    (Perms::WRITE, 'w'),
    (Perms::ADMIN, 'a'),
];

/// A character in a permission string that does not name any permission.
///
/// Never fatal: the character contributes no bit and decoding continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission {
    /// The offending character.
    pub character: char,
    /// The permission string it was found in.
    pub perms: String,
}

impl fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown perm type: {} (in \"{}\")", self.character, self.perms)
    }
}

/// Result of decoding a permission string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    pub perms: Perms,
    /// One record per unrecognized character, in input order.
    pub unknown: Vec<UnknownPermission>,
}

/// Maps a single permission character to its flag.
#[inline]
pub fn perm_for_char(c: char) -> Option<Perms> {
    match c {
        'r' => Some(Perms::READ),
        'w' => Some(Perms::WRITE),
        'c' => Some(Perms::CREATE),
        'd' => Some(Perms::DELETE),
        'a' => Some(Perms::ADMIN),
        _ => None,
    }
}

/// Decodes a permission string such as `"rwa"` into a [`Perms`] set.
///
/// Characters are independent of each other and of their order. Duplicates are
/// idempotent. Unknown characters are reported through `tracing` and returned in
/// [`Decoded::unknown`]; they do not abort decoding. The empty string decodes to the
/// empty set.
pub fn decode_perms(s: &str) -> Decoded {
    let mut decoded = Decoded::default();
    for c in s.chars() {
        match perm_for_char(c) {
            Some(p) => decoded.perms |= p,
            None => {
                let unknown = UnknownPermission { character: c, perms: s.to_string() };
                tracing::warn!("{}", unknown);
                decoded.unknown.push(unknown);
            }
        }
    }
    decoded
}

/// Encodes a permission set in the fixed order `c,d,r,w,a`.
///
/// Total over every set; the empty set encodes to the empty string.
pub fn encode_perms(perms: Perms) -> String {
    DISPLAY_ORDER
        .iter()
        .filter(|(flag, _)| perms.contains(*flag))
        .map(|(_, c)| *c)
        .collect()
}

impl fmt::Display for Perms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_perms(*self))
    }
}

impl serde::Serialize for Perms {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_chars() {
        assert_eq!(decode_perms("c").perms, Perms::CREATE);
        assert_eq!(decode_perms("d").perms, Perms::DELETE);
        assert_eq!(decode_perms("r").perms, Perms::READ);
        assert_eq!(decode_perms("w").perms, Perms::WRITE);
        assert_eq!(decode_perms("a").perms, Perms::ADMIN);
    }

    #[test]
    fn test_encode_is_order_fixed() {
        let decoded = decode_perms("warcd");
        assert_eq!(decoded.perms, Perms::all());
        assert!(decoded.unknown.is_empty());
        assert_eq!(encode_perms(decoded.perms), "cdrwa");
        assert_eq!(encode_perms(Perms::ADMIN | Perms::READ), "ra");
    }

    #[test]
    fn test_empty_string_is_no_access() {
        let decoded = decode_perms("");
        assert!(decoded.perms.is_empty());
        assert!(decoded.unknown.is_empty());
        assert_eq!(encode_perms(Perms::empty()), "");
    }

    #[test]
    fn test_duplicates_are_idempotent() {
        assert_eq!(decode_perms("rrrw").perms, Perms::READ | Perms::WRITE);
    }

    #[test]
    fn test_unknown_char_is_not_fatal() {
        let decoded = decode_perms("rx");
        assert_eq!(decoded.perms, Perms::READ);
        assert_eq!(
            decoded.unknown,
            vec![UnknownPermission { character: 'x', perms: "rx".into() }]
        );
    }

    #[test]
    fn test_wire_values() {
        // Bit values are shared with the server; changing them breaks every ACL we send.
        assert_eq!(Perms::READ.bits(), 1);
        assert_eq!(Perms::WRITE.bits(), 2);
        assert_eq!(Perms::CREATE.bits(), 4);
        assert_eq!(Perms::DELETE.bits(), 8);
        assert_eq!(Perms::ADMIN.bits(), 16);
        assert_eq!(Perms::all().bits(), 31);
    }

    #[test]
    fn test_display_matches_encode() {
        let p = Perms::WRITE | Perms::CREATE;
        assert_eq!(p.to_string(), "cw");
    }
}
