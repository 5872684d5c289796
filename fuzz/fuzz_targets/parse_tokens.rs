#![no_main]

// Harness: token grammar. Any string either fails as malformed (fewer than two
// colons) or splits into scheme/id/perms that reassemble to the original token
// once the perms segment is normalised.

use libfuzzer_sys::fuzz_target;
use zkacl::rights::{decode_perms, encode_perms};
use zkacl::AclEntry;

fuzz_target!(|token: &str| {
    let colons = token.matches(':').count();
    match token.parse::<AclEntry>() {
        Err(_) => assert!(colons < 2),
        Ok(entry) => {
            assert!(colons >= 2);
            assert!(!entry.scheme.contains(':'));
            let perms_segment = &token[token.rfind(':').unwrap() + 1..];
            assert_eq!(entry.perms, decode_perms(perms_segment).perms);
            let rebuilt = format!("{}:{}:{}", entry.scheme, entry.id, perms_segment);
            assert_eq!(rebuilt, token);
            // The canonical encoding always decodes back to the same set.
            assert_eq!(decode_perms(&encode_perms(entry.perms)).perms, entry.perms);
        }
    }
});
