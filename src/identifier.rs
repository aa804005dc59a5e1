//! Identifier classification.
//!
//! Users refer to resources by full UUID, by a UUID prefix, or by name.
//! Every resolver branches on this classification: full UUIDs take the
//! fetch-by-id path, everything else goes through the search queries.

use regex::Regex;

/// Canonical version-4 UUID shape, anchored at the start of the string only.
/// The version nibble is forced to `4` and the variant nibble to `8|9|a|b`.
const UUID4_PREFIX_PATTERN: &str =
    r"(?i)^[a-f0-9]{8}-[a-f0-9]{4}-4[a-f0-9]{3}-[89ab][a-f0-9]{3}-[a-f0-9]{12}";

/// Length of a canonical dashed UUID.
pub const FULL_UUID_LEN: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Exactly one canonical UUID4, nothing else.
    FullUuid4,
    /// UUID4-shaped at the start of the string but not exactly 36 chars.
    UuidPrefix,
    /// Anything that is not UUID4-shaped.
    Name,
}

pub fn classify(identifier: &str) -> IdentifierKind {
    let shaped = Regex::new(UUID4_PREFIX_PATTERN)
        .map(|re| re.is_match(identifier))
        .unwrap_or(false);
    if !shaped {
        IdentifierKind::Name
    } else if identifier.len() == FULL_UUID_LEN {
        IdentifierKind::FullUuid4
    } else {
        IdentifierKind::UuidPrefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_uuid4() {
        assert_eq!(
            classify("7a4cfe51-03bb-42d6-825e-3b533888d8cd"),
            IdentifierKind::FullUuid4
        );
        // case-insensitive
        assert_eq!(
            classify("7A4CFE51-03BB-42D6-825E-3B533888D8CD"),
            IdentifierKind::FullUuid4
        );
    }

    #[test]
    fn test_uuid_with_trailing_garbage_is_a_prefix_match() {
        assert_eq!(
            classify("7a4cfe51-03bb-42d6-825e-3b533888d8cdxx"),
            IdentifierKind::UuidPrefix
        );
    }

    #[test]
    fn test_short_hex_strings_are_names() {
        // A short uuid goes through the uuid__startswith search, which is
        // the Name branch of the remote resolver.
        assert_eq!(classify("7a4cfe51"), IdentifierKind::Name);
        assert_eq!(classify("7a4cfe51-03bb"), IdentifierKind::Name);
    }

    #[test]
    fn test_wrong_version_or_variant_nibble_is_a_name() {
        // version nibble is 1, not 4
        assert_eq!(
            classify("7a4cfe51-03bb-12d6-825e-3b533888d8cd"),
            IdentifierKind::Name
        );
        // variant nibble is c, outside 8|9|a|b
        assert_eq!(
            classify("7a4cfe51-03bb-42d6-c25e-3b533888d8cd"),
            IdentifierKind::Name
        );
    }

    #[test]
    fn test_plain_names() {
        assert_eq!(classify("web"), IdentifierKind::Name);
        assert_eq!(classify("local-web-1"), IdentifierKind::Name);
        assert_eq!(classify(""), IdentifierKind::Name);
    }
}
