//! Canonical case-folding for lookup keys.

/// Produce the normalized form of a user name, role name, or email:
/// surrounding whitespace trimmed, then Unicode-uppercased.
///
/// Lookups and uniqueness checks run against normalized columns only, so
/// every writer must apply the same folding before persisting.
pub fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}
