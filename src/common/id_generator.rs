// src/common/id_generator.rs
//! Sequential candidate ID formatting
//!
//! Candidate IDs are human-readable and gap-free: CAN-0001, CAN-0002, ...
//! The sequence number itself always comes from the `counters` table via a
//! single atomic increment per created record (see `import::store`), so this
//! module only formats and parses, it never allocates numbers.

/// Prefix for candidate IDs
pub const CANDIDATE_ID_PREFIX: &str = "CAN";

/// Fixed key under which the candidate sequence lives in the counters table
pub const COUNTER_KEY_CANDIDATES: &str = "candidate_seq";

/// Format a sequence number as a candidate ID (CAN-0042)
///
/// Numbers beyond four digits widen naturally (CAN-12345).
pub fn candidate_id_from_sequence(seq: i64) -> String {
    format!("{}-{:04}", CANDIDATE_ID_PREFIX, seq)
}

/// Check whether a string looks like a candidate ID
pub fn is_candidate_id(id: &str) -> bool {
    match id.strip_prefix(CANDIDATE_ID_PREFIX).and_then(|rest| rest.strip_prefix('-')) {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Recover the sequence number from a candidate ID, if well formed
pub fn sequence_from_candidate_id(id: &str) -> Option<i64> {
    id.strip_prefix(CANDIDATE_ID_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_four_digits() {
        assert_eq!(candidate_id_from_sequence(1), "CAN-0001");
        assert_eq!(candidate_id_from_sequence(42), "CAN-0042");
        assert_eq!(candidate_id_from_sequence(9999), "CAN-9999");
    }

    #[test]
    fn test_format_widens_past_four_digits() {
        assert_eq!(candidate_id_from_sequence(12345), "CAN-12345");
    }

    #[test]
    fn test_is_candidate_id() {
        assert!(is_candidate_id("CAN-0001"));
        assert!(is_candidate_id("CAN-12345"));
        assert!(!is_candidate_id("CAN-"));
        assert!(!is_candidate_id("CAN-12a4"));
        assert!(!is_candidate_id("J_K7NP3X"));
        assert!(!is_candidate_id(""));
    }

    #[test]
    fn test_round_trip() {
        for seq in [1i64, 7, 100, 99999] {
            let id = candidate_id_from_sequence(seq);
            assert_eq!(sequence_from_candidate_id(&id), Some(seq));
        }
    }
}
