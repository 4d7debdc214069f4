//! Document id generation.
//!
//! Generators only produce candidates. Uniqueness is settled by the
//! allocation loop in [`crate::handler`] against the store.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Source of candidate document ids.
///
/// Shared across concurrent requests, so implementations must be `Send + Sync`.
pub trait IdGenerator: Send + Sync {
    /// Produce a candidate id of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Uniform random ids over the 62-character ASCII alphanumeric alphabet.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self, length: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

/// Whether `id` could have been produced by an [`IdGenerator`] at all.
///
/// # Returns
/// `true` when `id` is non-empty and purely ASCII alphanumeric.
pub fn is_well_formed_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_ids_have_requested_length_and_alphabet() {
        let generator = RandomIdGenerator;
        for length in [1, 12, 64] {
            for _ in 0..50 {
                let id = generator.generate(length);
                assert_eq!(id.chars().count(), length);
                assert!(is_well_formed_id(&id), "unexpected id: {}", id);
            }
        }
    }

    #[test]
    fn random_ids_cover_the_alphabet() {
        let generator = RandomIdGenerator;
        let seen: HashSet<char> = (0..200)
            .flat_map(|_| generator.generate(64).chars().collect::<Vec<_>>())
            .collect();
        // 12_800 uniform draws over 62 symbols; missing one is vanishingly unlikely.
        assert_eq!(seen.len(), 62);
        assert!(seen.iter().all(char::is_ascii_alphanumeric));
    }

    #[test]
    fn well_formed_id_rejects_empty_and_url_unsafe_input() {
        assert!(is_well_formed_id("aZ09"));
        assert!(!is_well_formed_id(""));
        assert!(!is_well_formed_id("nonexistent-id"));
        assert!(!is_well_formed_id("../etc"));
        assert!(!is_well_formed_id("ünï"));
    }
}
