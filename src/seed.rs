//! Collapses a (name, title) pair into a card seed.

/// Joins the normalized name and title before hashing.
pub const SEPARATOR: char = '|';

/// Trims and lower-cases one input field.
pub fn normalize(field: &str) -> String {
    field.trim().to_lowercase()
}

/// Rolling `hash * 31 + unit` over UTF-16 code units with signed 32-bit wraparound,
/// returning the absolute value. `i32::MIN` maps to `2^31`, hence the `u32` result.
pub fn hash_str(text: &str) -> u32 {
    let hash = text.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32)
    });
    hash.unsigned_abs()
}

/// Seed for a player's card. Total over all inputs, including empty strings;
/// distinct pairs may collide.
pub fn derive_seed(name: &str, title: &str) -> u32 {
    let combined = format!("{}{}{}", normalize(name), SEPARATOR, normalize(title));
    let seed = hash_str(&combined);
    log::debug!("derived seed {seed} from {combined:?}");
    seed
}

/// Both trimmed fields must be non-empty before a card is generated.
pub fn is_generation_ready(name: &str, title: &str) -> bool {
    !name.trim().is_empty() && !title.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_unit_hash_is_its_code() {
        assert_eq!(hash_str(""), 0);
        assert_eq!(hash_str("a"), 97);
        assert_eq!(hash_str("ab"), 97 * 31 + 98);
    }

    #[test]
    fn wraparound_matches_signed_32_bit() {
        // overflows partway through; the signed result is -1236860927
        assert_eq!(hash_str("aaaaaaa"), 1_236_860_927);
    }

    #[test]
    fn readiness_requires_both_fields() {
        assert!(is_generation_ready(" Alice ", "Elf"));
        assert!(!is_generation_ready("Alice", "   "));
        assert!(!is_generation_ready("", "Elf"));
    }
}
