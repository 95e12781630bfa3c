//! Constant-time equality for secrets and credential tokens.

use subtle::ConstantTimeEq;

/// Compare two byte strings without leaking the position of the first
/// mismatch.
///
/// A length mismatch returns `false` immediately; lengths are not secret here
/// (every credential is a 64-character digest). Equal-length inputs are
/// compared in constant time.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_are_equal() {
        assert!(constant_time_eq(b"hunter2", b"hunter2"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn near_matches_are_rejected() {
        assert!(!constant_time_eq(b"hunter2", b"hunter3"));
        assert!(!constant_time_eq(b"hunter2", b"Hunter2"));
        assert!(!constant_time_eq(b"abcdef", b"abcdeF"));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(!constant_time_eq(b"hunter2", b"hunter22"));
        assert!(!constant_time_eq(b"hunter2", b"hunter"));
        assert!(!constant_time_eq(b"", b"x"));
    }

    #[test]
    fn single_bit_flip_is_rejected() {
        let original = *b"5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
        for index in 0..original.len() {
            let mut tampered = original;
            tampered[index] ^= 0x01;
            assert!(!constant_time_eq(&original, &tampered), "index {index}");
        }
    }
}
