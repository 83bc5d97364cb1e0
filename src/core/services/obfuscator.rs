use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::models::artifact::ObfuscatedPayload;

/// Key baked into generated artifacts for the packed format.
pub const DEFAULT_MASK_KEY: &str = "envigen-obfuscation";

/// Obfuscate a value as per-scalar XOR pairs.
///
/// Each Unicode scalar value gets one fresh `u32` key drawn from a
/// ChaCha8 generator seeded once per call; the cipher entry is the
/// scalar XOR its key. A seed of exactly zero means "seed from
/// entropy" and results are then intentionally non-reproducible. Any
/// nonzero seed is fully deterministic: identical `(value, seed)`
/// always yields identical output.
pub fn obfuscate(value: &str, seed: u64) -> ObfuscatedPayload {
    let mut rng = if seed == 0 {
        ChaCha8Rng::from_entropy()
    } else {
        ChaCha8Rng::seed_from_u64(seed)
    };

    let mut keys = Vec::new();
    let mut cipher = Vec::new();
    for ch in value.chars() {
        let key = rng.next_u32();
        keys.push(key);
        cipher.push(ch as u32 ^ key);
    }

    ObfuscatedPayload { keys, cipher }
}

/// Recover the original string from per-scalar XOR pairs.
///
/// Mismatched sequence lengths yield the empty string, not an error.
/// XOR results that are not valid scalar values (only reachable for
/// pairs that did not come from `obfuscate`) map to U+FFFD.
pub fn deobfuscate(keys: &[u32], cipher: &[u32]) -> String {
    if keys.len() != cipher.len() {
        return String::new();
    }

    keys.iter()
        .zip(cipher)
        .map(|(k, c)| char::from_u32(k ^ c).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Mask a value with repeating-key byte-wise XOR, base64-encoded so it
/// embeds as a quoted literal. Empty values stay empty.
pub fn mask_with_key(value: &str, key: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    BASE64.encode(xor_bytes(value.as_bytes(), key.as_bytes()))
}

/// Reverse of `mask_with_key`. Undecodable input yields the empty
/// string, not an error.
pub fn unmask_with_key(encoded: &str, key: &str) -> String {
    if encoded.is_empty() {
        return String::new();
    }
    let Ok(data) = BASE64.decode(encoded) else {
        return String::new();
    };
    String::from_utf8_lossy(&xor_bytes(&data, key.as_bytes())).into_owned()
}

/// Repeating-key XOR over raw bytes; its own inverse. Also used by the
/// emitter to build byte-table constants for the packed format.
pub fn xor_bytes(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ key[i % key.len()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u64 = 12345;

    #[test]
    fn round_trip_across_inputs() {
        let inputs = [
            "",
            "a",
            "hello",
            "привет",
            "123456",
            "!@#$%^&*()",
            "многострочная\nстрока\tс\tтабуляцией",
            "line with spaces and symbols: !@#$%^&*()_+-=[]{}|;':\",./<>?",
            "\u{1}\u{2}\u{3}",
            "emoji 🦀 too",
        ];

        for input in inputs {
            let payload = obfuscate(input, SEED);
            assert_eq!(payload.keys.len(), input.chars().count());
            assert_eq!(payload.keys.len(), payload.cipher.len());
            assert_eq!(deobfuscate(&payload.keys, &payload.cipher), input, "{input:?}");
        }
    }

    #[test]
    fn round_trip_with_entropy_seed() {
        let payload = obfuscate("test string", 0);

        assert_eq!(deobfuscate(&payload.keys, &payload.cipher), "test string");
    }

    #[test]
    fn same_seed_same_output() {
        let a = obfuscate("test value", SEED);
        let b = obfuscate("test value", SEED);

        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = obfuscate("test value", 12345);
        let b = obfuscate("test value", 54321);

        assert!(a.keys.iter().zip(&b.keys).any(|(x, y)| x != y));
        assert!(a.cipher.iter().zip(&b.cipher).any(|(x, y)| x != y));
        assert_eq!(deobfuscate(&a.keys, &a.cipher), "test value");
        assert_eq!(deobfuscate(&b.keys, &b.cipher), "test value");
    }

    #[test]
    fn mismatched_lengths_decode_to_empty() {
        assert_eq!(deobfuscate(&[1, 2], &[3]), "");
        assert_eq!(deobfuscate(&[], &[]), "");
    }

    #[test]
    fn single_character_pair_decodes() {
        assert_eq!(deobfuscate(&[100], &[100 ^ 'a' as u32]), "a");
    }

    #[test]
    fn mask_round_trip() {
        for value in ["hello", "привет мир", "k", "longer than the key, by a lot"] {
            let masked = mask_with_key(value, DEFAULT_MASK_KEY);
            assert_ne!(masked, value);
            assert_eq!(unmask_with_key(&masked, DEFAULT_MASK_KEY), value);
        }
    }

    #[test]
    fn mask_empty_value_stays_empty() {
        assert_eq!(mask_with_key("", DEFAULT_MASK_KEY), "");
        assert_eq!(unmask_with_key("", DEFAULT_MASK_KEY), "");
    }

    #[test]
    fn unmask_rejects_bad_base64_quietly() {
        assert_eq!(unmask_with_key("not base64!", DEFAULT_MASK_KEY), "");
    }

    #[test]
    fn xor_bytes_is_its_own_inverse() {
        let data = b"some raw bytes";
        let key = b"key";

        assert_eq!(xor_bytes(&xor_bytes(data, key), key), data);
    }
}
