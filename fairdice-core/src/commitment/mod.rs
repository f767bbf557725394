use crate::{DiceError, Result};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Secret key length in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

pub type CommitmentKey = [u8; KEY_SIZE];

/// Trait for commitment schemes
pub trait CommitmentScheme {
    type Key;
    type Value;

    /// Hex-encoded commitment to `value` under `key`.
    fn commit(key: &Self::Key, value: &Self::Value) -> Result<String>;

    /// Checks a previously published commitment against the disclosed key and value.
    fn verify(commitment: &str, key: &Self::Key, value: &Self::Value) -> bool;
}

/// HMAC-SHA256 over the decimal ASCII form of the secret value.
///
/// The key is random and stays secret until reveal, so the digest cannot be
/// brute-forced even when the value range is tiny (e.g. a coin flip).
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacCommitment;

impl HmacCommitment {
    fn mac(key: &[u8], value: i64) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| DiceError::crypto(format!("HMAC key rejected: {}", e)))?;
        mac.update(value.to_string().as_bytes());
        Ok(mac)
    }
}

impl CommitmentScheme for HmacCommitment {
    type Key = CommitmentKey;
    type Value = i64;

    fn commit(key: &CommitmentKey, value: &i64) -> Result<String> {
        let mac = Self::mac(key, *value)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn verify(commitment: &str, key: &CommitmentKey, value: &i64) -> bool {
        let Ok(expected) = hex::decode(commitment.trim()) else {
            return false;
        };
        match Self::mac(key, *value) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }
}

/// Fresh 256-bit key for a single protocol run.
pub fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> CommitmentKey {
    let mut key = [0u8; KEY_SIZE];
    rng.fill_bytes(&mut key);
    key
}

/// Parses a hex-encoded key as printed at reveal time.
pub fn parse_key(key_hex: &str) -> Result<CommitmentKey> {
    let bytes = hex::decode(key_hex.trim())
        .map_err(|e| DiceError::crypto(format!("key is not valid hex: {}", e)))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        DiceError::crypto(format!(
            "key must be {} bytes, got {}",
            KEY_SIZE,
            bytes.len()
        ))
    })
}

/// Recomputes the commitment for a disclosed key and value and compares it to `commitment`.
pub fn verify_commitment(commitment: &str, key: &CommitmentKey, value: i64) -> bool {
    HmacCommitment::verify(commitment, key, &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_commitment_scheme() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let key = generate_key(&mut rng);
        let commitment = HmacCommitment::commit(&key, &3).unwrap();

        assert_eq!(commitment.len(), 64);
        assert!(commitment.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(verify_commitment(&commitment, &key, 3));
        assert!(!verify_commitment(&commitment, &key, 4));
    }

    #[test]
    fn test_commitment_depends_on_key() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let key_a = generate_key(&mut rng);
        let key_b = generate_key(&mut rng);
        assert_ne!(key_a, key_b);

        let a = HmacCommitment::commit(&key_a, &1).unwrap();
        let b = HmacCommitment::commit(&key_b, &1).unwrap();
        assert_ne!(a, b);
        assert!(!verify_commitment(&a, &key_b, 1));
    }

    #[test]
    fn test_rfc4231_case_2() {
        // HMAC-SHA256 known answer for key "Jefe"; checks the digest and encoding
        let mut mac = HmacSha256::new_from_slice(b"Jefe").unwrap();
        mac.update(b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let key = [0u8; KEY_SIZE];
        assert!(!verify_commitment("not hex", &key, 0));
        assert!(!verify_commitment("abcd", &key, 0));
    }

    #[test]
    fn test_parse_key() {
        let key = [0xabu8; KEY_SIZE];
        assert_eq!(parse_key(&hex::encode(key)).unwrap(), key);
        assert_eq!(parse_key(&hex::encode_upper(key)).unwrap(), key);
        assert!(matches!(parse_key("abcd"), Err(DiceError::Crypto(_))));
        assert!(matches!(parse_key("zz"), Err(DiceError::Crypto(_))));
    }
}
