//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Length of a derived credential, in base64url characters
pub const CREDENTIAL_LENGTH: usize = 16;

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key)
        .expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Derive a deterministic credential for `subject`
///
/// The same secret and subject always produce the same credential, so a
/// roster can be re-imported without invalidating credentials already
/// handed out. The subject is trimmed and lowercased first.
pub fn derive_credential(secret: &[u8; 32], subject: &str) -> String {
    let subject = subject.trim().to_lowercase();
    let mac = hmac_sha256(secret, subject.as_bytes());
    let mut encoded = general_purpose::URL_SAFE_NO_PAD.encode(mac);
    encoded.truncate(CREDENTIAL_LENGTH);
    encoded
}

/// Sign a payload with HMAC-SHA256, base64 encoded
pub fn sign_payload(key: &[u8], payload: &[u8]) -> String {
    to_base64(&hmac_sha256(key, payload))
}

/// Check a presented base64 signature against `payload`
///
/// Malformed base64 is treated as a mismatch.
pub fn verify_signature(key: &[u8], payload: &[u8], presented: &str) -> bool {
    match from_base64(presented.trim()) {
        Ok(presented) => constant_time_eq(&hmac_sha256(key, payload), &presented),
        Err(_) => false,
    }
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(mac.to_vec(), expected);
    }

    #[test]
    fn test_base64_roundtrip() {
        let encoded = to_base64(b"roster");
        assert_eq!(from_base64(&encoded).unwrap(), b"roster");
    }

    #[test]
    fn test_derive_credential_is_deterministic() {
        let secret = [7u8; 32];
        let a = derive_credential(&secret, "ana@school.test");
        let b = derive_credential(&secret, "  ANA@school.test ");
        assert_eq!(a, b);
        assert_eq!(a.len(), CREDENTIAL_LENGTH);

        let other = derive_credential(&[8u8; 32], "ana@school.test");
        assert_ne!(a, other);
        assert_ne!(a, derive_credential(&secret, "ben@school.test"));
    }

    #[test]
    fn test_signature_round_trip() {
        let key = b"gateway-secret";
        let body = br#"{"identity":{"id":"uid-1"}}"#;
        let signature = sign_payload(key, body);

        assert!(verify_signature(key, body, &signature));
        assert!(verify_signature(key, body, &format!(" {signature}\n")));
        assert!(!verify_signature(b"other-secret", body, &signature));
        assert!(!verify_signature(key, br#"{"identity":{"id":"uid-2"}}"#, &signature));
        assert!(!verify_signature(key, body, "not base64!"));
        assert!(!verify_signature(key, body, ""));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2, 4]));
        assert!(!constant_time_eq(&[1, 2], &[1, 2, 3]));
    }
}
