use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    AeadCore, Aes256Gcm, Nonce,
};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;
use thiserror::Error;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Placeholder rendered by read paths in place of a value that failed
/// to decrypt. A stale key or corrupted token degrades one cell, never
/// a whole listing or export.
pub const DECRYPT_SENTINEL: &str = "[Encrypted]";

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const IP_HASH_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CodecError {
    /// The value does not have the `nonce:tag:ciphertext` token shape.
    /// Callers pass the original value through unchanged.
    #[error("value is not an encryption token")]
    NotAToken,

    /// The token parsed but authentication failed (wrong key, flipped
    /// bits). Callers render the sentinel instead.
    #[error("decryption failed: authentication error")]
    AuthFailed,
}

/// Reversible, authenticated encryption for individual answer values
/// plus keyed one-way hashing for client IPs.
///
/// Key material is loaded once at startup; construction fails hard on
/// a missing or malformed key so the process never runs unencrypted.
pub struct FieldCodec {
    cipher: Aes256Gcm,
    ip_salt: Vec<u8>,
}

impl FieldCodec {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let key_hex = config.field_encryption_key.expose_secret();
        if key_hex.is_empty() {
            return Err(AppError::InternalError(
                "FIELD_ENCRYPTION_KEY is not set; refusing to start without an encryption key"
                    .to_string(),
            ));
        }

        let key = hex::decode(key_hex).map_err(|_| {
            AppError::InternalError("FIELD_ENCRYPTION_KEY is not valid hex".to_string())
        })?;

        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| {
            AppError::InternalError(format!(
                "FIELD_ENCRYPTION_KEY must be 32 bytes, got {}",
                key.len()
            ))
        })?;

        let ip_salt = config.ip_hash_salt.expose_secret().as_bytes().to_vec();
        if ip_salt.is_empty() {
            return Err(AppError::InternalError(
                "IP_HASH_SALT is not set; refusing to start without an IP hashing salt".to_string(),
            ));
        }

        Ok(Self { cipher, ip_salt })
    }

    /// Encrypts a single answer value into a self-contained
    /// `hex(nonce):hex(tag):hex(ciphertext)` token. A fresh random
    /// nonce is drawn per call.
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| AppError::InternalError("field encryption failed".to_string()))?;

        // aes-gcm appends the 16-byte auth tag to the ciphertext
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        Ok(format!(
            "{}:{}:{}",
            hex::encode(nonce),
            hex::encode(tag),
            hex::encode(ciphertext)
        ))
    }

    /// Reverses [`encrypt`](Self::encrypt). A value without the token
    /// shape is `CodecError::NotAToken`; a well-formed token that fails
    /// authentication is `CodecError::AuthFailed`. Never panics.
    pub fn decrypt(&self, token: &str) -> Result<String, CodecError> {
        let parts: Vec<&str> = token.split(':').collect();
        if parts.len() != 3 {
            return Err(CodecError::NotAToken);
        }

        let nonce = hex::decode(parts[0]).map_err(|_| CodecError::NotAToken)?;
        let tag = hex::decode(parts[1]).map_err(|_| CodecError::NotAToken)?;
        let ciphertext = hex::decode(parts[2]).map_err(|_| CodecError::NotAToken)?;

        if nonce.len() != NONCE_LEN || tag.len() != TAG_LEN {
            return Err(CodecError::NotAToken);
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), sealed.as_ref())
            .map_err(|_| CodecError::AuthFailed)?;

        String::from_utf8(plaintext).map_err(|_| CodecError::AuthFailed)
    }

    /// Applies the full read-path policy: decrypted plaintext on
    /// success, the original value for non-tokens (legacy plaintext
    /// under a PII field), the sentinel on authentication failure.
    pub fn decrypt_or_sentinel(&self, value: &str) -> String {
        match self.decrypt(value) {
            Ok(plaintext) => plaintext,
            Err(CodecError::NotAToken) => value.to_string(),
            Err(CodecError::AuthFailed) => {
                log::warn!("answer value failed decryption; rendering sentinel");
                DECRYPT_SENTINEL.to_string()
            }
        }
    }

    /// Keyed one-way hash of a client IP, truncated to 16 hex chars.
    /// Raw IPs are never persisted; the hash supports only equality
    /// comparison and audit.
    pub fn hash_ip(&self, ip: &str) -> String {
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&self.ip_salt)
            .expect("HMAC accepts any key length");
        mac.update(ip.as_bytes());
        let digest = mac.finalize().into_bytes();
        hex::encode(digest)[..IP_HASH_LEN].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> FieldCodec {
        FieldCodec::from_config(&Config::test_config()).expect("test codec")
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let codec = codec();
        for value in ["alice@example.com", "", "He said, \"hi\"\nBye", "日本語"] {
            let token = codec.encrypt(value).unwrap();
            assert_eq!(codec.decrypt(&token).unwrap(), value);
        }
    }

    #[test]
    fn token_has_three_hex_parts_and_fresh_nonces() {
        let codec = codec();
        let a = codec.encrypt("secret").unwrap();
        let b = codec.encrypt("secret").unwrap();

        let parts: Vec<&str> = a.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), NONCE_LEN * 2);
        assert_eq!(parts[1].len(), TAG_LEN * 2);
        assert!(parts.iter().all(|p| hex::decode(p).is_ok()));

        // random nonce per call means distinct tokens
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_token_is_not_a_token() {
        let codec = codec();
        for bad in ["plain text", "a:b", "a:b:c:d", "zz:zz:zz", ""] {
            assert!(matches!(codec.decrypt(bad), Err(CodecError::NotAToken)));
        }
    }

    #[test]
    fn tampered_tag_fails_auth_without_panicking() {
        let codec = codec();
        let token = codec.encrypt("secret value").unwrap();
        let mut parts: Vec<String> = token.split(':').map(String::from).collect();

        // flip one byte in the auth tag segment
        let mut tag = hex::decode(&parts[1]).unwrap();
        tag[0] ^= 0xff;
        parts[1] = hex::encode(tag);

        let tampered = parts.join(":");
        match codec.decrypt(&tampered) {
            Err(CodecError::AuthFailed) => {}
            other => panic!("expected AuthFailed, got {:?}", other),
        }
    }

    #[test]
    fn decrypt_or_sentinel_policy() {
        let codec = codec();

        let token = codec.encrypt("pii").unwrap();
        assert_eq!(codec.decrypt_or_sentinel(&token), "pii");

        // non-token passes through unchanged
        assert_eq!(codec.decrypt_or_sentinel("plain"), "plain");

        // tampered token renders the sentinel
        let mut parts: Vec<String> = token.split(':').map(String::from).collect();
        let mut tag = hex::decode(&parts[1]).unwrap();
        tag[3] ^= 0x01;
        parts[1] = hex::encode(tag);
        assert_eq!(codec.decrypt_or_sentinel(&parts.join(":")), DECRYPT_SENTINEL);
    }

    #[test]
    fn ip_hash_is_fixed_length_and_stable() {
        let codec = codec();
        let h1 = codec.hash_ip("203.0.113.7");
        let h2 = codec.hash_ip("203.0.113.7");
        let h3 = codec.hash_ip("203.0.113.8");

        assert_eq!(h1.len(), IP_HASH_LEN);
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert!(hex::decode(&h1).is_ok());
    }

    #[test]
    fn missing_key_fails_construction() {
        let mut config = Config::test_config();
        config.field_encryption_key = secrecy::SecretString::from("".to_string());
        assert!(FieldCodec::from_config(&config).is_err());

        let mut config = Config::test_config();
        config.field_encryption_key = secrecy::SecretString::from("abcd".to_string());
        assert!(FieldCodec::from_config(&config).is_err());
    }
}
