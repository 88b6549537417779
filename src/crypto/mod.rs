//! Cryptographic functions for edit-trail
//!
//! Provides hybrid RSA-OAEP + AES-256-CBC envelope encryption of log
//! entries under an embedded verifier public key.

pub mod envelope;
pub mod hybrid;
pub mod public_key;

pub use envelope::{split_envelopes, Envelope, LENGTH_PREFIX_SIZE};
pub use hybrid::{encrypt, EntrySealer, HybridCipher, PlainSealer};
pub use public_key::{embedded_public_key, load_public_key_pem};

/// Verifier-side helpers for tests: a fixed RSA-2048 keypair and envelope
/// decryption.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::OnceLock;

    use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::{Oaep, RsaPrivateKey};
    use sha2::Sha256;

    use super::hybrid::{AES_KEY_SIZE, SESSION_SECRET_SIZE};
    use super::{Envelope, HybridCipher};

    const TEST_KEY_PEM: &str = include_str!("testdata/test_key.pem");

    static TEST_KEY: OnceLock<RsaPrivateKey> = OnceLock::new();

    pub fn test_private_key() -> &'static RsaPrivateKey {
        TEST_KEY.get_or_init(|| RsaPrivateKey::from_pkcs8_pem(TEST_KEY_PEM).unwrap())
    }

    pub fn test_cipher() -> HybridCipher {
        HybridCipher::new(test_private_key().to_public_key())
    }

    /// Decrypt one envelope with the test private key
    pub fn open(envelope: &Envelope) -> Vec<u8> {
        let session = test_private_key()
            .decrypt(Oaep::new::<Sha256>(), &envelope.sealed_key)
            .unwrap();
        assert_eq!(session.len(), SESSION_SECRET_SIZE);

        let (key, iv) = session.split_at(AES_KEY_SIZE);
        cbc::Decryptor::<aes::Aes256>::new_from_slices(key, iv)
            .unwrap()
            .decrypt_padded_vec_mut::<Pkcs7>(&envelope.payload)
            .unwrap()
    }

    /// Decrypt every envelope in a history log into UTF-8 entries
    pub fn open_log(log: &[u8]) -> Vec<String> {
        super::split_envelopes(log, 256)
            .unwrap()
            .iter()
            .map(|envelope| String::from_utf8(open(envelope)).unwrap())
            .collect()
    }
}
