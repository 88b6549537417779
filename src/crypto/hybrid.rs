//! Hybrid RSA-OAEP + AES-256-CBC encryption
//!
//! Each call draws a fresh AES-256 key and IV, encrypts the payload with
//! AES-CBC/PKCS#7, then seals `key || iv` under the verifier's RSA key with
//! OAEP (SHA-256 for both the digest and MGF1, empty label). The result is
//! one [`Envelope`].

use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{TrailError, TrailResult};

use super::envelope::Envelope;
use super::public_key::embedded_public_key;

/// AES-256 key size in bytes
pub const AES_KEY_SIZE: usize = 32;
/// AES block-sized IV in bytes
pub const AES_IV_SIZE: usize = 16;
/// `key || iv`, the secret sealed under RSA
pub const SESSION_SECRET_SIZE: usize = AES_KEY_SIZE + AES_IV_SIZE;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// Turns a rendered log entry into the bytes written to the history log
pub trait EntrySealer {
    fn seal(&self, entry: &[u8]) -> TrailResult<Vec<u8>>;
}

/// Envelope encryption under a single RSA public key
#[derive(Debug, Clone)]
pub struct HybridCipher {
    public_key: RsaPublicKey,
}

impl HybridCipher {
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Cipher for the compiled-in verifier key
    pub fn embedded() -> TrailResult<Self> {
        Ok(Self::new(embedded_public_key()?.clone()))
    }

    /// Size of the sealed session key block (the RSA modulus size)
    pub fn key_block_len(&self) -> usize {
        self.public_key.size()
    }

    /// Encrypt a payload into a fresh envelope
    pub fn encrypt_envelope(&self, plaintext: &[u8]) -> TrailResult<Envelope> {
        let mut session = Zeroizing::new([0u8; SESSION_SECRET_SIZE]);
        OsRng
            .try_fill_bytes(&mut session[..])
            .map_err(|e| TrailError::Crypto(format!("Random source failed: {}", e)))?;

        let (key, iv) = session.split_at(AES_KEY_SIZE);
        let payload = Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(|e| TrailError::Crypto(format!("Failed to create cipher: {}", e)))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let sealed_key = self
            .public_key
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &session[..])
            .map_err(|e| TrailError::Crypto(format!("Failed to seal session key: {}", e)))?;

        Ok(Envelope::new(sealed_key, payload))
    }

    /// Encrypt a payload into envelope wire bytes
    pub fn encrypt(&self, plaintext: &[u8]) -> TrailResult<Vec<u8>> {
        self.encrypt_envelope(plaintext)?.to_bytes()
    }
}

impl EntrySealer for HybridCipher {
    fn seal(&self, entry: &[u8]) -> TrailResult<Vec<u8>> {
        self.encrypt(entry)
    }
}

/// Writes entries unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSealer;

impl EntrySealer for PlainSealer {
    fn seal(&self, entry: &[u8]) -> TrailResult<Vec<u8>> {
        Ok(entry.to_vec())
    }
}

/// Encrypt a payload under the embedded verifier key
pub fn encrypt(plaintext: &[u8]) -> TrailResult<Vec<u8>> {
    HybridCipher::embedded()?.encrypt(plaintext)
}
