//! Embedded verifier public key
//!
//! Log entries are sealed for a single private-key holder outside this
//! program. Its RSA-2048 public key is compiled in; there is no key
//! distribution or rotation interface.

use std::sync::OnceLock;

use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;

use crate::error::{TrailError, TrailResult};

/// PEM (SubjectPublicKeyInfo) of the verifier's RSA-2048 key
pub const EMBEDDED_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEApLrm3+PqnidkFIh8BGpY
r1MhGF7MTwzrE5h3wQfx37/X65Tw7qh62D9E3kn7WdW7ETVaKb0nRTv0Ym265Fdv
nNdtCzrFsAEnLcEfxpMcEbodEWLtQ2JFZgNYm3+QtfgVumREc3W+ojEaGPw7Vowp
OzULStvsdC1USXXKm9JYvLEuyOyosfZDF4flKSt3F59sVrbFeoXBXCKK2JFxhuvP
K0Pka6VIsoyJwAnLqmeJOWIhpakfFTvrkHxZo2YihEIJvdhlmpRjj1CSgorZwMgG
QIaS6KkIZl9JAeie9fmCGiUKsN7Me/WyeNGnd/ZAR9ScbNTQPJNIYp//ZQGBu8BF
HwIDAQAB
-----END PUBLIC KEY-----
";

static EMBEDDED_KEY: OnceLock<Result<RsaPublicKey, String>> = OnceLock::new();

/// Parse a PEM-encoded SubjectPublicKeyInfo RSA key
pub fn load_public_key_pem(pem: &str) -> TrailResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem.trim())
        .map_err(|e| TrailError::Crypto(format!("Failed to load public key: {}", e)))
}

/// The embedded key, parsed once per process
///
/// A parse failure is cached too, and reported on every call.
pub fn embedded_public_key() -> TrailResult<&'static RsaPublicKey> {
    EMBEDDED_KEY
        .get_or_init(|| load_public_key_pem(EMBEDDED_PUBLIC_KEY_PEM).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| TrailError::Crypto(e.clone()))
}
