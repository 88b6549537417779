//! Envelope wire format
//!
//! ```text
//! +----------------------+----------------+---------------------+
//! | sealed session key   | payload length | encrypted payload   |
//! | key_block_len bytes  | u32 big-endian | `length` bytes      |
//! +----------------------+----------------+---------------------+
//! ```
//!
//! The history log is a bare concatenation of envelopes. The key block size
//! is fixed by the RSA modulus and the payload carries its own length, so a
//! reader can walk the log without delimiters.

use crate::error::{TrailError, TrailResult};

/// Size of the payload length field
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// One self-delimiting encrypted unit of the history log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// RSA-OAEP ciphertext of the AES key and IV
    pub sealed_key: Vec<u8>,
    /// AES-CBC ciphertext of the padded entry
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(sealed_key: Vec<u8>, payload: Vec<u8>) -> Self {
        Self {
            sealed_key,
            payload,
        }
    }

    /// Total size on disk
    pub fn encoded_len(&self) -> usize {
        self.sealed_key.len() + LENGTH_PREFIX_SIZE + self.payload.len()
    }

    /// Serialize to the wire layout
    pub fn to_bytes(&self) -> TrailResult<Vec<u8>> {
        let length = u32::try_from(self.payload.len()).map_err(|_| {
            TrailError::Crypto(format!(
                "Payload of {} bytes does not fit the length field",
                self.payload.len()
            ))
        })?;

        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.sealed_key);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&self.payload);
        Ok(out)
    }
}

/// Split a history log into its envelopes
///
/// Fails with [`TrailError::Consistency`] if the log ends partway through
/// an envelope.
pub fn split_envelopes(log: &[u8], key_block_len: usize) -> TrailResult<Vec<Envelope>> {
    let mut envelopes = Vec::new();
    let mut rest = log;

    while !rest.is_empty() {
        let offset = log.len() - rest.len();
        let header_len = key_block_len + LENGTH_PREFIX_SIZE;
        if rest.len() < header_len {
            return Err(TrailError::Consistency(format!(
                "Truncated envelope header at offset {}: need {} bytes, have {}",
                offset,
                header_len,
                rest.len()
            )));
        }

        let (sealed_key, tail) = rest.split_at(key_block_len);
        let (length, tail) = tail.split_at(LENGTH_PREFIX_SIZE);
        let length = u32::from_be_bytes([length[0], length[1], length[2], length[3]]) as usize;

        if tail.len() < length {
            return Err(TrailError::Consistency(format!(
                "Truncated envelope payload at offset {}: need {} bytes, have {}",
                offset,
                length,
                tail.len()
            )));
        }

        let (payload, tail) = tail.split_at(length);
        envelopes.push(Envelope::new(sealed_key.to_vec(), payload.to_vec()));
        rest = tail;
    }

    Ok(envelopes)
}
