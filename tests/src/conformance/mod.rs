//! # Conformance Vectors
//!
//! Byte-exact vectors shared with the other SecureFabric SDKs, stored in
//! `tests/vectors/test_vectors.json`. All byte fields are lowercase hex.

use serde::Deserialize;
use sf_types::RawEnvelope;


/// Raw vector file contents.
pub const VECTORS_JSON: &str = include_str!("../../vectors/test_vectors.json");

#[derive(Debug, Deserialize)]
pub struct VectorFile {
    pub aead: Vec<AeadVector>,
    pub ed25519: Vec<SignatureVector>,
    pub blake3: Vec<HashVector>,
    pub message_id: Vec<MessageIdVector>,
    pub canonical_aad: Vec<AadVector>,
    pub envelopes: Vec<EnvelopeVector>,
}

#[derive(Debug, Deserialize)]
pub struct AeadVector {
    pub name: String,
    pub key: String,
    pub nonce: String,
    pub aad: String,
    pub plaintext: String,
    pub ciphertext: String,
}

#[derive(Debug, Deserialize)]
pub struct SignatureVector {
    pub seed: String,
    pub public_key: String,
    pub message: String,
    pub signature: String,
}

/// BLAKE3 over the input `i % 251` for `i in 0..input_len`.
#[derive(Debug, Deserialize)]
pub struct HashVector {
    pub input_len: usize,
    pub hash: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageIdVector {
    pub public_key: String,
    pub seq: u64,
    pub nonce: String,
    pub message_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AadVector {
    pub topic: String,
    pub key_version: u32,
    pub tenant_id: Option<String>,
    pub content_type: Option<String>,
    pub canonical: String,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeVector {
    pub name: String,
    pub seed: String,
    pub symmetric_key: Option<String>,
    pub topic: String,
    pub key_version: u32,
    pub tenant_id: Option<String>,
    pub content_type: Option<String>,
    pub plaintext: String,
    pub seq: u64,
    pub nonce: String,
    pub envelope: RawEnvelope,
}

/// Parse the vector file.
pub fn load() -> Result<VectorFile, serde_json::Error> {
    serde_json::from_str(VECTORS_JSON)
}

/// Decode a hex field into a fixed-size array.
pub fn hex_array<const N: usize>(field: &str) -> [u8; N] {
    let bytes = hex::decode(field).expect("vector field is hex");
    bytes
        .try_into()
        .unwrap_or_else(|v: Vec<u8>| panic!("expected {N} bytes, got {}", v.len()))
}
