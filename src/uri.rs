/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! Deterministic identifier minting. Identifiers are name-based version-5 UUIDs
//! (RFC 4122: SHA-1 over a namespace UUID plus the key) rendered into a
//! fixed-prefix URI. The same (base, key) always yields the same URI, so
//! re-ingesting a document or span is idempotent; distinct keys collide only with
//! cryptographic improbability.

use sha1::{Digest, Sha1};

use crate::types::OffsetRange;

/// The DNS namespace UUID from RFC 4122 appendix C, the namespace the original NIF
/// tooling hashes document URIs under. Changing it would break identifier
/// compatibility with existing graphs.
const NAMESPACE_DNS: [u8; 16] = [
    0x6b, 0xa7, 0xb8, 0x10, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
    0xc8,
];

/// Compute a version-5 UUID over the DNS namespace and the given key, returned as
/// 32 lowercase hex digits (no hyphens).
fn uuid5_hex(key: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(NAMESPACE_DNS);
    hasher.update(key);
    let digest = hasher.finalize();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    //set version (5) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x50;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    base16ct::lower::encode_string(&bytes)
}

/// Mints URIs for documents, contexts and sub-spans. A pure function of its
/// inputs: no state, no randomness.
#[derive(Debug, Clone)]
pub struct UriScheme {
    /// Base URI all minted identifiers are rendered under, without trailing slash
    base: String,
}

impl UriScheme {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base: String = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// The base URI identifiers are minted under
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Mint an identifier from an arbitrary byte key. Any byte string is a valid key.
    pub fn identifier(&self, key: &[u8]) -> String {
        format!("{}/nif-{}", self.base, uuid5_hex(key))
    }

    /// Mint the identifier for a whole document (used for contexts and collections),
    /// keyed on the document's source URI.
    pub fn document_uri(&self, source_uri: &str) -> String {
        self.identifier(source_uri.as_bytes())
    }

    /// Mint the identifier for a character-offset span within a document. The same
    /// span reprocessed twice yields the same identifier; different spans of the
    /// same document yield distinct ones.
    pub fn span_uri(&self, source_uri: &str, range: &OffsetRange) -> String {
        let key = format!("{}#offset_{}_{}", source_uri, range.begin, range.end);
        self.identifier(key.as_bytes())
    }
}
