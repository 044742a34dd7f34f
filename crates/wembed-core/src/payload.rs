//! Artifact bytes and their base64 payload
//!
//! [`Artifact`] holds the raw module bytes, [`Payload`] the text that ends
//! up between the quotes of a marker line, and [`ArtifactDigest`] a short
//! Blake3 fingerprint used in logs and reports.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt::{self, Display, Formatter};

/// A 32-byte Blake3 digest of artifact bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactDigest([u8; 32]);

impl ArtifactDigest {
    /// Compute digest of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ArtifactDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Raw bytes of a compiled module
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Artifact(Vec<u8>);

impl Artifact {
    /// Create from byte vector
    #[inline]
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Get reference to bytes
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.0
    }

    /// Convert to bytes (consumes self)
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn digest(&self) -> ArtifactDigest {
        ArtifactDigest::compute(&self.0)
    }

    /// Encode with the standard base64 alphabet (padded)
    #[must_use]
    pub fn encode(&self) -> Payload {
        Payload(STANDARD.encode(&self.0))
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Artifact {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

/// Base64 text of an artifact
///
/// Only ever contains ASCII characters from the standard alphabet, so it
/// can be spliced into any text document without re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode base64 text back into artifact bytes
///
/// # Errors
/// Returns the decoder error if `text` is not padded standard base64
pub fn decode(text: &str) -> Result<Artifact, base64::DecodeError> {
    STANDARD.decode(text).map(Artifact::new)
}
