//! wembed core
//!
//! Embeds a compiled WebAssembly module into a JavaScript source as a
//! base64 string literal, so the script ships without a separate binary.
//!
//! # Core Concepts
//!
//! - [`Embedder`]: reads the artifact, substitutes marker lines, rewrites the target
//! - [`Marker`]: the `'<payload>'; // XXX` pattern and its substitution
//! - [`EmbedConfig`]: paths, marker tag and [`MatchPolicy`]
//! - [`FileSystem`]: I/O seam, with [`OsFs`] and [`MemoryFs`]
//!
//! # Example
//!
//! ```rust,ignore
//! use wembed_core::{EmbedConfig, Embedder, MatchPolicy};
//!
//! let config = EmbedConfig::new().with_policy(MatchPolicy::ExactlyOne);
//! let report = Embedder::new(config)?.run()?;
//! println!("{} marker(s) replaced", report.replacements);
//! ```

#![allow(missing_docs)]

pub mod config;
pub mod embedder;
pub mod error;
pub mod fs;
pub mod marker;
pub mod payload;

pub use config::{ConfigFile, EmbedConfig, MatchPolicy};
pub use embedder::{embed, embed_document, CheckReport, EmbedReport, Embedder};
pub use error::{EmbedError, EmbedResult, IoOp};
pub use fs::{FileSystem, MemoryFs, OsFs};
pub use marker::{ExtractedPayload, Marker, Substitution};
pub use payload::{Artifact, ArtifactDigest, Payload};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
