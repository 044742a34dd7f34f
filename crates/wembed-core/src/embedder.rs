//! The embed step
//!
//! Reads the artifact, encodes it, substitutes every marker in the target
//! document and rewrites the document in place. All work happens in
//! memory; the target is written once, after every check has passed, so a
//! failed run never leaves a partial document behind.

use crate::config::EmbedConfig;
use crate::error::{EmbedError, EmbedResult, IoOp};
use crate::fs::{FileSystem, OsFs};
use crate::marker::{Marker, Substitution};
use crate::payload::{self, Artifact, ArtifactDigest, Payload};
use std::path::PathBuf;

/// Outcome of an embed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    pub artifact: PathBuf,
    pub target: PathBuf,
    /// Artifact size in bytes
    pub artifact_len: usize,
    /// Encoded payload size in bytes
    pub payload_len: usize,
    pub digest: ArtifactDigest,
    /// Marker lines replaced
    pub replacements: usize,
    /// Whether the document content changed
    pub changed: bool,
}

/// Outcome of a check run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub target: PathBuf,
    pub digest: ArtifactDigest,
    /// Marker lines found
    pub markers: usize,
    /// Line numbers whose payload does not decode to the artifact
    pub stale_lines: Vec<usize>,
}

impl CheckReport {
    /// True when every marker already holds the current artifact
    #[inline]
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.stale_lines.is_empty()
    }
}

/// Embeds one artifact into one target document
#[derive(Debug)]
pub struct Embedder<F = OsFs> {
    config: EmbedConfig,
    marker: Marker,
    fs: F,
}

impl Embedder<OsFs> {
    /// Create embedder backed by the real filesystem
    ///
    /// # Errors
    /// Returns [`EmbedError::InvalidTag`] if the configured tag is unusable
    pub fn new(config: EmbedConfig) -> EmbedResult<Self> {
        Self::with_fs(config, OsFs)
    }
}

impl<F: FileSystem> Embedder<F> {
    /// Create embedder with an injected filesystem
    ///
    /// # Errors
    /// Returns [`EmbedError::InvalidTag`] if the configured tag is unusable
    pub fn with_fs(config: EmbedConfig, fs: F) -> EmbedResult<Self> {
        let marker = Marker::new(config.tag.clone())?;
        Ok(Self { config, marker, fs })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Read the full artifact
    ///
    /// # Errors
    /// [`EmbedError::ArtifactNotFound`] or [`EmbedError::Io`]
    pub fn read_artifact(&self) -> EmbedResult<Artifact> {
        let path = &self.config.artifact;
        let bytes = self
            .fs
            .read(path)
            .map_err(|e| EmbedError::artifact_read(path, e))?;
        tracing::debug!("Read artifact {} ({} bytes)", path.display(), bytes.len());
        Ok(Artifact::new(bytes))
    }

    /// Read the full target document
    ///
    /// # Errors
    /// [`EmbedError::TargetNotFound`], [`EmbedError::InvalidUtf8`] or [`EmbedError::Io`]
    pub fn read_target(&self) -> EmbedResult<String> {
        let path = &self.config.target;
        let text = self
            .fs
            .read_to_string(path)
            .map_err(|e| EmbedError::target_read(path, e))?;
        tracing::debug!("Read target {} ({} bytes)", path.display(), text.len());
        Ok(text)
    }

    /// Embed the artifact into the target document
    ///
    /// # Errors
    /// - Read failures on either file
    /// - [`EmbedError::MarkerCount`] if the match policy rejects the count
    /// - [`EmbedError::Io`] if the target cannot be written
    pub fn run(&self) -> EmbedResult<EmbedReport> {
        let artifact = self.read_artifact()?;
        let payload = artifact.encode();
        let document = self.read_target()?;

        let substitution = embed_document(&document, &payload, &self.marker);
        self.enforce_policy(substitution.replacements)?;
        if substitution.replacements == 0 {
            tracing::warn!(
                "No '{}' marker found in {}; document left unchanged",
                self.marker.tag(),
                self.config.target.display()
            );
        }

        let target = &self.config.target;
        self.fs
            .write(target, substitution.text.as_bytes())
            .map_err(|e| EmbedError::io_error(target, IoOp::Write, e))?;

        let report = EmbedReport {
            artifact: self.config.artifact.clone(),
            target: target.clone(),
            artifact_len: artifact.len(),
            payload_len: payload.len(),
            digest: artifact.digest(),
            replacements: substitution.replacements,
            changed: substitution.changed,
        };
        tracing::info!(
            "Embedded {} ({} bytes, {}) into {}: {} marker(s) replaced",
            report.artifact.display(),
            report.artifact_len,
            report.digest.short(),
            report.target.display(),
            report.replacements
        );
        Ok(report)
    }

    /// Compare the embedded payloads against the artifact without writing
    ///
    /// # Errors
    /// Read failures on either file, or [`EmbedError::MarkerCount`]
    pub fn check(&self) -> EmbedResult<CheckReport> {
        let artifact = self.read_artifact()?;
        let document = self.read_target()?;
        let found = self.marker.extract(&document);
        self.enforce_policy(found.len())?;

        let stale_lines = found
            .iter()
            .filter(|p| !payload::decode(p.text).is_ok_and(|a| a == artifact))
            .map(|p| p.line)
            .collect::<Vec<_>>();
        for line in &stale_lines {
            tracing::debug!("Stale payload on line {line}");
        }

        Ok(CheckReport {
            target: self.config.target.clone(),
            digest: artifact.digest(),
            markers: found.len(),
            stale_lines,
        })
    }

    /// Decode the payload of the `index`-th marker (0-based)
    ///
    /// # Errors
    /// Target read failures, [`EmbedError::NoPayload`] or [`EmbedError::Decode`]
    pub fn extract(&self, index: usize) -> EmbedResult<Artifact> {
        let document = self.read_target()?;
        let found = self.marker.extract(&document);
        let entry = found.get(index).ok_or(EmbedError::NoPayload {
            index,
            found: found.len(),
        })?;
        let artifact = payload::decode(entry.text).map_err(|source| EmbedError::Decode {
            line: entry.line,
            source,
        })?;
        tracing::info!(
            "Extracted {} bytes from line {} of {}",
            artifact.len(),
            entry.line,
            self.config.target.display()
        );
        Ok(artifact)
    }

    fn enforce_policy(&self, found: usize) -> EmbedResult<()> {
        if self.config.expect.accepts(found) {
            Ok(())
        } else {
            Err(EmbedError::MarkerCount {
                path: self.config.target.clone(),
                policy: self.config.expect,
                found,
            })
        }
    }
}

/// Substitute `payload` into every marker of `document` (no I/O)
#[must_use]
pub fn embed_document(document: &str, payload: &Payload, marker: &Marker) -> Substitution {
    marker.substitute(document, payload)
}

/// Embed the default artifact into the default target, relative to the
/// working directory
///
/// # Errors
/// See [`Embedder::run`]
pub fn embed() -> EmbedResult<EmbedReport> {
    Embedder::new(EmbedConfig::default())?.run()
}
