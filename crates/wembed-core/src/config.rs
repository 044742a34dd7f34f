//! Embed configuration
//!
//! Defaults reproduce the original build step: the `strange_attractors`
//! module is embedded into `js/wasm.js` at every `// XXX` marker.

use crate::error::EmbedError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default binary artifact path (relative to the working directory)
pub const DEFAULT_ARTIFACT_PATH: &str = "rust/pkg/strange_attractors_bg.wasm";

/// Default target document path (relative to the working directory)
pub const DEFAULT_TARGET_PATH: &str = "js/wasm.js";

/// Default trailing comment identifying a marker line
pub const DEFAULT_MARKER_TAG: &str = "// XXX";

/// How many marker replacements a run must make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Zero or more; zero rewrites the document unchanged
    #[default]
    Any,
    /// One or more
    AtLeastOne,
    /// Exactly one
    ExactlyOne,
}

impl MatchPolicy {
    /// Names accepted by [`FromStr`]
    pub const NAMES: [&'static str; 3] = ["any", "at-least-one", "exactly-one"];

    /// Whether `found` replacements satisfy the policy
    #[inline]
    #[must_use]
    pub const fn accepts(self, found: usize) -> bool {
        match self {
            Self::Any => true,
            Self::AtLeastOne => found >= 1,
            Self::ExactlyOne => found == 1,
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any number of"),
            Self::AtLeastOne => f.write_str("at least one"),
            Self::ExactlyOne => f.write_str("exactly one"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "at-least-one" => Ok(Self::AtLeastOne),
            "exactly-one" => Ok(Self::ExactlyOne),
            other => Err(format!(
                "unknown match policy '{other}' (expected one of: {})",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Paths and matching rules for one embed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Binary artifact to embed
    pub artifact: PathBuf,
    /// Document receiving the payload
    pub target: PathBuf,
    /// Trailing comment marking the substitution line
    pub tag: String,
    /// Required replacement count
    pub expect: MatchPolicy,
}

impl EmbedConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With artifact path
    #[inline]
    #[must_use]
    pub fn with_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact = path.into();
        self
    }

    /// With target document path
    #[inline]
    #[must_use]
    pub fn with_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = path.into();
        self
    }

    /// With marker tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// With match policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.expect = policy;
        self
    }

    /// Resolve relative paths against `root`
    #[must_use]
    pub fn rooted_at(mut self, root: &Path) -> Self {
        if self.artifact.is_relative() {
            self.artifact = root.join(&self.artifact);
        }
        if self.target.is_relative() {
            self.target = root.join(&self.target);
        }
        self
    }

    /// Overlay values from a parsed config file
    #[must_use]
    pub fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(artifact) = file.artifact {
            self.artifact = artifact;
        }
        if let Some(target) = file.target {
            self.target = target;
        }
        if let Some(tag) = file.tag {
            self.tag = tag;
        }
        if let Some(expect) = file.expect {
            self.expect = expect;
        }
        self
    }

    /// Load a TOML config file on top of the defaults
    ///
    /// # Errors
    /// Returns [`EmbedError::Config`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EmbedError> {
        Ok(Self::default().merge(ConfigFile::load(path)?))
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            artifact: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            target: PathBuf::from(DEFAULT_TARGET_PATH),
            tag: DEFAULT_MARKER_TAG.to_string(),
            expect: MatchPolicy::default(),
        }
    }
}

/// On-disk configuration; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub artifact: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub tag: Option<String>,
    pub expect: Option<MatchPolicy>,
}

impl ConfigFile {
    /// Parse TOML text
    ///
    /// # Errors
    /// Returns the TOML error message on malformed input
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`EmbedError::Config`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EmbedError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EmbedError::config(path, e.to_string()))?;
        Self::parse(&text).map_err(|message| EmbedError::config(path, message))
    }
}
