//! Testing utilities for wembed workspace
//!
//! Shared fixtures: a throwaway project directory laid out like the
//! original build (`rust/pkg/*.wasm` + `js/wasm.js`) and a few helpers for
//! reading payloads back out of documents.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wembed_core::config::{DEFAULT_ARTIFACT_PATH, DEFAULT_TARGET_PATH};
use wembed_core::{payload, Marker};

/// Smallest valid module: magic + version
pub const EMPTY_MODULE: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

/// Loader script shaped like the one the tool was written for
pub fn loader_script(payload: &str) -> String {
    format!(
        "function loadWasm(event) {{\n\
         \x20   // need XXX at the end of the line to be able to find and replace it automatically\n\
         \x20   const wasmb64 = '{payload}'; // XXX\n\
         \x20   const wasmBinary = window.atob(wasmb64);\n\
         }}\n"
    )
}

/// Temporary project directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Empty project
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Project with artifact and target at their default locations
    pub fn with_defaults(artifact: &[u8], document: &str) -> Self {
        let project = Self::new();
        project.write(DEFAULT_ARTIFACT_PATH, artifact);
        project.write(DEFAULT_TARGET_PATH, document);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.path(DEFAULT_ARTIFACT_PATH)
    }

    pub fn target_path(&self) -> PathBuf {
        self.path(DEFAULT_TARGET_PATH)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, relative: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> Vec<u8> {
        fs::read(self.path(relative)).unwrap()
    }

    pub fn read_text(&self, relative: impl AsRef<Path>) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn target_text(&self) -> String {
        self.read_text(DEFAULT_TARGET_PATH)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode every `// XXX` payload in `document`
pub fn decode_markers(document: &str) -> Vec<Vec<u8>> {
    let marker = Marker::new("// XXX").unwrap();
    marker
        .extract(document)
        .into_iter()
        .map(|p| payload::decode(p.text).unwrap().into_bytes())
        .collect()
}
