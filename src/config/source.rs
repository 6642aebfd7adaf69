// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Where raw config YAML comes from. Abstracted so tests can load from
/// strings without touching the filesystem.
pub trait ConfigSource {
    fn load(&self) -> Result<String, std::io::Error>;
}

/// Loads config from a file path.
pub struct FileSource {
    pub path: PathBuf,
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<String, std::io::Error> {
        std::fs::read_to_string(&self.path)
    }
}

/// Loads config from an in-memory string.
pub struct StringSource(pub String);

impl ConfigSource for StringSource {
    fn load(&self) -> Result<String, std::io::Error> {
        Ok(self.0.clone())
    }
}
