/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The YAML configuration consumed by `bazel2make`. Parsing is strict:
//! unknown fields are rejected so that a typoed key fails loudly instead of
//! silently changing the produced Makefile.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::library::LibraryName;
use crate::library::LibraryResolver;
use crate::library::LibrarySpec;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Global source root; every emitted path is joined under it.
    #[serde(default)]
    pub root: String,
    /// User-visible root targets, resolved through the target index.
    #[serde(default)]
    pub targets: Vec<TargetEntry>,
    /// Labels resolved to nothing, silently.
    #[serde(default)]
    pub ignores: Vec<IgnoreEntry>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    /// Executable name; passed through to the Makefile.
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub compiler: String,
    /// Appended after the include paths derived from library roots.
    #[serde(default)]
    pub include_paths: Vec<String>,
    /// Extra sources compiled in addition to the resolved ones.
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub compiler_options: Vec<String>,
    #[serde(default)]
    pub linker_options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetEntry {
    pub library: String,
    /// Prefixed package path of the BUILD file declaring the target.
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreEntry {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub root: String,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file `{}`", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file `{}`", path.display()))
    }

    /// The library declarations as a name-to-spec resolver.
    pub fn library_resolver(&self) -> anyhow::Result<LibraryResolver> {
        Ok(LibraryResolver::new(self.libraries.iter().map(|entry| {
            LibrarySpec::new(LibraryName::new(entry.name.as_str()), entry.root.as_str())
        }))?)
    }
}
