/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//!
//! # Library
//! A 'Library' is a named source tree under the global source root. Dependency
//! labels of the form `@name//...` refer into the library registered under
//! `name`. Libraries are declared in configuration and never change during a
//! run.
//!
//! A library may be declared with an empty `root`. Such a library owns no
//! packages; every dependency that points into it resolves to nothing rather
//! than failing, which is how whole subtrees are stubbed out of a build.

use std::borrow::Borrow;
use std::collections::HashMap;

use derive_more::Display;
use itertools::Itertools;
use thiserror::Error;

use crate::package::PackagePath;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("unknown library name: `{0}`. known library names are `{}`", .1.iter().join(", "))]
    UnknownLibrary(String, Vec<LibraryName>),
    #[error("library roots `{1}` and `{2}` were both declared under the name `{0}`")]
    DuplicateName(LibraryName, String, String),
}

/// Canonical name of a library, as written between `@` and `//` in a label.
#[derive(Clone, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct LibraryName(String);

impl LibraryName {
    pub fn new(name: impl Into<String>) -> LibraryName {
        LibraryName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LibraryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A named repository root. `root` is relative to the global source root and
/// may be empty (see module docs).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibrarySpec {
    name: LibraryName,
    root: String,
}

impl LibrarySpec {
    pub fn new(name: LibraryName, root: impl Into<String>) -> LibrarySpec {
        LibrarySpec {
            name,
            root: root.into(),
        }
    }

    pub fn name(&self) -> &LibraryName {
        &self.name
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn has_root(&self) -> bool {
        !self.root.is_empty()
    }

    /// The package path of the library root itself, i.e. the prefixed form of
    /// the empty library-relative path.
    pub fn root_package(&self) -> PackagePath {
        PackagePath::new(&self.root)
    }

    /// Final component of `root`; the default target name for labels that name
    /// the library but no target (`@lib`, `@lib//`).
    pub fn root_basename(&self) -> &str {
        match self.root.rsplit_once('/') {
            Some((_, base)) => base,
            None => &self.root,
        }
    }
}

/// Resolves library names to their 'LibrarySpec', preserving declaration
/// order for deterministic iteration.
#[derive(Debug)]
pub struct LibraryResolver {
    specs: Vec<LibrarySpec>,
    by_name: HashMap<LibraryName, usize>,
}

impl LibraryResolver {
    pub fn new(specs: impl IntoIterator<Item = LibrarySpec>) -> Result<LibraryResolver, LibraryError> {
        let specs: Vec<LibrarySpec> = specs.into_iter().collect();
        let mut by_name = HashMap::new();
        for (idx, spec) in specs.iter().enumerate() {
            if let Some(old) = by_name.insert(spec.name().clone(), idx) {
                return Err(LibraryError::DuplicateName(
                    spec.name().clone(),
                    specs[old].root().to_owned(),
                    spec.root().to_owned(),
                ));
            }
        }
        Ok(LibraryResolver { specs, by_name })
    }

    pub fn get(&self, name: &str) -> Result<&LibrarySpec, LibraryError> {
        self.by_name
            .get(name)
            .map(|idx| &self.specs[*idx])
            .ok_or_else(|| {
                LibraryError::UnknownLibrary(
                    name.to_owned(),
                    self.specs.iter().map(|s| s.name().clone()).sorted().collect(),
                )
            })
    }

    /// Libraries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &LibrarySpec> {
        self.specs.iter()
    }
}
