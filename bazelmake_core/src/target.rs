/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Target descriptors and their index handles.
//!
//! A 'Target' is the uniform representation of one recognized rule invocation
//! in a BUILD file. Targets are owned by the file record they were declared
//! in; all cross-references (a target's resolved dependencies, the roots the
//! user asked for) are by-id into the flat file vector held by the target
//! index, so the graph carries no ownership cycles.

use dupe::Dupe;

use crate::library::LibraryName;
use crate::package::PackagePath;
use crate::sources;

/// Position of a file record in the target index's flat file vector.
#[derive(Clone, Copy, Dupe, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct FileId(pub usize);

/// One target within one file record.
#[derive(Clone, Copy, Dupe, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct TargetId {
    pub file: FileId,
    pub index: usize,
}

/// Uniform descriptor of a buildable unit extracted from a rule invocation.
/// `resolved_deps` starts empty and is populated once by the dependency
/// resolver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    /// Relative source paths, already extension-filtered.
    pub sources: Vec<String>,
    /// Header paths; informational only.
    pub headers: Vec<String>,
    /// Compile options; informational only.
    pub options: Vec<String>,
    /// Dependency labels exactly as written.
    pub dep_labels: Vec<String>,
    pub resolved_deps: Vec<TargetId>,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Target {
        Target {
            name: name.into(),
            ..Target::default()
        }
    }
}

/// `@library//package:name`: the globally unique identifier of a target,
/// used as the deduplication key during transitive collection and in
/// diagnostics.
pub fn fqdn(library: &LibraryName, package: &PackagePath, name: &str) -> String {
    format!("@{}//{}:{}", library, package, name)
}

/// `library_package_name` with every `/` replaced by `_`; a valid Make
/// identifier fragment for naming per-target variables and object files.
pub fn object_identifier(library: &LibraryName, package: &PackagePath, name: &str) -> String {
    format!("{}_{}_{}", library, package, name).replace('/', "_")
}

/// Identifier for a single source file: the root-relative path with its
/// extension stripped and every `/` replaced by `_`.
pub fn source_identifier(root_relative: &str) -> String {
    sources::strip_extension(root_relative).replace('/', "_")
}
