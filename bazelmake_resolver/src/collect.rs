/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Transitive collection of the sources reachable from the root targets.
//!
//! Depth-first preorder: each root's own sources are emitted first, then its
//! dependencies in resolution order, recursively. A dependency is emitted at
//! most once (the deduplication key is the target FQDN, not the source path),
//! so shared subtrees contribute their sources at the point of first
//! reachability.

use std::collections::HashSet;
use std::path::Path;

use bazelmake_core::target;
use bazelmake_core::target::TargetId;

use crate::index::TargetIndex;

/// One source file to compile: a symbol-safe identifier and the path of the
/// file under the global source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub path: String,
}

/// Collects every source required to build `roots`, in deterministic order.
pub fn collect_sources(root: &str, index: &TargetIndex, roots: &[TargetId]) -> Vec<SourceEntry> {
    let mut collector = Collector {
        root,
        index,
        emitted: HashSet::new(),
        entries: Vec::new(),
    };
    for &target in roots {
        collector.emit_sources(target);
        collector.walk_dependencies(target);
    }
    collector.entries
}

struct Collector<'a> {
    root: &'a str,
    index: &'a TargetIndex,
    /// FQDNs of dependencies already emitted. Roots are not recorded here;
    /// each root's own sources are emitted unconditionally.
    emitted: HashSet<String>,
    entries: Vec<SourceEntry>,
}

impl Collector<'_> {
    fn emit_sources(&mut self, id: TargetId) {
        let file = self.index.file(id.file);
        for src in &self.index.target(id).sources {
            let root_relative = file.path().join(src);
            self.entries.push(SourceEntry {
                name: target::source_identifier(root_relative.as_str()),
                path: Path::new(self.root)
                    .join(root_relative.as_str())
                    .to_string_lossy()
                    .into_owned(),
            });
        }
    }

    fn walk_dependencies(&mut self, id: TargetId) {
        let deps = self.index.target(id).resolved_deps.clone();
        for dep in deps {
            if !self.emitted.insert(self.index.fqdn(dep)) {
                continue;
            }
            self.emit_sources(dep);
            self.walk_dependencies(dep);
        }
    }
}
