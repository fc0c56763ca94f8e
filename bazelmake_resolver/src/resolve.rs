/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The resolver driver: walk, evaluate, index, resolve.
//!
//! All four phases run to completion in order, single-threaded. Iteration
//! everywhere follows a deterministic order (libraries as declared in
//! configuration, packages lexicographically within a library, targets in
//! file order, dependency labels in written order), so the resolved graph
//! and with it the rendered Makefile is a pure function of configuration
//! and filesystem state.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use bazelmake_core::config::Config;
use bazelmake_core::label::Label;
use bazelmake_core::library::LibraryResolver;
use bazelmake_core::library::LibrarySpec;
use bazelmake_core::package::PackagePath;
use bazelmake_core::target::TargetId;
use bazelmake_interpreter::eval;
use tracing::debug;

use crate::index::TargetIndex;
use crate::walk;

/// Output of [`Resolver::resolve`]: the fully populated index and the
/// user-specified roots, in configuration order.
#[derive(Debug)]
pub struct Resolution {
    pub index: TargetIndex,
    pub roots: Vec<TargetId>,
}

pub struct Resolver<'a> {
    config: &'a Config,
    libraries: LibraryResolver,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a Config) -> anyhow::Result<Resolver<'a>> {
        Ok(Resolver {
            config,
            libraries: config.library_resolver()?,
        })
    }

    pub fn resolve(&self) -> anyhow::Result<Resolution> {
        let mut index = TargetIndex::new(&self.config.ignores);
        self.load_libraries(&mut index)?;
        self.resolve_dependencies(&mut index)?;
        let roots = self.resolve_roots(&index)?;
        Ok(Resolution { index, roots })
    }

    /// Walks every library root and evaluates each BUILD file into the index.
    fn load_libraries(&self, index: &mut TargetIndex) -> anyhow::Result<()> {
        for spec in self.libraries.iter() {
            index.register_library(spec.name());
            if !spec.has_root() {
                debug!("library `{}` has no root, indexing no packages", spec.name());
                continue;
            }
            let library_dir = self.library_dir(spec);
            for build_path in walk::find_build_files(&library_dir)? {
                let evaluated = eval::evaluate_build_file(&build_path)?;
                let package = spec.root_package().join(&package_relative_dir(
                    &library_dir,
                    &build_path,
                ));
                debug!(
                    "indexed package `@{}//{}` with {} targets",
                    spec.name(),
                    package,
                    evaluated.targets.len()
                );
                index.insert_file(spec.name().clone(), package, evaluated);
            }
        }
        Ok(())
    }

    /// Resolves every target's dependency labels into target ids. Lookups are
    /// read-only over the whole index, so the resolved edges are collected
    /// first and written back afterwards.
    fn resolve_dependencies(&self, index: &mut TargetIndex) -> anyhow::Result<()> {
        let mut resolved = Vec::new();
        for spec in self.libraries.iter() {
            for file_id in index.files_of_library(spec.name()) {
                let file = index.file(file_id);
                for (target_index, target) in file.targets().iter().enumerate() {
                    let mut deps = Vec::new();
                    for dep in &target.dep_labels {
                        let resolve_one = || -> anyhow::Result<Option<TargetId>> {
                            let label = Label::parse(dep, spec, file.path(), &self.libraries)?;
                            index.lookup(&label)
                        };
                        let dep_id = resolve_one().with_context(|| {
                            format!(
                                "when resolving dependency `{}` of target `{}` in package `@{}//{}`",
                                dep,
                                target.name,
                                spec.name(),
                                file.path()
                            )
                        })?;
                        if let Some(dep_id) = dep_id {
                            deps.push(dep_id);
                        }
                    }
                    resolved.push((
                        TargetId {
                            file: file_id,
                            index: target_index,
                        },
                        deps,
                    ));
                }
            }
        }
        for (id, deps) in resolved {
            index.set_resolved_deps(id, deps);
        }
        Ok(())
    }

    /// Looks up the configured root targets, in input order. A root that
    /// resolves to nothing (ignored, or in an empty library) is skipped.
    fn resolve_roots(&self, index: &TargetIndex) -> anyhow::Result<Vec<TargetId>> {
        let mut roots = Vec::new();
        for entry in &self.config.targets {
            let spec = self.libraries.get(&entry.library)?;
            let label = Label {
                library: spec.name().clone(),
                path: entry.path.clone(),
                package: PackagePath::new(entry.path.as_str()),
                name: entry.name.clone(),
                original: format!("@{}//{}:{}", entry.library, entry.path, entry.name),
            };
            let root = index.lookup(&label).with_context(|| {
                format!("when resolving configured target `{}`", label.original)
            })?;
            match root {
                Some(id) => roots.push(id),
                None => debug!("configured target `{}` resolved to nothing", label.original),
            }
        }
        Ok(roots)
    }

    fn library_dir(&self, spec: &LibrarySpec) -> PathBuf {
        Path::new(&self.config.root).join(spec.root())
    }
}

/// Directory of `build_path` relative to the library root, as a
/// forward-slash string; empty for the root package itself.
fn package_relative_dir(library_dir: &Path, build_path: &Path) -> String {
    build_path
        .parent()
        .and_then(|dir| dir.strip_prefix(library_dir).ok())
        .map(|rel| rel.to_string_lossy().into_owned())
        .unwrap_or_default()
}
