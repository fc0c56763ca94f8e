/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//!
//! # Target index
//! The sole lookup structure of the resolver: every evaluated BUILD file is
//! recorded as a 'BuildFile' in a flat vector, indexed per library by a
//! sorted map from package path to position. Targets are addressed by
//! 'TargetId' into that vector, so dependency edges never own their
//! endpoints.
//!
//! A lookup can legitimately resolve to nothing. That happens when the label
//! points into a library indexed with no packages, when the label matches the
//! configured ignore set, or when it names a top-level rule the interpreter
//! recorded in `other_names`. Those outcomes are expected and silent;
//! a package or target that is genuinely missing is an error.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use bazelmake_core::config::IgnoreEntry;
use bazelmake_core::label::Label;
use bazelmake_core::library::LibraryName;
use bazelmake_core::package::PackagePath;
use bazelmake_core::target;
use bazelmake_core::target::FileId;
use bazelmake_core::target::Target;
use bazelmake_core::target::TargetId;
use bazelmake_interpreter::eval::EvaluatedFile;
use starlark_map::small_map::SmallMap;
use starlark_map::small_set::SmallSet;
use thiserror::Error;

#[derive(Error, Debug)]
enum IndexError {
    #[error("library `{0}` is not indexed")]
    UnregisteredLibrary(LibraryName),
    #[error("package `{package}` does not exist in library `{library}` (referenced by `{label}`)")]
    UnknownPackage {
        library: LibraryName,
        package: PackagePath,
        label: String,
    },
    #[error("target `{name}` does not exist in package `@{library}//{package}` (referenced by `{label}`)")]
    UnknownTarget {
        library: LibraryName,
        package: PackagePath,
        name: String,
        label: String,
    },
}

/// One BUILD file's package: the targets it declares plus the names of the
/// top-level rules this tool does not model.
#[derive(Debug)]
pub struct BuildFile {
    library: LibraryName,
    path: PackagePath,
    targets: Vec<Target>,
    target_by_name: SmallMap<String, usize>,
    other_names: SmallSet<String>,
}

impl BuildFile {
    pub fn library(&self) -> &LibraryName {
        &self.library
    }

    pub fn path(&self) -> &PackagePath {
        &self.path
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}

#[derive(Debug)]
pub struct TargetIndex {
    files: Vec<BuildFile>,
    by_library: HashMap<LibraryName, BTreeMap<PackagePath, FileId>>,
    ignores: HashSet<String>,
}

impl TargetIndex {
    pub fn new(ignores: &[IgnoreEntry]) -> TargetIndex {
        TargetIndex {
            files: Vec::new(),
            by_library: HashMap::new(),
            ignores: ignores
                .iter()
                .map(|entry| format!("{}:{}", entry.path, entry.name))
                .collect(),
        }
    }

    /// Every configured library must be registered, packages or not: a
    /// library that is registered but empty resolves silently to nothing,
    /// while an unregistered one is a hard error.
    pub fn register_library(&mut self, library: &LibraryName) {
        self.by_library.entry(library.clone()).or_default();
    }

    pub fn insert_file(
        &mut self,
        library: LibraryName,
        path: PackagePath,
        evaluated: EvaluatedFile,
    ) -> FileId {
        let id = FileId(self.files.len());
        let target_by_name = evaluated
            .targets
            .iter()
            .enumerate()
            .map(|(idx, target)| (target.name.clone(), idx))
            .collect();
        self.by_library
            .entry(library.clone())
            .or_default()
            .insert(path.clone(), id);
        self.files.push(BuildFile {
            library,
            path,
            targets: evaluated.targets,
            target_by_name,
            other_names: evaluated.other_names,
        });
        id
    }

    pub fn file(&self, id: FileId) -> &BuildFile {
        &self.files[id.0]
    }

    pub fn target(&self, id: TargetId) -> &Target {
        &self.files[id.file.0].targets[id.index]
    }

    pub fn set_resolved_deps(&mut self, id: TargetId, deps: Vec<TargetId>) {
        self.files[id.file.0].targets[id.index].resolved_deps = deps;
    }

    /// File records of one library in lexicographic package-path order.
    pub fn files_of_library(&self, library: &LibraryName) -> Vec<FileId> {
        match self.by_library.get(library) {
            Some(packages) => packages.values().copied().collect(),
            None => Vec::new(),
        }
    }

    /// Resolves a parsed label against the index. `Ok(None)` is the silent
    /// absent resolution described in the module docs.
    pub fn lookup(&self, label: &Label) -> anyhow::Result<Option<TargetId>> {
        let packages = self
            .by_library
            .get(&label.library)
            .ok_or_else(|| IndexError::UnregisteredLibrary(label.library.clone()))?;
        if packages.is_empty() {
            return Ok(None);
        }
        if self.ignores.contains(&label.ignore_token()) {
            return Ok(None);
        }
        let file_id = packages.get(&label.package).copied().ok_or_else(|| {
            IndexError::UnknownPackage {
                library: label.library.clone(),
                package: label.package.clone(),
                label: label.original.clone(),
            }
        })?;
        let file = self.file(file_id);
        if file.other_names.contains(label.name.as_str()) {
            return Ok(None);
        }
        match file.target_by_name.get(label.name.as_str()) {
            Some(index) => Ok(Some(TargetId {
                file: file_id,
                index: *index,
            })),
            None => Err(IndexError::UnknownTarget {
                library: label.library.clone(),
                package: label.package.clone(),
                name: label.name.clone(),
                label: label.original.clone(),
            }
            .into()),
        }
    }

    pub fn fqdn(&self, id: TargetId) -> String {
        let file = self.file(id.file);
        target::fqdn(&file.library, &file.path, &self.target(id).name)
    }

    pub fn object_identifier(&self, id: TargetId) -> String {
        let file = self.file(id.file);
        target::object_identifier(&file.library, &file.path, &self.target(id).name)
    }
}

#[cfg(test)]
mod tests {
    use bazelmake_core::library::LibraryResolver;
    use bazelmake_core::library::LibrarySpec;

    use super::*;

    fn libraries() -> LibraryResolver {
        LibraryResolver::new([
            LibrarySpec::new(LibraryName::new("app"), "app"),
            LibrarySpec::new(LibraryName::new("stub"), ""),
        ])
        .unwrap()
    }

    fn evaluated(names: &[&str], other: &[&str]) -> EvaluatedFile {
        EvaluatedFile {
            targets: names.iter().map(|n| Target::new(*n)).collect(),
            other_names: other.iter().map(|n| (*n).to_owned()).collect(),
        }
    }

    fn label(libs: &LibraryResolver, dep: &str) -> Label {
        let referrer = libs.get("app").unwrap();
        Label::parse(dep, referrer, &PackagePath::new("app"), libs).unwrap()
    }

    fn index() -> TargetIndex {
        let mut index = TargetIndex::new(&[IgnoreEntry {
            path: "app".to_owned(),
            name: "skipped".to_owned(),
        }]);
        index.register_library(&LibraryName::new("app"));
        index.register_library(&LibraryName::new("stub"));
        index.insert_file(
            LibraryName::new("app"),
            PackagePath::new("app"),
            evaluated(&["main", "util", "skipped"], &["main_test"]),
        );
        index
    }

    #[test]
    fn test_lookup_target() {
        let libs = libraries();
        let index = index();
        let id = index.lookup(&label(&libs, ":util")).unwrap().unwrap();
        assert_eq!(index.target(id).name, "util");
        assert_eq!(index.fqdn(id), "@app//app:util");
        assert_eq!(index.object_identifier(id), "app_app_util");
    }

    #[test]
    fn test_absent_resolutions() {
        let libs = libraries();
        let index = index();
        // Library with no packages.
        assert!(index.lookup(&label(&libs, "@stub//x:y")).unwrap().is_none());
        // Ignore set, matched against the label path as written.
        assert!(index.lookup(&label(&libs, ":skipped")).unwrap().is_none());
        // Rule recorded as an other-name.
        assert!(index.lookup(&label(&libs, ":main_test")).unwrap().is_none());
    }

    #[test]
    fn test_hard_errors() {
        let libs = libraries();
        let index = index();
        let err = index.lookup(&label(&libs, "//nope:x")).unwrap_err();
        assert!(err.to_string().contains("package `app/nope`"), "{}", err);
        let err = index.lookup(&label(&libs, ":missing")).unwrap_err();
        assert!(err.to_string().contains("target `missing`"), "{}", err);
    }
}
