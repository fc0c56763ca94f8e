/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Discovery of BUILD files under a library root.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use walkdir::WalkDir;

const BUILD_FILE_NAMES: &[&str] = &["BUILD", "BUILD.bazel"];

/// Recursively enumerates the BUILD files under `library_dir`.
///
/// The returned order is whatever the filesystem walk produced; callers index
/// packages into sorted maps, so discovery order is never observable in the
/// output. An unreadable directory (including a missing library root) is a
/// hard error.
pub fn find_build_files(library_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut build_files = Vec::new();
    for entry in WalkDir::new(library_dir) {
        let entry = entry
            .with_context(|| format!("failed to walk library root `{}`", library_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if BUILD_FILE_NAMES.contains(&name) {
                build_files.push(entry.into_path());
            }
        }
    }
    Ok(build_files)
}
