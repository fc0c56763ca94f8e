/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Filesystem expansion of `glob(...)` patterns.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;

/// Expands `patterns` against the directory that contains the BUILD file.
///
/// Matches are recorded relative to `dir`. When a match is itself a
/// directory, its immediate children are added as well (the directory entry
/// stays in the result; the source-extension filter drops it later). The
/// result is deduplicated and sorted, so glob output never depends on
/// filesystem enumeration order.
///
/// A malformed pattern is a hard error; individual unreadable entries are
/// skipped the way shell globbing skips them.
pub fn expand(dir: &Path, patterns: &[String]) -> anyhow::Result<Vec<String>> {
    let mut matched = BTreeSet::new();
    for pattern in patterns {
        let full = dir.join(pattern);
        let entries = glob::glob(&full.to_string_lossy())
            .with_context(|| format!("invalid glob pattern `{}`", pattern))?;
        for entry in entries.filter_map(Result::ok) {
            if entry.is_dir() {
                let children = glob::glob(&format!("{}/*", entry.display()))
                    .with_context(|| format!("invalid glob pattern `{}`", pattern))?;
                for child in children.filter_map(Result::ok) {
                    matched.insert(relative_to(dir, &child));
                }
            }
            matched.insert(relative_to(dir, &entry));
        }
    }
    Ok(matched.into_iter().collect())
}

fn relative_to(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_expand_sorted_and_deduplicated() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "b.cc");
        touch(tmp.path(), "a.cc");
        touch(tmp.path(), "c.h");

        let got = expand(
            tmp.path(),
            &["*.cc".to_owned(), "a.cc".to_owned(), "*.h".to_owned()],
        )
        .unwrap();
        assert_eq!(got, vec!["a.cc".to_owned(), "b.cc".to_owned(), "c.h".to_owned()]);
    }

    #[test]
    fn test_directory_match_adds_children() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        touch(tmp.path(), "sub/x.cc");
        touch(tmp.path(), "sub/y.cc");

        let got = expand(tmp.path(), &["sub".to_owned()]).unwrap();
        assert_eq!(
            got,
            vec!["sub".to_owned(), "sub/x.cc".to_owned(), "sub/y.cc".to_owned()]
        );
    }

    #[test]
    fn test_no_matches() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(expand(tmp.path(), &["*.cc".to_owned()]).unwrap().is_empty());
    }
}
