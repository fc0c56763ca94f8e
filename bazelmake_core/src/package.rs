/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//!
//! # Package path
//! A package is the directory containing a BUILD file. Within the target
//! index a package is identified by its 'PackagePath': the forward-slash
//! separated path of that directory relative to the global source root, i.e.
//! the library `root` joined with the directory's path relative to it (the
//! "prefixed" form).
//!
//! Using the prefixed form everywhere means a source file's on-disk location
//! is always `<global root>/<package path>/<relative source>`, and the
//! include-path list derived from library roots can locate every emitted
//! source without per-library bookkeeping.
//!
//! The empty path is valid and names the directory of the global source root
//! itself (it only occurs for a library whose `root` is empty).

use derive_more::Display;

/// Forward-slash relative path of a package, in prefixed form (see module
/// docs). No leading or trailing slash.
#[derive(Clone, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct PackagePath(String);

impl PackagePath {
    pub fn new(path: impl Into<String>) -> PackagePath {
        let path: String = path.into();
        PackagePath(path.trim_matches('/').to_owned())
    }

    pub fn empty() -> PackagePath {
        PackagePath(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins a further relative path; either side may be empty.
    pub fn join(&self, rel: &str) -> PackagePath {
        let rel = rel.trim_matches('/');
        if self.0.is_empty() {
            PackagePath(rel.to_owned())
        } else if rel.is_empty() {
            self.clone()
        } else {
            PackagePath(format!("{}/{}", self.0, rel))
        }
    }

    /// Final path component, or the whole path if there is no separator.
    pub fn basename(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((_, base)) => base,
            None => &self.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(PackagePath::new("/a/b/").as_str(), "a/b");
        assert_eq!(PackagePath::new("").as_str(), "");
        assert!(PackagePath::empty().is_empty());
    }

    #[test]
    fn test_join() {
        let root = PackagePath::new("third_party/ext");
        assert_eq!(root.join("sub").as_str(), "third_party/ext/sub");
        assert_eq!(root.join("").as_str(), "third_party/ext");
        assert_eq!(PackagePath::empty().join("app").as_str(), "app");
    }

    #[test]
    fn test_basename() {
        assert_eq!(PackagePath::new("a/b/c").basename(), "c");
        assert_eq!(PackagePath::new("app").basename(), "app");
        assert_eq!(PackagePath::empty().basename(), "");
    }
}
