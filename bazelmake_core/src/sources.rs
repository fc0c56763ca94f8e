/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Classification of source-file paths by extension. Only files that a C/C++
//! compiler consumes directly are kept as compilation inputs; headers and
//! everything else are dropped from `srcs` lists.

/// The extension of the final path component including the leading dot, or
/// the empty string when there is none. `a/b.pb.cc` has extension `.cc`.
pub fn extension(path: &str) -> &str {
    let base = match path.rsplit_once('/') {
        Some((_, base)) => base,
        None => path,
    };
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// `path` with [`extension`] removed.
pub fn strip_extension(path: &str) -> &str {
    &path[..path.len() - extension(path).len()]
}

/// Whether `path` names a compilable C/C++ translation unit.
///
/// `.c` must match exactly; the other families match by substring so that
/// variant spellings (`.cc`, `.cxx`, `.cpp`, `.cppm`, ...) are accepted. The
/// substring rule also accepts oddities like `.ccx`; that permissiveness is
/// long-standing behavior that real BUILD inputs rely on not to error.
pub fn is_cc_source(path: &str) -> bool {
    let ext = extension(path);
    ext == ".c" || ext.contains(".cc") || ext.contains(".cx") || ext.contains(".cpp")
}

/// Keeps only the compilable entries of a `srcs` list, preserving order.
pub fn filter_sources(srcs: Vec<String>) -> Vec<String> {
    srcs.into_iter().filter(|src| is_cc_source(src)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("a/b/m.cc"), ".cc");
        assert_eq!(extension("x/y.proto"), ".proto");
        assert_eq!(extension("a/b.pb.cc"), ".cc");
        assert_eq!(extension("dir.with.dots/file"), "");
        assert_eq!(extension("Makefile"), "");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("app/m.cc"), "app/m");
        assert_eq!(strip_extension("x/y.proto"), "x/y");
        assert_eq!(strip_extension("a/b.pb.cc"), "a/b.pb");
        assert_eq!(strip_extension("Makefile"), "Makefile");
    }

    #[test]
    fn test_is_cc_source() {
        assert!(is_cc_source("m.c"));
        assert!(is_cc_source("m.cc"));
        assert!(is_cc_source("m.cpp"));
        assert!(is_cc_source("m.cxx"));
        // The substring rule is intentionally permissive.
        assert!(is_cc_source("m.ccx"));

        assert!(!is_cc_source("m.h"));
        assert!(!is_cc_source("m.hpp"));
        assert!(!is_cc_source("m.proto"));
        assert!(!is_cc_source("m.canything"));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let input = vec![
            "a.cc".to_owned(),
            "b.h".to_owned(),
            "c.cpp".to_owned(),
            "d.md".to_owned(),
        ];
        let once = filter_sources(input);
        let twice = filter_sources(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, vec!["a.cc".to_owned(), "c.cpp".to_owned()]);
    }
}
