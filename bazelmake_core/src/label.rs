/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//!
//! # Label
//! The parsed form of a dependency string. A label names a target within a
//! package within a library, using one of the shapes below (first match on
//! the leading character wins):
//!
//! ```text
//! @lib//pkg:target   explicit library, package and target
//! @lib//:target      target in the library root package
//! @lib//pkg          target named after the last component of pkg
//! @lib// or @lib     target named after the last component of lib's root
//! //pkg:target       referrer's library
//! //pkg              referrer's library, target named after pkg's basename
//! :target            referrer's package
//! target             referrer's package
//! ```
//!
//! `path` holds the package path exactly as written in the label; the ignore
//! set matches against it. `package` is the prefixed package path used to
//! look the label up in the target index: for shapes that write a
//! library-relative path it is `lib.root` joined with `path`, while for
//! referrer-relative shapes it is the referrer's package verbatim (which is
//! already prefixed).

use std::fmt;

use thiserror::Error;

use crate::library::LibraryName;
use crate::library::LibraryResolver;
use crate::library::LibrarySpec;
use crate::package::PackagePath;

#[derive(Error, Debug)]
enum LabelError {
    #[error("empty dependency label")]
    Empty,
    #[error("expected `//` at the start of dependency label `{0}`")]
    MissingSecondSlash(String),
    #[error("failed to parse dependency label `{0}`: more than one `//`")]
    TooManySeparators(String),
    #[error("failed to parse dependency label `{0}`: more than one `:`")]
    TooManyColons(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub library: LibraryName,
    /// Package path as written in the label; may be empty.
    pub path: String,
    /// Prefixed package path used for index lookup.
    pub package: PackagePath,
    pub name: String,
    /// The raw dependency string, kept for diagnostics.
    pub original: String,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

fn basename(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((_, base)) => base,
        None => path,
    }
}

/// Splits `pkg:name`, defaulting the name to the basename of the package
/// path when no `:` is present and the path is non-empty.
fn split_path_and_name<'a>(
    original: &str,
    rest: &'a str,
) -> Result<Option<(&'a str, &'a str)>, LabelError> {
    match rest.split_once(':') {
        Some((path, name)) => {
            if name.contains(':') {
                return Err(LabelError::TooManyColons(original.to_owned()));
            }
            Ok(Some((path, name)))
        }
        None if !rest.is_empty() => Ok(Some((rest, basename(rest)))),
        None => Ok(None),
    }
}

impl Label {
    /// Parses a dependency string written inside the package
    /// `referrer_package` of library `referrer_library`.
    pub fn parse(
        original: &str,
        referrer_library: &LibrarySpec,
        referrer_package: &PackagePath,
        libraries: &LibraryResolver,
    ) -> anyhow::Result<Label> {
        let first = match original.chars().next() {
            Some(first) => first,
            None => return Err(LabelError::Empty.into()),
        };
        match first {
            '@' => {
                let rest = &original[1..];
                match rest.split_once("//") {
                    Some((lib_name, path_part)) => {
                        if path_part.contains("//") {
                            return Err(LabelError::TooManySeparators(original.to_owned()).into());
                        }
                        let spec = libraries.get(lib_name)?;
                        let (path, name) = match split_path_and_name(original, path_part)? {
                            Some((path, name)) => (path.to_owned(), name.to_owned()),
                            None => (String::new(), spec.root_basename().to_owned()),
                        };
                        Ok(Label {
                            library: spec.name().clone(),
                            package: spec.root_package().join(&path),
                            path,
                            name,
                            original: original.to_owned(),
                        })
                    }
                    // Bare `@lib`: the target named like the library root, in
                    // the library root package.
                    None => {
                        let spec = libraries.get(rest)?;
                        Ok(Label {
                            library: spec.name().clone(),
                            path: String::new(),
                            package: spec.root_package(),
                            name: spec.root_basename().to_owned(),
                            original: original.to_owned(),
                        })
                    }
                }
            }
            ':' => Ok(Label {
                library: referrer_library.name().clone(),
                path: referrer_package.as_str().to_owned(),
                package: referrer_package.clone(),
                name: original[1..].to_owned(),
                original: original.to_owned(),
            }),
            '/' => {
                let rest = match original.strip_prefix("//") {
                    Some(rest) => rest,
                    None => {
                        return Err(LabelError::MissingSecondSlash(original.to_owned()).into());
                    }
                };
                if rest.contains("//") {
                    return Err(LabelError::TooManySeparators(original.to_owned()).into());
                }
                let (path, name) = match split_path_and_name(original, rest)? {
                    Some((path, name)) => (path.to_owned(), name.to_owned()),
                    None => (String::new(), referrer_library.root_basename().to_owned()),
                };
                Ok(Label {
                    library: referrer_library.name().clone(),
                    package: referrer_library.root_package().join(&path),
                    path,
                    name,
                    original: original.to_owned(),
                })
            }
            _ => Ok(Label {
                library: referrer_library.name().clone(),
                path: referrer_package.as_str().to_owned(),
                package: referrer_package.clone(),
                name: original.to_owned(),
                original: original.to_owned(),
            }),
        }
    }

    /// The `"path:name"` token matched against the configured ignore set.
    pub fn ignore_token(&self) -> String {
        format!("{}:{}", self.path, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::LibraryName;

    fn libraries() -> LibraryResolver {
        LibraryResolver::new([
            LibrarySpec::new(LibraryName::new("app"), "app"),
            LibrarySpec::new(LibraryName::new("ext"), "third_party/ext"),
        ])
        .unwrap()
    }

    fn parse(dep: &str) -> anyhow::Result<Label> {
        let libs = libraries();
        let referrer = libs.get("app").unwrap();
        let package = PackagePath::new("app/sub");
        Label::parse(dep, referrer, &package, &libs)
    }

    #[track_caller]
    fn check(dep: &str, library: &str, path: &str, package: &str, name: &str) {
        let label = parse(dep).unwrap();
        assert_eq!(label.library.as_str(), library, "library of {}", dep);
        assert_eq!(label.path, path, "path of {}", dep);
        assert_eq!(label.package.as_str(), package, "package of {}", dep);
        assert_eq!(label.name, name, "name of {}", dep);
        assert_eq!(label.to_string(), dep);
    }

    #[test]
    fn test_library_qualified_shapes() {
        check("@ext//sub:k", "ext", "sub", "third_party/ext/sub", "k");
        check("@ext//:k", "ext", "", "third_party/ext", "k");
        check("@ext//sub/deep", "ext", "sub/deep", "third_party/ext/sub/deep", "deep");
        check("@ext//", "ext", "", "third_party/ext", "ext");
        check("@ext", "ext", "", "third_party/ext", "ext");
    }

    #[test]
    fn test_referrer_relative_shapes() {
        check("//pkg:t", "app", "pkg", "app/pkg", "t");
        check("//pkg", "app", "pkg", "app/pkg", "pkg");
        check(":t", "app", "app/sub", "app/sub", "t");
        check("t", "app", "app/sub", "app/sub", "t");
    }

    #[test]
    fn test_malformed() {
        assert!(parse("").is_err());
        assert!(parse("/one-slash").is_err());
        assert!(parse("@ext//a//b:t").is_err());
        assert!(parse("@ext//a:b:c").is_err());
        assert!(parse("@nope//x:y").is_err());
        assert!(parse("@nope").is_err());
    }

    #[test]
    fn test_ignore_token_uses_path_as_written() {
        assert_eq!(parse("@ext//sub:k").unwrap().ignore_token(), "sub:k");
        assert_eq!(parse(":t").unwrap().ignore_token(), "app/sub:t");
    }
}
