/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Mapping of recognized rule invocations onto uniform target descriptors.
//!
//! Only the named arguments each rule kind cares about are read; positional
//! arguments and unknown keywords are ignored, matching the tolerance of the
//! evaluator itself.

use bazelmake_core::sources;
use bazelmake_core::target::Target;
use starlark_syntax::syntax::ast::ArgumentP;
use starlark_syntax::syntax::ast::AstNoPayload;
use starlark_syntax::syntax::ast::CallArgsP;

use crate::eval::BuildFileEvaluator;
use crate::values::StarValue;

/// The rule kinds this tool models.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    CcLibrary,
    CcProtoLibrary,
    ProtoLibrary,
    ConfigureMake,
    Filegroup,
}

impl RuleKind {
    pub fn from_callee(name: &str) -> Option<RuleKind> {
        match name {
            "cc_library" => Some(RuleKind::CcLibrary),
            "cc_proto_library" => Some(RuleKind::CcProtoLibrary),
            "proto_library" => Some(RuleKind::ProtoLibrary),
            "configure_make" => Some(RuleKind::ConfigureMake),
            "filegroup" => Some(RuleKind::Filegroup),
            _ => None,
        }
    }
}

/// Builds a target descriptor from the named arguments of one recognized
/// rule invocation.
pub(crate) fn extract(
    evaluator: &mut BuildFileEvaluator,
    kind: RuleKind,
    args: &CallArgsP<AstNoPayload>,
) -> anyhow::Result<Target> {
    let mut target = Target::default();
    for arg in &args.args {
        let (arg_name, value) = match &arg.node {
            ArgumentP::Named(arg_name, value) => (arg_name.node.as_str(), value),
            _ => continue,
        };
        let value = evaluator.eval(value)?;
        apply_argument(&mut target, kind, arg_name, value);
    }
    Ok(target)
}

fn apply_argument(target: &mut Target, kind: RuleKind, arg_name: &str, value: StarValue) {
    match (kind, arg_name) {
        (_, "name") => target.name = value.as_string().to_owned(),
        (RuleKind::CcLibrary | RuleKind::ConfigureMake | RuleKind::Filegroup, "srcs") => {
            target.sources = sources::filter_sources(value.into_strings());
        }
        // Proto sources stand in for the files the protobuf compiler will
        // generate next to them.
        (RuleKind::ProtoLibrary, "srcs") => {
            target.sources = value
                .into_strings()
                .iter()
                .map(|src| format!("{}.pb.cc", sources::strip_extension(src)))
                .collect();
        }
        (RuleKind::CcLibrary, "hdrs") => {
            target.headers = sources::filter_sources(value.into_strings());
        }
        (
            RuleKind::CcLibrary | RuleKind::CcProtoLibrary | RuleKind::ProtoLibrary,
            "deps",
        ) => target.dep_labels = value.into_strings(),
        // configure_make points at its sources through `lib_source`; treat it
        // as the dependency list.
        (RuleKind::ConfigureMake, "lib_source") => target.dep_labels = value.into_strings(),
        (RuleKind::CcLibrary, "copts") => target.options = value.into_strings(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use indoc::indoc;

    use crate::eval::evaluate_build_source;
    use crate::eval::EvaluatedFile;

    fn evaluate(content: &str) -> EvaluatedFile {
        evaluate_build_source(Path::new("BUILD"), content.to_owned()).unwrap()
    }

    #[test]
    fn test_proto_library_rewrites_sources() {
        let file = evaluate(indoc! {r#"
            proto_library(
                name = "p",
                srcs = ["x/y.proto"],
                deps = ["//base:base_proto"],
            )
        "#});
        let target = &file.targets[0];
        assert_eq!(target.sources, vec!["x/y.pb.cc".to_owned()]);
        assert_eq!(target.dep_labels, vec!["//base:base_proto".to_owned()]);
    }

    #[test]
    fn test_cc_proto_library_reads_only_name_and_deps() {
        let file = evaluate(indoc! {r#"
            cc_proto_library(
                name = "p_cc",
                srcs = ["ignored.cc"],
                deps = [":p"],
            )
        "#});
        let target = &file.targets[0];
        assert_eq!(target.name, "p_cc");
        assert!(target.sources.is_empty());
        assert_eq!(target.dep_labels, vec![":p".to_owned()]);
    }

    #[test]
    fn test_configure_make_lib_source() {
        let file = evaluate(indoc! {r#"
            configure_make(
                name = "zlib",
                srcs = ["shim.cc"],
                lib_source = "@zlib//:all",
            )
        "#});
        let target = &file.targets[0];
        assert_eq!(target.sources, vec!["shim.cc".to_owned()]);
        assert_eq!(target.dep_labels, vec!["@zlib//:all".to_owned()]);
    }

    #[test]
    fn test_filegroup_sources_filtered() {
        let file = evaluate(indoc! {r#"
            filegroup(
                name = "extra",
                srcs = ["impl.cpp", "README.md"],
            )
        "#});
        assert_eq!(file.targets[0].sources, vec!["impl.cpp".to_owned()]);
    }

    #[test]
    fn test_target_order_preserved() {
        let file = evaluate(indoc! {r#"
            cc_library(name = "a", srcs = ["a.cc"])
            cc_library(name = "b", srcs = ["b.cc"])
        "#});
        let names: Vec<&str> = file.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
