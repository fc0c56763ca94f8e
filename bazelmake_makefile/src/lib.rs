/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Rendering of the resolved source closure as a flat Makefile.
//!
//! The document is a pure function of the configuration and the collected
//! source list: one object rule per source (named by the source's symbol-safe
//! identifier, so object files never collide regardless of directory layout)
//! and a single link rule. No filesystem access happens here.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::Path;

use bazelmake_core::config::Config;
use bazelmake_core::target;
use bazelmake_resolver::collect::SourceEntry;

/// The include paths handed to the compiler: for every library both
/// `root/library.root` and `root/dirname(library.root)`, deduplicated and
/// sorted, followed by the configured extra paths in their written order.
///
/// Including the parent of each library root is what lets `#include
/// "ext/header.h"`-style references resolve without per-target include
/// tracking.
pub fn include_paths(config: &Config) -> Vec<String> {
    let mut derived = BTreeSet::new();
    for library in &config.libraries {
        let parent = Path::new(&library.root)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        derived.insert(join_root(&config.root, &parent));
        derived.insert(join_root(&config.root, &library.root));
    }
    let mut paths: Vec<String> = derived.into_iter().collect();
    paths.extend(config.include_paths.iter().cloned());
    paths
}

fn join_root(root: &str, rel: &str) -> String {
    if rel.is_empty() {
        root.to_owned()
    } else {
        Path::new(root).join(rel).to_string_lossy().into_owned()
    }
}

/// The fully assembled Makefile document.
#[derive(Debug)]
pub struct Makefile {
    output: String,
    compiler: String,
    include_paths: Vec<String>,
    compiler_options: Vec<String>,
    linker_options: Vec<String>,
    sources: Vec<SourceEntry>,
}

impl Makefile {
    /// Assembles the document from the configuration passthrough fields and
    /// the collected sources. Configured extra `sources` are appended after
    /// the resolved ones, named by the same identifier derivation.
    pub fn new(config: &Config, mut sources: Vec<SourceEntry>) -> Makefile {
        for src in &config.sources {
            sources.push(SourceEntry {
                name: target::source_identifier(src),
                path: join_root(&config.root, src),
            });
        }
        Makefile {
            output: config.output.clone(),
            compiler: config.compiler.clone(),
            include_paths: include_paths(config),
            compiler_options: config.compiler_options.clone(),
            linker_options: config.linker_options.clone(),
            sources,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Infallible writes to a String.
        let _ = self.render_to(&mut out);
        out
    }

    fn render_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "# Generated by bazel2make. Do not edit.")?;
        writeln!(out)?;
        writeln!(out, "CXX := {}", self.compiler)?;
        writeln!(out, "OUT := {}", self.output)?;
        writeln!(out, "OBJDIR := obj")?;
        writeln!(out)?;

        writeln!(out, "CXXFLAGS := {}", self.compiler_options.join(" "))?;
        writeln!(out, "LDFLAGS := {}", self.linker_options.join(" "))?;
        write!(out, "INCLUDES :=")?;
        for path in &self.include_paths {
            write!(out, " \\\n\t-I{}", path)?;
        }
        writeln!(out)?;
        writeln!(out)?;

        write!(out, "OBJS :=")?;
        for src in &self.sources {
            write!(out, " \\\n\t$(OBJDIR)/{}.o", src.name)?;
        }
        writeln!(out)?;
        writeln!(out)?;

        writeln!(out, "all: $(OUT)")?;
        writeln!(out)?;
        writeln!(out, "$(OUT): $(OBJS)")?;
        writeln!(out, "\t$(CXX) $(CXXFLAGS) -o $@ $(OBJS) $(LDFLAGS)")?;
        for src in &self.sources {
            writeln!(out)?;
            writeln!(out, "$(OBJDIR)/{}.o: {}", src.name, src.path)?;
            writeln!(out, "\t@mkdir -p $(@D)")?;
            writeln!(out, "\t$(CXX) $(CXXFLAGS) $(INCLUDES) -c $< -o $@")?;
        }
        writeln!(out)?;
        writeln!(out, "clean:")?;
        writeln!(out, "\trm -rf $(OBJDIR) $(OUT)")?;
        writeln!(out)?;
        writeln!(out, ".PHONY: all clean")?;
        Ok(())
    }
}
