/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! `bazel2make` converts a tree of Bazel-style BUILD files into a flat
//! Makefile driven only by the YAML configuration.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use bazelmake_core::config::Config;
use bazelmake_makefile::Makefile;
use bazelmake_resolver::collect::collect_sources;
use bazelmake_resolver::resolve::Resolver;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bazel2make", version, about)]
struct Opt {
    /// Configuration file describing libraries, targets and compiler flags.
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Where to write the generated Makefile.
    #[arg(short, long, default_value = "Makefile")]
    out: PathBuf,
}

fn run(opt: &Opt) -> anyhow::Result<()> {
    let config = Config::load(&opt.config)?;
    let resolution = Resolver::new(&config)?.resolve()?;
    let sources = collect_sources(&config.root, &resolution.index, &resolution.roots);
    info!(
        "collected {} sources from {} root targets",
        sources.len(),
        resolution.roots.len()
    );
    let makefile = Makefile::new(&config, sources);
    std::fs::write(&opt.out, makefile.render())
        .with_context(|| format!("failed to write `{}`", opt.out.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = Opt::parse();
    match run(&opt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bazel2make: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
