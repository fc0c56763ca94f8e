/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Evaluation of BUILD files.
//!
//! BUILD files are parsed with the starlark parser and then interpreted as a
//! deliberately small subset of the language: top-level assignments, literals,
//! list concatenation, `glob`, `select` and simple list comprehensions. That
//! subset is enough to recover the target declarations of real-world BUILD
//! files; everything else evaluates to an absent value rather than an error,
//! because inputs routinely contain macros and platform logic this tool does
//! not need to understand in order to emit a useful Makefile.

pub mod eval;
pub mod globspec;
pub mod rules;
pub mod values;
