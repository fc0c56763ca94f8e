/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Core types shared by the bazelmake pipeline: named source libraries,
//! package paths, dependency labels, target descriptors and the YAML
//! configuration model.

pub mod config;
pub mod label;
pub mod library;
pub mod package;
pub mod sources;
pub mod target;
