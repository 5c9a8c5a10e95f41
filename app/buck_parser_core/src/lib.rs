/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Value types shared by the build-file parser: the flavors a target may carry,
//! the flavor domains rules declare, cells, package paths and unconfigured target
//! labels.

pub mod cells;
pub mod configuration;
pub mod env;
pub mod flavor;
pub mod flavor_domain;
pub mod fs;
pub mod logging;
pub mod package;
pub mod target;
