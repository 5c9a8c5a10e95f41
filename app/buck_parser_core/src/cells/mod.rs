/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Cells are the repository roots taking part in a build. Every target belongs to
//! exactly one cell, and package paths are relative to that cell's root.

pub mod instance;
pub mod name;

pub use instance::CellInstance;
pub use name::CellName;
