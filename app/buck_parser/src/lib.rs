/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Checks, after a build file has been evaluated, that each raw target node is the
//! target the parser was asked for and that its rule accepts the requested flavors.

pub mod description;
pub mod error;
pub mod raw_node;
pub mod rule_type;
pub mod verifier;

pub use crate::error::VerificationError;
pub use crate::verifier::BuiltTargetVerifier;
