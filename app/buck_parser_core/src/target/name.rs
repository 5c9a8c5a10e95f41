/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use allocative::Allocative;
use derive_more::Display;

#[derive(Debug, thiserror::Error)]
enum TargetNameError {
    #[error("Target name must be non-empty")]
    Empty,
    #[error("Invalid target name `{0}`: target names must not contain `{1}`")]
    ReservedChar(String, char),
}

/// The short name of a target, `baz` in `foo//bar:baz`.
#[derive(
    Clone,
    Debug,
    Display,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Allocative
)]
#[display("{}", _0)]
pub struct TargetName(Box<str>);

impl TargetName {
    pub fn new(name: &str) -> anyhow::Result<TargetName> {
        if name.is_empty() {
            return Err(TargetNameError::Empty.into());
        }
        if let Some(c) = name.chars().find(|c| matches!(c, '/' | ':' | '#' | ',')) {
            return Err(TargetNameError::ReservedChar(name.to_owned(), c).into());
        }
        Ok(TargetName(name.into()))
    }

    pub fn testing_new(name: &str) -> TargetName {
        TargetName::new(name).unwrap()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
