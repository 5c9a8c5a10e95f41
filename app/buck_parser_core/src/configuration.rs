/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::str::FromStr;
use std::sync::Arc;

use allocative::Allocative;
use derive_more::Display;
use dupe::Dupe;

#[derive(Debug, thiserror::Error)]
enum TargetConfigurationError {
    #[error("Platform name must be non-empty")]
    Empty,
    #[error("Invalid platform name `{0}`: platform names must not contain whitespace")]
    Whitespace(String),
}

/// The configuration context a rule is asked about its capabilities in.
///
/// Flavor support can depend on the toolchains available for a platform, so rules
/// get to see which platform the question is asked for.
#[derive(Clone, Dupe, Debug, Display, Default, Hash, Eq, PartialEq, Allocative)]
pub enum TargetConfiguration {
    /// No platform has been selected yet. This is what the parser uses.
    #[default]
    #[display("<unconfigured>")]
    Unconfigured,
    #[display("{}", _0)]
    Platform(Arc<str>),
}

impl TargetConfiguration {
    pub fn platform(name: &str) -> TargetConfiguration {
        TargetConfiguration::Platform(name.into())
    }

    pub fn is_unconfigured(&self) -> bool {
        matches!(self, TargetConfiguration::Unconfigured)
    }
}

/// Parses `<unconfigured>` or a platform name.
impl FromStr for TargetConfiguration {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<TargetConfiguration> {
        if s.is_empty() {
            return Err(TargetConfigurationError::Empty.into());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(TargetConfigurationError::Whitespace(s.to_owned()).into());
        }
        if s == "<unconfigured>" {
            return Ok(TargetConfiguration::Unconfigured);
        }
        Ok(TargetConfiguration::platform(s))
    }
}
