/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::sync::Arc;

use allocative::Allocative;
use derive_more::Display;
use dupe::Dupe;

/// Where a rule can be used.
#[derive(Debug, Copy, Clone, Dupe, Eq, PartialEq, Hash, Allocative)]
pub enum RuleKind {
    /// A rule producing build outputs.
    Build,
    /// A configuration rule, usable only in a configuration context.
    Configuration,
}

/// The rule-type tag a raw node was parsed under, e.g. `java_library`.
#[derive(Debug, Clone, Dupe, Display, Eq, PartialEq, Hash, Allocative)]
#[display("{}", name)]
pub struct RuleType {
    name: Arc<str>,
    kind: RuleKind,
}

impl RuleType {
    pub fn new(name: &str, kind: RuleKind) -> RuleType {
        RuleType {
            name: name.into(),
            kind,
        }
    }

    pub fn build(name: &str) -> RuleType {
        RuleType::new(name, RuleKind::Build)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn is_configuration_rule(&self) -> bool {
        self.kind == RuleKind::Configuration
    }
}
