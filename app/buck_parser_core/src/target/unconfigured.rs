/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use allocative::Allocative;
use dupe::Dupe;

use crate::cells::CellName;
use crate::flavor::FlavorSet;
use crate::package::PackagePath;
use crate::target::name::TargetName;
use crate::target::parse::lex_target;

/// The identity of a target before any configuration is applied:
/// `cell//package:name#flavor1,flavor2`.
///
/// The flavor set is usually empty. Two targets are equal iff cell, package, name
/// and flavors are all equal.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Allocative)]
pub struct UnconfiguredBuildTarget {
    cell: CellName,
    package: PackagePath,
    name: TargetName,
    flavors: FlavorSet,
}

impl UnconfiguredBuildTarget {
    pub fn new(
        cell: CellName,
        package: PackagePath,
        name: TargetName,
        flavors: FlavorSet,
    ) -> UnconfiguredBuildTarget {
        UnconfiguredBuildTarget {
            cell,
            package,
            name,
            flavors,
        }
    }

    /// Parse a fully qualified target: `[cell]//package:name[#flavor,...]`.
    ///
    /// ```
    /// use buck_parser_core::target::UnconfiguredBuildTarget;
    ///
    /// let target = UnconfiguredBuildTarget::parse("//a/b:c#d")?;
    /// assert_eq!("c", target.name().as_str());
    /// assert_eq!("//a/b:c", target.unflavored().to_string());
    /// # anyhow::Ok(())
    /// ```
    pub fn parse(target: &str) -> anyhow::Result<UnconfiguredBuildTarget> {
        let parts = lex_target(target)?;
        let cell = if parts.cell.is_empty() {
            CellName::root()
        } else {
            CellName::unchecked_new(parts.cell)?
        };
        let flavors = match parts.flavors {
            Some(flavors) => FlavorSet::parse(flavors)?,
            None => FlavorSet::empty(),
        };
        Ok(UnconfiguredBuildTarget::new(
            cell,
            PackagePath::new(parts.package)?,
            TargetName::new(parts.name)?,
            flavors,
        ))
    }

    pub fn testing_parse(target: &str) -> UnconfiguredBuildTarget {
        UnconfiguredBuildTarget::parse(target).unwrap()
    }

    pub fn cell(&self) -> CellName {
        self.cell.dupe()
    }

    pub fn package(&self) -> &PackagePath {
        &self.package
    }

    pub fn name(&self) -> &TargetName {
        &self.name
    }

    pub fn flavors(&self) -> &FlavorSet {
        &self.flavors
    }

    pub fn is_flavored(&self) -> bool {
        !self.flavors.is_empty()
    }

    pub fn unflavored(&self) -> UnconfiguredBuildTarget {
        self.with_flavors(FlavorSet::empty())
    }

    pub fn with_flavors(&self, flavors: FlavorSet) -> UnconfiguredBuildTarget {
        UnconfiguredBuildTarget {
            cell: self.cell.dupe(),
            package: self.package.clone(),
            name: self.name.clone(),
            flavors,
        }
    }
}

impl Display for UnconfiguredBuildTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}//{}:{}", self.cell, self.package, self.name)?;
        if !self.flavors.is_empty() {
            write!(f, "#{}", self.flavors)?;
        }
        Ok(())
    }
}
