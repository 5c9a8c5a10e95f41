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
use std::path::PathBuf;

use buck_parser_core::cells::CellName;
use buck_parser_core::flavor::Flavor;
use buck_parser_core::flavor::FlavorSet;
use buck_parser_core::fs::AbsPathBuf;
use buck_parser_core::package::PackagePath;
use buck_parser_core::target::UnconfiguredBuildTarget;
use dupe::Dupe;
use itertools::Itertools;

/// Who has to act on a verification failure.
#[derive(Debug, Copy, Clone, Dupe, Eq, PartialEq, Hash, derive_more::Display)]
pub enum ErrorCategory {
    /// The build file or the command line asks for something the rule can't do.
    /// Fixed by the user editing what they wrote.
    User,
    /// The parser and its caller disagree about what was parsed. Continuing would
    /// build the graph on a wrong target identity, so the whole invocation must fail.
    Internal,
}

#[derive(Debug, Copy, Clone, Dupe, Eq, PartialEq, Hash, derive_more::Display)]
pub enum VerificationErrorKind {
    UnsupportedFlavorNoCapability,
    UnsupportedFlavorUnknown,
    PathMismatch,
    MalformedRecord,
    IdentityMismatch,
    UnrootedBuildFile,
}

/// The flavors of one domain listed under "Available flavors" when a target asks
/// for a flavor no domain knows.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AvailableFlavors {
    pub domain: String,
    /// User flavors of the domain, in declaration order.
    pub flavors: Vec<Flavor>,
}

impl Display for AvailableFlavors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.flavors.is_empty() {
            return Ok(());
        }
        write!(f, "{}: {}", self.domain, self.flavors.iter().join(", "))
    }
}

/// Why a raw target node does not describe the target it was parsed for.
///
/// Messages are matched verbatim by tooling; see [`render`] for their exact text.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum VerificationError {
    #[error("{}", render::unsupported_flavor_no_capability(.target, .flavors))]
    UnsupportedFlavorNoCapability {
        /// Requested target, without flavors.
        target: UnconfiguredBuildTarget,
        flavors: FlavorSet,
    },
    #[error("{}", render::unsupported_flavor_unknown(.target, .unknown, .available))]
    UnsupportedFlavorUnknown {
        target: UnconfiguredBuildTarget,
        unknown: FlavorSet,
        available: Vec<AvailableFlavors>,
    },
    #[error("{}", render::path_mismatch(.claimed, .actual))]
    PathMismatch {
        claimed: PackagePath,
        actual: PackagePath,
    },
    #[error("{}", render::malformed_record(.build_file, .attrs))]
    MalformedRecord {
        build_file: PathBuf,
        attrs: Vec<(String, String)>,
    },
    #[error("{}", render::identity_mismatch(.cell, .package, .name, .expected))]
    IdentityMismatch {
        cell: CellName,
        package: PackagePath,
        /// Raw value of the `name` attribute.
        name: String,
        /// Requested target, without flavors.
        expected: UnconfiguredBuildTarget,
    },
    #[error("{}", render::unrooted_build_file(.build_file, .cell, .root))]
    UnrootedBuildFile {
        build_file: PathBuf,
        cell: CellName,
        root: AbsPathBuf,
    },
}

impl VerificationError {
    pub fn kind(&self) -> VerificationErrorKind {
        match self {
            VerificationError::UnsupportedFlavorNoCapability { .. } => {
                VerificationErrorKind::UnsupportedFlavorNoCapability
            }
            VerificationError::UnsupportedFlavorUnknown { .. } => {
                VerificationErrorKind::UnsupportedFlavorUnknown
            }
            VerificationError::PathMismatch { .. } => VerificationErrorKind::PathMismatch,
            VerificationError::MalformedRecord { .. } => VerificationErrorKind::MalformedRecord,
            VerificationError::IdentityMismatch { .. } => VerificationErrorKind::IdentityMismatch,
            VerificationError::UnrootedBuildFile { .. } => VerificationErrorKind::UnrootedBuildFile,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            VerificationErrorKind::UnsupportedFlavorNoCapability
            | VerificationErrorKind::UnsupportedFlavorUnknown => ErrorCategory::User,
            VerificationErrorKind::PathMismatch
            | VerificationErrorKind::MalformedRecord
            | VerificationErrorKind::IdentityMismatch
            | VerificationErrorKind::UnrootedBuildFile => ErrorCategory::Internal,
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.category() == ErrorCategory::User
    }
}

/// Message text of each [`VerificationError`] variant.
pub mod render {
    use std::path::Path;

    use buck_parser_core::cells::CellName;
    use buck_parser_core::flavor::FlavorSet;
    use buck_parser_core::fs::AbsPathBuf;
    use buck_parser_core::package::PackagePath;
    use buck_parser_core::target::UnconfiguredBuildTarget;
    use itertools::Itertools;

    use crate::error::AvailableFlavors;
    use crate::raw_node::NAME_ATTRIBUTE;

    pub fn unsupported_flavor_no_capability(
        target: &UnconfiguredBuildTarget,
        flavors: &FlavorSet,
    ) -> String {
        format!(
            "The following flavor(s) are not supported on target {}:\n{}.\n\n\
             Please try to remove them when referencing this target.",
            target,
            flavors.iter().join(" "),
        )
    }

    /// Each domain takes one line, which is empty when the domain declares no user
    /// flavors.
    pub fn unsupported_flavor_unknown(
        target: &UnconfiguredBuildTarget,
        unknown: &FlavorSet,
        available: &[AvailableFlavors],
    ) -> String {
        format!(
            "The following flavor(s) are not supported on target {}:\n{}\n\n\
             Available flavors are:\n{}\n\n\
             - Please check the spelling of the flavor(s).\n\
             - If the spelling is correct, please check that the related SDK has been installed.",
            target,
            unknown.iter().join("\n"),
            available.iter().format_with("", |a, f| f(&format_args!("{}\n", a))),
        )
    }

    pub fn path_mismatch(claimed: &PackagePath, actual: &PackagePath) -> String {
        format!(
            "Raw data claims to come from [{}], but we tried rooting it at [{}].",
            claimed, actual
        )
    }

    pub fn malformed_record(build_file: &Path, attrs: &[(String, String)]) -> String {
        format!(
            "Attempting to parse build target from malformed raw data in {}: {}.",
            build_file.display(),
            attrs
                .iter()
                .format_with(", ", |(k, v), f| f(&format_args!("{}->{}", k, v))),
        )
    }

    pub fn identity_mismatch(
        cell: &CellName,
        package: &PackagePath,
        name: &str,
        expected: &UnconfiguredBuildTarget,
    ) -> String {
        format!(
            "Inconsistent internal state, target from data: {}//{}:{}, expected: {}, raw data: {}->{}",
            cell, package, name, expected, NAME_ATTRIBUTE, name
        )
    }

    pub fn unrooted_build_file(build_file: &Path, cell: &CellName, root: &AbsPathBuf) -> String {
        format!(
            "Build file {} is not located under the root of cell `{}//` ({})",
            build_file.display(),
            cell,
            root
        )
    }
}
