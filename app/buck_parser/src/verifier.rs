/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::path::Path;

use buck_parser_core::cells::CellInstance;
use buck_parser_core::configuration::TargetConfiguration;
use buck_parser_core::env::EnvHelper;
use buck_parser_core::target::UnconfiguredBuildTarget;
use dupe::Dupe;

use crate::description::FlavorCapability;
use crate::description::RuleDescription;
use crate::error::AvailableFlavors;
use crate::error::VerificationError;
use crate::raw_node::RawTargetNode;
use crate::rule_type::RuleType;

/// Platform rules are asked for their flavor domains in, `<unconfigured>` when unset.
pub static BUCK_TARGET_PLATFORM: EnvHelper<TargetConfiguration> =
    EnvHelper::new("BUCK_TARGET_PLATFORM");

/// Checks that a raw target node parsed from a build file describes exactly the
/// target the parser was asked for, and that the rule accepts the target's flavors.
///
/// The verifier holds no mutable state. A single instance is shared by every
/// thread parsing build files.
#[derive(Debug, Clone, Dupe, Default)]
pub struct BuiltTargetVerifier {
    /// Configuration rules are asked for their flavor domains in.
    configuration: TargetConfiguration,
}

impl BuiltTargetVerifier {
    pub fn new() -> BuiltTargetVerifier {
        BuiltTargetVerifier::default()
    }

    /// A verifier using the configuration from `$BUCK_TARGET_PLATFORM`.
    pub fn from_env() -> anyhow::Result<BuiltTargetVerifier> {
        Ok(BuiltTargetVerifier::with_configuration(
            BUCK_TARGET_PLATFORM.get_or_default()?,
        ))
    }

    pub fn with_configuration(configuration: TargetConfiguration) -> BuiltTargetVerifier {
        BuiltTargetVerifier { configuration }
    }

    pub fn configuration(&self) -> &TargetConfiguration {
        &self.configuration
    }

    /// `build_file` is the file `raw_node` was parsed from, either absolute or
    /// relative to the root of `cell`.
    ///
    /// Checks run in order and the first failure is returned: flavors are
    /// supported, the node has a name, the node's package is the build file's
    /// directory, and the node's name is the target's name.
    ///
    /// The name is checked before the package: a node without a name is reported
    /// as malformed even when its claimed package is wrong too. Buck1 reported it
    /// this way and tooling matches on that message.
    pub fn verify_build_target(
        &self,
        cell: &CellInstance,
        rule_type: &RuleType,
        build_file: &Path,
        target: &UnconfiguredBuildTarget,
        description: &dyn RuleDescription,
        raw_node: &RawTargetNode,
    ) -> Result<(), VerificationError> {
        if target.is_flavored() {
            self.verify_flavors(rule_type, target, description)?;
        }

        let Some(name) = raw_node.name() else {
            return Err(VerificationError::MalformedRecord {
                build_file: build_file.to_owned(),
                attrs: raw_node
                    .attrs()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect(),
            });
        };

        let package = cell
            .relativize(build_file.parent().unwrap_or(Path::new("")))
            .map_err(|_| VerificationError::UnrootedBuildFile {
                build_file: build_file.to_owned(),
                cell: cell.name(),
                root: cell.root().clone(),
            })?;
        if raw_node.base_path() != &package {
            return Err(VerificationError::PathMismatch {
                claimed: raw_node.base_path().clone(),
                actual: package,
            });
        }

        let expected = target.unflavored();
        if expected.package() != &package || expected.name().as_str() != name {
            return Err(VerificationError::IdentityMismatch {
                cell: expected.cell(),
                package,
                name: name.to_owned(),
                expected,
            });
        }

        tracing::trace!(
            "Verified {} (type {}) from {}",
            target,
            rule_type,
            build_file.display()
        );
        Ok(())
    }

    fn verify_flavors(
        &self,
        rule_type: &RuleType,
        target: &UnconfiguredBuildTarget,
        description: &dyn RuleDescription,
    ) -> Result<(), VerificationError> {
        let domains = match FlavorCapability::query(description, &self.configuration) {
            FlavorCapability::Supported(domains) => domains,
            FlavorCapability::Unsupported => {
                tracing::warn!(
                    "Target {} (type {}) has flavors but its rule does not declare flavor support: {}",
                    target.unflavored(),
                    rule_type,
                    target.flavors()
                );
                return Err(VerificationError::UnsupportedFlavorNoCapability {
                    target: target.unflavored(),
                    flavors: target.flavors().clone(),
                });
            }
        };

        let unknown = target
            .flavors()
            .difference(|flavor| domains.iter().any(|domain| domain.contains(flavor)));
        if unknown.is_empty() {
            return Ok(());
        }

        let available = domains
            .iter()
            .map(|domain| AvailableFlavors {
                domain: domain.name().to_owned(),
                flavors: domain.user_flavors().copied().collect(),
            })
            .collect();
        Err(VerificationError::UnsupportedFlavorUnknown {
            target: target.clone(),
            unknown,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::Path;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::Mutex;

    use buck_parser_core::cells::CellInstance;
    use buck_parser_core::configuration::TargetConfiguration;
    use buck_parser_core::flavor::Flavor;
    use buck_parser_core::flavor::FlavorSet;
    use buck_parser_core::flavor_domain::FlavorDomain;
    use buck_parser_core::flavor_domain::FlavorDomainView;
    use buck_parser_core::flavor_domain::FlavorKind;
    use buck_parser_core::logging::subscriber_for_writer;
    use buck_parser_core::target::UnconfiguredBuildTarget;

    use crate::description::Flavored;
    use crate::description::RuleDescription;
    use crate::error::ErrorCategory;
    use crate::error::VerificationError;
    use crate::error::VerificationErrorKind;
    use crate::raw_node::RawTargetNode;
    use crate::rule_type::RuleType;
    use crate::verifier::BuiltTargetVerifier;

    struct FlavoredDescription {
        domains: Vec<FlavorDomain<String>>,
    }

    impl FlavoredDescription {
        /// Domains of internal flavors.
        fn new(domains: &[(&str, &[&str])]) -> FlavoredDescription {
            FlavoredDescription::with_kind(domains, FlavorKind::Internal)
        }

        fn user(domains: &[(&str, &[&str])]) -> FlavoredDescription {
            FlavoredDescription::with_kind(domains, FlavorKind::User)
        }

        fn with_kind(domains: &[(&str, &[&str])], kind: FlavorKind) -> FlavoredDescription {
            FlavoredDescription {
                domains: domains
                    .iter()
                    .map(|(name, flavors)| {
                        FlavorDomain::with_kinds(
                            *name,
                            flavors
                                .iter()
                                .map(|f| (Flavor::testing_new(f), kind, "b".to_owned())),
                        )
                        .unwrap()
                    })
                    .collect(),
            }
        }
    }

    impl RuleDescription for FlavoredDescription {
        fn flavored(&self) -> Option<&dyn Flavored> {
            Some(self)
        }
    }

    impl Flavored for FlavoredDescription {
        fn flavor_domains(
            &self,
            _configuration: &TargetConfiguration,
        ) -> Option<Vec<&dyn FlavorDomainView>> {
            Some(
                self.domains
                    .iter()
                    .map(|d| d as &dyn FlavorDomainView)
                    .collect(),
            )
        }
    }

    struct NonFlavoredDescription;

    impl RuleDescription for NonFlavoredDescription {}

    fn build_rule() -> RuleType {
        RuleType::build("build_rule")
    }

    fn verify(
        build_file: &Path,
        target: &str,
        description: &dyn RuleDescription,
        raw_node: &RawTargetNode,
    ) -> Result<(), VerificationError> {
        BuiltTargetVerifier::new().verify_build_target(
            &CellInstance::testing_root(),
            &build_rule(),
            build_file,
            &UnconfiguredBuildTarget::testing_parse(target),
            description,
            raw_node,
        )
    }

    fn absolute_build_file(path: &str) -> PathBuf {
        CellInstance::testing_root().root().join(path)
    }

    #[test]
    fn test_verification_throws_when_unknown_flavors_are_present() {
        let err = verify(
            Path::new("a/b/BUCK"),
            "//a/b:c#d",
            &FlavoredDescription::new(&[("flavors", &["a"])]),
            &RawTargetNode::testing_new("", &[]),
        )
        .unwrap_err();
        assert_eq!(VerificationErrorKind::UnsupportedFlavorUnknown, err.kind());
        assert_eq!(
            "The following flavor(s) are not supported on target //a/b:c#d:\nd\n\n\
             Available flavors are:\n\n\n\n\
             - Please check the spelling of the flavor(s).\n\
             - If the spelling is correct, please check that the related SDK has been installed.",
            err.to_string()
        );
        match err {
            VerificationError::UnsupportedFlavorUnknown {
                unknown, available, ..
            } => {
                assert_eq!(FlavorSet::testing_new(&["d"]), unknown);
                assert_eq!(1, available.len());
                assert_eq!("flavors", available[0].domain);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_verification_throws_when_description_not_flavored() {
        let err = verify(
            Path::new("a/b/BUCK"),
            "//a/b:c#d",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("", &[("name", "target_name")]),
        )
        .unwrap_err();
        assert_eq!(
            VerificationErrorKind::UnsupportedFlavorNoCapability,
            err.kind()
        );
        assert_eq!(ErrorCategory::User, err.category());
        assert_eq!(
            "The following flavor(s) are not supported on target //a/b:c:\nd.\n\n\
             Please try to remove them when referencing this target.",
            err.to_string()
        );
        assert!(!err.to_string().contains('#'));
    }

    #[test]
    fn test_verification_throws_when_data_is_malformed() {
        let err = verify(
            Path::new("a/b/BUCK"),
            "//a/b:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("", &[("attribute", "value")]),
        )
        .unwrap_err();
        assert_eq!(VerificationErrorKind::MalformedRecord, err.kind());
        assert_eq!(ErrorCategory::Internal, err.category());
        assert_eq!(
            format!(
                "Attempting to parse build target from malformed raw data in {}: attribute->value.",
                Path::new("a/b/BUCK").display()
            ),
            err.to_string()
        );
    }

    #[test]
    fn test_verification_throws_when_paths_are_different() {
        let err = verify(
            &absolute_build_file("a/b/BUCK"),
            "//a/b:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("z/y/z", &[("name", "target_name")]),
        )
        .unwrap_err();
        assert_eq!(VerificationErrorKind::PathMismatch, err.kind());
        assert_eq!(
            "Raw data claims to come from [z/y/z], but we tried rooting it at [a/b].",
            err.to_string()
        );
    }

    #[test]
    fn test_verification_throws_when_unflavored_build_targets_are_different() {
        let err = verify(
            &absolute_build_file("a/b/BUCK"),
            "//a/b:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("a/b", &[("name", "target_name")]),
        )
        .unwrap_err();
        assert_eq!(VerificationErrorKind::IdentityMismatch, err.kind());
        assert_eq!(
            "Inconsistent internal state, target from data: //a/b:target_name, \
             expected: //a/b:c, raw data: name->target_name",
            err.to_string()
        );
    }

    #[test]
    fn test_verification_does_not_fail_with_valid_flavored_targets() {
        verify(
            &absolute_build_file("a/b/BUCK"),
            "//a/b:c#d",
            &FlavoredDescription::new(&[("flavors", &["d"])]),
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap();
    }

    #[test]
    fn test_verification_does_not_fail_with_valid_unflavored_targets() {
        verify(
            &absolute_build_file("a/b/BUCK"),
            "//a/b:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap();
    }

    #[test]
    fn test_root_relative_build_file() {
        verify(
            Path::new("a/b/BUCK"),
            "//a/b:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap();
        verify(
            Path::new("BUCK"),
            "//:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("", &[("name", "c")]),
        )
        .unwrap();
    }

    #[test]
    fn test_unknown_flavors_across_domains() {
        let description =
            FlavoredDescription::user(&[("platforms", &["linux", "macos"]), ("link", &["shared"])]);
        let err = verify(
            Path::new("a/b/BUCK"),
            "//a/b:c#x,shared,linux,y",
            &description,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap_err();
        assert_eq!(
            "The following flavor(s) are not supported on target //a/b:c#linux,shared,x,y:\nx\ny\n\n\
             Available flavors are:\nplatforms: linux, macos\nlink: shared\n\n\n\
             - Please check the spelling of the flavor(s).\n\
             - If the spelling is correct, please check that the related SDK has been installed.",
            err.to_string()
        );

        // Same domains declared in the other order report the same unknown flavors.
        let reversed =
            FlavoredDescription::user(&[("link", &["shared"]), ("platforms", &["linux", "macos"])]);
        match verify(
            Path::new("a/b/BUCK"),
            "//a/b:c#x,shared,linux,y",
            &reversed,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        ) {
            Err(VerificationError::UnsupportedFlavorUnknown { unknown, .. }) => {
                assert_eq!(FlavorSet::testing_new(&["x", "y"]), unknown)
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn test_misspelled_flavor_lists_user_flavors() {
        let description =
            FlavoredDescription::user(&[("platforms", &["linux-x86_64", "macosx-arm64"])]);
        let err = verify(
            Path::new("a/b/BUCK"),
            "//a/b:c#linux-x86-64",
            &description,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap_err();
        assert_eq!(
            "The following flavor(s) are not supported on target //a/b:c#linux-x86-64:\nlinux-x86-64\n\n\
             Available flavors are:\nplatforms: linux-x86_64, macosx-arm64\n\n\n\
             - Please check the spelling of the flavor(s).\n\
             - If the spelling is correct, please check that the related SDK has been installed.",
            err.to_string()
        );
    }

    #[test]
    fn test_internal_flavors_not_listed() {
        struct MixedDescription(FlavorDomain<u32>, FlavorDomain<u32>);

        impl RuleDescription for MixedDescription {
            fn flavored(&self) -> Option<&dyn Flavored> {
                Some(self)
            }
        }

        impl Flavored for MixedDescription {
            fn flavor_domains(
                &self,
                _configuration: &TargetConfiguration,
            ) -> Option<Vec<&dyn FlavorDomainView>> {
                Some(vec![
                    &self.0 as &dyn FlavorDomainView,
                    &self.1 as &dyn FlavorDomainView,
                ])
            }
        }

        let description = MixedDescription(
            FlavorDomain::with_kinds(
                "link",
                [
                    (Flavor::testing_new("shared"), FlavorKind::User, 0),
                    (Flavor::testing_new("shared-interface"), FlavorKind::Internal, 1),
                ],
            )
            .unwrap(),
            FlavorDomain::new("compile", [(Flavor::testing_new("compile-pic"), 0)]).unwrap(),
        );
        let err = verify(
            Path::new("a/b/BUCK"),
            "//a/b:c#sharde",
            &description,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap_err();
        match &err {
            VerificationError::UnsupportedFlavorUnknown { available, .. } => {
                assert_eq!(vec![Flavor::testing_new("shared")], available[0].flavors);
                assert!(available[1].flavors.is_empty());
            }
            e => panic!("unexpected error: {:?}", e),
        }
        assert!(
            err.to_string()
                .contains("Available flavors are:\nlink: shared\n\n\n\n- Please")
        );
    }

    #[test]
    fn test_flavors_supported_with_no_domains() {
        let err = verify(
            Path::new("a/b/BUCK"),
            "//a/b:c#d",
            &FlavoredDescription::new(&[]),
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap_err();
        assert_eq!(VerificationErrorKind::UnsupportedFlavorUnknown, err.kind());
        assert_eq!(
            "The following flavor(s) are not supported on target //a/b:c#d:\nd\n\n\
             Available flavors are:\n\n\n\
             - Please check the spelling of the flavor(s).\n\
             - If the spelling is correct, please check that the related SDK has been installed.",
            err.to_string()
        );
    }

    #[test]
    fn test_flavored_description_without_domains_in_configuration() {
        struct ConfiguredOnly(FlavorDomain<()>);

        impl RuleDescription for ConfiguredOnly {
            fn flavored(&self) -> Option<&dyn Flavored> {
                Some(self)
            }
        }

        impl Flavored for ConfiguredOnly {
            fn flavor_domains(
                &self,
                configuration: &TargetConfiguration,
            ) -> Option<Vec<&dyn FlavorDomainView>> {
                if configuration.is_unconfigured() {
                    None
                } else {
                    Some(vec![&self.0 as &dyn FlavorDomainView])
                }
            }
        }

        let description =
            ConfiguredOnly(FlavorDomain::new("modes", [(Flavor::testing_new("d"), ())]).unwrap());
        let cell = CellInstance::testing_root();
        let target = UnconfiguredBuildTarget::testing_parse("//a/b:c#d");
        let raw_node = RawTargetNode::testing_new("a/b", &[("name", "c")]);

        let err = BuiltTargetVerifier::new()
            .verify_build_target(
                &cell,
                &build_rule(),
                Path::new("a/b/BUCK"),
                &target,
                &description,
                &raw_node,
            )
            .unwrap_err();
        assert_eq!(
            VerificationErrorKind::UnsupportedFlavorNoCapability,
            err.kind()
        );

        BuiltTargetVerifier::with_configuration(TargetConfiguration::platform("linux-x86_64"))
            .verify_build_target(
                &cell,
                &build_rule(),
                Path::new("a/b/BUCK"),
                &target,
                &description,
                &raw_node,
            )
            .unwrap();
    }

    #[test]
    fn test_malformed_reported_before_path_mismatch() {
        let err = verify(
            &absolute_build_file("a/b/BUCK"),
            "//a/b:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("z/y/z", &[("srcs", "A.java"), ("deps", "//x:y")]),
        )
        .unwrap_err();
        assert_eq!(
            format!(
                "Attempting to parse build target from malformed raw data in {}: \
                 srcs->A.java, deps->//x:y.",
                absolute_build_file("a/b/BUCK").display()
            ),
            err.to_string()
        );
    }

    #[test]
    fn test_path_mismatch_reported_whatever_the_name() {
        for name in ["c", "other"] {
            let err = verify(
                Path::new("a/b/BUCK"),
                "//a/b:c#d",
                &FlavoredDescription::new(&[("flavors", &["d"])]),
                &RawTargetNode::testing_new("a", &[("name", name)]),
            )
            .unwrap_err();
            assert_eq!(VerificationErrorKind::PathMismatch, err.kind());
        }
    }

    #[test]
    fn test_expected_package_differs_from_build_file() {
        let err = verify(
            Path::new("a/b/BUCK"),
            "//x/y:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap_err();
        assert_eq!(
            "Inconsistent internal state, target from data: //a/b:c, \
             expected: //x/y:c, raw data: name->c",
            err.to_string()
        );
    }

    #[test]
    fn test_non_root_cell() {
        let cell = CellInstance::new(
            buck_parser_core::cells::CellName::testing_new("foo"),
            CellInstance::testing_root().root().clone(),
        );
        let err = BuiltTargetVerifier::new()
            .verify_build_target(
                &cell,
                &build_rule(),
                Path::new("a/b/BUCK"),
                &UnconfiguredBuildTarget::testing_parse("foo//a/b:c"),
                &NonFlavoredDescription,
                &RawTargetNode::testing_new("a/b", &[("name", "d")]),
            )
            .unwrap_err();
        assert_eq!(
            "Inconsistent internal state, target from data: foo//a/b:d, \
             expected: foo//a/b:c, raw data: name->d",
            err.to_string()
        );
    }

    #[test]
    fn test_build_file_outside_cell() {
        if cfg!(windows) {
            return;
        }
        let err = verify(
            Path::new("/elsewhere/a/b/BUCK"),
            "//a/b:c",
            &NonFlavoredDescription,
            &RawTargetNode::testing_new("a/b", &[("name", "c")]),
        )
        .unwrap_err();
        assert_eq!(VerificationErrorKind::UnrootedBuildFile, err.kind());
        assert_eq!(ErrorCategory::Internal, err.category());
        assert_eq!(
            "Build file /elsewhere/a/b/BUCK is not located under the root of cell `//` (/repo)",
            err.to_string()
        );
    }

    #[test]
    fn test_verification_is_idempotent() {
        let description = FlavoredDescription::new(&[("flavors", &["a"])]);
        let raw_node = RawTargetNode::testing_new("a/b", &[("name", "c")]);
        let first = verify(Path::new("a/b/BUCK"), "//a/b:c#d", &description, &raw_node);
        let second = verify(Path::new("a/b/BUCK"), "//a/b:c#d", &description, &raw_node);
        assert!(first.is_err());
        assert_eq!(first, second);

        let ok = FlavoredDescription::new(&[("flavors", &["d"])]);
        assert_eq!(
            Ok(()),
            verify(Path::new("a/b/BUCK"), "//a/b:c#d", &ok, &raw_node)
        );
        assert_eq!(
            Ok(()),
            verify(Path::new("a/b/BUCK"), "//a/b:c#d", &ok, &raw_node)
        );
    }

    #[test]
    fn test_from_env_defaults_to_unconfigured() {
        assert_eq!(
            &TargetConfiguration::Unconfigured,
            BuiltTargetVerifier::from_env().unwrap().configuration()
        );
    }

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_capability_is_logged() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let (subscriber, _handle) = subscriber_for_writer(move || writer.clone()).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            verify(
                Path::new("a/b/BUCK"),
                "//a/b:c#d",
                &NonFlavoredDescription,
                &RawTargetNode::testing_new("a/b", &[("name", "c")]),
            )
            .unwrap_err();
            verify(
                Path::new("a/b/BUCK"),
                "//a/b:c",
                &NonFlavoredDescription,
                &RawTargetNode::testing_new("a/b", &[("name", "c")]),
            )
            .unwrap();
        });
        let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains(
            "Target //a/b:c (type build_rule) has flavors but its rule does not declare flavor support: d"
        ));
        assert!(!logged.contains("Verified"));
    }
}
