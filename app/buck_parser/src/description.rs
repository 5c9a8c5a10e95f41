/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use buck_parser_core::configuration::TargetConfiguration;
use buck_parser_core::flavor_domain::FlavorDomainView;

/// The implementation registered for a rule type.
///
/// Rules opt into optional capabilities by returning a handle from the matching
/// accessor. The parser never inspects the concrete type.
pub trait RuleDescription: Send + Sync {
    /// The rule's flavor support, if it understands flavors at all.
    fn flavored(&self) -> Option<&dyn Flavored> {
        None
    }
}

/// Capability of a rule which accepts flavored targets.
pub trait Flavored: Send + Sync {
    /// Flavor domains this rule accepts under `configuration`. `None` means the rule
    /// does not support flavors in that configuration.
    fn flavor_domains(
        &self,
        configuration: &TargetConfiguration,
    ) -> Option<Vec<&dyn FlavorDomainView>>;
}

/// Answer of a rule to "which flavors do you accept?".
///
/// A rule supporting flavors with no domains is distinct from a rule without flavor
/// support: the former rejects flavors as unknown, the latter as unsupported.
pub enum FlavorCapability<'a> {
    Unsupported,
    Supported(Vec<&'a dyn FlavorDomainView>),
}

impl<'a> FlavorCapability<'a> {
    pub fn query(
        description: &'a dyn RuleDescription,
        configuration: &TargetConfiguration,
    ) -> FlavorCapability<'a> {
        match description
            .flavored()
            .and_then(|flavored| flavored.flavor_domains(configuration))
        {
            Some(domains) => FlavorCapability::Supported(domains),
            None => FlavorCapability::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use buck_parser_core::configuration::TargetConfiguration;
    use buck_parser_core::flavor::Flavor;
        use buck_parser_core::flavor_domain::FlavorDomain;
    use buck_parser_core::flavor_domain::FlavorDomainView;

    use crate::description::FlavorCapability;
    use crate::description::Flavored;
    use crate::description::RuleDescription;

    struct NotFlavored;

    impl RuleDescription for NotFlavored {}

    /// Flavored only when configured for `linux-x86_64`.
    struct PlatformFlavored {
        strip: FlavorDomain<bool>,
    }

    impl RuleDescription for PlatformFlavored {
        fn flavored(&self) -> Option<&dyn Flavored> {
            Some(self)
        }
    }

    impl Flavored for PlatformFlavored {
        fn flavor_domains(
            &self,
            configuration: &TargetConfiguration,
        ) -> Option<Vec<&dyn FlavorDomainView>> {
            match configuration {
                TargetConfiguration::Platform(p) if &**p == "linux-x86_64" => {
                    Some(vec![&self.strip as &dyn FlavorDomainView])
                }
                _ => None,
            }
        }
    }

    fn platform_flavored() -> PlatformFlavored {
        PlatformFlavored {
            strip: FlavorDomain::new(
                "strip",
                [
                    (Flavor::testing_new("strip-debug"), true),
                    (Flavor::testing_new("no-strip"), false),
                ],
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_query_unsupported() {
        assert!(matches!(
            FlavorCapability::query(&NotFlavored, &TargetConfiguration::Unconfigured),
            FlavorCapability::Unsupported
        ));
        let flavored = platform_flavored();
        assert!(matches!(
            FlavorCapability::query(&flavored, &TargetConfiguration::Unconfigured),
            FlavorCapability::Unsupported
        ));
    }

    #[test]
    fn test_query_supported() {
        let flavored = platform_flavored();
        match FlavorCapability::query(&flavored, &TargetConfiguration::platform("linux-x86_64")) {
            FlavorCapability::Supported(domains) => {
                assert_eq!(1, domains.len());
                assert_eq!("strip", domains[0].name());
            }
            FlavorCapability::Unsupported => panic!("expected flavor support"),
        }
    }
}
