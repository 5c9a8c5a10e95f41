/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use allocative::Allocative;
use dupe::Dupe;
use itertools::Itertools;
use starlark_map::small_map::SmallMap;

use crate::flavor::Flavor;
use crate::flavor::FlavorSet;

#[derive(Debug, thiserror::Error)]
enum FlavorDomainError {
    #[error("Flavor domain name must be non-empty")]
    EmptyName,
    #[error("Flavor `{1}` is declared more than once in flavor domain `{0}`")]
    DuplicateFlavor(String, Flavor),
    #[error("Multiple flavors from domain `{0}` are present: {1}")]
    MultipleFlavors(String, String),
}

/// Whether users are expected to write a flavor themselves.
///
/// Internal flavors are attached by rules to their own dependencies and are
/// never suggested in diagnostics.
#[derive(Debug, Copy, Clone, Dupe, Eq, PartialEq, Hash, Allocative)]
pub enum FlavorKind {
    User,
    Internal,
}

#[derive(Clone, Debug)]
struct DomainEntry<V> {
    kind: FlavorKind,
    value: V,
}

/// One axis of variation a rule supports: a named mapping from each legal flavor
/// to the value it selects (a toolchain, a platform description, ...).
///
/// Flavors keep the order in which they were declared.
#[derive(Clone, Debug)]
pub struct FlavorDomain<V> {
    name: String,
    entries: SmallMap<Flavor, DomainEntry<V>>,
}

impl<V> FlavorDomain<V> {
    /// A domain of internal flavors.
    pub fn new(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (Flavor, V)>,
    ) -> anyhow::Result<FlavorDomain<V>> {
        Self::with_kinds(
            name,
            values
                .into_iter()
                .map(|(flavor, value)| (flavor, FlavorKind::Internal, value)),
        )
    }

    /// A domain whose flavors are all meant to be written by users.
    pub fn user(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (Flavor, V)>,
    ) -> anyhow::Result<FlavorDomain<V>> {
        Self::with_kinds(
            name,
            values
                .into_iter()
                .map(|(flavor, value)| (flavor, FlavorKind::User, value)),
        )
    }

    pub fn with_kinds(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (Flavor, FlavorKind, V)>,
    ) -> anyhow::Result<FlavorDomain<V>> {
        let name = name.into();
        if name.is_empty() {
            return Err(FlavorDomainError::EmptyName.into());
        }
        let entries = entries.into_iter();
        let mut map = SmallMap::with_capacity(entries.size_hint().0);
        for (flavor, kind, value) in entries {
            if map.insert(flavor, DomainEntry { kind, value }).is_some() {
                return Err(FlavorDomainError::DuplicateFlavor(name, flavor).into());
            }
        }
        Ok(FlavorDomain { name, entries: map })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flavors(&self) -> impl ExactSizeIterator<Item = &Flavor> {
        self.entries.keys()
    }

    pub fn user_flavors(&self) -> impl Iterator<Item = &Flavor> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.kind == FlavorKind::User)
            .map(|(flavor, _)| flavor)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.entries.values().map(|entry| &entry.value)
    }

    pub fn get(&self, flavor: &Flavor) -> Option<&V> {
        self.entries.get(flavor).map(|entry| &entry.value)
    }

    pub fn kind(&self, flavor: &Flavor) -> Option<FlavorKind> {
        self.entries.get(flavor).map(|entry| entry.kind)
    }

    pub fn contains(&self, flavor: &Flavor) -> bool {
        self.entries.contains_key(flavor)
    }

    /// The value selected by `flavors`, if any of them belongs to this domain.
    /// Selecting two values of the same domain at once is an error.
    pub fn get_value(&self, flavors: &FlavorSet) -> anyhow::Result<Option<&V>> {
        let mut selected = flavors.iter().filter(|f| self.contains(f));
        let Some(first) = selected.next() else {
            return Ok(None);
        };
        let rest: Vec<&Flavor> = selected.collect();
        if !rest.is_empty() {
            return Err(FlavorDomainError::MultipleFlavors(
                self.name.clone(),
                std::iter::once(first).chain(rest).join(", "),
            )
            .into());
        }
        Ok(self.get(first))
    }
}

/// The part of a [`FlavorDomain`] that does not depend on its value type.
///
/// Rules may support domains of different value types side by side, and the
/// parser only ever needs to know which flavors each of them accepts.
pub trait FlavorDomainView: Send + Sync {
    fn name(&self) -> &str;

    fn flavors(&self) -> Box<dyn Iterator<Item = &Flavor> + '_>;

    /// Flavors offered to users in diagnostics, in declaration order.
    fn user_flavors(&self) -> Box<dyn Iterator<Item = &Flavor> + '_>;

    fn contains(&self, flavor: &Flavor) -> bool;
}

impl<V: Send + Sync> FlavorDomainView for FlavorDomain<V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn flavors(&self) -> Box<dyn Iterator<Item = &Flavor> + '_> {
        Box::new(self.entries.keys())
    }

    fn user_flavors(&self) -> Box<dyn Iterator<Item = &Flavor> + '_> {
        Box::new(FlavorDomain::user_flavors(self))
    }

    fn contains(&self, flavor: &Flavor) -> bool {
        self.entries.contains_key(flavor)
    }
}
