/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use allocative::Allocative;
use dupe::Dupe;
use internment::Intern;
use itertools::Itertools;

/// Characters which separate the parts of a target label and so can't appear in a flavor.
const RESERVED_CHARS: &[char] = &['#', ',', '/', ':'];

#[derive(Debug, thiserror::Error)]
enum FlavorError {
    #[error("Flavor must be non-empty")]
    Empty,
    #[error("Invalid flavor `{0}`: flavors must not contain `{1}`")]
    ReservedChar(String, char),
    #[error("Invalid flavor `{0}`: flavors must not contain whitespace")]
    Whitespace(String),
    #[error("Flavor list after `#` is empty")]
    EmptyList,
}

/// A `Flavor` is an atomic tag selecting a build-time variant of a target,
/// like `shared` in `//foo:bar#shared`.
///
/// Flavors are interned, so copying and comparing them is cheap. Tags are
/// case-sensitive.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Allocative)]
pub struct Flavor(#[allocative(skip)] Intern<String>);

impl Dupe for Flavor {}

impl Flavor {
    pub fn new(name: &str) -> anyhow::Result<Flavor> {
        if name.is_empty() {
            return Err(FlavorError::Empty.into());
        }
        if let Some(c) = name.chars().find(|c| RESERVED_CHARS.contains(c)) {
            return Err(FlavorError::ReservedChar(name.to_owned(), c).into());
        }
        if name.chars().any(char::is_whitespace) {
            return Err(FlavorError::Whitespace(name.to_owned()).into());
        }
        Ok(Flavor(Intern::new(name.to_owned())))
    }

    pub fn testing_new(name: &str) -> Flavor {
        Flavor::new(name).unwrap()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Flavor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for Flavor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Flavor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/// The flavors attached to a target. Kept sorted and free of duplicates, so two
/// sets with the same members compare equal and render identically.
#[derive(
    Clone,
    Debug,
    Default,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Allocative
)]
pub struct FlavorSet(Box<[Flavor]>);

impl FlavorSet {
    pub fn empty() -> FlavorSet {
        FlavorSet::default()
    }

    /// Parse the comma-separated list which follows `#` in a target label.
    pub fn parse(flavors: &str) -> anyhow::Result<FlavorSet> {
        if flavors.is_empty() {
            return Err(FlavorError::EmptyList.into());
        }
        flavors.split(',').map(Flavor::new).collect()
    }

    pub fn testing_new(flavors: &[&str]) -> FlavorSet {
        flavors.iter().map(|f| Flavor::testing_new(f)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Flavor> {
        self.0.iter()
    }

    pub fn contains(&self, flavor: &Flavor) -> bool {
        self.0.binary_search(flavor).is_ok()
    }

    /// Flavors of `self` for which `known` returns `false`.
    pub fn difference(&self, mut known: impl FnMut(&Flavor) -> bool) -> FlavorSet {
        // Filtering a sorted, deduplicated slice keeps it sorted and deduplicated.
        FlavorSet(self.0.iter().copied().filter(|f| !known(f)).collect())
    }
}

impl FromIterator<Flavor> for FlavorSet {
    fn from_iter<I: IntoIterator<Item = Flavor>>(iter: I) -> Self {
        FlavorSet(iter.into_iter().sorted().dedup().collect())
    }
}

impl Display for FlavorSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(","))
    }
}
