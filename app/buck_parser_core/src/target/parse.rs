/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

#[derive(Debug, thiserror::Error)]
enum TargetParseError {
    #[error("Expected a fully qualified target containing `//`, got `{0}`")]
    NotQualified(String),
    #[error("Expected target `{0}` to contain `:` separating package and name")]
    NoColon(String),
}

/// The textual parts of a target, not yet validated.
pub(crate) struct TargetParts<'a> {
    pub(crate) cell: &'a str,
    pub(crate) package: &'a str,
    pub(crate) name: &'a str,
    /// Text after `#`, if there was one.
    pub(crate) flavors: Option<&'a str>,
}

fn split1_opt(s: &str, delim: char) -> Option<(&str, &str)> {
    s.find(delim).map(|i| (&s[..i], &s[i + delim.len_utf8()..]))
}

pub(crate) fn lex_target(target: &str) -> anyhow::Result<TargetParts<'_>> {
    let (cell, rest) = target
        .split_once("//")
        .ok_or_else(|| TargetParseError::NotQualified(target.to_owned()))?;
    let (package, name) =
        split1_opt(rest, ':').ok_or_else(|| TargetParseError::NoColon(target.to_owned()))?;
    let (name, flavors) = match split1_opt(name, '#') {
        Some((name, flavors)) => (name, Some(flavors)),
        None => (name, None),
    };
    Ok(TargetParts {
        cell,
        package,
        name,
        flavors,
    })
}
