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

#[derive(Debug, thiserror::Error)]
enum CellNameError {
    #[error("Cell name must be non-empty, the unnamed cell is the root cell")]
    Empty,
    #[error("Invalid cell name `{0}`: cell names must not contain `/`, `:`, `#` or whitespace")]
    InvalidChar(String),
}

/// A `CellName` identifies the cell a target lives in.
///
/// The cell within a fully qualified target like `foo//some:target` is `foo`. The
/// root cell has no name, so its targets render as `//some:target`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Allocative)]
pub struct CellName(#[allocative(skip)] Option<Intern<String>>);

impl Dupe for CellName {}

impl CellName {
    pub const fn root() -> CellName {
        CellName(None)
    }

    /// Construct a cell name.
    ///
    /// This function is unchecked because it does not validate that the cell points
    /// to an existing cell. Cell resolution happens before targets reach the parser.
    pub fn unchecked_new(name: &str) -> anyhow::Result<CellName> {
        if name.is_empty() {
            return Err(CellNameError::Empty.into());
        }
        if name
            .chars()
            .any(|c| matches!(c, '/' | ':' | '#') || c.is_whitespace())
        {
            return Err(CellNameError::InvalidChar(name.to_owned()).into());
        }
        Ok(CellName(Some(Intern::new(name.to_owned()))))
    }

    /// Empty name is the root cell.
    pub fn testing_new(name: &str) -> CellName {
        if name.is_empty() {
            CellName::root()
        } else {
            CellName::unchecked_new(name).unwrap()
        }
    }

    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> &str {
        match &self.0 {
            Some(name) => name.as_str(),
            None => "",
        }
    }
}

impl Display for CellName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for CellName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}
