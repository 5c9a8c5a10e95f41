/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::path::Path;

use dupe::Dupe;

use crate::cells::name::CellName;
use crate::fs::AbsPathBuf;
use crate::package::PackagePath;

#[derive(Debug, thiserror::Error)]
enum CellRelativizeError {
    #[error("Path `{0}` is not under the root `{1}` of cell `{2}//`")]
    NotUnderRoot(String, AbsPathBuf, CellName),
}

/// A resolved cell: its name and the directory it is rooted at.
///
/// Cells are resolved once per build and then only read, so a single instance is
/// shared by every thread parsing files of that cell.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CellInstance {
    name: CellName,
    root: AbsPathBuf,
}

impl CellInstance {
    pub fn new(name: CellName, root: AbsPathBuf) -> CellInstance {
        CellInstance { name, root }
    }

    /// Root cell at `/repo` (`C:\repo` on Windows).
    pub fn testing_root() -> CellInstance {
        let root = if cfg!(windows) { "C:\\repo" } else { "/repo" };
        CellInstance::new(CellName::root(), AbsPathBuf::new(root).unwrap())
    }

    pub fn name(&self) -> CellName {
        self.name.dupe()
    }

    pub fn root(&self) -> &AbsPathBuf {
        &self.root
    }

    /// The path of directory `dir` relative to this cell's root.
    ///
    /// `dir` is either absolute, in which case it must be under the cell root, or
    /// already relative to the cell root.
    pub fn relativize(&self, dir: &Path) -> anyhow::Result<PackagePath> {
        let relative = if dir.is_absolute() {
            dir.strip_prefix(self.root.as_path()).map_err(|_| {
                CellRelativizeError::NotUnderRoot(
                    dir.display().to_string(),
                    self.root.clone(),
                    self.name.dupe(),
                )
            })?
        } else {
            dir
        };
        PackagePath::from_path(relative)
    }
}
