/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::ops::Deref;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Display;

#[derive(Debug, thiserror::Error)]
enum AbsPathError {
    #[error("expected an absolute path but got a relative path instead: `{0}`")]
    PathNotAbsolute(String),
    #[error("expected a normalized path but got an un-normalized path instead: `{0}`")]
    PathNotNormalized(String),
}

/// An owned absolute, normalized path. This path is not platform agnostic.
#[derive(Clone, Display, Debug, Hash, PartialEq, Eq, Ord, PartialOrd)]
#[display("{}", _0.display())]
pub struct AbsPathBuf(PathBuf);

impl AbsPathBuf {
    /// Creates an `AbsPathBuf` if the given path is absolute and contains no `.`
    /// or `..` components, otherwise error.
    ///
    /// ```
    /// use buck_parser_core::fs::AbsPathBuf;
    ///
    /// assert!(AbsPathBuf::new("relative/bar").is_err());
    /// if cfg!(not(windows)) {
    ///     assert!(AbsPathBuf::new("/foo/bar").is_ok());
    ///     assert!(AbsPathBuf::new("/normalize/../bar").is_err());
    /// }
    /// ```
    pub fn new(path: impl Into<PathBuf>) -> anyhow::Result<AbsPathBuf> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(AbsPathError::PathNotAbsolute(path.display().to_string()).into());
        }
        if path
            .components()
            .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
        {
            return Err(AbsPathError::PathNotNormalized(path.display().to_string()).into());
        }
        Ok(AbsPathBuf(path))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.0.join(path)
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for AbsPathBuf {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Deref for AbsPathBuf {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}
