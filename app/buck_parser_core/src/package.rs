/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::path::Component;
use std::path::Path;

use allocative::Allocative;
use derive_more::Display;

#[derive(Debug, thiserror::Error)]
enum PackagePathError {
    #[error("Package path `{0}` must be relative")]
    Absolute(String),
    #[error("Package path `{0}` must be normalized, `.`, `..` and empty segments are not allowed")]
    NotNormalized(String),
    #[error("Package path `{0}` must use `/` as separator")]
    Backslash(String),
    #[error("Package path `{0}` is not valid UTF-8")]
    NotUtf8(String),
}

/// A `PackagePath` is the normalized, slash-separated directory of a build file
/// relative to the root of its cell. The empty path is the cell root itself.
#[derive(
    Clone,
    Debug,
    Display,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Allocative
)]
#[display("{}", _0)]
pub struct PackagePath(Box<str>);

impl PackagePath {
    /// ```
    /// use buck_parser_core::package::PackagePath;
    ///
    /// assert!(PackagePath::new("foo/bar").is_ok());
    /// assert!(PackagePath::new("").is_ok());
    /// assert!(PackagePath::new("/abs/bar").is_err());
    /// assert!(PackagePath::new("normalize/./bar").is_err());
    /// assert!(PackagePath::new("normalize/../bar").is_err());
    /// assert!(PackagePath::new("trailing/").is_err());
    /// ```
    pub fn new(path: &str) -> anyhow::Result<PackagePath> {
        if path.is_empty() {
            return Ok(PackagePath::empty());
        }
        if path.starts_with('/') {
            return Err(PackagePathError::Absolute(path.to_owned()).into());
        }
        if path.contains('\\') {
            return Err(PackagePathError::Backslash(path.to_owned()).into());
        }
        if path
            .split('/')
            .any(|segment| matches!(segment, "" | "." | ".."))
        {
            return Err(PackagePathError::NotNormalized(path.to_owned()).into());
        }
        Ok(PackagePath(path.into()))
    }

    /// Converts a relative file-system directory path, joining its components with `/`
    /// whatever the platform separator is. A leading `./` is dropped.
    pub fn from_path(path: &Path) -> anyhow::Result<PackagePath> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(segment) => match segment.to_str() {
                    Some(segment) => segments.push(segment),
                    None => {
                        return Err(PackagePathError::NotUtf8(path.display().to_string()).into());
                    }
                },
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(
                        PackagePathError::NotNormalized(path.display().to_string()).into(),
                    );
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PackagePathError::Absolute(path.display().to_string()).into());
                }
            }
        }
        PackagePath::new(&segments.join("/"))
    }

    pub fn empty() -> PackagePath {
        PackagePath("".into())
    }

    pub fn testing_new(path: &str) -> PackagePath {
        PackagePath::new(path).unwrap()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
