/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use buck_parser_core::package::PackagePath;
use starlark_map::small_map::SmallMap;

/// The attribute holding the short name of a target.
pub const NAME_ATTRIBUTE: &str = "name";

/// One rule invocation as the build-file parser produced it, before its
/// attributes are coerced against the rule's schema.
///
/// Attributes keep the order they were written in the build file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RawTargetNode {
    /// Package the parser claims the build file belongs to.
    base_path: PackagePath,
    /// Name of the rule type, e.g. `java_library`.
    buck_type: String,
    visibility_patterns: Vec<String>,
    licenses: Vec<String>,
    attrs: SmallMap<String, String>,
}

impl RawTargetNode {
    pub fn new(
        base_path: PackagePath,
        buck_type: impl Into<String>,
        visibility_patterns: Vec<String>,
        licenses: Vec<String>,
        attrs: SmallMap<String, String>,
    ) -> RawTargetNode {
        RawTargetNode {
            base_path,
            buck_type: buck_type.into(),
            visibility_patterns,
            licenses,
            attrs,
        }
    }

    /// A `java_library` node with no visibility or licenses.
    pub fn testing_new(base_path: &str, attrs: &[(&str, &str)]) -> RawTargetNode {
        RawTargetNode::new(
            PackagePath::testing_new(base_path),
            "java_library",
            Vec::new(),
            Vec::new(),
            attrs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    pub fn base_path(&self) -> &PackagePath {
        &self.base_path
    }

    pub fn buck_type(&self) -> &str {
        &self.buck_type
    }

    pub fn visibility_patterns(&self) -> &[String] {
        &self.visibility_patterns
    }

    pub fn licenses(&self) -> &[String] {
        &self.licenses
    }

    pub fn attrs(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, attr: &str) -> Option<&str> {
        self.attrs.get(attr).map(String::as_str)
    }

    /// The `name` attribute, which every well-formed node has.
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_ATTRIBUTE)
    }
}
