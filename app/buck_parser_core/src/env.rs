/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */


use std::env;
use std::env::VarError;
use std::str::FromStr;

use anyhow::Context;
use once_cell::sync::OnceCell;

#[derive(Debug, thiserror::Error)]
enum EnvError {
    #[error("Value of `${0}` is not valid UTF-8")]
    NotUnicode(&'static str),
}

/// A setting read from an environment variable the first time it is needed.
///
/// Helpers live in statics, so each variable is read and parsed once per process:
///
/// ```
/// use buck_parser_core::configuration::TargetConfiguration;
/// use buck_parser_core::env::EnvHelper;
///
/// static PLATFORM: EnvHelper<TargetConfiguration> = EnvHelper::new("DOC_TEST_PLATFORM");
///
/// assert_eq!(TargetConfiguration::Unconfigured, PLATFORM.get_or_default()?);
/// # anyhow::Ok(())
/// ```
pub struct EnvHelper<T> {
    var: &'static str,
    parse: fn(&str) -> anyhow::Result<T>,
    value: OnceCell<Option<T>>,
}

fn parse_from_str<T>(raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    anyhow::Error: From<T::Err>,
{
    Ok(raw.parse()?)
}

impl<T> EnvHelper<T> {
    pub const fn new(var: &'static str) -> EnvHelper<T>
    where
        T: FromStr,
        anyhow::Error: From<T::Err>,
    {
        EnvHelper::with_converter(var, parse_from_str::<T>)
    }

    pub const fn with_converter(
        var: &'static str,
        parse: fn(&str) -> anyhow::Result<T>,
    ) -> EnvHelper<T> {
        EnvHelper {
            var,
            parse,
            value: OnceCell::new(),
        }
    }

    pub fn var(&self) -> &'static str {
        self.var
    }

    /// `None` when the variable is unset. A value which fails to parse is an error
    /// on this and every later call.
    pub fn get(&'static self) -> anyhow::Result<Option<&'static T>> {
        self.value
            .get_or_try_init(|| self.read())
            .map(Option::as_ref)
            .with_context(|| format!("Invalid value for `${}`", self.var))
    }

    pub fn get_or_default(&'static self) -> anyhow::Result<T>
    where
        T: Clone + Default,
    {
        Ok(self.get()?.cloned().unwrap_or_default())
    }

    fn read(&self) -> anyhow::Result<Option<T>> {
        let raw = match env::var(self.var) {
            Ok(raw) => raw,
            Err(VarError::NotPresent) => return Ok(None),
            Err(VarError::NotUnicode(_)) => return Err(EnvError::NotUnicode(self.var).into()),
        };
        let value = (self.parse)(&raw)?;
        tracing::info!("Using `${}` = `{}`", self.var, raw);
        Ok(Some(value))
    }
}
