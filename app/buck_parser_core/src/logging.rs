/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */


//! Tracing setup for tools embedding the parser.
//!
//! Events are filtered by `$BUCK_LOG` (`EnvFilter` syntax, `warn` when unset). The
//! filter can be replaced at runtime through the returned handle.

use std::sync::Arc;

use anyhow::Context;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Filtered;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload;

use crate::env::EnvHelper;

pub static BUCK_LOG: EnvHelper<String> = EnvHelper::new("BUCK_LOG");

const DEFAULT_LOG_FILTER: &str = "warn";

pub trait LogConfigurationReloadHandle: Send + Sync + 'static {
    fn update_log_filter(&self, filter: &str) -> anyhow::Result<()>;
}

impl dyn LogConfigurationReloadHandle {
    pub fn noop() -> Arc<dyn LogConfigurationReloadHandle> {
        Arc::new(NoopLogConfigurationReloadHandle) as _
    }
}

struct NoopLogConfigurationReloadHandle;

impl LogConfigurationReloadHandle for NoopLogConfigurationReloadHandle {
    fn update_log_filter(&self, _filter: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<L, S> LogConfigurationReloadHandle for reload::Handle<Filtered<L, EnvFilter, S>, S>
where
    L: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    fn update_log_filter(&self, filter: &str) -> anyhow::Result<()> {
        let filter = parse_log_filter(filter)?;
        self.modify(|layer| *layer.filter_mut() = filter)
            .context("Error updating log filter")?;
        Ok(())
    }
}

fn parse_log_filter(filter: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter `{}`", filter))
}

/// The filter from `$BUCK_LOG`, or the default one.
pub fn log_filter() -> anyhow::Result<EnvFilter> {
    match BUCK_LOG.get()? {
        Some(filter) => {
            parse_log_filter(filter).with_context(|| format!("Invalid `${}`", BUCK_LOG.var()))
        }
        None => parse_log_filter(DEFAULT_LOG_FILTER),
    }
}

/// A subscriber writing formatted events to `writer`, not yet installed.
///
/// Use [`tracing::subscriber::with_default`] to scope it, or
/// [`init_tracing_for_writer`] to install it for the whole process.
pub fn subscriber_for_writer<W>(
    writer: W,
) -> anyhow::Result<(
    impl Subscriber + Send + Sync + 'static,
    Arc<dyn LogConfigurationReloadHandle>,
)>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(log_filter()?);
    let (layer, handle) = reload::Layer::new(layer);
    let subscriber = tracing_subscriber::registry().with(layer);
    Ok((subscriber, Arc::new(handle) as _))
}

pub fn init_tracing_for_writer<W>(writer: W) -> anyhow::Result<Arc<dyn LogConfigurationReloadHandle>>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let (subscriber, handle) = subscriber_for_writer(writer)?;
    tracing::subscriber::set_global_default(subscriber)
        .context("Global tracing subscriber is already installed")?;
    Ok(handle)
}
