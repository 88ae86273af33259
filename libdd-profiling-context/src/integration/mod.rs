// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod noop;
mod thread_context;

pub use noop::*;
pub use thread_context::*;

use crate::attribute::ContextAttribute;
use crate::config::ProfilingContextConfig;
use crate::context::ProfilerContext;
use crate::encoding::EncodedId;
use crate::scope::ProfilingScope;
use std::sync::Arc;
use tracing::{debug, error};

/// What tracer instrumentation calls when a trace hops threads or a span
/// starts or stops.
///
/// There are two implementations: [`ThreadContextIntegration`] when
/// profiling is enabled, and [`NoopIntegration`] when it isn't. Callers hold
/// an `Arc<dyn ProfilingContextIntegration>` and never check which one they
/// have. No method performs I/O or reports an error.
pub trait ProfilingContextIntegration: Send + Sync {
    /// Called the first time a trace propagates onto the calling thread.
    /// Calling it again while attached does nothing.
    fn on_attach(&self);

    /// Called when the calling thread stops carrying trace work. Does
    /// nothing if the thread isn't attached.
    fn on_detach(&self);

    /// Replaces the calling thread's context.
    fn set_context(&self, context: ProfilerContext);

    fn set_context_ids(&self, root_span_id: u64, span_id: u64) {
        self.set_context(ProfilerContext::new(root_span_id, span_id))
    }

    /// Leaves the calling thread with no context.
    fn clear_context(&self);

    /// The calling thread's context, as a sampler running on it would see it.
    fn current_context(&self) -> Option<ProfilerContext> {
        None
    }

    fn encode(&self, _constant: &str) -> EncodedId {
        EncodedId::UNENCODED
    }

    fn encode_operation_name(&self, _name: &str) -> EncodedId {
        EncodedId::UNENCODED
    }

    fn encode_resource_name(&self, _name: &str) -> EncodedId {
        EncodedId::UNENCODED
    }

    fn create_context_attribute(&self, _name: &str) -> ContextAttribute {
        ContextAttribute::NOOP
    }

    /// Saves the calling thread's context and attributes, and returns a
    /// guard which puts them back when released.
    fn new_scope(&self) -> ProfilingScope<'_>;

    fn new_scope_with_context(&self, context: ProfilerContext) -> ProfilingScope<'_> {
        let scope = self.new_scope();
        scope.set_context(context);
        scope
    }

    fn name(&self) -> &'static str;
}

/// Builds the integration `config` asks for. A configuration which can't be
/// honored is logged and results in the no-op integration.
pub fn from_config(config: &ProfilingContextConfig) -> Arc<dyn ProfilingContextIntegration> {
    if !config.enabled {
        debug!("profiling is disabled, using the no-op context integration");
        return Arc::new(NoopIntegration);
    }
    match ThreadContextIntegration::try_from_config(config) {
        Ok(integration) => Arc::new(integration),
        Err(err) => {
            error!(
                "failed to set up the profiling context integration, falling back to no-op: {err}"
            );
            Arc::new(NoopIntegration)
        }
    }
}
