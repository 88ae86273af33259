// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::ProfilingContextIntegration;
use crate::attribute::ContextAttribute;
use crate::context::ProfilerContext;
use crate::scope::ProfilingScope;

/// The integration used when profiling is disabled. Every operation does
/// nothing and every encoding is [`crate::EncodedId::UNENCODED`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopIntegration;

impl NoopIntegration {
    pub const INSTANCE: NoopIntegration = NoopIntegration;
    pub const NAME: &'static str = "none";
}

impl ProfilingContextIntegration for NoopIntegration {
    fn on_attach(&self) {}

    fn on_detach(&self) {}

    fn set_context(&self, _context: ProfilerContext) {}

    fn set_context_ids(&self, _root_span_id: u64, _span_id: u64) {}

    fn clear_context(&self) {}

    fn create_context_attribute(&self, _name: &str) -> ContextAttribute {
        ContextAttribute::NOOP
    }

    fn new_scope(&self) -> ProfilingScope<'_> {
        ProfilingScope::noop()
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
