// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::ProfilingContextIntegration;
use crate::attribute::ContextAttribute;
use crate::config::ProfilingContextConfig;
use crate::context::ProfilerContext;
use crate::encoding::{ConstantEncoder, EncodedId, Namespace};
use crate::error::ContextError;
use crate::scope::ProfilingScope;
use crate::thread::{self, AttachedThreads, ThreadContextHandle};
use std::sync::Arc;
use std::thread::ThreadId;
use tracing::debug;

/// Keeps each thread's active context in thread-local storage where the
/// sampler picks it up, and encodes constants into process-wide tables.
///
/// The active context belongs to the thread, not to the integration: two
/// integrations in one process see the same context on a given thread. The
/// attachments and encoding tables are per integration.
pub struct ThreadContextIntegration {
    encoder: ConstantEncoder,
    attached: Arc<AttachedThreads>,
    attribute_names: Vec<String>,
}

impl Default for ThreadContextIntegration {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadContextIntegration {
    pub const NAME: &'static str = "datadog";

    /// An integration without custom context attributes.
    pub fn new() -> Self {
        Self {
            encoder: ConstantEncoder::new(),
            attached: Arc::new(AttachedThreads::new()),
            attribute_names: Vec::new(),
        }
    }

    pub fn try_from_config(config: &ProfilingContextConfig) -> Result<Self, ContextError> {
        config.validate()?;
        debug!(
            attributes = ?config.context_attributes,
            "profiling context integration enabled"
        );
        Ok(Self {
            attribute_names: config.context_attributes.clone(),
            ..Self::new()
        })
    }

    pub fn encoder(&self) -> &ConstantEncoder {
        &self.encoder
    }

    /// Symbolizes an id found in a sample record.
    pub fn resolve(&self, namespace: Namespace, id: EncodedId) -> Option<Arc<str>> {
        self.encoder.resolve(namespace, id)
    }

    /// Number of threads currently attached.
    pub fn active_attachments(&self) -> usize {
        self.attached.len()
    }

    pub fn is_current_thread_attached(&self) -> bool {
        self.attached.contains(std::thread::current().id())
    }

    /// The attached threads and handles to their contexts, for a sampler
    /// walking all threads.
    pub fn attached_threads(&self) -> Vec<(ThreadId, ThreadContextHandle)> {
        self.attached.snapshot()
    }

    pub fn attached_thread(&self, thread: ThreadId) -> Option<ThreadContextHandle> {
        self.attached.get(thread)
    }

    pub fn context_attribute_names(&self) -> &[String] {
        &self.attribute_names
    }
}

impl ProfilingContextIntegration for ThreadContextIntegration {
    fn on_attach(&self) {
        thread::attach(&self.attached);
    }

    /// Once the thread is attached to no integration at all, detaching also
    /// drops whatever context and attributes it still carries. While another
    /// integration keeps it attached the slot is left alone.
    fn on_detach(&self) {
        if thread::detach(&self.attached) == Some(0) {
            thread::with_current_slot(|slot| slot.reset());
        }
    }

    #[inline]
    fn set_context(&self, context: ProfilerContext) {
        thread::with_current_slot(|slot| slot.set(Some(context)));
    }

    #[inline]
    fn clear_context(&self) {
        thread::with_current_slot(|slot| slot.set(None));
    }

    #[inline]
    fn current_context(&self) -> Option<ProfilerContext> {
        thread::current_context()
    }

    #[inline]
    fn encode(&self, constant: &str) -> EncodedId {
        self.encoder.encode(constant)
    }

    #[inline]
    fn encode_operation_name(&self, name: &str) -> EncodedId {
        self.encoder.encode_operation_name(name)
    }

    #[inline]
    fn encode_resource_name(&self, name: &str) -> EncodedId {
        self.encoder.encode_resource_name(name)
    }

    fn create_context_attribute(&self, name: &str) -> ContextAttribute {
        match self.attribute_names.iter().position(|n| n == name) {
            Some(offset) => ContextAttribute::at(offset),
            None => ContextAttribute::NOOP,
        }
    }

    fn new_scope(&self) -> ProfilingScope<'_> {
        ProfilingScope::open(&self.encoder)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
