// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::attribute::ContextAttribute;
use crate::context::ProfilerContext;
use crate::encoding::{ConstantEncoder, EncodedId};
use crate::thread::{self, ContextSnapshot};
use std::marker::PhantomData;

struct OpenScope<'a> {
    encoder: &'a ConstantEncoder,
    saved: ContextSnapshot,
}

/// Restores the thread's previous context and attribute values when closed
/// or dropped, whichever comes first.
///
/// Opening a scope installs "no context" but keeps the attribute values of
/// the enclosing scope. Nested scopes must be released in reverse order of
/// creation, which dropping them at the end of their blocks does.
///
/// A scope acts on the slot of the thread it was opened on, looked up in
/// thread-local storage, so it can't be sent to another thread.
pub struct ProfilingScope<'a> {
    state: Option<OpenScope<'a>>,
    _not_send: PhantomData<*const ()>,
}

impl<'a> ProfilingScope<'a> {
    /// Opens a scope on the calling thread. Once the thread-local has been
    /// destroyed this is a no-op scope.
    pub(crate) fn open(encoder: &'a ConstantEncoder) -> Self {
        let saved = thread::with_current_slot(|slot| {
            let saved = slot.snapshot();
            slot.set(None);
            saved
        });
        Self {
            state: saved.map(|saved| OpenScope { encoder, saved }),
            _not_send: PhantomData,
        }
    }

    /// A scope which does nothing.
    pub const fn noop() -> ProfilingScope<'static> {
        ProfilingScope {
            state: None,
            _not_send: PhantomData,
        }
    }

    /// True for no-op scopes and for scopes which have been closed.
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.state.is_none()
    }

    pub fn set_context(&self, context: ProfilerContext) {
        if self.state.is_some() {
            thread::with_current_slot(|slot| slot.set(Some(context)));
        }
    }

    pub fn clear_context(&self) {
        if self.state.is_some() {
            thread::with_current_slot(|slot| slot.set(None));
        }
    }

    /// Encodes `value` as a constant and records it for `attribute` on this
    /// thread until the scope closes.
    pub fn set_context_value(&self, attribute: &ContextAttribute, value: &str) {
        if let Some(state) = &self.state {
            if attribute.is_noop() {
                return;
            }
            let id = state.encoder.encode(value);
            thread::with_current_slot(|slot| slot.set_attribute(attribute, id));
        }
    }

    /// Like [`ProfilingScope::set_context_value`] with an already encoded
    /// value.
    pub fn set_context_id(&self, attribute: &ContextAttribute, id: EncodedId) {
        if self.state.is_some() {
            thread::with_current_slot(|slot| slot.set_attribute(attribute, id));
        }
    }

    pub fn clear_context_value(&self, attribute: &ContextAttribute) {
        self.set_context_id(attribute, EncodedId::UNENCODED);
    }

    /// Restores what was active when the scope opened. Later calls do
    /// nothing.
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            thread::with_current_slot(|slot| slot.restore(&state.saved));
        }
    }
}

impl Drop for ProfilingScope<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
