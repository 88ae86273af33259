// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::cell::ContextCell;
use crate::attribute::{ContextAttribute, MAX_CONTEXT_ATTRIBUTES};
use crate::context::ProfilerContext;
use crate::encoding::EncodedId;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// The active context of one thread plus its custom attribute values.
///
/// The owning thread writes it; a sampler or scheduler on another thread may
/// read or write it through a [`ThreadContextHandle`]. Context loads and
/// stores are whole and lock-free: a reader never sees the root span id of
/// one context paired with the span id of another, and never waits on a
/// lock shared with other slots.
pub struct ActiveContextSlot {
    context: ContextCell,
    attributes: [AtomicU32; MAX_CONTEXT_ATTRIBUTES],
}

/// Everything a [`crate::ProfilingScope`] restores when it closes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ContextSnapshot {
    pub context: Option<ProfilerContext>,
    pub attributes: [EncodedId; MAX_CONTEXT_ATTRIBUTES],
}

impl Default for ActiveContextSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveContextSlot {
    pub fn new() -> Self {
        Self {
            context: ContextCell::new(),
            attributes: core::array::from_fn(|_| AtomicU32::new(0)),
        }
    }

    #[inline]
    pub fn get(&self) -> Option<ProfilerContext> {
        self.context.load()
    }

    /// Like [`ActiveContextSlot::get`], but returns `None` instead of
    /// retrying when a store is in progress. A sampler running on the slot's
    /// own thread, which may have interrupted that store, must use this.
    #[inline]
    pub fn try_get(&self) -> Option<Option<ProfilerContext>> {
        self.context.try_load()
    }

    #[inline]
    pub fn set(&self, context: Option<ProfilerContext>) {
        self.context.store(context)
    }

    #[inline]
    pub fn replace(&self, context: Option<ProfilerContext>) -> Option<ProfilerContext> {
        self.context.swap(context)
    }

    /// Returns the value of `attribute` on this thread, or the sentinel if
    /// the attribute is inert or unset.
    #[inline]
    pub fn attribute(&self, attribute: &ContextAttribute) -> EncodedId {
        match attribute.offset() {
            Some(offset) => EncodedId::from(self.attributes[offset].load(Ordering::Acquire)),
            None => EncodedId::UNENCODED,
        }
    }

    #[inline]
    pub fn set_attribute(&self, attribute: &ContextAttribute, value: EncodedId) {
        if let Some(offset) = attribute.offset() {
            self.attributes[offset].store(value.get(), Ordering::Release);
        }
    }

    pub fn attributes(&self) -> [EncodedId; MAX_CONTEXT_ATTRIBUTES] {
        core::array::from_fn(|i| EncodedId::from(self.attributes[i].load(Ordering::Acquire)))
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            context: self.get(),
            attributes: self.attributes(),
        }
    }

    pub fn restore(&self, snapshot: &ContextSnapshot) {
        for (slot, value) in self.attributes.iter().zip(snapshot.attributes) {
            slot.store(value.get(), Ordering::Release);
        }
        self.set(snapshot.context);
    }

    /// Drops the context and every attribute value.
    pub fn reset(&self) {
        self.restore(&ContextSnapshot::default());
    }
}

/// A shareable reference to one thread's [`ActiveContextSlot`].
///
/// Handing a handle to another thread through a channel, a join or a lock
/// makes everything written to the slot before the handoff visible to the
/// receiver.
#[derive(Clone, Default)]
pub struct ThreadContextHandle {
    slot: Arc<ActiveContextSlot>,
}

impl ThreadContextHandle {
    pub(crate) fn new(slot: Arc<ActiveContextSlot>) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn context(&self) -> Option<ProfilerContext> {
        self.slot.get()
    }

    /// Never waits; `None` means a store was in progress.
    #[inline]
    pub fn try_context(&self) -> Option<Option<ProfilerContext>> {
        self.slot.try_get()
    }

    #[inline]
    pub fn set_context(&self, context: ProfilerContext) {
        self.slot.set(Some(context))
    }

    #[inline]
    pub fn clear_context(&self) {
        self.slot.set(None)
    }

    #[inline]
    pub fn attribute(&self, attribute: &ContextAttribute) -> EncodedId {
        self.slot.attribute(attribute)
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        self.slot.snapshot()
    }

    /// True when both handles refer to the same thread's slot.
    pub fn same_slot(&self, other: &ThreadContextHandle) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    #[cfg(test)]
    pub(crate) fn share_count(&self) -> usize {
        Arc::strong_count(&self.slot)
    }
}

impl fmt::Debug for ThreadContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadContextHandle")
            .field("context", &self.slot.get())
            .finish()
    }
}
