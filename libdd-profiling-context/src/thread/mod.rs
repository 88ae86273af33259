// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-thread storage for the active profiler context.
//!
//! Every thread lazily gets an [`ActiveContextSlot`] the first time it is
//! touched. The slot lives until the thread exits; when it does, the thread
//! is detached from every integration it was still attached to. Calls made
//! while the thread-local is being torn down behave as if the thread had no
//! context and was never attached.

mod cell;
mod registry;
mod slot;

pub use registry::*;
pub use slot::*;

use std::cell::RefCell;
use std::sync::{Arc, Weak};
use std::thread::ThreadId;
use tracing::trace;

struct Attachment {
    registry_id: u64,
    registry: Weak<AttachedThreads>,
}

impl Attachment {
    fn is_live(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

struct ThreadState {
    id: ThreadId,
    slot: Arc<ActiveContextSlot>,
    attachments: RefCell<Vec<Attachment>>,
}

impl ThreadState {
    fn new() -> Self {
        Self {
            id: std::thread::current().id(),
            slot: Arc::new(ActiveContextSlot::new()),
            attachments: RefCell::new(Vec::new()),
        }
    }

    fn handle(&self) -> ThreadContextHandle {
        ThreadContextHandle::new(self.slot.clone())
    }
}

impl Drop for ThreadState {
    fn drop(&mut self) {
        for attachment in self.attachments.get_mut().drain(..) {
            if let Some(registry) = attachment.registry.upgrade() {
                registry.remove(self.id);
            }
        }
        self.slot.reset();
    }
}

thread_local! {
    static THREAD: ThreadState = ThreadState::new();
}

/// Runs `f` against the calling thread's slot. Returns `None` if the
/// thread-local has already been destroyed.
#[inline]
pub fn with_current_slot<R>(f: impl FnOnce(&ActiveContextSlot) -> R) -> Option<R> {
    THREAD.try_with(|state| f(&state.slot)).ok()
}

/// The calling thread's context, or `None` if it has none.
#[inline]
pub fn current_context() -> Option<crate::ProfilerContext> {
    with_current_slot(|slot| slot.get()).flatten()
}

/// A handle to the calling thread's slot which other threads can use.
pub fn current_handle() -> Option<ThreadContextHandle> {
    THREAD.try_with(ThreadState::handle).ok()
}

/// Registers the calling thread with `registry`. Returns false if it was
/// already attached, or if the thread is shutting down.
pub fn attach(registry: &Arc<AttachedThreads>) -> bool {
    THREAD
        .try_with(|state| {
            let Ok(mut attachments) = state.attachments.try_borrow_mut() else {
                return false;
            };
            attachments.retain(Attachment::is_live);
            if attachments.iter().any(|a| a.registry_id == registry.id()) {
                return false;
            }
            attachments.push(Attachment {
                registry_id: registry.id(),
                registry: Arc::downgrade(registry),
            });
            registry.insert(state.id, state.handle());
            trace!(registry = registry.id(), "thread attached");
            true
        })
        .unwrap_or(false)
}

/// Unregisters the calling thread from `registry`. Returns the number of
/// live registries the thread is still attached to, or `None` if it wasn't
/// attached to `registry`.
pub fn detach(registry: &AttachedThreads) -> Option<usize> {
    THREAD
        .try_with(|state| {
            let mut attachments = state.attachments.try_borrow_mut().ok()?;
            let pos = attachments
                .iter()
                .position(|a| a.registry_id == registry.id())?;
            attachments.swap_remove(pos);
            attachments.retain(Attachment::is_live);
            registry.remove(state.id);
            trace!(registry = registry.id(), "thread detached");
            Some(attachments.len())
        })
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfilerContext;

    fn attachment_entries() -> usize {
        THREAD.with(|state| state.attachments.borrow().len())
    }

    #[test]
    fn attach_and_detach_are_idempotent() {
        let registry = Arc::new(AttachedThreads::new());
        assert_eq!(detach(&registry), None);
        assert!(attach(&registry));
        assert!(!attach(&registry));
        assert_eq!(registry.len(), 1);
        assert_eq!(detach(&registry), Some(0));
        assert_eq!(detach(&registry), None);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn detach_reports_remaining_attachments() {
        std::thread::spawn(|| {
            let a = Arc::new(AttachedThreads::new());
            let b = Arc::new(AttachedThreads::new());
            assert!(attach(&a));
            assert!(attach(&b));
            assert_eq!(detach(&b), Some(1));
            assert_eq!(detach(&a), Some(0));
        })
        .join()
        .unwrap();
    }

    #[test]
    fn dropped_registries_are_pruned_on_attach() {
        std::thread::spawn(|| {
            for _ in 0..100 {
                let registry = Arc::new(AttachedThreads::new());
                assert!(attach(&registry));
            }
            let kept = Arc::new(AttachedThreads::new());
            assert!(attach(&kept));
            assert_eq!(attachment_entries(), 1);
            assert_eq!(detach(&kept), Some(0));
            assert_eq!(attachment_entries(), 0);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn thread_exit_detaches() {
        let registry = Arc::new(AttachedThreads::new());
        let worker_registry = registry.clone();
        std::thread::spawn(move || {
            assert!(attach(&worker_registry));
            assert_eq!(worker_registry.len(), 1);
        })
        .join()
        .unwrap();
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn dropped_registry_is_skipped_on_exit() {
        std::thread::spawn(|| {
            let registry = Arc::new(AttachedThreads::new());
            assert!(attach(&registry));
            drop(registry);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn handle_observes_the_thread_slot() {
        let handle = current_handle().unwrap();
        with_current_slot(|slot| slot.set(Some(ProfilerContext::new(3, 4))));
        assert_eq!(handle.context(), Some(ProfilerContext::new(3, 4)));
        assert_eq!(current_context(), Some(ProfilerContext::new(3, 4)));
        handle.clear_context();
        assert_eq!(current_context(), None);
        assert!(handle.same_slot(&current_handle().unwrap()));
    }
}
