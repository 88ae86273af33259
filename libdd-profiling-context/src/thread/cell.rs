// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::context::ProfilerContext;
use crossbeam_utils::Backoff;
use std::sync::atomic::{fence, AtomicBool, AtomicU64, Ordering};

/// A lock-free cell holding an optional [`ProfilerContext`].
///
/// The two span ids and the presence flag are separate atomics guarded by a
/// sequence counter which is odd while a store is in progress. Readers load
/// the counter, the fields, then the counter again, and only accept the
/// fields if the counter didn't move. Nothing is shared between cells, so
/// stores on different threads never contend.
pub(crate) struct ContextCell {
    seq: AtomicU64,
    present: AtomicBool,
    root_span_id: AtomicU64,
    span_id: AtomicU64,
}

/// Exclusive write access to a [`ContextCell`], released on drop.
pub(crate) struct CellWriter<'a> {
    cell: &'a ContextCell,
    seq: u64,
}

impl ContextCell {
    pub const fn new() -> Self {
        Self {
            seq: AtomicU64::new(0),
            present: AtomicBool::new(false),
            root_span_id: AtomicU64::new(0),
            span_id: AtomicU64::new(0),
        }
    }

    /// Reads the context, or returns `None` if a store is in progress.
    ///
    /// Never waits. This is what code that may have interrupted a store on
    /// its own thread, such as a signal handler, must use.
    #[inline]
    pub fn try_load(&self) -> Option<Option<ProfilerContext>> {
        let seq = self.seq.load(Ordering::Acquire);
        if seq & 1 == 1 {
            return None;
        }
        let value = self.load_fields();
        fence(Ordering::Acquire);
        (self.seq.load(Ordering::Relaxed) == seq).then_some(value)
    }

    /// Reads the context, retrying while a store on another thread is in
    /// progress.
    #[inline]
    pub fn load(&self) -> Option<ProfilerContext> {
        let backoff = Backoff::new();
        loop {
            if let Some(value) = self.try_load() {
                return value;
            }
            backoff.snooze();
        }
    }

    #[inline]
    pub fn store(&self, context: Option<ProfilerContext>) {
        self.write().store(context);
    }

    #[inline]
    pub fn swap(&self, context: Option<ProfilerContext>) -> Option<ProfilerContext> {
        let writer = self.write();
        let previous = self.load_fields();
        writer.store(context);
        previous
    }

    /// Starts a store. Concurrent writers of the same cell, such as the
    /// owning thread and a scheduler holding its handle, take turns.
    pub fn write(&self) -> CellWriter<'_> {
        let backoff = Backoff::new();
        let mut seq = self.seq.load(Ordering::Relaxed);
        loop {
            if seq & 1 == 1 {
                backoff.snooze();
                seq = self.seq.load(Ordering::Relaxed);
                continue;
            }
            match self
                .seq
                .compare_exchange_weak(seq, seq + 1, Ordering::Acquire, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(current) => {
                    seq = current;
                    backoff.spin();
                }
            }
        }
        // Orders the odd counter before the field stores below.
        fence(Ordering::Release);
        CellWriter { cell: self, seq }
    }

    #[inline]
    fn load_fields(&self) -> Option<ProfilerContext> {
        if !self.present.load(Ordering::Relaxed) {
            return None;
        }
        Some(ProfilerContext::new(
            self.root_span_id.load(Ordering::Relaxed),
            self.span_id.load(Ordering::Relaxed),
        ))
    }
}

impl Default for ContextCell {
    fn default() -> Self {
        Self::new()
    }
}

impl CellWriter<'_> {
    #[inline]
    pub fn store(self, context: Option<ProfilerContext>) {
        let cell = self.cell;
        match context {
            Some(context) => {
                cell.root_span_id.store(context.root_span_id, Ordering::Relaxed);
                cell.span_id.store(context.span_id, Ordering::Relaxed);
                cell.present.store(true, Ordering::Relaxed);
            }
            None => cell.present.store(false, Ordering::Relaxed),
        }
    }
}

impl Drop for CellWriter<'_> {
    fn drop(&mut self) {
        self.cell.seq.store(self.seq.wrapping_add(2), Ordering::Release);
    }
}
