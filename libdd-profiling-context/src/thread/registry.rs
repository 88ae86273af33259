// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::slot::ThreadContextHandle;
use crate::sharded::{SetHasher as Hasher, Sharded};
use hashbrown::HashMap;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread::ThreadId;

const N_SHARDS: usize = 8;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// The threads currently attached to one integration, keyed by thread. This
/// is what a sampler walks to find the context of each thread it samples.
///
/// Attach and detach lock a single shard, so threads attaching concurrently
/// rarely contend.
pub struct AttachedThreads {
    id: u64,
    threads: Sharded<HashMap<ThreadId, ThreadContextHandle, Hasher>, N_SHARDS>,
    count: AtomicUsize,
}

impl Default for AttachedThreads {
    fn default() -> Self {
        Self::new()
    }
}

impl AttachedThreads {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            threads: Sharded::new(),
            count: AtomicUsize::new(0),
        }
    }

    /// Process-unique id of this registry.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns false if `thread` was already registered.
    pub fn insert(&self, thread: ThreadId, handle: ThreadContextHandle) -> bool {
        let mut shard = self.threads.shard(Hasher::default().hash_one(thread)).write();
        if shard.contains_key(&thread) {
            return false;
        }
        shard.insert(thread, handle);
        self.count.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Returns false if `thread` wasn't registered.
    pub fn remove(&self, thread: ThreadId) -> bool {
        let mut shard = self.threads.shard(Hasher::default().hash_one(thread)).write();
        if shard.remove(&thread).is_none() {
            return false;
        }
        self.count.fetch_sub(1, Ordering::Relaxed);
        true
    }

    pub fn get(&self, thread: ThreadId) -> Option<ThreadContextHandle> {
        let shard = self.threads.shard(Hasher::default().hash_one(thread)).read();
        shard.get(&thread).cloned()
    }

    pub fn contains(&self, thread: ThreadId) -> bool {
        let shard = self.threads.shard(Hasher::default().hash_one(thread)).read();
        shard.contains_key(&thread)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A point-in-time copy of the attached threads and their handles.
    pub fn snapshot(&self) -> Vec<(ThreadId, ThreadContextHandle)> {
        let mut threads = Vec::with_capacity(self.len());
        for shard in self.threads.iter() {
            let shard = shard.read();
            threads.extend(shard.iter().map(|(id, handle)| (*id, handle.clone())));
        }
        threads
    }
}
