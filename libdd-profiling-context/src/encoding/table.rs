// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::EncodedId;
use crate::sharded::{SetHasher as Hasher, Sharded};
use hashbrown::{HashMap, HashTable};
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tracing::warn;

pub const N_SHARDS: usize = 16;

/// The first id handed out by a table. Zero is the sentinel.
pub const FIRST_ID: u32 = 1;

type Forward = HashTable<(Arc<str>, EncodedId)>;
type Reverse = HashMap<u32, Arc<str>, Hasher>;

/// Maps strings to ids assigned in arrival order, starting at [`FIRST_ID`].
/// The table only grows; an id is never reassigned.
///
/// Lookups of known strings only take a shard read lock. Inserting a new
/// string takes the write lock of its shard, so two threads racing on the
/// same string converge on a single id while inserts of unrelated strings
/// usually land on different shards.
pub struct EncodingTable {
    forward: Sharded<Forward, N_SHARDS>,
    /// Sharded by id, for symbolization.
    reverse: Sharded<Reverse, N_SHARDS>,
    next_id: AtomicU32,
    exhausted: AtomicBool,
    empty: Arc<str>,
}

impl Default for EncodingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodingTable {
    pub fn new() -> Self {
        Self::with_next_id(FIRST_ID)
    }

    fn with_next_id(next_id: u32) -> Self {
        Self {
            forward: Sharded::new(),
            reverse: Sharded::new(),
            next_id: AtomicU32::new(next_id),
            exhausted: AtomicBool::new(false),
            empty: Arc::from(""),
        }
    }

    /// Returns the id of `text`, assigning the next one if `text` hasn't been
    /// seen yet. The empty string is never stored and always encodes to
    /// [`EncodedId::UNENCODED`], as does any string arriving after the id
    /// space is exhausted.
    pub fn encode(&self, text: &str) -> EncodedId {
        if text.is_empty() {
            return EncodedId::UNENCODED;
        }

        let hash = Hasher::default().hash_one(text);
        let lock = self.forward.shard(hash);

        let read_len = {
            let guard = lock.read();
            if let Some(id) = find(&guard, hash, text) {
                return id;
            }
            guard.len()
        };

        let mut guard = lock.write();
        if guard.len() != read_len {
            // Someone inserted into this shard between the two locks.
            if let Some(id) = find(&guard, hash, text) {
                return id;
            }
        }

        let Some(id) = self.reserve_id() else {
            return EncodedId::UNENCODED;
        };
        let text: Arc<str> = Arc::from(text);
        self.reverse
            .shard(u64::from(id.get()))
            .write()
            .insert(id.get(), text.clone());
        guard.insert_unique(hash, (text, id), |(t, _)| Hasher::default().hash_one(&**t));
        id
    }

    /// Returns the id of `text` without inserting it.
    pub fn find(&self, text: &str) -> Option<EncodedId> {
        if text.is_empty() {
            return Some(EncodedId::UNENCODED);
        }
        let hash = Hasher::default().hash_one(text);
        let guard = self.forward.shard(hash).read();
        find(&guard, hash, text)
    }

    /// Returns the string `id` was assigned to. The sentinel resolves to the
    /// empty string; ids this table never issued resolve to `None`.
    pub fn resolve(&self, id: EncodedId) -> Option<Arc<str>> {
        if id.is_unencoded() {
            return Some(self.empty.clone());
        }
        let raw = id.get();
        self.reverse.shard(u64::from(raw)).read().get(&raw).cloned()
    }

    /// Number of ids issued so far.
    pub fn len(&self) -> usize {
        let next = self.next_id.load(Ordering::Relaxed);
        // Once exhausted, `next_id` is pinned at u32::MAX which was never
        // handed out.
        (next - FIRST_ID) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries ordered by id, for exporting a symbol table alongside
    /// recorded samples.
    pub fn entries(&self) -> Vec<(EncodedId, Arc<str>)> {
        let mut entries: Vec<(EncodedId, Arc<str>)> = self
            .reverse
            .iter()
            .flat_map(|shard| {
                shard
                    .read()
                    .iter()
                    .map(|(id, text)| (EncodedId(*id), text.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    fn reserve_id(&self) -> Option<EncodedId> {
        match self
            .next_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
        {
            Ok(id) => Some(EncodedId(id)),
            Err(_) => {
                if !self.exhausted.swap(true, Ordering::Relaxed) {
                    warn!("encoding table exhausted its id space, new strings will not be encoded");
                }
                None
            }
        }
    }
}

#[inline]
fn find(table: &Forward, hash: u64, text: &str) -> Option<EncodedId> {
    table.find(hash, |(t, _)| &**t == text).map(|(_, id)| *id)
}
