// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crossbeam_utils::CachePadded;
use parking_lot::RwLock;

pub type SetHasher = core::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// A fixed number of independently locked shards. Each shard sits on its own
/// cache line so that writers on one shard don't slow down readers on the
/// neighboring ones.
#[derive(Debug)]
pub struct Sharded<T, const N: usize> {
    shards: [CachePadded<RwLock<T>>; N],
}

impl<T: Default, const N: usize> Sharded<T, N> {
    pub fn new() -> Self {
        const { assert!(N.is_power_of_two() && N > 1) };
        Self {
            shards: core::array::from_fn(|_| CachePadded::new(RwLock::new(T::default()))),
        }
    }
}

impl<T: Default, const N: usize> Default for Sharded<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Sharded<T, N> {
    #[inline]
    pub fn select_shard(hash: u64) -> usize {
        (hash as usize) & (N - 1)
    }

    #[inline]
    pub fn shard(&self, hash: u64) -> &RwLock<T> {
        &self.shards[Self::select_shard(hash)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &RwLock<T>> {
        self.shards.iter().map(|shard| &**shard)
    }
}
