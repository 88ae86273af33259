// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod table;

pub use table::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A small integer standing in for a string in sample records. Ids are only
/// meaningful within the [`Namespace`] that issued them.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedId(u32);

impl EncodedId {
    /// The "not encoded / not applicable" id. Always a valid answer.
    pub const UNENCODED: EncodedId = EncodedId(0);

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_unencoded(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for EncodedId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<EncodedId> for u32 {
    fn from(id: EncodedId) -> Self {
        id.0
    }
}

impl fmt::Display for EncodedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Namespace {
    /// Arbitrary labels, including custom context attribute values.
    Constant,
    OperationName,
    ResourceName,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [
        Namespace::Constant,
        Namespace::OperationName,
        Namespace::ResourceName,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// One [`EncodingTable`] per [`Namespace`]. The same text encoded in two
/// namespaces gets two unrelated ids.
#[derive(Default)]
pub struct ConstantEncoder {
    tables: [EncodingTable; Namespace::ALL.len()],
}

impl ConstantEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn table(&self, namespace: Namespace) -> &EncodingTable {
        &self.tables[namespace.index()]
    }

    #[inline]
    pub fn encode_in(&self, namespace: Namespace, text: &str) -> EncodedId {
        self.table(namespace).encode(text)
    }

    #[inline]
    pub fn encode(&self, constant: &str) -> EncodedId {
        self.encode_in(Namespace::Constant, constant)
    }

    #[inline]
    pub fn encode_operation_name(&self, name: &str) -> EncodedId {
        self.encode_in(Namespace::OperationName, name)
    }

    #[inline]
    pub fn encode_resource_name(&self, name: &str) -> EncodedId {
        self.encode_in(Namespace::ResourceName, name)
    }

    pub fn resolve(&self, namespace: Namespace, id: EncodedId) -> Option<Arc<str>> {
        self.table(namespace).resolve(id)
    }

    pub fn len(&self, namespace: Namespace) -> usize {
        self.table(namespace).len()
    }
}
