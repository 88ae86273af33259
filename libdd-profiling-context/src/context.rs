// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Identifies which trace the current thread is working on, so that samples
/// taken on the thread can be attributed to it.
///
/// A context is never mutated once built; the propagation layer replaces the
/// whole value instead. The absence of a context is `None`, not a context
/// with zeroed ids.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ProfilerContext {
    pub root_span_id: u64,
    pub span_id: u64,
}

impl ProfilerContext {
    #[inline]
    pub const fn new(root_span_id: u64, span_id: u64) -> Self {
        Self {
            root_span_id,
            span_id,
        }
    }
}

impl From<(u64, u64)> for ProfilerContext {
    fn from((root_span_id, span_id): (u64, u64)) -> Self {
        Self::new(root_span_id, span_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_value() {
        let a = ProfilerContext::new(1, 2);
        let b: ProfilerContext = (1, 2).into();
        assert_eq!(a, b);
        assert_ne!(a, ProfilerContext::new(2, 1));
        assert_eq!(ProfilerContext::default(), ProfilerContext::new(0, 0));
    }

    #[test]
    fn serde_field_names() {
        let json = serde_json::to_string(&ProfilerContext::new(7, 9)).unwrap();
        assert_eq!(json, r#"{"root_span_id":7,"span_id":9}"#);
        let back: ProfilerContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProfilerContext::new(7, 9));
    }
}
