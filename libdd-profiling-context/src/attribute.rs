// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// How many custom attributes a thread's context can carry besides the span
/// ids.
pub const MAX_CONTEXT_ATTRIBUTES: usize = 10;

/// Handle to a named custom context attribute, such as "http.route". Values
/// are set through a [`crate::ProfilingScope`] and recorded per thread as
/// constant-encoded ids.
///
/// Attributes that weren't declared in the configuration are inert: setting
/// them does nothing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ContextAttribute {
    offset: Option<u8>,
}

impl ContextAttribute {
    pub const NOOP: ContextAttribute = ContextAttribute { offset: None };

    pub(crate) fn at(offset: usize) -> Self {
        match u8::try_from(offset) {
            Ok(offset) if (offset as usize) < MAX_CONTEXT_ATTRIBUTES => Self {
                offset: Some(offset),
            },
            _ => Self::NOOP,
        }
    }

    /// The attribute's index in a thread's attribute slots.
    #[inline]
    pub fn offset(&self) -> Option<usize> {
        self.offset.map(usize::from)
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.offset.is_none()
    }
}

impl Default for ContextAttribute {
    fn default() -> Self {
        Self::NOOP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_offsets_are_inert() {
        assert_eq!(ContextAttribute::at(0).offset(), Some(0));
        assert_eq!(
            ContextAttribute::at(MAX_CONTEXT_ATTRIBUTES - 1).offset(),
            Some(MAX_CONTEXT_ATTRIBUTES - 1)
        );
        assert!(ContextAttribute::at(MAX_CONTEXT_ATTRIBUTES).is_noop());
        assert!(ContextAttribute::at(usize::MAX).is_noop());
        assert!(ContextAttribute::default().is_noop());
    }
}
