// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::attribute::MAX_CONTEXT_ATTRIBUTES;

/// Errors from building an integration out of its configuration.
///
/// Nothing on the hot path returns these. Once an integration exists, every
/// operation either succeeds or is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("too many context attributes: {0} declared, at most {MAX_CONTEXT_ATTRIBUTES} allowed")]
    TooManyAttributes(usize),
    #[error("context attribute names must not be empty")]
    EmptyAttributeName,
    #[error("context attribute {0:?} is declared more than once")]
    DuplicateAttribute(String),
}
