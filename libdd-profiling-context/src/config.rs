// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::attribute::MAX_CONTEXT_ATTRIBUTES;
use crate::error::ContextError;
use serde::{Deserialize, Serialize};

pub const DD_PROFILING_ENABLED: &str = "DD_PROFILING_ENABLED";
pub const DD_PROFILING_CONTEXT_ATTRIBUTES: &str = "DD_PROFILING_CONTEXT_ATTRIBUTES";

/// Environment parsing with the same rules as `ddcommon::config::parse_env`.
pub mod parse_env {
    use std::env;

    pub fn bool(name: &str) -> Option<bool> {
        match env::var(name).ok()?.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
            _ => Some(false),
        }
    }

    pub fn str_not_empty(name: &str) -> Option<String> {
        env::var(name).ok().filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilingContextConfig {
    /// Selects the thread-context integration when true, the no-op one
    /// otherwise.
    pub enabled: bool,
    /// Names of the custom context attributes samples may carry, such as
    /// "http.route". Order defines the attribute offsets.
    pub context_attributes: Vec<String>,
}

impl ProfilingContextConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            context_attributes: Vec::new(),
        }
    }

    pub fn with_context_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Reads `DD_PROFILING_ENABLED` and `DD_PROFILING_CONTEXT_ATTRIBUTES`.
    /// Missing variables fall back to the defaults: disabled, no attributes.
    pub fn from_env() -> Self {
        let enabled = parse_env::bool(DD_PROFILING_ENABLED).unwrap_or(false);
        let context_attributes = parse_env::str_not_empty(DD_PROFILING_CONTEXT_ATTRIBUTES)
            .map(|raw| parse_attribute_list(&raw))
            .unwrap_or_default();
        Self {
            enabled,
            context_attributes,
        }
    }

    pub fn validate(&self) -> Result<(), ContextError> {
        if self.context_attributes.len() > MAX_CONTEXT_ATTRIBUTES {
            return Err(ContextError::TooManyAttributes(self.context_attributes.len()));
        }
        for (i, name) in self.context_attributes.iter().enumerate() {
            if name.is_empty() {
                return Err(ContextError::EmptyAttributeName);
            }
            if self.context_attributes[..i].contains(name) {
                return Err(ContextError::DuplicateAttribute(name.clone()));
            }
        }
        Ok(())
    }
}

/// Splits a list such as "a, b" or "a b" into its non-empty parts.
fn parse_attribute_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
