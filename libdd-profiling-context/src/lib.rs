// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Propagates a profiler context (root span id, span id) across thread
//! boundaries so that profiling samples can be correlated with traces, and
//! encodes recurring string constants into small integer ids.
//!
//! Callers hold an `Arc<dyn ProfilingContextIntegration>`. When profiling is
//! disabled that is the [`NoopIntegration`], so disabling costs a vtable call
//! rather than a branch at every call site.

pub mod attribute;
pub mod config;
pub mod context;
pub mod encoding;
pub mod error;
pub mod integration;
pub mod scope;
mod sharded;
pub mod thread;

pub use attribute::{ContextAttribute, MAX_CONTEXT_ATTRIBUTES};
pub use config::ProfilingContextConfig;
pub use context::ProfilerContext;
pub use encoding::{ConstantEncoder, EncodedId, Namespace};
pub use error::ContextError;
pub use integration::{
    from_config, NoopIntegration, ProfilingContextIntegration, ThreadContextIntegration,
};
pub use scope::ProfilingScope;
pub use thread::ThreadContextHandle;
