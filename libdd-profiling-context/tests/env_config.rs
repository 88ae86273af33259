// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tests which mutate the process environment. They live in their own test
//! binary and run serially, so no other test reads the environment while
//! it changes.

use libdd_profiling_context::config::{DD_PROFILING_CONTEXT_ATTRIBUTES, DD_PROFILING_ENABLED};
use libdd_profiling_context::{
    from_config, ProfilingContextConfig, ProfilingContextIntegration, ThreadContextIntegration,
};
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn from_env_reads_enabled_and_attributes() {
    env::set_var(DD_PROFILING_ENABLED, "true");
    env::set_var(DD_PROFILING_CONTEXT_ATTRIBUTES, "http.route, tenant");
    let config = ProfilingContextConfig::from_env();
    env::remove_var(DD_PROFILING_ENABLED);
    env::remove_var(DD_PROFILING_CONTEXT_ATTRIBUTES);

    assert!(config.enabled);
    assert_eq!(config.context_attributes, vec!["http.route", "tenant"]);
    assert_eq!(from_config(&config).name(), ThreadContextIntegration::NAME);
}

#[test]
#[serial]
fn from_env_defaults_to_disabled() {
    env::set_var(DD_PROFILING_ENABLED, "no");
    env::remove_var(DD_PROFILING_CONTEXT_ATTRIBUTES);
    let config = ProfilingContextConfig::from_env();
    env::remove_var(DD_PROFILING_ENABLED);
    assert_eq!(config, ProfilingContextConfig::default());

    let config = ProfilingContextConfig::from_env();
    assert_eq!(config, ProfilingContextConfig::default());
}

#[test]
#[serial]
fn empty_attribute_list_is_ignored() {
    env::set_var(DD_PROFILING_ENABLED, "1");
    env::set_var(DD_PROFILING_CONTEXT_ATTRIBUTES, "");
    let config = ProfilingContextConfig::from_env();
    env::remove_var(DD_PROFILING_ENABLED);
    env::remove_var(DD_PROFILING_CONTEXT_ATTRIBUTES);
    assert_eq!(config, ProfilingContextConfig::enabled());
}
