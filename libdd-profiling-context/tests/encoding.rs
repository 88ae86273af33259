// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use libdd_profiling_context::{
    EncodedId, Namespace, ProfilingContextIntegration, ThreadContextIntegration,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = if cfg!(miri) { 2 } else { 8 };
const NAMES: usize = if cfg!(miri) { 8 } else { 256 };

#[test]
fn threads_racing_on_the_same_names_agree() {
    let integration: Arc<dyn ProfilingContextIntegration> =
        Arc::new(ThreadContextIntegration::new());
    let barrier = Barrier::new(THREADS);

    let per_thread: Vec<HashMap<String, EncodedId>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let integration = integration.clone();
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    // Each thread walks the names from a different starting point.
                    (0..NAMES)
                        .map(|i| format!("resource-{}", (i + t * 31) % NAMES))
                        .map(|name| {
                            let id = integration.encode_resource_name(&name);
                            (name, id)
                        })
                        .collect::<HashMap<_, _>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = &per_thread[0];
    assert_eq!(first.len(), NAMES);
    for other in &per_thread[1..] {
        assert_eq!(first, other);
    }
    let ids: HashSet<u32> = first.values().map(|id| id.get()).collect();
    assert_eq!(ids.len(), NAMES);
    assert_eq!(ids.iter().min(), Some(&1));
    assert_eq!(ids.iter().max(), Some(&(NAMES as u32)));
}

#[test]
fn ids_resolve_back_within_their_namespace() {
    let integration = ThreadContextIntegration::new();
    let op = integration.encode_operation_name("servlet.request");
    let resource = integration.encode_resource_name("GET /users/{id}");
    let label = integration.encode("us-east-1");

    assert_eq!(
        integration.resolve(Namespace::OperationName, op).as_deref(),
        Some("servlet.request")
    );
    assert_eq!(
        integration.resolve(Namespace::ResourceName, resource).as_deref(),
        Some("GET /users/{id}")
    );
    assert_eq!(
        integration.resolve(Namespace::Constant, label).as_deref(),
        Some("us-east-1")
    );
    // Each namespace numbers its strings independently.
    assert_eq!(op, resource);
    assert_eq!(op, label);
    assert_eq!(integration.resolve(Namespace::Constant, EncodedId::from(2)), None);
}

#[test]
fn empty_strings_are_never_stored() {
    let integration = ThreadContextIntegration::new();
    for namespace in Namespace::ALL {
        let id = integration.encoder().encode_in(namespace, "");
        assert!(id.is_unencoded());
        assert_eq!(integration.resolve(namespace, id).as_deref(), Some(""));
        assert_eq!(integration.encoder().len(namespace), 0);
    }
}

#[test]
fn separate_integrations_keep_separate_tables() {
    let a = ThreadContextIntegration::new();
    let b = ThreadContextIntegration::new();
    a.encode("first");
    let in_a = a.encode("second");
    let in_b = b.encode("second");
    assert_eq!(in_a.get(), 2);
    assert_eq!(in_b.get(), 1);
    assert_eq!(b.resolve(Namespace::Constant, in_a), None);
}
