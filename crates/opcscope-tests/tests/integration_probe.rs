// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Probe Integration Tests
//!
//! The read/write probe against the demo server address space.

use std::sync::Arc;

use parking_lot::Mutex;

use opcscope_opcua::probe::run_probe;
use opcscope_tests::prelude::*;

/// Collects console lines emitted by a probe.
#[derive(Clone, Default)]
struct Console(Arc<Mutex<Vec<String>>>);

impl Console {
    fn sink(&self) -> impl FnMut(&ProbeEvent) + Send + 'static {
        let lines = self.0.clone();
        move |event: &ProbeEvent| lines.lock().push(event.to_string())
    }

    fn lines(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

#[tokio::test]
async fn test_probe_default_sequence() {
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());
    let console = Console::default();

    let report = probe::run_scoped(mock.clone(), ProbePlan::default(), None, console.sink())
        .await
        .unwrap();

    assert_eq!(
        console.lines(),
        vec![
            "Namespace Index for 'urn:simple-server': 2",
            "v1 value: 1.0",
            "v2 value: 2",
            "v3 value: three",
            "v4 value: 4.5",
            "v4 access level: CurrentRead | CurrentWrite",
            "Writing to v4: 50.0",
            "v4 new value: 50.0",
        ]
    );
    assert_eq!(report.namespace_index, 2);
    assert_eq!(report.before, OpcUaValue::Double(4.5));
    assert_eq!(report.after, OpcUaValue::Double(50.0));
    assert!(report.write_confirmed());
    assert_eq!(mock.value_of(&NodeFixtures::v(4)), Some(OpcUaValue::Double(50.0)));
    mock.assert_released_once();
}

#[tokio::test]
async fn test_probe_missing_namespace_stops_before_reads() {
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());
    let plan = ProbePlanBuilder::new().namespace_uri("urn:other-server").build();

    let err = probe::run_scoped(mock.clone(), plan, None, |_: &ProbeEvent| {})
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OpcUaError::Operation(opcscope_opcua::OperationError::NamespaceNotFound { .. })
    ));
    // Only the NamespaceArray read happened.
    assert_eq!(mock.read_count(), 1);
    assert_eq!(mock.write_count(), 0);
    mock.assert_released_once();
}

#[tokio::test]
async fn test_probe_unknown_node_fails_fast() {
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());
    let plan = ProbePlanBuilder::new()
        .read_nodes([NodeFixtures::v(1), NodeFixtures::v(9), NodeFixtures::v(4)])
        .build();
    let console = Console::default();

    let err = probe::run_scoped(mock.clone(), plan, None, console.sink())
        .await
        .unwrap_err();

    assert_error_category(&err, "operation");
    assert_eq!(console.lines().len(), 2, "namespace and v1 only");
    assert_eq!(mock.write_count(), 0);
    mock.assert_released_once();
}

#[tokio::test]
async fn test_probe_rejected_write() {
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());
    mock.reject_writes_to(NodeFixtures::v(4), BAD_NOT_WRITABLE);

    let err = probe::run_scoped(mock.clone(), ProbePlan::default(), None, |_: &ProbeEvent| {})
        .await
        .unwrap_err();

    assert_error_category(&err, "operation");
    assert_eq!(mock.write_count(), 1);
    assert_eq!(mock.value_of(&NodeFixtures::v(4)), Some(OpcUaValue::Double(4.5)));
    mock.assert_released_once();
}

#[tokio::test]
async fn test_probe_read_only_target_still_attempts_write() {
    let mock = AddressSpaceBuilder::new()
        .namespaces([OPC_FOUNDATION_URI, SIMPLE_SERVER_URI])
        .double(NodeId::string(1, "ro"), 7.0)
        .access(NodeId::string(1, "ro"), AccessLevel::CURRENT_READ)
        .into_transport();
    mock.reject_writes_to(NodeId::string(1, "ro"), BAD_NOT_WRITABLE);
    let plan = ProbePlanBuilder::new()
        .read_nodes([NodeId::string(1, "ro")])
        .target(NodeId::string(1, "ro"))
        .build();

    let err = probe::run_scoped(mock.clone(), plan, None, |_: &ProbeEvent| {})
        .await
        .unwrap_err();

    assert_error_category(&err, "operation");
    assert_eq!(mock.write_count(), 1);
}

#[tokio::test]
async fn test_probe_target_outside_read_list() {
    let mock = MockTransport::connected(AddressSpaceFixtures::simple_server());
    let plan = ProbePlanBuilder::new()
        .read_nodes([NodeFixtures::v(1)])
        .write_double(-3.25)
        .build();
    let mut lines = Vec::new();

    let report = run_probe(&mock, &plan, |e: &ProbeEvent| lines.push(e.to_string()))
        .await
        .unwrap();

    assert_eq!(report.reads.len(), 1);
    assert_eq!(report.before, OpcUaValue::Double(4.5));
    assert_eq!(report.after, OpcUaValue::Double(-3.25));
    assert_eq!(lines[3], "v4 value: 4.5");
    assert_eq!(lines.last().map(String::as_str), Some("v4 new value: -3.25"));
}

#[tokio::test]
async fn test_probe_connection_failure_produces_no_output() {
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());
    mock.fail_connection(true);
    let console = Console::default();

    let err = probe::run_scoped(mock.clone(), ProbePlan::default(), None, console.sink())
        .await
        .unwrap_err();

    assert_error_category(&err, "connection");
    assert!(console.lines().is_empty());
    mock.assert_no_data_access();
    assert_eq!(mock.disconnect_count(), 0);
}

#[tokio::test]
async fn test_probe_report_serializes() {
    let mock = MockTransport::new(AddressSpaceFixtures::simple_server());

    let report = probe::run_scoped(mock, ProbePlan::default(), None, |_: &ProbeEvent| {})
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["namespace_uri"], "urn:simple-server");
    assert_eq!(json["namespace_index"], 2);
    assert_eq!(json["after"], 50.0);
    assert_eq!(json["reads"].as_array().unwrap().len(), 4);
}
