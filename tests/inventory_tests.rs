//! Local inventory builder tests against a scripted engine.

mod common;

use common::{managed_container, with_port_binding, FakeEngine};
use fleetctl::error::FleetctlError;
use fleetctl::inventory::{self, ApplicationStatus, ContainerSize, ContainerStatus};

const XS_CPU: i64 = 256;
const XS_MEM: i64 = 268_435_456;
const S_MEM: i64 = 536_870_912;

#[test]
fn test_build_groups_by_app_name() {
    let engine = FakeEngine::new()
        .with(managed_container("local-web-1", "aaa1", XS_CPU, XS_MEM, true, 0))
        .with(managed_container("local-web-2", "aaa2", XS_CPU, XS_MEM, true, 0))
        .with(managed_container("local-db-1", "bbb1", XS_CPU, XS_MEM, true, 0));

    let apps = inventory::build_at(&engine, common::fixed_instant()).unwrap();
    assert_eq!(apps.len(), 2);
    assert_eq!(apps["web"].containers.len(), 2);
    assert_eq!(apps["db"].containers.len(), 1);
    assert_eq!(apps["web"].size, ContainerSize::XS);
    assert_eq!(apps["web"].image, "acme/hello-world:latest");
}

#[test]
fn test_build_skips_foreign_and_mismatched_containers() {
    let engine = FakeEngine::new()
        .with(managed_container("local-web-1", "aaa1", XS_CPU, XS_MEM, true, 0))
        // not following the naming convention
        .with(managed_container("registryproxy", "ccc1", XS_CPU, XS_MEM, true, 0))
        // cpu says XS, memory says S
        .with(managed_container("local-bad-1", "ddd1", XS_CPU, S_MEM, true, 0))
        // cpu shares off the size table entirely
        .with(managed_container("local-odd-1", "eee1", 300, XS_MEM, true, 0));

    let apps = inventory::build_at(&engine, common::fixed_instant()).unwrap();
    assert_eq!(apps.len(), 1);
    assert!(apps.contains_key("web"));
}

#[test]
fn test_container_status_derivation() {
    let engine = FakeEngine::new()
        .with(managed_container("local-web-1", "aaa1", XS_CPU, XS_MEM, true, 0))
        .with(managed_container("local-web-2", "aaa2", XS_CPU, XS_MEM, false, 0))
        .with(managed_container("local-web-3", "aaa3", XS_CPU, XS_MEM, false, 137));

    let apps = inventory::build_at(&engine, common::fixed_instant()).unwrap();
    let web = &apps["web"];
    assert_eq!(web.containers[0].status, ContainerStatus::Running);
    assert_eq!(web.containers[1].status, ContainerStatus::Stopped);
    assert_eq!(web.containers[2].status, ContainerStatus::StoppedWithErrors);
}

#[test]
fn test_aggregate_status_cases() {
    let now = common::fixed_instant();

    // 2 running -> Running
    let engine = FakeEngine::new()
        .with(managed_container("local-a-1", "a1", XS_CPU, XS_MEM, true, 0))
        .with(managed_container("local-a-2", "a2", XS_CPU, XS_MEM, true, 0));
    let apps = inventory::build_at(&engine, now).unwrap();
    assert_eq!(apps["a"].status, ApplicationStatus::Running);

    // 1 running + 1 stopped -> Partly running
    let engine = FakeEngine::new()
        .with(managed_container("local-b-1", "b1", XS_CPU, XS_MEM, true, 0))
        .with(managed_container("local-b-2", "b2", XS_CPU, XS_MEM, false, 0));
    let apps = inventory::build_at(&engine, now).unwrap();
    assert_eq!(apps["b"].status, ApplicationStatus::PartlyRunning);

    // 2 stopped-with-errors -> Stopped with errors
    let engine = FakeEngine::new()
        .with(managed_container("local-c-1", "c1", XS_CPU, XS_MEM, false, 1))
        .with(managed_container("local-c-2", "c2", XS_CPU, XS_MEM, false, 2));
    let apps = inventory::build_at(&engine, now).unwrap();
    assert_eq!(apps["c"].status, ApplicationStatus::StoppedWithErrors);

    // 1 stopped + 1 stopped-with-errors -> Stopped
    let engine = FakeEngine::new()
        .with(managed_container("local-d-1", "d1", XS_CPU, XS_MEM, false, 0))
        .with(managed_container("local-d-2", "d2", XS_CPU, XS_MEM, false, 1));
    let apps = inventory::build_at(&engine, now).unwrap();
    assert_eq!(apps["d"].status, ApplicationStatus::Stopped);
}

#[test]
fn test_deployed_time_is_earliest_capped_at_now() {
    let now = common::fixed_instant();

    let older = managed_container("local-web-1", "aaa1", XS_CPU, XS_MEM, true, 0);
    let mut newer = managed_container("local-web-2", "aaa2", XS_CPU, XS_MEM, true, 0);
    newer.created = now - chrono::Duration::minutes(5);

    let engine = FakeEngine::new().with(older.clone()).with(newer);
    let apps = inventory::build_at(&engine, now).unwrap();
    assert_eq!(apps["web"].deployed, older.created);

    // A creation timestamp after "now" (clock skew) gets capped.
    let mut future = managed_container("local-skew-1", "fff1", XS_CPU, XS_MEM, true, 0);
    future.created = now + chrono::Duration::hours(1);
    let engine = FakeEngine::new().with(future);
    let apps = inventory::build_at(&engine, now).unwrap();
    assert_eq!(apps["skew"].deployed, now);
}

#[test]
fn test_build_is_idempotent_for_fixed_now() {
    let now = common::fixed_instant();
    let engine = FakeEngine::new()
        .with(managed_container("local-web-1", "aaa1", XS_CPU, XS_MEM, true, 0))
        .with(managed_container("local-db-1", "bbb1", XS_CPU, XS_MEM, false, 1));

    let first = inventory::build_at(&engine, now).unwrap();
    let second = inventory::build_at(&engine, now).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_port_display_string() {
    let details = with_port_binding(
        managed_container("local-web-1", "aaa1", XS_CPU, XS_MEM, true, 0),
        "80/tcp",
        "32768",
    );
    let engine = FakeEngine::new().with(details);
    let apps = inventory::build_at(&engine, common::fixed_instant()).unwrap();
    assert_eq!(apps["web"].containers[0].ports, "0.0.0.0:32768->80/tcp");
}

#[test]
fn test_engine_unreachable_is_fatal() {
    let engine = FakeEngine::unreachable();
    match inventory::build_at(&engine, common::fixed_instant()) {
        Err(FleetctlError::EngineUnavailable(_)) => {}
        other => panic!("expected EngineUnavailable, got {:?}", other.err()),
    }
}

#[test]
fn test_single_bad_inspection_aborts_the_build() {
    let engine = FakeEngine::new()
        .with(managed_container("local-web-1", "aaa1", XS_CPU, XS_MEM, true, 0))
        .with_phantom_id("gone");
    match inventory::build_at(&engine, common::fixed_instant()) {
        Err(FleetctlError::Engine(_)) => {}
        other => panic!("expected Engine error, got {:?}", other.err()),
    }
}
