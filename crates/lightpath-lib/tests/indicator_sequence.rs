//! Integration tests: end-to-end indicator sequences using MockBackend.
//!
//! These tests drive the public API the way the CLI does: detect the mode,
//! build a merged list, refresh or drive its states, and release it,
//! verifying the exact order of backend calls.

use lightpath_lib::backend::mock::MockBackend;
use lightpath_lib::location;
use lightpath_lib::sync::SyncSummary;
use lightpath_lib::{Dispatcher, IndicatorError, IndicatorKind, LedState, MergePolicy, OperatingMode};

/// Helper: a light-path system with three platform fault indicators, a
/// platform identify tree, and two enclosure drive bays.
fn light_path_system() -> Dispatcher<MockBackend, MockBackend> {
    let p = MockBackend::platform();
    p.add_indicator(IndicatorKind::Fault, "U78", LedState::Off);
    p.add_indicator(IndicatorKind::Fault, "U78-P1-C1", LedState::Off);
    p.add_indicator(IndicatorKind::Fault, "U78-P1-C2", LedState::On);
    p.add_indicator(IndicatorKind::Identify, "U78", LedState::On);
    p.add_indicator(IndicatorKind::Identify, "U78-P1-C1", LedState::On);
    p.add_indicator(IndicatorKind::Identify, "U78-P1-C2", LedState::On);

    let e = MockBackend::enclosure();
    e.add_indicator(IndicatorKind::Fault, "U78-P2-D1", LedState::Off);
    e.add_indicator(IndicatorKind::Identify, "U78-P2-D1", LedState::On);
    e.add_indicator(IndicatorKind::Identify, "U78-P2-D2", LedState::Off);
    Dispatcher::new(p, e)
}

fn codes(list: &lightpath_lib::IndicatorList) -> Vec<&str> {
    list.iter().map(|r| r.code()).collect()
}

// ── Test: detect → build → read ──

#[test]
fn detect_build_and_read_fault_list() {
    let d = light_path_system();
    let mode = d.detect_operating_mode().unwrap();
    assert_eq!(mode, OperatingMode::LightPath);

    let mut list = d.build_list(IndicatorKind::Fault, mode).unwrap();
    assert_eq!(codes(&list), ["U78", "U78-P1-C1", "U78-P1-C2", "U78-P2-D1"]);

    let summary = d.read_all_states(IndicatorKind::Fault, &mut list);
    assert_eq!(summary.read, 4);
    let states: Vec<Option<LedState>> = list.iter().map(|r| r.state).collect();
    assert_eq!(
        states,
        [
            Some(LedState::Off),
            Some(LedState::Off),
            Some(LedState::On),
            Some(LedState::Off)
        ]
    );
}

#[test]
fn guiding_light_fault_list_skips_enclosure() {
    let p = MockBackend::platform();
    p.add_indicator(IndicatorKind::Fault, "U78", LedState::Off);
    p.add_indicator(IndicatorKind::Identify, "U78", LedState::Off);
    let e = MockBackend::enclosure();
    e.add_indicator(IndicatorKind::Fault, "U78-P2-D1", LedState::Off);
    e.add_indicator(IndicatorKind::Identify, "U78-P2-D1", LedState::Off);
    let d = Dispatcher::new(p, e);

    let mode = d.detect_operating_mode().unwrap();
    assert_eq!(mode, OperatingMode::GuidingLight);

    let faults = d.build_list(IndicatorKind::Fault, mode).unwrap();
    assert_eq!(codes(&faults), ["U78"]);
    assert!(d.enclosure().unwrap().queries.borrow().is_empty());

    // Identify lists always consult the enclosure.
    let identify = d.build_list(IndicatorKind::Identify, mode).unwrap();
    assert_eq!(codes(&identify), ["U78", "U78-P2-D1"]);
    assert_eq!(
        *d.enclosure().unwrap().queries.borrow(),
        [IndicatorKind::Identify]
    );
}

// ── Test: bulk identify off across both backends ──

#[test]
fn identify_off_sequence_across_backends() {
    let d = light_path_system();
    let list = d
        .build_list(IndicatorKind::Identify, OperatingMode::LightPath)
        .unwrap();

    let summary = d.write_all_states(IndicatorKind::Identify, &list, LedState::Off);

    let platform_writes: Vec<String> = d
        .platform()
        .writes
        .borrow()
        .iter()
        .map(|(c, _)| c.clone())
        .collect();
    assert_eq!(platform_writes, ["U78", "U78-P1-C1", "U78-P1-C2", "U78"]);
    // D2 was already off: skipped.
    assert_eq!(
        *d.enclosure().unwrap().writes.borrow(),
        [("U78-P2-D1".to_string(), LedState::Off)]
    );
    assert_eq!(
        summary,
        SyncSummary {
            read: 5,
            read_failed: 0,
            written: 5,
            skipped: 1,
            write_failed: 0,
        }
    );
}

#[test]
fn partial_read_failure_leaves_unknown_and_continues() {
    let d = light_path_system();
    let mut list = d
        .build_list(IndicatorKind::Identify, OperatingMode::LightPath)
        .unwrap();
    d.platform()
        .fail_read
        .borrow_mut()
        .insert("U78-P1-C1".into());

    d.read_all_states(IndicatorKind::Identify, &mut list);

    assert_eq!(list.find_by_code("U78").unwrap().state, Some(LedState::On));
    assert_eq!(list.find_by_code("U78-P1-C1").unwrap().state, None);
    assert_eq!(
        list.find_by_code("U78-P2-D2").unwrap().state,
        Some(LedState::Off)
    );
}

// ── Test: merge policy ──

#[test]
fn enclosure_failure_best_effort_returns_platform_list() {
    let d = light_path_system();
    d.enclosure().unwrap().fail_query.set(Some(-5));
    let list = d
        .build_list(IndicatorKind::Identify, OperatingMode::LightPath)
        .unwrap();
    assert_eq!(codes(&list), ["U78", "U78-P1-C1", "U78-P1-C2"]);
}

#[test]
fn enclosure_failure_strict_is_an_error() {
    let d = light_path_system().with_merge_policy(MergePolicy::Strict);
    d.enclosure().unwrap().fail_query.set(Some(-5));
    let err = d
        .build_list(IndicatorKind::Identify, OperatingMode::LightPath)
        .unwrap_err();
    assert_eq!(err.code(), -5);
}

// ── Test: fallback search then write ──

#[test]
fn fallback_search_writes_nearest_ancestor() {
    let d = light_path_system();
    let list = d
        .build_list(IndicatorKind::Identify, OperatingMode::LightPath)
        .unwrap();

    let target = location::find_with_fallback(&list, "U78-P1-C2-E4").unwrap();
    assert_eq!(target.code(), "U78-P1-C2");
    d.write_state(IndicatorKind::Identify, target, LedState::Off)
        .unwrap();

    assert_eq!(
        d.platform()
            .state_of(IndicatorKind::Identify, "U78-P1-C2"),
        Some(LedState::Off)
    );
}

// ── Test: check-log ──

#[test]
fn check_log_targets_first_platform_fault() {
    let d = light_path_system();
    d.enable_check_log().unwrap();
    assert_eq!(
        *d.platform().writes.borrow(),
        [("U78".to_string(), LedState::On)]
    );
    assert!(d.enclosure().unwrap().writes.borrow().is_empty());
}

#[test]
fn empty_platform_has_no_mode_and_no_check_log() {
    let d = Dispatcher::new(MockBackend::platform(), MockBackend::enclosure());
    assert!(matches!(
        d.detect_operating_mode(),
        Err(IndicatorError::ModeUndetermined)
    ));
    assert!(matches!(
        d.enable_check_log(),
        Err(IndicatorError::NoCheckLogIndicator)
    ));
}

// ── Test: release ──

#[test]
fn release_frees_every_issued_record() {
    let d = light_path_system();
    let list = d
        .build_list(IndicatorKind::Identify, OperatingMode::LightPath)
        .unwrap();
    assert_eq!(d.platform().outstanding(), 3);
    assert_eq!(d.enclosure().unwrap().outstanding(), 2);

    assert_eq!(list.release(), 5);
    assert_eq!(d.platform().outstanding(), 0);
    assert_eq!(d.enclosure().unwrap().outstanding(), 0);
}

#[test]
fn dropping_a_list_frees_every_record() {
    let d = light_path_system();
    {
        let mut list = d
            .build_list(IndicatorKind::Identify, OperatingMode::LightPath)
            .unwrap();
        d.read_all_states(IndicatorKind::Identify, &mut list);
        assert_eq!(d.platform().outstanding(), 3);
    }
    assert_eq!(d.platform().outstanding(), 0);
    assert_eq!(d.enclosure().unwrap().outstanding(), 0);
}

#[test]
fn temporary_lists_are_freed_by_mode_detection_and_check_log() {
    let d = light_path_system();
    d.detect_operating_mode().unwrap();
    d.enable_check_log().unwrap();
    assert_eq!(d.platform().issued.get(), 6);
    assert_eq!(d.platform().outstanding(), 0);
}

#[test]
fn platform_only_dispatcher_full_cycle() {
    let p = MockBackend::platform();
    p.add_indicator(IndicatorKind::Fault, "U78", LedState::Off);
    p.add_indicator(IndicatorKind::Fault, "U78-P1", LedState::On);
    let d = Dispatcher::platform_only(p);

    let mode = d.detect_operating_mode().unwrap();
    let list = d.build_list(IndicatorKind::Fault, mode).unwrap();
    d.write_all_states(IndicatorKind::Fault, &list, LedState::Off);

    assert_eq!(d.platform().state_of(IndicatorKind::Fault, "U78-P1"), Some(LedState::Off));
    assert!(d.enclosure().is_none());
    assert_eq!(list.release(), 2);
    assert_eq!(d.platform().outstanding(), 0);
}
