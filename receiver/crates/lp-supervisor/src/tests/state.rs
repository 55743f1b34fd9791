use crate::{ErrorInfo, ExitInfo, FailureReason, SupervisorState, Termination};

use googletest::assert_that;
use googletest::prelude::eq;

fn stopped(termination: Termination) -> SupervisorState {
    SupervisorState::Stopped(ExitInfo::new(Some(0), None, termination))
}

fn failed() -> SupervisorState {
    SupervisorState::Failed(ErrorInfo::new(
        FailureReason::ExecutableNotFound,
        "No such file or directory (os error 2)",
    ))
}

fn all_states() -> Vec<SupervisorState> {
    vec![
        SupervisorState::Idle,
        SupervisorState::Starting,
        SupervisorState::Running { pid: 42 },
        SupervisorState::Stopping,
        stopped(Termination::Normal),
        failed(),
    ]
}

#[test]
fn test_legal_transitions() {
    let running = SupervisorState::Running { pid: 42 };

    assert!(SupervisorState::Idle.can_transition_to(&SupervisorState::Starting));
    assert!(SupervisorState::Starting.can_transition_to(&running));
    assert!(SupervisorState::Starting.can_transition_to(&failed()));
    assert!(running.can_transition_to(&SupervisorState::Stopping));
    assert!(running.can_transition_to(&stopped(Termination::Crashed)));
    assert!(SupervisorState::Stopping.can_transition_to(&stopped(Termination::Forced)));
    assert!(stopped(Termination::Graceful).can_transition_to(&SupervisorState::Starting));
    assert!(failed().can_transition_to(&SupervisorState::Starting));
}

#[test]
fn test_illegal_transitions() {
    let running = SupervisorState::Running { pid: 42 };

    assert!(!SupervisorState::Idle.can_transition_to(&running));
    assert!(!SupervisorState::Idle.can_transition_to(&SupervisorState::Stopping));
    assert!(!SupervisorState::Starting.can_transition_to(&SupervisorState::Stopping));
    assert!(!SupervisorState::Stopping.can_transition_to(&SupervisorState::Starting));
    assert!(!running.can_transition_to(&SupervisorState::Starting));
    assert!(!stopped(Termination::Normal).can_transition_to(&running));
    assert!(!failed().can_transition_to(&stopped(Termination::Normal)));
}

#[test]
fn test_no_state_transitions_to_itself() {
    for state in all_states() {
        assert!(
            !state.can_transition_to(&state),
            "{state} should not transition to itself"
        );
    }
}

#[test]
fn test_restart_allowed_only_when_stopped_or_failed() {
    let allowed: Vec<&str> = all_states()
        .iter()
        .filter(|state| state.allows_restart())
        .map(SupervisorState::name)
        .collect();

    assert_eq!(allowed, vec!["stopped", "failed"]);
}

#[test]
fn test_live_process_states() {
    let live: Vec<&str> = all_states()
        .iter()
        .filter(|state| state.has_live_process())
        .map(SupervisorState::name)
        .collect();

    assert_eq!(live, vec!["running", "stopping"]);
}

#[test]
fn given_terminations_when_graceful_then_only_normal_and_graceful() {
    assert_that!(ExitInfo::new(Some(0), None, Termination::Normal).graceful(), eq(true));
    assert_that!(ExitInfo::new(None, Some(15), Termination::Graceful).graceful(), eq(true));
    assert_that!(ExitInfo::new(None, Some(11), Termination::Crashed).graceful(), eq(false));
    assert_that!(ExitInfo::new(None, Some(9), Termination::Forced).graceful(), eq(false));
}

#[test]
fn given_nonzero_exit_code_when_normal_then_not_a_crash() {
    let exit = ExitInfo::new(Some(1), None, Termination::Normal);

    assert_that!(exit.is_crash(), eq(false));
    assert_that!(exit.to_string(), eq("exited, exit code 1"));
}

#[test]
fn test_display() {
    assert_eq!(
        SupervisorState::Running { pid: 7 }.to_string(),
        "running (pid 7)"
    );
    assert_eq!(
        SupervisorState::Stopped(ExitInfo::new(None, Some(9), Termination::Forced)).to_string(),
        "stopped (killed, signal 9)"
    );
    assert_eq!(
        failed().to_string(),
        "failed (executable not found: No such file or directory (os error 2))"
    );
    assert_eq!(SupervisorState::Stopping.to_string(), "stopping");
}

#[test]
fn given_stopped_state_when_serialized_then_flattened_with_tag() {
    let state = SupervisorState::Stopped(ExitInfo::new(None, Some(11), Termination::Crashed));

    let json = serde_json::to_value(&state).unwrap();

    assert_that!(json["state"].as_str(), eq(Some("stopped")));
    assert_that!(json["signal"].as_i64(), eq(Some(11)));
    assert_that!(json["termination"].as_str(), eq(Some("crashed")));
    assert_that!(json["code"].is_null(), eq(true));
}

#[test]
fn given_failed_state_when_serialized_then_reason_is_snake_case() {
    let json = serde_json::to_value(failed()).unwrap();

    assert_that!(json["state"].as_str(), eq(Some("failed")));
    assert_that!(json["reason"].as_str(), eq(Some("executable_not_found")));
    assert!(!json["message"].as_str().unwrap_or_default().is_empty());
}
