use assert_call::{call, CallRecorder};
use rstest::rstest;

use super::*;

type State = RequestState<String, String>;

fn state(pending: bool, data: Option<&str>, error: Option<&str>) -> State {
    RequestState {
        pending,
        data: data.map(String::from),
        error: error.map(String::from),
    }
}

#[test]
fn new() {
    let s = State::new();
    assert!(!s.pending);
    assert_eq!(s.data, None);
    assert_eq!(s.error, None);
    assert_eq!(s, State::default());
}

#[test]
fn with_data() {
    let s = State::with_data("a".into());
    assert!(!s.pending);
    assert_eq!(s.data(), Some(&"a".to_string()));
    assert_eq!(s.error(), None);
}

#[test]
fn from_initial_keeps_zero() {
    let s = RequestState::<i32, ()>::from_initial(Some(0));
    assert_eq!(s.data, Some(0));
}

#[test]
fn default_without_default_payload() {
    struct NoDefault;
    let s = RequestState::<NoDefault, NoDefault>::default();
    assert!(!s.pending);
    assert!(s.data.is_none());
    assert!(s.error.is_none());
}

#[rstest]
#[case(state(false, None, None))]
#[case(state(true, None, None))]
#[case(state(false, Some("d"), None))]
#[case(state(false, None, Some("e")))]
#[case(state(true, Some("d"), Some("e")))]
fn start(#[case] s: State) {
    let signal = Signal::new(s.clone());
    RequestState::start(&signal);
    let expected = RequestState {
        pending: true,
        data: s.data,
        error: s.error,
    };
    assert_eq!(signal.get(), expected);
}

#[rstest]
#[case(state(false, None, None))]
#[case(state(true, None, None))]
#[case(state(false, Some("d"), None))]
#[case(state(true, None, Some("e0")))]
#[case(state(true, Some("d"), Some("e0")))]
fn fail(#[case] s: State) {
    let signal = Signal::new(s.clone());
    RequestState::fail(&signal, "e1".into());
    assert_eq!(signal.get(), state(false, s.data.as_deref(), Some("e1")));
}

#[rstest]
#[case(state(false, None, None))]
#[case(state(true, None, None))]
#[case(state(false, Some("d0"), None))]
#[case(state(true, None, Some("e")))]
#[case(state(true, Some("d0"), Some("e")))]
fn succeed(#[case] s: State) {
    let signal = Signal::new(s);
    RequestState::succeed(&signal, "d1".into());
    assert_eq!(signal.get(), state(false, Some("d1"), None));
}

#[test]
fn succeed_twice() {
    let signal = Signal::new(State::new());
    RequestState::succeed(&signal, "d".into());
    let first = signal.get();
    RequestState::succeed(&signal, "d".into());
    assert_eq!(signal.get(), first);
}

#[test]
fn start_keeps_data() {
    let signal = Signal::new(State::with_data("existing".into()));
    RequestState::start(&signal);
    assert_eq!(signal.get(), state(true, Some("existing"), None));
}

#[test]
fn retry() {
    let signal = Signal::new(State::new());
    RequestState::start(&signal);
    RequestState::fail(&signal, "e1".into());
    assert_eq!(signal.get(), state(false, None, Some("e1")));

    RequestState::start(&signal);
    assert_eq!(signal.get(), state(true, None, Some("e1")));

    RequestState::succeed(&signal, "d".into());
    assert_eq!(signal.get(), state(false, Some("d"), None));
}

#[test]
fn refetch_keeps_stale_data() {
    let signal = Signal::new(State::new());
    RequestState::succeed(&signal, "old".into());
    RequestState::start(&signal);
    assert_eq!(signal.get(), state(true, Some("old"), None));

    RequestState::fail(&signal, "e".into());
    assert_eq!(signal.get(), state(false, Some("old"), Some("e")));
}

#[test]
fn each_transition_notifies_once() {
    let mut cr = CallRecorder::new();
    let signal = Signal::new(State::new());
    let _s = signal.subscribe(|s| call!("{}", s.status()));
    cr.verify("idle");

    RequestState::start(&signal);
    cr.verify("pending");

    RequestState::fail(&signal, "e".into());
    cr.verify("failed");

    RequestState::start(&signal);
    cr.verify("pending");

    RequestState::succeed(&signal, "d".into());
    cr.verify("succeeded");
}

#[test]
fn transitions_replace_snapshot() {
    let signal = Signal::new(State::with_data("d".into()));
    let before = signal.value();
    RequestState::start(&signal);
    assert!(!before.pending);
    assert!(signal.value().pending);
}

#[test]
fn fail_and_succeed_with_opaque_error() {
    struct OpaqueError;

    let signal = Signal::new(RequestState::<String, OpaqueError>::with_data("d0".into()));
    RequestState::fail(&signal, OpaqueError);
    assert!(!signal.value().pending);
    assert_eq!(signal.value().data.as_deref(), Some("d0"));
    assert!(signal.value().error.is_some());

    RequestState::succeed(&signal, "d1".into());
    assert_eq!(signal.value().data.as_deref(), Some("d1"));
    assert!(signal.value().error.is_none());
}

#[test]
fn succeed_with_opaque_payload() {
    struct Payload(u32);
    struct OpaqueError;

    let signal = Signal::new(RequestState::<Payload, OpaqueError>::new());
    RequestState::succeed(&signal, Payload(7));
    assert_eq!(signal.value().data.as_ref().map(|p| p.0), Some(7));
}

#[test]
fn ext_methods() {
    let signal = Signal::new(State::new());
    signal.start();
    assert!(signal.get().is_pending());
    signal.fail("e".into());
    assert_eq!(signal.get(), state(false, None, Some("e")));
    signal.succeed("d".into());
    assert_eq!(signal.get(), state(false, Some("d"), None));
}

#[rstest]
#[case(state(false, None, None), RequestStatus::Idle)]
#[case(state(true, None, None), RequestStatus::Pending)]
#[case(state(true, Some("d"), Some("e")), RequestStatus::Pending)]
#[case(state(false, Some("d"), Some("e")), RequestStatus::Failed)]
#[case(state(false, None, Some("e")), RequestStatus::Failed)]
#[case(state(false, Some("d"), None), RequestStatus::Succeeded)]
fn status(#[case] s: State, #[case] expected: RequestStatus) {
    assert_eq!(s.status(), expected);
}

#[test]
fn status_display() {
    assert_eq!(RequestStatus::Idle.to_string(), "idle");
    assert_eq!(RequestStatus::Pending.to_string(), "pending");
    assert_eq!(RequestStatus::Failed.to_string(), "failed");
    assert_eq!(RequestStatus::Succeeded.to_string(), "succeeded");
}

#[test]
fn serialize() {
    let s = state(true, Some("d"), None);
    assert_eq!(
        serde_json::to_string(&s).unwrap(),
        r#"{"pending":true,"data":"d","error":null}"#
    );
}

#[test]
fn deserialize() {
    let s: State = serde_json::from_str(r#"{"pending":false,"data":null,"error":"e"}"#).unwrap();
    assert_eq!(s, state(false, None, Some("e")));
}
