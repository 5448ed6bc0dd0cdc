//! Behaviour of a single machine: resolution, failures and observers.

use statute::machine::{Machine, MachineError, TransformError, Transition};
use statute::state_enum;
use statute::{HistoryPolicy, NamedState, State};
use std::sync::{Arc, Mutex};

state_enum! {
    enum SavedSearchState {
        Collapsed,
        Expanded,
        Hidden,
    }
}

#[derive(Clone, Debug, PartialEq)]
struct SavedSearch {
    query: String,
    visible_rows: usize,
}

impl SavedSearch {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            visible_rows: 1,
        }
    }
}

fn saved_search_machine() -> Machine<SavedSearch, SavedSearchState, usize> {
    Machine::new(
        SavedSearchState::Collapsed,
        vec![
            Transition::new(
                SavedSearchState::Collapsed,
                SavedSearchState::Expanded,
                |search: &SavedSearch, ctx| {
                    let rows: usize = ctx.payload().copied().unwrap_or(10);
                    Ok(SavedSearch {
                        visible_rows: search.visible_rows * rows,
                        ..search.clone()
                    })
                },
            )
            .named("Expand"),
            Transition::new(
                SavedSearchState::Expanded,
                SavedSearchState::Collapsed,
                |search: &SavedSearch, ctx| {
                    let rows: usize = ctx.payload().copied().unwrap_or(10);
                    Ok(SavedSearch {
                        visible_rows: search.visible_rows / rows,
                        ..search.clone()
                    })
                },
            )
            .named("Collapse"),
        ],
    )
}

#[test]
fn no_op_request_skips_transform_but_fires_hooks() {
    let calls = Arc::new(Mutex::new(0));
    let after = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&calls);
    let mut machine: Machine<u32, SavedSearchState> = Machine::new(
        SavedSearchState::Collapsed,
        vec![Transition::new(
            SavedSearchState::Collapsed,
            SavedSearchState::Collapsed,
            move |n: &u32, _| {
                *counter.lock().unwrap() += 1;
                Ok(n + 1)
            },
        )],
    );
    let before = Arc::new(Mutex::new(0));
    let fired = Arc::clone(&before);
    machine.on_before_transition(move |_| *fired.lock().unwrap() += 1);
    let fired = Arc::clone(&after);
    machine.on_after_transition(move |_| *fired.lock().unwrap() += 1);

    let result = machine
        .perform_transition(7, SavedSearchState::Collapsed)
        .unwrap();

    assert_eq!(result, 7);
    assert_eq!(*calls.lock().unwrap(), 0);
    assert_eq!(*before.lock().unwrap(), 1);
    assert_eq!(*after.lock().unwrap(), 1);
    assert_eq!(machine.current_state(), &SavedSearchState::Collapsed);
}

#[test]
fn first_declared_match_wins() {
    let mut machine: Machine<&'static str, SavedSearchState> = Machine::new(
        SavedSearchState::Collapsed,
        vec![
            Transition::new(SavedSearchState::Collapsed, SavedSearchState::Expanded, |_, _| {
                Ok("first")
            }),
            Transition::new(SavedSearchState::Collapsed, SavedSearchState::Expanded, |_, _| {
                Ok("second")
            }),
        ],
    );

    let result = machine
        .perform_transition("start", SavedSearchState::Expanded)
        .unwrap();

    assert_eq!(result, "first");
}

#[test]
fn unmatched_request_names_attempted_states() {
    let mut machine = saved_search_machine();

    let error = machine
        .perform_transition(SavedSearch::new("rust"), SavedSearchState::Hidden)
        .unwrap_err();

    match &error {
        MachineError::InvalidStateTransition { from, to, source } => {
            assert_eq!(from, "Collapsed");
            assert_eq!(to, "Hidden");
            assert!(source.is_none());
        }
        other => panic!("expected InvalidStateTransition, got {other:?}"),
    }
    assert_eq!(
        error.to_string(),
        "Unable to transition state from Collapsed to Hidden."
    );
}

#[test]
fn round_trip_restores_object_and_state() {
    let mut machine = saved_search_machine();
    let original = SavedSearch::new("rust");

    let expanded = machine
        .perform_transition(original.clone(), SavedSearchState::Expanded)
        .unwrap();
    assert_eq!(expanded.visible_rows, 10);
    assert_eq!(machine.current_state(), &SavedSearchState::Expanded);

    let collapsed = machine
        .perform_transition(expanded, SavedSearchState::Collapsed)
        .unwrap();

    assert_eq!(collapsed, original);
    assert_eq!(machine.current_state(), &SavedSearchState::Collapsed);
    assert_eq!(machine.start_state(), &SavedSearchState::Collapsed);
}

#[test]
fn payload_reaches_transform() {
    let mut machine = saved_search_machine();

    let expanded = machine
        .perform_transition_with(SavedSearch::new("rust"), SavedSearchState::Expanded, 25)
        .unwrap();

    assert_eq!(expanded.visible_rows, 25);
}

#[test]
fn missing_object_is_rejected_without_hooks() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut machine = saved_search_machine();

    let log = Arc::clone(&events);
    machine.on_before_transition(move |_| log.lock().unwrap().push("before"));
    let log = Arc::clone(&events);
    machine.on_after_transition(move |_| log.lock().unwrap().push("after"));

    let error = machine
        .try_perform_transition(None, SavedSearchState::Expanded, None)
        .unwrap_err();

    assert!(matches!(error, MachineError::InvalidArgument(_)));
    assert!(events.lock().unwrap().is_empty());
    assert_eq!(machine.current_state(), &SavedSearchState::Collapsed);
}

#[test]
fn present_object_goes_through_try_perform() {
    let mut machine = saved_search_machine();

    let expanded = machine
        .try_perform_transition(
            Some(SavedSearch::new("rust")),
            SavedSearchState::Expanded,
            Some(2),
        )
        .unwrap();

    assert_eq!(expanded.visible_rows, 2);
}

#[test]
fn hooks_bracket_transform_and_state_update() {
    let events = Arc::new(Mutex::new(Vec::<String>::new()));

    let log = Arc::clone(&events);
    let mut machine: Machine<(), SavedSearchState> = Machine::new(
        SavedSearchState::Collapsed,
        vec![Transition::new(
            SavedSearchState::Collapsed,
            SavedSearchState::Expanded,
            move |_, _| {
                log.lock().unwrap().push("transform".to_string());
                Ok(())
            },
        )],
    );

    let log = Arc::clone(&events);
    machine.on_before_transition(move |s| log.lock().unwrap().push(format!("before:{s}")));
    let log = Arc::clone(&events);
    machine.on_after_transition(move |s| log.lock().unwrap().push(format!("after:{s}")));

    machine
        .perform_transition((), SavedSearchState::Expanded)
        .unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec!["before:Collapsed", "transform", "after:Expanded"]
    );
}

#[test]
fn failed_transition_skips_after_hook_and_keeps_state() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut machine: Machine<(), SavedSearchState> = Machine::new(
        SavedSearchState::Collapsed,
        vec![Transition::new(
            SavedSearchState::Collapsed,
            SavedSearchState::Expanded,
            |_, _| Err(TransformError::msg("index unavailable")),
        )],
    );

    let log = Arc::clone(&events);
    machine.on_before_transition(move |_| log.lock().unwrap().push("before"));
    let log = Arc::clone(&events);
    machine.on_after_transition(move |_| log.lock().unwrap().push("after"));

    let error = machine
        .perform_transition((), SavedSearchState::Expanded)
        .unwrap_err();

    assert_eq!(error.attempted(), Some(("Collapsed", "Expanded")));
    assert_eq!(
        error.transform_error().map(ToString::to_string).as_deref(),
        Some("index unavailable")
    );
    assert_eq!(*events.lock().unwrap(), vec!["before"]);
    assert_eq!(machine.current_state(), &SavedSearchState::Collapsed);
}

#[test]
fn unmatched_request_fires_only_before_hook() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut machine = saved_search_machine();

    let log = Arc::clone(&events);
    machine.on_before_transition(move |_| log.lock().unwrap().push("before"));
    let log = Arc::clone(&events);
    machine.on_after_transition(move |_| log.lock().unwrap().push("after"));

    let error = machine
        .perform_transition(SavedSearch::new("rust"), SavedSearchState::Hidden)
        .unwrap_err();

    assert_eq!(error.attempted(), Some(("Collapsed", "Hidden")));
    assert_eq!(*events.lock().unwrap(), vec!["before"]);
    assert_eq!(machine.current_state(), &SavedSearchState::Collapsed);
}

#[test]
fn unsubscribed_observer_stops_firing() {
    let count = Arc::new(Mutex::new(0));
    let mut machine = saved_search_machine();

    let counter = Arc::clone(&count);
    let id = machine.on_after_transition(move |_| *counter.lock().unwrap() += 1);

    let search = machine
        .perform_transition(SavedSearch::new("rust"), SavedSearchState::Expanded)
        .unwrap();
    assert!(machine.unsubscribe(id));
    machine
        .perform_transition(search, SavedSearchState::Collapsed)
        .unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn history_policy_is_opt_in() {
    let mut plain = saved_search_machine();
    plain
        .perform_transition(SavedSearch::new("rust"), SavedSearchState::Expanded)
        .unwrap();
    assert!(plain.history().is_empty());

    let mut audited = Machine::builder()
        .initial(SavedSearchState::Collapsed)
        .label("audited")
        .transitions(saved_search_machine().transitions().to_vec())
        .history(HistoryPolicy::Bounded(1))
        .build()
        .unwrap();

    let search = audited
        .perform_transition(SavedSearch::new("rust"), SavedSearchState::Expanded)
        .unwrap();
    audited
        .perform_transition(search, SavedSearchState::Collapsed)
        .unwrap();

    let last = audited.history().last().unwrap();
    assert_eq!(audited.history().len(), 1);
    assert_eq!(last.sequence, 1);
    assert_eq!(last.transition.as_deref(), Some("Collapse"));
    assert_eq!(last.from, SavedSearchState::Expanded);
}

#[test]
fn named_states_match_across_declarations() {
    let mut machine: Machine<u8, NamedState> = Machine::new(
        NamedState::tagged("Collapsed", "SavedSearchState"),
        vec![Transition::new(
            NamedState::new("Collapsed"),
            NamedState::new("Expanded"),
            |n: &u8, _| Ok(n + 1),
        )],
    );

    let result = machine
        .perform_transition(0, NamedState::tagged("Expanded", "OtherDeclaration"))
        .unwrap();

    assert_eq!(result, 1);
    assert_eq!(machine.current_state().name(), "Expanded");
}
