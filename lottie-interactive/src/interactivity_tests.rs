use crate::runtime::{AnimationInfo, AnimationState, StateTransitionEvent};
use crate::{
    Error, Interactivity, InteractivityDefinition, LoopPolicy, LottieDocument, PointerEventKind,
    Segment, State, Transition, TransitionEventKind, TransitionProperties, UserValue,
};
use std::cell::RefCell;
use std::rc::Rc;

fn assert_approx(actual: f64, expected: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-9,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn looping(start: f64, end: f64) -> State {
    let mut state = State::new(Segment::new(start, end));
    state.loop_policy = Some(LoopPolicy::Infinite);
    state
}

fn menu() -> InteractivityDefinition {
    InteractivityDefinition::new("closed")
        .with_state(
            "closed",
            looping(0.0, 1.0)
                .with_transition("click:toggle", Transition::to("open"))
                .with_transition("custom:open", Transition::to("open")),
        )
        .with_state(
            "open",
            looping(1.0, 2.0).with_transition("click:toggle", Transition::to("closed")),
        )
}

fn document(definition: Option<InteractivityDefinition>) -> LottieDocument {
    LottieDocument {
        info: AnimationInfo::new(50.0, 0.0, 150.0),
        interactivity: definition,
        layer_classes: vec!["toggle".into(), "backdrop".into()],
    }
}

#[test]
fn non_interactive_document_plays_one_default_state() {
    let interactivity = Interactivity::new(Some(document(None))).unwrap();

    assert!(interactivity.definition().is_none());
    assert_eq!(interactivity.state().name.as_deref(), Some("default"));
    assert_eq!(interactivity.state().state.segment, Segment::new(0.0, 3.0));
}

#[test]
fn embedded_definition_drives_states() {
    let mut interactivity = Interactivity::new(Some(document(Some(menu())))).unwrap();

    assert_eq!(interactivity.state().name.as_deref(), Some("closed"));
    assert_eq!(interactivity.dispatcher().targets(), ["toggle"]);

    interactivity.pointer_event(PointerEventKind::Click, &["toggle"]);
    assert_eq!(interactivity.state().name.as_deref(), Some("open"));

    interactivity.pointer_event(PointerEventKind::Click, &["backdrop"]);
    assert_eq!(interactivity.state().name.as_deref(), Some("open"));
}

#[test]
fn user_definition_overrides_and_resets() {
    let mut interactivity = Interactivity::new(Some(document(Some(menu())))).unwrap();
    let replacement = InteractivityDefinition::new("solo").with_state("solo", looping(0.0, 2.0));

    interactivity.set_definition(Some(replacement.clone())).unwrap();
    assert!(interactivity.has_user_provided_definition());
    assert_eq!(interactivity.definition(), Some(&replacement));
    assert_eq!(interactivity.state().name.as_deref(), Some("solo"));
    assert!(interactivity.dispatcher().targets().is_empty());

    interactivity.set_definition(None).unwrap();
    assert!(interactivity.definition().is_none());
    assert_eq!(interactivity.state().name.as_deref(), Some("default"));

    interactivity.reset_definition().unwrap();
    assert!(!interactivity.has_user_provided_definition());
    assert_eq!(interactivity.definition(), Some(&menu()));
    assert_eq!(interactivity.state().name.as_deref(), Some("closed"));
}

#[test]
fn go_to_state_by_name_or_bespoke_state() {
    let mut interactivity = Interactivity::new(Some(document(Some(menu())))).unwrap();

    interactivity.go_to_state("open", None).unwrap();
    assert_eq!(interactivity.state().name.as_deref(), Some("open"));

    let err = interactivity.go_to_state("gone", None).unwrap_err();
    assert!(matches!(err, Error::UnknownState { name } if name == "gone"));
    assert_eq!(interactivity.state().name.as_deref(), Some("open"));

    interactivity
        .go_to_state(looping(0.5, 1.5), Some(TransitionProperties::with_duration(0.5)))
        .unwrap();
    assert_eq!(interactivity.state().name, None);
    assert!(interactivity.driver().is_transitioning());
}

#[test]
fn trigger_fires_custom_events() {
    let mut interactivity = Interactivity::new(Some(document(Some(menu())))).unwrap();

    interactivity.trigger("nothing");
    assert_eq!(interactivity.state().name.as_deref(), Some("closed"));
    interactivity.trigger("open");
    assert_eq!(interactivity.state().name.as_deref(), Some("open"));
}

#[test]
fn transition_listeners_can_be_removed() {
    let mut interactivity = Interactivity::new(Some(document(Some(menu())))).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = interactivity.on(TransitionEventKind::Start, move |e: &StateTransitionEvent| {
        sink.borrow_mut().push(e.to.to_string());
    });

    interactivity.trigger("open");
    assert!(interactivity.off(TransitionEventKind::Start, id));
    assert!(!interactivity.off(TransitionEventKind::End, id));
    interactivity.go_to_state("closed", None).unwrap();

    assert_eq!(*seen.borrow(), vec!["open"]);
}

#[test]
fn inputs_feed_formulas() {
    let mut state = looping(0.0, 10.0);
    state.playhead = Some("knob".into());
    let definition = InteractivityDefinition::new("dial").with_state("dial", state);
    let mut interactivity = Interactivity::new(Some(document(Some(definition)))).unwrap();

    interactivity.inputs().set("knob", 0.3);
    assert_eq!(interactivity.inputs().get("knob"), Some(UserValue::Number(0.3)));

    let info = AnimationInfo::new(50.0, 0.0, 1000.0);
    let out = interactivity.advance(&AnimationState::new(info), 0.1);
    assert_approx(out.time, 3.0);
}

#[test]
fn pointer_position_reaches_builtins() {
    let mut interactivity = Interactivity::new(None).unwrap();

    interactivity.pointer_move(30.0, 20.0, crate::Bounds::new(10.0, 10.0, 40.0, 20.0));
    interactivity.pointer_down(2);

    let builtins = interactivity.driver().variables();
    assert_eq!(builtins.get("mouse.x").copied(), Some(20.0.into()));
    assert_eq!(builtins.get("mouse.progress.y").copied(), Some(0.5.into()));
    assert_eq!(builtins.get("mouse.buttons.right").copied(), Some(true.into()));

    interactivity.pointer_up();
    let builtins = interactivity.driver().variables();
    assert_eq!(builtins.get("mouse.buttons.right").copied(), Some(false.into()));
}

#[test]
fn clickable_targets_follow_the_current_state() {
    let mut interactivity = Interactivity::new(Some(document(Some(menu())))).unwrap();

    assert_eq!(interactivity.clickable_targets().targets, vec!["toggle"]);
    interactivity.set_definition(None).unwrap();
    assert!(interactivity.clickable_targets().targets.is_empty());
}

#[test]
fn missing_initial_state_in_document_is_an_error() {
    let broken = InteractivityDefinition::new("nowhere").with_state("a", looping(0.0, 1.0));
    let err = Interactivity::new(Some(document(Some(broken)))).unwrap_err();
    assert!(matches!(err, Error::UnknownInitialState { .. }));
}
