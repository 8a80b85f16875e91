use crate::{
    Error, InteractivityDefinition, LoopPolicy, Segment, StartAt, State, TimeRemap, Transition,
    TransitionProperties,
};

#[test]
fn start_and_remap_policies_parse_leniently() {
    assert_eq!(StartAt::parse("proportional"), StartAt::Proportional);
    assert_eq!(StartAt::parse("end"), StartAt::End);
    assert_eq!(StartAt::parse("sideways"), StartAt::Unknown("sideways".into()));
    assert_eq!(TimeRemap::parse("wrap"), TimeRemap::Wrap);
    assert_eq!(TimeRemap::parse("?"), TimeRemap::Unknown("?".into()));
    assert_eq!(StartAt::default(), StartAt::Start);
    assert_eq!(TimeRemap::default(), TimeRemap::Proportional);
}

#[test]
fn loop_flags() {
    assert_eq!(LoopPolicy::from(true), LoopPolicy::Infinite);
    assert_eq!(LoopPolicy::from(false), LoopPolicy::Count(1));
    assert_eq!(LoopPolicy::default(), LoopPolicy::Count(1));
}

#[test]
fn only_positive_durations_blend() {
    assert_eq!(TransitionProperties::with_duration(0.5).blend_duration(), Some(0.5));
    assert_eq!(TransitionProperties::with_duration(0.0).blend_duration(), None);
    assert_eq!(TransitionProperties::with_duration(-1.0).blend_duration(), None);
    assert_eq!(TransitionProperties::default().blend_duration(), None);
}

#[test]
fn inverted_segments_are_rejected() {
    let err = State::new(Segment::new(2.0, 1.0)).validate("back").unwrap_err();
    assert!(matches!(err, Error::InvalidSegment { state, .. } if state == "back"));

    let mut state = State::new(Segment::new(0.0, 1.0));
    state.duration = Some(-0.5);
    assert!(matches!(state.validate("s"), Err(Error::InvalidValue { .. })));
}

#[test]
fn definition_validation_checks_version() {
    let mut definition = InteractivityDefinition::single_state(3.0);
    assert!(definition.validate().is_ok());

    definition.version = "v2".into();
    assert!(matches!(
        definition.validate(),
        Err(Error::UnsupportedVersion { value }) if value == "v2"
    ));
}

#[test]
fn single_state_spans_the_animation() {
    let definition = InteractivityDefinition::single_state(4.0);
    let initial = definition.initial().unwrap();

    assert_eq!(initial.name.as_deref(), Some("default"));
    assert_eq!(initial.state.segment, Segment::new(0.0, 4.0));
    assert!(initial.state.on.is_empty());
}

#[test]
fn observed_targets_in_first_seen_order() {
    let definition = InteractivityDefinition::new("a")
        .with_state(
            "a",
            State::new(Segment::new(0.0, 1.0))
                .with_transition("click:button", Transition::to("b"))
                .with_transition("mouseEnter:hero", Transition::to("b"))
                .with_transition("custom:open", Transition::to("b"))
                .with_transition("mouseDown:", Transition::to("b"))
                .with_transition("finish", Transition::to("b")),
        )
        .with_state(
            "b",
            State::new(Segment::new(1.0, 2.0))
                .with_transition("mouseLeave:hero", Transition::to("a"))
                .with_transition("mouseUp:badge", Transition::to("a")),
        );

    assert_eq!(definition.observed_targets(), vec!["button", "hero", "badge"]);
}

#[test]
fn named_state_display() {
    let definition = InteractivityDefinition::single_state(1.0);
    assert_eq!(definition.initial().unwrap().to_string(), "default");
    assert_eq!(
        crate::NamedState::custom(State::empty()).to_string(),
        crate::CUSTOM_STATE_NAME
    );
}
