use crate::runtime::{
    AnimationDriver, AnimationState, FormulaInputs, InteractiveDriver, StateTransitionEvent,
};
use crate::{
    Bounds, ClickableTargets, DiagnosticSink, Error, EventDispatcher, InteractiveEvent,
    InteractivityDefinition, Listener, ListenerId, LogSink, LottieDocument, NamedState,
    PointerEventKind, State, TransitionProperties, clickable_targets,
};

/// A state to switch to: one from the definition, or a bespoke one.
#[derive(Clone, Debug, PartialEq)]
pub enum StateSelector {
    Named(String),
    Custom(State),
}

impl From<&str> for StateSelector {
    fn from(value: &str) -> Self {
        StateSelector::Named(value.to_string())
    }
}

impl From<String> for StateSelector {
    fn from(value: String) -> Self {
        StateSelector::Named(value)
    }
}

impl From<State> for StateSelector {
    fn from(value: State) -> Self {
        StateSelector::Custom(value)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TransitionEventKind {
    Start,
    End,
}

/// The interactive side of a player: definition management, state inspection, programmatic
/// transitions, formula inputs and pointer dispatch.
///
/// The effective definition is, in order: one provided through [`Interactivity::set_definition`],
/// the one embedded in the loaded document, or a single `default` state spanning the animation.
#[derive(Debug)]
pub struct Interactivity {
    document: Option<LottieDocument>,
    /// `Some` once a definition was provided, even if it was `None`.
    user_definition: Option<Option<InteractivityDefinition>>,
    driver: InteractiveDriver,
    dispatcher: EventDispatcher,
}

impl Interactivity {
    pub fn new(document: Option<LottieDocument>) -> Result<Self, Error> {
        Self::with_diagnostics(document, LogSink)
    }

    pub fn with_diagnostics<D: DiagnosticSink + 'static>(
        document: Option<LottieDocument>,
        diagnostics: D,
    ) -> Result<Self, Error> {
        let definition = effective_definition(document.as_ref(), None);
        let mut driver = InteractiveDriver::with_diagnostics(definition, diagnostics)?;
        let dispatcher = build_dispatcher(document.as_ref(), &mut driver);
        Ok(Self {
            document,
            user_definition: None,
            driver,
            dispatcher,
        })
    }

    pub fn document(&self) -> Option<&LottieDocument> {
        self.document.as_ref()
    }

    /// Replaces the loaded document. A user-provided definition stays in effect.
    pub fn set_document(&mut self, document: Option<LottieDocument>) -> Result<(), Error> {
        self.document = document;
        self.update_reactivity()
    }

    /// The user-provided definition if one was set, else the one embedded in the document.
    pub fn definition(&self) -> Option<&InteractivityDefinition> {
        match &self.user_definition {
            Some(definition) => definition.as_ref(),
            None => self
                .document
                .as_ref()
                .and_then(|document| document.interactivity.as_ref()),
        }
    }

    /// Overrides the definition. `None` falls back to the single-state definition.
    pub fn set_definition(
        &mut self,
        definition: Option<InteractivityDefinition>,
    ) -> Result<(), Error> {
        self.user_definition = Some(definition);
        self.update_reactivity()
    }

    /// Forgets the user-provided definition and goes back to the document's.
    pub fn reset_definition(&mut self) -> Result<(), Error> {
        self.user_definition = None;
        self.update_reactivity()
    }

    pub fn has_user_provided_definition(&self) -> bool {
        self.user_definition.is_some()
    }

    pub fn state(&self) -> &NamedState {
        self.driver.current_state()
    }

    /// Switches state. Named states are looked up in the effective definition.
    pub fn go_to_state(
        &mut self,
        state: impl Into<StateSelector>,
        options: Option<TransitionProperties>,
    ) -> Result<(), Error> {
        let named = match state.into() {
            StateSelector::Named(name) => self
                .driver
                .definition()
                .state(&name)
                .ok_or(Error::UnknownState { name })?,
            StateSelector::Custom(state) => NamedState::custom(state),
        };
        self.driver.go_to_state(named, options);
        Ok(())
    }

    /// Fires `custom:<name>`.
    pub fn trigger(&mut self, name: &str) {
        self.driver.handle(&InteractiveEvent::custom(name));
    }

    pub fn on<L>(&mut self, kind: TransitionEventKind, listener: L) -> ListenerId
    where
        L: Listener<StateTransitionEvent> + 'static,
    {
        match kind {
            TransitionEventKind::Start => {
                self.driver.transition_start_event().add_listener(listener)
            }
            TransitionEventKind::End => self.driver.transition_end_event().add_listener(listener),
        }
    }

    pub fn off(&mut self, kind: TransitionEventKind, id: ListenerId) -> bool {
        match kind {
            TransitionEventKind::Start => {
                self.driver.transition_start_event().remove_listener(id)
            }
            TransitionEventKind::End => self.driver.transition_end_event().remove_listener(id),
        }
    }

    pub fn inputs(&mut self) -> FormulaInputs<'_> {
        self.driver.inputs()
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Press targets of the current state.
    pub fn clickable_targets(&self) -> ClickableTargets {
        clickable_targets(&self.driver.current_state().state)
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, bounds: Bounds) {
        self.dispatcher
            .pointer_move(&mut self.driver, client_x, client_y, bounds);
    }

    pub fn pointer_down(&mut self, buttons: u8) {
        self.dispatcher.pointer_down(&mut self.driver, buttons);
    }

    pub fn pointer_up(&mut self) {
        self.dispatcher.pointer_up(&mut self.driver);
    }

    pub fn pointer_event<S: AsRef<str>>(&mut self, kind: PointerEventKind, hit: &[S]) {
        self.dispatcher.pointer_event(&mut self.driver, kind, hit);
    }

    pub fn driver(&self) -> &InteractiveDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut InteractiveDriver {
        &mut self.driver
    }

    pub fn advance(&mut self, state: &AnimationState, elapsed: f64) -> AnimationState {
        self.driver.advance(state, elapsed)
    }

    fn update_reactivity(&mut self) -> Result<(), Error> {
        let user = self.user_definition.as_ref().map(Option::as_ref);
        let definition = effective_definition(self.document.as_ref(), user);
        let result = self.driver.set_definition(definition);
        self.dispatcher = build_dispatcher(self.document.as_ref(), &mut self.driver);
        result
    }
}

impl AnimationDriver for Interactivity {
    fn advance(&mut self, state: &AnimationState, elapsed: f64) -> AnimationState {
        Interactivity::advance(self, state, elapsed)
    }
}

fn effective_definition(
    document: Option<&LottieDocument>,
    user: Option<Option<&InteractivityDefinition>>,
) -> InteractivityDefinition {
    let chosen = match user {
        Some(definition) => definition,
        None => document.and_then(|document| document.interactivity.as_ref()),
    };
    match chosen {
        Some(definition) => definition.clone(),
        None => {
            InteractivityDefinition::single_state(document.map_or(0.0, LottieDocument::duration))
        }
    }
}

fn build_dispatcher(
    document: Option<&LottieDocument>,
    driver: &mut InteractiveDriver,
) -> EventDispatcher {
    let observed = driver.definition().observed_targets();
    let classes = document.map(|document| document.layer_classes.as_slice());
    EventDispatcher::new(&observed, classes, driver.diagnostics())
}
