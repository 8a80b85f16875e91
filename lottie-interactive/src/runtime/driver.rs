use crate::expression::Formula;
use crate::runtime::remap;
use crate::runtime::state::{StateState, TickContext, compile_formula};
use crate::runtime::transition::{Previous, TransitionState};
use crate::runtime::variables::PlaybackSymbols;
use crate::runtime::{
    AnimationDriver, AnimationState, BuiltinUpdate, FormulaInputs, PlaybackEventKind,
    UserVariables, VariableEnvironment, Variables,
};
use crate::{
    Diagnostic, DiagnosticSink, Error, EventEmitter, InteractiveEvent, InteractiveEventHandler,
    InteractivityDefinition, LogSink, MAX_MORPHS, MorphOperation, NamedState, NumberOrFormula,
    StartAt, State, TimeRemap, TransitionProperties,
};
use std::sync::Arc;

/// Payload of transition start and end notifications.
#[derive(Clone, Debug, PartialEq)]
pub struct StateTransitionEvent {
    pub from: NamedState,
    pub to: NamedState,
    pub transition: TransitionProperties,
}

#[derive(Clone, Debug)]
enum MorphStrength {
    Constant(f64),
    Formula(Formula),
}

/// Standalone blending of the current state with another state of the definition.
#[derive(Clone, Debug)]
struct MorphState {
    other: NamedState,
    time_remap: TimeRemap,
    strength: MorphStrength,
}

/// Runs an interactivity definition: the current state, the transition into it and any
/// standalone morphing it declares.
pub struct InteractiveDriver {
    definition: InteractivityDefinition,
    env: VariableEnvironment,
    clock: f64,
    /// Elapsed seconds of the last tick.
    elapsed: f64,
    state: StateState,
    morphing: Option<MorphState>,
    transition: Option<TransitionState>,
    transition_start: EventEmitter<StateTransitionEvent>,
    transition_end: EventEmitter<StateTransitionEvent>,
    diagnostics: Box<dyn DiagnosticSink>,
}

impl std::fmt::Debug for InteractiveDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractiveDriver")
            .field("state", &self.state.named.display_name())
            .field("clock", &self.clock)
            .field("transitioning", &self.transition.is_some())
            .finish()
    }
}

impl InteractiveDriver {
    /// Enters the initial state of `definition`. Diagnostics go to [`LogSink`].
    pub fn new(definition: InteractivityDefinition) -> Result<Self, Error> {
        Self::with_diagnostics(definition, LogSink)
    }

    pub fn with_diagnostics<D: DiagnosticSink + 'static>(
        definition: InteractivityDefinition,
        diagnostics: D,
    ) -> Result<Self, Error> {
        let initial = definition.initial()?;
        let mut diagnostics: Box<dyn DiagnosticSink> = Box::new(diagnostics);
        let state = StateState::enter(initial, diagnostics.as_mut());
        let mut driver = Self {
            definition,
            env: VariableEnvironment::new(),
            clock: 0.0,
            elapsed: 0.0,
            state,
            morphing: None,
            transition: None,
            transition_start: EventEmitter::new(),
            transition_end: EventEmitter::new(),
            diagnostics,
        };
        driver.setup_morphing(true);
        Ok(driver)
    }

    pub fn set_diagnostic_sink<D: DiagnosticSink + 'static>(&mut self, diagnostics: D) {
        self.diagnostics = Box::new(diagnostics);
    }

    pub(crate) fn diagnostics(&mut self) -> &mut dyn DiagnosticSink {
        self.diagnostics.as_mut()
    }

    pub fn definition(&self) -> &InteractivityDefinition {
        &self.definition
    }

    /// Replaces the definition and drops any transition in flight.
    ///
    /// A state with the same name as the current one is re-entered at the current time.
    /// Otherwise the new initial state is entered, also at the current time. If the initial
    /// state is missing an empty state is entered and the error is returned.
    pub fn set_definition(&mut self, definition: InteractivityDefinition) -> Result<(), Error> {
        self.definition = definition;
        self.transition = None;
        let time = self.state.playback.clock.time();

        let retained = self
            .state
            .named
            .name
            .as_deref()
            .and_then(|name| self.definition.state(name));
        match retained.map_or_else(|| self.definition.initial(), Ok) {
            Ok(named) => {
                self.enter_state(named);
                self.state.playback.clock.seek(time);
                Ok(())
            }
            Err(error) => {
                self.enter_state(NamedState::custom(State::empty()));
                Err(error)
            }
        }
    }

    pub fn current_state(&self) -> &NamedState {
        &self.state.named
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Seconds since the driver was created.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// The playhead formula of the current state if it has one, else the playback time.
    pub fn current_time(&self) -> f64 {
        match self.state.playback.playhead_control() {
            Some(formula) => formula.call(&self.playback_symbols()),
            None => self.state.playback.clock.time(),
        }
    }

    /// Variables as seen by the current state's formulas on the last tick.
    fn playback_symbols(&self) -> PlaybackSymbols<'_> {
        self.state
            .playback
            .symbols(self.env.variables(), self.clock, self.elapsed)
    }

    pub fn current_frame(&self) -> f64 {
        self.current_time() * self.state.playback.clock.frame_rate()
    }

    pub fn transition_start_event(&mut self) -> &mut EventEmitter<StateTransitionEvent> {
        &mut self.transition_start
    }

    pub fn transition_end_event(&mut self) -> &mut EventEmitter<StateTransitionEvent> {
        &mut self.transition_end
    }

    pub fn variables(&self) -> &Variables {
        self.env.variables()
    }

    pub fn update_builtins(&mut self, update: &BuiltinUpdate) {
        self.env.update_builtins(update);
    }

    pub fn set_user_variables(&mut self, user: UserVariables) {
        self.env.set_user_variables(user);
    }

    pub fn inputs(&mut self) -> FormulaInputs<'_> {
        FormulaInputs::new(&mut self.env)
    }

    /// Runs the transition registered for `event` in the current state, if any.
    pub fn handle(&mut self, event: &InteractiveEvent) {
        let key = event.to_string();
        let Some(transition) = self.state.state().on.get(&key).cloned() else {
            return;
        };

        match self.definition.state(&transition.go_to) {
            Some(target) => self.go_to_state(target, Some(transition.properties)),
            None => self.diagnostics.report(Diagnostic::UnknownTargetState {
                event: key,
                target: transition.go_to,
            }),
        }
    }

    /// Switches to `state`, blending from the current output if the transition has a duration.
    ///
    /// A transition still in flight is ended first and becomes the starting point of the new
    /// blend.
    pub fn go_to_state(&mut self, state: NamedState, properties: Option<TransitionProperties>) {
        if let Some(transition) = &self.transition {
            self.transition_end.emit(&StateTransitionEvent {
                from: transition.from.clone(),
                to: self.state.named.clone(),
                transition: transition.properties.clone(),
            });
        }

        let prev_time = self.state.playback.clock.time();
        let prev_segment = self.state.state().segment;
        let entered = StateState::enter(state, self.diagnostics.as_mut());
        let prev_state = std::mem::replace(&mut self.state, entered);
        self.setup_morphing(true);

        let mut properties = properties.unwrap_or_default();
        let start_at = properties.start_at.get_or_insert(StartAt::Start).clone();
        self.transition_start.emit(&StateTransitionEvent {
            from: prev_state.named.clone(),
            to: self.state.named.clone(),
            transition: properties.clone(),
        });

        let segment = self.state.state().segment;
        match remap::start_time(&start_at, prev_time, prev_segment, segment) {
            Some(time) => self.state.playback.clock.seek(time),
            None => {
                if let StartAt::Unknown(value) = start_at {
                    self.diagnostics.report(Diagnostic::UnknownStartAt { value });
                }
            }
        }

        if properties.blend_duration().is_some() {
            let from = prev_state.named.clone();
            let previous = match self.transition.take() {
                Some(interrupted) => Previous::Pending {
                    transition: Box::new(interrupted),
                    next: prev_state,
                },
                None => Previous::Resolved(prev_state),
            };
            let transition = TransitionState::new(properties, previous, from);
            self.transition = Some(transition.collapsed(MAX_MORPHS));
        } else {
            self.transition = None;
            self.transition_end.emit(&StateTransitionEvent {
                from: prev_state.named,
                to: self.state.named.clone(),
                transition: properties,
            });
        }
    }

    fn enter_state(&mut self, named: NamedState) {
        self.state = StateState::enter(named, self.diagnostics.as_mut());
        self.setup_morphing(true);
    }

    fn setup_morphing(&mut self, force: bool) {
        if force {
            self.morphing = None;
        }

        let state = Arc::clone(&self.state.named.state);
        let Some(def) = &state.morphing else {
            self.morphing = None;
            return;
        };
        if self.morphing.is_some() {
            return;
        }

        let Some(other) = self.definition.state(&def.other_state) else {
            if force {
                self.diagnostics.report(Diagnostic::UnknownMorphState {
                    state: self.state.named.display_name().to_string(),
                    other: def.other_state.clone(),
                });
            }
            return;
        };

        let time_remap = def.time_remap.clone().unwrap_or_default();
        if let TimeRemap::Unknown(value) = &time_remap {
            self.diagnostics.report(Diagnostic::UnknownTimeRemap {
                value: value.clone(),
            });
        }
        let strength = match &def.strength {
            NumberOrFormula::Number(value) => MorphStrength::Constant(*value),
            NumberOrFormula::Formula(source) => {
                MorphStrength::Formula(compile_formula(source, 0.0, self.diagnostics.as_mut()))
            }
        };

        self.morphing = Some(MorphState {
            other,
            time_remap,
            strength,
        });
    }

    fn apply_morphing(&self, ls: &mut AnimationState) {
        let Some(morphing) = &self.morphing else {
            return;
        };

        let current = ls.morphs.last().map_or(ls.time, |morph| morph.time);
        let from = self.state.state().segment;
        let onto = morphing.other.state.segment;
        let time = remap::remap_time(&morphing.time_remap, current, from, onto);

        let strength = match &morphing.strength {
            MorphStrength::Constant(value) => *value,
            MorphStrength::Formula(formula) => formula.call(&self.playback_symbols()),
        };
        ls.morphs.push(MorphOperation::new(time, strength));
    }

    fn advance_current(&mut self, ls: &AnimationState, elapsed: f64) -> (AnimationState, bool) {
        let ctx = TickContext {
            clock: self.clock,
            elapsed,
            variables: self.env.variables(),
        };
        let mut events = Vec::new();
        let mut finished = false;

        let out = match self.state.remaining_duration {
            None => self.state.playback.advance(ls, &ctx, &mut events),
            Some(remaining) if remaining > 0.0 => {
                let dt = remaining.min(elapsed);
                let left = remaining - dt;
                let out = self
                    .state
                    .playback
                    .advance(ls, &ctx.with_elapsed(dt), &mut events);
                if left <= 0.0 {
                    finished = true;
                    self.state.remaining_duration = Some(0.0);
                } else {
                    self.state.remaining_duration = Some(left);
                }
                out
            }
            Some(_) => ls.at(ls.time),
        };

        finished |= events
            .iter()
            .any(|event| event.kind == PlaybackEventKind::Finish);
        (out, finished)
    }

    /// Advances the current state, any transition and any morphing by `elapsed` seconds.
    pub fn advance(&mut self, ls: &AnimationState, elapsed: f64) -> AnimationState {
        self.clock += elapsed;
        self.elapsed = elapsed;

        let (mut out, finished) = self.advance_current(ls, elapsed);
        if finished {
            self.handle(&InteractiveEvent::Finish);
        }

        self.setup_morphing(false);

        let mut completed = None;
        if let Some(transition) = self.transition.as_mut() {
            let ctx = TickContext {
                clock: self.clock,
                elapsed,
                variables: self.env.variables(),
            };
            let target = out.clone();
            out = transition.resolve(
                &target,
                target.clone(),
                &ctx,
                true,
                MAX_MORPHS,
                self.diagnostics.as_mut(),
            );
            if transition.is_complete() {
                completed = Some(StateTransitionEvent {
                    from: transition.from.clone(),
                    to: self.state.named.clone(),
                    transition: transition.properties.clone(),
                });
            }
        }
        if let Some(event) = completed {
            self.transition = None;
            self.transition_end.emit(&event);
        }

        self.apply_morphing(&mut out);
        out
    }
}

impl AnimationDriver for InteractiveDriver {
    fn advance(&mut self, state: &AnimationState, elapsed: f64) -> AnimationState {
        InteractiveDriver::advance(self, state, elapsed)
    }
}

impl InteractiveEventHandler for InteractiveDriver {
    fn update_builtins(&mut self, update: &BuiltinUpdate) {
        InteractiveDriver::update_builtins(self, update);
    }

    fn handle(&mut self, event: &InteractiveEvent) {
        InteractiveDriver::handle(self, event);
    }
}
