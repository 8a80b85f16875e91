use crate::expression::Formula;
use crate::runtime::variables::PlaybackSymbols;
use crate::runtime::{AnimationState, PlaybackClock, PlaybackEvent, Variables};
use crate::{Diagnostic, DiagnosticSink, LoopPolicy, NamedState, NumberOrFormula, State};

/// Per-tick inputs shared by every state being advanced.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TickContext<'a> {
    /// Seconds since the driver started.
    pub clock: f64,
    pub elapsed: f64,
    pub variables: &'a Variables,
}

impl TickContext<'_> {
    pub fn with_elapsed(self, elapsed: f64) -> Self {
        Self { elapsed, ..self }
    }
}

pub(crate) fn compile_formula(
    source: &str,
    default: f64,
    diagnostics: &mut dyn DiagnosticSink,
) -> Formula {
    let formula = Formula::new(source, default);
    if let Some(error) = formula.compile_error() {
        diagnostics.report(Diagnostic::FormulaCompile {
            source: source.to_string(),
            error: error.clone(),
        });
    }
    formula
}

/// The playback clock of a state together with its formula controls.
#[derive(Clone, Debug)]
pub(crate) struct StatePlayback {
    pub clock: PlaybackClock,
    speed_control: Option<Formula>,
    playhead_control: Option<Formula>,
}

impl StatePlayback {
    pub fn for_state(state: &State, diagnostics: &mut dyn DiagnosticSink) -> Self {
        let mut clock = PlaybackClock::new();
        clock.set_segment(Some(state.segment));
        clock.seek(state.segment.start);
        clock.set_loop_policy(state.loop_policy.unwrap_or(LoopPolicy::Count(1)));
        if let Some(direction) = state.direction {
            clock.set_direction(direction);
        }

        let speed_control = match &state.speed {
            Some(NumberOrFormula::Number(speed)) => {
                clock.set_speed(*speed);
                None
            }
            Some(NumberOrFormula::Formula(source)) => {
                Some(compile_formula(source, 1.0, diagnostics))
            }
            None => None,
        };
        let playhead_control = state
            .playhead
            .as_deref()
            .map(|source| compile_formula(source, 0.0, diagnostics));

        Self {
            clock,
            speed_control,
            playhead_control,
        }
    }

    pub fn playhead_control(&self) -> Option<&Formula> {
        self.playhead_control.as_ref()
    }

    /// `variables` overlaid with the playback values of this state.
    pub fn symbols<'a>(
        &self,
        variables: &'a Variables,
        clock: f64,
        elapsed: f64,
    ) -> PlaybackSymbols<'a> {
        PlaybackSymbols {
            base: variables,
            time: clock,
            time_diff: elapsed,
            playhead: self.clock.time_in_segment(),
            playhead_progress: self.clock.progress(),
            playhead_abs: self.clock.time(),
        }
    }

    pub fn advance(
        &mut self,
        ls: &AnimationState,
        ctx: &TickContext<'_>,
        events: &mut Vec<PlaybackEvent>,
    ) -> AnimationState {
        let symbols = self.symbols(ctx.variables, ctx.clock, ctx.elapsed);

        if let Some(speed) = &self.speed_control {
            self.clock.set_speed(speed.call(&symbols));
        }

        let mut time = self.clock.advance(&ls.info, ctx.elapsed, events);
        if let Some(playhead) = &self.playhead_control {
            let segment = self.clock.effective_segment();
            time = playhead.call(&symbols) * segment.length() + segment.start;
        }
        ls.at(time)
    }
}

/// A live instance of a state.
#[derive(Clone, Debug)]
pub(crate) struct StateState {
    pub named: NamedState,
    pub playback: StatePlayback,
    /// Seconds left before a state with a fixed duration finishes.
    pub remaining_duration: Option<f64>,
}

impl StateState {
    pub fn enter(named: NamedState, diagnostics: &mut dyn DiagnosticSink) -> Self {
        let playback = StatePlayback::for_state(&named.state, diagnostics);
        let remaining_duration = named.state.duration;
        Self {
            named,
            playback,
            remaining_duration,
        }
    }

    pub fn state(&self) -> &State {
        &self.named.state
    }
}
