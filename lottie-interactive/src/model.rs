use crate::{AnimationInfo, BezierEasing, Error};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Version tag of the supported interactivity definition format.
pub const INTERACTIVITY_VERSION: &str = "v1";

/// Name reported for states that are not part of the active definition.
pub const CUSTOM_STATE_NAME: &str = "<custom>";

/// A `[start, end]` span of the animation, in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn clamp(&self, time: f64) -> f64 {
        time.max(self.start).min(self.end)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// How many times a segment plays before finishing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoopPolicy {
    Infinite,
    /// Play the segment this many times. `false` in authored content maps to `Count(1)`.
    Count(u32),
}

impl Default for LoopPolicy {
    fn default() -> Self {
        LoopPolicy::Count(1)
    }
}

impl From<bool> for LoopPolicy {
    fn from(value: bool) -> Self {
        if value {
            LoopPolicy::Infinite
        } else {
            LoopPolicy::Count(1)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NumberOrFormula {
    Number(f64),
    Formula(String),
}

impl From<f64> for NumberOrFormula {
    fn from(value: f64) -> Self {
        NumberOrFormula::Number(value)
    }
}

impl From<&str> for NumberOrFormula {
    fn from(value: &str) -> Self {
        NumberOrFormula::Formula(value.to_string())
    }
}

/// Where the playhead of a newly entered state starts.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StartAt {
    #[default]
    Start,
    End,
    Proportional,
    Wrap,
    Clamp,
    /// An authored value this runtime does not understand.
    Unknown(String),
}

impl StartAt {
    pub fn parse(value: &str) -> Self {
        match value {
            "start" => StartAt::Start,
            "end" => StartAt::End,
            "proportional" => StartAt::Proportional,
            "wrap" => StartAt::Wrap,
            "clamp" => StartAt::Clamp,
            other => StartAt::Unknown(other.to_string()),
        }
    }
}

/// How the playhead of a morphing partner follows the playhead of the current state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TimeRemap {
    #[default]
    Proportional,
    Wrap,
    Clamp,
    Unknown(String),
}

impl TimeRemap {
    pub fn parse(value: &str) -> Self {
        match value {
            "proportional" => TimeRemap::Proportional,
            "wrap" => TimeRemap::Wrap,
            "clamp" => TimeRemap::Clamp,
            other => TimeRemap::Unknown(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionProperties {
    /// Seconds; `None` or `0` switches instantly.
    pub duration: Option<f64>,
    pub start_at: Option<StartAt>,
    pub easing: Option<BezierEasing>,
}

impl TransitionProperties {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Duration of a blended transition, or `None` when the switch is instant.
    pub fn blend_duration(&self) -> Option<f64> {
        self.duration.filter(|d| *d > 0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub go_to: String,
    pub properties: TransitionProperties,
}

impl Transition {
    pub fn to(state: impl Into<String>) -> Self {
        Self {
            go_to: state.into(),
            properties: TransitionProperties::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MorphingDef {
    pub other_state: String,
    pub time_remap: Option<TimeRemap>,
    /// Blend strength in `[0, 1]`; 1 shows the other state fully.
    pub strength: NumberOrFormula,
}

/// One state of an interactive animation.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub segment: Segment,
    pub speed: Option<NumberOrFormula>,
    pub direction: Option<Direction>,
    pub loop_policy: Option<LoopPolicy>,
    /// Fixed lifetime in seconds, measured independently of looping.
    pub duration: Option<f64>,
    pub morphing: Option<MorphingDef>,
    /// Formula giving the playhead as a 0..1 progress through the segment.
    pub playhead: Option<String>,
    /// Transitions keyed by event string, see [`crate::InteractiveEvent`].
    pub on: BTreeMap<String, Transition>,
}

impl State {
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            speed: None,
            direction: None,
            loop_policy: None,
            duration: None,
            morphing: None,
            playhead: None,
            on: BTreeMap::new(),
        }
    }

    /// The empty state used when no definition can be entered.
    pub fn empty() -> Self {
        Self {
            loop_policy: Some(LoopPolicy::Count(1)),
            speed: Some(NumberOrFormula::Number(1.0)),
            direction: Some(Direction::Forward),
            ..Self::new(Segment::new(0.0, 0.0))
        }
    }

    pub fn with_transition(mut self, event: impl Into<String>, transition: Transition) -> Self {
        self.on.insert(event.into(), transition);
        self
    }

    pub fn validate(&self, name: &str) -> Result<(), Error> {
        let Segment { start, end } = self.segment;
        if !(start <= end) {
            return Err(Error::InvalidSegment {
                state: name.to_string(),
                start,
                end,
            });
        }
        if let Some(duration) = self.duration {
            if !(duration >= 0.0) {
                return Err(Error::InvalidValue {
                    message: format!("duration of state '{name}' must be >= 0, got {duration}"),
                });
            }
        }
        Ok(())
    }
}

/// A state together with the name it has in the definition, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedState {
    pub name: Option<String>,
    pub state: Arc<State>,
}

impl NamedState {
    pub fn custom(state: State) -> Self {
        Self {
            name: None,
            state: Arc::new(state),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(CUSTOM_STATE_NAME)
    }
}

impl fmt::Display for NamedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// States and transitions of an interactive animation.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractivityDefinition {
    pub version: String,
    pub states: BTreeMap<String, Arc<State>>,
    pub initial_state: String,
}

impl InteractivityDefinition {
    pub fn new(initial_state: impl Into<String>) -> Self {
        Self {
            version: INTERACTIVITY_VERSION.to_string(),
            states: BTreeMap::new(),
            initial_state: initial_state.into(),
        }
    }

    pub fn with_state(mut self, name: impl Into<String>, state: State) -> Self {
        self.states.insert(name.into(), Arc::new(state));
        self
    }

    /// Definition of a non-interactive animation: one `default` state spanning `[0, duration]`.
    pub fn single_state(duration: f64) -> Self {
        Self::new("default").with_state("default", State::new(Segment::new(0.0, duration)))
    }

    pub fn state(&self, name: &str) -> Option<NamedState> {
        self.states.get(name).map(|state| NamedState {
            name: Some(name.to_string()),
            state: state.clone(),
        })
    }

    pub fn initial(&self) -> Result<NamedState, Error> {
        self.state(&self.initial_state)
            .ok_or_else(|| Error::UnknownInitialState {
                name: self.initial_state.clone(),
            })
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.version != INTERACTIVITY_VERSION {
            return Err(Error::UnsupportedVersion {
                value: self.version.clone(),
            });
        }
        for (name, state) in &self.states {
            state.validate(name)?;
        }
        Ok(())
    }

    /// Layer targets referenced by pointer events across all states, in first-seen order.
    pub fn observed_targets(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for state in self.states.values() {
            for key in state.on.keys() {
                let Some((kind, target)) = key.split_once(':') else {
                    continue;
                };
                if kind == "custom" || target.is_empty() {
                    continue;
                }
                if !out.iter().any(|t| t == target) {
                    out.push(target.to_string());
                }
            }
        }
        out
    }
}

/// The parts of a Lottie document the interactive runtime reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LottieDocument {
    pub info: AnimationInfo,
    pub interactivity: Option<InteractivityDefinition>,
    /// Class names of every layer, including layers of precompositions.
    pub layer_classes: Vec<String>,
}

impl LottieDocument {
    pub fn duration(&self) -> f64 {
        self.info.duration()
    }
}
