use crate::bezier::{BezierEasing, Point};
use crate::{
    AnimationInfo, Direction, Error, INTERACTIVITY_VERSION, InteractivityDefinition, LoopPolicy,
    LottieDocument, MorphingDef, NumberOrFormula, PlayerConfig, Segment, StartAt, State,
    TimeRemap, Transition, TransitionProperties,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct DefinitionDef {
    #[serde(rename = "__version")]
    version: String,
    #[serde(rename = "initialState")]
    initial_state: String,
    #[serde(default)]
    states: BTreeMap<String, StateDef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrFormulaDef {
    Number(f64),
    Formula(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoopDef {
    Bool(bool),
    Count(u32),
}

#[derive(Debug, Deserialize)]
struct StateDef {
    segment: [f64; 2],
    #[serde(default)]
    speed: Option<NumberOrFormulaDef>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default, rename = "loop")]
    loop_policy: Option<LoopDef>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    morphing: Option<MorphingDefDef>,
    #[serde(default)]
    playhead: Option<String>,
    #[serde(default)]
    on: BTreeMap<String, TransitionDef>,
}

#[derive(Debug, Deserialize)]
struct MorphingDefDef {
    #[serde(rename = "otherState")]
    other_state: String,
    #[serde(default, rename = "timeRemap")]
    time_remap: Option<String>,
    strength: NumberOrFormulaDef,
}

#[derive(Debug, Deserialize)]
struct PointDef {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct EasingDef {
    o: PointDef,
    i: PointDef,
}

#[derive(Debug, Deserialize)]
struct TransitionDef {
    #[serde(rename = "goTo")]
    go_to: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default, rename = "startAt")]
    start_at: Option<String>,
    #[serde(default)]
    easing: Option<EasingDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlayerConfigDef {
    autoplay: Option<bool>,
    #[serde(rename = "loop")]
    loop_policy: Option<LoopDef>,
    speed: Option<f64>,
    direction: Option<String>,
    time_multiplier: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LottieRoot {
    #[serde(default)]
    fr: Option<f64>,
    #[serde(default)]
    ip: Option<f64>,
    #[serde(default)]
    op: Option<f64>,
    #[serde(default)]
    layers: Vec<LayerDef>,
    #[serde(default)]
    assets: Vec<AssetDef>,
    #[serde(default)]
    metadata: Option<MetadataDef>,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataDef {
    #[serde(default, rename = "lottielabInteractivity")]
    interactivity: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LayerDef {
    #[serde(default)]
    cl: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssetDef {
    #[serde(default)]
    layers: Vec<LayerDef>,
}

fn parse_error(e: serde_json::Error) -> Error {
    Error::JsonParse {
        message: e.to_string(),
    }
}

impl From<NumberOrFormulaDef> for NumberOrFormula {
    fn from(value: NumberOrFormulaDef) -> Self {
        match value {
            NumberOrFormulaDef::Number(n) => NumberOrFormula::Number(n),
            NumberOrFormulaDef::Formula(s) => NumberOrFormula::Formula(s),
        }
    }
}

impl From<PointDef> for Point {
    fn from(value: PointDef) -> Self {
        Point::new(value.x, value.y)
    }
}

fn parse_direction(raw: &str, context: impl FnOnce() -> String) -> Result<Direction, Error> {
    match raw {
        "forward" => Ok(Direction::Forward),
        "reverse" => Ok(Direction::Reverse),
        other => Err(Error::InvalidValue {
            message: format!("unknown direction '{other}' in {}", context()),
        }),
    }
}

fn convert_loop(raw: LoopDef) -> LoopPolicy {
    match raw {
        LoopDef::Bool(b) => LoopPolicy::from(b),
        LoopDef::Count(n) => LoopPolicy::Count(n),
    }
}

fn convert_state(name: &str, def: StateDef) -> Result<State, Error> {
    let direction = def
        .direction
        .as_deref()
        .map(|raw| parse_direction(raw, || format!("state '{name}'")))
        .transpose()?;
    let loop_policy = def.loop_policy.map(convert_loop);
    let morphing = def.morphing.map(|m| MorphingDef {
        other_state: m.other_state,
        time_remap: m.time_remap.as_deref().map(TimeRemap::parse),
        strength: m.strength.into(),
    });
    let on = def
        .on
        .into_iter()
        .map(|(event, t)| {
            let transition = Transition {
                go_to: t.go_to,
                properties: TransitionProperties {
                    duration: t.duration,
                    start_at: t.start_at.as_deref().map(StartAt::parse),
                    easing: t.easing.map(|e| BezierEasing::new(e.o.into(), e.i.into())),
                },
            };
            (event, transition)
        })
        .collect();

    let state = State {
        segment: Segment::new(def.segment[0], def.segment[1]),
        speed: def.speed.map(Into::into),
        direction,
        loop_policy,
        duration: def.duration,
        morphing,
        playhead: def.playhead,
        on,
    };
    state.validate(name)?;
    Ok(state)
}

fn convert_definition(def: DefinitionDef) -> Result<InteractivityDefinition, Error> {
    if def.version != INTERACTIVITY_VERSION {
        return Err(Error::UnsupportedVersion { value: def.version });
    }

    let mut states = BTreeMap::new();
    for (name, state) in def.states {
        let state = convert_state(&name, state)?;
        states.insert(name, Arc::new(state));
    }

    Ok(InteractivityDefinition {
        version: def.version,
        states,
        initial_state: def.initial_state,
    })
}

fn embedded_version(value: &serde_json::Value) -> Option<&str> {
    value.get("__version").and_then(serde_json::Value::as_str)
}

impl InteractivityDefinition {
    /// Parses a standalone definition (`{ "__version": "v1", "initialState": .., "states": .. }`).
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let def: DefinitionDef = serde_json::from_str(input).map_err(parse_error)?;
        convert_definition(def)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, Error> {
        let def: DefinitionDef = serde_json::from_value(value).map_err(parse_error)?;
        convert_definition(def)
    }

    /// Reads the definition embedded in a Lottie document, `Ok(None)` if it is not interactive.
    pub fn from_lottie_json_str(input: &str) -> Result<Option<Self>, Error> {
        let root: LottieRoot = serde_json::from_str(input).map_err(parse_error)?;
        embedded_definition(root.metadata)
    }
}

fn embedded_definition(
    metadata: Option<MetadataDef>,
) -> Result<Option<InteractivityDefinition>, Error> {
    match metadata.and_then(|m| m.interactivity) {
        Some(value) if embedded_version(&value) == Some(INTERACTIVITY_VERSION) => {
            InteractivityDefinition::from_json_value(value).map(Some)
        }
        _ => Ok(None),
    }
}

/// Whether the Lottie document carries an interactivity definition of a supported version.
pub fn is_interactive(input: &str) -> bool {
    serde_json::from_str::<LottieRoot>(input)
        .ok()
        .and_then(|root| root.metadata)
        .and_then(|m| m.interactivity)
        .is_some_and(|value| embedded_version(&value) == Some(INTERACTIVITY_VERSION))
}

impl LottieDocument {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let root: LottieRoot = serde_json::from_str(input).map_err(parse_error)?;

        let defaults = AnimationInfo::default();
        let info = AnimationInfo::new(
            root.fr.unwrap_or(defaults.frame_rate),
            root.ip.unwrap_or(0.0),
            root.op.unwrap_or(0.0),
        );

        let layer_classes = root
            .layers
            .iter()
            .chain(root.assets.iter().flat_map(|asset| asset.layers.iter()))
            .filter_map(|layer| layer.cl.as_deref())
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect();

        Ok(Self {
            info,
            interactivity: embedded_definition(root.metadata)?,
            layer_classes,
        })
    }
}

impl PlayerConfig {
    /// Reads player options (`autoplay`, `loop`, `speed`, `direction`, `timeMultiplier`).
    /// Missing keys keep their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let def: PlayerConfigDef = serde_json::from_str(input).map_err(parse_error)?;
        let defaults = PlayerConfig::default();
        let direction = match def.direction.as_deref() {
            Some(raw) => parse_direction(raw, || "player config".to_string())?,
            None => defaults.direction,
        };
        Ok(PlayerConfig {
            autoplay: def.autoplay.unwrap_or(defaults.autoplay),
            loop_policy: def.loop_policy.map_or(defaults.loop_policy, convert_loop),
            speed: def.speed.unwrap_or(defaults.speed),
            direction,
            time_multiplier: def.time_multiplier.unwrap_or(defaults.time_multiplier),
        })
    }
}
