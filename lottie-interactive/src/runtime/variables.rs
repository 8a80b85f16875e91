//! Variables visible to formulas.
//!
//! Built-in variables describe time, the playhead and the pointer. User variables are set by
//! the embedding application; points are flattened into `<name>.x` / `<name>.y`.

use crate::expression::{Symbols, Value};
use std::collections::{BTreeMap, HashMap};

/// Flat symbol table handed to formulas.
pub type Variables = HashMap<String, Value>;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BuiltinVariables {
    /// Seconds since the driver started.
    pub time: f64,
    /// Seconds between the previous and the current frame.
    pub time_diff: f64,
    /// Playhead position in the current state, in seconds from the segment start.
    pub playhead: f64,
    /// Playhead position as 0..1 within the segment.
    pub playhead_progress: f64,
    /// Absolute playhead position in seconds.
    pub playhead_abs: f64,
    /// Pointer position relative to the top-left corner of the animation.
    pub mouse_x: f64,
    pub mouse_y: f64,
    /// Pointer position as 0..1 within the animation bounds.
    pub mouse_progress_x: f64,
    pub mouse_progress_y: f64,
    /// Pointer position relative to the viewport.
    pub mouse_abs_x: f64,
    pub mouse_abs_y: f64,
    pub mouse_buttons_left: bool,
    pub mouse_buttons_right: bool,
    pub mouse_buttons_middle: bool,
}

impl BuiltinVariables {
    /// Every variable with its formula name.
    pub fn entries(&self) -> [(&'static str, Value); 14] {
        [
            ("time", Value::Number(self.time)),
            ("time.diff", Value::Number(self.time_diff)),
            ("playhead", Value::Number(self.playhead)),
            ("playhead.progress", Value::Number(self.playhead_progress)),
            ("playhead.abs", Value::Number(self.playhead_abs)),
            ("mouse.x", Value::Number(self.mouse_x)),
            ("mouse.y", Value::Number(self.mouse_y)),
            ("mouse.progress.x", Value::Number(self.mouse_progress_x)),
            ("mouse.progress.y", Value::Number(self.mouse_progress_y)),
            ("mouse.abs.x", Value::Number(self.mouse_abs_x)),
            ("mouse.abs.y", Value::Number(self.mouse_abs_y)),
            ("mouse.buttons.left", Value::Bool(self.mouse_buttons_left)),
            ("mouse.buttons.right", Value::Bool(self.mouse_buttons_right)),
            ("mouse.buttons.middle", Value::Bool(self.mouse_buttons_middle)),
        ]
    }

    pub fn apply(&mut self, update: &BuiltinUpdate) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.time, update.time);
        set(&mut self.time_diff, update.time_diff);
        set(&mut self.playhead, update.playhead);
        set(&mut self.playhead_progress, update.playhead_progress);
        set(&mut self.playhead_abs, update.playhead_abs);
        set(&mut self.mouse_x, update.mouse_x);
        set(&mut self.mouse_y, update.mouse_y);
        set(&mut self.mouse_progress_x, update.mouse_progress_x);
        set(&mut self.mouse_progress_y, update.mouse_progress_y);
        set(&mut self.mouse_abs_x, update.mouse_abs_x);
        set(&mut self.mouse_abs_y, update.mouse_abs_y);
        set(&mut self.mouse_buttons_left, update.mouse_buttons_left);
        set(&mut self.mouse_buttons_right, update.mouse_buttons_right);
        set(&mut self.mouse_buttons_middle, update.mouse_buttons_middle);
    }
}

/// A partial update of [`BuiltinVariables`]; `None` fields are left untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BuiltinUpdate {
    pub time: Option<f64>,
    pub time_diff: Option<f64>,
    pub playhead: Option<f64>,
    pub playhead_progress: Option<f64>,
    pub playhead_abs: Option<f64>,
    pub mouse_x: Option<f64>,
    pub mouse_y: Option<f64>,
    pub mouse_progress_x: Option<f64>,
    pub mouse_progress_y: Option<f64>,
    pub mouse_abs_x: Option<f64>,
    pub mouse_abs_y: Option<f64>,
    pub mouse_buttons_left: Option<bool>,
    pub mouse_buttons_right: Option<bool>,
    pub mouse_buttons_middle: Option<bool>,
}

impl BuiltinUpdate {
    pub fn buttons(left: bool, right: bool, middle: bool) -> Self {
        Self {
            mouse_buttons_left: Some(left),
            mouse_buttons_right: Some(right),
            mouse_buttons_middle: Some(middle),
            ..Self::default()
        }
    }
}

/// A value set by the embedding application.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UserValue {
    Number(f64),
    Bool(bool),
    Point { x: f64, y: f64 },
    /// Anything else; reads as 0.
    Unsupported,
}

impl From<f64> for UserValue {
    fn from(value: f64) -> Self {
        UserValue::Number(value)
    }
}

impl From<bool> for UserValue {
    fn from(value: bool) -> Self {
        UserValue::Bool(value)
    }
}

impl From<(f64, f64)> for UserValue {
    fn from((x, y): (f64, f64)) -> Self {
        UserValue::Point { x, y }
    }
}

#[cfg(feature = "json")]
impl UserValue {
    /// Numbers, booleans and `{ "x": number, "y": number }` objects; anything else is unsupported.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Number(n) => n.as_f64().map_or(UserValue::Unsupported, UserValue::Number),
            Json::Bool(b) => UserValue::Bool(*b),
            Json::Object(map) => match (
                map.get("x").and_then(Json::as_f64),
                map.get("y").and_then(Json::as_f64),
            ) {
                (Some(x), Some(y)) => UserValue::Point { x, y },
                _ => UserValue::Unsupported,
            },
            _ => UserValue::Unsupported,
        }
    }
}

pub type UserVariables = BTreeMap<String, UserValue>;

/// `[a-zA-Z_][a-zA-Z0-9_.]*`
pub fn is_valid_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Builds the symbol table: built-ins first, then every validly named user variable.
pub fn merge_variables(builtin: &BuiltinVariables, user: &UserVariables) -> Variables {
    let mut vars: Variables = builtin
        .entries()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    for (name, value) in user {
        if !is_valid_variable_name(name) {
            continue;
        }
        match *value {
            UserValue::Point { x, y } => {
                vars.insert(format!("{name}.x"), Value::Number(x));
                vars.insert(format!("{name}.y"), Value::Number(y));
            }
            UserValue::Number(n) => {
                vars.insert(name.clone(), Value::Number(n));
            }
            UserValue::Bool(b) => {
                vars.insert(name.clone(), Value::Bool(b));
            }
            UserValue::Unsupported => {
                vars.insert(name.clone(), Value::Number(0.0));
            }
        }
    }
    vars
}

/// Built-in and user variables, with their merged symbol table kept current.
#[derive(Clone, Debug, Default)]
pub struct VariableEnvironment {
    builtins: BuiltinVariables,
    user: UserVariables,
    merged: Variables,
}

impl VariableEnvironment {
    pub fn new() -> Self {
        let mut env = Self::default();
        env.remerge();
        env
    }

    pub fn builtins(&self) -> &BuiltinVariables {
        &self.builtins
    }

    pub fn user(&self) -> &UserVariables {
        &self.user
    }

    pub fn variables(&self) -> &Variables {
        &self.merged
    }

    pub fn update_builtins(&mut self, update: &BuiltinUpdate) {
        self.builtins.apply(update);
        self.remerge();
    }

    /// Replaces every user variable.
    pub fn set_user_variables(&mut self, user: UserVariables) {
        self.user = user;
        self.remerge();
    }

    fn remerge(&mut self) {
        self.merged = merge_variables(&self.builtins, &self.user);
    }
}

/// Registry of user inputs for formulas. Every change is visible to the next evaluation.
pub struct FormulaInputs<'a> {
    env: &'a mut VariableEnvironment,
}

impl<'a> FormulaInputs<'a> {
    pub(crate) fn new(env: &'a mut VariableEnvironment) -> Self {
        Self { env }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<UserValue>) {
        self.env.user.insert(name.into(), value.into());
        self.env.remerge();
    }

    pub fn get(&self, name: &str) -> Option<UserValue> {
        self.env.user.get(name).copied()
    }

    /// Returns the removed value, if any.
    pub fn delete(&mut self, name: &str) -> Option<UserValue> {
        let removed = self.env.user.remove(name);
        if removed.is_some() {
            self.env.remerge();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.env.user.clear();
        self.env.remerge();
    }

    pub fn values(&self) -> &UserVariables {
        &self.env.user
    }
}

/// Time and playhead of the state being advanced, layered over the shared variables.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PlaybackSymbols<'a> {
    pub base: &'a Variables,
    pub time: f64,
    pub time_diff: f64,
    pub playhead: f64,
    pub playhead_progress: f64,
    pub playhead_abs: f64,
}

impl Symbols for PlaybackSymbols<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        let value = match name {
            "time" => self.time,
            "time.diff" => self.time_diff,
            "playhead" => self.playhead,
            "playhead.progress" => self.playhead_progress,
            "playhead.abs" => self.playhead_abs,
            _ => return self.base.lookup(name),
        };
        Some(Value::Number(value))
    }
}
