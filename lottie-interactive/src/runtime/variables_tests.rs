use crate::expression::{Formula, Symbols, Value};
use crate::runtime::variables::PlaybackSymbols;
use crate::runtime::{
    BuiltinUpdate, BuiltinVariables, FormulaInputs, UserValue, UserVariables,
    VariableEnvironment, is_valid_variable_name, merge_variables,
};

#[test]
fn builtins_are_always_present() {
    let vars = merge_variables(&BuiltinVariables::default(), &UserVariables::new());

    assert_eq!(vars.len(), 14);
    assert_eq!(vars.get("time"), Some(&Value::Number(0.0)));
    assert_eq!(vars.get("mouse.progress.y"), Some(&Value::Number(0.0)));
    assert_eq!(vars.get("mouse.buttons.middle"), Some(&Value::Bool(false)));
}

#[test]
fn points_are_flattened_into_components() {
    let mut user = UserVariables::new();
    user.insert("target".into(), UserValue::Point { x: 3.0, y: -1.5 });

    let vars = merge_variables(&BuiltinVariables::default(), &user);

    assert_eq!(vars.get("target.x"), Some(&Value::Number(3.0)));
    assert_eq!(vars.get("target.y"), Some(&Value::Number(-1.5)));
    assert!(!vars.contains_key("target"));
}

#[test]
fn invalid_names_are_skipped_and_unsupported_values_read_as_zero() {
    let mut user = UserVariables::new();
    user.insert("1st".into(), UserValue::Number(1.0));
    user.insert("has space".into(), UserValue::Number(2.0));
    user.insert("label".into(), UserValue::Unsupported);
    user.insert("armed".into(), UserValue::Bool(true));

    let vars = merge_variables(&BuiltinVariables::default(), &user);

    assert!(!vars.contains_key("1st"));
    assert!(!vars.contains_key("has space"));
    assert_eq!(vars.get("label"), Some(&Value::Number(0.0)));
    assert_eq!(vars.get("armed"), Some(&Value::Bool(true)));
}

#[test]
fn user_variables_override_builtins() {
    let mut user = UserVariables::new();
    user.insert("time".into(), UserValue::Number(42.0));

    let vars = merge_variables(&BuiltinVariables::default(), &user);

    assert_eq!(vars.get("time"), Some(&Value::Number(42.0)));
}

#[test]
fn variable_names() {
    assert!(is_valid_variable_name("x"));
    assert!(is_valid_variable_name("_private"));
    assert!(is_valid_variable_name("mouse.progress.x"));
    assert!(is_valid_variable_name("a1_b2"));
    assert!(!is_valid_variable_name(""));
    assert!(!is_valid_variable_name("9lives"));
    assert!(!is_valid_variable_name(".x"));
    assert!(!is_valid_variable_name("a-b"));
}

#[test]
fn partial_builtin_updates_leave_other_fields() {
    let mut env = VariableEnvironment::new();
    env.update_builtins(&BuiltinUpdate {
        mouse_x: Some(10.0),
        mouse_y: Some(20.0),
        ..BuiltinUpdate::default()
    });
    env.update_builtins(&BuiltinUpdate::buttons(true, false, true));

    let builtins = env.builtins();
    assert_eq!(builtins.mouse_x, 10.0);
    assert_eq!(builtins.mouse_y, 20.0);
    assert!(builtins.mouse_buttons_left);
    assert!(!builtins.mouse_buttons_right);
    assert!(builtins.mouse_buttons_middle);
    assert_eq!(env.variables().get("mouse.x"), Some(&Value::Number(10.0)));
    assert_eq!(
        env.variables().get("mouse.buttons.left"),
        Some(&Value::Bool(true))
    );
}

#[test]
fn formula_inputs_are_visible_to_formulas() {
    let mut env = VariableEnvironment::new();
    let formula = Formula::new("speed * 2", -1.0);
    assert_eq!(formula.call(env.variables()), -1.0);

    {
        let mut inputs = FormulaInputs::new(&mut env);
        inputs.set("speed", 1.5);
        assert_eq!(inputs.get("speed"), Some(UserValue::Number(1.5)));
    }
    assert_eq!(formula.call(env.variables()), 3.0);

    {
        let mut inputs = FormulaInputs::new(&mut env);
        assert_eq!(inputs.delete("speed"), Some(UserValue::Number(1.5)));
        assert_eq!(inputs.delete("speed"), None);
    }
    assert_eq!(formula.call(env.variables()), -1.0);
}

#[test]
fn clearing_inputs_keeps_builtins() {
    let mut env = VariableEnvironment::new();
    {
        let mut inputs = FormulaInputs::new(&mut env);
        inputs.set("a", 1.0);
        inputs.set("b", (1.0, 2.0));
        inputs.clear();
        assert!(inputs.values().is_empty());
    }
    assert_eq!(env.variables().len(), 14);
}

#[test]
fn playback_symbols_shadow_shared_variables() {
    let mut env = VariableEnvironment::new();
    env.update_builtins(&BuiltinUpdate {
        time: Some(100.0),
        mouse_x: Some(7.0),
        ..BuiltinUpdate::default()
    });
    let symbols = PlaybackSymbols {
        base: env.variables(),
        time: 1.0,
        time_diff: 0.5,
        playhead: 0.25,
        playhead_progress: 0.125,
        playhead_abs: 2.25,
    };

    assert_eq!(symbols.lookup("time"), Some(Value::Number(1.0)));
    assert_eq!(symbols.lookup("time.diff"), Some(Value::Number(0.5)));
    assert_eq!(symbols.lookup("playhead"), Some(Value::Number(0.25)));
    assert_eq!(symbols.lookup("playhead.progress"), Some(Value::Number(0.125)));
    assert_eq!(symbols.lookup("playhead.abs"), Some(Value::Number(2.25)));
    assert_eq!(symbols.lookup("mouse.x"), Some(Value::Number(7.0)));
    assert_eq!(symbols.lookup("missing"), None);
}

#[cfg(feature = "json")]
#[test]
fn user_values_from_json() {
    let parse = |s: &str| UserValue::from_json(&serde_json::from_str(s).unwrap());

    assert_eq!(parse("2.5"), UserValue::Number(2.5));
    assert_eq!(parse("true"), UserValue::Bool(true));
    assert_eq!(parse(r#"{"x": 1, "y": 2}"#), UserValue::Point { x: 1.0, y: 2.0 });
    assert_eq!(parse(r#"{"x": 1}"#), UserValue::Unsupported);
    assert_eq!(parse(r#""text""#), UserValue::Unsupported);
    assert_eq!(parse("[1, 2]"), UserValue::Unsupported);
}
