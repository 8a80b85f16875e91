use crate::{Error, InteractiveEvent, PointerEventKind};

#[test]
fn event_keys() {
    assert_eq!(
        InteractiveEvent::pointer(PointerEventKind::Click).to_string(),
        "click"
    );
    assert_eq!(
        InteractiveEvent::targeted(PointerEventKind::MouseLeave, "button").to_string(),
        "mouseLeave:button"
    );
    assert_eq!(InteractiveEvent::Finish.to_string(), "finish");
    assert_eq!(InteractiveEvent::custom("open").to_string(), "custom:open");
}

#[test]
fn parses_every_key_form() {
    assert_eq!(
        "mouseDown".parse::<InteractiveEvent>().unwrap(),
        InteractiveEvent::pointer(PointerEventKind::MouseDown)
    );
    assert_eq!(
        "mouseEnter:hero".parse::<InteractiveEvent>().unwrap(),
        InteractiveEvent::targeted(PointerEventKind::MouseEnter, "hero")
    );
    assert_eq!(
        "finish".parse::<InteractiveEvent>().unwrap(),
        InteractiveEvent::Finish
    );
    assert_eq!(
        "custom:a:b".parse::<InteractiveEvent>().unwrap(),
        InteractiveEvent::custom("a:b")
    );
}

#[test]
fn rejects_unknown_kinds() {
    for key in ["hover", "finish:x", "custom", ""] {
        let err = key.parse::<InteractiveEvent>().unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }), "{key}");
    }
}

#[test]
fn press_kinds() {
    let press: Vec<_> = PointerEventKind::ALL
        .into_iter()
        .filter(|kind| kind.is_press())
        .collect();
    assert_eq!(
        press,
        vec![
            PointerEventKind::Click,
            PointerEventKind::MouseDown,
            PointerEventKind::MouseUp,
        ]
    );
}
