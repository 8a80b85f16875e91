use crate::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum PointerEventKind {
    Click,
    MouseDown,
    MouseUp,
    MouseEnter,
    MouseLeave,
}

impl PointerEventKind {
    pub const ALL: [PointerEventKind; 5] = [
        PointerEventKind::Click,
        PointerEventKind::MouseDown,
        PointerEventKind::MouseUp,
        PointerEventKind::MouseEnter,
        PointerEventKind::MouseLeave,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PointerEventKind::Click => "click",
            PointerEventKind::MouseDown => "mouseDown",
            PointerEventKind::MouseUp => "mouseUp",
            PointerEventKind::MouseEnter => "mouseEnter",
            PointerEventKind::MouseLeave => "mouseLeave",
        }
    }

    /// Whether a transition on this kind makes its target clickable.
    pub fn is_press(self) -> bool {
        matches!(
            self,
            PointerEventKind::Click | PointerEventKind::MouseDown | PointerEventKind::MouseUp
        )
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// An event that may trigger a transition out of the current state.
///
/// The string form is `<kind>` or `<kind>:<target>` for pointer events, `finish`, and
/// `custom:<name>`. Transition tables are keyed by this string.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum InteractiveEvent {
    Pointer {
        kind: PointerEventKind,
        target: Option<String>,
    },
    Finish,
    Custom(String),
}

impl InteractiveEvent {
    pub fn pointer(kind: PointerEventKind) -> Self {
        InteractiveEvent::Pointer { kind, target: None }
    }

    pub fn targeted(kind: PointerEventKind, target: impl Into<String>) -> Self {
        InteractiveEvent::Pointer {
            kind,
            target: Some(target.into()),
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        InteractiveEvent::Custom(name.into())
    }
}

impl fmt::Display for InteractiveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractiveEvent::Pointer { kind, target: None } => f.write_str(kind.as_str()),
            InteractiveEvent::Pointer {
                kind,
                target: Some(target),
            } => write!(f, "{}:{}", kind.as_str(), target),
            InteractiveEvent::Finish => f.write_str("finish"),
            InteractiveEvent::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

impl FromStr for InteractiveEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, target) = match s.split_once(':') {
            Some((kind, target)) => (kind, Some(target)),
            None => (s, None),
        };

        match (kind, target) {
            ("finish", None) => Ok(InteractiveEvent::Finish),
            ("custom", Some(name)) => Ok(InteractiveEvent::Custom(name.to_string())),
            (kind, target) => match PointerEventKind::parse(kind) {
                Some(kind) => Ok(InteractiveEvent::Pointer {
                    kind,
                    target: target.map(str::to_string),
                }),
                None => Err(Error::InvalidValue {
                    message: format!("unknown event '{s}'"),
                }),
            },
        }
    }
}
