//! Translation of pointer input into builtin variable updates and interactive events.

use crate::runtime::BuiltinUpdate;
use crate::{Diagnostic, DiagnosticSink, InteractiveEvent, PointerEventKind, State};

/// Receiver of dispatched pointer input.
pub trait InteractiveEventHandler {
    fn update_builtins(&mut self, update: &BuiltinUpdate);
    fn handle(&mut self, event: &InteractiveEvent);
}

/// Screen-space rectangle of the rendered animation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

const LEFT_BUTTON: u8 = 1;
const RIGHT_BUTTON: u8 = 2;
const MIDDLE_BUTTON: u8 = 4;

fn progress(offset: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        (offset / extent).max(0.0).min(1.0)
    } else {
        0.0
    }
}

/// Routes pointer input for the layers a definition listens to.
#[derive(Clone, Debug, Default)]
pub struct EventDispatcher {
    targets: Vec<String>,
}

impl EventDispatcher {
    /// Keeps the observed targets that exist among `layer_classes`.
    ///
    /// Targets listed twice and targets no layer carries are reported. Without layer classes
    /// every target is kept.
    pub fn new(
        observed: &[String],
        layer_classes: Option<&[String]>,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Self {
        let mut targets: Vec<String> = Vec::new();
        for target in observed {
            if targets.contains(target) {
                diagnostics.report(Diagnostic::DuplicateTarget {
                    target: target.clone(),
                });
                continue;
            }
            if let Some(classes) = layer_classes {
                if !classes.contains(target) {
                    diagnostics.report(Diagnostic::MissingTarget {
                        target: target.clone(),
                    });
                    continue;
                }
            }
            targets.push(target.clone());
        }
        Self { targets }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Updates the pointer position variables. `client_x`/`client_y` are viewport coordinates.
    pub fn pointer_move<H: InteractiveEventHandler + ?Sized>(
        &self,
        handler: &mut H,
        client_x: f64,
        client_y: f64,
        bounds: Bounds,
    ) {
        let x = client_x - bounds.left;
        let y = client_y - bounds.top;
        handler.update_builtins(&BuiltinUpdate {
            mouse_x: Some(x),
            mouse_y: Some(y),
            mouse_abs_x: Some(client_x),
            mouse_abs_y: Some(client_y),
            mouse_progress_x: Some(progress(x, bounds.width)),
            mouse_progress_y: Some(progress(y, bounds.height)),
            ..BuiltinUpdate::default()
        });
    }

    /// `buttons` is a bit mask: 1 left, 2 right, 4 middle.
    pub fn pointer_down<H: InteractiveEventHandler + ?Sized>(&self, handler: &mut H, buttons: u8) {
        handler.update_builtins(&BuiltinUpdate::buttons(
            buttons & LEFT_BUTTON != 0,
            buttons & RIGHT_BUTTON != 0,
            buttons & MIDDLE_BUTTON != 0,
        ));
    }

    pub fn pointer_up<H: InteractiveEventHandler + ?Sized>(&self, handler: &mut H) {
        handler.update_builtins(&BuiltinUpdate::buttons(false, false, false));
    }

    /// Dispatches a pointer event over the animation.
    ///
    /// `hit` holds the layer classes under the pointer. Each observed one receives a targeted
    /// event, innermost first as given, then the whole animation receives an untargeted event.
    pub fn pointer_event<H, S>(&self, handler: &mut H, kind: PointerEventKind, hit: &[S])
    where
        H: InteractiveEventHandler + ?Sized,
        S: AsRef<str>,
    {
        for class in hit {
            let class = class.as_ref();
            if self.targets.iter().any(|target| target == class) {
                handler.handle(&InteractiveEvent::targeted(kind, class));
            }
        }
        handler.handle(&InteractiveEvent::pointer(kind));
    }
}

/// Pointer targets a state reacts to with a press.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClickableTargets {
    /// An untargeted press transition exists.
    pub full: bool,
    pub targets: Vec<String>,
}

pub fn clickable_targets(state: &State) -> ClickableTargets {
    let mut out = ClickableTargets::default();
    for key in state.on.keys() {
        let (kind, target) = match key.split_once(':') {
            Some((kind, target)) => (kind, Some(target)),
            None => (key.as_str(), None),
        };
        let is_press = PointerEventKind::ALL
            .into_iter()
            .any(|k| k.as_str() == kind && k.is_press());
        if !is_press {
            continue;
        }
        match target.filter(|t| !t.is_empty()) {
            Some(target) => {
                if !out.targets.iter().any(|t| t == target) {
                    out.targets.push(target.to_string());
                }
            }
            None => out.full = true,
        }
    }
    out
}
