use crate::bezier;
use crate::runtime::AnimationState;
use crate::runtime::state::{StateState, TickContext};
use crate::{Diagnostic, DiagnosticSink, MorphOperation, NamedState, TransitionProperties};

/// What a transition blends away from.
#[derive(Clone, Debug)]
pub(crate) enum Previous {
    Resolved(StateState),
    /// A transition interrupted before it completed. `next` is the state it was heading to.
    Pending {
        transition: Box<TransitionState>,
        next: StateState,
    },
}

/// A blend from `previous` towards the current state of the driver.
///
/// Only the outermost transition advances its progress. Interrupted ones keep the progress they
/// had and are dropped together with the outermost transition once it completes.
#[derive(Clone, Debug)]
pub(crate) struct TransitionState {
    pub properties: TransitionProperties,
    pub previous: Previous,
    pub from: NamedState,
    pub progress: f64,
}

impl TransitionState {
    pub fn new(properties: TransitionProperties, previous: Previous, from: NamedState) -> Self {
        Self {
            properties,
            previous,
            from,
            progress: 0.0,
        }
    }

    /// Drops interrupted transitions that can no longer add a morph.
    ///
    /// `budget` is the morph budget this transition resolves with. A nested transition left with
    /// none only steps between its sides, and with its progress frozen it always picks the same
    /// one, so it is replaced by that side.
    pub fn collapsed(mut self, budget: usize) -> Self {
        self.previous = match self.previous {
            Previous::Pending { transition, next } if budget <= 1 => {
                let transition = *transition;
                if transition.properties.blend_duration().is_none() || transition.alpha() > 0.5 {
                    Previous::Resolved(next)
                } else {
                    transition.previous
                }
            }
            Previous::Pending { transition, next } => Previous::Pending {
                transition: Box::new((*transition).collapsed(budget - 1)),
                next,
            },
            resolved => resolved,
        };
        self
    }

    /// Eased blend strength for the current progress.
    pub fn alpha(&self) -> f64 {
        match &self.properties.easing {
            Some(easing) => bezier::ease(easing, self.progress),
            None => self.progress,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Blends `target` with the state this transition comes from.
    ///
    /// `ls` is the state handed to every clock in the chain. Morph operations are added until
    /// `remaining_morphs` runs out, after which the blend becomes a step at `alpha > 0.5`.
    pub fn resolve(
        &mut self,
        ls: &AnimationState,
        target: AnimationState,
        ctx: &TickContext<'_>,
        advance_progress: bool,
        remaining_morphs: usize,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> AnimationState {
        let Some(duration) = self.properties.blend_duration() else {
            diagnostics.report(Diagnostic::InstantTransitionInChain);
            return target;
        };

        let mut ignored = Vec::new();
        let prev = match &mut self.previous {
            Previous::Resolved(state) => state.playback.advance(ls, ctx, &mut ignored),
            Previous::Pending { transition, next } => {
                let next_ls = next.playback.advance(ls, ctx, &mut ignored);
                transition.resolve(
                    ls,
                    next_ls,
                    ctx,
                    false,
                    remaining_morphs.saturating_sub(1),
                    diagnostics,
                )
            }
        };

        if advance_progress {
            self.progress += ctx.elapsed / duration;
        }
        self.progress = self.progress.min(1.0);

        let alpha = self.alpha();
        if alpha == 1.0 {
            AnimationState {
                time: target.time,
                morphs: Vec::new(),
                ..prev
            }
        } else if remaining_morphs > 0 {
            let mut out = prev;
            out.morphs.push(MorphOperation::new(target.time, alpha));
            out
        } else {
            let time = if alpha > 0.5 { target.time } else { prev.time };
            AnimationState { time, ..prev }
        }
    }
}
