//! Inter-frame morphing: a displayed property value becomes a linear combination of the
//! property sampled at several animation times.

use crate::AnimationInfo;

/// Maximum number of morph operations applied at once.
pub const MAX_MORPHS: usize = 8;

/// Blend the current value of every property with its value at `time`, by `strength`.
///
/// Applying `{ time: 5.0, strength: 0.25 }` while the animation shows 2.0s displays each
/// property 25% of the way from its 2.0s value to its 5.0s value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MorphOperation {
    pub time: f64,
    pub strength: f64,
}

impl MorphOperation {
    pub const fn new(time: f64, strength: f64) -> Self {
        Self { time, strength }
    }
}

/// A property value the morphing engine knows how to interpolate.
#[derive(Clone, Debug, PartialEq)]
pub enum Lerpable {
    Number(f64),
    Vector(Vec<Lerpable>),
    Path {
        closed: bool,
        i: Vec<f64>,
        o: Vec<f64>,
        v: Vec<f64>,
    },
}

impl From<f64> for Lerpable {
    fn from(value: f64) -> Self {
        Lerpable::Number(value)
    }
}

impl From<Vec<f64>> for Lerpable {
    fn from(value: Vec<f64>) -> Self {
        Lerpable::Vector(value.into_iter().map(Lerpable::Number).collect())
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

// Missing components on `b` keep the component of `a`.
fn lerp_slice(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    a.iter()
        .enumerate()
        .map(|(index, &x)| lerp(x, b.get(index).copied().unwrap_or(x), t))
        .collect()
}

/// Interpolates `a` towards `b`. Values of different kinds switch over at `t > 0.5`.
pub fn universal_lerp(a: &Lerpable, b: &Lerpable, t: f64) -> Lerpable {
    match (a, b) {
        (Lerpable::Number(a), Lerpable::Number(b)) => Lerpable::Number(lerp(*a, *b, t)),
        (Lerpable::Vector(a), Lerpable::Vector(b)) => Lerpable::Vector(
            a.iter()
                .enumerate()
                .map(|(index, xa)| match b.get(index) {
                    Some(xb) => universal_lerp(xa, xb, t),
                    None => xa.clone(),
                })
                .collect(),
        ),
        (
            Lerpable::Path {
                closed: closed_a,
                i: i_a,
                o: o_a,
                v: v_a,
            },
            Lerpable::Path {
                closed: closed_b,
                i: i_b,
                o: o_b,
                v: v_b,
            },
        ) => Lerpable::Path {
            closed: *closed_a && *closed_b,
            i: lerp_slice(i_a, i_b, t),
            o: lerp_slice(o_a, o_b, t),
            v: lerp_slice(v_a, v_b, t),
        },
        _ => {
            if t > 0.5 {
                b.clone()
            } else {
                a.clone()
            }
        }
    }
}

/// Frame at which a morph samples its property: rounded and clamped into the animation.
pub fn morph_frame(info: &AnimationInfo, time: f64) -> f64 {
    let last = info.total_frames() - 1.0e-5;
    (time * info.frame_rate).round().max(0.0).min(last)
}

/// Applies the last [`MAX_MORPHS`] operations of `ops` to `base`, in order.
///
/// `sample` returns the property value at a frame, or `None` when the property cannot be
/// sampled there, in which case the operation is skipped.
pub fn apply_morphs<F>(
    base: Lerpable,
    ops: &[MorphOperation],
    info: &AnimationInfo,
    mut sample: F,
) -> Lerpable
where
    F: FnMut(f64) -> Option<Lerpable>,
{
    let active = &ops[ops.len().saturating_sub(MAX_MORPHS)..];
    active.iter().fold(base, |value, op| {
        match sample(morph_frame(info, op.time)) {
            Some(other) => universal_lerp(&value, &other, op.strength),
            None => value,
        }
    })
}
