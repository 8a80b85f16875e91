use crate::{
    AnimationInfo, Lerpable, MAX_MORPHS, MorphOperation, apply_morphs, morph_frame, universal_lerp,
};

fn assert_approx(actual: f64, expected: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-9,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn number(value: &Lerpable) -> f64 {
    match value {
        Lerpable::Number(n) => *n,
        other => panic!("expected a number, got {other:?}"),
    }
}

#[test]
fn numbers_and_vectors_interpolate_componentwise() {
    assert_approx(number(&universal_lerp(&2.0.into(), &6.0.into(), 0.25)), 3.0);

    let a = Lerpable::from(vec![0.0, 10.0, 5.0]);
    let b = Lerpable::from(vec![10.0, 20.0]);
    let Lerpable::Vector(out) = universal_lerp(&a, &b, 0.5) else {
        panic!("expected a vector");
    };
    assert_eq!(out.len(), 3);
    assert_approx(number(&out[0]), 5.0);
    assert_approx(number(&out[1]), 15.0);
    assert_approx(number(&out[2]), 5.0);
}

#[test]
fn paths_interpolate_vertices_and_tangents() {
    let a = Lerpable::Path {
        closed: true,
        i: vec![0.0, 0.0],
        o: vec![1.0, 1.0],
        v: vec![0.0, 0.0, 10.0, 10.0],
    };
    let b = Lerpable::Path {
        closed: false,
        i: vec![2.0, 2.0],
        o: vec![3.0, 3.0],
        v: vec![10.0, 10.0, 20.0, 20.0],
    };

    let Lerpable::Path { closed, i, o, v } = universal_lerp(&a, &b, 0.5) else {
        panic!("expected a path");
    };
    assert!(!closed);
    assert_eq!(i, vec![1.0, 1.0]);
    assert_eq!(o, vec![2.0, 2.0]);
    assert_eq!(v, vec![5.0, 5.0, 15.0, 15.0]);
}

#[test]
fn mismatched_kinds_switch_at_half() {
    let a = Lerpable::Number(1.0);
    let b = Lerpable::from(vec![2.0]);
    assert_eq!(universal_lerp(&a, &b, 0.5), a);
    assert_eq!(universal_lerp(&a, &b, 0.51), b);
}

#[test]
fn morph_frames_are_rounded_and_clamped() {
    let info = AnimationInfo::new(30.0, 0.0, 60.0);
    assert_approx(morph_frame(&info, 0.51), 15.0);
    assert_approx(morph_frame(&info, -1.0), 0.0);
    assert_approx(morph_frame(&info, 10.0), 60.0 - 1.0e-5);
}

#[test]
fn applies_operations_in_order() {
    let info = AnimationInfo::new(10.0, 0.0, 100.0);
    let ops = [MorphOperation::new(1.0, 0.5), MorphOperation::new(2.0, 0.5)];

    // The sampled property equals its frame number.
    let out = apply_morphs(0.0.into(), &ops, &info, |frame| Some(frame.into()));

    // 0 -> halfway to 10 -> halfway to 20
    assert_approx(number(&out), 12.5);
}

#[test]
fn only_the_latest_operations_apply() {
    let info = AnimationInfo::new(1.0, 0.0, 100.0);
    let ops: Vec<_> = (0..MAX_MORPHS + 3)
        .map(|index| MorphOperation::new(index as f64, 1.0))
        .collect();
    let mut sampled = Vec::new();

    let out = apply_morphs(0.0.into(), &ops, &info, |frame| {
        sampled.push(frame);
        Some(frame.into())
    });

    assert_eq!(sampled.len(), MAX_MORPHS);
    assert_approx(sampled[0], 3.0);
    assert_approx(number(&out), (MAX_MORPHS + 2) as f64);
}

#[test]
fn unsampleable_operations_are_skipped() {
    let info = AnimationInfo::new(10.0, 0.0, 100.0);
    let ops = [MorphOperation::new(1.0, 1.0), MorphOperation::new(2.0, 0.5)];

    let out = apply_morphs(4.0.into(), &ops, &info, |frame| {
        (frame > 15.0).then(|| Lerpable::Number(frame))
    });

    assert_approx(number(&out), 12.0);
}
