use std::f64::consts::{PI, TAU};

use super::*;

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform::at(Point::ZERO);
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform::at(Point::new(10.0, -2.5));
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn transform_affine_scales_and_rotates_about_center() {
    let mut t = Transform::at(Point::new(100.0, 50.0));
    t.set_scale(2.0, ScaleLimits::default());
    t.set_rotation(PI / 2.0);

    let p = t.to_affine() * Point::new(10.0, 0.0);
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 70.0).abs() < 1e-9);
}

#[test]
fn scale_is_clamped_to_floor() {
    let limits = ScaleLimits::default();
    let mut t = Transform::at(Point::ZERO);
    for v in [0.1, 0.05, 0.0, -3.0, f64::NEG_INFINITY] {
        t.set_scale(v, limits);
        assert_eq!(t.scale(), limits.min, "requested {v}");
    }
    for v in [0.1000001, 0.5, 1.0, 7.25, 1e6] {
        t.set_scale(v, limits);
        assert_eq!(t.scale(), v);
    }
}

#[test]
fn optional_ceiling_caps_growth() {
    let limits = ScaleLimits {
        min: 0.1,
        max: Some(4.0),
    };
    let mut t = Transform::at(Point::ZERO);
    t.set_scale(12.0, limits);
    assert_eq!(t.scale(), 4.0);
}

#[test]
fn non_finite_updates_are_ignored() {
    let mut t = Transform::at(Point::new(1.0, 2.0));
    t.set_scale(3.0, ScaleLimits::default());
    t.set_rotation(1.0);

    t.translate(Point::new(f64::NAN, 0.0));
    t.set_scale(f64::NAN, ScaleLimits::default());
    t.set_rotation(f64::INFINITY);

    assert_eq!(t.translation(), Point::new(1.0, 2.0));
    assert_eq!(t.scale(), 3.0);
    assert_eq!(t.rotation(), 1.0);
}

#[test]
fn rotation_is_normalized() {
    let mut t = Transform::at(Point::ZERO);
    for v in [-7.0 * PI, -0.25, 0.0, 13.0, 1000.0 * TAU + 0.5] {
        t.set_rotation(v);
        assert!((0.0..TAU).contains(&t.rotation()), "{v} -> {}", t.rotation());
    }
    t.set_rotation(-PI / 2.0);
    assert!((t.rotation() - 1.5 * PI).abs() < 1e-12);
}

#[test]
fn scale_limits_validate() {
    assert!(ScaleLimits::default().validate().is_ok());
    assert!(
        ScaleLimits {
            min: 0.0,
            max: None
        }
        .validate()
        .is_err()
    );
    assert!(
        ScaleLimits {
            min: 1.0,
            max: Some(0.5)
        }
        .validate()
        .is_err()
    );
}

#[test]
fn canvas_for_scaled_rounds_and_rejects_bad_scale() {
    let c = Canvas::for_scaled(Size::new(350.0, 520.0), 3.0).unwrap();
    assert_eq!((c.width, c.height), (1050, 1560));
    assert!(Canvas::for_scaled(Size::new(350.0, 520.0), 0.0).is_err());
    assert!(Canvas::for_scaled(Size::new(350.0, 520.0), f64::NAN).is_err());
    assert!(Canvas::for_scaled(Size::new(350.0, 520.0), 1000.0).is_err());
}

#[test]
fn rgba_premul_from_straight() {
    assert_eq!(
        Rgba8Premul::from_straight([255, 255, 255, 255]),
        Rgba8Premul::from_straight_rgba(255, 255, 255, 255)
    );
    assert_eq!(
        Rgba8Premul::from_straight([200, 100, 0, 0]),
        Rgba8Premul::transparent()
    );
}
