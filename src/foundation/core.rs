use crate::foundation::{
    error::{InstaframeError, InstaframeResult},
    math::normalize_angle,
};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Pixel dimensions of a rendered raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Pixel canvas covering a frame-local `size` rendered at `scale` pixels per unit.
    pub fn for_scaled(size: Size, scale: f64) -> InstaframeResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(InstaframeError::render("scale factor must be finite and > 0"));
        }
        let width = (size.width * scale).round();
        let height = (size.height * scale).round();
        if width < 1.0 || height < 1.0 {
            return Err(InstaframeError::render("scaled canvas is empty"));
        }
        if width > f64::from(u16::MAX) || height > f64::from(u16::MAX) {
            return Err(InstaframeError::render(format!(
                "scaled canvas {width}x{height} exceeds {max}x{max}",
                max = u16::MAX
            )));
        }
        Ok(Self {
            width: width as u32,
            height: height as u32,
        })
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn from_straight(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba;
        Self::from_straight_rgba(r, g, b, a)
    }
}

/// Bounds applied to every magnification written into a [`Transform`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleLimits {
    /// Floor that keeps overlays from collapsing into invisible specks.
    pub min: f64,
    /// Optional ceiling; `None` leaves growth unbounded.
    #[serde(default)]
    pub max: Option<f64>,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: None,
        }
    }
}

impl ScaleLimits {
    pub const DEFAULT_MIN: f64 = 0.1;

    pub fn validate(&self) -> InstaframeResult<()> {
        if !self.min.is_finite() || self.min <= 0.0 {
            return Err(InstaframeError::validation(
                "min scale must be finite and > 0",
            ));
        }
        if let Some(max) = self.max
            && (!max.is_finite() || max < self.min)
        {
            return Err(InstaframeError::validation(
                "max scale must be finite and >= min scale",
            ));
        }
        Ok(())
    }

    pub fn clamp(self, factor: f64) -> f64 {
        let v = factor.max(self.min);
        match self.max {
            Some(max) => v.min(max),
            None => v,
        }
    }
}

/// Placement of one overlay in frame-local coordinates.
///
/// `translation` is the overlay's center. Scale is always >= the configured floor and rotation
/// always lies in `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Transform {
    translation: Point,
    scale: f64,
    rotation: f64,
}

impl Transform {
    /// Unscaled, unrotated transform centered at `translation`.
    pub fn at(translation: Point) -> Self {
        Self {
            translation,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation in radians, within `[0, 2π)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Move the center to an absolute frame-local location.
    pub fn translate(&mut self, location: Point) {
        if !(location.x.is_finite() && location.y.is_finite()) {
            tracing::debug!(?location, "ignoring non-finite translation");
            return;
        }
        self.translation = location;
    }

    /// Replace the magnification, clamped to `limits`.
    pub fn set_scale(&mut self, factor: f64, limits: ScaleLimits) {
        if factor.is_nan() || factor == f64::INFINITY {
            tracing::debug!(factor, "ignoring non-finite scale");
            return;
        }
        self.scale = limits.clamp(factor);
    }

    /// Replace the rotation with `angle` radians taken modulo a full turn.
    pub fn set_rotation(&mut self, angle: f64) {
        if !angle.is_finite() {
            tracing::debug!(angle, "ignoring non-finite rotation");
            return;
        }
        self.rotation = normalize_angle(angle);
    }

    /// Map overlay-local coordinates (origin at the overlay center) into frame-local ones.
    pub fn to_affine(self) -> Affine {
        // Canonical order: T(translate) * R(rot) * S(scale)
        Affine::translate(self.translation.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
