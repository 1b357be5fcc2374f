//! Source height fields sampled by stamps

/// Anything a stamp can draw its height samples from.
///
/// `u` and `v` are normalised to `[0, 1]`; the returned value is a
/// normalised height, usually in `[0, 1]`.
pub trait SourceHeightField {
    fn sample_bilinear(&self, u: f32, v: f32) -> f32;
}

/// Built-in procedural stamp shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Constant height everywhere
    Flat { value: f32 },
    /// Linear falloff from 1.0 at the centre to 0.0 at the inscribed circle
    Cone,
    /// Hemispherical falloff over the inscribed circle
    Dome,
}

impl Shape {
    fn radius(u: f32, v: f32) -> f32 {
        let du = (u.clamp(0.0, 1.0) - 0.5) * 2.0;
        let dv = (v.clamp(0.0, 1.0) - 0.5) * 2.0;
        (du * du + dv * dv).sqrt()
    }
}

impl SourceHeightField for Shape {
    fn sample_bilinear(&self, u: f32, v: f32) -> f32 {
        match *self {
            Shape::Flat { value } => value,
            Shape::Cone => (1.0 - Self::radius(u, v)).max(0.0),
            Shape::Dome => {
                let r = Self::radius(u, v).min(1.0);
                (1.0 - r * r).sqrt()
            }
        }
    }
}
