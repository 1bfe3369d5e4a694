//! Colour fade animation.

use volley_ecs::Registry;

use crate::components::{Color, ColorAnim, progress};

/// Blend every animated [`Color`] towards its target.
pub fn update(registry: &mut Registry, dt: f32) {
    registry.each::<(ColorAnim, Color)>(|_, (anim, color)| {
        anim.elapsed += dt;
        *color = anim.from.lerp(anim.to, progress(anim.elapsed, anim.duration));
    });
}
