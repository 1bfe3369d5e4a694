//! Line endpoint animation.

use volley_ecs::Registry;

use crate::components::{LineAnim, LineRenderer, Position, progress};

/// Interpolate both endpoints of every animated line.
pub fn update(registry: &mut Registry, dt: f32) {
    registry.each::<(LineAnim, Position, LineRenderer)>(|_, (anim, start, line)| {
        anim.elapsed += dt;
        let t = progress(anim.elapsed, anim.duration);
        *start = anim.start_from.lerp(anim.start_to, t);
        line.end = anim.end_from.lerp(anim.end_to, t);
    });
}
