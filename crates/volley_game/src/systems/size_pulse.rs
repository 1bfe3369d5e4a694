//! Size-pulse animation.

use volley_ecs::Registry;

use crate::components::{Size, SizePulseAnim};

/// Advance every pulse by `dt` and write the resulting square size.
///
/// ```text
/// phase += speed * dt
/// r      = (to - from) / 2
/// w = h  = from + r + r * sin(phase)
/// ```
pub fn update(registry: &mut Registry, dt: f32) {
    registry.each::<(SizePulseAnim, Size)>(|_, (pulse, size)| {
        pulse.phase += pulse.speed * dt;
        let half = (pulse.to - pulse.from) / 2.0;
        let side = pulse.from + half + half * pulse.phase.sin();
        *size = Size::square(side);
    });
}
