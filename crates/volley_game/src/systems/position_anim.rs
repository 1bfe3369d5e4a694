//! Position animation and arrival effects.

use tracing::trace;
use volley_ecs::{EcsError, Registry};

use crate::components::{OnArrival, Position, PositionAnim, progress};
use crate::services::Services;

/// Advance every [`PositionAnim`], then fire the [`OnArrival`] effect of each
/// entity that reached its destination this frame.
///
/// Effects run after the interpolation pass, against the live registry. An
/// effect may destroy or spawn entities; an arrival whose entity was already
/// destroyed by an earlier effect is skipped.
pub fn update(
    registry: &mut Registry,
    dt: f32,
    services: &mut dyn Services,
) -> Result<(), EcsError> {
    let mut arrived = Vec::new();
    registry.each::<(PositionAnim, Position)>(|entity, (anim, position)| {
        anim.elapsed += dt;
        let t = progress(anim.elapsed, anim.duration);
        *position = anim.from.lerp(anim.to, t);
        if t >= 1.0 {
            arrived.push(entity);
        }
    });

    for entity in arrived {
        if !registry.has::<PositionAnim>(entity) {
            continue;
        }
        registry.remove::<PositionAnim>(entity)?;
        if registry.has::<OnArrival>(entity) {
            let OnArrival(effect) = registry.remove::<OnArrival>(entity)?;
            trace!(%entity, ?effect, "arrived");
            effect.resolve(registry, services, entity)?;
        }
    }
    Ok(())
}
