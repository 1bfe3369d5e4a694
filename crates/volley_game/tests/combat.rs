use volley_ecs::{EcsError, Entity, Registry};
use volley_game::components::{
    Color, Damage, Dead, DeathTimer, Health, LineAnim, LineRenderer, OnArrival, Position,
    PositionAnim, Resources, Role, Shape, ShapeRenderer, Size, SizePulseAnim, SoundHandle,
    SpeedNerf, Target, TargetMask,
};
use volley_game::shooting::{
    self, ProjectileKind, SLOW_DURATION, SLOW_MULTIPLIER, SLOW_RADIUS,
};
use volley_game::systems::position_anim;
use volley_game::{Journal, Services, SimConfig, Simulation};

const EXPLOSION: SoundHandle = SoundHandle(1);
const POP: SoundHandle = SoundHandle(2);

/// A registry with the player and resources singletons bound.
fn setup() -> (Registry, Entity) {
    let mut registry = Registry::new();
    let player = registry.create();
    registry.attach(Role::Player, player).unwrap();
    let resources = registry.create();
    registry
        .assign(
            resources,
            Resources {
                explosion_sound: EXPLOSION,
                pop_sound: POP,
            },
        )
        .unwrap();
    registry.attach(Role::Resources, resources).unwrap();
    (registry, player)
}

fn enemy(registry: &mut Registry, at: Position, health: f32) -> Entity {
    let e = registry.create();
    registry.assign(e, at).unwrap();
    registry.assign(e, Health { amount: health }).unwrap();
    e
}

fn ground_target(registry: &mut Registry, at: Position) -> Entity {
    let e = registry.create();
    registry.assign(e, at).unwrap();
    registry
        .assign(
            e,
            Target {
                mask: TargetMask::GROUND,
            },
        )
        .unwrap();
    e
}

fn make_renderable(registry: &mut Registry, e: Entity) {
    registry
        .assign(e, ShapeRenderer { shape: Shape::Box })
        .unwrap();
    registry.assign(e, Size::square(1.0)).unwrap();
    registry.assign(e, Color::WHITE).unwrap();
}

/// Records like [`Journal`] and destroys `victim` as soon as a sound plays.
struct DestroyOnSound {
    journal: Journal,
    victim: Entity,
}

impl Services for DestroyOnSound {
    fn transfer(&mut self, registry: &mut Registry, from: Entity, to: Entity) {
        self.journal.transfer(registry, from, to);
    }

    fn play_sound(&mut self, registry: &mut Registry, sound: SoundHandle) {
        self.journal.play_sound(registry, sound);
        if registry.valid(self.victim) {
            registry.destroy(self.victim).unwrap();
        }
    }

    fn spawn_particles_from_shape(
        &mut self,
        registry: &mut Registry,
        position: Position,
        shape: ShapeRenderer,
        size: Size,
        color: Color,
    ) {
        self.journal
            .spawn_particles_from_shape(registry, position, shape, size, color);
    }
}

#[test]
fn test_destroyed_handle_is_stale() {
    let (mut registry, _) = setup();
    let e = enemy(&mut registry, Position::new(0.0, 0.0), 10.0);
    registry.destroy(e).unwrap();

    assert!(!registry.valid(e));
    assert!(!registry.has::<Health>(e));
    assert_eq!(registry.destroy(e), Err(EcsError::StaleEntity(e)));

    let reused = registry.create();
    assert_eq!(reused.index(), e.index());
    assert_ne!(reused, e);
}

#[test]
fn test_damage_then_overkill() {
    let (mut registry, player) = setup();
    let mut journal = Journal::new();
    let e = enemy(&mut registry, Position::new(0.0, 0.0), 10.0);

    shooting::damage(&mut registry, &mut journal, e, 4.0).unwrap();
    assert_eq!(registry.get::<Health>(e).unwrap().amount, 6.0);
    assert!(!registry.has::<Dead>(e));

    shooting::damage(&mut registry, &mut journal, e, 10.0).unwrap();
    assert_eq!(registry.get::<Health>(e).unwrap().amount, -4.0);
    assert!(registry.has::<Dead>(e));
    assert!(registry.valid(e));
    assert_eq!(journal.transfers_to(player), 1);
}

#[test]
fn test_damage_rejects_stale_handle() {
    let (mut registry, _) = setup();
    let mut journal = Journal::new();
    let e = enemy(&mut registry, Position::new(0.0, 0.0), 10.0);
    registry.destroy(e).unwrap();

    assert_eq!(
        shooting::damage(&mut registry, &mut journal, e, 1.0),
        Err(EcsError::StaleEntity(e))
    );
    assert!(journal.calls.is_empty());
}

#[test]
fn test_damage_without_health_is_ignored() {
    let (mut registry, _) = setup();
    let mut journal = Journal::new();
    let e = registry.create();
    shooting::damage(&mut registry, &mut journal, e, 100.0).unwrap();
    assert!(!registry.has::<Dead>(e));
    assert!(journal.calls.is_empty());
}

#[test]
fn test_kill_is_idempotent() {
    let (mut registry, player) = setup();
    let mut journal = Journal::new();
    let e = enemy(&mut registry, Position::new(1.0, 2.0), 1.0);
    make_renderable(&mut registry, e);

    shooting::kill(&mut registry, &mut journal, e).unwrap();
    shooting::kill(&mut registry, &mut journal, e).unwrap();

    assert!(registry.has::<Dead>(e));
    assert_eq!(journal.transfers_to(player), 1);
    assert_eq!(journal.particle_bursts(), 1);
    assert_eq!(journal.sounds(), vec![POP]);
}

#[test]
fn test_kill_without_renderer_only_transfers() {
    let (mut registry, player) = setup();
    let mut journal = Journal::new();
    let e = enemy(&mut registry, Position::new(0.0, 0.0), 1.0);

    shooting::kill(&mut registry, &mut journal, e).unwrap();
    assert_eq!(journal.transfers_to(player), 1);
    assert_eq!(journal.particle_bursts(), 0);
    assert!(journal.sounds().is_empty());
}

#[test]
fn test_kill_rejects_stale_and_unbound_player() {
    let (mut registry, player) = setup();
    let mut journal = Journal::new();
    let e = enemy(&mut registry, Position::new(0.0, 0.0), 1.0);
    registry.destroy(e).unwrap();
    assert_eq!(
        shooting::kill(&mut registry, &mut journal, e),
        Err(EcsError::StaleEntity(e))
    );

    registry.destroy(player).unwrap();
    let other = enemy(&mut registry, Position::new(0.0, 0.0), 1.0);
    assert!(matches!(
        shooting::kill(&mut registry, &mut journal, other),
        Err(EcsError::UnboundTag(_))
    ));
    assert!(!registry.has::<Dead>(other));
    assert!(journal.calls.is_empty());
}

#[test]
fn test_radius_damage_falloff_and_boundary() {
    let (mut registry, _) = setup();
    let mut journal = Journal::new();
    let centre = enemy(&mut registry, Position::new(0.0, 0.0), 10.0);
    let halfway = enemy(&mut registry, Position::new(1.0, 0.0), 10.0);
    let edge = enemy(&mut registry, Position::new(2.0, 0.0), 10.0);
    let outside = enemy(&mut registry, Position::new(0.0, 3.0), 10.0);

    shooting::radius_damage(&mut registry, &mut journal, Position::new(0.0, 0.0), 2.0, 4.0)
        .unwrap();

    assert_eq!(registry.get::<Health>(centre).unwrap().amount, 6.0);
    assert_eq!(registry.get::<Health>(halfway).unwrap().amount, 7.0);
    assert_eq!(registry.get::<Health>(edge).unwrap().amount, 10.0);
    assert_eq!(registry.get::<Health>(outside).unwrap().amount, 10.0);
}

#[test]
fn test_radius_damage_kills_inside_pass() {
    let (mut registry, player) = setup();
    let mut journal = Journal::new();
    let victims: Vec<Entity> = (0..4)
        .map(|i| enemy(&mut registry, Position::new(i as f32 * 0.1, 0.0), 1.0))
        .collect();

    shooting::radius_damage(&mut registry, &mut journal, Position::new(0.0, 0.0), 5.0, 10.0)
        .unwrap();

    for victim in victims {
        assert!(registry.has::<Dead>(victim));
    }
    assert_eq!(journal.transfers_to(player), 4);
}

#[test]
fn test_slow_boundary_is_inclusive() {
    let (mut registry, _) = setup();
    let on_edge = ground_target(&mut registry, Position::new(0.5, 0.0));
    let beyond = ground_target(&mut registry, Position::new(0.6, 0.0));
    let flying = registry.create();
    registry.assign(flying, Position::new(0.0, 0.0)).unwrap();
    registry
        .assign(
            flying,
            Target {
                mask: TargetMask::AIR,
            },
        )
        .unwrap();

    shooting::slow(&mut registry, Position::new(0.0, 0.0), SLOW_RADIUS, SLOW_MULTIPLIER).unwrap();

    assert_eq!(
        registry.get::<SpeedNerf>(on_edge),
        Ok(&SpeedNerf {
            remaining: SLOW_DURATION,
            multiplier: SLOW_MULTIPLIER,
        })
    );
    assert!(!registry.has::<SpeedNerf>(beyond));
    assert!(!registry.has::<SpeedNerf>(flying));
}

#[test]
fn test_slow_refreshes_instead_of_stacking() {
    let (mut registry, _) = setup();
    let e = ground_target(&mut registry, Position::new(0.0, 0.0));
    let hit = Position::new(0.0, 0.0);

    shooting::slow(&mut registry, hit, SLOW_RADIUS, SLOW_MULTIPLIER).unwrap();
    registry.get_mut::<SpeedNerf>(e).unwrap().remaining = 0.1;
    shooting::slow(&mut registry, hit, SLOW_RADIUS, SLOW_MULTIPLIER).unwrap();

    assert_eq!(registry.size::<SpeedNerf>(), 1);
    assert_eq!(registry.get::<SpeedNerf>(e).unwrap().remaining, SLOW_DURATION);
}

#[test]
fn test_slow_bolt_travels_and_slows_on_arrival() {
    let (mut registry, _) = setup();
    let mut journal = Journal::new();
    let target = ground_target(&mut registry, Position::new(10.5, 0.0));

    let bolt = shooting::create_slow_bolt(
        &mut registry,
        Position::new(0.0, 0.0),
        Position::new(10.0, 0.0),
        Color::CYAN,
    )
    .unwrap();
    assert_eq!(registry.get::<PositionAnim>(bolt).unwrap().duration, 1.0);
    assert_eq!(
        registry.get::<OnArrival>(bolt).unwrap().0,
        volley_game::components::Effect::SlowBoltImpact
    );

    position_anim::update(&mut registry, 0.5, &mut journal).unwrap();
    assert!(registry.valid(bolt));
    assert!(!registry.has::<SpeedNerf>(target));

    position_anim::update(&mut registry, 0.5, &mut journal).unwrap();
    assert!(!registry.valid(bolt));
    assert!(registry.has::<SpeedNerf>(target));
    // Impact flash.
    assert_eq!(registry.size::<DeathTimer>(), 1);
}

#[test]
fn test_destroyed_bolt_never_fires() {
    let (mut registry, _) = setup();
    let mut journal = Journal::new();
    let target = ground_target(&mut registry, Position::new(10.0, 0.0));
    let bolt = shooting::create_slow_bolt(
        &mut registry,
        Position::new(0.0, 0.0),
        Position::new(10.0, 0.0),
        Color::CYAN,
    )
    .unwrap();

    registry.destroy(bolt).unwrap();
    position_anim::update(&mut registry, 2.0, &mut journal).unwrap();

    assert!(!registry.has::<SpeedNerf>(target));
    assert_eq!(registry.size::<DeathTimer>(), 0);
    assert_eq!(registry.size::<SizePulseAnim>(), 0);
    assert!(journal.calls.is_empty());
}

#[test]
fn test_arrival_destroyed_by_earlier_arrival_is_skipped() {
    let (mut registry, _) = setup();
    let target = ground_target(&mut registry, Position::new(0.0, 5.0));
    let origin = Position::new(0.0, 0.0);

    let ball = shooting::create_cannon_ball(
        &mut registry,
        origin,
        Position::new(5.0, 0.0),
        Color::WHITE,
        1.0,
    )
    .unwrap();
    let bolt =
        shooting::create_slow_bolt(&mut registry, origin, Position::new(0.0, 5.0), Color::CYAN)
            .unwrap();
    let mut services = DestroyOnSound {
        journal: Journal::new(),
        victim: bolt,
    };

    // Both land this frame; the ball resolves first and its explosion sound
    // takes the bolt with it.
    position_anim::update(&mut registry, 0.5, &mut services).unwrap();

    assert!(!registry.valid(ball));
    assert!(!registry.valid(bolt));
    assert!(!registry.has::<SpeedNerf>(target));
    assert_eq!(services.journal.sounds(), vec![EXPLOSION]);
    // Only the cannon-ball flash.
    assert_eq!(registry.size::<DeathTimer>(), 1);
}

#[test]
fn test_cannon_ball_explodes_on_arrival() {
    let (mut registry, player) = setup();
    let mut journal = Journal::new();
    let near = enemy(&mut registry, Position::new(3.0, 4.0), 5.0);
    let far = enemy(&mut registry, Position::new(30.0, 4.0), 5.0);

    let ball = shooting::create_cannon_ball(
        &mut registry,
        Position::new(0.0, 0.0),
        Position::new(3.0, 4.0),
        Color::WHITE,
        10.0,
    )
    .unwrap();
    assert_eq!(registry.get::<Damage>(ball).unwrap().amount, 10.0);
    assert_eq!(registry.get::<PositionAnim>(ball).unwrap().duration, 0.5);

    position_anim::update(&mut registry, 0.5, &mut journal).unwrap();

    assert!(!registry.valid(ball));
    assert_eq!(journal.sounds(), vec![EXPLOSION]);
    assert!(registry.has::<Dead>(near));
    assert!(!registry.has::<Dead>(far));
    assert_eq!(journal.transfers_to(player), 1);
}

#[test]
fn test_bullet_entity_counts() {
    let (mut registry, _) = setup();
    let from = Position::new(0.0, 0.0);

    let shot = shooting::create_projectile(
        &mut registry,
        ProjectileKind::Bullet,
        from,
        Position::new(30.0, 0.0),
        Color::YELLOW,
    )
    .unwrap();
    assert_eq!(shot.len(), 4);
    assert_eq!(registry.size::<LineRenderer>(), 4);
    assert_eq!(registry.size::<LineAnim>(), 3);
    let head = shot[3];
    assert_eq!(registry.get::<DeathTimer>(head).unwrap().remaining, 1.0);

    let point_blank = shooting::create_bullet(&mut registry, from, from, Color::YELLOW).unwrap();
    assert_eq!(point_blank.len(), 1);
    assert!(!registry.has::<LineAnim>(point_blank[0]));
}

#[test]
fn test_simulation_cleans_up_a_volley() {
    let config = SimConfig::default().with_tick_rate(10.0);
    let dt = config.frame_dt();
    let mut sim = Simulation::new(config);
    let mut journal = Journal::new();
    let (fresh, player) = setup();
    *sim.registry_mut() = fresh;
    let registry = sim.registry_mut();
    let target = enemy(registry, Position::new(5.0, 0.0), 1.0);
    let baseline = registry.alive();

    for kind in [
        ProjectileKind::Bullet,
        ProjectileKind::CannonBall { damage: 5.0 },
        ProjectileKind::SlowBolt,
    ] {
        shooting::create_projectile(
            registry,
            kind,
            Position::new(0.0, 0.0),
            Position::new(5.0, 0.0),
            Color::WHITE,
        )
        .unwrap();
    }

    for _ in 0..20 {
        sim.tick(dt, &mut journal).unwrap();
    }

    assert_eq!(sim.tick_id(), 20);
    assert_eq!(sim.registry().alive(), baseline);
    assert!(sim.registry().has::<Dead>(target));
    assert_eq!(journal.transfers_to(player), 1);
}
