//! Component definitions for the combat simulation.
//!
//! All components are plain data. Anything behavioural is expressed as data
//! too: the arrival callback of a projectile is an [`Effect`] value stored in
//! [`OnArrival`], resolved by a single `match` when its animation completes.

use glam::Vec2;
use volley_ecs::{Component, Tag};

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Squared distance to `other`.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> f32 {
        self.0.distance_squared(other.0)
    }

    /// Linear interpolation towards `to`; `t` is not clamped.
    #[must_use]
    pub fn lerp(self, to: Position, t: f32) -> Position {
        Position(self.0.lerp(to.0, t))
    }
}

/// Rendered extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    /// Creates a size from width and height.
    #[must_use]
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// A `side` by `side` square.
    #[must_use]
    pub const fn square(side: f32) -> Self {
        Self { w: side, h: side }
    }
}

/// Linear RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    /// Opaque cyan.
    pub const CYAN: Self = Self::new(0.0, 1.0, 1.0, 1.0);
    /// Fully transparent black; the end colour of fades.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// The same colour with alpha scaled by `factor`.
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }

    /// Channel-wise linear interpolation towards `to`.
    #[must_use]
    pub fn lerp(self, to: Color, t: f32) -> Color {
        Color {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }
}

/// Hit points. May go negative; crossing zero kills synchronously.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub amount: f32,
}

/// Damage carried by a projectile until impact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damage {
    pub amount: f32,
}

/// Marks a killed entity awaiting cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dead;

/// Destroys its entity once `remaining` seconds have elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathTimer {
    pub remaining: f32,
}

/// Bit set of the layers an entity can be hit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetMask(pub u8);

impl TargetMask {
    /// Ground units; the only layer slow bolts affect.
    pub const GROUND: Self = Self(1 << 0);
    /// Flying units.
    pub const AIR: Self = Self(1 << 1);

    /// Returns `true` if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: TargetMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TargetMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Something towers can shoot at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub mask: TargetMask,
}

/// Timed movement-speed debuff. Re-applying refreshes, never stacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedNerf {
    pub remaining: f32,
    pub multiplier: f32,
}

/// Outline of a filled shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Circle,
    Box,
}

/// Opaque renderer tag for filled shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRenderer {
    pub shape: Shape,
}

/// Draws a line from the entity's [`Position`] to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRenderer {
    pub end: Position,
}

/// Moves [`Position`] from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAnim {
    pub elapsed: f32,
    pub duration: f32,
    pub from: Position,
    pub to: Position,
}

/// Blends [`Color`] from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAnim {
    pub elapsed: f32,
    pub duration: f32,
    pub from: Color,
    pub to: Color,
}

/// Moves both endpoints of a line: the [`Position`] goes
/// `start_from → start_to` and the [`LineRenderer`] end goes
/// `end_from → end_to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAnim {
    pub elapsed: f32,
    pub duration: f32,
    pub start_from: Position,
    pub end_from: Position,
    pub start_to: Position,
    pub end_to: Position,
}

/// Oscillates [`Size`] between `from` and `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePulseAnim {
    pub phase: f32,
    pub speed: f32,
    pub from: f32,
    pub to: f32,
}

/// Gameplay consequence of a projectile reaching its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    SlowBoltImpact,
    CannonBallImpact,
    NoOp,
}

/// Fires its [`Effect`] once, when the entity's [`PositionAnim`] completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnArrival(pub Effect);

/// Opaque handle to a loaded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Shared assets, held by the entity bound to [`Role::Resources`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resources {
    pub explosion_sound: SoundHandle,
    pub pop_sound: SoundHandle,
}

/// Well-known singleton entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Player,
    Resources,
}

impl Tag for Role {
    fn name(self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Resources => "resources",
        }
    }
}

macro_rules! components {
    ($($ty:ty),+ $(,)?) => {
        $(impl Component for $ty {})+
    };
}

components!(
    Position,
    Size,
    Color,
    Health,
    Damage,
    Dead,
    DeathTimer,
    Target,
    SpeedNerf,
    ShapeRenderer,
    LineRenderer,
    PositionAnim,
    ColorAnim,
    LineAnim,
    SizePulseAnim,
    OnArrival,
    Resources,
);

/// Progress of an animation in `[0, 1]`; a non-positive duration is complete.
#[must_use]
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}
