//! Simulation core
//!
//! All gameplay logic lives here. The world is owned by the loop driver and
//! handed by exclusive reference to each phase; randomness comes only from
//! the world's seeded RNG. Nothing in here touches rendering or the DOM.

pub mod collision;
pub mod combat;
pub mod progression;
pub mod run;
pub mod spawn;
pub mod state;
pub mod tick;

pub use progression::{RunPhase, Transition};
pub use run::{FixedStep, Run, RunStatus};
pub use state::{
    Body, Bullet, Enemy, EnemyVariant, EntityId, GameEvent, GameMode, Particle, ParticleTint, Player, PlayerCount,
    PlayerSlot, Powerup, PowerupType, ShotStyle, Star, WeaponType, World, WorldConfig,
};
pub use tick::{TickInput, tick};
