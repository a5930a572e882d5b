use glam::Vec2;
use proptest::prelude::*;

use neon_thunder::Tuning;
use neon_thunder::audio::SilentAudio;
use neon_thunder::sim::combat::{Shooter, apply_powerup, fire_weapon};
use neon_thunder::sim::{
    EnemyVariant, EntityId, GameMode, Player, PlayerCount, PlayerSlot, PowerupType, Run, RunPhase, RunStatus,
    TickInput, WeaponType, World, WorldConfig, tick,
};

const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

fn mode() -> impl Strategy<Value = GameMode> {
    prop_oneof![Just(GameMode::Campaign), Just(GameMode::Endless)]
}

fn players() -> impl Strategy<Value = PlayerCount> {
    prop_oneof![Just(PlayerCount::One), Just(PlayerCount::Two)]
}

/// Held steering inputs, each kept for a stretch of ticks
fn steering() -> impl Strategy<Value = Vec<TickInput>> {
    let intent = (-1.0f32..=1.0, -1.0f32..=1.0).prop_map(|(x, y)| Vec2::new(x, y));
    prop::collection::vec((intent.clone(), intent), 1..12)
        .prop_map(|pairs| pairs.into_iter().map(|(p1, p2)| TickInput::new(p1, p2)).collect())
}

/// Aggressive balance so ships actually collide and collect
fn rough_tuning() -> Tuning {
    Tuning {
        kills_per_wave: 3,
        chaser_chance: 0.8,
        powerup_drop_chance: 0.5,
        ..Tuning::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn health_stays_in_range_and_roster_never_grows(
        seed in any::<u64>(),
        mode in mode(),
        count in players(),
        inputs in steering(),
    ) {
        let config = WorldConfig::new(mode, count, BOUNDS, seed).with_tuning(rough_tuning());
        let mut run = Run::from_world(World::new(config));
        let mut roster = run.world().players.len();

        for t in 0..1200usize {
            let input = inputs[(t / 40) % inputs.len()];
            match run.tick(&input, &mut SilentAudio) {
                RunStatus::Ended(_) if run.phase() == RunPhase::WaveComplete => {
                    prop_assert!(run.next_wave());
                }
                RunStatus::Running => {}
                _ => break,
            }

            let world = run.world();
            for p in &world.players {
                prop_assert!(p.health >= 0 && p.health <= p.max_health, "ship health {}", p.health);
            }
            for e in &world.enemies {
                prop_assert!(e.health >= 0, "enemy health {}", e.health);
            }
            prop_assert!(world.players.len() <= roster);
            roster = world.players.len();
        }
    }

    #[test]
    fn campaign_never_passes_last_wave_without_victory(
        seed in any::<u64>(),
        waves in 1u32..5,
        kill_bursts in prop::collection::vec(0u32..4, 1..40),
    ) {
        let tuning = Tuning { campaign_waves: waves, kills_per_wave: 2, ..Tuning::default() };
        let config = WorldConfig::new(GameMode::Campaign, PlayerCount::One, BOUNDS, seed).with_tuning(tuning);
        let mut run = Run::from_world(World::new(config));
        let mut won = false;

        for kills in kill_bursts {
            run.world_mut().kills_this_wave += kills;
            let status = run.tick(&TickInput::default(), &mut SilentAudio);
            let wave = run.world().current_wave;
            prop_assert!(wave <= waves);

            match (status, run.phase()) {
                (RunStatus::Ended(_), RunPhase::WaveComplete) => {
                    prop_assert!(wave < waves);
                    prop_assert!(run.next_wave());
                }
                (_, RunPhase::Victory) => {
                    prop_assert_eq!(wave, waves);
                    prop_assert!(!run.next_wave());
                    won = true;
                }
                _ => {}
            }
        }

        if won {
            prop_assert_eq!(run.tick(&TickInput::default(), &mut SilentAudio), RunStatus::Halted);
        }
    }

    #[test]
    fn health_pickup_at_max_is_idempotent(start in 1i32..=100, repeats in 1usize..6) {
        let mut player = Player::new(EntityId(1), PlayerSlot::One, Vec2::ZERO);
        player.health = start;
        apply_powerup(&mut player, PowerupType::Health);
        prop_assert_eq!(player.health, (start + 30).min(100));

        player.health = player.max_health;
        for _ in 0..repeats {
            apply_powerup(&mut player, PowerupType::Health);
            prop_assert_eq!(player.health, player.max_health);
        }
        prop_assert_eq!(player.weapon, WeaponType::Blaster);
    }

    #[test]
    fn piercing_shots_only_leave_through_the_top(
        seed in any::<u64>(),
        muzzle_x in 40.0f32..760.0,
        targets in prop::collection::vec((20.0f32..780.0, 0.0f32..400.0), 1..12),
    ) {
        let tuning = Tuning { fire_interval_ticks: 1_000_000, ..Tuning::default() };
        let config = WorldConfig::new(GameMode::Campaign, PlayerCount::One, BOUNDS, seed).with_tuning(tuning);
        let mut world = World::new(config);
        for (x, y) in targets {
            world.insert_enemy(EnemyVariant::Basic, Vec2::new(x, y), Vec2::ZERO, 20.0, 1_000_000);
        }

        let player = &world.players[0];
        let shooter = Shooter {
            id: player.body.id,
            slot: player.slot,
            pos: Vec2::new(muzzle_x, player.body.pos.y),
            weapon: WeaponType::Laser,
        };
        fire_weapon(&mut world, shooter);
        let beam = world.bullets[0].body.id;
        prop_assert!(world.bullets[0].piercing);

        let step = world.bullets[0].body.vel * world.tuning.bullet_speed;
        let mut last = world.bullets[0].body.pos;
        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
            match world.bullets.iter().find(|b| b.body.id == beam) {
                Some(b) => {
                    prop_assert!(b.body.pos.y >= -50.0);
                    last = b.body.pos;
                }
                None => {
                    prop_assert!((last + step).y < -50.0, "beam vanished at {:?}", last);
                    return Ok(());
                }
            }
        }
        prop_assert!(false, "beam never left the screen");
    }
}
