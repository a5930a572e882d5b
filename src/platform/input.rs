//! Keyboard and touch steering
//!
//! Tracks held keys and live touches and turns them into one intent vector
//! per player slot for the next tick. Only the latest state matters; nothing
//! is buffered between ticks.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;

use crate::sim::state::{Player, PlayerCount, PlayerSlot};
use crate::sim::tick::TickInput;

/// Touches steer toward a point this far above the ship
const TOUCH_AIM_OFFSET: f32 = 50.0;
/// Touches closer than this to the aim point are ignored
const TOUCH_DEAD_ZONE: f32 = 10.0;

/// One set of four direction keys
#[derive(Debug, Clone, Copy)]
struct KeySet {
    left: &'static str,
    right: &'static str,
    up: &'static str,
    down: &'static str,
}

const WASD: KeySet = KeySet {
    left: "a",
    right: "d",
    up: "w",
    down: "s",
};

const ARROWS: KeySet = KeySet {
    left: "arrowleft",
    right: "arrowright",
    up: "arrowup",
    down: "arrowdown",
};

/// Held keys and active touches
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<String>,
    /// Touch id -> latest position, ordered so iteration is stable
    touches: BTreeMap<i32, Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key names are matched case-insensitively (`"W"` and `"w"` are the same key)
    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase());
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.remove(&key.to_lowercase());
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.keys.contains(&key.to_lowercase())
    }

    pub fn touch_start(&mut self, id: i32, pos: Vec2) {
        self.touches.insert(id, pos);
    }

    pub fn touch_move(&mut self, id: i32, pos: Vec2) {
        self.touches.insert(id, pos);
    }

    pub fn touch_end(&mut self, id: i32) {
        self.touches.remove(&id);
    }

    /// Forget everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.keys.clear();
        self.touches.clear();
    }

    /// Direction from one or more key clusters. A direction counts as held
    /// when any cluster holds it.
    fn axis(&self, clusters: &[KeySet]) -> Vec2 {
        let held = |pick: fn(&KeySet) -> &'static str| clusters.iter().any(|keys| self.is_down(pick(keys)));
        let mut dir = Vec2::ZERO;
        // Later checks win: right over left, down over up
        if held(|k| k.left) {
            dir.x = -1.0;
        }
        if held(|k| k.right) {
            dir.x = 1.0;
        }
        if held(|k| k.up) {
            dir.y = -1.0;
        }
        if held(|k| k.down) {
            dir.y = 1.0;
        }
        dir
    }

    fn keyboard(&self, slot: PlayerSlot, count: PlayerCount) -> Vec2 {
        match (count, slot) {
            // Solo pilots may use either cluster
            (PlayerCount::One, _) => self.axis(&[WASD, ARROWS]),
            (PlayerCount::Two, PlayerSlot::One) => self.axis(&[WASD]),
            (PlayerCount::Two, PlayerSlot::Two) => self.axis(&[ARROWS]),
        }
    }

    /// Steering from touches that belong to this ship, if any qualifies
    fn touch(&self, player: &Player, bounds: Vec2, count: PlayerCount) -> Option<Vec2> {
        let aim = player.body.pos - Vec2::new(0.0, TOUCH_AIM_OFFSET);
        let mut steer = None;
        for &pos in self.touches.values() {
            let left_half = pos.x < bounds.x / 2.0;
            let owned = match (count, player.slot) {
                (PlayerCount::One, _) => true,
                (PlayerCount::Two, PlayerSlot::One) => left_half,
                (PlayerCount::Two, PlayerSlot::Two) => !left_half,
            };
            if !owned {
                continue;
            }
            let diff = pos - aim;
            if diff.length() > TOUCH_DEAD_ZONE {
                steer = Some(diff.normalize());
            }
        }
        steer
    }

    /// Intent for every living ship. Touch steering overrides the keyboard.
    pub fn intents(&self, players: &[Player], bounds: Vec2, count: PlayerCount) -> TickInput {
        let mut input = TickInput::default();
        for player in players {
            let keys = self.keyboard(player.slot, count);
            input.intents[player.slot.index()] = self.touch(player, bounds, count).unwrap_or(keys);
        }
        input
    }
}
