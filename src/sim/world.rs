/// WorldState: the complete snapshot of a running session.
///
/// The play-field owns one distinguished protagonist and a roster of
/// hostile agents; the two are separate fields, so the protagonist can
/// never appear in its own hazard roster. The world never mutates an
/// agent's position directly — everything goes through the agent's
/// clamped setters.

use crate::config::{AgentConfig, GameConfig};
use crate::domain::agent::{Agent, Facing, Tick};
use crate::domain::geom::{Bounds, Rect};

/// The scheduler's two states. Paused freezes gameplay mutation while
/// the presentation layer keeps drawing the frozen state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Running,
    Paused,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Running => Mode::Paused,
            Mode::Paused => Mode::Running,
        }
    }
}

pub struct WorldState {
    /// The play-field rectangle.
    pub bounds: Rect,

    /// The player-controlled agent.
    pub protagonist: Agent,

    /// Hostile agents. Insertion order = per-tick processing order.
    pub agents: Vec<Agent>,

    /// Damage dealt per tick of continued contact with a hostile agent.
    pub contact_damage: u32,

    pub mode: Mode,
    pub tick: Tick,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl WorldState {
    pub fn new(config: &GameConfig) -> Self {
        let bounds = Bounds {
            min_x: config.world.min_x,
            max_x: config.world.max_x,
            min_y: config.world.min_y,
            max_y: config.world.max_y,
        };

        WorldState {
            bounds: Rect::new(0, 0, config.world.width, config.world.height),
            protagonist: build_agent(&config.protagonist, config, bounds),
            agents: vec![build_agent(&config.foe, config, bounds)],
            contact_damage: config.combat.contact_damage,
            mode: Mode::Running,
            tick: 0,
            message: String::new(),
            message_timer: 0,
        }
    }

    /// Defense-in-depth beyond the per-move clamp inside the agent:
    /// pull the protagonist's box back into the play-field rectangle.
    /// Vertical position is left alone mid-jump, like the agent's own
    /// clamp.
    pub fn check_borders(&mut self) {
        let field = self.bounds;
        let p = &mut self.protagonist;

        let max_x = field.right() - p.width();
        let x = p.pos_x().max(field.x).min(max_x);
        p.set_pos_x(x);

        if !p.is_jumping() {
            let max_y = field.bottom() - p.height();
            let y = p.pos_y().max(field.y).min(max_y);
            p.set_pos_y(y);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

fn build_agent(cfg: &AgentConfig, config: &GameConfig, bounds: Bounds) -> Agent {
    let facing = if cfg.facing_left { Facing::Left } else { Facing::Right };
    Agent::new(cfg.x, cfg.y, cfg.width, cfg.height, cfg.speed, cfg.health, facing)
        .with_bounds(bounds)
        .with_jump(config.jump.height, config.jump.gravity)
        .with_hit_cooldown(config.combat.hit_cooldown_ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldState {
        // Wide agent bounds so the field rectangle is the only limit
        // being tested.
        let loose = Bounds { min_x: -5000, max_x: 5000, min_y: -5000, max_y: 5000 };
        WorldState {
            bounds: Rect::new(0, 0, 1280, 780),
            protagonist: Agent::new(400, 390, 80, 60, 3, 100, Facing::Right)
                .with_bounds(loose),
            agents: vec![Agent::new(920, 440, 80, 60, 1, 5, Facing::Left).with_bounds(loose)],
            contact_damage: 10,
            mode: Mode::Running,
            tick: 0,
            message: String::new(),
            message_timer: 0,
        }
    }

    #[test]
    fn borders_pull_protagonist_back_inside() {
        let mut w = world();
        w.protagonist.set_pos_x(-300);
        w.protagonist.set_pos_y(3000);
        w.check_borders();
        assert_eq!(w.protagonist.pos_x(), 0);
        assert_eq!(w.protagonist.pos_y(), 780 - 60);

        w.protagonist.set_pos_x(4000);
        w.check_borders();
        assert_eq!(w.protagonist.pos_x(), 1280 - 80);
    }

    #[test]
    fn borders_leave_an_in_bounds_protagonist_alone() {
        let mut w = world();
        w.check_borders();
        assert_eq!(w.protagonist.pos_x(), 400);
        assert_eq!(w.protagonist.pos_y(), 390);
    }

    #[test]
    fn borders_skip_vertical_clamp_mid_jump() {
        let mut w = world();
        w.protagonist.start_jump();
        w.protagonist.set_pos_y(-250);
        w.check_borders();
        assert_eq!(w.protagonist.pos_y(), -250);
        assert_eq!(w.protagonist.pos_x(), 400);
    }

    #[test]
    fn pause_toggles_round_trip() {
        let mut w = world();
        assert_eq!(w.mode, Mode::Running);
        w.toggle_pause();
        assert_eq!(w.mode, Mode::Paused);
        w.toggle_pause();
        assert_eq!(w.mode, Mode::Running);
    }
}
