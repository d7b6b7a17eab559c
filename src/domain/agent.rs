/// Agents: the protagonist and the foes that hunt it.
///
/// An agent is a mobile bounding box with facing, health, a hit
/// cooldown, and a frame-driven jump arc. All position writes go
/// through the clamped setters: X is always confined to the movement
/// bounds, Y only while the agent is not mid-jump (the arc may rise
/// above `min_y`).

use super::geom::{Bounds, Rect};

/// World tick counter — the single time base for cooldowns.
pub type Tick = u64;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Movement direction tokens. Declaration order is the input priority
/// order: when several directions are held at once, the first wins.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

const PRIORITY: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Up,
    Direction::Down,
];

/// The directions held during one frame. Order-free: conflicting input
/// resolves through `resolve()`, never through insertion order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct DirectionSet {
    right: bool,
    left: bool,
    up: bool,
    down: bool,
}

impl DirectionSet {
    pub fn single(dir: Direction) -> Self {
        let mut set = DirectionSet::default();
        set.insert(dir);
        set
    }

    pub fn insert(&mut self, dir: Direction) {
        match dir {
            Direction::Right => self.right = true,
            Direction::Left => self.left = true,
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
        }
    }

    pub fn contains(&self, dir: Direction) -> bool {
        match dir {
            Direction::Right => self.right,
            Direction::Left => self.left,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.right || self.left || self.up || self.down)
    }

    pub fn merge(&mut self, other: DirectionSet) {
        self.right |= other.right;
        self.left |= other.left;
        self.up |= other.up;
        self.down |= other.down;
    }

    /// First held direction in priority order, if any.
    pub fn resolve(&self) -> Option<Direction> {
        PRIORITY.iter().copied().find(|&d| self.contains(d))
    }
}

/// A jump in flight: a fixed number of ascent steps followed by the
/// same number of descent steps, advanced once per frame tick by the
/// scheduler. Both counters at zero = back on the ground.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JumpArc {
    ascent_remaining: u32,
    descent_remaining: u32,
}

impl JumpArc {
    pub fn grounded() -> Self {
        JumpArc { ascent_remaining: 0, descent_remaining: 0 }
    }

    /// Start a fresh arc covering `height` pixels at `gravity` pixels
    /// per step.
    pub fn launch(height: i32, gravity: i32) -> Self {
        let steps = if gravity > 0 { (height / gravity).max(0) as u32 } else { 0 };
        JumpArc { ascent_remaining: steps, descent_remaining: steps }
    }

    pub fn is_active(&self) -> bool {
        self.ascent_remaining > 0 || self.descent_remaining > 0
    }

    /// Advance one tick. Returns the vertical displacement for this
    /// step (negative while rising), 0 once the arc is spent.
    pub fn tick(&mut self, gravity: i32) -> i32 {
        if self.ascent_remaining > 0 {
            self.ascent_remaining -= 1;
            -gravity
        } else if self.descent_remaining > 0 {
            self.descent_remaining -= 1;
            gravity
        } else {
            0
        }
    }
}

// ── Agent ──

pub const DEFAULT_JUMP_HEIGHT: i32 = 140;
pub const DEFAULT_GRAVITY: i32 = 7;
pub const DEFAULT_HIT_COOLDOWN: Tick = 30;
pub const DEFAULT_BOUNDS: Bounds = Bounds {
    min_x: 0,
    max_x: 1300,
    min_y: 375,
    max_y: 1000,
};

#[derive(Clone, Debug)]
pub struct Agent {
    pos_x: i32,
    pos_y: i32,
    width: i32,
    height: i32,
    speed: i32,
    facing: Facing,
    health: u32,
    full_health: u32,
    /// Tick of the most recent hit that left the agent alive.
    /// `None` = never hit = not invulnerable.
    last_hit: Option<Tick>,
    hit_cooldown: Tick,
    jump: JumpArc,
    jump_height: i32,
    gravity: i32,
    bounds: Bounds,
}

impl Agent {
    /// An agent's identity (box, speed, health, facing) is fixed at
    /// construction; only position, facing, health, and the jump arc
    /// mutate afterwards.
    pub fn new(x: i32, y: i32, width: i32, height: i32, speed: i32, health: u32, facing: Facing) -> Self {
        let bounds = DEFAULT_BOUNDS;
        Agent {
            pos_x: bounds.clamp_x(x, width),
            pos_y: bounds.clamp_y(y, height),
            width,
            height,
            speed,
            facing,
            health,
            full_health: health,
            last_hit: None,
            hit_cooldown: DEFAULT_HIT_COOLDOWN,
            jump: JumpArc::grounded(),
            jump_height: DEFAULT_JUMP_HEIGHT,
            gravity: DEFAULT_GRAVITY,
            bounds,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self.pos_x = bounds.clamp_x(self.pos_x, self.width);
        self.pos_y = bounds.clamp_y(self.pos_y, self.height);
        self
    }

    pub fn with_jump(mut self, height: i32, gravity: i32) -> Self {
        self.jump_height = height;
        self.gravity = gravity;
        self
    }

    pub fn with_hit_cooldown(mut self, ticks: Tick) -> Self {
        self.hit_cooldown = ticks;
        self
    }

    // ── Accessors ──

    pub fn pos_x(&self) -> i32 { self.pos_x }
    pub fn pos_y(&self) -> i32 { self.pos_y }
    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }
    #[allow(dead_code)]
    pub fn speed(&self) -> i32 { self.speed }
    pub fn facing(&self) -> Facing { self.facing }
    pub fn health(&self) -> u32 { self.health }
    pub fn full_health(&self) -> u32 { self.full_health }
    #[allow(dead_code)]
    pub fn hit_cooldown(&self) -> Tick { self.hit_cooldown }
    pub fn bounds(&self) -> Bounds { self.bounds }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.pos_x, self.pos_y, self.width, self.height)
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_active()
    }

    /// Pure function of `now` and the last recorded hit.
    pub fn invulnerable(&self, now: Tick) -> bool {
        match self.last_hit {
            Some(t) => now.saturating_sub(t) < self.hit_cooldown,
            None => false,
        }
    }

    // ── Clamped position setters ──

    pub fn set_pos_x(&mut self, x: i32) {
        self.pos_x = self.bounds.clamp_x(x, self.width);
    }

    /// The vertical clamp is suspended while a jump is in flight so the
    /// arc may rise above `min_y`; it re-engages on landing.
    pub fn set_pos_y(&mut self, y: i32) {
        if self.is_jumping() {
            self.pos_y = y;
        } else {
            self.pos_y = self.bounds.clamp_y(y, self.height);
        }
    }

    // ── Operations ──

    /// Apply one frame of held directional input: at most one axis
    /// moves per call, chosen by the fixed priority order. Horizontal
    /// movement also turns the agent to face its travel direction.
    pub fn apply_movement(&mut self, held: DirectionSet) {
        let dir = match held.resolve() {
            Some(d) => d,
            None => return,
        };
        match dir {
            Direction::Right => {
                self.facing = Facing::Right;
                self.set_pos_x(self.pos_x + self.speed);
            }
            Direction::Left => {
                self.facing = Facing::Left;
                self.set_pos_x(self.pos_x - self.speed);
            }
            Direction::Up => self.set_pos_y(self.pos_y - self.speed),
            Direction::Down => self.set_pos_y(self.pos_y + self.speed),
        }
    }

    /// Pursue a target position: one horizontal and one vertical step
    /// per call, each axis independent. Unlike held input, pursuit may
    /// move diagonally by composing two axis moves in one tick.
    pub fn chase(&mut self, target_x: i32, target_y: i32) {
        if target_x > self.pos_x {
            self.apply_movement(DirectionSet::single(Direction::Right));
        } else if target_x < self.pos_x {
            self.apply_movement(DirectionSet::single(Direction::Left));
        }
        if target_y > self.pos_y {
            self.apply_movement(DirectionSet::single(Direction::Down));
        } else if target_y < self.pos_y {
            self.apply_movement(DirectionSet::single(Direction::Up));
        }
    }

    /// Absorb a hit at tick `now`. Ignored while the hit cooldown is
    /// running or once health is exhausted. A hit that drops health to
    /// exactly zero does not restart the cooldown window.
    pub fn take_damage(&mut self, amount: u32, now: Tick) {
        if self.invulnerable(now) || self.health == 0 {
            return;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health > 0 {
            self.last_hit = Some(now);
        }
    }

    /// Launch a jump. No-op while already airborne. Returns whether a
    /// fresh arc actually started.
    pub fn start_jump(&mut self) -> bool {
        if self.is_jumping() {
            return false;
        }
        self.jump = JumpArc::launch(self.jump_height, self.gravity);
        self.jump.is_active()
    }

    /// Advance an in-flight jump by one frame step. Returns true on the
    /// tick the agent lands.
    pub fn advance_jump(&mut self) -> bool {
        if !self.is_jumping() {
            return false;
        }
        let dy = self.jump.tick(self.gravity);
        let target = self.pos_y + dy;
        // After the final descent step the arc is spent, so this write
        // goes back through the ground clamp.
        self.set_pos_y(target);
        !self.is_jumping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protagonist() -> Agent {
        Agent::new(400, 390, 80, 60, 3, 100, Facing::Right)
    }

    // ── DirectionSet ──

    #[test]
    fn resolve_follows_priority_order() {
        let mut held = DirectionSet::default();
        held.insert(Direction::Down);
        held.insert(Direction::Left);
        held.insert(Direction::Right);
        assert_eq!(held.resolve(), Some(Direction::Right));
    }

    #[test]
    fn empty_set_resolves_to_none() {
        assert_eq!(DirectionSet::default().resolve(), None);
        assert!(DirectionSet::default().is_empty());
    }

    // ── Movement ──

    #[test]
    fn conflicting_input_matches_right_alone() {
        let mut a = protagonist();
        let mut b = protagonist();

        let mut both = DirectionSet::default();
        both.insert(Direction::Right);
        both.insert(Direction::Left);
        a.apply_movement(both);
        b.apply_movement(DirectionSet::single(Direction::Right));

        assert_eq!(a.pos_x(), b.pos_x());
        assert_eq!(a.pos_y(), b.pos_y());
        assert_eq!(a.facing(), b.facing());
    }

    #[test]
    fn five_steps_right_from_400() {
        let mut a = protagonist();
        for _ in 0..5 {
            a.apply_movement(DirectionSet::single(Direction::Right));
            assert_eq!(a.facing(), Facing::Right);
        }
        assert_eq!(a.pos_x(), 415);
        assert_eq!(a.pos_y(), 390);
    }

    #[test]
    fn horizontal_movement_turns_the_agent() {
        let mut a = protagonist();
        a.apply_movement(DirectionSet::single(Direction::Left));
        assert_eq!(a.facing(), Facing::Left);
        a.apply_movement(DirectionSet::single(Direction::Right));
        assert_eq!(a.facing(), Facing::Right);
    }

    #[test]
    fn vertical_movement_keeps_facing() {
        let mut a = Agent::new(400, 500, 80, 60, 3, 100, Facing::Left);
        a.apply_movement(DirectionSet::single(Direction::Down));
        assert_eq!(a.facing(), Facing::Left);
        assert_eq!(a.pos_y(), 503);
    }

    #[test]
    fn only_one_axis_moves_per_call() {
        let mut a = Agent::new(400, 500, 80, 60, 3, 100, Facing::Right);
        let mut held = DirectionSet::default();
        held.insert(Direction::Right);
        held.insert(Direction::Down);
        a.apply_movement(held);
        assert_eq!(a.pos_x(), 403);
        assert_eq!(a.pos_y(), 500);
    }

    #[test]
    fn movement_never_escapes_bounds() {
        let mut a = protagonist();
        for _ in 0..1000 {
            a.apply_movement(DirectionSet::single(Direction::Left));
        }
        assert_eq!(a.pos_x(), DEFAULT_BOUNDS.min_x);

        for _ in 0..1000 {
            a.apply_movement(DirectionSet::single(Direction::Right));
        }
        assert_eq!(a.pos_x(), DEFAULT_BOUNDS.max_x - a.width());

        for _ in 0..1000 {
            a.apply_movement(DirectionSet::single(Direction::Up));
        }
        assert_eq!(a.pos_y(), DEFAULT_BOUNDS.min_y);

        for _ in 0..1000 {
            a.apply_movement(DirectionSet::single(Direction::Down));
        }
        assert_eq!(a.pos_y(), DEFAULT_BOUNDS.max_y - a.height());
    }

    #[test]
    fn construction_clamps_out_of_range_position() {
        let a = Agent::new(-500, 0, 80, 60, 3, 100, Facing::Right);
        assert_eq!(a.pos_x(), 0);
        assert_eq!(a.pos_y(), 375);
    }

    // ── Chase ──

    #[test]
    fn chase_at_target_is_a_no_op() {
        let mut a = Agent::new(500, 500, 80, 60, 1, 5, Facing::Left);
        let (x, y) = (a.pos_x(), a.pos_y());
        a.chase(x, y);
        assert_eq!(a.pos_x(), x);
        assert_eq!(a.pos_y(), y);
    }

    #[test]
    fn chase_composes_both_axes() {
        let mut a = Agent::new(920, 440, 80, 60, 1, 5, Facing::Left);
        a.chase(400, 390);
        assert_eq!(a.pos_x(), 919);
        assert_eq!(a.pos_y(), 439);
        assert_eq!(a.facing(), Facing::Left);

        a.chase(2000, 2000);
        assert_eq!(a.pos_x(), 920);
        assert_eq!(a.pos_y(), 440);
        assert_eq!(a.facing(), Facing::Right);
    }

    #[test]
    fn chase_steps_full_speed_even_when_close() {
        // One pixel away, speed 3: the pursuer steps its full speed
        // and overshoots.
        let mut a = Agent::new(500, 500, 80, 60, 3, 5, Facing::Left);
        a.chase(501, 500);
        assert_eq!(a.pos_x(), 503);
    }

    // ── Damage / invulnerability ──

    #[test]
    fn fresh_agent_is_not_invulnerable() {
        let a = protagonist();
        assert!(!a.invulnerable(0));
        assert!(!a.invulnerable(10_000));
    }

    #[test]
    fn damage_applies_once_per_cooldown_window() {
        let mut a = protagonist();
        a.take_damage(10, 100);
        assert_eq!(a.health(), 90);

        // Repeated hits inside the window are absorbed.
        a.take_damage(10, 100);
        a.take_damage(10, 115);
        a.take_damage(10, 129);
        assert_eq!(a.health(), 90);

        // Window elapsed: the next hit lands.
        a.take_damage(10, 130);
        assert_eq!(a.health(), 80);
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut a = Agent::new(920, 440, 80, 60, 1, 5, Facing::Left);
        a.take_damage(50, 10);
        assert_eq!(a.health(), 0);
    }

    #[test]
    fn finishing_blow_leaves_cooldown_state_unchanged() {
        let mut a = Agent::new(920, 440, 80, 60, 1, 25, Facing::Left);
        a.take_damage(10, 100);
        assert_eq!(a.health(), 15);

        a.take_damage(10, 200);
        assert_eq!(a.health(), 5);
        assert!(a.invulnerable(210));

        // The killing hit does not refresh the window: the agent's
        // cooldown still dates from tick 200.
        a.take_damage(10, 300);
        assert_eq!(a.health(), 0);
        assert!(!a.invulnerable(300));
    }

    #[test]
    fn exhausted_agent_ignores_further_hits() {
        let mut a = Agent::new(920, 440, 80, 60, 1, 5, Facing::Left);
        a.take_damage(5, 10);
        assert_eq!(a.health(), 0);
        a.take_damage(5, 1000);
        assert_eq!(a.health(), 0);
    }

    // ── Jump ──

    #[test]
    fn jump_arc_returns_to_launch_height() {
        let mut a = protagonist();
        let start_y = a.pos_y();
        assert!(a.start_jump());

        let steps = 2 * (DEFAULT_JUMP_HEIGHT / DEFAULT_GRAVITY) as usize;
        let mut landed_at = None;
        for i in 0..steps {
            if a.advance_jump() {
                landed_at = Some(i + 1);
            }
        }
        assert_eq!(landed_at, Some(steps));
        assert!(!a.is_jumping());
        assert_eq!(a.pos_y(), start_y);
    }

    #[test]
    fn second_jump_mid_flight_is_a_no_op() {
        let mut a = protagonist();
        assert!(a.start_jump());
        a.advance_jump();
        let y = a.pos_y();
        let arc = a.jump;

        assert!(!a.start_jump());
        assert_eq!(a.jump, arc);
        assert_eq!(a.pos_y(), y);
    }

    #[test]
    fn jump_rises_above_the_ground_clamp() {
        let mut a = Agent::new(400, 375, 80, 60, 3, 100, Facing::Right);
        a.start_jump();
        a.advance_jump();
        assert!(a.pos_y() < DEFAULT_BOUNDS.min_y);

        // Peak of the arc: height pixels above the launch point.
        let steps = (DEFAULT_JUMP_HEIGHT / DEFAULT_GRAVITY) as usize;
        for _ in 1..steps {
            a.advance_jump();
        }
        assert_eq!(a.pos_y(), 375 - DEFAULT_JUMP_HEIGHT);
    }

    #[test]
    fn ground_clamp_reengages_after_landing() {
        let mut a = Agent::new(400, 375, 80, 60, 3, 100, Facing::Right);
        a.start_jump();
        while !a.advance_jump() {}
        assert!(!a.is_jumping());

        a.set_pos_y(0);
        assert_eq!(a.pos_y(), DEFAULT_BOUNDS.min_y);
    }

    #[test]
    fn vertical_input_is_unclamped_mid_jump() {
        let mut a = Agent::new(400, 380, 80, 60, 10, 100, Facing::Right);
        a.start_jump();
        a.apply_movement(DirectionSet::single(Direction::Up));
        assert_eq!(a.pos_y(), 370);
    }

    #[test]
    fn advance_without_jump_does_nothing() {
        let mut a = protagonist();
        let y = a.pos_y();
        assert!(!a.advance_jump());
        assert_eq!(a.pos_y(), y);
    }
}
