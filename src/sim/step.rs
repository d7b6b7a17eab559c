/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Protagonist movement from held input (+ border re-clamp)
///   2. Jump arc advancement (every agent, once per tick)
///   3. Pursuit (every hostile agent chases the protagonist)
///   4. Contact damage (AABB overlap against the protagonist)
///
/// Pursuit runs every tick whether or not any input is held. Contact
/// damage is throttled only by the protagonist's own hit cooldown —
/// sustained overlap keeps dealing damage each time the window lapses.
/// A paused world is left completely untouched.

use crate::domain::agent::DirectionSet;
use crate::domain::geom;
use super::event::GameEvent;
use super::world::{Mode, WorldState};

pub fn step(world: &mut WorldState, held: DirectionSet) -> Vec<GameEvent> {
    if world.mode != Mode::Running {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 {
            world.message.clear();
        }
    }

    resolve_protagonist_movement(world, held);
    resolve_jump_arcs(world, &mut events);
    resolve_pursuit(world);
    resolve_contact(world, &mut events);

    events
}

fn resolve_protagonist_movement(world: &mut WorldState, held: DirectionSet) {
    if held.is_empty() {
        return;
    }
    world.protagonist.apply_movement(held);
    world.check_borders();
}

/// All position mutation happens here on the frame tick — a jump is a
/// bounded counter, not a background timer.
fn resolve_jump_arcs(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.protagonist.advance_jump() {
        events.push(GameEvent::Landed);
    }
    for agent in world.agents.iter_mut() {
        agent.advance_jump();
    }
}

fn resolve_pursuit(world: &mut WorldState) {
    let px = world.protagonist.pos_x();
    let py = world.protagonist.pos_y();
    for agent in world.agents.iter_mut() {
        agent.chase(px, py);
    }
}

/// One-directional hazard: overlap hurts the protagonist, never the
/// hostile agent. At most one hit per hostile agent per tick.
fn resolve_contact(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let now = world.tick;
    for i in 0..world.agents.len() {
        let foe_box = world.agents[i].bounding_box();
        if !geom::overlaps(foe_box, world.protagonist.bounding_box()) {
            continue;
        }

        let before = world.protagonist.health();
        world.protagonist.take_damage(world.contact_damage, now);
        let after = world.protagonist.health();

        if after < before {
            events.push(GameEvent::ProtagonistHit { amount: before - after });
            if after == 0 {
                events.push(GameEvent::ProtagonistExhausted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::{Agent, Direction, Facing};
    use crate::domain::geom::Rect;

    fn world_with_foe_at(x: i32, y: i32) -> WorldState {
        WorldState {
            bounds: Rect::new(0, 0, 1280, 780),
            protagonist: Agent::new(400, 390, 80, 60, 3, 100, Facing::Right),
            agents: vec![Agent::new(x, y, 80, 60, 1, 5, Facing::Left)],
            contact_damage: 10,
            mode: Mode::Running,
            tick: 0,
            message: String::new(),
            message_timer: 0,
        }
    }

    fn hits(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ProtagonistHit { .. }))
            .count()
    }

    #[test]
    fn distant_foe_deals_no_damage() {
        let mut w = world_with_foe_at(920, 440);
        let events = step(&mut w, DirectionSet::default());
        assert_eq!(hits(&events), 0);
        assert_eq!(w.protagonist.health(), 100);
    }

    #[test]
    fn overlapping_foe_hits_exactly_once_per_tick() {
        let mut w = world_with_foe_at(420, 400);
        let events = step(&mut w, DirectionSet::default());
        assert_eq!(hits(&events), 1);
        assert_eq!(w.protagonist.health(), 90);
        // One-directional hazard: the foe is untouched.
        assert_eq!(w.agents[0].health(), 5);
    }

    #[test]
    fn sustained_overlap_is_throttled_by_the_hit_cooldown() {
        // Foe parked on top of the protagonist: chase is a no-op, the
        // overlap never breaks.
        let mut w = world_with_foe_at(400, 390);
        for _ in 0..30 {
            step(&mut w, DirectionSet::default());
        }
        // First hit at tick 1; ticks 2..=30 fall inside the window.
        assert_eq!(w.protagonist.health(), 90);

        step(&mut w, DirectionSet::default());
        assert_eq!(w.protagonist.health(), 80);
    }

    #[test]
    fn paused_world_is_left_untouched() {
        let mut w = world_with_foe_at(420, 400);
        w.mode = Mode::Paused;
        let events = step(&mut w, DirectionSet::single(Direction::Right));
        assert!(events.is_empty());
        assert_eq!(w.tick, 0);
        assert_eq!(w.protagonist.pos_x(), 400);
        assert_eq!(w.protagonist.health(), 100);
        assert_eq!(w.agents[0].pos_x(), 420);
    }

    #[test]
    fn held_input_moves_the_protagonist() {
        let mut w = world_with_foe_at(920, 440);
        step(&mut w, DirectionSet::single(Direction::Right));
        assert_eq!(w.protagonist.pos_x(), 403);
    }

    #[test]
    fn pursuit_runs_without_any_input() {
        let mut w = world_with_foe_at(920, 440);
        step(&mut w, DirectionSet::default());
        // The foe closes in on both axes in the same tick.
        assert_eq!(w.agents[0].pos_x(), 919);
        assert_eq!(w.agents[0].pos_y(), 439);
        assert_eq!(w.agents[0].facing(), Facing::Left);
    }

    #[test]
    fn jump_arc_is_driven_by_the_step() {
        let mut w = world_with_foe_at(920, 440);
        let start_y = w.protagonist.pos_y();
        assert!(w.protagonist.start_jump());

        let events = step(&mut w, DirectionSet::default());
        assert!(events.is_empty());
        assert_eq!(w.protagonist.pos_y(), start_y - 7);

        // 140 / 7 = 20 steps up, 20 steps down; one is already spent.
        let mut landed = 0;
        for _ in 0..39 {
            let events = step(&mut w, DirectionSet::default());
            landed += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Landed))
                .count();
        }
        assert_eq!(landed, 1);
        assert!(!w.protagonist.is_jumping());
        assert_eq!(w.protagonist.pos_y(), start_y);
    }

    #[test]
    fn exhaustion_is_reported_once() {
        let mut w = world_with_foe_at(400, 390);
        w.protagonist = Agent::new(400, 390, 80, 60, 3, 10, Facing::Right);
        let events = step(&mut w, DirectionSet::default());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ProtagonistExhausted)));
        assert_eq!(w.protagonist.health(), 0);

        // Later overlap ticks no longer produce hit events.
        let events = step(&mut w, DirectionSet::default());
        assert_eq!(hits(&events), 0);
    }

    #[test]
    fn message_timer_counts_down_and_clears() {
        let mut w = world_with_foe_at(920, 440);
        w.set_message("OUCH", 2);
        step(&mut w, DirectionSet::default());
        assert_eq!(w.message, "OUCH");
        step(&mut w, DirectionSet::default());
        assert!(w.message.is_empty());
    }
}
