/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use domain::agent::DirectionSet;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Mode, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let mut world = WorldState::new(&config);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Moon Chase!");
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_pressed() || gp.quit_pressed() {
            break;
        }

        if kb.pause_pressed() || gp.pause_pressed() {
            world.toggle_pause();
            match world.mode {
                Mode::Paused => world.set_message("PAUSED  [P] Resume", 0),
                Mode::Running => {
                    world.message.clear();
                    world.message_timer = 0;
                }
            }
        }

        // The jump trigger is not gated by pause; the arc itself only
        // advances on running ticks.
        if kb.jump_pressed() || gp.jump_pressed() {
            world.protagonist.start_jump();
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::step(world, held_directions(&kb, &gp));
            process_events(world, &events);
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Keyboard and gamepad contribute to one held-direction set; the
/// agent resolves conflicts by its priority order.
fn held_directions(kb: &InputState, gp: &GamepadState) -> DirectionSet {
    let mut held = kb.held_directions();
    held.merge(gp.held_directions());
    held
}

fn process_events(world: &mut WorldState, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ProtagonistHit { amount } => {
                world.set_message(&format!("-{amount} HP"), 20);
            }
            GameEvent::ProtagonistExhausted => {
                world.set_message("SIGNAL LOST", 0);
            }
            GameEvent::Landed => {}
        }
    }
}
