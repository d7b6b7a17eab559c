/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous movement while keys are held — all held directions
///     are reported together as a set; the agent resolves conflicts
///     by its fixed priority order, not by key arrival order
///   - Edge-triggered jump and pause (fire once per fresh press)
///
/// Uses crossterm's keyboard enhancement for Release events when
/// available. Falls back to timeout-based release detection on
/// terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::agent::{Direction, DirectionSet};

/// After this duration without a Press/Repeat event, consider the key
/// released. Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the most
    /// recent drain_events() call. Used for jump/pause edges.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    self.raw_events.push(key);

                    match key.kind {
                        KeyEventKind::Release if self.honor_release => {
                            self.last_active.remove(&key.code);
                        }
                        KeyEventKind::Release => {
                            // Rely on timeout-based expiry instead
                        }
                        _ => {
                            let was_held = self.is_held(key.code);
                            self.last_active.insert(key.code, Instant::now());
                            if !was_held {
                                self.fresh_presses.push(key.code);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        // Expire keys that have timed out (fallback for terminals
        // without Release events)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// The set of directions currently held. Conflicting keys (left and
    /// right together) are both reported; the agent decides.
    pub fn held_directions(&self) -> DirectionSet {
        let mut held = DirectionSet::default();
        if self.any_held(KEYS_RIGHT) {
            held.insert(Direction::Right);
        }
        if self.any_held(KEYS_LEFT) {
            held.insert(Direction::Left);
        }
        if self.any_held(KEYS_UP) {
            held.insert(Direction::Up);
        }
        if self.any_held(KEYS_DOWN) {
            held.insert(Direction::Down);
        }
        held
    }

    pub fn jump_pressed(&self) -> bool {
        self.any_pressed(KEYS_JUMP)
    }

    pub fn pause_pressed(&self) -> bool {
        self.any_pressed(KEYS_PAUSE)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_pressed(KEYS_QUIT) || self.ctrl_c_pressed()
    }

    fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }
}
