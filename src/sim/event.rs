/// Events emitted during a simulation step.
/// The presentation layer consumes these for HUD feedback.

#[derive(Clone, Debug)]
pub enum GameEvent {
    Landed,
    ProtagonistHit { amount: u32 },
    ProtagonistExhausted,
}
