use crate::state::wheel::SpinId;
use crossterm::event::KeyEvent;
use sheet_feed::ParticipantList;

#[derive(Debug)]
pub enum NetworkResponse {
    ParticipantsLoaded { participants: ParticipantList },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
    /// The animation for this spin has run its full duration.
    SpinElapsed { spin_id: SpinId },
}
