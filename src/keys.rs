use crate::app::App;
use crate::state::wheel::Effect;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Returns the effects of whatever transition the key triggered.
pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) -> Vec<Effect> {
    let mut guard = app.lock().await;

    match (key_event.code, key_event.modifiers) {
        // Quit
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => guard.request_quit(),

        // Winner modal
        (KeyCode::Esc | Char('c') | Char('x'), _) if guard.state.spin.modal_visible => {
            guard.close_modal();
        }

        // Spin
        (Char(' ') | Char('s') | KeyCode::Enter, _) => return guard.spin(),

        // Global
        (Char('f'), _) => guard.toggle_full_screen(),
        (Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    Vec::new()
}
