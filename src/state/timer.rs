use crate::state::messages::UiEvent;
use crate::state::wheel::SpinId;
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Deferred spin completions. Each spin gets one task that sleeps for the
/// animation duration and then reports `SpinElapsed` back to the UI loop.
pub struct SpinTimer {
    ui_events: mpsc::Sender<UiEvent>,
    scheduled: Vec<(SpinId, JoinHandle<()>)>,
}

impl SpinTimer {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events, scheduled: Vec::new() }
    }

    pub fn schedule(&mut self, spin_id: SpinId, after: Duration) {
        self.scheduled.retain(|(_, handle)| !handle.is_finished());

        let ui_events = self.ui_events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            debug!("spin {} elapsed", spin_id.value());
            let _ = ui_events.send(UiEvent::SpinElapsed { spin_id }).await;
        });
        self.scheduled.push((spin_id, handle));
    }

    pub fn pending(&self) -> usize {
        self.scheduled.iter().filter(|(_, h)| !h.is_finished()).count()
    }

    pub fn shutdown(self) {
        for (_, handle) in self.scheduled {
            handle.abort();
        }
    }
}
