use crate::state::messages::NetworkResponse;
use log::{debug, error, info};
use sheet_feed::client::SheetFeed;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Loads the participant list once, on startup. The outcome is delivered as a
/// single `NetworkResponse`; there is no retry and no refresh.
pub struct ParticipantLoader {
    feed: SheetFeed,
    responses: mpsc::Sender<NetworkResponse>,
    task: Option<JoinHandle<()>>,
}

impl ParticipantLoader {
    pub fn new(feed: SheetFeed, responses: mpsc::Sender<NetworkResponse>) -> Self {
        Self { feed, responses, task: None }
    }

    /// Spawn the load. Returns `false` if it was already started.
    pub fn start(&mut self) -> bool {
        if self.task.is_some() {
            return false;
        }
        let feed = self.feed.clone();
        let responses = self.responses.clone();
        self.task = Some(tokio::spawn(load_participants(feed, responses)));
        true
    }

    pub fn shutdown(self) {
        if let Some(task) = self.task {
            task.abort();
        }
    }
}

async fn load_participants(feed: SheetFeed, responses: mpsc::Sender<NetworkResponse>) {
    debug!("loading participants from {}", feed.url());

    let response = match feed.fetch_participants().await {
        Ok(participants) => {
            info!("loaded {} participants", participants.len());
            NetworkResponse::ParticipantsLoaded { participants }
        }
        Err(err) => NetworkResponse::Error { message: err.to_string() },
    };

    if let Err(e) = responses.send(response).await {
        error!("Failed to deliver participant load: {e}");
    }
}
