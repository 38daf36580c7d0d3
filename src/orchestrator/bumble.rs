//! Bumble launch action.

use tracing::{info, warn};

use super::{App, Outcome};
use crate::constants;

impl App {
    /// Ask the backend to start the Bumble assistant.
    pub async fn launch_bumble(&self) -> Outcome {
        let loading = self.loading.enter(self.view.as_ref());
        let result = self.backend.launch_bumble().await;
        drop(loading);

        match result {
            Ok(launch) if launch.success => {
                let message = launch
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| constants::MSG_BUMBLE_LAUNCHED.to_string());
                info!("bumble launched");
                self.view.notify(&message);
                Outcome::Completed
            }
            Ok(launch) => {
                let message = launch
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Failed to launch Bumble.".to_string());
                warn!(%message, "bumble launch refused");
                self.view.alert(&message);
                Outcome::Failed(message)
            }
            Err(err) => {
                warn!(error = %err, "bumble launch failed");
                let message = err.user_message();
                self.view.alert(&message);
                Outcome::Failed(message)
            }
        }
    }
}
