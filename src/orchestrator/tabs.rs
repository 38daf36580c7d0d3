//! Tab controller.

use strum::IntoEnumIterator;

use super::{App, Outcome};
use crate::state::Tab;
use crate::view::Region;

impl App {
    /// Make `tab` the only visible panel and the only active button.
    pub fn show_tab(&self, tab: Tab) {
        for other in Tab::iter() {
            self.view.set_visible(Region::Panel(other), false);
            self.view.set_active(Region::TabButton(other), false);
        }
        self.view.set_visible(Region::Panel(tab), true);
        self.view.set_active(Region::TabButton(tab), true);
        self.lock_state().active_tab = tab;
    }

    /// Switch tabs. Opening the GitHub tab also refreshes the connection status.
    pub async fn activate_tab(&self, tab: Tab) -> Outcome {
        self.show_tab(tab);
        tracing::debug!(%tab, "activated tab");
        match tab {
            Tab::Github => self.refresh_connection_status().await,
            _ => Outcome::Completed,
        }
    }
}
