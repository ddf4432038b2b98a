// Process-wide connectivity indicator and error banner
use crate::application::transport::TransportError;
use crate::application::ui_surface::{elements, UiSurface};
use crate::domain::connectivity::{Banner, Connectivity, ConnectivityStatus, Transition};
use std::sync::{Arc, Mutex, PoisonError};

pub struct ConnectivityMonitor {
    state: Mutex<Connectivity>,
    ui: Arc<dyn UiSurface>,
}

impl ConnectivityMonitor {
    pub fn new(ui: Arc<dyn UiSurface>) -> Self {
        ui.set_text(elements::STATUS_DOT, "connecting");
        ui.set_text(elements::STATUS_TEXT, "Connecting...");
        ui.set_visible(elements::ERROR_BANNER, false);
        Self {
            state: Mutex::new(Connectivity::new()),
            ui,
        }
    }

    pub fn record_response(&self, endpoint: &str) {
        let transition = self.lock().record_response();
        if transition == Transition::WentOnline {
            tracing::info!("Connection restored ({})", endpoint);
        }
        self.show_status(ConnectivityStatus::Online);
        self.ui.set_visible(elements::ERROR_BANNER, false);
    }

    pub fn record_failure(&self, endpoint: &str, error: &TransportError) {
        let (transition, banner) = {
            let mut state = self.lock();
            let transition = state.record_transport_failure(endpoint, &error.status_text());
            (transition, state.banner().cloned())
        };
        if transition == Transition::WentOffline {
            tracing::warn!("Connection lost: {} ({})", endpoint, error);
        }
        self.show_status(ConnectivityStatus::Offline);
        if let Some(banner) = banner {
            self.ui.set_text(elements::ERROR_BANNER, &banner.message);
            self.ui.set_visible(elements::ERROR_BANNER, true);
        }
    }

    pub fn status(&self) -> Option<ConnectivityStatus> {
        self.lock().status()
    }

    pub fn banner(&self) -> Option<Banner> {
        self.lock().banner().cloned()
    }

    fn show_status(&self, status: ConnectivityStatus) {
        let (dot, text) = match status {
            ConnectivityStatus::Online => ("online", "Connected"),
            ConnectivityStatus::Offline => ("offline", "No connection"),
        };
        self.ui.set_text(elements::STATUS_DOT, dot);
        self.ui.set_text(elements::STATUS_TEXT, text);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connectivity> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
