// Connectivity state machine
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Online,
    Offline,
}

/// Sticky diagnostic naming the call that failed last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub endpoint: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    WentOnline,
    WentOffline,
}

/// Tracks only the most recent observation. There is no debounce, so
/// intermittent failures make the status flap between cycles.
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    status: Option<ConnectivityStatus>,
    banner: Option<Banner>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first call completes.
    pub fn status(&self) -> Option<ConnectivityStatus> {
        self.status
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Any decoded response, including `success: false`, proves the server is reachable.
    pub fn record_response(&mut self) -> Transition {
        self.banner = None;
        self.move_to(ConnectivityStatus::Online)
    }

    pub fn record_transport_failure(&mut self, endpoint: &str, status: &str) -> Transition {
        self.banner = Some(Banner {
            endpoint: endpoint.to_string(),
            message: format!("{} failed: {}", endpoint, status),
        });
        self.move_to(ConnectivityStatus::Offline)
    }

    fn move_to(&mut self, next: ConnectivityStatus) -> Transition {
        let previous = self.status.replace(next);
        match (previous, next) {
            (Some(p), n) if p == n => Transition::Unchanged,
            (_, ConnectivityStatus::Online) => Transition::WentOnline,
            (_, ConnectivityStatus::Offline) => Transition::WentOffline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_then_success_clears_banner() {
        let mut c = Connectivity::new();
        assert_eq!(c.status(), None);

        assert_eq!(
            c.record_transport_failure("/api/data/stats", "HTTP 502"),
            Transition::WentOffline
        );
        assert_eq!(c.status(), Some(ConnectivityStatus::Offline));
        assert_eq!(c.banner().unwrap().message, "/api/data/stats failed: HTTP 502");

        assert_eq!(c.record_response(), Transition::WentOnline);
        assert_eq!(c.status(), Some(ConnectivityStatus::Online));
        assert!(c.banner().is_none());
    }

    #[test]
    fn test_repeated_failures_replace_banner() {
        let mut c = Connectivity::new();
        c.record_transport_failure("/a", "unreachable");
        assert_eq!(c.record_transport_failure("/b", "HTTP 500"), Transition::Unchanged);
        assert_eq!(c.banner().unwrap().endpoint, "/b");
    }

    #[test]
    fn test_status_follows_latest_observation() {
        let mut c = Connectivity::new();
        c.record_response();
        c.record_transport_failure("/a", "unreachable");
        c.record_response();
        c.record_transport_failure("/a", "unreachable");
        assert_eq!(c.status(), Some(ConnectivityStatus::Offline));
    }
}
