// In-memory UI element layer served by the local control surface
use crate::application::ui_surface::UiSurface;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardSnapshot {
    pub texts: BTreeMap<String, String>,
    pub enabled: BTreeMap<String, bool>,
    pub visible: BTreeMap<String, bool>,
    pub progress: BTreeMap<String, f64>,
    pub tables: BTreeMap<String, Vec<Vec<String>>>,
}

#[derive(Default)]
pub struct DisplayBoard {
    state: Mutex<BoardSnapshot>,
}

impl DisplayBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.state().clone()
    }

    pub fn text(&self, element: &str) -> Option<String> {
        self.state().texts.get(element).cloned()
    }

    /// Elements are enabled until told otherwise.
    pub fn is_enabled(&self, element: &str) -> bool {
        self.state().enabled.get(element).copied().unwrap_or(true)
    }

    pub fn is_visible(&self, element: &str) -> bool {
        self.state().visible.get(element).copied().unwrap_or(true)
    }

    pub fn progress(&self, element: &str) -> Option<f64> {
        self.state().progress.get(element).copied()
    }

    pub fn rows(&self, element: &str) -> Option<Vec<Vec<String>>> {
        self.state().tables.get(element).cloned()
    }

    fn state(&self) -> MutexGuard<'_, BoardSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UiSurface for DisplayBoard {
    fn set_text(&self, element: &str, text: &str) {
        self.state().texts.insert(element.to_string(), text.to_string());
    }

    fn set_enabled(&self, element: &str, enabled: bool) {
        self.state().enabled.insert(element.to_string(), enabled);
    }

    fn set_visible(&self, element: &str, visible: bool) {
        self.state().visible.insert(element.to_string(), visible);
    }

    fn set_progress(&self, element: &str, percent: f64) {
        self.state()
            .progress
            .insert(element.to_string(), percent.clamp(0.0, 100.0));
    }

    fn set_rows(&self, element: &str, rows: Vec<Vec<String>>) {
        self.state().tables.insert(element.to_string(), rows);
    }
}
