// Pagination controller for the record table
use crate::application::endpoint_client::{ApiClient, CallResult, Endpoint};
use crate::application::orchestrator::{CycleContext, LoadOutcome, Loader, Priority};
use crate::application::session::Session;
use crate::application::ui_surface::elements;
use crate::domain::pagination::{PageCursor, PageWindow};
use crate::domain::telemetry::{PLACEHOLDER, Reading};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const NO_DATA: &str = "No data";

pub struct PaginationController {
    client: ApiClient,
    session: Arc<Session>,
    cursor: Mutex<PageCursor>,
}

impl PaginationController {
    pub fn new(client: ApiClient, session: Arc<Session>, per_page: u32) -> Self {
        Self {
            client,
            session,
            cursor: Mutex::new(PageCursor::new(per_page)),
        }
    }

    pub fn page(&self) -> u32 {
        self.cursor().page()
    }

    /// Advance and fetch. `None` when the last window disabled "next".
    pub async fn next(&self) -> Option<LoadOutcome> {
        let moved = self.cursor().advance();
        if !moved {
            return None;
        }
        Some(self.fetch().await)
    }

    /// Go back and fetch. `None` at page 1.
    pub async fn prev(&self) -> Option<LoadOutcome> {
        let moved = self.cursor().retreat();
        if !moved {
            return None;
        }
        Some(self.fetch().await)
    }

    /// Re-fetch the current page.
    pub async fn fetch(&self) -> LoadOutcome {
        let (page, per_page) = {
            let cursor = self.cursor();
            (cursor.page(), cursor.per_page())
        };

        let result = self
            .client
            .call::<Vec<Reading>>(
                Endpoint::Table,
                vec![("page", page.to_string()), ("per_page", per_page.to_string())],
            )
            .await;

        let outcome = LoadOutcome::of(&result);
        let ui = self.session.ui();
        match result {
            CallResult::Success(payload) => {
                if payload.data.is_empty() {
                    ui.set_rows(elements::TABLE_BODY, vec![vec![NO_DATA.to_string()]]);
                } else {
                    ui.set_rows(elements::TABLE_BODY, payload.data.iter().map(table_row).collect());
                }
                if let Some(window) = payload.pagination {
                    self.cursor().observe(window);
                    self.show_window(&window);
                }
            }
            CallResult::Rejected { .. } => {
                ui.set_rows(elements::TABLE_BODY, vec![vec![NO_DATA.to_string()]]);
            }
            // Keep the last rendered page; the banner reports the failure.
            CallResult::Failed => {}
        }
        outcome
    }

    fn show_window(&self, window: &PageWindow) {
        let ui = self.session.ui();
        ui.set_text(
            elements::PAGE_INFO,
            &format!("Page {} of {}", window.page, window.pages),
        );
        ui.set_text(elements::TABLE_INFO, &format!("{} entries", window.total));
        ui.set_enabled(elements::BTN_PREV, window.prev_enabled());
        ui.set_enabled(elements::BTN_NEXT, window.next_enabled());
    }

    fn cursor(&self) -> MutexGuard<'_, PageCursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Loader for PaginationController {
    fn name(&self) -> &'static str {
        "table page"
    }

    fn priority(&self) -> Priority {
        Priority::Primary
    }

    async fn load(&self, _cycle: CycleContext) -> LoadOutcome {
        self.fetch().await
    }
}

fn table_row(r: &Reading) -> Vec<String> {
    vec![
        r.id.map(|id| id.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        r.timestamp.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        r.temperature.fixed(1),
        r.pressure.fixed(1),
        r.humidity.fixed(1),
        r.gas_resistance.fixed(0),
        if r.movement_detected { "Yes" } else { "No" }.to_string(),
        r.estimated_occupancy.display(),
        r.ac_recommendation.display(),
    ]
}
