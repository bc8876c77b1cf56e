//! Calendar screen session.
//!
//! Owns the month viewport, the selected day, the date-keyed event map and
//! the month grid cache for one calendar screen, and publishes each
//! observable value through a `tokio::sync::watch` channel: single writer,
//! latest value wins, subscribers are woken on change.
//!
//! ## Event loading
//!
//! Every successful fetch replaces the event map wholesale. The new map is
//! built off to the side and published in one step, so a reader always sees
//! one complete generation. A failed fetch leaves the previous generation in
//! place. A fetch that completes after [`CalendarSession::close`] (or after
//! the session was dropped) is discarded, and a fetch that completes after a
//! later-started fetch was already applied is ignored as superseded.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use shared::{DayCell, Event, MonthGrid, RawEventRecord, ViewportState, YearMonth};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::calendar::{available_calendar_height, CalendarService};
use super::event_aggregator::{aggregate_records, DateResolver, EventsByDate};
use super::grid_cache::MonthGridCache;
use super::selection::SelectionState;
use super::viewport::ViewportController;
use crate::config::CalendarConfig;
use crate::storage::EventStorage;

/// One published generation of the event map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsSnapshot {
    /// 0 before the first successful load, +1 per applied load
    pub generation: u64,
    pub events: EventsByDate,
    /// Fetch that produced this generation
    ticket: u64,
}

/// What happened to a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetch result is now the current generation
    Applied {
        generation: u64,
        event_count: usize,
        dropped: usize,
    },
    /// The store failed; the previous generation is kept. Safe to retry.
    Failed { error: String },
    /// The session was closed before the fetch completed
    Discarded,
    /// A fetch started later had already been applied
    Superseded,
}

struct SessionInner {
    config: CalendarConfig,
    calendar: CalendarService,
    resolver: DateResolver,
    open: AtomicBool,
    next_ticket: AtomicU64,
    viewport: watch::Sender<ViewportController>,
    selection: watch::Sender<SelectionState>,
    events: watch::Sender<Arc<EventsSnapshot>>,
    grids: Mutex<MonthGridCache>,
}

impl SessionInner {
    fn grids(&self) -> MutexGuard<'_, MonthGridCache> {
        self.grids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Publish the result of fetch `ticket` unless it is stale or the session is closed
    fn apply_fetch(&self, ticket: u64, result: Result<Vec<RawEventRecord>>) -> LoadOutcome {
        let records = match result {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to load calendar events: {:#}", e);
                return LoadOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let aggregation = aggregate_records(records, &self.resolver);
        let event_count = aggregation.events.event_count();
        let dropped = aggregation.dropped;
        let mut outcome = LoadOutcome::Discarded;

        self.events.send_if_modified(|current| {
            if !self.is_open() {
                return false;
            }
            if ticket < current.ticket {
                outcome = LoadOutcome::Superseded;
                return false;
            }
            let generation = current.generation + 1;
            *current = Arc::new(EventsSnapshot {
                generation,
                events: aggregation.events,
                ticket,
            });
            outcome = LoadOutcome::Applied {
                generation,
                event_count,
                dropped,
            };
            true
        });

        match &outcome {
            LoadOutcome::Applied { generation, .. } => info!(
                "Loaded {} calendar events ({} dropped), generation {}",
                event_count, dropped, generation
            ),
            LoadOutcome::Superseded => debug!("Ignoring fetch {}: a newer fetch was applied", ticket),
            _ => info!("Discarding fetch {}: session closed", ticket),
        }
        outcome
    }
}

/// State and operations behind one calendar screen
pub struct CalendarSession<S: EventStorage> {
    inner: Arc<SessionInner>,
    storage: Arc<S>,
}

impl<S: EventStorage + 'static> CalendarSession<S> {
    /// Open a session centered on the month of `today`.
    ///
    /// `available_height` is the vertical budget of the grid; see
    /// [`set_screen_metrics`](Self::set_screen_metrics) to derive it.
    pub fn new(
        storage: S,
        config: CalendarConfig,
        today: NaiveDate,
        available_height: f32,
    ) -> Result<Self> {
        config.validate()?;

        let calendar = CalendarService::new(config.first_day_of_week);
        let current_month = YearMonth::from_date(today);
        let viewport = ViewportController::new(current_month, config.month_window);
        let grids = MonthGridCache::new(calendar, config.grid_cache_size, available_height);

        let inner = SessionInner {
            resolver: DateResolver::from_config(&config),
            calendar,
            open: AtomicBool::new(true),
            next_ticket: AtomicU64::new(1),
            viewport: watch::channel(viewport).0,
            selection: watch::channel(SelectionState::new()).0,
            events: watch::channel(Arc::new(EventsSnapshot::default())).0,
            grids: Mutex::new(grids),
            config,
        };

        let session = Self {
            inner: Arc::new(inner),
            storage: Arc::new(storage),
        };
        session.prefetch_visible();
        info!("Opened calendar session at {}", current_month);
        Ok(session)
    }

    /// Open a session on the system's current date
    pub fn open_today(storage: S, config: CalendarConfig, available_height: f32) -> Result<Self> {
        Self::new(storage, config, Local::now().date_naive(), available_height)
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.inner.config
    }

    pub fn calendar(&self) -> CalendarService {
        self.inner.calendar
    }

    // ----- viewport -----

    pub fn visible_month(&self) -> YearMonth {
        self.inner.viewport.borrow().visible_month()
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.inner.viewport.borrow().state()
    }

    pub fn subscribe_viewport(&self) -> watch::Receiver<ViewportController> {
        self.inner.viewport.subscribe()
    }

    pub fn go_to_previous_month(&self) -> YearMonth {
        let mut target = self.visible_month();
        self.inner.viewport.send_modify(|viewport| {
            target = viewport.go_to_previous_month();
        });
        self.prefetch_visible();
        target
    }

    pub fn go_to_next_month(&self) -> YearMonth {
        let mut target = self.visible_month();
        self.inner.viewport.send_modify(|viewport| {
            target = viewport.go_to_next_month();
        });
        self.prefetch_visible();
        target
    }

    /// The scroller settled on `month`
    pub fn on_scroll_settled(&self, month: YearMonth) {
        let changed = self
            .inner
            .viewport
            .send_if_modified(|viewport| viewport.on_scroll_settled(month));
        if changed {
            self.prefetch_visible();
        }
    }

    // ----- grid -----

    /// Grid layout of `month`, served from the cache when possible
    pub fn month_grid(&self, month: YearMonth) -> MonthGrid {
        self.inner.grids().grid(month)
    }

    /// Row height of the grid that `date` belongs to
    pub fn row_height_for(&self, date: NaiveDate) -> f32 {
        self.month_grid(YearMonth::from_date(date)).row_height
    }

    pub fn grid_days(&self, month: YearMonth) -> Vec<DayCell> {
        self.inner.calendar.grid_days(month)
    }

    pub fn available_height(&self) -> f32 {
        self.inner.grids().available_height()
    }

    /// Change the grid's vertical budget; cached grids are recomputed
    pub fn set_available_height(&self, available_height: f32) {
        if self.inner.grids().set_available_height(available_height) {
            self.prefetch_visible();
        }
    }

    /// Derive the grid's vertical budget from the screen and system bars
    pub fn set_screen_metrics(&self, screen_height: f32, status_bar_height: f32, navigation_bar_height: f32) {
        let available_height = available_calendar_height(
            &self.inner.config.layout,
            screen_height,
            status_bar_height,
            navigation_bar_height,
        );
        self.set_available_height(available_height);
    }

    fn prefetch_visible(&self) {
        let visible = self.visible_month();
        self.inner
            .grids()
            .prefetch_around(visible, self.inner.config.prefetch_radius);
    }

    // ----- selection -----

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.inner.selection.borrow().selected_date()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<SelectionState> {
        self.inner.selection.subscribe()
    }

    pub fn select_date(&self, date: NaiveDate) {
        self.inner.selection.send_if_modified(|selection| {
            if selection.selected_date() == Some(date) {
                return false;
            }
            selection.select_date(date);
            true
        });
    }

    pub fn clear_selection(&self) {
        self.inner.selection.send_if_modified(|selection| {
            if selection.selected_date().is_none() {
                return false;
            }
            selection.clear_selection();
            true
        });
    }

    /// Events on the selected day, empty when nothing is selected
    pub fn current_selection_events(&self) -> Vec<Event> {
        let selection = *self.inner.selection.borrow();
        let snapshot = self.events();
        selection.current_selection_events(&snapshot.events).to_vec()
    }

    // ----- events -----

    /// The current event map generation
    pub fn events(&self) -> Arc<EventsSnapshot> {
        Arc::clone(&self.inner.events.borrow())
    }

    pub fn subscribe_events(&self) -> watch::Receiver<Arc<EventsSnapshot>> {
        self.inner.events.subscribe()
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.inner.events.borrow().events.has_events(date)
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<Event> {
        self.inner.events.borrow().events.events_on(date).to_vec()
    }

    /// Fetch from the store and publish the result, waiting for completion
    pub async fn refresh_events(&self) -> LoadOutcome {
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::AcqRel);
        let result = self.storage.fetch_all_events().await;
        self.inner.apply_fetch(ticket, result)
    }

    /// Fetch in the background on the tokio runtime.
    ///
    /// The task holds only a weak handle to the session state, so a session
    /// dropped mid-fetch is never written to.
    pub fn spawn_refresh(&self) -> JoinHandle<LoadOutcome> {
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::AcqRel);
        let inner: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let storage = Arc::clone(&self.storage);

        tokio::spawn(async move {
            let result = storage.fetch_all_events().await;
            match inner.upgrade() {
                Some(inner) => inner.apply_fetch(ticket, result),
                None => {
                    info!("Discarding fetch {}: session dropped", ticket);
                    LoadOutcome::Discarded
                }
            }
        })
    }

    // ----- lifecycle -----

    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// Tear the session down; in-flight fetches will be discarded
    pub fn close(&self) {
        if self.inner.open.swap(false, Ordering::AcqRel) {
            info!("Closed calendar session");
        }
    }
}

impl<S: EventStorage> Drop for CalendarSession<S> {
    fn drop(&mut self) {
        self.inner.open.store(false, Ordering::Release);
    }
}
