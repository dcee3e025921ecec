use chrono::{Datelike, Local, NaiveDate};
use meeting_core::{BookingSession, BusinessWindow, Event, SelectionRange, SessionError};
use tracing::{debug, error, info, warn};

use crate::error::ControllerError;
use crate::grid::{CalendarView, GridRenderer, VisibleRange};
use crate::store::EventStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The booking dialog opened for the selection.
    Opened,
    /// A booking was already in progress, the selection was dropped.
    Ignored,
}

/// Drives the calendar grid and the booking dialog, and keeps the grid's
/// event set in line with the event store.
///
/// Events reach the grid only once the store has accepted them, so a failed
/// request never needs to be rolled back.
pub struct CalendarController<S, R> {
    store: S,
    renderer: R,
    session: BookingSession,
    today: NaiveDate,
    is_error: bool,
    loaded: bool,
    current_events: Vec<Event>,
}

impl<S, R> CalendarController<S, R>
where
    S: EventStore,
    R: GridRenderer,
{
    pub fn new(store: S, mut renderer: R, window: BusinessWindow) -> Self {
        renderer.set_business_window(&window);

        Self {
            store,
            renderer,
            session: BookingSession::new(window),
            today: Local::now().date_naive(),
            is_error: false,
            loaded: false,
            current_events: Vec::new(),
        }
    }

    /// Overrides the date before which nothing can be booked.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn window(&self) -> &BusinessWindow {
        self.session.window()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn session(&self) -> &BookingSession {
        &self.session
    }

    /// Booking dialog, for field edits.
    pub fn session_mut(&mut self) -> &mut BookingSession {
        &mut self.session
    }

    /// Set by any failed store request, cleared by the next successful one.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn current_events(&self) -> &[Event] {
        &self.current_events
    }

    /// Fetches every event from the store. The events are handed back as
    /// received, without filtering on `range`.
    pub async fn load_events(&mut self, range: VisibleRange) -> Result<Vec<Event>, ControllerError> {
        debug!(start = %range.start, end = %range.end, "loading events");

        match self.store.list().await {
            Ok(events) => {
                info!(count = events.len(), "events loaded");
                self.loaded = true;
                self.is_error = false;
                Ok(events)
            }
            Err(err) => {
                error!(error = %err, "failed to load events");
                self.is_error = true;
                Err(err.into())
            }
        }
    }

    /// Loads the grid's visible range and reports the outcome to the grid.
    pub async fn refresh(&mut self) -> Result<(), ControllerError> {
        let range = self.renderer.visible_range();

        match self.load_events(range).await {
            Ok(events) => {
                self.renderer.load_succeeded(events);
                self.sync_current_events();
                Ok(())
            }
            Err(err) => {
                self.renderer.load_failed();
                Err(err)
            }
        }
    }

    /// Opens the booking dialog for a selection on the grid.
    ///
    /// Selections before today or covering a closed weekday are rejected.
    /// While a booking is already in progress new selections are ignored.
    pub fn on_date_select(&mut self, range: SelectionRange) -> Result<SelectOutcome, ControllerError> {
        let date = range.start.date();

        if date < self.today {
            return Err(ControllerError::PastDate(date));
        }

        let last = range.end.date().max(date);
        if let Some(closed) = date
            .iter_days()
            .take_while(|day| *day <= last)
            .find(|day| !self.window().allows(day.weekday()))
        {
            return Err(ControllerError::ClosedWeekday {
                date: closed,
                weekday: closed.weekday(),
            });
        }

        match self.session.select(range) {
            Ok(()) => {
                debug!(%date, all_day = range.all_day, "booking dialog opened");
                Ok(SelectOutcome::Opened)
            }
            Err(SessionError::AlreadyOpen) => {
                debug!(%date, "booking in progress, selection ignored");
                Ok(SelectOutcome::Ignored)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Confirms the booking dialog and stores the meeting.
    ///
    /// An invalid draft keeps the dialog open. Otherwise the dialog is closed
    /// whatever the store answers, and the grid only receives the meeting
    /// once the store accepted it.
    pub async fn on_confirm(&mut self) -> Result<Event, ControllerError> {
        let event = self.session.confirm()?;

        info!(title = %event.title, start = %event.start, end = %event.end, "submitting meeting");

        match self.store.create(&event).await {
            Ok(stored) => {
                self.is_error = false;
                self.renderer.add_event(stored.clone());
                self.sync_current_events();
                Ok(stored)
            }
            Err(err) => {
                error!(error = %err, title = %event.title, "failed to store meeting");
                self.is_error = true;
                Err(err.into())
            }
        }
    }

    /// Closes the booking dialog without booking anything.
    pub fn on_cancel(&mut self) {
        if self.session.cancel() {
            debug!("booking dialog cancelled");
        }
    }

    /// Switches the grid to the view at `index` in the picker (month, week,
    /// day). Unknown indices change nothing.
    pub fn change_view(&mut self, index: usize) -> bool {
        let Some(view) = CalendarView::from_index(index) else {
            warn!(index, "unknown calendar view");
            return false;
        };

        self.renderer.set_view(view);
        true
    }

    pub fn prev(&mut self) {
        self.renderer.prev();
    }

    pub fn next(&mut self) {
        self.renderer.next();
    }

    /// Notification from a grid that changed its event set on its own.
    pub fn on_events_set(&mut self, events: Vec<Event>) {
        self.current_events = events;
    }

    fn sync_current_events(&mut self) {
        self.current_events = self.renderer.event_set().to_vec();
    }
}
