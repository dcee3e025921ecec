//! Booking dialog state: one draft at a time, validated on every edit.

use chrono::{Duration, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::{
    legal_durations, legal_start_hours, validate_title, BusinessWindow, DurationChoice, Event,
    EventTime, SelectionRange, StartHour, TitleError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a booking is already in progress")]
    AlreadyOpen,
    #[error("no booking is in progress")]
    NotOpen,
    #[error("the booking is incomplete or invalid")]
    InvalidDraft,
}

/// Unconfirmed meeting being edited in the booking dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    anchor: SelectionRange,
    title: String,
    all_day: bool,
    start_hour: Option<u32>,
    duration: Option<u32>,
}

impl Draft {
    #[must_use]
    pub fn new(anchor: SelectionRange) -> Self {
        Self {
            anchor,
            title: String::new(),
            all_day: anchor.all_day,
            start_hour: None,
            duration: None,
        }
    }

    #[must_use]
    pub fn anchor(&self) -> &SelectionRange {
        &self.anchor
    }

    #[must_use]
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor.start.date()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn all_day(&self) -> bool {
        self.all_day
    }

    #[must_use]
    pub fn start_hour(&self) -> Option<u32> {
        self.start_hour
    }

    /// Chosen duration in minutes.
    #[must_use]
    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    #[must_use]
    pub fn is_valid(&self, window: &BusinessWindow) -> bool {
        if validate_title(&self.title).is_err() {
            return false;
        }

        if self.all_day {
            return true;
        }

        let (Some(start_hour), Some(duration)) = (self.start_hour, self.duration) else {
            return false;
        };

        window.contains_hour(start_hour)
            && legal_durations(window, Some(start_hour))
                .iter()
                .any(|choice| choice.minutes == duration)
    }

    /// Turns the draft into an event ready for the store.
    ///
    /// All-day drafts keep the dates of the selection. Timed drafts start on
    /// the anchor date at the chosen hour and last exactly the chosen duration.
    pub fn to_event(&self, window: &BusinessWindow) -> Result<Event, SessionError> {
        if !self.is_valid(window) {
            return Err(SessionError::InvalidDraft);
        }

        let (start, end) = match (self.all_day, self.start_hour, self.duration) {
            (true, _, _) => (
                EventTime::Date(self.anchor.start.date()),
                EventTime::Date(self.anchor.end.date()),
            ),
            (false, Some(hour), Some(minutes)) => {
                let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or(SessionError::InvalidDraft)?;
                let start = self.anchor_date().and_time(time);
                let end = start + Duration::minutes(i64::from(minutes));
                (EventTime::DateTime(start), EventTime::DateTime(end))
            }
            _ => return Err(SessionError::InvalidDraft),
        };

        Ok(Event {
            id: None,
            title: self.title.clone(),
            start,
            end,
            all_day: self.all_day,
        })
    }
}

/// The booking dialog. Closed until a selection opens it, closed again once
/// the draft is confirmed or cancelled.
#[derive(Debug, Clone, Default)]
pub struct BookingSession {
    window: BusinessWindow,
    draft: Option<Draft>,
}

impl BookingSession {
    #[must_use]
    pub fn new(window: BusinessWindow) -> Self {
        Self {
            window,
            draft: None,
        }
    }

    #[must_use]
    pub fn window(&self) -> &BusinessWindow {
        &self.window
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Opens the dialog for a fresh selection. A selection made while a
    /// draft is still open is refused rather than replacing it.
    pub fn select(&mut self, range: SelectionRange) -> Result<(), SessionError> {
        if self.draft.is_some() {
            return Err(SessionError::AlreadyOpen);
        }

        self.draft = Some(Draft::new(range));
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), SessionError> {
        self.draft_mut()?.title = title.into();
        Ok(())
    }

    pub fn set_all_day(&mut self, all_day: bool) -> Result<(), SessionError> {
        self.draft_mut()?.all_day = all_day;
        Ok(())
    }

    /// Changing the start hour always discards the chosen duration.
    pub fn set_start_hour(&mut self, start_hour: Option<u32>) -> Result<(), SessionError> {
        let draft = self.draft_mut()?;
        draft.start_hour = start_hour;
        draft.duration = None;
        Ok(())
    }

    pub fn set_duration(&mut self, minutes: Option<u32>) -> Result<(), SessionError> {
        self.draft_mut()?.duration = minutes;
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.draft
            .as_ref()
            .is_some_and(|draft| draft.is_valid(&self.window))
    }

    /// Field-level error for the title control, if any.
    #[must_use]
    pub fn title_error(&self) -> Option<TitleError> {
        self.draft
            .as_ref()
            .and_then(|draft| validate_title(&draft.title).err())
    }

    #[must_use]
    pub fn start_hours(&self) -> Vec<StartHour> {
        legal_start_hours(&self.window)
    }

    /// Durations legal for the current start hour; empty until one is chosen.
    #[must_use]
    pub fn durations(&self) -> Vec<DurationChoice> {
        let start_hour = self.draft.as_ref().and_then(Draft::start_hour);
        legal_durations(&self.window, start_hour)
    }

    /// Finalizes the draft and closes the session. An invalid draft leaves
    /// the session open.
    pub fn confirm(&mut self) -> Result<Event, SessionError> {
        let draft = self.draft.as_ref().ok_or(SessionError::NotOpen)?;
        let event = draft.to_event(&self.window)?;
        self.draft = None;
        Ok(event)
    }

    /// Discards the draft. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.draft.take().is_some()
    }

    fn draft_mut(&mut self) -> Result<&mut Draft, SessionError> {
        self.draft.as_mut().ok_or(SessionError::NotOpen)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        monday().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn open_session() -> BookingSession {
        let mut session = BookingSession::new(BusinessWindow::default());
        session
            .select(SelectionRange::all_day(monday(), monday()))
            .unwrap();
        session
    }

    #[test]
    fn starts_closed_and_refuses_edits() {
        let mut session = BookingSession::new(BusinessWindow::default());

        assert!(!session.is_open());
        assert!(!session.is_valid());
        assert_eq!(session.set_title("Sync"), Err(SessionError::NotOpen));
        assert_eq!(session.confirm(), Err(SessionError::NotOpen));
        assert!(!session.cancel());
    }

    #[test]
    fn all_day_validity_depends_on_title_only() {
        let mut session = open_session();
        assert!(session.draft().unwrap().all_day());

        session.set_title("Réunion").unwrap();
        assert!(session.is_valid());

        session.set_title("").unwrap();
        assert!(!session.is_valid());
        assert_eq!(session.title_error(), Some(TitleError::Empty));

        session.set_title("Réu@nion").unwrap();
        assert!(!session.is_valid());
        assert_eq!(session.title_error(), Some(TitleError::IllegalCharacter('@')));
    }

    #[test]
    fn timed_draft_needs_hour_and_legal_duration() {
        let mut session = open_session();
        session.set_title("Sync").unwrap();
        session.set_all_day(false).unwrap();
        assert!(!session.is_valid());
        assert!(session.durations().is_empty());

        session.set_start_hour(Some(9)).unwrap();
        assert!(!session.is_valid());

        session.set_duration(Some(30)).unwrap();
        assert!(session.is_valid());

        session.set_duration(Some(45)).unwrap();
        assert!(!session.is_valid());
    }

    #[test]
    fn changing_start_hour_resets_duration() {
        let mut session = open_session();
        session.set_title("Sync").unwrap();
        session.set_all_day(false).unwrap();
        session.set_start_hour(Some(9)).unwrap();
        session.set_duration(Some(300)).unwrap();
        assert!(session.is_valid());

        session.set_start_hour(Some(17)).unwrap();
        assert_eq!(session.draft().unwrap().duration(), None);
        assert!(!session.is_valid());

        session.set_duration(Some(300)).unwrap();
        assert!(!session.is_valid());
        assert!(!session.durations().iter().any(|c| c.minutes == 300));
    }

    #[test]
    fn start_hour_outside_window_is_invalid() {
        let mut session = open_session();
        session.set_title("Sync").unwrap();
        session.set_all_day(false).unwrap();
        session.set_start_hour(Some(6)).unwrap();
        session.set_duration(Some(30)).unwrap();

        assert!(!session.is_valid());
        assert!(session.durations().is_empty());

        session.set_start_hour(Some(71_582_789)).unwrap();
        session.set_duration(Some(10)).unwrap();
        assert!(session.durations().is_empty());
        assert!(!session.is_valid());
    }

    #[test]
    fn second_selection_is_refused_while_open() {
        let mut session = open_session();
        session.set_title("Premier").unwrap();

        let later = monday().succ_opt().unwrap();
        assert_eq!(
            session.select(SelectionRange::all_day(later, later)),
            Err(SessionError::AlreadyOpen)
        );
        assert_eq!(session.draft().unwrap().anchor_date(), monday());
        assert_eq!(session.draft().unwrap().title(), "Premier");
    }

    #[test]
    fn confirming_all_day_keeps_selected_dates() {
        let mut session = open_session();
        session.set_title("Réunion").unwrap();

        let event = session.confirm().unwrap();
        assert_eq!(event.start, EventTime::Date(monday()));
        assert_eq!(event.end, EventTime::Date(monday()));
        assert!(event.all_day);
        assert_eq!(event.id, None);
        assert!(!session.is_open());
    }

    #[test]
    fn confirming_timed_adds_elapsed_minutes() {
        let mut session = open_session();
        session.set_title("Sync").unwrap();
        session.set_all_day(false).unwrap();
        session.set_start_hour(Some(9)).unwrap();
        session.set_duration(Some(90)).unwrap();

        let event = session.confirm().unwrap();
        assert_eq!(event.start, EventTime::DateTime(at(9, 0)));
        assert_eq!(event.end, EventTime::DateTime(at(10, 30)));
        assert!(!event.all_day);
    }

    #[test]
    fn timed_selection_uses_its_date_as_anchor() {
        let mut session = BookingSession::new(BusinessWindow::default());
        session
            .select(SelectionRange::timed(at(14, 30), at(15, 0)))
            .unwrap();
        assert!(!session.draft().unwrap().all_day());

        session.set_title("Revue").unwrap();
        session.set_start_hour(Some(16)).unwrap();
        session.set_duration(Some(120)).unwrap();

        let event = session.confirm().unwrap();
        assert_eq!(event.start, EventTime::DateTime(at(16, 0)));
        assert_eq!(event.end, EventTime::DateTime(at(18, 0)));
    }

    #[test]
    fn invalid_confirm_keeps_the_draft() {
        let mut session = open_session();

        assert_eq!(session.confirm(), Err(SessionError::InvalidDraft));
        assert!(session.is_open());
    }

    #[test]
    fn cancel_closes_and_allows_a_new_selection() {
        let mut session = open_session();
        session.set_title("Annulée").unwrap();

        assert!(session.cancel());
        assert!(!session.is_open());

        session
            .select(SelectionRange::all_day(monday(), monday()))
            .unwrap();
        assert_eq!(session.draft().unwrap().title(), "");
    }
}
