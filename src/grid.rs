//! Command interface to the calendar grid, plus an in-memory grid.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use meeting_core::{BusinessWindow, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    /// Maps the position in the view picker (month, week, day) to a view.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CalendarView::Month),
            1 => Some(CalendarView::Week),
            2 => Some(CalendarView::Day),
            _ => None,
        }
    }
}

impl FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "mois" => Ok(CalendarView::Month),
            "week" | "semaine" => Ok(CalendarView::Week),
            "day" | "jour" => Ok(CalendarView::Day),
            other => Err(format!("unknown calendar view `{other}`")),
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalendarView::Month => "month",
            CalendarView::Week => "week",
            CalendarView::Day => "day",
        };
        f.write_str(name)
    }
}

/// Dates shown by the grid, `end` excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VisibleRange {
    /// Whether the inclusive span `first..=last` shares a date with the range.
    #[must_use]
    pub fn overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        first < self.end && last.max(first) >= self.start
    }
}

/// What the controller may ask of a calendar grid.
pub trait GridRenderer {
    fn set_view(&mut self, view: CalendarView);

    /// Used to gray out closed hours and weekdays.
    fn set_business_window(&mut self, window: &BusinessWindow);

    fn visible_range(&self) -> VisibleRange;

    fn prev(&mut self);

    fn next(&mut self);

    /// Adds an event to the live set. Re-adding an event with a known id
    /// replaces it.
    fn add_event(&mut self, event: Event);

    fn load_succeeded(&mut self, events: Vec<Event>);

    fn load_failed(&mut self);

    /// Current live event set.
    fn event_set(&self) -> &[Event];
}

#[derive(Debug, Clone)]
pub struct EventGrid {
    view: CalendarView,
    focus: NaiveDate,
    window: Option<BusinessWindow>,
    events: Vec<Event>,
    failed: bool,
}

impl EventGrid {
    #[must_use]
    pub fn new(focus: NaiveDate) -> Self {
        Self {
            view: CalendarView::default(),
            focus,
            window: None,
            events: Vec::new(),
            failed: false,
        }
    }

    #[must_use]
    pub fn view(&self) -> CalendarView {
        self.view
    }

    #[must_use]
    pub fn focus(&self) -> NaiveDate {
        self.focus
    }

    /// Whether the last load failed; the grid then shows nothing.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Events overlapping the visible range, ordered by start.
    #[must_use]
    pub fn visible_events(&self) -> Vec<&Event> {
        let range = self.visible_range();
        let mut events = self
            .events
            .iter()
            .filter(|event| range.overlaps(event.start.date(), event.end.date()))
            .collect::<Vec<_>>();
        events.sort_by_key(|event| event.start.as_datetime());
        events
    }

    /// Whether a cell is drawn as closed. `hour` is `None` for the all-day row.
    #[must_use]
    pub fn is_grayed(&self, date: NaiveDate, hour: Option<u32>) -> bool {
        let Some(window) = &self.window else {
            return false;
        };

        !window.allows(date.weekday()) || hour.is_some_and(|hour| !window.contains_hour(hour))
    }
}

impl GridRenderer for EventGrid {
    fn set_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    fn set_business_window(&mut self, window: &BusinessWindow) {
        self.window = Some(window.clone());
    }

    fn visible_range(&self) -> VisibleRange {
        match self.view {
            CalendarView::Month => {
                let start = self.focus.with_day(1).unwrap_or(self.focus);
                VisibleRange {
                    start,
                    end: start + Months::new(1),
                }
            }
            CalendarView::Week => {
                let start = self.focus.week(Weekday::Mon).first_day();
                VisibleRange {
                    start,
                    end: start + Days::new(7),
                }
            }
            CalendarView::Day => VisibleRange {
                start: self.focus,
                end: self.focus + Days::new(1),
            },
        }
    }

    fn prev(&mut self) {
        self.focus = match self.view {
            CalendarView::Month => self.focus - Months::new(1),
            CalendarView::Week => self.focus - Days::new(7),
            CalendarView::Day => self.focus - Days::new(1),
        };
    }

    fn next(&mut self) {
        self.focus = match self.view {
            CalendarView::Month => self.focus + Months::new(1),
            CalendarView::Week => self.focus + Days::new(7),
            CalendarView::Day => self.focus + Days::new(1),
        };
    }

    fn add_event(&mut self, event: Event) {
        let known = event.id.as_ref().and_then(|id| {
            self.events
                .iter()
                .position(|existing| existing.id.as_ref() == Some(id))
        });

        match known {
            Some(index) => self.events[index] = event,
            None => self.events.push(event),
        }
    }

    fn load_succeeded(&mut self, events: Vec<Event>) {
        self.failed = false;
        self.events = events;
    }

    fn load_failed(&mut self) {
        self.failed = true;
        self.events.clear();
    }

    fn event_set(&self) -> &[Event] {
        &self.events
    }
}
