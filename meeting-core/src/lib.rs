mod availability;
mod session;
mod structs;
mod title;

#[cfg(feature = "ics")]
mod ics;

pub use availability::{
    duration_by_label, legal_durations, legal_start_hours, DurationChoice, StartHour, DURATIONS,
};
pub use session::{BookingSession, Draft, SessionError};
pub use structs::{BusinessWindow, Event, EventTime, SelectionRange, WindowError};
pub use title::{validate_title, TitleError};

#[cfg(feature = "ics")]
pub use crate::ics::to_ics;
