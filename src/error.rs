use chrono::{NaiveDate, Weekday};
use meeting_core::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("event store answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("event store sent an unreadable payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("cannot book on {0}, it is in the past")]
    PastDate(NaiveDate),
    #[error("cannot book on {date}, {weekday} is not a business day")]
    ClosedWeekday { date: NaiveDate, weekday: Weekday },
}
