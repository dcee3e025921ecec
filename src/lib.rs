pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod store;

pub use config::Config;
pub use controller::{CalendarController, SelectOutcome};
pub use error::{ControllerError, StoreError};
pub use grid::{CalendarView, EventGrid, GridRenderer, VisibleRange};
pub use store::{EventStore, HttpEventStore};
