//! Core of indico-ics: turn Indico room bookings into one iCalendar feed per
//! room.
//!
//! - `config` loads the operator's config file
//! - `api` talks to the Indico room booking endpoints
//! - `event` and `calendar` map bookings to calendar events
//! - `ics` serializes a room calendar, `output` writes it to disk
//! - `export` drives a whole run

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod ics;
pub mod output;
pub mod request;

pub use api::{Booking, IndicoClient, Reservation, Room};
pub use calendar::RoomCalendar;
pub use config::IndicoConfig;
pub use error::{IndicoError, IndicoResult};
pub use event::CalendarEvent;
pub use export::{ExportOptions, ExportReport, Exporter, FailurePolicy};
