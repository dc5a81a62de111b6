//! iCalendar serialization for room calendars.
//!
//! Output follows RFC 5545 and is deterministic: the same bookings always
//! produce the same bytes, so re-running an export leaves unchanged feeds
//! byte-identical.

mod generate;

pub use generate::generate_ics;
