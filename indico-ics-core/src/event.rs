//! Calendar events built from Indico bookings.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::api::Booking;
use crate::error::{IndicoError, IndicoResult};

const BOOKING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single booked slot, ready to be written as a VEVENT.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub organizer: String,
}

impl CalendarEvent {
    pub fn from_booking(booking: &Booking) -> IndicoResult<Self> {
        Ok(CalendarEvent {
            start: parse_booking_time(&booking.start_dt)?,
            end: parse_booking_time(&booking.end_dt)?,
            summary: booking.reservation.booking_reason.clone(),
            organizer: booking.reservation.booked_for_name.clone(),
        })
    }
}

/// Parse an Indico `YYYY-MM-DDTHH:MM:SS` timestamp.
///
/// Indico sends the room's wall-clock time without an offset. The value is
/// labeled UTC as-is, not converted, so a 09:00 booking is written as 09:00Z.
pub fn parse_booking_time(value: &str) -> IndicoResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(&value.replace('T', " "), BOOKING_TIME_FORMAT)
        .map_err(|source| IndicoError::DateParse {
            value: value.to_string(),
            source,
        })?;

    Ok(naive.and_utc())
}
