//! Per-room calendar assembly.

use crate::api::{Booking, Room};
use crate::error::IndicoResult;
use crate::event::CalendarEvent;

/// All events for exactly one room, in the order Indico returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomCalendar {
    pub room_id: u64,
    pub room_name: String,
    pub events: Vec<CalendarEvent>,
}

impl RoomCalendar {
    /// Flatten grouped bookings (outer groups, then bookings within a group)
    /// into events. No sorting or deduplication; the first booking that
    /// fails to map fails the room.
    pub fn build(room: &Room, groups: &[Vec<Booking>]) -> IndicoResult<Self> {
        let events = groups
            .iter()
            .flatten()
            .map(CalendarEvent::from_booking)
            .collect::<IndicoResult<Vec<_>>>()?;

        Ok(RoomCalendar {
            room_id: room.id,
            room_name: room.full_name.clone(),
            events,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
