//! ICS file generation.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike};
use uuid::Uuid;

use crate::calendar::RoomCalendar;
use crate::event::CalendarEvent;

const PRODID: &str = "-//indico-ics//Indico room bookings//EN";

/// Generate .ics content for every event of one room
pub fn generate_ics(calendar: &RoomCalendar) -> String {
    let mut cal = Calendar::new();
    cal.name(&calendar.room_name);

    for (index, event) in calendar.events.iter().enumerate() {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event_uid(calendar.room_id, index, event));

        // DTSTAMP is required; the icalendar crate would otherwise stamp "now"
        ics_event.add_property("DTSTAMP", format_utc(&event.start));

        ics_event.starts(event.start);
        ics_event.ends(event.end);
        ics_event.summary(&event.summary);

        // Indico only gives a display name, no address
        ics_event.add_property("ORGANIZER", &event.organizer);

        let ics_event = ics_event.done();
        cal.push(ics_event);
    }

    let cal = cal.done();

    replace_prodid(&cal.to_string())
}

/// Stable UID for the `index`-th event of a room.
fn event_uid(room_id: u64, index: usize, event: &CalendarEvent) -> String {
    let name = format!(
        "{}/{}/{}/{}/{}",
        room_id,
        index,
        format_utc(&event.start),
        format_utc(&event.end),
        event.summary
    );
    let uid = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());

    format!("{}@indico-ics", uid)
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// The icalendar crate always writes its own PRODID; swap in ours.
fn replace_prodid(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }

    result
}
