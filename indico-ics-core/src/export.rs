//! The export run: rooms, then one feed per room, then the index.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::api::{IndicoClient, Room};
use crate::calendar::RoomCalendar;
use crate::config::IndicoConfig;
use crate::error::IndicoResult;
use crate::output::{ensure_output_dir, remove_index, write_calendar, write_index};

/// What to do when a single room cannot be exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole run. Feeds written so far stay on disk; an index from
    /// an earlier run is removed.
    #[default]
    Abort,
    /// Log the room's error and carry on with the next room. Config, auth
    /// and filesystem errors still stop the run.
    SkipRoom,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub start_date: String,
    pub end_date: String,
    pub only_public: bool,
    pub failure_policy: FailurePolicy,
}

impl ExportOptions {
    pub fn from_config(config: &IndicoConfig, output_dir: PathBuf) -> Self {
        ExportOptions {
            output_dir,
            start_date: config.start_date.clone(),
            end_date: config.end_date.clone(),
            only_public: config.only_public,
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenCalendar {
    pub room_id: u64,
    pub path: PathBuf,
    pub event_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRoom {
    pub room_id: u64,
    pub room_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub written: Vec<WrittenCalendar>,
    pub skipped: Vec<SkippedRoom>,
    pub index_path: PathBuf,
}

impl ExportReport {
    pub fn total_events(&self) -> usize {
        self.written.iter().map(|w| w.event_count).sum()
    }
}

pub struct Exporter {
    client: IndicoClient,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(client: IndicoClient, options: ExportOptions) -> Self {
        Self { client, options }
    }

    /// Run the export. Rooms are handled one at a time, in ascending id order.
    pub async fn run(&self) -> IndicoResult<ExportReport> {
        let rooms = self.client.list_rooms(self.options.only_public).await?;
        info!(count = rooms.len(), "fetched rooms");

        ensure_output_dir(&self.options.output_dir)?;

        let mut written = Vec::new();
        let mut exported_rooms: Vec<&Room> = Vec::new();
        let mut skipped = Vec::new();

        for room in rooms.values() {
            match self.export_room(room).await {
                Ok(calendar) => {
                    written.push(calendar);
                    exported_rooms.push(room);
                }
                Err(e)
                    if self.options.failure_policy == FailurePolicy::SkipRoom
                        && e.is_room_local() =>
                {
                    warn!(room_id = room.id, room = %room.full_name, error = %e, "skipping room");
                    skipped.push(SkippedRoom {
                        room_id: room.id,
                        room_name: room.full_name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    // Feeds on disk are now a mix of old and new; don't leave
                    // an index that claims they are complete.
                    if let Err(cleanup) = remove_index(&self.options.output_dir) {
                        warn!(error = %cleanup, "could not remove stale room index");
                    }
                    return Err(e);
                }
            }
        }

        let index_path = write_index(exported_rooms, &self.options.output_dir)?;
        info!(path = %index_path.display(), "wrote room index");

        Ok(ExportReport {
            written,
            skipped,
            index_path,
        })
    }

    async fn export_room(&self, room: &Room) -> IndicoResult<WrittenCalendar> {
        let groups = self
            .client
            .list_bookings(room.id, &self.options.start_date, &self.options.end_date)
            .await?;
        debug!(room_id = room.id, groups = groups.len(), "fetched bookings");

        let calendar = RoomCalendar::build(room, &groups)?;
        debug!(room_id = room.id, events = calendar.events.len(), "built calendar");

        let path = write_calendar(&calendar, &self.options.output_dir)?;

        info!(
            room_id = room.id,
            room = %room.full_name,
            events = calendar.events.len(),
            "wrote {}",
            path.display()
        );

        Ok(WrittenCalendar {
            room_id: room.id,
            path,
            event_count: calendar.events.len(),
        })
    }
}
