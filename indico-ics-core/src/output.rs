//! Writing calendar feeds and the room index to disk.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::Room;
use crate::calendar::RoomCalendar;
use crate::error::{IndicoError, IndicoResult};
use crate::ics::generate_ics;

pub const INDEX_FILE_NAME: &str = "room_id_mappings.txt";

/// Create the output directory (and parents) if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> IndicoResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| IndicoError::io(dir, e))
}

/// Path of a room's feed inside `dir`: `<room_id>.ics`
pub fn calendar_path(dir: &Path, room_id: u64) -> PathBuf {
    dir.join(format!("{}.ics", room_id))
}

/// Write `<dir>/<room_id>.ics`, replacing any previous feed for the room.
pub fn write_calendar(calendar: &RoomCalendar, dir: &Path) -> IndicoResult<PathBuf> {
    let path = calendar_path(dir, calendar.room_id);
    write_file(&path, generate_ics(calendar).as_bytes())?;
    Ok(path)
}

/// Write `<dir>/room_id_mappings.txt` with one `<id>: <name>` line per room,
/// ascending by id.
pub fn write_index<'a, I>(rooms: I, dir: &Path) -> IndicoResult<PathBuf>
where
    I: IntoIterator<Item = &'a Room>,
{
    let sorted: BTreeMap<u64, &str> = rooms
        .into_iter()
        .map(|room| (room.id, room.full_name.as_str()))
        .collect();

    let mut contents = String::new();
    for (id, name) in sorted {
        contents.push_str(&format!("{}: {}\n", id, name));
    }

    let path = dir.join(INDEX_FILE_NAME);
    write_file(&path, contents.as_bytes())?;
    Ok(path)
}

/// Delete `<dir>/room_id_mappings.txt` left by an earlier run, if any.
pub fn remove_index(dir: &Path) -> IndicoResult<()> {
    let path = dir.join(INDEX_FILE_NAME);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(IndicoError::io(&path, e)),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> IndicoResult<()> {
    let mut file = File::create(path).map_err(|e| IndicoError::io(path, e))?;
    file.write_all(bytes).map_err(|e| IndicoError::io(path, e))?;
    file.flush().map_err(|e| IndicoError::io(path, e))
}
