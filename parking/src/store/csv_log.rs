//! Append-only CSV reservation log.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use csv::StringRecord;
use fs4::fs_std::FileExt;

use crate::error::{Error, Result};
use crate::inventory::{Lot, SpaceCode};
use crate::member::Role;
use crate::reservation::{parse_date, parse_time, Reservation, Slot, DATE_FORMAT, TIME_FORMAT};

use super::{find_conflict, InsertOutcome, ReservationStore};

/// Header line of the reservation log.
pub const RESERVATIONS_HEADER: &str = "correo,nombre,categoria,sotano,codigoEspacio,fecha,inicio,fin";

const FIELD_COUNT: usize = 8;

/// Reservations stored one per line in a header-first CSV file.
///
/// Two locks scope the critical section. A read-write lock orders threads of
/// this instance, and an advisory lock on the file itself orders every
/// handle on it, including those of other processes: scans take the shared
/// side, inserts hold the exclusive side across the conflict scan and the
/// append.
///
/// Each physical line is parsed on its own, so a damaged line (say, a record
/// cut off inside a quoted name) never swallows the lines after it.
///
/// # Examples
///
/// ```
/// use parking::store::{CsvLogStore, ReservationStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = CsvLogStore::open(dir.path().join("reservas.csv")).unwrap();
/// assert!(store.load_all().unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct CsvLogStore {
    path: PathBuf,
    lock: RwLock<()>,
}

/// An open log file holding an advisory lock until dropped.
struct LockedLog {
    file: File,
}

impl LockedLog {
    fn shared(file: File) -> io::Result<Self> {
        FileExt::lock_shared(&file)?;
        Ok(Self { file })
    }

    fn exclusive(file: File) -> io::Result<Self> {
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }

    fn contents(&mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl Drop for LockedLog {
    fn drop(&mut self) {
        // Closing the handle releases the lock anyway.
        let _ = FileExt::unlock(&self.file);
    }
}

impl CsvLogStore {
    /// Opens the log at `path`, creating it with its header if missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the file or its parent directory
    /// cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let write_err = |source: io::Error| Error::StorageWrite {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let store = Self {
            path,
            lock: RwLock::new(()),
        };
        store.lock_for_append()?;
        Ok(store)
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: io::Error) -> Error {
        Error::StorageWrite {
            path: self.path.clone(),
            source,
        }
    }

    /// Opens the log for appending under the exclusive file lock, writing
    /// the header first if the file is empty.
    fn lock_for_append(&self) -> Result<LockedLog> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_err(e))?;
        let mut locked = LockedLog::exclusive(file).map_err(|e| self.write_err(e))?;

        if locked.file.metadata().map_err(|e| self.write_err(e))?.len() == 0 {
            writeln!(locked.file, "{RESERVATIONS_HEADER}").map_err(|e| self.write_err(e))?;
            locked.file.sync_data().map_err(|e| self.write_err(e))?;
            log::debug!("created reservation log {}", self.path.display());
        }
        Ok(locked)
    }

    fn read_shared(&self) -> Result<Vec<Reservation>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let bytes = LockedLog::shared(file)?.contents()?;
        Ok(self.parse_log(&bytes))
    }

    fn parse_log(&self, bytes: &[u8]) -> Vec<Reservation> {
        let mut reservations = Vec::new();
        // Line 1 is the header.
        for (line, raw) in (1u64..).zip(bytes.split(|&b| b == b'\n')).skip(1) {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match parse_line(raw, line) {
                Ok(reservation) => reservations.push(reservation),
                Err(e) => log::warn!("skipping record in {}: {e}", self.path.display()),
            }
        }
        reservations
    }

    fn append(&self, locked: &mut LockedLog, tail: Option<u8>, reservation: &Reservation) -> Result<()> {
        let line = encode_record(reservation)?;
        if tail.is_some_and(|b| b != b'\n') {
            log::warn!("terminating torn last line of {}", self.path.display());
            locked.file.write_all(b"\n").map_err(|e| self.write_err(e))?;
        }
        locked.file.write_all(&line).map_err(|e| self.write_err(e))?;
        locked.file.flush().map_err(|e| self.write_err(e))?;
        locked.file.sync_data().map_err(|e| self.write_err(e))?;
        Ok(())
    }
}

impl ReservationStore for CsvLogStore {
    fn load_all(&self) -> Result<Vec<Reservation>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.read_shared()
    }

    fn has_conflict(&self, slot: &Slot) -> Result<bool> {
        Ok(find_conflict(&self.load_all()?, slot).is_some())
    }

    fn try_insert(&self, reservation: Reservation) -> Result<InsertOutcome> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut locked = self.lock_for_append()?;

        let bytes = locked.contents()?;
        let existing = self.parse_log(&bytes);
        if let Some(conflict) = find_conflict(&existing, reservation.slot()) {
            log::debug!("{} conflicts with {}", reservation.slot(), conflict.slot());
            return Ok(InsertOutcome::Conflict(conflict.clone()));
        }

        self.append(&mut locked, bytes.last().copied(), &reservation)?;
        log::debug!("appended {} to {}", reservation.slot(), self.path.display());
        Ok(InsertOutcome::Accepted(reservation))
    }
}

fn parse_line(raw: &[u8], line: u64) -> Result<Reservation> {
    let malformed = |reason: String| Error::MalformedRecord { line, reason };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw);

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => parse_record(&record, line),
        Ok(false) => Err(malformed("empty record".into())),
        Err(e) => Err(malformed(e.to_string())),
    }
}

fn encode_record(reservation: &Reservation) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let lot = reservation.lot().to_string();
    let date = reservation.date().format(DATE_FORMAT).to_string();
    let start = reservation.start().format(TIME_FORMAT).to_string();
    let end = reservation.end().format(TIME_FORMAT).to_string();
    writer.write_record([
        reservation.member_email(),
        reservation.member_name(),
        reservation.member_role().roster_label(),
        lot.as_str(),
        reservation.space().as_str(),
        date.as_str(),
        start.as_str(),
        end.as_str(),
    ])?;
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

fn parse_record(record: &StringRecord, line: u64) -> Result<Reservation> {
    let malformed = |reason: String| Error::MalformedRecord { line, reason };

    if record.len() != FIELD_COUNT {
        return Err(malformed(format!(
            "expected {FIELD_COUNT} fields, found {}",
            record.len()
        )));
    }

    let role: Role = record[2].parse().map_err(malformed)?;
    let lot = record[3]
        .parse::<u8>()
        .map_err(|e| malformed(format!("lot '{}': {e}", &record[3])))
        .and_then(|n| Lot::try_from(n).map_err(|e| malformed(e.to_string())))?;
    let space = record[4]
        .parse::<SpaceCode>()
        .map_err(|e| malformed(e.to_string()))?;
    let date = parse_date(&record[5]).map_err(|e| malformed(e.to_string()))?;
    let start = parse_time("start", &record[6]).map_err(|e| malformed(e.to_string()))?;
    let end = parse_time("end", &record[7]).map_err(|e| malformed(e.to_string()))?;

    Reservation::new(
        &record[0],
        &record[1],
        role,
        Slot {
            lot,
            space,
            date,
            start,
            end,
        },
    )
    .map_err(|e| malformed(e.to_string()))
}
