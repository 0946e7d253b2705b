use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::model::Event;

/// Encode a single event to [len][bincode][crc32] format.
fn encode_event(writer: &mut impl Write, event: &Event) -> io::Result<()> {
    let payload =
        bincode::serialize(event).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let len = payload.len() as u32;
    let crc = crc32fast::hash(&payload);
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.write_all(&crc.to_le_bytes())?;
    Ok(())
}

/// Append-only log of committed actions.
///
/// Format per entry: `[u32: len][bincode: Event][u32: crc32]`
/// - `len` is the byte length of the bincode payload (not including the CRC).
/// - A torn or corrupt tail (crash mid-append) is cut off on open, so later
///   appends land directly after the last valid entry.
pub struct Wal {
    writer: BufWriter<File>,
    path: PathBuf,
    appends_since_compact: u64,
}

impl Wal {
    /// Open (or create) the WAL file at `path`, returning it with the valid
    /// events already on disk. Anything after the last valid entry is truncated.
    ///
    /// The compaction counter starts at the number of replayed `Applied`
    /// events, so an uncompacted log carries its backlog across restarts.
    pub fn open(path: &Path) -> io::Result<(Self, Vec<Event>)> {
        let (events, valid_len) = Self::scan(path)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let file_len = file.metadata()?.len();
        if file_len > valid_len {
            tracing::warn!(
                path = %path.display(),
                discarded = file_len - valid_len,
                "truncating corrupt WAL tail"
            );
            file.set_len(valid_len)?;
            file.sync_all()?;
        }
        let applied = events
            .iter()
            .filter(|e| matches!(e, Event::Applied { .. }))
            .count() as u64;
        let wal = Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            appends_since_compact: applied,
        };
        Ok((wal, events))
    }

    /// Append a single event and fsync.
    pub fn append(&mut self, event: &Event) -> io::Result<()> {
        encode_event(&mut self.writer, event)?;
        self.appends_since_compact += 1;
        self.writer.flush()?;
        self.writer.get_ref().sync_all()
    }

    pub fn appends_since_compact(&self) -> u64 {
        self.appends_since_compact
    }

    /// Replace the WAL with a minimal set of events that recreates the current state.
    /// Writes a temp file, fsyncs it, then renames it over the log.
    pub fn compact(&mut self, events: &[Event]) -> io::Result<()> {
        let tmp_path = self.path.with_extension("wal.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for event in events {
                encode_event(&mut writer, event)?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.writer = BufWriter::new(file);
        self.appends_since_compact = 0;
        Ok(())
    }

    /// Replay the WAL from disk, returning all valid events.
    /// Truncated/corrupt trailing entries are discarded.
    pub fn replay(path: &Path) -> io::Result<Vec<Event>> {
        Self::scan(path).map(|(events, _)| events)
    }

    /// Valid events plus the byte offset where the last valid entry ends.
    fn scan(path: &Path) -> io::Result<(Vec<Event>, u64)> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
            Err(e) => return Err(e),
        };
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut events = Vec::new();
        let mut offset = 0u64;

        loop {
            let mut len_buf = [0u8; 4];
            match reader.read_exact(&mut len_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
            let len = u32::from_le_bytes(len_buf) as u64;

            // Payload and CRC must fit in what is left of the file.
            let remaining = file_len.saturating_sub(offset + 4);
            if len + 4 > remaining {
                tracing::warn!(path = %path.display(), offset, len, "truncated WAL entry discarded");
                break;
            }

            let mut payload = vec![0u8; len as usize];
            let mut crc_buf = [0u8; 4];
            match reader
                .read_exact(&mut payload)
                .and_then(|()| reader.read_exact(&mut crc_buf))
            {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::warn!(path = %path.display(), offset, "truncated WAL entry discarded");
                    break;
                }
                Err(e) => return Err(e),
            }
            let stored_crc = u32::from_le_bytes(crc_buf);
            if stored_crc != crc32fast::hash(&payload) {
                tracing::warn!(path = %path.display(), offset, "WAL checksum mismatch, stopping replay");
                break;
            }

            match bincode::deserialize::<Event>(&payload) {
                Ok(event) => events.push(event),
                Err(e) => {
                    tracing::warn!(path = %path.display(), offset, "undecodable WAL entry: {e}");
                    break;
                }
            }
            offset += 4 + len + 4;
        }

        Ok((events, offset))
    }
}
