use super::error::EngineError;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Returned in place of the log content before the engine has written anything.
pub const LOG_NOT_CREATED: &str = "Log file has not been created yet...";

/// Reads the whole run log.
///
/// Invalid UTF-8 is replaced rather than rejected. A missing file yields
/// [`LOG_NOT_CREATED`].
pub fn read(path: &Path) -> Result<String, EngineError> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LOG_NOT_CREATED.to_string()),
        Err(e) => Err(EngineError::io(path)(e)),
    }
}

/// Incremental reader returning only what was appended since the previous call.
///
/// If the file shrinks (a new run truncated it) the cursor starts again from the
/// beginning. A multi-byte character split across two writes is held back until it is
/// complete.
#[derive(Debug, Clone)]
pub struct LogCursor {
    path: PathBuf,
    offset: u64,
}

impl LogCursor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn read_new(&mut self) -> Result<String, EngineError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => return Err(EngineError::io(&self.path)(e)),
        };
        let len = file.metadata().map_err(EngineError::io(&self.path))?.len();
        if len < self.offset {
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(String::new());
        }

        file.seek(SeekFrom::Start(self.offset))
            .map_err(EngineError::io(&self.path))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(EngineError::io(&self.path))?;

        let consumed = match std::str::from_utf8(&buf) {
            Ok(_) => buf.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => buf.len(),
        };
        self.offset += consumed as u64;
        Ok(String::from_utf8_lossy(&buf[..consumed]).into_owned())
    }
}
