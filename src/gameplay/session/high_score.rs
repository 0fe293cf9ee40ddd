//! The one persisted value: the best score ever reached.
//!
//! On disk it is a RON map of `key -> integer`, so other keys written by neighbouring
//! tools survive a save.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "high score store io: {e}"),
            Self::Parse(e) => write!(f, "high score store parse: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub trait HighScoreBackend: Send + Sync + 'static {
    /// Stored value, 0 when nothing was stored yet.
    fn load(&self) -> Result<u32, StoreError>;
    fn save(&mut self, value: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryHighScore {
    pub value: Option<u32>,
    pub saves: usize,
}

impl HighScoreBackend for MemoryHighScore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.value.unwrap_or(0))
    }

    fn save(&mut self, value: u32) -> Result<(), StoreError> {
        self.value = Some(value);
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: PathBuf,
    key: String,
}

impl FileHighScore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, i64>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        ron::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))
    }
}

impl HighScoreBackend for FileHighScore {
    fn load(&self) -> Result<u32, StoreError> {
        let map = self.read_map()?;
        // Negative or oversized garbage counts as "nothing stored".
        Ok(map
            .get(&self.key)
            .and_then(|v| u32::try_from(*v).ok())
            .unwrap_or(0))
    }

    fn save(&mut self, value: u32) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking new records.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(self.key.clone(), i64::from(value));
        let text = ron::ser::to_string_pretty(&map, ron::ser::PrettyConfig::default())
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[derive(Resource)]
pub struct HighScoreStore(pub Box<dyn HighScoreBackend>);

impl Default for HighScoreStore {
    fn default() -> Self {
        Self::new(MemoryHighScore::default())
    }
}

impl HighScoreStore {
    pub fn new(backend: impl HighScoreBackend) -> Self {
        Self(Box::new(backend))
    }

    pub fn load(&self) -> Result<u32, StoreError> {
        self.0.load()
    }

    pub fn save(&mut self, value: u32) -> Result<(), StoreError> {
        self.0.save(value)
    }
}
