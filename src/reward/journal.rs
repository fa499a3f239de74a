use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use super::aggregator::RewardAggregator;
use super::breakdown::RewardCategory;
use crate::error::JournalError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub weight: f64,
    pub weighted: f64,
}

/// Reward summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRecord {
    pub controller_id: Uuid,
    pub episode: u64,
    pub timestamp: DateTime<Utc>,
    pub start_state: PathBuf,
    pub steps: u64,
    pub deaths: u32,
    pub total_reward: f64,
    pub categories: IndexMap<&'static str, CategoryRecord>,
}

impl EpisodeRecord {
    pub fn new(
        controller_id: Uuid,
        episode: u64,
        start_state: PathBuf,
        steps: u64,
        deaths: u32,
        aggregator: &RewardAggregator,
    ) -> Self {
        let categories = RewardCategory::ALL
            .into_iter()
            .map(|category| {
                (
                    category.as_str(),
                    CategoryRecord {
                        weight: aggregator.weights().get(category),
                        weighted: aggregator.banked().get(category),
                    },
                )
            })
            .collect();

        Self {
            controller_id,
            episode,
            timestamp: Utc::now(),
            start_state,
            steps,
            deaths,
            total_reward: aggregator.cumulative(),
            categories,
        }
    }
}

/// Append-only sink for finished episodes.
pub trait RewardJournal: Send {
    fn write_record(&mut self, record: &EpisodeRecord) -> Result<(), JournalError>;
    fn flush(&mut self) -> Result<(), JournalError>;
}

/// Writes one JSON object per line.
pub struct JsonLinesJournal {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesJournal {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| JournalError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| JournalError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn io_error(&self, source: std::io::Error) -> JournalError {
        JournalError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RewardJournal for JsonLinesJournal {
    fn write_record(&mut self, record: &EpisodeRecord) -> Result<(), JournalError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n").map_err(|e| self.io_error(e))?;
        // Records are rare, keep every finished episode durable
        self.flush()
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        self.writer.flush().map_err(|e| self.io_error(e))
    }
}

/// In-memory journal (for testing and development). Clones share the same records.
#[derive(Clone, Default)]
pub struct InMemoryJournal {
    records: Arc<Mutex<Vec<EpisodeRecord>>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EpisodeRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RewardJournal for InMemoryJournal {
    fn write_record(&mut self, record: &EpisodeRecord) -> Result<(), JournalError> {
        match self.records.lock() {
            Ok(mut records) => records.push(record.clone()),
            Err(poisoned) => poisoned.into_inner().push(record.clone()),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        // In-memory journal doesn't need to flush
        Ok(())
    }
}
