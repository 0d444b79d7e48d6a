use serde::{Deserialize, Serialize};

use crate::errors::LogError;
use crate::game::Outcome;
use crate::seats::SessionId;

/// The four intents a transport can deliver.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Join,
    Leave,
    Play,
    Slap,
}

/// One accepted transition.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// 1-based position in the match history
    pub seq: u64,
    pub session_id: SessionId,
    pub intent: Intent,
    pub outcome: Outcome,
    /// Timestamp when the action was written (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

/// Everything needed to replay a match: the deck seed plus accepted actions.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Identifier of the match (format: YYYYMMDD-NNNNNN)
    pub match_id: String,
    pub seed: u64,
    pub actions: Vec<ActionRecord>,
}

pub fn format_match_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// One line of the JSONL action log. Each match opens with a header carrying
/// its deck seed, followed by its accepted actions.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum LogLine {
    MatchStarted {
        match_id: String,
        seed: u64,
        #[serde(default)]
        ts: Option<String>,
    },
    Action(ActionRecord),
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Appends match headers and action records to a JSONL file.
pub struct ActionLogger {
    writer: BufWriter<File>,
    date: String,
    seq: u32,
}

impl ActionLogger {
    /// Opens `path` for appending. Match ids continue after the matches
    /// already logged today, so reopening a log never reuses an id.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let date = Utc::now().format("%Y%m%d").to_string();
        let seq = if path.is_file() {
            let prefix = format!("{date}-");
            read_log(path)?
                .iter()
                .filter(|line| match line {
                    LogLine::MatchStarted { match_id, .. } => match_id.starts_with(&prefix),
                    LogLine::Action(_) => false,
                })
                .count() as u32
        } else {
            0
        };
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
            date,
            seq,
        })
    }

    fn next_match_id(&mut self) -> String {
        self.seq += 1;
        format_match_id(&self.date, self.seq)
    }

    /// Writes the header of a new match dealt from `seed` and returns its id.
    pub fn start_match(&mut self, seed: u64) -> Result<String, LogError> {
        let match_id = self.next_match_id();
        self.write_line(&LogLine::MatchStarted {
            match_id: match_id.clone(),
            seed,
            ts: Some(now_rfc3339()),
        })?;
        Ok(match_id)
    }

    pub fn write(&mut self, record: &ActionRecord) -> Result<(), LogError> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(now_rfc3339());
        }
        self.write_line(&LogLine::Action(rec))
    }

    fn write_line(&mut self, line: &LogLine) -> Result<(), LogError> {
        let json = serde_json::to_string(line)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for ActionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionLogger")
            .field("date", &self.date)
            .field("seq", &self.seq)
            .finish()
    }
}

/// Reads every line of a JSONL action log.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<LogLine>, LogError> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(LogError::from))
        .collect()
}

/// Groups a JSONL action log into replayable matches, in file order.
pub fn read_matches<P: AsRef<Path>>(path: P) -> Result<Vec<MatchRecord>, LogError> {
    let mut matches: Vec<MatchRecord> = Vec::new();
    for (index, entry) in read_log(path)?.into_iter().enumerate() {
        match entry {
            LogLine::MatchStarted { match_id, seed, .. } => matches.push(MatchRecord {
                match_id,
                seed,
                actions: Vec::new(),
            }),
            LogLine::Action(record) => match matches.last_mut() {
                Some(current) => current.actions.push(record),
                None => return Err(LogError::MissingHeader { entry: index + 1 }),
            },
        }
    }
    Ok(matches)
}
