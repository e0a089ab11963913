use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The leaderboard keeps only the best five times.
pub const MAX_ENTRIES: usize = 5;

/// `seconds` as zero-padded `MM:SS`. Minutes are not capped at 59; the
/// persisted format simply widens past 99 minutes.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One ranked score: elapsed seconds, its `MM:SS` rendering, player name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub seconds: u32,
    pub formatted: String,
    pub name: String,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, seconds: u32) -> Self {
        Self {
            seconds,
            formatted: format_time(seconds),
            name: name.into(),
        }
    }

    /// Parses a persisted `MM:SS,name` line. Names hold no commas (they are
    /// constrained to alphabetic characters upstream), so the first comma
    /// splits unambiguously.
    fn parse(line: &str) -> Option<Self> {
        let (time, name) = line.split_once(',')?;
        let (minutes, seconds) = time.split_once(':')?;
        let minutes: u32 = minutes.parse().ok()?;
        let seconds: u32 = seconds.parse().ok()?;
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, minutes * 60 + seconds))
    }

    fn to_line(&self) -> String {
        format!("{},{}", self.formatted, self.name)
    }
}

/// Ranked top-five list persisted as newline-delimited `MM:SS,name` records,
/// ascending by time, ties kept in submission order. File trouble never
/// interrupts gameplay: it is logged and the board degrades to empty or
/// unsaved.
#[derive(Clone, Debug)]
pub struct ScoreBoard {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    /// Loads the score file, or starts empty when it is missing or damaged.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => parse_entries(&path, &text),
            Err(err) => {
                log::warn!("could not read scores from {}: {err}", path.display());
                Vec::new()
            }
        };
        Self { path, entries }
    }

    /// An unpersisted board, for tests and score-less play.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries ascending by time.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Records a score, re-ranks, truncates to the top five, and persists.
    /// Returns whether the new score made the list.
    pub fn submit(&mut self, name: impl Into<String>, seconds: u32) -> bool {
        let entry = ScoreEntry::new(name, seconds);
        log::debug!("score submitted: {} by {}", entry.formatted, entry.name);

        self.entries.push(entry);
        // stable: equal times keep submission order, so the new entry ends
        // up last among its ties
        self.entries.sort_by_key(|entry| entry.seconds);
        let position = self
            .entries
            .iter()
            .rposition(|entry| entry.seconds == seconds)
            .unwrap_or(self.entries.len());
        let retained = position < MAX_ENTRIES;
        self.entries.truncate(MAX_ENTRIES);

        self.save();
        retained
    }

    /// Writes the current list back out. Failures are logged and ignored.
    pub fn save(&self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.to_line());
            text.push('\n');
        }
        if let Err(err) = fs::write(&self.path, text) {
            log::warn!("could not save scores to {}: {err}", self.path.display());
        }
    }
}

fn parse_entries(path: &Path, text: &str) -> Vec<ScoreEntry> {
    let mut entries: Vec<ScoreEntry> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = ScoreEntry::parse(line);
            if parsed.is_none() {
                log::warn!("skipping malformed score line in {}: {line:?}", path.display());
            }
            parsed
        })
        .collect();
    entries.sort_by_key(|entry| entry.seconds);
    entries
}
