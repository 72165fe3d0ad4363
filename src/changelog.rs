//! # Change Log Model and JSON Format
//!
//! A checkout produces a change log: the ordered commits that became newly
//! visible, with per-commit file changes. This module holds the record
//! types and the file format.
//!
//! ## Key Components
//!
//! - **`CommitRecord`**: one commit — id, author identity (opaque name and
//!   email strings), timestamp in epoch milliseconds, full message, and the
//!   affected files. Equality and hashing are keyed on the commit id.
//!
//! - **`FileChange`** / **`ChangeKind`**: one affected path with its edit
//!   classification. Added files carry no old path, deleted files no new
//!   path; everything else carries both.
//!
//! - **`CommitLogWriter`**: streams records into a JSON array one at a
//!   time, so the log on disk grows as the checkout progresses. The writer
//!   must be closed exactly once; closing with no records still produces a
//!   well-formed empty array.
//!
//! - **`CommitLogReader`** / **`ChangeLog`**: reads the format back into an
//!   ordered, re-iterable sequence.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::CommitId;

/// Classification of how a commit touched a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Added,
    Deleted,
    Copied,
    Renamed,
    Modified,
}

/// A file affected by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    change_kind: ChangeKind,
    old_path: Option<String>,
    new_path: Option<String>,
}

impl FileChange {
    /// A file introduced by the commit.
    pub fn added(path: impl Into<String>) -> Self {
        Self {
            change_kind: ChangeKind::Added,
            old_path: None,
            new_path: Some(path.into()),
        }
    }

    /// A file removed by the commit.
    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            change_kind: ChangeKind::Deleted,
            old_path: Some(path.into()),
            new_path: None,
        }
    }

    /// A file carried from `old_path` to `new_path` by the given kind
    /// (copy, rename, or in-place modification).
    pub fn carried(
        change_kind: ChangeKind,
        old_path: impl Into<String>,
        new_path: impl Into<String>,
    ) -> Self {
        Self {
            change_kind,
            old_path: Some(old_path.into()),
            new_path: Some(new_path.into()),
        }
    }

    /// Edit classification.
    pub fn change_kind(&self) -> ChangeKind {
        self.change_kind
    }

    /// Path before the change, absent for added files.
    pub fn old_path(&self) -> Option<&str> {
        self.old_path.as_deref()
    }

    /// Path after the change, absent for deleted files.
    pub fn new_path(&self) -> Option<&str> {
        self.new_path.as_deref()
    }

    /// The externally visible path: the new path when present, otherwise
    /// the old one.
    pub fn path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }
}

/// One commit in a change log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit id, serialized as hex.
    pub id: CommitId,
    /// Author name (committer name when the commit has no author).
    pub author_name: String,
    /// Author email (committer email when the commit has no author).
    pub author_email: String,
    /// Author timestamp in epoch milliseconds; `0` when unavailable.
    pub timestamp: i64,
    /// Full commit message, trailing newlines trimmed.
    pub message: String,
    /// Files affected by this commit, relative to its first parent.
    pub affected_files: Vec<FileChange>,
}

impl CommitRecord {
    /// Paths affected by this commit, in file order.
    pub fn affected_paths(&self) -> Vec<&str> {
        self.affected_files.iter().map(FileChange::path).collect()
    }
}

// A record's identity is its commit: equality and hashing are keyed on the
// id alone, uniformly.
impl PartialEq for CommitRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommitRecord {}

impl std::hash::Hash for CommitRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Ordered, re-iterable sequence of commit records from one checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    commits: Vec<CommitRecord>,
}

impl ChangeLog {
    /// Create a change log over the given records.
    pub fn new(commits: Vec<CommitRecord>) -> Self {
        Self { commits }
    }

    /// Whether the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Iterate over the records in log order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommitRecord> {
        self.commits.iter()
    }

    /// The records as a slice.
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }
}

impl IntoIterator for ChangeLog {
    type Item = CommitRecord;
    type IntoIter = std::vec::IntoIter<CommitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a CommitRecord;
    type IntoIter = std::slice::Iter<'a, CommitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}

/// Incremental writer for the JSON change log format.
///
/// Records are appended one at a time; `close` finalizes the array and must
/// be called exactly once on every exit path, including early failure.
pub struct CommitLogWriter<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> CommitLogWriter<W> {
    /// Create a writer over the given sink.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            first: true,
        }
    }

    /// Append one record to the log.
    pub fn write(&mut self, commit: &CommitRecord) -> Result<()> {
        if self.first {
            self.writer.write_all(b"[")?;
            self.first = false;
        } else {
            self.writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.writer, commit)?;
        Ok(())
    }

    /// Finalize the array and flush.
    ///
    /// A log with zero records still comes out as a well-formed `[]`.
    pub fn close(mut self) -> Result<()> {
        if self.first {
            self.writer.write_all(b"[")?;
        }
        self.writer.write_all(b"]")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Reader for the JSON change log format.
pub struct CommitLogReader;

impl CommitLogReader {
    /// Read a change log from a reader.
    ///
    /// An entirely empty input reads as an empty log.
    pub fn read(reader: impl Read) -> Result<ChangeLog> {
        let mut contents = String::new();
        let mut reader = BufReader::new(reader);
        reader.read_to_string(&mut contents)?;
        if contents.trim().is_empty() {
            return Ok(ChangeLog::default());
        }
        let commits: Vec<CommitRecord> = serde_json::from_str(&contents)?;
        Ok(ChangeLog::new(commits))
    }

    /// Read a change log from a file.
    pub fn read_path(path: &Path) -> Result<ChangeLog> {
        Self::read(File::open(path)?)
    }
}
