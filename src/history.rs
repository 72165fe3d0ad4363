//! # History Traversal and Record Mapping
//!
//! Turning "the checkout moved from commit A to commit B" into change-log
//! records is a two-stage job, and the stages are deliberately separate:
//!
//! - **`RevWalk`** is the pure traversal: the commits reachable from the
//!   new commit but not from the old one (`git rev-list <new> ^<old>`),
//!   yielded lazily in the walk's natural most-recent-first order. With no
//!   old boundary there is nothing to walk — the new commit itself is the
//!   single result, representing the first time a repository is seen.
//!
//! - **`commit_record`** is the mapping: one commit id in, one
//!   [`CommitRecord`] out. Identity, timestamp and message come from the
//!   commit header (author preferred, committer as fallback); affected
//!   files come from diffing the commit against its first parent, so each
//!   record reflects only its own commit, never a cumulative diff.
//!
//! Failures in either stage are classified as [`Error::HistoryWalk`].

use crate::changelog::{ChangeKind, CommitRecord, FileChange};
use crate::error::{Error, Result};
use crate::git;
use crate::resolve::LocalRepository;
use crate::state::CommitId;

/// Timestamp recorded when a commit identity has no usable one.
const DEFAULT_TIMESTAMP: i64 = 0;

fn walk_error(e: impl std::fmt::Display) -> Error {
    Error::HistoryWalk {
        message: e.to_string(),
    }
}

/// Lazy ancestry-exclusion traversal.
///
/// The walk is finite and non-restartable: iterate it once, collect what
/// you need.
pub struct RevWalk {
    lines: std::vec::IntoIter<String>,
}

impl RevWalk {
    /// Walk the commits reachable from `new` and not from `old`.
    ///
    /// With `old` absent the walk yields exactly `new`, without touching
    /// history.
    pub fn between(
        local: &LocalRepository,
        new: CommitId,
        old: Option<CommitId>,
    ) -> Result<Self> {
        let lines = match old {
            None => vec![new.to_string()],
            Some(old) => {
                let output = git::run(
                    local.dir(),
                    &["rev-list", &new.to_string(), &format!("^{old}")],
                )
                .map_err(walk_error)?;
                output.lines().map(str::to_owned).collect()
            }
        };
        Ok(Self {
            lines: lines.into_iter(),
        })
    }
}

impl Iterator for RevWalk {
    type Item = Result<CommitId>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(CommitId::from_hex(&line).map_err(walk_error))
    }
}

/// Materialize the record for a single commit.
pub fn commit_record(local: &LocalRepository, commit: CommitId) -> Result<CommitRecord> {
    // Unit-separated header fields, message body last so it may contain
    // anything.
    const FORMAT: &str = "--format=%H%x1f%P%x1f%an%x1f%ae%x1f%at%x1f%cn%x1f%ce%x1f%ct%x1f%B";
    let output = git::run(
        local.dir(),
        &["show", "--no-patch", FORMAT, &commit.to_string()],
    )
    .map_err(walk_error)?;

    let mut fields = output.splitn(9, '\x1f');
    let mut next = || fields.next().unwrap_or_default();
    let _hash = next();
    let parents = next().to_string();
    let author_name = next().to_string();
    let author_email = next().to_string();
    let author_time = next().to_string();
    let committer_name = next().to_string();
    let committer_email = next().to_string();
    let committer_time = next().to_string();
    let body = next().to_string();

    // Author identity preferred, committer identity as the fallback.
    let (name, email, time) = if author_name.is_empty() && author_email.is_empty() {
        (committer_name, committer_email, committer_time)
    } else {
        (author_name, author_email, author_time)
    };
    let timestamp = time
        .trim()
        .parse::<i64>()
        .map(|seconds| seconds * 1000)
        .unwrap_or(DEFAULT_TIMESTAMP);

    let first_parent = parents.split_whitespace().next().map(str::to_owned);
    let affected_files = affected_files(local, commit, first_parent.as_deref())?;

    Ok(CommitRecord {
        id: commit,
        author_name: name,
        author_email: email,
        timestamp,
        message: body.trim_end_matches('\n').to_string(),
        affected_files,
    })
}

/// Collect records for the whole walk from `new` back to `old`.
pub fn collect(
    local: &LocalRepository,
    new: CommitId,
    old: Option<CommitId>,
) -> Result<Vec<CommitRecord>> {
    let mut records = Vec::new();
    for id in RevWalk::between(local, new, old)? {
        records.push(commit_record(local, id?)?);
    }
    Ok(records)
}

/// Diff a commit against its first parent (or the empty tree for a root
/// commit) and classify each affected file.
fn affected_files(
    local: &LocalRepository,
    commit: CommitId,
    first_parent: Option<&str>,
) -> Result<Vec<FileChange>> {
    let commit = commit.to_string();
    let mut args = vec![
        "-c",
        "core.quotepath=off",
        "diff-tree",
        "--no-commit-id",
        "-r",
        "-M",
        "-C",
    ];
    match first_parent {
        Some(parent) => {
            args.push(parent);
            args.push(&commit);
        }
        None => {
            args.push("--root");
            args.push(&commit);
        }
    }
    let output = git::run(local.dir(), &args).map_err(walk_error)?;
    parse_diff_tree(&output)
}

/// Parse raw `diff-tree` output lines into file changes.
///
/// Lines have the form
/// `:<old-mode> <new-mode> <old-id> <new-id> <status>\t<path>[\t<path>]`
/// with a score suffix on copy and rename statuses.
fn parse_diff_tree(output: &str) -> Result<Vec<FileChange>> {
    let mut files = Vec::new();
    for line in output.lines() {
        let Some(rest) = line.strip_prefix(':') else {
            continue;
        };
        let mut columns = rest.split('\t');
        let meta = columns.next().unwrap_or_default();
        let status = meta.split_whitespace().nth(4).ok_or_else(|| {
            walk_error(format!("malformed diff-tree line: {line}"))
        })?;
        let first = columns
            .next()
            .ok_or_else(|| walk_error(format!("diff-tree line without path: {line}")))?;
        let second = columns.next();

        let change = match status.chars().next() {
            Some('A') => FileChange::added(first),
            Some('D') => FileChange::deleted(first),
            Some('C') => {
                let dst = second
                    .ok_or_else(|| walk_error(format!("copy without destination: {line}")))?;
                FileChange::carried(ChangeKind::Copied, first, dst)
            }
            Some('R') => {
                let dst = second
                    .ok_or_else(|| walk_error(format!("rename without destination: {line}")))?;
                FileChange::carried(ChangeKind::Renamed, first, dst)
            }
            // Modifications, type changes and anything unforeseen keep both
            // paths, which for an in-place edit are the same.
            _ => FileChange::carried(ChangeKind::Modified, first, second.unwrap_or(first)),
        };
        files.push(change);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testutil::{commit_file, git, init_repo};
    use crate::operation::WorkspaceOperation;
    use crate::repository::{RepositoryDescriptor, DEFAULT_BRANCH};
    use crate::resolve::ResolveOperation;
    use tempfile::TempDir;

    fn open(root: &std::path::Path) -> LocalRepository {
        let repo = RepositoryDescriptor::new("uri", DEFAULT_BRANCH, "");
        ResolveOperation::new(&repo).run(root).unwrap().unwrap()
    }

    fn id(hex: &str) -> CommitId {
        CommitId::from_hex(hex).unwrap()
    }

    #[test]
    fn test_parse_diff_tree_added() {
        let output = ":000000 100644 0000000 59d5db9 A\tfile.txt";
        let files = parse_diff_tree(output).unwrap();
        assert_eq!(files, vec![FileChange::added("file.txt")]);
    }

    #[test]
    fn test_parse_diff_tree_deleted_and_modified() {
        let output = ":100644 000000 59d5db9 0000000 D\tgone.txt\n\
                      :100644 100644 59d5db9 a0423896 M\tkept.txt";
        let files = parse_diff_tree(output).unwrap();
        assert_eq!(files[0], FileChange::deleted("gone.txt"));
        assert_eq!(
            files[1],
            FileChange::carried(ChangeKind::Modified, "kept.txt", "kept.txt")
        );
    }

    #[test]
    fn test_parse_diff_tree_rename_with_score() {
        let output = ":100644 100644 59d5db9 59d5db9 R100\told.txt\tnew.txt";
        let files = parse_diff_tree(output).unwrap();
        assert_eq!(
            files,
            vec![FileChange::carried(ChangeKind::Renamed, "old.txt", "new.txt")]
        );
    }

    #[test]
    fn test_parse_diff_tree_copy_with_score() {
        let output = ":100644 100644 59d5db9 59d5db9 C075\tsrc.txt\tcopy.txt";
        let files = parse_diff_tree(output).unwrap();
        assert_eq!(
            files,
            vec![FileChange::carried(ChangeKind::Copied, "src.txt", "copy.txt")]
        );
    }

    #[test]
    fn test_parse_diff_tree_ignores_non_entry_lines() {
        let files = parse_diff_tree("\n").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_walk_without_baseline_yields_single_commit() {
        let root = TempDir::new().unwrap();
        init_repo(root.path());
        let sha = commit_file(root.path(), "file.txt", "a", "first");
        let local = open(root.path());

        let ids: Vec<_> = RevWalk::between(&local, id(&sha), None)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(ids, vec![id(&sha)]);
    }

    #[test]
    fn test_walk_exclusive_range() {
        let root = TempDir::new().unwrap();
        init_repo(root.path());
        let first = commit_file(root.path(), "file.txt", "a", "first");
        let second = commit_file(root.path(), "file.txt", "b", "second");
        let third = commit_file(root.path(), "file.txt", "c", "third");
        let local = open(root.path());

        let ids: Vec<_> = RevWalk::between(&local, id(&third), Some(id(&first)))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        // Most recent first, the old boundary excluded.
        assert_eq!(ids, vec![id(&third), id(&second)]);
    }

    #[test]
    fn test_commit_record_fields() {
        let root = TempDir::new().unwrap();
        init_repo(root.path());
        let sha = commit_file(root.path(), "file.txt", "a", "add a file");
        let local = open(root.path());

        let record = commit_record(&local, id(&sha)).unwrap();
        assert_eq!(record.id, id(&sha));
        assert_eq!(record.author_name, "author");
        assert_eq!(record.author_email, "author@test.com");
        assert_eq!(record.message, "add a file");
        assert!(record.timestamp > 0);
        assert_eq!(record.timestamp % 1000, 0);
        assert_eq!(record.affected_files, vec![FileChange::added("file.txt")]);
    }

    #[test]
    fn test_commit_record_diffs_against_first_parent_only() {
        let root = TempDir::new().unwrap();
        init_repo(root.path());
        commit_file(root.path(), "one.txt", "1", "first");
        commit_file(root.path(), "two.txt", "2", "second");
        let third = commit_file(root.path(), "one.txt", "edited", "third");
        let local = open(root.path());

        let record = commit_record(&local, id(&third)).unwrap();
        // Only the third commit's own change, not a cumulative diff.
        assert_eq!(
            record.affected_files,
            vec![FileChange::carried(ChangeKind::Modified, "one.txt", "one.txt")]
        );
    }

    #[test]
    fn test_commit_record_detects_rename() {
        let root = TempDir::new().unwrap();
        init_repo(root.path());
        commit_file(root.path(), "old.txt", "stable content", "first");
        git(root.path(), &["mv", "old.txt", "new.txt"]);
        git(root.path(), &["commit", "-q", "-m", "rename"]);
        let local = open(root.path());
        let head = local.head_commit().unwrap().unwrap();

        let record = commit_record(&local, head).unwrap();
        assert_eq!(
            record.affected_files,
            vec![FileChange::carried(ChangeKind::Renamed, "old.txt", "new.txt")]
        );
    }

    #[test]
    fn test_collect_orders_records_like_the_walk() {
        let root = TempDir::new().unwrap();
        init_repo(root.path());
        let first = commit_file(root.path(), "file.txt", "a", "first");
        commit_file(root.path(), "file.txt", "b", "second");
        let third = commit_file(root.path(), "file.txt", "c", "third");
        let local = open(root.path());

        let records = collect(&local, id(&third), Some(id(&first))).unwrap();
        let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "second"]);
    }

    #[test]
    fn test_collect_unknown_commit_is_history_walk_error() {
        let root = TempDir::new().unwrap();
        init_repo(root.path());
        commit_file(root.path(), "file.txt", "a", "first");
        let local = open(root.path());

        let missing = id("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef");
        let err = collect(&local, missing, None).unwrap_err();
        assert!(matches!(err, Error::HistoryWalk { .. }));
    }
}
