//! Property-based tests for the value types and the change log format.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::changelog::{ChangeKind, CommitLogReader, CommitLogWriter, CommitRecord, FileChange};
    use crate::repository::RepositoryDescriptor;
    use crate::state::{CommitId, RepositoryStateSnapshot};
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn commit_id_strategy() -> impl Strategy<Value = CommitId> {
        "[0-9a-f]{40}".prop_map(|hex| CommitId::from_hex(&hex).unwrap())
    }

    fn file_change_strategy() -> impl Strategy<Value = FileChange> {
        let path = "[a-zA-Z0-9_./-]{1,40}";
        prop_oneof![
            path.prop_map(|p| FileChange::added(p)),
            path.prop_map(|p| FileChange::deleted(p)),
            (path, path).prop_map(|(old, new)| FileChange::carried(ChangeKind::Renamed, old, new)),
            (path, path).prop_map(|(old, new)| FileChange::carried(ChangeKind::Copied, old, new)),
            path.prop_map(|p| FileChange::carried(ChangeKind::Modified, p.clone(), p)),
        ]
    }

    fn record_strategy() -> impl Strategy<Value = CommitRecord> {
        (
            commit_id_strategy(),
            "[a-zA-Z ]{1,20}",
            "[a-z]{1,10}@[a-z]{1,10}\\.com",
            0i64..=4_000_000_000_000,
            ".{0,200}",
            proptest::collection::vec(file_change_strategy(), 0..8),
        )
            .prop_map(
                |(id, author_name, author_email, timestamp, message, affected_files)| {
                    CommitRecord {
                        id,
                        author_name,
                        author_email,
                        timestamp,
                        message,
                        affected_files,
                    }
                },
            )
    }

    proptest! {
        /// Property: descriptors with identical fields are equal and hash
        /// identically
        #[test]
        fn descriptor_equality_and_hash_are_structural(
            uri in ".{0,60}",
            branch in ".{0,60}",
            directory in ".{0,30}",
        ) {
            let a = RepositoryDescriptor::new(uri.clone(), branch.clone(), directory.clone());
            let b = RepositoryDescriptor::new(uri, branch, directory);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }

        /// Property: changing any single field breaks descriptor equality
        #[test]
        fn descriptor_equality_sensitive_to_each_field(
            uri in "[a-z]{1,20}",
            branch in "[a-z]{1,20}",
            directory in "[a-z]{1,20}",
            suffix in "[a-z]{1,5}",
        ) {
            let base = RepositoryDescriptor::new(uri.clone(), branch.clone(), directory.clone());
            let changed_uri =
                RepositoryDescriptor::new(format!("{uri}{suffix}"), branch.clone(), directory.clone());
            let changed_branch =
                RepositoryDescriptor::new(uri.clone(), format!("{branch}{suffix}"), directory.clone());
            let changed_dir =
                RepositoryDescriptor::new(uri, branch, format!("{directory}{suffix}"));
            prop_assert_ne!(&base, &changed_uri);
            prop_assert_ne!(&base, &changed_branch);
            prop_assert_ne!(&base, &changed_dir);
        }

        /// Property: commit ids round-trip through their hex display
        #[test]
        fn commit_id_hex_round_trip(id in commit_id_strategy()) {
            let hex = id.to_string();
            prop_assert_eq!(CommitId::from_hex(&hex).unwrap(), id);
        }

        /// Property: snapshot get returns exactly what put stored
        #[test]
        fn snapshot_put_get_round_trip(
            uri in "[a-z]{1,20}",
            directory in "[a-z]{0,10}",
            id in commit_id_strategy(),
        ) {
            let repo = RepositoryDescriptor::new(uri, "refs/heads/master", directory);
            let mut snapshot = RepositoryStateSnapshot::new();
            snapshot.put(repo.clone(), id);
            prop_assert_eq!(snapshot.get(&repo), Some(id));
        }

        /// Property: a written change log always reads back with the same
        /// records in the same order
        #[test]
        fn change_log_round_trip(records in proptest::collection::vec(record_strategy(), 0..6)) {
            let mut buffer = Vec::new();
            let mut writer = CommitLogWriter::new(&mut buffer);
            for record in &records {
                writer.write(record).unwrap();
            }
            writer.close().unwrap();

            let log = CommitLogReader::read(buffer.as_slice()).unwrap();
            prop_assert_eq!(log.len(), records.len());
            for (back, original) in log.iter().zip(&records) {
                prop_assert_eq!(&back.id, &original.id);
                prop_assert_eq!(&back.author_name, &original.author_name);
                prop_assert_eq!(&back.author_email, &original.author_email);
                prop_assert_eq!(back.timestamp, original.timestamp);
                prop_assert_eq!(&back.message, &original.message);
                prop_assert_eq!(&back.affected_files, &original.affected_files);
            }
        }
    }
}
