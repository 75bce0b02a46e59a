// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the GroupOrderReconciler.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tablist_core::{
    BucketError, BucketSpec, BucketStore, Participant, ParticipantId, RankProvider, SortMode,
};
use tablist_lanes::sort_participants;

/// Name prefix marking a bucket as engine-owned.
pub const DEFAULT_BUCKET_PREFIX: &str = "tl_";

pub(crate) type AssignmentMap = Arc<RwLock<HashMap<ParticipantId, String>>>;

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Buckets created.
    pub created: usize,
    /// Participants added to a new bucket.
    pub moved: usize,
    /// Engine-owned buckets deleted.
    pub deleted: usize,
}

impl ReconcileReport {
    /// `true` when the pass did not touch the bucket store.
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.moved == 0 && self.deleted == 0
    }
}

/// Keeps the host's buckets in step with the desired participant order.
pub struct GroupOrderReconciler {
    prefix: String,
    last_mode: Option<SortMode>,
    assignments: AssignmentMap,
}

impl GroupOrderReconciler {
    /// Creates a reconciler owning the buckets named with [`DEFAULT_BUCKET_PREFIX`].
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_BUCKET_PREFIX)
    }

    /// Creates a reconciler owning the buckets named with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_mode: None,
            assignments: Arc::default(),
        }
    }

    /// The private bucket name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The sort mode seen by the last pass, `None` before the first one.
    pub fn last_mode(&self) -> Option<SortMode> {
        self.last_mode
    }

    /// The bucket name for a 1-based list position.
    pub fn bucket_name(&self, position: usize) -> String {
        format!("{}{:05}", self.prefix, position)
    }

    /// Whether `bucket` carries the private prefix.
    pub fn owns(&self, bucket: &str) -> bool {
        bucket.starts_with(&self.prefix)
    }

    /// The engine-owned bucket `id` was placed in by the last pass.
    pub fn assigned_bucket(&self, id: ParticipantId) -> Option<String> {
        self.assignments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub(crate) fn assignments_handle(&self) -> AssignmentMap {
        Arc::clone(&self.assignments)
    }

    /// Runs one reconciliation pass.
    ///
    /// Failures reported by the store are logged and skipped. The next pass
    /// retries whatever is still out of place.
    pub fn reconcile(
        &mut self,
        mode: SortMode,
        participants: &[Participant],
        ranks: &dyn RankProvider,
        store: &mut dyn BucketStore,
    ) -> ReconcileReport {
        let previous = self.last_mode.replace(mode);
        let mut report = ReconcileReport::default();

        if mode == SortMode::None {
            if previous != Some(SortMode::None) {
                report.deleted = self.delete_owned_except(store, &HashSet::new());
                self.write_assignments(HashMap::new());
                log::debug!(
                    "GroupOrderReconciler: Ordering disabled, removed {} buckets",
                    report.deleted
                );
            }
            return report;
        }

        if previous.is_none() {
            report.deleted = self.delete_owned_except(store, &HashSet::new());
            if report.deleted > 0 {
                log::info!(
                    "GroupOrderReconciler: Removed {} leftover buckets on startup",
                    report.deleted
                );
            }
        }

        let mut ordered: Vec<Participant> = participants
            .iter()
            .filter(|participant| !self.is_on_foreign_bucket(participant, store))
            .cloned()
            .collect();
        sort_participants(mode, &mut ordered, ranks);

        let mut needed = HashSet::with_capacity(ordered.len());
        let mut assignments = HashMap::with_capacity(ordered.len());

        for (index, participant) in ordered.iter().enumerate() {
            let desired = self.bucket_name(index + 1);
            let in_place = store.bucket_of(&participant.name).as_deref() == Some(desired.as_str())
                || self.place(participant, &desired, store, &mut report);
            needed.insert(desired.clone());
            if in_place {
                assignments.insert(participant.id, desired);
            }
        }

        report.deleted += self.delete_owned_except(store, &needed);
        self.write_assignments(assignments);
        report
    }

    /// Removes a departed participant from its engine-owned bucket, deleting
    /// the bucket when nobody is left in it.
    pub fn forget(&mut self, participant: &Participant, store: &mut dyn BucketStore) {
        self.assignments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&participant.id);

        let Some(bucket) = store
            .bucket_of(&participant.name)
            .filter(|bucket| self.owns(bucket))
        else {
            return;
        };

        if let Err(err) = store.remove(&participant.name, &bucket) {
            log::warn!(
                "GroupOrderReconciler: Failed to remove '{}' from {bucket}: {err}",
                participant.name
            );
            return;
        }
        if store.members_of(&bucket).is_empty() {
            if let Err(err) = store.delete(&bucket) {
                log::warn!("GroupOrderReconciler: Failed to delete {bucket}: {err}");
            }
        }
    }

    /// Forgets the last seen mode and every assignment.
    ///
    /// The next pass behaves like the first one after startup.
    pub fn reset(&mut self) {
        self.last_mode = None;
        self.write_assignments(HashMap::new());
    }

    fn is_on_foreign_bucket(&self, participant: &Participant, store: &dyn BucketStore) -> bool {
        store
            .bucket_of(&participant.name)
            .is_some_and(|bucket| !self.owns(&bucket))
    }

    /// Moves `participant` into `desired`. Returns `false` when it did not get there.
    fn place(
        &self,
        participant: &Participant,
        desired: &str,
        store: &mut dyn BucketStore,
        report: &mut ReconcileReport,
    ) -> bool {
        if let Some(current) = store
            .bucket_of(&participant.name)
            .filter(|bucket| self.owns(bucket))
        {
            if let Err(err) = store.remove(&participant.name, &current) {
                log::warn!(
                    "GroupOrderReconciler: Failed to remove '{}' from {current}: {err}",
                    participant.name
                );
            }
        }

        if !store.contains(desired) {
            match store.create(BucketSpec::plain(desired)) {
                Ok(()) => report.created += 1,
                Err(BucketError::AlreadyExists(_)) => {}
                Err(err) => {
                    log::warn!("GroupOrderReconciler: Failed to create {desired}: {err}");
                    return false;
                }
            }
        }

        match store.add(&participant.name, desired) {
            Ok(()) => {
                report.moved += 1;
                true
            }
            Err(err) => {
                log::warn!(
                    "GroupOrderReconciler: Failed to add '{}' to {desired}: {err}",
                    participant.name
                );
                false
            }
        }
    }

    fn delete_owned_except(&self, store: &mut dyn BucketStore, keep: &HashSet<String>) -> usize {
        let mut deleted = 0;
        for bucket in store.buckets_with_prefix(&self.prefix) {
            if keep.contains(&bucket) || !self.owns(&bucket) {
                continue;
            }
            match store.delete(&bucket) {
                Ok(()) => deleted += 1,
                Err(err) => log::warn!("GroupOrderReconciler: Failed to delete {bucket}: {err}"),
            }
        }
        deleted
    }

    fn write_assignments(&self, assignments: HashMap<ParticipantId, String>) {
        *self
            .assignments
            .write()
            .unwrap_or_else(PoisonError::into_inner) = assignments;
    }
}

impl Default for GroupOrderReconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tablist_core::NoRanks;

    /// A minimal store keeping bucket name -> members.
    #[derive(Default)]
    struct MapStore {
        buckets: BTreeMap<String, Vec<String>>,
        creates: usize,
        refused_members: Vec<String>,
    }

    impl BucketStore for MapStore {
        fn buckets_with_prefix(&self, prefix: &str) -> Vec<String> {
            self.buckets
                .keys()
                .filter(|name| name.starts_with(prefix))
                .cloned()
                .collect()
        }

        fn contains(&self, name: &str) -> bool {
            self.buckets.contains_key(name)
        }

        fn create(&mut self, spec: BucketSpec) -> Result<(), BucketError> {
            if self.buckets.contains_key(&spec.name) {
                return Err(BucketError::AlreadyExists(spec.name));
            }
            self.creates += 1;
            self.buckets.insert(spec.name, Vec::new());
            Ok(())
        }

        fn delete(&mut self, name: &str) -> Result<(), BucketError> {
            self.buckets
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| BucketError::NotFound(name.to_string()))
        }

        fn add(&mut self, member: &str, bucket: &str) -> Result<(), BucketError> {
            if self.refused_members.iter().any(|m| m == member) {
                return Err(BucketError::Rejected(format!("{member} is locked")));
            }
            if !self.buckets.contains_key(bucket) {
                return Err(BucketError::NotFound(bucket.to_string()));
            }
            for members in self.buckets.values_mut() {
                members.retain(|m| m != member);
            }
            if let Some(members) = self.buckets.get_mut(bucket) {
                members.push(member.to_string());
            }
            Ok(())
        }

        fn remove(&mut self, member: &str, bucket: &str) -> Result<(), BucketError> {
            let members = self
                .buckets
                .get_mut(bucket)
                .ok_or_else(|| BucketError::NotFound(bucket.to_string()))?;
            members.retain(|m| m != member);
            Ok(())
        }

        fn bucket_of(&self, member: &str) -> Option<String> {
            self.buckets
                .iter()
                .find(|(_, members)| members.iter().any(|m| m == member))
                .map(|(name, _)| name.clone())
        }

        fn members_of(&self, bucket: &str) -> Vec<String> {
            self.buckets.get(bucket).cloned().unwrap_or_default()
        }
    }

    fn roster(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|name| Participant::new(ParticipantId::new(), *name))
            .collect()
    }

    #[test]
    fn bucket_names_are_zero_padded_and_one_based() {
        let reconciler = GroupOrderReconciler::new();
        assert_eq!(reconciler.bucket_name(1), "tl_00001");
        assert_eq!(reconciler.bucket_name(12345), "tl_12345");
    }

    #[test]
    fn alphabetical_assigns_positions_ignoring_case() {
        let mut store = MapStore::default();
        let mut reconciler = GroupOrderReconciler::new();
        let participants = roster(&["Bob", "alice"]);

        let report = reconciler.reconcile(
            SortMode::Alphabetical,
            &participants,
            &NoRanks,
            &mut store,
        );

        assert_eq!(store.bucket_of("alice").as_deref(), Some("tl_00001"));
        assert_eq!(store.bucket_of("Bob").as_deref(), Some("tl_00002"));
        assert_eq!(report.created, 2);
        assert_eq!(report.moved, 2);
        assert_eq!(
            reconciler.assigned_bucket(participants[0].id).as_deref(),
            Some("tl_00002")
        );
    }

    #[test]
    fn unchanged_order_causes_no_churn() {
        let mut store = MapStore::default();
        let mut reconciler = GroupOrderReconciler::new();
        let participants = roster(&["Bob", "alice"]);

        reconciler.reconcile(SortMode::Alphabetical, &participants, &NoRanks, &mut store);
        let report =
            reconciler.reconcile(SortMode::Alphabetical, &participants, &NoRanks, &mut store);

        assert!(report.is_noop());
        assert_eq!(store.creates, 2);
    }

    #[test]
    fn departed_participants_leave_stale_buckets_behind_for_cleanup() {
        let mut store = MapStore::default();
        let mut reconciler = GroupOrderReconciler::new();
        let participants = roster(&["alice", "Bob", "carol"]);
        reconciler.reconcile(SortMode::Alphabetical, &participants, &NoRanks, &mut store);

        let remaining = vec![participants[1].clone()];
        let report = reconciler.reconcile(SortMode::Alphabetical, &remaining, &NoRanks, &mut store);

        assert_eq!(store.bucket_of("Bob").as_deref(), Some("tl_00001"));
        assert_eq!(report.deleted, 2);
        assert_eq!(store.buckets_with_prefix("tl_"), vec!["tl_00001".to_string()]);
        assert_eq!(reconciler.assigned_bucket(participants[0].id), None);
    }

    #[test]
    fn foreign_buckets_and_their_members_are_untouched() {
        let mut store = MapStore::default();
        store.create(BucketSpec::plain("red_team")).unwrap();
        store.add("Bob", "red_team").unwrap();
        let mut reconciler = GroupOrderReconciler::new();

        reconciler.reconcile(
            SortMode::Alphabetical,
            &roster(&["Bob", "alice", "carl"]),
            &NoRanks,
            &mut store,
        );
        reconciler.reconcile(SortMode::None, &roster(&["Bob"]), &NoRanks, &mut store);

        assert_eq!(store.bucket_of("Bob").as_deref(), Some("red_team"));
        assert!(store.contains("red_team"));
        assert!(store.buckets_with_prefix("tl_").is_empty());
    }

    #[test]
    fn skipped_participants_do_not_consume_positions() {
        let mut store = MapStore::default();
        store.create(BucketSpec::plain("staff")).unwrap();
        store.add("aaron", "staff").unwrap();
        let mut reconciler = GroupOrderReconciler::new();

        reconciler.reconcile(
            SortMode::Alphabetical,
            &roster(&["aaron", "bea", "cid"]),
            &NoRanks,
            &mut store,
        );

        assert_eq!(store.bucket_of("bea").as_deref(), Some("tl_00001"));
        assert_eq!(store.bucket_of("cid").as_deref(), Some("tl_00002"));
    }

    #[test]
    fn leftovers_are_removed_on_first_pass() {
        let mut store = MapStore::default();
        store.create(BucketSpec::plain("tl_00007")).unwrap();
        store.add("ghost", "tl_00007").unwrap();
        let mut reconciler = GroupOrderReconciler::new();

        let report = reconciler.reconcile(SortMode::None, &[], &NoRanks, &mut store);
        assert_eq!(report.deleted, 1);

        store.create(BucketSpec::plain("tl_00003")).unwrap();
        let report = reconciler.reconcile(SortMode::None, &[], &NoRanks, &mut store);
        assert!(report.is_noop(), "Only the first NONE pass cleans up");
        assert!(store.contains("tl_00003"));
    }

    #[test]
    fn forget_deletes_emptied_bucket() {
        let mut store = MapStore::default();
        let mut reconciler = GroupOrderReconciler::new();
        let participants = roster(&["alice", "Bob"]);
        reconciler.reconcile(SortMode::Alphabetical, &participants, &NoRanks, &mut store);

        reconciler.forget(&participants[0], &mut store);

        assert!(!store.contains("tl_00001"));
        assert!(store.contains("tl_00002"));
        assert_eq!(reconciler.assigned_bucket(participants[0].id), None);
    }

    #[test]
    fn reset_makes_the_next_pass_a_startup_pass() {
        let mut store = MapStore::default();
        let mut reconciler = GroupOrderReconciler::new();
        reconciler.reconcile(SortMode::None, &[], &NoRanks, &mut store);
        store.create(BucketSpec::plain("tl_00042")).unwrap();

        reconciler.reset();
        assert_eq!(reconciler.last_mode(), None);

        let report = reconciler.reconcile(SortMode::None, &[], &NoRanks, &mut store);
        assert_eq!(report.deleted, 1);
    }

    #[test]
    fn startup_pass_clears_leftovers_before_ordering() {
        let mut store = MapStore::default();
        store.create(BucketSpec::plain("tl_00001")).unwrap();
        store.add("ghost", "tl_00001").unwrap();
        let mut reconciler = GroupOrderReconciler::new();

        let report = reconciler.reconcile(
            SortMode::Alphabetical,
            &roster(&["alice"]),
            &NoRanks,
            &mut store,
        );

        assert_eq!(store.members_of("tl_00001"), vec!["alice".to_string()]);
        assert_eq!(store.bucket_of("ghost"), None);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.created, 1);
    }

    #[test]
    fn failed_placement_is_not_reported_as_assigned() {
        let mut store = MapStore {
            refused_members: vec!["Bob".to_string()],
            ..Default::default()
        };
        let mut reconciler = GroupOrderReconciler::new();
        let participants = roster(&["Bob", "alice"]);

        let report =
            reconciler.reconcile(SortMode::Alphabetical, &participants, &NoRanks, &mut store);

        assert_eq!(report.moved, 1);
        assert_eq!(store.bucket_of("Bob"), None);
        assert_eq!(reconciler.assigned_bucket(participants[0].id), None);
        assert_eq!(
            reconciler.assigned_bucket(participants[1].id).as_deref(),
            Some("tl_00001")
        );
    }
}
