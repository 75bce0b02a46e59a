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

//! An in-memory bucket store with the host's semantics: unique names, one
//! bucket per member, and name-ordered listing.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tablist_core::{BucketError, BucketSpec, BucketStore};

#[derive(Debug, Clone)]
struct BucketEntry {
    spec: BucketSpec,
    members: BTreeSet<String>,
}

/// Buckets kept in memory, ordered by name.
#[derive(Debug, Default)]
pub struct InMemoryScoreboard {
    buckets: BTreeMap<String, BucketEntry>,
    membership: HashMap<String, String>,
}

impl InMemoryScoreboard {
    /// Creates an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// All bucket names, in list order.
    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }

    /// The spec a bucket was created with.
    pub fn spec(&self, name: &str) -> Option<&BucketSpec> {
        self.buckets.get(name).map(|entry| &entry.spec)
    }

    /// Members in list order: by bucket name, then by member name.
    pub fn list_order(&self) -> Vec<String> {
        self.buckets
            .values()
            .flat_map(|entry| entry.members.iter().cloned())
            .collect()
    }
}

impl BucketStore for InMemoryScoreboard {
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
        log::trace!("InMemoryScoreboard: Created {}", spec.name);
        self.buckets.insert(
            spec.name.clone(),
            BucketEntry {
                spec,
                members: BTreeSet::new(),
            },
        );
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), BucketError> {
        let entry = self
            .buckets
            .remove(name)
            .ok_or_else(|| BucketError::NotFound(name.to_string()))?;
        for member in &entry.members {
            self.membership.remove(member);
        }
        log::trace!("InMemoryScoreboard: Deleted {name}");
        Ok(())
    }

    fn add(&mut self, member: &str, bucket: &str) -> Result<(), BucketError> {
        if !self.buckets.contains_key(bucket) {
            return Err(BucketError::NotFound(bucket.to_string()));
        }
        if let Some(previous) = self.membership.insert(member.to_string(), bucket.to_string()) {
            if let Some(entry) = self.buckets.get_mut(&previous) {
                entry.members.remove(member);
            }
        }
        if let Some(entry) = self.buckets.get_mut(bucket) {
            entry.members.insert(member.to_string());
        }
        Ok(())
    }

    fn remove(&mut self, member: &str, bucket: &str) -> Result<(), BucketError> {
        let entry = self
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| BucketError::NotFound(bucket.to_string()))?;
        if !entry.members.remove(member) {
            return Err(BucketError::Rejected(format!(
                "'{member}' is not a member of {bucket}"
            )));
        }
        self.membership.remove(member);
        Ok(())
    }

    fn bucket_of(&self, member: &str) -> Option<String> {
        self.membership.get(member).cloned()
    }

    fn members_of(&self, bucket: &str) -> Vec<String> {
        self.buckets
            .get(bucket)
            .map(|entry| entry.members.iter().cloned().collect())
            .unwrap_or_default()
    }
}
