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

//! The host's named, ordered grouping primitive ("teams").
//!
//! The list shows participants grouped by bucket, with buckets ordered by name.
//! The engine implements sorting by placing each participant in its own
//! sequentially named bucket. Buckets are shared with the rest of the host, so
//! the engine only ever touches the ones carrying its private name prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who can see the name tags of a bucket's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NameTagVisibility {
    /// Everyone sees the name tag.
    #[default]
    Always,
    /// Nobody sees the name tag.
    Never,
    /// Only members of the same bucket see it.
    HideForOtherTeams,
    /// Everyone except members of the same bucket sees it.
    HideForOwnTeam,
}

/// Everything needed to create a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    /// Unique bucket name. Also the sort key.
    pub name: String,
    /// Name tag policy.
    pub visibility: NameTagVisibility,
    /// Text rendered before each member's name.
    pub prefix: String,
    /// Text rendered after each member's name.
    pub suffix: String,
}

impl BucketSpec {
    /// A bucket with always-visible name tags and no affixes.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: NameTagVisibility::Always,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

/// An error reported by a [`BucketStore`] mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    /// No bucket with this name exists.
    NotFound(String),
    /// A bucket with this name already exists.
    AlreadyExists(String),
    /// The host refused the operation.
    Rejected(String),
}

impl fmt::Display for BucketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketError::NotFound(name) => write!(f, "Bucket not found: {name}"),
            BucketError::AlreadyExists(name) => write!(f, "Bucket already exists: {name}"),
            BucketError::Rejected(reason) => write!(f, "Bucket operation rejected: {reason}"),
        }
    }
}

impl std::error::Error for BucketError {}

/// The host's bucket storage.
///
/// Members are identified by participant name, the way the host's own
/// grouping is keyed. A member belongs to at most one bucket at a time.
pub trait BucketStore {
    /// Names of all buckets whose name starts with `prefix`.
    fn buckets_with_prefix(&self, prefix: &str) -> Vec<String>;

    /// Whether a bucket with this exact name exists.
    fn contains(&self, name: &str) -> bool;

    /// Creates a new, empty bucket.
    fn create(&mut self, spec: BucketSpec) -> Result<(), BucketError>;

    /// Deletes a bucket and releases all of its members.
    fn delete(&mut self, name: &str) -> Result<(), BucketError>;

    /// Adds `member` to `bucket`, moving it out of any previous bucket.
    fn add(&mut self, member: &str, bucket: &str) -> Result<(), BucketError>;

    /// Removes `member` from `bucket`.
    fn remove(&mut self, member: &str, bucket: &str) -> Result<(), BucketError>;

    /// The bucket `member` currently belongs to.
    fn bucket_of(&self, member: &str) -> Option<String>;

    /// The members of `bucket`; empty if the bucket does not exist.
    fn members_of(&self, bucket: &str) -> Vec<String>;
}
