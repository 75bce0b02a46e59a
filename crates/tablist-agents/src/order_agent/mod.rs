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

//! Acts as the **[A]gent** for list ordering.
//!
//! The host only orders its list by bucket name, so the reconciler keeps one
//! engine-owned bucket per participant, named with a private prefix and a
//! zero-padded position. Each cycle it moves only the participants whose
//! position changed and deletes the buckets nobody needs any more.
//!
//! Buckets without the private prefix belong to someone else. They are never
//! created, deleted or edited here, and a participant found in one is left
//! exactly where it is.

mod reconciler;

pub use reconciler::*;
pub(crate) use reconciler::AssignmentMap;
