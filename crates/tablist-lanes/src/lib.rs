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

//! # TabList Lanes
//!
//! Stateless processing strategies used by the update cycle:
//!
//! - [`markup`]: `&`-style color markup to `§` escape sequences.
//! - [`template`]: placeholder substitution for headers, footers and display names.
//! - [`ordering`]: the participant order behind each [`SortMode`](tablist_core::SortMode).

#![warn(missing_docs)]

pub mod markup;
pub mod ordering;
pub mod template;

pub use markup::{convert_color_codes, strip_color_codes, SECTION_SIGN};
pub use ordering::sort_participants;
pub use template::{resolve, resolve_display_name, ResolveContext, TickRateTier};
