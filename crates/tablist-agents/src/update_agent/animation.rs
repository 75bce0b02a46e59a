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

/// Frame positions within the header and footer animations.
///
/// Both indices share one cycle counter. A frame list with a single entry
/// never advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationCursor {
    header_index: usize,
    footer_index: usize,
    counter: u32,
}

impl AnimationCursor {
    /// A cursor on the first frame of both lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the header frame to show.
    pub fn header_index(&self) -> usize {
        self.header_index
    }

    /// Index of the footer frame to show.
    pub fn footer_index(&self) -> usize {
        self.footer_index
    }

    /// Counts one update cycle and moves to the next frames every
    /// `interval` cycles.
    pub fn advance(&mut self, header_frames: usize, footer_frames: usize, interval: u32) {
        self.counter += 1;
        if self.counter < interval.max(1) {
            return;
        }
        self.counter = 0;
        if header_frames > 1 {
            self.header_index = (self.header_index + 1) % header_frames;
        }
        if footer_frames > 1 {
            self.footer_index = (self.footer_index + 1) % footer_frames;
        }
    }

    /// Back to the first frames.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
