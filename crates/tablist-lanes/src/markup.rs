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

//! Color markup conversion.
//!
//! Templates are written with `&` as the marker: `&c` for a single color or
//! format code, `&#RRGGBB` for a hex color. The client renders `§` escapes, with
//! hex colors spelled out as `§x` followed by one `§` + digit pair per digit.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// The escape character understood by the client.
pub const SECTION_SIGN: char = '\u{00A7}';

fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"&#([0-9a-fA-F]{6})").expect("valid regex"))
}

fn color_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"&([0-9a-fA-Fk-oK-OrR])").expect("valid regex"))
}

fn escape_sequence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("\u{00A7}[0-9a-fA-Fk-oK-OrRxX]").expect("valid regex"))
}

/// Converts `&` markup into `§` escape sequences.
///
/// Hex colors are expanded first. Doing it the other way round would let the
/// single-code pass eat the digits of a hex color before it is recognized.
/// Unrecognized marker sequences are left as they are.
pub fn convert_color_codes(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let expanded = hex_color_pattern().replace_all(text, |caps: &Captures<'_>| {
        let mut sequence = String::with_capacity(14 * SECTION_SIGN.len_utf8());
        sequence.push(SECTION_SIGN);
        sequence.push('x');
        for digit in caps[1].chars() {
            sequence.push(SECTION_SIGN);
            sequence.push(digit);
        }
        sequence
    });

    color_code_pattern()
        .replace_all(&expanded, "\u{00A7}${1}")
        .into_owned()
}

/// Removes every `§` escape sequence, hex expansions included.
pub fn strip_color_codes(text: &str) -> String {
    escape_sequence_pattern().replace_all(text, "").into_owned()
}
