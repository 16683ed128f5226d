// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Naming convention transforms between column and attribute names.

/// Convert a snake_case name to CamelCase.
///
/// Each `_`-separated part is upper-cased on its first character and
/// lower-cased on the rest, so `user_ID` becomes `UserId`. Empty parts
/// (leading, trailing or doubled underscores) are dropped.
pub fn to_camel_case(name: &str) -> String {
    name.split('_').map(to_proper_case).collect()
}

/// Convert a snake_case name to lowerCamelCase, the attribute lookup key.
pub fn to_lower_camel_case(name: &str) -> String {
    let camel = to_camel_case(name);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_proper_case(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
