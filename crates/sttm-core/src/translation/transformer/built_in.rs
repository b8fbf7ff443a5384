//! Built-in transform masks
//!
//! Each mask is a pure `&str -> String` function. All built-ins are
//! idempotent: applying a mask to its own output returns the same string.
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

pub const CLEAN_STRING: &str = "CLEAN_STRING";
pub const CAPITAL_LETTER: &str = "CAPITAL_LETTER";
pub const UPPER_CASE: &str = "UPPER_CASE";
pub const TRIM: &str = "TRIM";

/// Trim surrounding whitespace and lowercase
pub fn clean_string(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Trim, lowercase, then capitalise the first letter of every word
pub fn capital_letter(input: &str) -> String {
    title_case(&clean_string(input))
}

/// Trim and uppercase
pub fn upper_case(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Trim surrounding whitespace only
pub fn trim(input: &str) -> String {
    input.trim().to_string()
}

/// Title-case the first letter of every run of letters and lowercase the rest.
///
/// A "word" starts after any non-alphabetic character, so `o'neil` becomes
/// `O'Neil` and `semi-urban` becomes `Semi-Urban`. Combining marks continue
/// the current word.
pub fn title_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_word = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if in_word {
                output.extend(ch.to_lowercase());
            } else {
                push_titlecase(ch, &mut output);
            }
            in_word = true;
        } else {
            output.push(ch);
            if !is_combining_mark(ch) {
                in_word = false;
            }
        }
    }

    output
}

/// Append the titlecase form of `ch`.
///
/// Only the first character of a multi-character uppercase expansion stays
/// uppercase: `ß` becomes `Ss` and `ﬁ` becomes `Fi`.
fn push_titlecase(ch: char, output: &mut String) {
    let titled = match ch {
        'Ǆ' | 'ǅ' | 'ǆ' => 'ǅ',
        'Ǉ' | 'ǈ' | 'ǉ' => 'ǈ',
        'Ǌ' | 'ǋ' | 'ǌ' => 'ǋ',
        'Ǳ' | 'ǲ' | 'ǳ' => 'ǲ',
        // Georgian Mkhedruli has no titlecase form
        '\u{10D0}'..='\u{10FA}' | '\u{10FD}'..='\u{10FF}' => ch,
        _ => {
            let mut upper = ch.to_uppercase();
            if let Some(first) = upper.next() {
                output.push(first);
            }
            for rest in upper {
                output.extend(rest.to_lowercase());
            }
            return;
        }
    };
    output.push(titled);
}

/// Combining diacritical marks, which uppercase expansions may emit
fn is_combining_mark(ch: char) -> bool {
    matches!(
        ch,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}
