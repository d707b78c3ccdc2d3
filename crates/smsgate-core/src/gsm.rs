//! GSM 03.38 text measurement.
//!
//! A single SMS carries 1120 bits of user data. Depending on the data coding
//! scheme that is 160 septets (GSM 7-bit), 140 octets (binary) or 70 UCS-2
//! characters. Only the 7-bit alphabet is supported here.
//!
//! Characters from the extension table are sent as ESC + character, so they
//! occupy two septets instead of one.

/// Characters that require the escape septet.
pub const EXTENDED_CHARS: &[char] = &['\n', '\\', '^', '~', '[', ']', '{', '}', '|', '€'];

/// Septets needed for a single character: 2 for the extension table, else 1.
pub fn char_weight(c: char) -> usize {
    if EXTENDED_CHARS.contains(&c) {
        2
    } else {
        1
    }
}

/// Encoding-weighted length of `text` in septets.
pub fn weighted_length(text: &str) -> usize {
    text.chars().map(char_weight).sum()
}
