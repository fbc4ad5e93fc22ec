use super::selection::AddressSelection;

/// Map Devanagari digits (U+0966..=U+096F) to ASCII digits; every other
/// character passes through unchanged. Display only.
pub fn to_latin_digits(input: &str) -> String {
    input.chars().map(latin_digit).collect()
}

fn latin_digit(c: char) -> char {
    match c {
        '\u{0966}'..='\u{096F}' => {
            let offset = c as u32 - 0x0966;
            char::from_digit(offset, 10).unwrap_or(c)
        }
        _ => c,
    }
}

/// Ward label as shown to the user; the stored value is left as is
pub fn display_ward(selection: &AddressSelection) -> String {
    to_latin_digits(&selection.ward)
}
