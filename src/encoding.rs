//! Unicode to WinAnsi conversion for PDF text showing
//!
//! The built-in Type1 fonts are declared with WinAnsiEncoding, a superset of
//! Latin-1 that covers the accented characters certificate data carries.
//! Characters without a WinAnsi slot render as `?`.

/// Convert a string to WinAnsiEncoding bytes
pub fn unicode_to_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

fn winansi_byte(ch: char) -> u8 {
    match ch {
        // ASCII and the Latin-1 range map byte-for-byte
        ch if (ch as u32) < 0x80 => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        // Windows-1252 specials in 0x80-0x9F
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(unicode_to_winansi("Ana Ruiz"), b"Ana Ruiz".to_vec());
    }

    #[test]
    fn latin1_maps_byte_for_byte() {
        assert_eq!(unicode_to_winansi("José Ñandú"), vec![
            b'J', b'o', b's', 0xE9, b' ', 0xD1, b'a', b'n', b'd', 0xFA,
        ]);
    }

    #[test]
    fn unmapped_characters_become_question_marks() {
        assert_eq!(unicode_to_winansi("漢"), vec![b'?']);
        assert_eq!(unicode_to_winansi("€"), vec![0x80]);
    }
}
