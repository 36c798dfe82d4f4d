//! Text measurement for the standard-14 Helvetica faces.
//!
//! The PDF report uses the built-in Helvetica and Helvetica-Bold fonts, so no
//! font file is embedded and every viewer already has the glyphs. Centring
//! and wrapping cell text needs advance widths; the tables below are the
//! Adobe AFM widths (1/1000 em) for the printable ASCII range.

/// One of the two faces the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    /// Resource name the face is registered under on every page.
    pub fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }

    /// PostScript name of the standard-14 font.
    pub fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
        }
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for Latin-1 characters outside the ASCII table.
const FALLBACK_WIDTH: u16 = 556;

fn glyph_width(face: Face, byte: u8) -> u16 {
    let table = match face {
        Face::Regular => &HELVETICA,
        Face::Bold => &HELVETICA_BOLD,
    };
    match byte {
        0x20..=0x7e => table[(byte - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Encode `text` for a WinAnsiEncoding simple font.
///
/// Latin-1 printable characters map to themselves, whitespace becomes a space,
/// and anything else the font cannot show becomes `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ if c.is_whitespace() => b' ',
            _ => b'?',
        })
        .collect()
}

/// Advance width of already-encoded text in points.
pub fn encoded_width(face: Face, size: f32, encoded: &[u8]) -> f32 {
    let units: u32 = encoded.iter().map(|&b| glyph_width(face, b) as u32).sum();
    units as f32 * size / 1000.0
}

/// Break `text` into lines no wider than `max_width` points.
///
/// Payloads are mostly unspaced paths and URLs, so lines break between any two
/// characters, preferring the position just after a `/`, `-` or space when
/// one falls in the line. Returns one empty line for empty text.
pub fn wrap(face: Face, size: f32, text: &str, max_width: f32) -> Vec<Vec<u8>> {
    let encoded = to_win_ansi(text);
    if encoded.is_empty() {
        return vec![Vec::new()];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    while start < encoded.len() {
        let mut end = start;
        let mut width = 0.0;
        let mut last_break = None;
        while end < encoded.len() {
            let w = glyph_width(face, encoded[end]) as f32 * size / 1000.0;
            if width + w > max_width && end > start {
                break;
            }
            width += w;
            if matches!(encoded[end], b'/' | b'-' | b' ') {
                last_break = Some(end + 1);
            }
            end += 1;
        }
        if end < encoded.len() {
            if let Some(brk) = last_break.filter(|&b| b > start && b < end) {
                end = brk;
            }
        }
        lines.push(encoded[start..end].to_vec());
        start = end;
    }
    lines
}

/// Shorten `line` so that `line + "..."` fits in `max_width`.
pub fn ellipsize(face: Face, size: f32, line: &[u8], max_width: f32) -> Vec<u8> {
    let mut out = line.to_vec();
    while !out.is_empty() && encoded_width(face, size, &out) + encoded_width(face, size, b"...") > max_width {
        out.pop();
    }
    out.extend_from_slice(b"...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_width(face: Face, size: f32, text: &str) -> f32 {
        encoded_width(face, size, &to_win_ansi(text))
    }

    #[test]
    fn known_widths() {
        assert_eq!(text_width(Face::Regular, 1000.0, "A"), 667.0);
        assert_eq!(text_width(Face::Bold, 1000.0, "A"), 722.0);
        assert_eq!(text_width(Face::Regular, 10.0, "iii"), 6.66);
        assert_eq!(text_width(Face::Regular, 10.0, ""), 0.0);
    }

    #[test]
    fn win_ansi_replaces_unmappable() {
        assert_eq!(to_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(to_win_ansi("café"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(to_win_ansi("a\tb"), b"a b".to_vec());
        assert_eq!(to_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn short_text_is_one_line() {
        let lines = wrap(Face::Regular, 10.0, "zoneA", 100.0);
        assert_eq!(lines, vec![b"zoneA".to_vec()]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap(Face::Regular, 10.0, "", 100.0), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn long_path_breaks_after_slash() {
        let text = "warehouse/zoneA/item42";
        let max = text_width(Face::Regular, 10.0, "warehouse/zoneA/") + 1.0;
        let lines = wrap(Face::Regular, 10.0, text, max);
        assert_eq!(lines, vec![b"warehouse/zoneA/".to_vec(), b"item42".to_vec()]);
    }

    #[test]
    fn every_line_fits() {
        let text = "https://example.com/a-very-long-identifier/0123456789abcdefghijklmnopqrstuvwxyz";
        for line in wrap(Face::Regular, 10.0, text, 60.0) {
            assert!(encoded_width(Face::Regular, 10.0, &line) <= 60.0);
            assert!(!line.is_empty());
        }
    }

    #[test]
    fn ellipsize_fits_width() {
        let out = ellipsize(Face::Regular, 10.0, b"abcdefghijklmnop", 40.0);
        assert!(out.ends_with(b"..."));
        assert!(encoded_width(Face::Regular, 10.0, &out) <= 40.0);
    }
}
