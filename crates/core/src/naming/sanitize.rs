//! File name sanitization.

const MAX_FILENAME_BYTES: usize = 255;

const ILLEGAL_CHARS: [char; 9] = ['/', '?', '<', '>', '\\', ':', '*', '|', '"'];

const WINDOWS_RESERVED: [&str; 22] = [
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Strips characters that are illegal in file names on common platforms.
///
/// The input is a bare stem; extensions are appended by the caller afterwards,
/// so trailing dots are removed here without touching any later suffix.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();

    if cleaned == "." || cleaned == ".." {
        return String::new();
    }

    let stem = cleaned.split('.').next().unwrap_or_default();
    if WINDOWS_RESERVED.contains(&stem.to_ascii_lowercase().as_str()) {
        return String::new();
    }

    let trimmed = cleaned.trim_end_matches(['.', ' ']);
    truncate_utf8(trimmed, MAX_FILENAME_BYTES).to_string()
}

fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
