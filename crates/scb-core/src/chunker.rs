//! Splitting long texts into transport-safe segments.

/// Split `text` into segments of at most `max_len` bytes, preferring sentence
/// boundaries, then word boundaries, then a hard cut.
///
/// A sentence break found before `max_len / 2` is rejected in favor of a word
/// break so segments do not become needlessly short.
pub fn split(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut remaining = text.trim();

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            segments.push(remaining.to_string());
            break;
        }

        let window_end = floor_char_boundary(remaining, max_len);
        let window = &remaining[..window_end];

        // Cut index is exclusive and keeps the terminator inside the segment;
        // the trailing space is trimmed off afterwards.
        let cut = match window.rfind(". ") {
            Some(i) if i >= max_len / 2 => i + 1,
            _ => match window.rfind(' ') {
                Some(i) => i + 1,
                None => window_end,
            },
        };
        // A single char wider than the limit is emitted whole rather than
        // looping forever.
        let cut = if cut == 0 {
            next_char_len(remaining)
        } else {
            cut
        };

        segments.push(remaining[..cut].trim().to_string());
        remaining = remaining[cut..].trim_start();
    }

    segments
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_char_len(s: &str) -> usize {
    s.chars().next().map(|c| c.len_utf8()).unwrap_or(0)
}
