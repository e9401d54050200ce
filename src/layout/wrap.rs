/// Overflow handling for words wider than the wrap width.
///
/// The primary contract is word-level wrapping: an over-wide word is placed
/// alone on its line and may visibly overflow. Character-level breaking is
/// an opt-in strategy for callers that must contain long unbroken tokens
/// (URLs and the like); it is never invoked implicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Keep,
    BreakChars,
}

/// Greedy word wrap.
///
/// Splits `text` on whitespace, accumulates words joined by single spaces,
/// and flushes the current line once the next candidate would exceed
/// `max_width` (only when the line already holds at least one word). Each
/// flushed line is passed to `draw` at `(x, current_y)` and the cursor
/// advances by `line_height`. Returns the y immediately below the last
/// drawn line so callers can stack further content beneath it.
pub fn wrap_text(
    text: &str,
    x: f64,
    y: f64,
    max_width: f64,
    line_height: f64,
    measure: &mut dyn FnMut(&str) -> f64,
    draw: &mut dyn FnMut(&str, f64, f64),
) -> f64 {
    wrap_text_with(text, x, y, max_width, line_height, Overflow::Keep, measure, draw)
}

/// Greedy word wrap with an explicit overflow strategy.
#[allow(clippy::too_many_arguments)]
pub fn wrap_text_with(
    text: &str,
    x: f64,
    y: f64,
    max_width: f64,
    line_height: f64,
    overflow: Overflow,
    measure: &mut dyn FnMut(&str) -> f64,
    draw: &mut dyn FnMut(&str, f64, f64),
) -> f64 {
    let mut current_y = y;
    let mut line = String::new();

    let mut flush = |line: &mut String, current_y: &mut f64, draw: &mut dyn FnMut(&str, f64, f64)| {
        if !line.is_empty() {
            draw(line.as_str(), x, *current_y);
            *current_y += line_height;
            line.clear();
        }
    };

    for word in text.split_whitespace() {
        let pieces: Vec<String> = match overflow {
            Overflow::Keep => vec![word.to_string()],
            Overflow::BreakChars => break_word(word, max_width, measure),
        };

        for piece in pieces {
            let candidate = if line.is_empty() {
                piece.clone()
            } else {
                format!("{line} {piece}")
            };

            if measure(&candidate) > max_width && !line.is_empty() {
                flush(&mut line, &mut current_y, draw);
                line = piece;
            } else {
                line = candidate;
            }
        }
    }

    flush(&mut line, &mut current_y, draw);
    current_y
}

/// Break a single word into chunks that each fit `max_width`.
///
/// Splits on character boundaries; a chunk always holds at least one
/// character, so a glyph wider than `max_width` still emits. Returns the
/// word unchanged when it already fits.
pub fn break_word(word: &str, max_width: f64, measure: &mut dyn FnMut(&str) -> f64) -> Vec<String> {
    if measure(word) <= max_width {
        return vec![word.to_string()];
    }

    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for ch in word.chars() {
        let mut candidate = chunk.clone();
        candidate.push(ch);
        if measure(&candidate) > max_width && !chunk.is_empty() {
            chunks.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        } else {
            chunk = candidate;
        }
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
