// Approximate text measurement.
//
// Advances are expressed in ems and roughly follow a sans-serif face such as
// DejaVu Sans. No font file is read, so the result is an estimate.

const ELLIPSIS: char = '…';

fn advance(c: char) -> f64 {
    match c {
        'i' | 'j' | 'l' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' | 'I' => 0.28,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' | '@' => 0.86,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.66,
        c if c.is_ascii() => 0.56,
        // Accented letters, CJK, emoji: err on the wide side.
        _ => 0.75,
    }
}

/// Estimated width of `text` at `font_size`, in the same unit as `font_size`.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().map(advance).sum::<f64>() * font_size
}

/// Returns `text` unchanged if it fits in `max_width`, otherwise the longest
/// prefix that fits once a trailing ellipsis is added.
pub fn fit_label(text: &str, max_width: f64, font_size: f64) -> String {
    if text_width(text, font_size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - advance(ELLIPSIS) * font_size;
    let mut used = 0.0;
    let mut res = String::new();
    for c in text.chars() {
        let w = advance(c) * font_size;
        if used + w > budget {
            break;
        }
        used += w;
        res.push(c);
    }
    // No dangling space before the ellipsis.
    let mut res = res.trim_end().to_string();
    res.push(ELLIPSIS);
    res
}
