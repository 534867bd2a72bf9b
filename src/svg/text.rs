//! Number formatting and text metrics.

/// Geometry number: rounded to two decimals, trailing zeros dropped.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    fmt_value(rounded)
}

/// Data value as written by the author: shortest exact form, no `-0`.
pub fn fmt_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Estimated advance width of `text` in a proportional sans-serif face.
///
/// There is no font rasteriser here; glyphs are bucketed by rough width
/// class, which keeps node boxes and label plates close to what a browser
/// measures.
pub fn measure_text(text: &str, font_size: f64) -> f64 {
    let em: f64 = text.chars().map(glyph_width).sum();
    em * font_size
}

fn glyph_width(c: char) -> f64 {
    match c {
        'i' | 'j' | 'l' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' => 0.28,
        ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.34,
        'm' | 'w' => 0.86,
        'M' | 'W' => 0.92,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.56,
        c if c.is_ascii() => 0.52,
        // CJK and other wide scripts.
        c if c.len_utf8() >= 3 => 1.0,
        _ => 0.6,
    }
}
