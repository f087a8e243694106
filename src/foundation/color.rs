/// Parse a hex color string into straight RGBA bytes.
///
/// Accepts `RRGGBB` or `RRGGBBAA`, with or without a leading `#`. The
/// six-digit form gets an opaque alpha. Anything else is `None`.
pub fn parse_hex_rgba(s: &str) -> Option<[u8; 4]> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 && s.len() != 8 {
        return None;
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let byte_at = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
    let r = byte_at(0)?;
    let g = byte_at(2)?;
    let b = byte_at(4)?;
    let a = if s.len() == 8 { byte_at(6)? } else { 255 };
    Some([r, g, b, a])
}
