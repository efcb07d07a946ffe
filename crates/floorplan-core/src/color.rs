//! Color token parsing.
//!
//! Elements store their fill color as the token the toolbar handed over
//! (`"#2f2f2f"`, `"red"`, ...). Renderers resolve it here.

use peniko::Color;

/// Parse a color token into a [`Color`].
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and a handful of CSS names.
/// Returns `None` for anything else so callers can pick their own fallback.
pub fn parse_color(token: &str) -> Option<Color> {
    let token = token.trim();
    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex);
    }
    let rgba = match token.to_ascii_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        "brown" => (165, 42, 42, 255),
        _ => return None,
    };
    Some(Color::from_rgba8(rgba.0, rgba.1, rgba.2, rgba.3))
}

/// Parse a color token, falling back to `fallback` when it is not understood.
pub fn parse_color_or(token: &str, fallback: Color) -> Color {
    parse_color(token).unwrap_or_else(|| {
        log::debug!("Unrecognized color token {:?}, using fallback", token);
        fallback
    })
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            // #rgb -> #rrggbb
            let r = byte(&hex[0..1])? * 17;
            let g = byte(&hex[1..2])? * 17;
            let b = byte(&hex[2..3])? * 17;
            Some(Color::from_rgba8(r, g, b, 255))
        }
        6 => Some(Color::from_rgba8(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            255,
        )),
        8 => Some(Color::from_rgba8(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(color: Color) -> (u8, u8, u8, u8) {
        let c = color.to_rgba8();
        (c.r, c.g, c.b, c.a)
    }

    #[test]
    fn test_parse_short_hex() {
        let color = parse_color("#000").unwrap();
        assert_eq!(rgba(color), (0, 0, 0, 255));
        let color = parse_color("#fff").unwrap();
        assert_eq!(rgba(color), (255, 255, 255, 255));
    }

    #[test]
    fn test_parse_long_hex() {
        let color = parse_color("#2f2f2f").unwrap();
        assert_eq!(rgba(color), (0x2f, 0x2f, 0x2f, 255));
        let color = parse_color("#ff000080").unwrap();
        assert_eq!(rgba(color), (255, 0, 0, 0x80));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(rgba(parse_color("Red").unwrap()), (255, 0, 0, 255));
        assert_eq!(rgba(parse_color("transparent").unwrap()).3, 0);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_color("#12").is_none());
        assert!(parse_color("#gggggg").is_none());
        assert!(parse_color("#ééé").is_none());
        assert!(parse_color("chartreuse-ish").is_none());

        let fallback = Color::from_rgba8(1, 2, 3, 255);
        assert_eq!(rgba(parse_color_or("nope", fallback)), (1, 2, 3, 255));
    }
}
