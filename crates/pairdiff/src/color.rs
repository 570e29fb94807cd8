//! Color parsing for the diff palette

use ratatui::style::Color;

/// Hues that come in a normal and a `light` variant
const HUES: [(&str, Color, Color); 6] = [
    ("red", Color::Red, Color::LightRed),
    ("green", Color::Green, Color::LightGreen),
    ("yellow", Color::Yellow, Color::LightYellow),
    ("blue", Color::Blue, Color::LightBlue),
    ("magenta", Color::Magenta, Color::LightMagenta),
    ("cyan", Color::Cyan, Color::LightCyan),
];

/// `#rrggbb`, with the `#` optional
pub fn parse_hex(value: &str) -> Option<Color> {
    let value = value.trim();
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

/// Terminal color name. Case, spaces, dashes and underscores are ignored.
pub fn parse_ansi_name(name: &str) -> Option<Color> {
    let key: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .replace("grey", "gray");

    let fixed = match key.as_str() {
        "default" | "reset" | "transparent" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "gray" => Some(Color::Gray),
        "darkgray" => Some(Color::DarkGray),
        _ => None,
    };
    if fixed.is_some() {
        return fixed;
    }

    let (light, hue) = match key.strip_prefix("light") {
        Some(rest) => (true, rest),
        None => (false, key.as_str()),
    };
    HUES.iter()
        .find(|(name, ..)| *name == hue)
        .map(|&(_, normal, bright)| if light { bright } else { normal })
}

/// Resolve a color string: hex or terminal color name
pub fn resolve_color(value: &str) -> Option<Color> {
    parse_hex(value).or_else(|| parse_ansi_name(value.trim()))
}

/// Resolve color, logging and falling back when the value is not a color
pub fn resolve_color_or(value: &str, fallback: Color) -> Color {
    resolve_color(value).unwrap_or_else(|| {
        tracing::warn!(value, "unrecognised color in config, using default");
        fallback
    })
}
