use serde::Deserialize;

/// 24-bit RGB color, `0xRRGGBB`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex_str(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Color)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex_str(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// GPU-side material state the core cares about.
///
/// Highlighting only ever touches `emissive`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
}

impl Material {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn parses_and_prints_hex() {
        assert_eq!(Color::from_hex_str("#2a3556"), Some(Color(0x2a3556)));
        assert_eq!(Color::from_hex_str("ff0000"), Some(Color(0xff0000)));
        assert_eq!(Color::from_hex_str("#fff"), None);
        assert_eq!(Color(0x438cef).to_string(), "#438cef");
    }

    #[test]
    fn deserializes_from_string() {
        let c: Color = serde_json::from_str("\"#36b9bc\"").expect("color");
        assert_eq!(c, Color(0x36b9bc));
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }
}
