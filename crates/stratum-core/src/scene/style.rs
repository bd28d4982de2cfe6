use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Inline style applied to the viewer's root container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStyle {
    pub position: String,
    pub width: String,
    pub height: String,
    pub min_height: String,
    pub min_width: String,
    pub margin: String,
    pub padding: String,
    pub top: String,
    pub left: String,
    pub overflow: String,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            position: "relative".into(),
            width: "100%".into(),
            height: "100%".into(),
            min_height: "200px".into(),
            min_width: "450px".into(),
            margin: "0".into(),
            padding: "0".into(),
            top: "0".into(),
            left: "0".into(),
            overflow: "hidden".into(),
        }
    }
}

impl ContainerStyle {
    /// CSS property/value pairs in declaration order.
    pub fn declarations(&self) -> [(&'static str, &str); 10] {
        [
            ("position", self.position.as_str()),
            ("width", self.width.as_str()),
            ("height", self.height.as_str()),
            ("min-height", self.min_height.as_str()),
            ("min-width", self.min_width.as_str()),
            ("margin", self.margin.as_str()),
            ("padding", self.padding.as_str()),
            ("top", self.top.as_str()),
            ("left", self.left.as_str()),
            ("overflow", self.overflow.as_str()),
        ]
    }
}

/// Background and container appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStyle {
    /// Normalized RGB.
    pub background_color: [f32; 3],
    pub container_style: ContainerStyle,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0],
            container_style: ContainerStyle::default(),
        }
    }
}

impl SceneStyle {
    /// Light-on-dark widgets are used when this is true.
    pub fn is_background_dark(&self) -> bool {
        self.background_color.iter().sum::<f32>() < 1.5
    }
}

/// Parse `rrggbb` (optionally prefixed with `#`) into normalized RGB.
pub fn parse_hex_color(input: &str) -> Result<[f32; 3]> {
    let invalid = || CoreError::InvalidHexColor {
        input: input.to_owned(),
    };
    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let mut rgb = [0.0_f32; 3];
    for (channel, value) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&hex[channel * 2..channel * 2 + 2], 16).map_err(|_| invalid())?;
        *value = f32::from(byte) / 255.0;
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_background_is_dark() {
        assert!(SceneStyle::default().is_background_dark());
    }

    #[test]
    fn white_background_is_not_dark() {
        let style = SceneStyle {
            background_color: [1.0, 1.0, 1.0],
            ..SceneStyle::default()
        };
        assert!(!style.is_background_dark());
    }

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        assert_eq!(parse_hex_color("ffffff").unwrap(), [1.0, 1.0, 1.0]);
        let rgb = parse_hex_color("#ff0080").unwrap();
        assert_eq!(rgb[0], 1.0);
        assert_eq!(rgb[1], 0.0);
        assert!((rgb[2] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(parse_hex_color("fff").is_err());
        assert!(parse_hex_color("gg0000").is_err());
        assert!(parse_hex_color("ééé").is_err());
    }

    #[test]
    fn declarations_use_css_property_names() {
        let style = ContainerStyle::default();
        let declarations = style.declarations();
        assert!(declarations.contains(&("min-width", "450px")));
        assert!(declarations.contains(&("overflow", "hidden")));
    }
}
