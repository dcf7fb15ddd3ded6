//! Node colors, sizes and icons
//!
//! The tables live in `palette.toml` next to this file and are embedded at
//! compile time. A user palette file with the same shape can replace them
//! through the `palette_file` config key.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

const BUILTIN_PALETTE: &str = include_str!("palette.toml");

/// A 24-bit color parsed from `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Neutral grey used whenever nothing more specific applies
    pub const NEUTRAL: Rgb = Rgb::new(0x6c, 0x75, 0x7d);
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{}' must start with '#'", s))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color '{}' must be #rrggbb", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("color '{}': {}", s, e))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSizes {
    pub back: f64,
    pub directory: f64,
    pub file: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseColors {
    pub back: Rgb,
    pub directory: Rgb,
    /// Used for files whose extension has no entry (or no extension at all)
    pub default: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icons {
    pub back: String,
    pub directory: String,
    pub file: String,
    #[serde(default)]
    pub extensions: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub sizes: NodeSizes,
    pub colors: BaseColors,
    #[serde(default)]
    pub extensions: HashMap<String, Rgb>,
    pub icons: Icons,
}

impl Default for Palette {
    /// Colorless fallback, only used if the embedded table fails to parse.
    fn default() -> Self {
        Self {
            sizes: NodeSizes {
                back: 15.0,
                directory: 20.0,
                file: 12.0,
            },
            colors: BaseColors {
                back: Rgb::NEUTRAL,
                directory: Rgb::NEUTRAL,
                default: Rgb::NEUTRAL,
            },
            extensions: HashMap::new(),
            icons: Icons {
                back: "<".to_string(),
                directory: "+".to_string(),
                file: "-".to_string(),
                extensions: HashMap::new(),
            },
        }
    }
}

impl Palette {
    /// The embedded palette, parsed once.
    pub fn builtin() -> &'static Palette {
        static PALETTE: OnceLock<Palette> = OnceLock::new();
        PALETTE.get_or_init(|| match Self::parse(BUILTIN_PALETTE) {
            Ok(palette) => palette,
            Err(err) => {
                tracing::error!(error = %err, "embedded palette is invalid; using plain colors");
                Palette::default()
            }
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut palette: Palette = toml::from_str(text).context("Failed to parse palette")?;
        // Lookups are case-insensitive on the extension
        palette.extensions = palette
            .extensions
            .into_iter()
            .map(|(ext, color)| (ext.to_lowercase(), color))
            .collect();
        palette.icons.extensions = palette
            .icons
            .extensions
            .into_iter()
            .map(|(ext, icon)| (ext.to_lowercase(), icon))
            .collect();
        Ok(palette)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read palette file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid palette file {}", path.display()))
    }

    /// Color for a file with the given (lowercase) extension.
    pub fn file_color(&self, extension: Option<&str>) -> Rgb {
        extension
            .and_then(|ext| self.extensions.get(ext))
            .copied()
            .unwrap_or(self.colors.default)
    }

    pub fn file_icon(&self, extension: Option<&str>) -> &str {
        extension
            .and_then(|ext| self.icons.extensions.get(ext))
            .map(String::as_str)
            .unwrap_or(&self.icons.file)
    }
}

/// Lowercased text after the last `.`, or `None` when the name has no dot.
///
/// `.gitignore` yields `gitignore`; `Makefile` yields `None`.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_palette_parses() {
        let palette = Palette::parse(BUILTIN_PALETTE).expect("embedded palette must parse");
        assert_eq!(palette.sizes.back, 15.0);
        assert_eq!(palette.sizes.directory, 20.0);
        assert_eq!(palette.sizes.file, 12.0);
        assert_eq!(palette.colors.directory.to_string(), "#ffd700");
        assert_eq!(palette.colors.back.to_string(), "#6c757d");
    }

    #[test]
    fn test_extension_colors_match_table() {
        let palette = Palette::builtin();
        assert_eq!(palette.file_color(Some("js")).to_string(), "#f7df1e");
        assert_eq!(palette.file_color(Some("tsx")).to_string(), "#3178c6");
        assert_eq!(palette.file_color(Some("json")).to_string(), "#000000");
        assert_eq!(palette.file_color(Some("yaml")).to_string(), "#cb171e");
    }

    #[test]
    fn test_unknown_or_missing_extension_uses_default() {
        let palette = Palette::builtin();
        assert_eq!(palette.file_color(Some("rs")), palette.colors.default);
        assert_eq!(palette.file_color(None), palette.colors.default);
        assert_eq!(palette.file_icon(None), palette.icons.file);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("App.JS").as_deref(), Some("js"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of(".gitignore").as_deref(), Some("gitignore"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_rgb_parse_rejects_garbage() {
        assert!("ffd700".parse::<Rgb>().is_err());
        assert!("#ffd70".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert_eq!("#FFD700".parse::<Rgb>(), Ok(Rgb::new(0xff, 0xd7, 0x00)));
    }

    #[test]
    fn test_palette_file_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.toml");
        let custom = BUILTIN_PALETTE.replace("#ffd700", "#00ff00");
        std::fs::write(&path, custom).unwrap();

        let palette = Palette::load_from(&path).unwrap();
        assert_eq!(palette.colors.directory, Rgb::new(0, 0xff, 0));
    }
}
