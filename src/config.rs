use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embed: EmbedConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Which external tag writer the rendered arguments are meant for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `-Group:Tag=value` flags for exiftool.
    #[default]
    ExifTool,
    /// `set`/`add` modify commands for exiv2.
    Exiv2,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::ExifTool => "exiftool",
            Dialect::Exiv2 => "exiv2",
        }
    }
}

/// Tag selection and face policies. Passed explicitly to every component
/// so different runs can use different policies side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Some EXIF tags may only contain ASCII.
    #[serde(default)]
    pub write_exif: bool,

    /// Some IPTC tags may only contain ASCII.
    #[serde(default)]
    pub write_iptc: bool,

    /// Face regions are only written as XMP.
    #[serde(default = "default_true")]
    pub write_xmp: bool,

    /// MWG regions, read by Picasa and DigiKam.
    #[serde(default = "default_true")]
    pub write_xmp_mwg: bool,

    /// Windows Photo Gallery regions.
    #[serde(default = "default_true")]
    pub write_xmp_wpg: bool,

    /// Some upload services reject images with duplicate faces.
    #[serde(default)]
    pub write_duplicate_faces: bool,

    /// Unknown faces are usually duplicates of named ones.
    #[serde(default)]
    pub write_unknown_faces: bool,

    #[serde(default = "default_unknown_face_name")]
    pub unknown_face_name: String,

    /// For viewers that only display captions.
    #[serde(default)]
    pub append_keywords_to_caption: bool,

    #[serde(default)]
    pub dialect: Dialect,
}

fn default_true() -> bool {
    true
}

fn default_unknown_face_name() -> String {
    "Unknown".to_string()
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            write_exif: false,
            write_iptc: false,
            write_xmp: true,
            write_xmp_mwg: true,
            write_xmp_wpg: true,
            write_duplicate_faces: false,
            write_unknown_faces: false,
            unknown_face_name: default_unknown_face_name(),
            append_keywords_to_caption: false,
            dialect: Dialect::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    #[serde(default = "default_index_filename")]
    pub index_filename: String,

    /// Process directories on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_image_extensions() -> Vec<String> {
    vec!["jpeg".to_string(), "jpg".to_string(), "png".to_string()]
}

fn default_index_filename() -> String {
    ".picasa.ini".to_string()
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
            index_filename: default_index_filename(),
            parallel: false,
        }
    }
}

impl ScannerConfig {
    /// Case-insensitive match against the extension allow-list.
    pub fn is_image_name(&self, name: &str) -> bool {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.image_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

/// External binaries; may be absolute paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_exiftool")]
    pub exiftool: String,

    #[serde(default = "default_exiv2")]
    pub exiv2: String,

    /// ImageMagick `convert`.
    #[serde(default = "default_convert")]
    pub convert: String,
}

fn default_exiftool() -> String {
    "exiftool".to_string()
}

fn default_exiv2() -> String {
    "exiv2".to_string()
}

fn default_convert() -> String {
    "convert".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            exiftool: default_exiftool(),
            exiv2: default_exiv2(),
            convert: default_convert(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Target extension for conversion. Unset copies files unchanged.
    #[serde(default)]
    pub format: Option<String>,

    /// JPEG quality or PNG compression level passed to the converter.
    #[serde(default = "default_quality")]
    pub quality: String,
}

fn default_quality() -> String {
    "9".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            quality: default_quality(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no
    /// file exists yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", config_path);
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("picasa-embed")
    }

    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PICASA_EMBED_CONFIG") {
            return PathBuf::from(path);
        }

        Self::config_dir().join("config.toml")
    }
}
