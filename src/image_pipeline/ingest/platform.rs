//! Host detection and converter selection

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::image_pipeline::ingest::converter::{ExternalTool, RawConverter};
use crate::image_pipeline::ingest::dcraw::DcrawConverter;
use crate::image_pipeline::ingest::sips::SipsConverter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            other => Platform::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => f.write_str("macos"),
            Platform::Windows => f.write_str("windows"),
            Platform::Other(os) => f.write_str(os),
        }
    }
}

/// Which RAW conversion strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConverterChoice {
    /// sips on macOS, dcraw on Windows, none elsewhere
    #[default]
    Auto,
    Sips,
    Dcraw,
}

#[derive(Debug, Clone)]
pub struct ConverterSettings {
    pub choice: ConverterChoice,
    pub sips_tool: ExternalTool,
    pub dcraw_tool: ExternalTool,
    /// Directory for conversion artifacts; `None` means the OS temp directory
    pub temp_dir: Option<PathBuf>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            choice: ConverterChoice::Auto,
            sips_tool: ExternalTool::new("sips"),
            dcraw_tool: ExternalTool::new("dcraw"),
            temp_dir: None,
        }
    }
}

impl ConverterSettings {
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Picks the converter for `platform`, or `None` when no strategy applies.
pub fn select_converter(
    settings: &ConverterSettings,
    platform: &Platform,
) -> Option<Box<dyn RawConverter>> {
    let choice = match (settings.choice, platform) {
        (ConverterChoice::Auto, Platform::MacOs) => ConverterChoice::Sips,
        (ConverterChoice::Auto, Platform::Windows) => ConverterChoice::Dcraw,
        (ConverterChoice::Auto, Platform::Other(_)) => {
            debug!("No RAW converter for platform {}", platform);
            return None;
        }
        (forced, _) => forced,
    };

    let converter: Box<dyn RawConverter> = match choice {
        ConverterChoice::Sips => Box::new(SipsConverter::new(
            settings.sips_tool.clone(),
            settings.temp_dir(),
            platform.clone(),
        )),
        _ => Box::new(DcrawConverter::new(
            settings.dcraw_tool.clone(),
            settings.temp_dir(),
            platform.clone(),
        )),
    };
    debug!("Selected {} for platform {}", converter.name(), platform);
    Some(converter)
}
