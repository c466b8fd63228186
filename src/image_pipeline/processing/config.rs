//! Processor configuration types

use std::path::PathBuf;

use crate::image_pipeline::ingest::{ConverterChoice, ConverterSettings, ExternalTool};
use crate::image_pipeline::lut::DEFAULT_CUBE_TOLERANCE;
use crate::image_pipeline::preview::{OUTPUT_QUALITY, PREVIEW_QUALITY};

pub const DEFAULT_PREVIEW_WIDTH: u32 = 800;

/// Configuration for `LutProcessor`
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Larger-dimension cap for previews
    pub preview_width: u32,
    /// JPEG quality for previews
    pub preview_quality: u8,
    /// JPEG quality for the saved output
    pub output_quality: u8,
    /// Allowed difference between `level³` and the LUT pixel count
    pub cube_tolerance: usize,
    /// Optional cap on the saved output, applied after the LUT
    pub max_output_dimension: Option<u32>,
    /// RAW fallback strategy and tools
    pub converter: ConverterSettings,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            preview_width: DEFAULT_PREVIEW_WIDTH,
            preview_quality: PREVIEW_QUALITY,
            output_quality: OUTPUT_QUALITY,
            cube_tolerance: DEFAULT_CUBE_TOLERANCE,
            max_output_dimension: None,
            converter: ConverterSettings::default(),
        }
    }
}

impl ProcessorConfig {
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::default()
    }
}

/// Builder for ProcessorConfig
#[derive(Default)]
pub struct ProcessorConfigBuilder {
    preview_width: Option<u32>,
    preview_quality: Option<u8>,
    output_quality: Option<u8>,
    cube_tolerance: Option<usize>,
    max_output_dimension: Option<Option<u32>>,
    converter: Option<ConverterChoice>,
    sips_tool: Option<ExternalTool>,
    dcraw_tool: Option<ExternalTool>,
    temp_dir: Option<Option<PathBuf>>,
}

impl ProcessorConfigBuilder {
    pub fn preview_width(mut self, width: u32) -> Self {
        self.preview_width = Some(width);
        self
    }

    pub fn preview_quality(mut self, quality: u8) -> Self {
        self.preview_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn output_quality(mut self, quality: u8) -> Self {
        self.output_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn cube_tolerance(mut self, tolerance: usize) -> Self {
        self.cube_tolerance = Some(tolerance);
        self
    }

    pub fn max_output_dimension(mut self, max: Option<u32>) -> Self {
        self.max_output_dimension = Some(max);
        self
    }

    pub fn converter(mut self, choice: ConverterChoice) -> Self {
        self.converter = Some(choice);
        self
    }

    pub fn sips_tool(mut self, tool: ExternalTool) -> Self {
        self.sips_tool = Some(tool);
        self
    }

    pub fn dcraw_tool(mut self, tool: ExternalTool) -> Self {
        self.dcraw_tool = Some(tool);
        self
    }

    pub fn temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    pub fn build(self) -> ProcessorConfig {
        let default = ProcessorConfig::default();
        let converter = ConverterSettings {
            choice: self.converter.unwrap_or(default.converter.choice),
            sips_tool: self.sips_tool.unwrap_or(default.converter.sips_tool),
            dcraw_tool: self.dcraw_tool.unwrap_or(default.converter.dcraw_tool),
            temp_dir: self.temp_dir.unwrap_or(default.converter.temp_dir),
        };
        ProcessorConfig {
            preview_width: self.preview_width.unwrap_or(default.preview_width),
            preview_quality: self.preview_quality.unwrap_or(default.preview_quality),
            output_quality: self.output_quality.unwrap_or(default.output_quality),
            cube_tolerance: self.cube_tolerance.unwrap_or(default.cube_tolerance),
            max_output_dimension: self
                .max_output_dimension
                .unwrap_or(default.max_output_dimension),
            converter,
        }
    }
}
