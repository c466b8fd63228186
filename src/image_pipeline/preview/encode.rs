use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raster::{ChannelOrder, RasterBuffer};

pub const PREVIEW_QUALITY: u8 = 80;
pub const OUTPUT_QUALITY: u8 = 90;

/// Encodes `raster` as a baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(raster: &RasterBuffer, quality: u8) -> Result<Vec<u8>> {
    let rgb = raster.to_order(ChannelOrder::Rgb).to_dynamic()?.to_rgb8();

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

    debug!(
        bytes = buffer.len(),
        quality, "Encoded {}x{} JPEG", raster.width, raster.height
    );
    Ok(buffer)
}

pub fn jpeg_data_uri(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg))
}

/// `<dir>/<stem>_lut.jpg` next to `input`.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_lut.jpg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_sits_next_to_input() {
        assert_eq!(
            output_path_for(Path::new("/photos/trip/P1010001.ORF")),
            PathBuf::from("/photos/trip/P1010001_lut.jpg")
        );
        assert_eq!(output_path_for(Path::new("shot.v2.png")), PathBuf::from("shot.v2_lut.jpg"));
    }

    #[test]
    fn test_encoded_jpeg_decodes_with_same_size() {
        let raster = RasterBuffer::new(7, 5, 4, ChannelOrder::Bgr, vec![128; 7 * 5 * 4]).unwrap();
        let jpeg = encode_jpeg(&raster, PREVIEW_QUALITY).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 5));
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = jpeg_data_uri(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(uri, "data:image/jpeg;base64,/9j/");
    }
}
