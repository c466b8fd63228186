use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::ingest::{
    ConversionArtifact, ConverterChoice, ExternalTool, IngestionPipeline, Platform, RawConverter,
    unique_temp_path,
};
use crate::image_pipeline::processing::{LutProcessor, ProcessorConfig};
use crate::image_pipeline::raster::CodecDecoder;

/// Level-`n` identity cube packed as an `n²`x`n` PNG, red fastest.
fn write_identity_lut(path: &Path, n: u32) {
    let scale = |i: u32| ((i as f64 / (n - 1) as f64) * 255.0).round() as u8;
    let mut data = Vec::new();
    for b in 0..n {
        for g in 0..n {
            for r in 0..n {
                data.extend_from_slice(&[scale(r), scale(g), scale(b)]);
            }
        }
    }
    // same entries, square packing: 8x8 for level 4
    let side = ((n * n * n) as f64).sqrt() as u32;
    let (w, h) = if side * side == n * n * n { (side, side) } else { (n * n, n) };
    RgbImage::from_raw(w, h, data).unwrap().save(path).unwrap();
}

fn mean_rgb(image: &DynamicImage) -> [f64; 3] {
    let rgb = image.to_rgb8();
    let count = (rgb.width() * rgb.height()) as f64;
    let mut sum = [0.0; 3];
    for px in rgb.pixels() {
        for c in 0..3 {
            sum[c] += px.0[c] as f64;
        }
    }
    sum.map(|s| s / count)
}

fn decode_data_uri(uri: &str) -> DynamicImage {
    let encoded = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
    image::load_from_memory(&STANDARD.decode(encoded).unwrap()).unwrap()
}

struct Scene {
    dir: tempfile::TempDir,
    lut: PathBuf,
}

impl Scene {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let lut = dir.path().join("identity_lut.png");
        write_identity_lut(&lut, 4);
        Self { dir, lut }
    }

    fn solid(&self, name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
        let path = self.dir.path().join(name);
        RgbImage::from_pixel(width, height, Rgb(color)).save(&path).unwrap();
        path
    }
}

/// Stands in for sips/dcraw: "converts" anything into a solid PNG.
struct PngConverter {
    temp_dir: PathBuf,
}

impl RawConverter for PngConverter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn convert(&self, _input: &Path) -> Result<ConversionArtifact> {
        let artifact = ConversionArtifact::new(unique_temp_path(&self.temp_dir, "temp", ".png"));
        RgbImage::from_pixel(12, 6, Rgb([255, 0, 0]))
            .save(artifact.path())
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;
        Ok(artifact)
    }
}

fn converting_processor(temp_dir: &Path) -> LutProcessor<CodecDecoder> {
    let converter = PngConverter {
        temp_dir: temp_dir.to_path_buf(),
    };
    LutProcessor::with_custom(
        IngestionPipeline::with_custom(CodecDecoder, Some(Box::new(converter)), Platform::MacOs),
        ProcessorConfig::default(),
    )
}

#[test]
fn test_identity_lut_preserves_solid_red() {
    let scene = Scene::new();
    let input = scene.solid("input.png", 10, 10, [255, 0, 0]);
    let processor = LutProcessor::new(ProcessorConfig::default());

    let output = processor.process(&input, &scene.lut).unwrap();
    assert_eq!(output, scene.dir.path().join("input_lut.jpg"));

    let result = image::open(&output).unwrap();
    assert_eq!((result.width(), result.height()), (10, 10));
    let [r, g, b] = mean_rgb(&result);
    assert!(r > 240.0, "red mean {r}");
    assert!(g < 20.0, "green mean {g}");
    assert!(b < 20.0, "blue mean {b}");
}

#[test]
fn test_alpha_input_is_processed() {
    let scene = Scene::new();
    let input = scene.dir.path().join("alpha.png");
    RgbaImage::from_pixel(6, 4, Rgba([0, 0, 255, 128])).save(&input).unwrap();
    let processor = LutProcessor::new(ProcessorConfig::default());

    let output = processor.process(&input, &scene.lut).unwrap();
    let [r, g, b] = mean_rgb(&image::open(output).unwrap());
    assert!(r < 20.0 && g < 20.0 && b > 235.0);
}

#[test]
fn test_invalid_lut_writes_nothing() {
    let scene = Scene::new();
    let input = scene.solid("input.png", 10, 10, [0, 255, 0]);
    let bad_lut = scene.solid("bad_lut.png", 10, 10, [0, 0, 0]);
    let processor = LutProcessor::new(ProcessorConfig::default());

    let result = processor.process(&input, &bad_lut);
    assert!(matches!(result, Err(PipelineError::InvalidLut(_))));
    assert!(!scene.dir.path().join("input_lut.jpg").exists());
}

#[test]
fn test_max_output_dimension_applies_after_transform() {
    let scene = Scene::new();
    let input = scene.solid("wide.png", 40, 20, [255, 0, 0]);
    let config = ProcessorConfig::builder().max_output_dimension(Some(10)).build();
    let processor = LutProcessor::new(config);

    let output = processor.process(&input, &scene.lut).unwrap();
    let result = image::open(output).unwrap();
    assert_eq!((result.width(), result.height()), (10, 5));
}

#[test]
fn test_process_report() {
    let scene = Scene::new();
    let input = scene.solid("input.png", 4, 4, [255, 0, 0]);
    let processor = LutProcessor::new(ProcessorConfig::default());

    let ok = processor.process_report(&input, &scene.lut);
    assert!(ok.success);
    assert_eq!(ok.output_path, Some(scene.dir.path().join("input_lut.jpg")));

    let failed = processor.process_report(&scene.dir.path().join("missing.png"), &scene.lut);
    assert!(!failed.success);
    assert!(failed.error.unwrap().contains("missing.png"));
}

#[test]
fn test_preview_fits_width_without_lut() {
    let scene = Scene::new();
    let input = scene.solid("large.png", 64, 32, [10, 200, 30]);
    let processor = LutProcessor::new(ProcessorConfig::default());

    let uri = processor.preview(&input, 16).unwrap();
    assert!(uri.starts_with("data:image/jpeg;base64,"));
    let preview = decode_data_uri(&uri);
    assert_eq!((preview.width(), preview.height()), (16, 8));
    let [r, g, b] = mean_rgb(&preview);
    assert!(r < 30.0 && g > 180.0 && b < 50.0);
}

#[test]
fn test_preview_never_upscales() {
    let scene = Scene::new();
    let input = scene.solid("small.png", 10, 7, [0, 0, 0]);
    let processor = LutProcessor::new(ProcessorConfig::default());

    let preview = decode_data_uri(&processor.preview(&input, 800).unwrap());
    assert_eq!((preview.width(), preview.height()), (10, 7));
}

#[test]
fn test_lut_preview_resizes_and_applies() {
    let scene = Scene::new();
    let input = scene.solid("large.png", 64, 32, [255, 0, 0]);
    let config = ProcessorConfig::builder().preview_width(16).build();
    let processor = LutProcessor::new(config);

    let preview = decode_data_uri(&processor.lut_preview(&input, &scene.lut).unwrap());
    assert_eq!((preview.width(), preview.height()), (16, 8));
    let [r, g, b] = mean_rgb(&preview);
    assert!(r > 240.0 && g < 20.0 && b < 20.0);
}

#[test]
fn test_failed_previews_degrade_to_none() {
    let scene = Scene::new();
    let processor = LutProcessor::new(ProcessorConfig::default());
    let missing = scene.dir.path().join("missing.jpg");

    assert!(processor.try_preview(&missing, 800).is_none());
    assert!(processor.try_lut_preview(&missing, &scene.lut).is_none());

    let input = scene.solid("ok.png", 4, 4, [1, 2, 3]);
    assert!(processor.try_preview(&input, 800).is_some());
}

#[test]
fn test_raw_on_unsupported_platform() {
    let scene = Scene::new();
    let raw = scene.dir.path().join("P1010001.ORF");
    std::fs::write(&raw, b"raw sensor data").unwrap();
    let processor = LutProcessor::with_custom(
        IngestionPipeline::with_custom(CodecDecoder, None, Platform::from_os("linux")),
        ProcessorConfig::default(),
    );

    match processor.process(&raw, &scene.lut) {
        Err(PipelineError::UnsupportedPlatform(platform)) => assert_eq!(platform, "linux"),
        other => panic!("expected UnsupportedPlatform, got {other:?}"),
    }
    assert!(processor.try_preview(&raw, 800).is_none());
    assert!(!scene.dir.path().join("P1010001_lut.jpg").exists());
}

#[test]
fn test_corrupt_image_is_not_sent_to_conversion() {
    let scene = Scene::new();
    let input = scene.dir.path().join("scrambled.png");
    RgbImage::from_fn(64, 64, |x, y| Rgb([x as u8, y as u8, 200]))
        .save(&input)
        .unwrap();
    let mut bytes = std::fs::read(&input).unwrap();
    let idat = bytes.windows(4).position(|w| w == b"IDAT").unwrap();
    for byte in &mut bytes[idat + 4..idat + 24] {
        *byte = !*byte;
    }
    std::fs::write(&input, bytes).unwrap();

    let processor = LutProcessor::with_custom(
        IngestionPipeline::with_custom(CodecDecoder, None, Platform::from_os("linux")),
        ProcessorConfig::default(),
    );

    match processor.process(&input, &scene.lut) {
        Err(PipelineError::DecodeFailed(_)) => {}
        other => panic!("expected DecodeFailed, got {other:?}"),
    }
    assert!(!scene.dir.path().join("scrambled_lut.jpg").exists());
}

#[test]
fn test_conversion_artifacts_are_removed_on_every_path() {
    let scene = Scene::new();
    let temp = tempfile::tempdir().unwrap();
    let raw = scene.dir.path().join("DSC00042.ARW");
    std::fs::write(&raw, b"raw sensor data").unwrap();
    let bad_lut = scene.solid("bad_lut.png", 10, 10, [0, 0, 0]);
    let processor = converting_processor(temp.path());
    let leftovers = || std::fs::read_dir(temp.path()).unwrap().count();

    let output = processor.process(&raw, &scene.lut).unwrap();
    assert_eq!(output, scene.dir.path().join("DSC00042_lut.jpg"));
    assert_eq!(leftovers(), 0);

    assert!(processor.process(&raw, &bad_lut).is_err());
    assert_eq!(leftovers(), 0);

    let preview = decode_data_uri(&processor.preview(&raw, 800).unwrap());
    assert_eq!((preview.width(), preview.height()), (12, 6));
    assert_eq!(leftovers(), 0);

    assert!(processor.lut_preview(&raw, &scene.lut).is_ok());
    assert_eq!(leftovers(), 0);
}

#[test]
fn test_concurrent_operations_are_independent() {
    let scene = Scene::new();
    let processor = LutProcessor::new(ProcessorConfig::default());
    let inputs: Vec<PathBuf> = (0..4)
        .map(|i| scene.solid(&format!("img{i}.png"), 8 + i, 8, [255, 0, 0]))
        .collect();

    let (processor, lut) = (&processor, &scene.lut);
    std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| s.spawn(move || processor.process(input, lut)))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    });

    for (i, input) in inputs.iter().enumerate() {
        let output = input.with_file_name(format!("img{i}_lut.jpg"));
        assert_eq!(image::open(output).unwrap().width(), 8 + i as u32);
    }
}

#[test]
fn test_config_builder() {
    let config = ProcessorConfig::builder()
        .preview_width(400)
        .preview_quality(0)
        .output_quality(95)
        .cube_tolerance(0)
        .converter(ConverterChoice::Dcraw)
        .dcraw_tool(ExternalTool::new("/opt/dcraw/bin/dcraw"))
        .temp_dir(Some(PathBuf::from("/var/tmp")))
        .build();

    assert_eq!(config.preview_width, 400);
    assert_eq!(config.preview_quality, 1);
    assert_eq!(config.output_quality, 95);
    assert_eq!(config.cube_tolerance, 0);
    assert_eq!(config.max_output_dimension, None);
    assert_eq!(config.converter.choice, ConverterChoice::Dcraw);
    assert_eq!(config.converter.dcraw_tool.program(), Path::new("/opt/dcraw/bin/dcraw"));
    assert_eq!(config.converter.sips_tool, ExternalTool::new("sips"));
    assert_eq!(config.converter.temp_dir(), PathBuf::from("/var/tmp"));

    let default = ProcessorConfig::default();
    assert_eq!(default.preview_width, 800);
    assert_eq!(default.preview_quality, 80);
    assert_eq!(default.output_quality, 90);
    assert_eq!(default.cube_tolerance, 10);
}
