use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lutbox::image_pipeline::{ConverterChoice, ExternalTool, LutProcessor, ProcessorConfig};
use lutbox::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "lutbox", version, about = "Apply image-encoded 3D LUTs to photos, including camera RAW")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RAW conversion strategy
    #[arg(long, value_enum, default_value_t = Converter::Auto, global = true)]
    converter: Converter,

    /// Path to the sips executable
    #[arg(long, global = true)]
    sips: Option<PathBuf>,

    /// Path to the dcraw executable
    #[arg(long, global = true)]
    dcraw: Option<PathBuf>,

    /// Directory for conversion temp files
    #[arg(long, global = true)]
    temp_dir: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a LUT at full resolution and write <stem>_lut.jpg
    Process {
        input: PathBuf,
        #[arg(long)]
        lut: PathBuf,
        /// Explicit output path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Cap the larger output dimension (applied after the LUT)
        #[arg(long)]
        max_dimension: Option<u32>,
        /// Print a JSON report instead of failing
        #[arg(long)]
        json: bool,
    },
    /// Downscaled preview of the input as a data URI
    Preview {
        input: PathBuf,
        #[arg(long, default_value_t = 800)]
        width: u32,
        /// Write the data URI here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Downscaled preview with the LUT applied, as a data URI
    LutPreview {
        input: PathBuf,
        #[arg(long)]
        lut: PathBuf,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Converter {
    Auto,
    Sips,
    Dcraw,
}

impl From<Converter> for ConverterChoice {
    fn from(converter: Converter) -> Self {
        match converter {
            Converter::Auto => ConverterChoice::Auto,
            Converter::Sips => ConverterChoice::Sips,
            Converter::Dcraw => ConverterChoice::Dcraw,
        }
    }
}

fn emit(uri: String, out: Option<PathBuf>) -> anyhow::Result<()> {
    match out {
        Some(path) => std::fs::write(&path, uri)
            .with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{uri}");
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for_verbosity(cli.verbose));

    let mut builder = ProcessorConfig::builder()
        .converter(cli.converter.into())
        .temp_dir(cli.temp_dir);
    if let Some(sips) = cli.sips {
        builder = builder.sips_tool(ExternalTool::new(sips));
    }
    if let Some(dcraw) = cli.dcraw {
        builder = builder.dcraw_tool(ExternalTool::new(dcraw));
    }

    match cli.command {
        Command::Process {
            input,
            lut,
            output,
            max_dimension,
            json,
        } => {
            let processor = LutProcessor::new(builder.max_output_dimension(max_dimension).build());
            if json {
                let report = processor.process_report(&input, &lut);
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            let output = match output {
                Some(output) => {
                    processor.process_to(&input, &lut, &output)?;
                    output
                }
                None => processor.process(&input, &lut)?,
            };
            info!("Wrote {}", output.display());
        }
        Command::Preview { input, width, out } => {
            let processor = LutProcessor::new(builder.build());
            let uri = processor.preview(&input, width).inspect_err(|e| error!("Preview failed: {}", e))?;
            emit(uri, out)?;
        }
        Command::LutPreview {
            input,
            lut,
            width,
            out,
        } => {
            let processor = LutProcessor::new(builder.preview_width(width).build());
            let uri = processor
                .lut_preview(&input, &lut)
                .inspect_err(|e| error!("LUT preview failed: {}", e))?;
            emit(uri, out)?;
        }
    }

    Ok(())
}
