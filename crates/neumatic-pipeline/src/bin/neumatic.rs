//! Neumatic CLI binary.
//!
//! Runs the full recognition pipeline over one or more scanned pages and
//! writes the analysis as JSON.

use anyhow::{bail, Context};
use image::GrayImage;
use neumatic_ocr::metadata::load_metadata;
use neumatic_ocr::OnnxGlyphClassifier;
use neumatic_pipeline::{analyze, process_batch, AnalysisOptions, PageBatch};
use std::path::PathBuf;
use std::sync::Mutex;

fn main() -> anyhow::Result<()> {
    // Respects RUST_LOG
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_help();
        return Ok(());
    }

    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-i" | "--input" => {
                i += 1;
                if i >= args.len() {
                    bail!("--input requires a path argument");
                }
                config.inputs.push(PathBuf::from(&args[i]));
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    bail!("--output requires a path argument");
                }
                config.output = PathBuf::from(&args[i]);
            }
            "--model" => {
                i += 1;
                if i >= args.len() {
                    bail!("--model requires a path argument");
                }
                config.model = PathBuf::from(&args[i]);
            }
            "--meta" => {
                i += 1;
                if i >= args.len() {
                    bail!("--meta requires a path argument");
                }
                config.meta = PathBuf::from(&args[i]);
            }
            "--stdout" => {
                config.stdout = true;
            }
            "--split-lr" => {
                config.split_lr = true;
            }
            "--deskew" => {
                config.options.preprocess.deskew = true;
            }
            "--deskew-max-angle" => {
                i += 1;
                if i >= args.len() {
                    bail!("--deskew-max-angle requires an argument in degrees");
                }
                config.options.preprocess.max_skew_angle = args[i]
                    .parse()
                    .with_context(|| format!("invalid angle: {}", args[i]))?;
            }
            "--despeckle" => {
                config.options.preprocess.despeckle = true;
            }
            "--close-radius" => {
                i += 1;
                if i >= args.len() {
                    bail!("--close-radius requires an argument in pixels");
                }
                config.options.preprocess.close_radius = args[i]
                    .parse()
                    .with_context(|| format!("invalid radius: {}", args[i]))?;
            }
            "-s" | "--start-page" => {
                i += 1;
                if i >= args.len() {
                    bail!("--start-page requires a page number");
                }
                config.start_page = Some(
                    args[i]
                        .parse()
                        .with_context(|| format!("invalid page number: {}", args[i]))?,
                );
            }
            "-e" | "--end-page" => {
                i += 1;
                if i >= args.len() {
                    bail!("--end-page requires a page number");
                }
                config.end_page = Some(
                    args[i]
                        .parse()
                        .with_context(|| format!("invalid page number: {}", args[i]))?,
                );
            }
            arg => {
                if arg.starts_with('-') {
                    bail!("Unknown option: {arg}");
                }
                // Bare args are inputs too
                config.inputs.push(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    if config.inputs.is_empty() {
        bail!("at least one input image is required (-i <PATH>)");
    }

    let metadata = load_metadata(&config.meta)
        .with_context(|| format!("loading model metadata from {}", config.meta.display()))?;
    let classifier = OnnxGlyphClassifier::load(&config.model, &metadata)
        .with_context(|| format!("loading classifier model from {}", config.model.display()))?;

    let mut pages: Vec<GrayImage> = Vec::with_capacity(config.inputs.len());
    for path in &config.inputs {
        let image = image::open(path)
            .with_context(|| format!("opening {}", path.display()))?
            .to_luma8();
        pages.push(image);
    }

    let start = config.start_page.unwrap_or(0);
    let end = config.end_page.unwrap_or(pages.len().saturating_sub(1));
    if start > end {
        bail!("start page {start} is past end page {end}");
    }
    let page_range: Vec<usize> = (start..=end).collect();

    let batch = PageBatch {
        pages: &pages,
        page_range: &page_range,
        split_lr: config.split_lr,
    };
    let classifier = Mutex::new(classifier);
    let analyzed = process_batch(&batch, &classifier, &config.options)?;

    let mut analysis = analyze(analyzed, metadata);
    analysis
        .additional_metadata
        .insert("app_name".to_string(), "neumatic".into());
    analysis
        .additional_metadata
        .insert("app_version".to_string(), env!("CARGO_PKG_VERSION").into());

    if config.stdout {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &analysis)?;
        println!();
    } else {
        let file = std::fs::File::create(&config.output)
            .with_context(|| format!("creating {}", config.output.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &analysis)?;
        println!("Wrote {}", config.output.display());
    }

    Ok(())
}

fn print_help() {
    println!("Neumatic");
    println!();
    println!("Recognizes Byzantine chant neume notation in scanned pages.");
    println!();
    println!("USAGE:");
    println!("  neumatic [OPTIONS] -i <IMAGE> [-i <IMAGE> ...]");
    println!();
    println!("OPTIONS:");
    println!("  -i, --input <PATH>         Input page image (repeatable, one per page)");
    println!("  -o, --output <PATH>        Output path for the JSON analysis");
    println!("                             [default: analysis.json]");
    println!("      --model <PATH>         ONNX classifier model [default: model.onnx]");
    println!("      --meta <PATH>          Model metadata JSON [default: metadata.json]");
    println!("      --stdout               Write the analysis to stdout instead of a file");
    println!("      --split-lr             Treat each page as a two-page spread");
    println!("      --deskew               Straighten pages before processing");
    println!("      --deskew-max-angle <D> Deskew search half-range in degrees");
    println!("      --despeckle            Median-filter pages before binarization");
    println!("      --close-radius <N>     Morphological close radius in pixels");
    println!("  -s, --start-page <N>       First page to process [default: 0]");
    println!("  -e, --end-page <N>         Last page to process [default: last input]");
    println!("      --help                 Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  # Analyze a single page");
    println!("  neumatic -i page.png -o page.json");
    println!();
    println!("  # Analyze a book scanned as two-page spreads");
    println!("  neumatic --split-lr -i spread01.png -i spread02.png");
}

#[derive(Debug, Clone)]
struct Config {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    model: PathBuf,
    meta: PathBuf,
    stdout: bool,
    split_lr: bool,
    start_page: Option<usize>,
    end_page: Option<usize>,
    options: AnalysisOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("analysis.json"),
            model: PathBuf::from("model.onnx"),
            meta: PathBuf::from("metadata.json"),
            stdout: false,
            split_lr: false,
            start_page: None,
            end_page: None,
            options: AnalysisOptions::default(),
        }
    }
}
