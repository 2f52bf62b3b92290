use std::fs::File;

use anyhow::{Context, Result, bail};
use getopts::Options;
use tracing::info;

use darkroom_rs::develop::{
    DevelopPipeline, ImageWriter, Parameters, RawDecoder, RawloaderDecoder, TiffCompression,
    TiffImageWriter, WriterConfig,
};
use darkroom_rs::logger;

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {program} [options] <input raw> <output tiff>");
    print!("{}", opts.usage(&brief));
}

fn tick_option(matches: &getopts::Matches, name: &str) -> Result<i32> {
    match matches.opt_str(name) {
        Some(value) => value
            .parse()
            .with_context(|| format!("--{name} expects an integer tick, got {value:?}")),
        None => Ok(0),
    }
}

fn main() -> Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("e", "exposure", "exposure slider tick (-100..100)", "TICK");
    opts.optopt("c", "contrast", "contrast slider tick (-100..100)", "TICK");
    opts.optopt(
        "s",
        "saturation",
        "saturation slider tick (-100..100)",
        "TICK",
    );
    opts.optflag("z", "lzw", "LZW-compress the output");
    opts.optflag("h", "help", "print this help");

    let matches = opts.parse(&args[1..]).context("invalid arguments")?;
    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return Ok(());
    }
    if matches.free.len() != 2 {
        print_usage(&program, &opts);
        bail!("expected an input RAW file and an output TIFF path");
    }

    let params = Parameters::from_ticks(
        tick_option(&matches, "exposure")?,
        tick_option(&matches, "contrast")?,
        tick_option(&matches, "saturation")?,
    );

    let input_path = &matches.free[0];
    let output_path = &matches.free[1];

    let data =
        std::fs::read(input_path).with_context(|| format!("failed to read {input_path}"))?;
    let raw = RawloaderDecoder
        .decode(&data)
        .with_context(|| format!("failed to decode {input_path}"))?;
    info!(width = raw.width, height = raw.height, "Decoded RAW frame");

    let pipeline = DevelopPipeline::default();
    let (preprocessed, timings) = pipeline.preprocess_with_timings(&raw)?;
    timings.log_summary();

    let (image, timings) = pipeline.process_with_timings(&preprocessed, &params)?;
    timings.log_summary();

    let config = WriterConfig {
        compression: if matches.opt_present("lzw") {
            TiffCompression::Lzw
        } else {
            TiffCompression::None
        },
        predictor: None,
    };
    let mut output = File::create(output_path)
        .with_context(|| format!("failed to create {output_path}"))?;
    TiffImageWriter.write_image(&image, &mut output, &config)?;

    info!(path = %output_path, "Wrote developed image");
    Ok(())
}
