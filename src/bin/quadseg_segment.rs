use quadseg::config::load_config;
use quadseg::config::segment::SegmentToolConfig;
use quadseg::filters::Provenance;
use quadseg::pipeline::run_segment_tool;
use std::env;
use std::error::Error;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: SegmentToolConfig = load_config(Path::new(&config_path))?;
    let report = run_segment_tool(&config)?;

    if let Some(Provenance::Fallback { reason }) = &report.filter {
        println!("Filter fell back to the unfiltered image: {reason}");
    }
    let summary = &report.segmentation;
    println!(
        "Segmented {}x{} image: {} leaves, {} regions, depth {} ({:.2} ms)",
        summary.width,
        summary.height,
        summary.leaf_count,
        summary.region_count,
        summary.max_depth,
        summary.elapsed_ms
    );
    println!("Saved segmentation to {}", config.output.image.display());
    if let Some(path) = &config.output.summary_json {
        println!("Saved leaf report to {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: quadseg_segment <config.json>".to_string()
}
