use quadseg::config::load_config;
use quadseg::harness::{DirectorySink, Harness, SweepReport};
use quadseg::HarnessConfig;
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
    let config: HarnessConfig = load_config(Path::new(&config_path))?;

    let sink = DirectorySink::for_config(&config);
    sink.prepare()?;
    let report_path = sink.report_path().to_path_buf();
    let mut harness = Harness::new(config, sink)?;
    let report = harness.run()?;

    print_report(&report);
    println!("Saved report to {}", report_path.display());
    Ok(())
}

fn print_report(report: &SweepReport) {
    if !report.filter_runs.is_empty() {
        println!("Filter sweep");
        for rec in &report.filter_runs {
            let note = if rec.is_fallback() { " (fallback)" } else { "" };
            println!(
                "  {:40} PSNR: {:6.2}, SSIM: {:.4}{note}",
                rec.key.stem(),
                rec.metrics.psnr,
                rec.metrics.ssim
            );
        }
        for best in &report.best_filters {
            println!(
                "Best filter for {}: {} (kernel {}, noise {:.1}, PSNR: {:.2})",
                best.image, best.filter, best.kernel_size, best.noise, best.psnr
            );
        }
    }
    if !report.segmentation_runs.is_empty() {
        println!("Segmentation sweep");
        for rec in &report.segmentation_runs {
            println!(
                "  {:48} PSNR: {:6.2}, SSIM: {:.4}",
                rec.key.stem(),
                rec.metrics.psnr,
                rec.metrics.ssim
            );
        }
    }
    println!("Total: {:.1} ms", report.timing.total_ms);
}

fn usage() -> String {
    "Usage: quadseg_eval <config.json>".to_string()
}
