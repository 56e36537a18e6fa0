mod common;

use common::synthetic_image::corner_block;
use quadseg::config::load_config;
use quadseg::config::segment::SegmentToolConfig;
use quadseg::filters::Provenance;
use quadseg::image::io::{load_grayscale_image, save_grayscale_u8};
use quadseg::image::GrayImageU8;
use quadseg::pipeline::run_segment_tool;
use quadseg::Error;
use serde_json::json;
use std::path::Path;

fn write_config(dir: &Path, value: serde_json::Value) -> SegmentToolConfig {
    let path = dir.join("segment.json");
    std::fs::write(&path, value.to_string()).unwrap();
    load_config(&path).unwrap()
}

#[test]
fn exact_reconstruction_reports_null_psnr() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flat.png");
    save_grayscale_u8(&GrayImageU8::filled(20, 12, 90), &input).unwrap();
    let out_image = dir.path().join("out/seg.png");
    let out_json = dir.path().join("out/seg.json");
    let config = write_config(
        dir.path(),
        json!({
            "input": input,
            "output": { "image": out_image, "summary_json": out_json }
        }),
    );

    let report = run_segment_tool(&config).unwrap();
    assert_eq!(report.psnr, None);
    assert!(report.filter.is_none());
    assert_eq!(report.segmentation.leaf_count, 1);
    assert_eq!(load_grayscale_image(&out_image).unwrap(), GrayImageU8::filled(20, 12, 90));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_json).unwrap()).unwrap();
    assert!(value["psnr"].is_null());
    assert!(value.get("filter").is_none());
    assert_eq!(value["segmentation"]["leafCount"], 1);
    assert_eq!(value["segmentation"]["leaves"].as_array().unwrap().len(), 1);
}

#[test]
fn noise_and_filter_stages_run_before_segmenting() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("block.png");
    save_grayscale_u8(&corner_block(32, 32, 16, 16, 20, 230), &input).unwrap();
    let out_image = dir.path().join("seg.png");
    let config = write_config(
        dir.path(),
        json!({
            "input": input,
            "noise": { "probability": 0.1, "seed": 4 },
            "filter": { "kind": "median", "kernel_size": 5 },
            "quadtree": { "min_region_size": 4, "uniformity_threshold": 10.0 },
            "output": { "image": out_image }
        }),
    );

    let report = run_segment_tool(&config).unwrap();
    assert!(matches!(report.filter, Some(Provenance::Filtered { .. })));
    let psnr = report.psnr.expect("noisy input cannot be reproduced exactly");
    assert!(psnr.is_finite() && psnr > 10.0, "psnr={psnr}");
    let labels: Vec<&str> = report.timing.stages.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["load", "noise", "filter", "segment"]);
    let seg = load_grayscale_image(&out_image).unwrap();
    assert_eq!((seg.width(), seg.height()), (32, 32));
}

#[test]
fn unsupported_kernel_is_reported_as_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("block.png");
    save_grayscale_u8(&corner_block(16, 16, 8, 8, 0, 255), &input).unwrap();
    let config = write_config(
        dir.path(),
        json!({
            "input": input,
            "filter": { "kind": "median", "kernel_size": 4 },
            "quadtree": { "min_region_size": 4, "uniformity_threshold": 5.0 },
            "output": { "image": dir.path().join("seg.png") }
        }),
    );

    let report = run_segment_tool(&config).unwrap();
    assert!(matches!(report.filter, Some(Provenance::Fallback { .. })));
    // The unfiltered block pattern segments back to itself.
    assert_eq!(report.psnr, None);
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        json!({
            "input": dir.path().join("absent.png"),
            "output": { "image": dir.path().join("seg.png") }
        }),
    );
    assert!(matches!(run_segment_tool(&config), Err(Error::NotFound(_))));
}
