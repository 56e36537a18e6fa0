mod common;

use common::synthetic_image::detail_set;
use quadseg::config::{HarnessConfig, ImageEntry};
use quadseg::filters::FilterKind;
use quadseg::harness::{DirectorySink, Harness, MemorySink, SourceImage, Stage};
use quadseg::image::io::save_grayscale_u8;
use quadseg::quadtree::QuadTreeParams;
use quadseg::segmentation::{KMeansParams, SegmentationMethod};
use quadseg::Error;

fn sources(size: usize) -> Vec<SourceImage> {
    detail_set(size)
        .into_iter()
        .map(|(name, img)| SourceImage::new(name, img))
        .collect()
}

fn small_config() -> HarnessConfig {
    let mut cfg = HarnessConfig::default();
    cfg.filter_sweep.noise_levels = vec![0.1, 0.5];
    cfg.filter_sweep.kernel_sizes = vec![5, 15];
    cfg.segmentation_sweep.noise_levels = vec![None, Some(0.5)];
    cfg.segmentation_sweep.kernel_sizes = vec![None, Some(5)];
    cfg
}

#[test]
fn sweeps_cover_every_configuration() {
    common::init_logging();
    let images = sources(32);
    let mut harness = Harness::new(small_config(), MemorySink::new()).unwrap();
    let report = harness.run_with_images(&images).unwrap();

    // 3 images × 2 noise × 2 kernels × 3 filters
    assert_eq!(report.filter_runs.len(), 36);
    // 3 images × 2 noise × 2 filter stages × 3 methods
    assert_eq!(report.segmentation_runs.len(), 36);
    assert!(report.filter_runs.iter().all(|r| r.key.stage == Stage::FilterSweep));
    assert_eq!(report.best_filters.len(), 3);
    assert_eq!(report.timing.stages.len(), 2);

    let sink = harness.into_sink();
    assert_eq!(sink.images.len(), 72);
    assert_eq!(sink.reports.len(), 1);
    assert!(sink.image("low_detail_0.5_15_median").is_some());
    assert!(sink.image("high_detail_no_noise_filter_5_split_merge").is_some());
    assert!(sink.image("medium_detail_noise_0.5_no_filter_kmeans").is_some());
}

#[test]
fn raw_unfiltered_quadtree_run_is_recorded() {
    let images = sources(32);
    let mut cfg = small_config();
    cfg.filter_sweep.enabled = false;
    cfg.save_images = false;
    let mut harness = Harness::new(cfg, MemorySink::new()).unwrap();
    let report = harness.run_with_images(&images).unwrap();
    assert!(report.filter_runs.is_empty());
    assert!(report.best_filters.is_empty());
    assert!(harness.sink().images.is_empty());

    let rec = report
        .find("low_detail_no_noise_no_filter_split_merge")
        .expect("raw quadtree run");
    assert!(rec.provenance.is_none());
    assert!(rec.metrics.psnr > 10.0, "psnr={}", rec.metrics.psnr);
    let filtered = report
        .find("low_detail_no_noise_filter_5_split_merge")
        .expect("filtered quadtree run");
    assert!(filtered.provenance.is_some());
    assert_eq!(filtered.key.filter, Some(FilterKind::Bilateral));
}

#[test]
fn reports_are_reproducible() {
    let images = sources(24);
    let run = || {
        let mut harness = Harness::new(small_config(), MemorySink::new()).unwrap();
        harness.run_with_images(&images).unwrap();
        harness.into_sink()
    };
    let a = run();
    let b = run();
    assert_eq!(a.images.len(), b.images.len());
    for ((ka, ia), (kb, ib)) in a.images.iter().zip(&b.images) {
        assert_eq!(ka, kb);
        assert_eq!(ia, ib, "{}", ka.stem());
    }
}

#[test]
fn even_median_kernel_is_reported_as_fallback() {
    let images = sources(16);
    let mut cfg = small_config();
    cfg.filter_sweep.kernel_sizes = vec![4];
    cfg.filter_sweep.filters = vec![FilterKind::Median];
    cfg.segmentation_sweep.enabled = false;
    let mut harness = Harness::new(cfg, MemorySink::new()).unwrap();
    let report = harness.run_with_images(&images).unwrap();
    assert_eq!(report.filter_runs.len(), 6);
    assert!(report.filter_runs.iter().all(|r| r.is_fallback()));
}

#[test]
fn invalid_configs_are_rejected() {
    let mut cfg = small_config();
    cfg.filter_sweep.noise_levels = vec![1.2];
    assert!(matches!(
        Harness::new(cfg, MemorySink::new()),
        Err(Error::InvalidArgument(_))
    ));

    let mut cfg = small_config();
    cfg.segmentation_sweep.methods = vec![SegmentationMethod::QuadTree(QuadTreeParams::new(0, 1.0))];
    assert!(Harness::new(cfg, MemorySink::new()).is_err());

    let mut cfg = small_config();
    cfg.segmentation_sweep.methods = vec![SegmentationMethod::KMeans(KMeansParams {
        clusters: 0,
        ..KMeansParams::default()
    })];
    assert!(Harness::new(cfg, MemorySink::new()).is_err());
}

#[test]
fn directory_sink_run_skips_missing_images() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().join("images");
    let (name, img) = detail_set(16).remove(0);
    save_grayscale_u8(&img, &images_dir.join("present.png")).unwrap();

    let mut cfg = small_config();
    cfg.images_dir = images_dir;
    cfg.results_dir = dir.path().join("results");
    cfg.images = vec![
        ImageEntry::new(name.clone(), "present.png"),
        ImageEntry::new("absent", "absent.png"),
    ];
    cfg.filter_sweep.noise_levels = vec![0.1];
    cfg.filter_sweep.kernel_sizes = vec![5];
    cfg.segmentation_sweep.noise_levels = vec![None];
    cfg.segmentation_sweep.kernel_sizes = vec![None];

    let sink = DirectorySink::for_config(&cfg);
    let step1 = cfg.step1_dir();
    let step2 = cfg.step2_dir();
    let report_path = cfg.report_path();
    let mut harness = Harness::new(cfg, sink).unwrap();
    let report = harness.run().unwrap();

    assert_eq!(report.images.len(), 1);
    assert_eq!(report.images[0].name, name);
    assert_eq!(report.timing.stages[0].label, "load");
    assert!(step1.join(format!("{name}_0.1_5_bilateral.png")).is_file());
    assert!(step2.join(format!("{name}_no_noise_no_filter_otsu.png")).is_file());
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(json["filterRuns"].as_array().unwrap().len(), 3);
    assert_eq!(json["segmentationRuns"].as_array().unwrap().len(), 3);
}

#[test]
fn no_loadable_images_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = small_config();
    cfg.images_dir = dir.path().to_path_buf();
    let mut harness = Harness::new(cfg, MemorySink::new()).unwrap();
    assert!(matches!(harness.run(), Err(Error::NotFound(_))));
}
