use crate::filters::FilterKind;
use crate::quadtree::QuadTreeParams;
use serde::Deserialize;
use std::path::PathBuf;

/// Config for the single-image `quadseg_segment` tool.
#[derive(Debug, Deserialize)]
pub struct SegmentToolConfig {
    pub input: PathBuf,
    /// Optional corruption applied before filtering.
    #[serde(default)]
    pub noise: Option<NoiseStage>,
    /// Optional smoothing applied before segmenting.
    #[serde(default)]
    pub filter: Option<FilterStage>,
    #[serde(default)]
    pub quadtree: QuadTreeParams,
    pub output: SegmentOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct NoiseStage {
    pub probability: f64,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
pub struct FilterStage {
    pub kind: FilterKind,
    pub kernel_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct SegmentOutputConfig {
    pub image: PathBuf,
    #[serde(default)]
    pub summary_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::path::Path;

    #[test]
    fn minimal_segment_config() {
        let json = r#"{ "input": "in.png", "output": { "image": "out.png" } }"#;
        let cfg: SegmentToolConfig = parse_config(Path::new("seg.json"), json).unwrap();
        assert_eq!(cfg.input, PathBuf::from("in.png"));
        assert!(cfg.noise.is_none());
        assert!(cfg.filter.is_none());
        assert_eq!(cfg.quadtree, QuadTreeParams::default());
        assert!(cfg.output.summary_json.is_none());
    }

    #[test]
    fn full_segment_config() {
        let json = r#"{
            "input": "in.png",
            "noise": { "probability": 0.1, "seed": 3 },
            "filter": { "kind": "median", "kernel_size": 5 },
            "quadtree": { "min_region_size": 2, "uniformity_threshold": 4.0, "merge_threshold": 6.0 },
            "output": { "image": "out.png", "summary_json": "out.json" }
        }"#;
        let cfg: SegmentToolConfig = parse_config(Path::new("seg.json"), json).unwrap();
        assert_eq!(cfg.noise.as_ref().map(|n| n.seed), Some(3));
        assert_eq!(cfg.filter.as_ref().map(|f| f.kind), Some(FilterKind::Median));
        assert_eq!(cfg.quadtree.merge_threshold, Some(6.0));
    }

    #[test]
    fn missing_output_is_rejected() {
        let err = parse_config::<SegmentToolConfig>(Path::new("seg.json"), r#"{ "input": "a.png" }"#)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config { .. }));
    }
}
