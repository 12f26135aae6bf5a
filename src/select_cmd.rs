use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use crate::cli::SelectArgs;
use crate::config::KdmatchConfig;
use crate::convert;
use crate::pipeline;

/// Select nearest neighbours without resolving shared candidates.
pub fn run(args: SelectArgs) -> Result<()> {
    let _cmd = info_span!("select").entered();
    let start = Instant::now();

    let mut config = KdmatchConfig::load(args.input.config.as_deref())?;
    if let Some(k) = args.k {
        config.matching.initial_k = k;
    }
    if let Some(prefix) = args.input.prefix {
        config.io.prefix = prefix;
    }
    if args.input.gzip {
        config.io.compression = "gzip".to_string();
    }

    let reader_cfg = convert::build_reader_config(&config.io)?;
    let writer_cfg = convert::build_writer_config(&config.io, config.matching.initial_k)?;

    let (anchors, candidates) =
        pipeline::load_inputs(&args.input.anchors, &args.input.candidates, &reader_cfg)?;
    let raw = pipeline::select_by_stratum(
        anchors.points,
        candidates.points,
        config.matching.initial_k,
    )?;

    let out_dir = &args.input.output_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;
    pipeline::write_selection(
        out_dir,
        &config.io.prefix,
        "baseline",
        &raw,
        &anchors.layout,
        &writer_cfg,
    )?;

    info!(elapsed_s = start.elapsed().as_secs_f64(), "select complete");
    Ok(())
}
