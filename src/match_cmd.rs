use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use kdmatch_resolve::resolve_duplicates_with_stats;

use crate::cli::MatchArgs;
use crate::config::KdmatchConfig;
use crate::convert;
use crate::pipeline;

/// Run the full pipeline: oversampled selection, then de-duplication.
pub fn run(args: MatchArgs) -> Result<()> {
    let _cmd = info_span!("match").entered();
    let start = Instant::now();

    // 1. Load config and apply CLI overrides
    let mut config = KdmatchConfig::load(args.input.config.as_deref())?;
    if let Some(k) = args.initial_k {
        config.matching.initial_k = k;
    }
    if let Some(k) = args.final_k {
        config.matching.final_k = k;
    }
    if let Some(t) = args.threads {
        config.matching.threads = Some(t);
    }
    if let Some(prefix) = args.input.prefix {
        config.io.prefix = prefix;
    }
    if args.input.gzip {
        config.io.compression = "gzip".to_string();
    }
    if config.matching.initial_k < config.matching.final_k {
        warn!(
            initial_k = config.matching.initial_k,
            final_k = config.matching.final_k,
            "initial selection is smaller than the final one; little room to resolve conflicts"
        );
    }

    // 2. Build crate configs
    let reader_cfg = convert::build_reader_config(&config.io)?;
    let baseline_cfg = convert::build_writer_config(&config.io, config.matching.initial_k)?;
    let optimized_cfg = convert::build_writer_config(&config.io, config.matching.final_k)?;
    let resolve_cfg = convert::build_resolve_config(&config.matching)?;

    // 3. Read inputs and select raw neighbours
    let (anchors, candidates) =
        pipeline::load_inputs(&args.input.anchors, &args.input.candidates, &reader_cfg)?;
    let layout = anchors.layout;
    let raw = pipeline::select_by_stratum(
        anchors.points,
        candidates.points,
        config.matching.initial_k,
    )?;

    // 4. Baseline output
    let out_dir = &args.input.output_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;
    pipeline::write_selection(out_dir, &config.io.prefix, "baseline", &raw, &layout, &baseline_cfg)?;

    // 5. Resolve shared candidates
    let (resolved, stats) =
        resolve_duplicates_with_stats(raw, &resolve_cfg).context("failed to resolve duplicates")?;
    info!(
        n_contested = stats.n_contested,
        n_communities = stats.n_communities,
        n_changed = stats.n_changed,
        "duplicates resolved"
    );

    // 6. Optimized output
    pipeline::write_selection(
        out_dir,
        &config.io.prefix,
        "optimized",
        &resolved,
        &layout,
        &optimized_cfg,
    )?;

    info!(elapsed_s = start.elapsed().as_secs_f64(), "match complete");
    Ok(())
}
