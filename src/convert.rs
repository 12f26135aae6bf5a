//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use kdmatch_io::{Compression, ReaderConfig, WriterConfig};
use kdmatch_resolve::ResolveConfig;

use crate::config::{IoToml, MatchingToml};

/// Parses a compression name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "gzip" | "gz" => Ok(Compression::Gzip),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let cfg = io
        .scales
        .iter()
        .fold(
            ReaderConfig::default().with_group_columns(io.group_columns.iter().cloned()),
            |cfg, (col, &factor)| cfg.with_scale(col.clone(), factor),
        );
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] rendering `slots` candidates per row.
pub fn build_writer_config(io: &IoToml, slots: usize) -> Result<WriterConfig> {
    let cfg = WriterConfig::new(slots).with_compression(parse_compression(&io.compression)?);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`ResolveConfig`] from the TOML matching configuration.
///
/// Threads fall back to the machine's available parallelism when unset.
pub fn build_resolve_config(matching: &MatchingToml) -> Result<ResolveConfig> {
    let mut cfg = ResolveConfig::new(matching.final_k);
    if let Some(threads) = matching.threads {
        cfg = cfg.with_threads(threads);
    }
    cfg.validate()?;
    Ok(cfg)
}
