//! Tab-delimited point tables.
//!
//! A table has one header row; the first column holds the point ID, group
//! columns (if configured) hold stratum labels, and every other column is a
//! numeric coordinate.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use kdmatch_knn::Point;
use tracing::{debug, info};

use crate::error::IoError;
use crate::validate::ValidationCollector;

/// Joins group column values into one stratum key.
pub const STRATUM_SEPARATOR: &str = "_";

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading point tables.
///
/// By default every non-ID column is a coordinate and no scaling is applied.
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Columns whose values form the stratum key instead of coordinates.
    group_columns: Vec<String>,
    /// Per-column factors multiplied into coordinates on read.
    scales: BTreeMap<String, f64>,
}

impl ReaderConfig {
    /// Sets the group columns. Anchors only match candidates with the same
    /// values in all of them.
    pub fn with_group_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the scale factor for one coordinate column.
    pub fn with_scale(mut self, column: impl Into<String>, factor: f64) -> Self {
        self.scales.insert(column.into(), factor);
        self
    }

    /// Returns the group columns.
    pub fn group_columns(&self) -> &[String] {
        &self.group_columns
    }

    /// Returns the scale factor for `column` (1.0 when unset).
    pub fn scale(&self, column: &str) -> f64 {
        self.scales.get(column).copied().unwrap_or(1.0)
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every empty or repeated group
    /// column, every zero or non-finite scale and every scale set on a group
    /// column.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();
        let mut seen = HashSet::new();
        for col in &self.group_columns {
            if col.is_empty() {
                c.push("group column name is empty");
            } else if !seen.insert(col.as_str()) {
                c.push(format!("group column '{col}' listed twice"));
            }
        }
        for (col, &factor) in &self.scales {
            if !factor.is_finite() || factor == 0.0 {
                c.push(format!("scale for '{col}' must be finite and non-zero, got {factor}"));
            }
            if seen.contains(col.as_str()) {
                c.push(format!("scale set on group column '{col}'"));
            }
        }
        c.finish()
    }
}

// ---------------------------------------------------------------------------
// TableLayout
// ---------------------------------------------------------------------------

/// Column roles of one table, resolved from its header.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    id_column: String,
    coord_columns: Vec<String>,
    group_columns: Vec<String>,
    coord_idx: Vec<usize>,
    group_idx: Vec<usize>,
    scales: Vec<f64>,
}

impl TableLayout {
    /// Resolves column roles for `header`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the header repeats a name, lacks a
    /// configured group or scaled column, or leaves no coordinate column.
    pub fn from_header(header: &[String], config: &ReaderConfig) -> Result<Self, IoError> {
        config.validate()?;
        let mut c = ValidationCollector::new();

        let mut seen = HashSet::new();
        for name in header {
            if !seen.insert(name.as_str()) {
                c.push(format!("column '{name}' appears twice in header"));
            }
        }

        let Some((id_column, rest)) = header.split_first() else {
            return Err(IoError::Validation {
                count: 1,
                details: "header has no columns".to_string(),
            });
        };

        let mut group_idx = Vec::with_capacity(config.group_columns.len());
        for g in &config.group_columns {
            match rest.iter().position(|h| h == g) {
                Some(i) => group_idx.push(i + 1),
                None => c.push(format!("group column '{g}' not in header")),
            }
        }
        for col in config.scales.keys() {
            if !rest.contains(col) {
                c.push(format!("scaled column '{col}' not in header"));
            }
        }

        let (coord_idx, coord_columns): (Vec<usize>, Vec<String>) = rest
            .iter()
            .enumerate()
            .filter(|(_, h)| !config.group_columns.contains(*h))
            .map(|(i, h)| (i + 1, h.clone()))
            .unzip();
        if coord_columns.is_empty() {
            c.push("no coordinate columns");
        }
        c.finish()?;

        let scales = coord_columns.iter().map(|h| config.scale(h)).collect();
        Ok(Self {
            id_column: id_column.clone(),
            coord_columns,
            group_columns: config.group_columns.clone(),
            coord_idx,
            group_idx,
            scales,
        })
    }

    /// Name of the ID column.
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Names of the coordinate columns, in file order.
    pub fn coord_columns(&self) -> &[String] {
        &self.coord_columns
    }

    /// Names of the group columns, in configured order.
    pub fn group_columns(&self) -> &[String] {
        &self.group_columns
    }

    /// Returns `true` if points carry a stratum key.
    pub fn is_grouped(&self) -> bool {
        !self.group_columns.is_empty()
    }

    /// Total number of columns in the header.
    pub fn n_columns(&self) -> usize {
        1 + self.coord_idx.len() + self.group_idx.len()
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Points read from one table, with their payload set to the stratum key
/// (empty when the table is not grouped).
#[derive(Debug, Clone)]
pub struct PointTable {
    /// Column roles of the table.
    pub layout: TableLayout,
    /// Points in file order.
    pub points: Vec<Point<String>>,
}

fn open(path: &Path) -> Result<Box<dyn BufRead>, IoError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IoError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => IoError::io(path, e),
    })?;
    let is_gzip = path.extension().is_some_and(|ext| ext == "gz");
    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.trim_end_matches('\r')
        .split('\t')
        .map(|f| f.trim().to_string())
        .collect()
}

/// Reads the header row of a table.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Io`] or
/// [`IoError::EmptyFile`] when no non-blank line exists.
pub fn read_header(path: &Path) -> Result<Vec<String>, IoError> {
    for line in open(path)?.lines() {
        let line = line.map_err(|e| IoError::io(path, e))?;
        if !line.trim().is_empty() {
            return Ok(split_fields(&line));
        }
    }
    Err(IoError::EmptyFile {
        path: path.to_path_buf(),
    })
}

/// Reads every point of a table.
///
/// Files ending in `.gz` are decompressed on the fly. Blank lines are
/// skipped. Coordinates are multiplied by their configured scale.
///
/// # Errors
///
/// Returns [`IoError::FieldCount`] for a row of the wrong width,
/// [`IoError::Parse`] for an unparsable or non-finite coordinate, plus
/// whatever [`read_header`] and [`TableLayout::from_header`] reject.
pub fn read_points(path: &Path, config: &ReaderConfig) -> Result<PointTable, IoError> {
    let mut lines = open(path)?
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|l| (i + 1, l)).map_err(|e| IoError::io(path, e)));

    let header = loop {
        match lines.next().transpose()? {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break split_fields(&line),
            None => {
                return Err(IoError::EmptyFile {
                    path: path.to_path_buf(),
                });
            }
        }
    };
    let layout = TableLayout::from_header(&header, config)?;
    debug!(
        path = %path.display(),
        dim = layout.coord_columns.len(),
        grouped = layout.is_grouped(),
        "resolved table layout"
    );

    let mut points = Vec::new();
    for item in lines {
        let (line_no, line) = item?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() != header.len() {
            return Err(IoError::FieldCount {
                path: path.to_path_buf(),
                line: line_no,
                expected: header.len(),
                got: fields.len(),
            });
        }

        let mut coords = Vec::with_capacity(layout.coord_idx.len());
        for (&idx, &scale) in layout.coord_idx.iter().zip(&layout.scales) {
            let parse_err = |reason: String| IoError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                column: header[idx].clone(),
                reason,
            };
            let value: f64 = fields[idx].parse().map_err(|e| {
                parse_err(format!("cannot parse '{}': {e}", fields[idx]))
            })?;
            let scaled = value * scale;
            if !scaled.is_finite() {
                return Err(parse_err(format!("value '{}' is not finite", fields[idx])));
            }
            coords.push(scaled);
        }

        let stratum = layout
            .group_idx
            .iter()
            .map(|&idx| fields[idx].as_str())
            .collect::<Vec<_>>()
            .join(STRATUM_SEPARATOR);
        points.push(Point::with_payload(fields[0].clone(), coords, stratum));
    }

    info!(path = %path.display(), n_points = points.len(), "read point table");
    Ok(PointTable { layout, points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn default_config_is_valid() {
        let config = ReaderConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.group_columns().is_empty());
        assert_eq!(config.scale("pc1"), 1.0);
    }

    #[test]
    fn config_errors_accumulate() {
        let config = ReaderConfig::default()
            .with_group_columns(["sex", "sex", ""])
            .with_scale("pc1", f64::NAN)
            .with_scale("sex", 2.0);
        match config.validate().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 4);
                assert!(details.contains("listed twice"));
                assert!(details.contains("scale set on group column 'sex'"));
                assert!(details.contains("empty"));
                assert!(details.contains("'pc1'"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn layout_without_groups() {
        let layout =
            TableLayout::from_header(&header(&["iid", "pc1", "pc2"]), &ReaderConfig::default())
                .unwrap();
        assert_eq!(layout.id_column(), "iid");
        assert_eq!(layout.coord_columns(), &["pc1", "pc2"]);
        assert!(!layout.is_grouped());
        assert_eq!(layout.n_columns(), 3);
    }

    #[test]
    fn layout_with_groups_and_scales() {
        let config = ReaderConfig::default()
            .with_group_columns(["site", "sex"])
            .with_scale("pc2", 0.5);
        let layout =
            TableLayout::from_header(&header(&["iid", "sex", "pc1", "site", "pc2"]), &config)
                .unwrap();
        assert_eq!(layout.coord_columns(), &["pc1", "pc2"]);
        assert_eq!(layout.coord_idx, vec![2, 4]);
        assert_eq!(layout.group_idx, vec![3, 1]);
        assert_eq!(layout.scales, vec![1.0, 0.5]);
        assert_eq!(layout.n_columns(), 5);
    }

    #[test]
    fn layout_reports_missing_columns() {
        let config = ReaderConfig::default()
            .with_group_columns(["site"])
            .with_scale("pc9", 2.0);
        let err = TableLayout::from_header(&header(&["iid", "pc1"]), &config).unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("group column 'site' not in header"));
                assert!(details.contains("scaled column 'pc9' not in header"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn layout_rejects_id_only_header() {
        let err = TableLayout::from_header(&header(&["iid"]), &ReaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { count: 1, .. }));
    }

    #[test]
    fn layout_rejects_repeated_column() {
        let err = TableLayout::from_header(&header(&["iid", "pc1", "pc1"]), &ReaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { .. }));
    }

    #[test]
    fn split_fields_strips_carriage_return() {
        assert_eq!(split_fields("a\t1.5\t2\r"), vec!["a", "1.5", "2"]);
    }
}
