//! Match table and status report writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use kdmatch_knn::{Neighbor, NeighborList};
use tracing::info;

use crate::error::IoError;
use crate::reader::TableLayout;

/// Placeholder ID for an empty slot.
pub const MISSING_ID: &str = "NA";

/// Header of the status report.
pub const STATUS_HEADER: &str = "id\tstatus\tmatched_case_id";

/// Compression applied to match tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Plain text.
    #[default]
    None,
    /// Gzip; `.gz` is appended to the file name.
    Gzip,
}

/// Configuration for writing match tables.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Number of candidate slots rendered per row.
    slots: usize,
    /// Compression algorithm to use.
    compression: Compression,
}

impl WriterConfig {
    /// Creates a configuration rendering `slots` candidates per anchor.
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            compression: Compression::default(),
        }
    }

    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Number of candidate slots per row.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Path actually written for a requested `path`.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match self.compression {
            Compression::None => path.to_path_buf(),
            Compression::Gzip => {
                let mut name = path.as_os_str().to_owned();
                name.push(".gz");
                PathBuf::from(name)
            }
        }
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `slots` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.slots == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "slots must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// A buffered output file, optionally gzip-compressed.
enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Sink {
    fn create(path: &Path, compression: Compression) -> Result<Self, IoError> {
        let file = BufWriter::new(File::create(path).map_err(|e| IoError::io(path, e))?);
        Ok(match compression {
            Compression::None => Sink::Plain(file),
            Compression::Gzip => Sink::Gzip(GzEncoder::new(file, flate2::Compression::default())),
        })
    }

    fn finish(self) -> std::io::Result<()> {
        match self {
            Sink::Plain(mut w) => w.flush(),
            Sink::Gzip(gz) => gz.finish()?.flush(),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}

/// Header row of a match table.
///
/// Anchor ID and coordinate columns, `group` when the layout is grouped, then
/// per slot `control_<i>_id`, `control_<i>_distance`, one
/// `control_<i>_<column>` per coordinate and `control_<i>_group` when grouped,
/// and finally `hungarian_selection`.
pub fn match_header(layout: &TableLayout, slots: usize) -> Vec<String> {
    let mut header = vec![layout.id_column().to_string()];
    header.extend(layout.coord_columns().iter().cloned());
    if layout.is_grouped() {
        header.push("group".to_string());
    }
    for i in 1..=slots {
        header.push(format!("control_{i}_id"));
        header.push(format!("control_{i}_distance"));
        for col in layout.coord_columns() {
            header.push(format!("control_{i}_{col}"));
        }
        if layout.is_grouped() {
            header.push(format!("control_{i}_group"));
        }
    }
    header.push("hungarian_selection".to_string());
    header
}

fn push_slot(fields: &mut Vec<String>, slot: Option<&Neighbor<String>>, dim: usize, grouped: bool) {
    match slot {
        Some(n) => {
            fields.push(n.id().to_string());
            fields.push(n.distance().to_string());
            fields.extend(n.point().coords().iter().map(f64::to_string));
            if grouped {
                fields.push(n.point().payload().clone());
            }
        }
        None => {
            fields.push(MISSING_ID.to_string());
            fields.extend(std::iter::repeat_n(f64::NAN.to_string(), dim + 1));
            if grouped {
                fields.push(MISSING_ID.to_string());
            }
        }
    }
}

/// Renders one match table row.
pub fn match_row(list: &NeighborList<String>, layout: &TableLayout, slots: usize) -> String {
    let dim = layout.coord_columns().len();
    let grouped = layout.is_grouped();
    let anchor = list.anchor();

    let mut fields = Vec::with_capacity(2 + dim + slots * (dim + 3));
    fields.push(anchor.id().to_string());
    fields.extend(anchor.coords().iter().map(f64::to_string));
    if grouped {
        fields.push(anchor.payload().clone());
    }
    for i in 0..slots {
        push_slot(&mut fields, list.neighbors().get(i), dim, grouped);
    }
    fields.push(list.resolved_changed().to_string());
    fields.join("\t")
}

/// Writes a match table with one row per list.
///
/// Returns the path written, which has `.gz` appended under
/// [`Compression::Gzip`]. Slots beyond a list's length are written as
/// [`MISSING_ID`] and `NaN`.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration or
/// [`IoError::Io`] if the file cannot be written.
pub fn write_match_table(
    path: &Path,
    lists: &[NeighborList<String>],
    layout: &TableLayout,
    config: &WriterConfig,
) -> Result<PathBuf, IoError> {
    config.validate()?;
    let path = config.output_path(path);
    let mut sink = Sink::create(&path, config.compression)?;

    let io_err = |e| IoError::io(&path, e);
    writeln!(sink, "{}", match_header(layout, config.slots).join("\t")).map_err(io_err)?;
    for list in lists {
        writeln!(sink, "{}", match_row(list, layout, config.slots)).map_err(io_err)?;
    }
    sink.finish().map_err(io_err)?;

    info!(path = %path.display(), rows = lists.len(), "wrote match table");
    Ok(path)
}

/// Writes the status report: a `case` row per anchor, then a `control` row
/// per selected candidate naming the anchor it went to.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be written.
pub fn write_status(path: &Path, lists: &[NeighborList<String>]) -> Result<(), IoError> {
    let mut sink = Sink::create(path, Compression::None)?;
    let io_err = |e| IoError::io(path, e);

    writeln!(sink, "{STATUS_HEADER}").map_err(io_err)?;
    for list in lists {
        let case = list.anchor().id();
        writeln!(sink, "{case}\tcase\t{case}").map_err(io_err)?;
        for control in list.candidate_ids() {
            writeln!(sink, "{control}\tcontrol\t{case}").map_err(io_err)?;
        }
    }
    sink.finish().map_err(io_err)?;

    info!(path = %path.display(), rows = lists.len(), "wrote status report");
    Ok(())
}
