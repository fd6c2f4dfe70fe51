//! The seam to the snapshot reader.
//!
//! Parsing the on-disk layout is not this crate's concern: a
//! [`SnapshotDecoder`] turns one path into a [`DecodedSnapshot`] and
//! [`SimulationData::from_sequence`](crate::SimulationData::from_sequence)
//! drives it over a [`SnapshotNames`] listing.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::snapshot::DecodedSnapshot;

// ── DecodeError ────────────────────────────────────────────────────

/// Errors reported by a [`SnapshotDecoder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// No snapshot exists at the path.
    NotFound {
        /// The requested path.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    Io {
        /// The requested path.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },
    /// The file was read but its contents are not a valid snapshot.
    Malformed {
        /// The requested path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "no snapshot at {}", path.display()),
            Self::Io { path, reason } => write!(f, "reading {}: {reason}", path.display()),
            Self::Malformed { path, reason } => {
                write!(f, "malformed snapshot {}: {reason}", path.display())
            }
        }
    }
}

impl Error for DecodeError {}

// ── SnapshotDecoder ────────────────────────────────────────────────

/// Reads one snapshot file into decoded payloads.
pub trait SnapshotDecoder {
    /// Decode the snapshot stored at `path`.
    fn decode(&self, path: &Path) -> Result<DecodedSnapshot, DecodeError>;
}

impl<F> SnapshotDecoder for F
where
    F: Fn(&Path) -> Result<DecodedSnapshot, DecodeError>,
{
    fn decode(&self, path: &Path) -> Result<DecodedSnapshot, DecodeError> {
        self(path)
    }
}

// ── SnapshotNames ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
enum Stem {
    Number(u32),
    Text(String),
}

/// File names for a sequence of snapshots.
///
/// Each name is `directory / basename + header + number + footer +
/// extension`, with the number zero-padded to `width` digits. The
/// geometry file shares the directory and basename:
/// `basename + "hdf5_grd_" + geometry_number`.
///
/// # Examples
///
/// ```
/// use amrio_sim::SnapshotNames;
/// use std::path::PathBuf;
///
/// let names = SnapshotNames::from_numbers([0, 1])
///     .directory("../out")
///     .basename("INS_Cavity_")
///     .header("hdf5_plt_cnt_");
/// assert_eq!(
///     names.paths(),
///     vec![
///         PathBuf::from("../out/INS_Cavity_hdf5_plt_cnt_0000"),
///         PathBuf::from("../out/INS_Cavity_hdf5_plt_cnt_0001"),
///     ]
/// );
/// assert_eq!(names.geometry_path(), PathBuf::from("../out/INS_Cavity_hdf5_grd_0000"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotNames {
    stems: Vec<Stem>,
    directory: PathBuf,
    basename: String,
    header: String,
    footer: String,
    extension: String,
    width: usize,
    geometry_number: u32,
}

impl SnapshotNames {
    /// Default zero-padding width for numbered names.
    pub const DEFAULT_WIDTH: usize = 4;

    fn with_stems(stems: Vec<Stem>, width: usize) -> Self {
        Self {
            stems,
            directory: PathBuf::new(),
            basename: String::new(),
            header: String::new(),
            footer: String::new(),
            extension: String::new(),
            width,
            geometry_number: 0,
        }
    }

    /// Names built from output file numbers.
    pub fn from_numbers(numbers: impl IntoIterator<Item = u32>) -> Self {
        Self::with_stems(
            numbers.into_iter().map(Stem::Number).collect(),
            Self::DEFAULT_WIDTH,
        )
    }

    /// Names built from explicit stems, inserted verbatim where the number
    /// would go. The geometry number is not padded.
    pub fn from_strings<S: Into<String>>(stems: impl IntoIterator<Item = S>) -> Self {
        Self::with_stems(stems.into_iter().map(|s| Stem::Text(s.into())).collect(), 0)
    }

    /// Directory holding the files.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Leading text shared with the geometry file.
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// Text between the basename and the number.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Text after the number.
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// File extension, including the leading dot.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Zero-padding width for numbers.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Number of the geometry file.
    pub fn geometry_number(mut self, number: u32) -> Self {
        self.geometry_number = number;
        self
    }

    /// Number of snapshot files.
    pub fn len(&self) -> usize {
        self.stems.len()
    }

    /// Returns `true` if no files are listed.
    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Full snapshot paths in listing order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.stems
            .iter()
            .map(|stem| {
                let stem = match stem {
                    Stem::Number(n) => format!("{n:0width$}", width = self.width),
                    Stem::Text(s) => s.clone(),
                };
                self.directory.join(format!(
                    "{}{}{stem}{}{}",
                    self.basename, self.header, self.footer, self.extension
                ))
            })
            .collect()
    }

    /// Path of the geometry file.
    pub fn geometry_path(&self) -> PathBuf {
        self.directory.join(format!(
            "{}hdf5_grd_{:0width$}",
            self.basename,
            self.geometry_number,
            width = self.width
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_padded() {
        let names = SnapshotNames::from_numbers([7, 12345])
            .header("plt_")
            .extension(".h5");
        assert_eq!(
            names.paths(),
            vec![PathBuf::from("plt_0007.h5"), PathBuf::from("plt_12345.h5")]
        );
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn strings_are_verbatim() {
        let names = SnapshotNames::from_strings(["a", "final"])
            .directory("run")
            .footer("_x")
            .geometry_number(3);
        assert_eq!(
            names.paths(),
            vec![PathBuf::from("run/a_x"), PathBuf::from("run/final_x")]
        );
        assert_eq!(names.geometry_path(), PathBuf::from("run/hdf5_grd_3"));
    }

    #[test]
    fn decode_errors_name_the_path() {
        let err = DecodeError::Malformed {
            path: PathBuf::from("x.h5"),
            reason: "no blocks".into(),
        };
        assert_eq!(err.to_string(), "malformed snapshot x.h5: no blocks");
    }
}
