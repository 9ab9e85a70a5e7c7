//! Line source abstraction for flexible log ingestion.
//!
//! The parser only needs a stream of raw lines; this trait abstracts over
//! where they come from so the pipeline works with log files, in-memory
//! fixtures for tests, or anything else that can yield lines.
//!
//! # Example
//!
//! ```no_run
//! use tradelog_reconstructor::source::{FileSource, LineSource};
//! use tradelog_reconstructor::parser::parse_source;
//!
//! let source = FileSource::new("Cache_BERAUSDT_0.csv")?;
//! println!("symbol: {:?}", source.metadata().symbol);
//! let data = parse_source(source)?;
//! # Ok::<(), tradelog_reconstructor::TradelogError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::{Result, TradelogError};

/// I/O buffer size for file reading.
///
/// The default `BufReader` capacity is 8KB; activity logs run to hundreds
/// of megabytes, so a larger buffer cuts syscall overhead on the
/// line-by-line read.
pub const IO_BUFFER_SIZE: usize = 1024 * 1024; // 1 MB

// ============================================================================
// Source Metadata
// ============================================================================

/// Metadata about a log source, useful for logging and for organizing
/// downstream chart output.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    /// Trading symbol, when it can be inferred (e.g. "BERAUSDT").
    pub symbol: Option<String>,

    /// Original file path (if the source is a file).
    pub file_path: Option<PathBuf>,

    /// File size in bytes (if applicable).
    pub file_size: Option<u64>,
}

impl SourceMetadata {
    /// Create new empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract metadata from a file path.
    ///
    /// The producing system names its logs `Cache_<SYMBOL>_<N>.csv`; the
    /// symbol is pulled out of that pattern when it matches.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut metadata = Self::new();
        metadata.file_path = Some(path.to_path_buf());

        if let Ok(meta) = std::fs::metadata(path) {
            metadata.file_size = Some(meta.len());
        }

        if let Some(stem) = path.file_stem().and_then(|n| n.to_str()) {
            // Pattern: Cache_SYMBOL_N
            let mut parts = stem.split('_');
            if parts.next() == Some("Cache") {
                if let Some(symbol) = parts.next() {
                    if !symbol.is_empty() {
                        metadata.symbol = Some(symbol.to_string());
                    }
                }
            }
        }

        metadata
    }
}

// ============================================================================
// Line Source Trait
// ============================================================================

/// Trait for raw log line sources.
///
/// `lines()` consumes `self` to allow single-pass iteration; metadata
/// should be inspected before that.
pub trait LineSource {
    /// Iterator over raw lines.
    type Lines: Iterator<Item = String>;

    /// Consume the source and yield its lines.
    fn lines(self) -> Result<Self::Lines>;

    /// Metadata about this source.
    fn metadata(&self) -> &SourceMetadata;
}

// ============================================================================
// File Source
// ============================================================================

/// A line source backed by a log file on disk.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    metadata: SourceMetadata,
}

impl FileSource {
    /// Create a file source.
    ///
    /// Returns [`TradelogError::MissingSource`] when the file does not
    /// exist — the caller-facing "no data" outcome.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(TradelogError::MissingSource(path));
        }
        let metadata = SourceMetadata::from_path(&path);
        Ok(Self { path, metadata })
    }

    /// The resolved file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileSource {
    type Lines = FileLines;

    fn lines(self) -> Result<Self::Lines> {
        let file = File::open(&self.path)
            .map_err(|e| TradelogError::generic(format!("Failed to open file: {e}")))?;
        let reader = BufReader::with_capacity(IO_BUFFER_SIZE, file);
        Ok(FileLines {
            inner: reader.lines(),
        })
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

/// Iterator over the lines of an open log file.
///
/// A read error mid-file ends the stream: the lines read so far still
/// parse, which beats discarding the whole dataset over a truncated tail.
pub struct FileLines {
    inner: Lines<BufReader<File>>,
}

impl Iterator for FileLines {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(line) => Some(line),
            Err(e) => {
                log::warn!("stopping read after I/O error: {e}");
                None
            }
        }
    }
}

// ============================================================================
// Vec Source
// ============================================================================

/// An in-memory line source, mainly for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    lines: Vec<String>,
    metadata: SourceMetadata,
}

impl VecSource {
    /// Create a source from a collection of lines.
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            metadata: SourceMetadata::new(),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl LineSource for VecSource {
    type Lines = std::vec::IntoIter<String>;

    fn lines(self) -> Result<Self::Lines> {
        Ok(self.lines.into_iter())
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

// ============================================================================
// Tests
// ============================================================================
