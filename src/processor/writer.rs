//! CSV output module for USNO-B1 conversion
//!
//! Owns the output destinations: sequentially numbered CSV files that each
//! start with the schema header. Rotation to the next file is decided
//! between zones only, so the size threshold is a soft cap.

use crate::constants::{OUTPUT_FILE_EXTENSION, OUTPUT_FILE_PREFIX};
use crate::decoder::OutputRecord;
use crate::error::{ConverterError, Result};
use crate::schema::OutputSchema;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writer adapter that counts the bytes passed through it
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Path of output file `index` inside `output_dir`
pub fn output_file_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!(
        "{}{}.{}",
        OUTPUT_FILE_PREFIX, index, OUTPUT_FILE_EXTENSION
    ))
}

/// One open output file
pub struct OutputDestination {
    index: usize,
    path: PathBuf,
    writer: csv::Writer<CountingWriter<BufWriter<File>>>,
}

impl std::fmt::Debug for OutputDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputDestination")
            .field("index", &self.index)
            .field("path", &self.path)
            .field("bytes_written", &self.bytes_written())
            .finish()
    }
}

impl OutputDestination {
    /// Create output file `index` and write the header line to it
    fn create(output_dir: &Path, index: usize, schema: &OutputSchema) -> Result<Self> {
        let path = output_file_path(output_dir, index);
        let file = File::create(&path).map_err(|source| ConverterError::file_io(&path, source))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(CountingWriter::new(BufWriter::new(file)));
        writer.write_record(schema.columns())?;

        Ok(Self {
            index,
            path,
            writer,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes handed to the file so far; exact after `flush`
    pub fn bytes_written(&self) -> u64 {
        self.writer.get_ref().bytes_written()
    }

    pub fn write_record(&mut self, record: &OutputRecord) -> Result<()> {
        self.writer.write_record(record.fields())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|source| ConverterError::file_io(&self.path, source))
    }

    /// Flush and close the file, returning its final size
    pub fn close(mut self) -> Result<u64> {
        self.flush()?;
        let counting = self
            .writer
            .into_inner()
            .map_err(|error| ConverterError::file_io(&self.path, error.into_error()))?;
        let bytes = counting.bytes_written();
        counting
            .into_inner()
            .into_inner()
            .map_err(|error| ConverterError::file_io(&self.path, error.into_error()))?
            .sync_all()
            .map_err(|source| ConverterError::file_io(&self.path, source))?;

        debug!("Closed {} ({} bytes)", self.path.display(), bytes);
        Ok(bytes)
    }
}

/// Rotation policy for output destinations
#[derive(Debug, Clone)]
pub struct OutputRotator<'a> {
    output_dir: PathBuf,
    schema: &'a OutputSchema,
    threshold_bytes: u64,
}

impl<'a> OutputRotator<'a> {
    pub fn new(output_dir: impl Into<PathBuf>, schema: &'a OutputSchema, threshold_bytes: u64) -> Self {
        Self {
            output_dir: output_dir.into(),
            schema,
            threshold_bytes,
        }
    }

    /// Create the output directory and open destination 0
    pub fn open_first(&self) -> Result<OutputDestination> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|source| ConverterError::file_io(&self.output_dir, source))?;
        self.open(0)
    }

    fn open(&self, index: usize) -> Result<OutputDestination> {
        let destination = OutputDestination::create(&self.output_dir, index, self.schema)?;
        info!("Started output file {}", destination.path().display());
        Ok(destination)
    }

    /// Called before each zone: once the active destination has reached the
    /// threshold it is closed and the next numbered one takes its place.
    pub fn rotate_if_needed(&self, mut active: OutputDestination) -> Result<OutputDestination> {
        active.flush()?;
        if active.bytes_written() < self.threshold_bytes {
            return Ok(active);
        }

        let next_index = active.index() + 1;
        let closed_bytes = active.close()?;
        debug!(
            "Output file {} reached {} bytes (threshold {})",
            next_index - 1,
            closed_bytes,
            self.threshold_bytes
        );
        self.open(next_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn header_bytes(schema: &OutputSchema) -> u64 {
        schema.header_line().len() as u64 + 1
    }

    #[test]
    fn test_counting_writer() {
        let mut writer = CountingWriter::new(Vec::new());
        writer.write_all(b"hello").unwrap();
        writer.write_all(b", world\n").unwrap();
        assert_eq!(writer.bytes_written(), 13);
        assert_eq!(writer.into_inner(), b"hello, world\n");
    }

    #[test]
    fn test_output_file_naming() {
        let path = output_file_path(Path::new("out"), 3);
        assert_eq!(path, Path::new("out").join("usno-b1-3.csv"));
    }

    #[test]
    fn test_first_destination_starts_with_header() {
        let temp_dir = TempDir::new().unwrap();
        let schema = OutputSchema::usno_b1();
        let rotator = OutputRotator::new(temp_dir.path().join("run"), &schema, 1024);

        let mut destination = rotator.open_first().unwrap();
        destination.flush().unwrap();
        assert_eq!(destination.index(), 0);
        assert_eq!(destination.bytes_written(), header_bytes(&schema));

        let path = destination.path().to_path_buf();
        let closed = destination.close().unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("{}\n", schema.header_line()));
        assert_eq!(closed, contents.len() as u64);
    }

    #[test]
    fn test_no_rotation_below_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let schema = OutputSchema::usno_b1();
        let rotator = OutputRotator::new(temp_dir.path(), &schema, header_bytes(&schema) + 1);

        let destination = rotator.open_first().unwrap();
        let destination = rotator.rotate_if_needed(destination).unwrap();
        assert_eq!(destination.index(), 0);
        assert!(!output_file_path(temp_dir.path(), 1).exists());
    }

    #[test]
    fn test_rotation_at_threshold_opens_next_file_with_header() {
        let temp_dir = TempDir::new().unwrap();
        let schema = OutputSchema::usno_b1();
        let rotator = OutputRotator::new(temp_dir.path(), &schema, header_bytes(&schema));

        let first = rotator.open_first().unwrap();
        let second = rotator.rotate_if_needed(first).unwrap();
        assert_eq!(second.index(), 1);
        second.close().unwrap();

        for index in 0..2 {
            let contents = fs::read_to_string(output_file_path(temp_dir.path(), index)).unwrap();
            assert_eq!(contents.lines().next(), Some(schema.header_line().as_str()));
        }
    }
}
