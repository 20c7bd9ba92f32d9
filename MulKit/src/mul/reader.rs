//! MUL data/index file pair reader

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{Entry, EntryTable, IndexFormat};
use crate::error::{Error, Result};

/// Reader over a paired data file and index file
pub struct MulReader<R: Read + Seek = File> {
    data: BufReader<R>,
    index: BufReader<R>,
    data_len: u64,
    entry_count: usize,
    format: IndexFormat,
    /// Path of the data file, when opened from disk
    data_path: Option<PathBuf>,
}

/// Fail with [`Error::FileNotFound`] unless `path` is an existing file
pub(crate) fn ensure_file_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

impl MulReader<File> {
    /// Open a data/index pair from disk
    ///
    /// # Errors
    /// Returns [`Error::FileNotFound`] if either file is missing, or an IO
    /// error if one cannot be opened.
    pub fn open(
        data_path: impl AsRef<Path>,
        index_path: impl AsRef<Path>,
        entry_count: usize,
        format: IndexFormat,
    ) -> Result<Self> {
        let data_path = data_path.as_ref();
        let index_path = index_path.as_ref();
        ensure_file_exists(data_path)?;
        ensure_file_exists(index_path)?;

        let mut reader = Self::new(
            File::open(data_path)?,
            File::open(index_path)?,
            entry_count,
            format,
        )?;
        reader.data_path = Some(data_path.to_path_buf());

        tracing::debug!(
            "Opened MUL pair {} / {} ({} bytes, {} records expected)",
            data_path.display(),
            index_path.display(),
            reader.data_len,
            entry_count
        );

        Ok(reader)
    }
}

impl<R: Read + Seek> MulReader<R> {
    /// Create a reader over any seekable data/index sources
    ///
    /// # Errors
    /// Returns an error if the data source length cannot be determined.
    pub fn new(data: R, index: R, entry_count: usize, format: IndexFormat) -> Result<Self> {
        let mut data = BufReader::new(data);
        let data_len = data.seek(SeekFrom::End(0))?;
        data.seek(SeekFrom::Start(0))?;

        Ok(Self {
            data,
            index: BufReader::new(index),
            data_len,
            entry_count,
            format,
            data_path: None,
        })
    }

    /// Length of the data file in bytes
    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    /// Number of index records this reader expects
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn format(&self) -> IndexFormat {
        self.format
    }

    /// Path of the data file, if opened from disk
    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Move the data cursor to `offset`
    ///
    /// # Errors
    /// Returns [`Error::SeekOutOfRange`] if `offset` is past the end of the
    /// data file.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.data_len {
            return Err(Error::SeekOutOfRange {
                offset,
                len: self.data_len,
            });
        }
        self.data.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Current position of the data cursor
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.data.stream_position()?)
    }

    /// Read one little-endian `u16` from the data file
    pub fn read_u16(&mut self) -> Result<u16> {
        self.data
            .read_u16::<LittleEndian>()
            .map_err(Error::from_read)
    }

    /// Read one little-endian `i32` from the data file
    pub fn read_i32(&mut self) -> Result<i32> {
        self.data
            .read_i32::<LittleEndian>()
            .map_err(Error::from_read)
    }

    /// Fill `dst` with consecutive little-endian `u16` values
    pub fn read_u16_into(&mut self, dst: &mut [u16]) -> Result<()> {
        self.data
            .read_u16_into::<LittleEndian>(dst)
            .map_err(Error::from_read)
    }

    /// Read index records into `table`, one per slot, starting at slot 0.
    ///
    /// Reads at most `entry_count` records, fewer if the index file is short
    /// or the table is smaller. Slots past the last record read are reset to
    /// [`Entry::EMPTY`]. A trailing partial record is ignored.
    ///
    /// Returns the number of records read.
    pub fn fill_entries(&mut self, table: &mut EntryTable) -> Result<usize> {
        let index_len = self.index.seek(SeekFrom::End(0))?;
        self.index.seek(SeekFrom::Start(0))?;

        let record_size = self.format.record_size() as u64;
        let available = usize::try_from(index_len / record_size).unwrap_or(usize::MAX);
        let count = self.entry_count.min(available).min(table.capacity());

        if count < self.entry_count {
            tracing::debug!(
                "Index holds {} of {} expected records ({} bytes)",
                available,
                self.entry_count,
                index_len
            );
        }

        let format = self.format;
        let entries = table.entries_mut();
        for slot in entries.iter_mut().take(count) {
            *slot = read_record(&mut self.index, format)?;
        }
        for slot in entries.iter_mut().skip(count) {
            *slot = Entry::EMPTY;
        }

        Ok(count)
    }
}

/// Parse a single index record
fn read_record<R: Read>(reader: &mut R, format: IndexFormat) -> Result<Entry> {
    let offset = match format {
        IndexFormat::Classic => u64::from(
            reader
                .read_u32::<LittleEndian>()
                .map_err(Error::from_read)?,
        ),
        IndexFormat::Extended => reader
            .read_u64::<LittleEndian>()
            .map_err(Error::from_read)?,
    };
    let length = reader.read_i32::<LittleEndian>().map_err(Error::from_read)?;
    let extra = reader.read_i32::<LittleEndian>().map_err(Error::from_read)?;

    Ok(Entry {
        offset,
        length,
        extra,
    })
}
