mod helpers;
pub mod header;
pub mod point;
#[cfg(any(test, feature = "test-data"))]
pub mod test_data;

use crate::las::header::LasHeader;
use crate::las::helpers::{header_field, read_up_to, skip_bytes};
use crate::las::point::{LasPoint, PointFormat};
use log::{debug, trace, warn};
use std::fs::File;
use std::iter::FusedIterator;
use std::io::{BufReader, Error, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ReadLasError {
    #[error(transparent)]
    Io(Arc<std::io::Error>), // std::io::Error is not Clone. Wrapping it in an Arc allows us to make ReadLasError Clone.
    #[error("Truncated LAS header: unexpected end of file while reading the {field}")]
    TruncatedHeader { field: &'static str },
    #[error("Bad LAS file: {desc}")]
    FileFormat { desc: String },
    #[error("Point data record format {0} is not supported. (Only formats 0 and 1 can be decoded)")]
    UnsupportedPointFormat(u8),
    #[error("Truncated point record #{index}: unexpected end of file while reading the {field}")]
    TruncatedRecord { index: u64, field: &'static str },
}

impl From<std::io::Error> for ReadLasError {
    fn from(e: Error) -> Self {
        ReadLasError::Io(Arc::new(e))
    }
}

#[derive(Debug)]
enum DecoderState {
    Ready,
    EndOfStream,
    Failed(ReadLasError),
}

/// Sequential reader for the point records of a LAS file.
///
/// The header is parsed on construction. Afterwards, each call to
/// [LasDecoder::read_point] decodes the next point record, until the
/// underlying reader runs out of data. The decoder also is an [Iterator]
/// over the points, which ends after the last point or after the first error.
///
/// Reads are issued directly on the given reader, so files should be wrapped
/// in a [BufReader] (see [LasDecoder::open]).
#[derive(Debug)]
pub struct LasDecoder<R> {
    read: R,
    header: LasHeader,
    format: PointFormat,
    record: Vec<u8>,
    next_index: u64,
    points_read: u64,
    state: DecoderState,
}

impl LasDecoder<BufReader<File>> {
    /// Opens the LAS file at the given path for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReadLasError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> LasDecoder<R> {
    /// Parses the LAS header and skips to the first point record.
    pub fn new(mut read: R) -> Result<Self, ReadLasError> {
        let header = LasHeader::read_from(&mut read)?;
        let format = header.point_format()?;
        let extra_bytes = header.extra_bytes()?;
        if extra_bytes > 0 {
            debug!("Point records carry {extra_bytes} extra bytes, which will be skipped.");
        }

        let vlr_region_len = header.vlr_region_len();
        if vlr_region_len > 0 {
            debug!(
                "Skipping {vlr_region_len} bytes of variable length records ({} records declared).",
                header.number_of_variable_length_records
            );
            header_field("variable length records", skip_bytes(&mut read, vlr_region_len.into()))?;
        }

        let record = vec![0; header.point_data_record_length as usize];
        Ok(LasDecoder {
            read,
            header,
            format,
            record,
            next_index: 0,
            points_read: 0,
            state: DecoderState::Ready,
        })
    }

    pub fn header(&self) -> &LasHeader {
        &self.header
    }

    pub fn point_format(&self) -> PointFormat {
        self.format
    }

    /// Number of points that have been decoded by this decoder so far.
    pub fn points_read(&self) -> u64 {
        self.points_read
    }

    /// Reads the next point record.
    ///
    /// Returns `Ok(None)` if the reader is exhausted exactly at a record boundary.
    /// If the reader ends in the middle of a record, a [ReadLasError::TruncatedRecord]
    /// is returned instead.
    /// After an error, the position of the decoder is unknown, so
    /// every further call returns the same error again.
    pub fn read_point(&mut self) -> Result<Option<LasPoint>, ReadLasError> {
        match &self.state {
            DecoderState::Ready => (),
            DecoderState::EndOfStream => return Ok(None),
            DecoderState::Failed(e) => return Err(e.clone()),
        }

        match self.decode_next() {
            Ok(Some(point)) => {
                self.next_index += 1;
                self.points_read += 1;
                Ok(Some(point))
            }
            Ok(None) => {
                let declared = u64::from(self.header.number_of_point_records);
                if self.next_index < declared {
                    warn!(
                        "LAS point data ended after {} points, but the header declares {declared} points.",
                        self.next_index
                    );
                }
                self.state = DecoderState::EndOfStream;
                Ok(None)
            }
            Err(e) => {
                self.state = DecoderState::Failed(e.clone());
                Err(e)
            }
        }
    }

    fn decode_next(&mut self) -> Result<Option<LasPoint>, ReadLasError> {
        let filled = read_up_to(&mut self.read, &mut self.record)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < self.record.len() {
            return Err(ReadLasError::TruncatedRecord {
                index: self.next_index,
                field: self.format.field_at(filled),
            });
        }
        Ok(Some(LasPoint::from_record(
            &self.record,
            self.format,
            &self.header.coordinate_system,
        )))
    }

    pub fn into_inner(self) -> R {
        self.read
    }
}

impl<R: Read + Seek> LasDecoder<R> {
    /// Positions the decoder at the start of the point record with the given index.
    ///
    /// Seeking past the last point is allowed, subsequent reads then report the end of the stream.
    /// An index, whose byte offset overflows, is rejected with [ErrorKind::InvalidInput]
    /// and leaves the decoder where it was.
    pub fn seek_to_point(&mut self, index: u64) -> Result<(), ReadLasError> {
        if let DecoderState::Failed(e) = &self.state {
            return Err(e.clone());
        }
        let offset = self.header.point_offset(index).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Byte offset of point #{index} is out of range."),
            )
        })?;
        trace!("Seeking to point #{index} at byte offset {offset}.");
        self.read.seek(SeekFrom::Start(offset))?;
        self.next_index = index;
        self.state = DecoderState::Ready;
        Ok(())
    }
}

impl<R: Read> Iterator for LasDecoder<R> {
    type Item = Result<LasPoint, ReadLasError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let DecoderState::Failed(_) = self.state {
            return None;
        }
        self.read_point().transpose()
    }
}

impl<R: Read> FusedIterator for LasDecoder<R> {}
