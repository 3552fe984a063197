use crate::geometry::bounding_box::Aabb;
use crate::geometry::coordinate_system::CoordinateSystem;
use crate::las::helpers::{header_field, read_las_string, skip_bytes};
use crate::las::point::PointFormat;
use crate::las::ReadLasError;
use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::ops::Range;

/// Size of the fixed header block, which is the part of the header parsed by [LasHeader::read_from].
pub const LAS_HEADER_SIZE: u32 = 227;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub fn new(major: u8, minor: u8) -> Self {
        Version { major, minor }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Metadata from the public header block of a LAS file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LasHeader {
    pub version: Version,
    pub system_identifier: String,
    pub generating_software: String,
    pub file_creation_day_of_year: u16,
    pub file_creation_year: u16,
    pub header_size: u16,
    pub offset_to_point_data: u32,
    pub number_of_variable_length_records: u32,
    pub point_data_record_format: u8,
    pub point_data_record_length: u16,
    pub number_of_point_records: u32,
    pub coordinate_system: CoordinateSystem,
    pub bounds: Aabb,
}

impl LasHeader {
    /// Parses the fixed 227 byte header block.
    ///
    /// Afterwards, the reader is positioned at the end of the fixed header,
    /// i.e. at the start of the variable length records (if any).
    /// The point format is not checked here, so this also works for files,
    /// whose points can not be decoded.
    pub fn read_from<R: Read>(read: &mut R) -> Result<Self, ReadLasError> {
        // file signature, file source id, global encoding, project id
        header_field("file signature", skip_bytes(read, 24))?;

        let major = header_field("version major", read.read_u8())?;
        let minor = header_field("version minor", read.read_u8())?;

        let mut text = [0; 32];
        header_field("system identifier", read.read_exact(&mut text))?;
        let system_identifier = read_las_string(&text);
        header_field("generating software", read.read_exact(&mut text))?;
        let generating_software = read_las_string(&text);

        let file_creation_day_of_year =
            header_field("file creation day", read.read_u16::<LittleEndian>())?;
        let file_creation_year =
            header_field("file creation year", read.read_u16::<LittleEndian>())?;
        let header_size = header_field("header size", read.read_u16::<LittleEndian>())?;
        let offset_to_point_data =
            header_field("offset to point data", read.read_u32::<LittleEndian>())?;
        let number_of_variable_length_records = header_field(
            "number of variable length records",
            read.read_u32::<LittleEndian>(),
        )?;
        let point_data_record_format = header_field("point data record format", read.read_u8())?;
        let point_data_record_length =
            header_field("point data record length", read.read_u16::<LittleEndian>())?;
        let number_of_point_records =
            header_field("number of point records", read.read_u32::<LittleEndian>())?;
        header_field("number of points by return", skip_bytes(read, 20))?;

        // transform
        let x_scale = header_field("x scale factor", read.read_f64::<LittleEndian>())?;
        let y_scale = header_field("y scale factor", read.read_f64::<LittleEndian>())?;
        let z_scale = header_field("z scale factor", read.read_f64::<LittleEndian>())?;
        let x_offset = header_field("x offset", read.read_f64::<LittleEndian>())?;
        let y_offset = header_field("y offset", read.read_f64::<LittleEndian>())?;
        let z_offset = header_field("z offset", read.read_f64::<LittleEndian>())?;

        // bounds
        let max_x = header_field("max x", read.read_f64::<LittleEndian>())?;
        let min_x = header_field("min x", read.read_f64::<LittleEndian>())?;
        let max_y = header_field("max y", read.read_f64::<LittleEndian>())?;
        let min_y = header_field("min y", read.read_f64::<LittleEndian>())?;
        let max_z = header_field("max z", read.read_f64::<LittleEndian>())?;
        let min_z = header_field("min z", read.read_f64::<LittleEndian>())?;

        if offset_to_point_data < LAS_HEADER_SIZE {
            return Err(ReadLasError::FileFormat {
                desc: format!(
                    "Offset to point data ({offset_to_point_data}) points into the header (size {LAS_HEADER_SIZE})."
                ),
            });
        }
        if u32::from(header_size) < LAS_HEADER_SIZE {
            warn!("LAS header declares a header size of {header_size} bytes, expected at least {LAS_HEADER_SIZE}.");
        }

        let header = LasHeader {
            version: Version::new(major, minor),
            system_identifier,
            generating_software,
            file_creation_day_of_year,
            file_creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_data_record_format,
            point_data_record_length,
            number_of_point_records,
            coordinate_system: CoordinateSystem::from_las_transform(
                Vector3::new(x_scale, y_scale, z_scale),
                Vector3::new(x_offset, y_offset, z_offset),
            ),
            bounds: Aabb::new(
                Point3::new(min_x, min_y, min_z),
                Point3::new(max_x, max_y, max_z),
            ),
        };
        debug!(
            "Parsed LAS {} header from '{}': {} points in format {}, {} bytes per record.",
            header.version,
            header.generating_software,
            header.number_of_point_records,
            header.point_data_record_format,
            header.point_data_record_length
        );
        Ok(header)
    }

    /// The point format, if it is one that can be decoded.
    pub fn point_format(&self) -> Result<PointFormat, ReadLasError> {
        PointFormat::new(self.point_data_record_format)
    }

    /// Number of bytes between the fixed header and the first point record.
    pub fn vlr_region_len(&self) -> u32 {
        self.offset_to_point_data.saturating_sub(LAS_HEADER_SIZE)
    }

    /// Number of bytes at the end of each point record,
    /// that are not covered by the fields of the point format.
    pub fn extra_bytes(&self) -> Result<u16, ReadLasError> {
        let format = self.point_format()?;
        self.point_data_record_length
            .checked_sub(format.len())
            .ok_or_else(|| ReadLasError::FileFormat {
                desc: format!(
                    "Point data record length ({}) is too small for point format {} ({} bytes).",
                    self.point_data_record_length,
                    format,
                    format.len()
                ),
            })
    }

    /// Byte offset of the point record with the given index.
    /// Returns `None`, if the offset does not fit into 64 bits.
    pub fn point_offset(&self, index: u64) -> Option<u64> {
        index
            .checked_mul(u64::from(self.point_data_record_length))?
            .checked_add(u64::from(self.offset_to_point_data))
    }

    /// Splits the points into at most `parts` contiguous, non-empty ranges of point indices.
    /// The sizes of the ranges differ by at most one.
    pub fn partition(&self, parts: usize) -> Vec<Range<u64>> {
        let nr_points = u64::from(self.number_of_point_records);
        let parts = (parts.max(1) as u64).min(nr_points);
        if parts == 0 {
            return Vec::new();
        }

        let base = nr_points / parts;
        let remainder = nr_points % parts;
        let mut ranges = Vec::with_capacity(parts as usize);
        let mut start = 0;
        for i in 0..parts {
            let len = if i < remainder { base + 1 } else { base };
            ranges.push(start..start + len);
            start += len;
        }
        ranges
    }
}
