use crate::geometry::coordinate_system::{CoordinateSystem, PositionGlobal};
use crate::las::ReadLasError;
use byteorder::{ByteOrder, LittleEndian};
use nalgebra::Point3;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Point data record formats this decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointFormat {
    /// Core fields only.
    Format0,

    /// Core fields followed by the gps time.
    Format1,
}

/// Name and byte range of each field in a point record.
/// Format 0 uses all entries except the last one.
const RECORD_FIELDS: [(&str, usize, usize); 10] = [
    ("x", 0, 4),
    ("y", 4, 8),
    ("z", 8, 12),
    ("intensity", 12, 14),
    ("return byte", 14, 15),
    ("classification", 15, 16),
    ("scan angle rank", 16, 17),
    ("user data", 17, 18),
    ("point source id", 18, 20),
    ("gps time", 20, 28),
];

impl PointFormat {
    /// Selects the point format for the format code from a LAS header.
    ///
    /// Codes with the compression bit (0x80) set are rejected together with all
    /// formats other than 0 and 1.
    pub fn new(code: u8) -> Result<Self, ReadLasError> {
        match code {
            0 => Ok(PointFormat::Format0),
            1 => Ok(PointFormat::Format1),
            _ => Err(ReadLasError::UnsupportedPointFormat(code)),
        }
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            PointFormat::Format0 => 0,
            PointFormat::Format1 => 1,
        }
    }

    /// Number of bytes occupied by the fields of this format,
    /// not counting any extra bytes.
    pub fn len(&self) -> u16 {
        match self {
            PointFormat::Format0 => 20,
            PointFormat::Format1 => 28,
        }
    }

    pub fn has_gps_time(&self) -> bool {
        matches!(self, PointFormat::Format1)
    }

    /// Name of the field that the byte at `offset` within a record belongs to.
    pub fn field_at(&self, offset: usize) -> &'static str {
        RECORD_FIELDS
            .iter()
            .take_while(|(_, start, _)| *start < self.len() as usize)
            .find(|(_, start, end)| *start <= offset && offset < *end)
            .map(|(name, _, _)| *name)
            .unwrap_or("extra bytes")
    }
}

impl Display for PointFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_u8())
    }
}

/// The four values packed into the "return byte" of a point record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnFlags {
    pub return_number: u8,
    pub number_of_returns: u8,
    pub scan_direction: bool,
    pub edge_of_flight_line: bool,
}

impl ReturnFlags {
    /// Splits the return byte, most significant bits first:
    /// 3 bits return number, 3 bits number of returns,
    /// 1 bit scan direction flag, 1 bit edge of flight line.
    pub fn unpack(byte: u8) -> Self {
        ReturnFlags {
            return_number: byte >> 5,
            number_of_returns: (byte << 3) >> 5,
            scan_direction: (byte << 6) >> 7 == 1,
            edge_of_flight_line: (byte << 7) >> 7 == 1,
        }
    }
}

/// A decoded point record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LasPoint {
    /// Position in global coordinates (scale and offset already applied).
    pub position: PositionGlobal,
    pub intensity: u16,
    pub return_number: u8,
    pub number_of_returns: u8,
    pub scan_direction: bool,
    pub edge_of_flight_line: bool,
    pub classification: u8,
    pub scan_angle_rank: i8,
    pub user_data: u8,
    pub point_source_id: u16,
    /// Only present for point format 1.
    pub gps_time: Option<f64>,
}

impl LasPoint {
    /// Decodes a single point record.
    ///
    /// The caller must pass at least `format.len()` bytes. The decoder guarantees
    /// this by checking the record length against the format on construction.
    /// Bytes beyond the fields of the format are ignored.
    pub(crate) fn from_record(
        record: &[u8],
        format: PointFormat,
        coordinate_system: &CoordinateSystem,
    ) -> Self {
        debug_assert!(record.len() >= format.len() as usize);

        let raw = Point3::new(
            LittleEndian::read_i32(&record[0..4]),
            LittleEndian::read_i32(&record[4..8]),
            LittleEndian::read_i32(&record[8..12]),
        );
        let flags = ReturnFlags::unpack(record[14]);

        LasPoint {
            position: coordinate_system.decode_position(raw),
            intensity: LittleEndian::read_u16(&record[12..14]),
            return_number: flags.return_number,
            number_of_returns: flags.number_of_returns,
            scan_direction: flags.scan_direction,
            edge_of_flight_line: flags.edge_of_flight_line,
            classification: record[15],
            scan_angle_rank: record[16] as i8,
            user_data: record[17],
            point_source_id: LittleEndian::read_u16(&record[18..20]),
            gps_time: if format.has_gps_time() {
                Some(LittleEndian::read_f64(&record[20..28]))
            } else {
                None
            },
        }
    }
}
