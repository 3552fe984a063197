//! Hand-built LAS files for tests.

use byteorder::{LittleEndian, WriteBytesExt};

/// Builder for a LAS 1.2 file with known header values.
///
/// Scale is (0.01, 0.01, 0.001), offset is (500, -20, 3.5),
/// bounds are (400, -50, 0) to (600, 10, 100).
#[derive(Debug, Clone)]
pub struct LasFixture {
    point_format: u8,
    record_length: u16,
    number_of_points: u32,
    vlr_bytes: usize,
    offset_to_point_data: Option<u32>,
}

/// Raw values of one point record.
#[derive(Debug, Clone, Default)]
pub struct RawPoint {
    pub xyz: [i32; 3],
    pub intensity: u16,
    pub return_byte: u8,
    pub classification: u8,
    pub scan_angle_rank: i8,
    pub user_data: u8,
    pub point_source_id: u16,
    pub gps_time: f64,
}

impl RawPoint {
    /// Point with distinct values in every field, derived from `i`.
    pub fn numbered(i: u32) -> Self {
        RawPoint {
            xyz: [1000 + i as i32, -2000 - i as i32, 3 * i as i32],
            intensity: 100 + i as u16,
            return_byte: (i % 256) as u8,
            classification: 2,
            scan_angle_rank: -(i as i8 % 90),
            user_data: 7,
            point_source_id: 4711,
            gps_time: 1000.5 + i as f64,
        }
    }
}

impl LasFixture {
    pub fn new(point_format: u8) -> Self {
        let record_length = match point_format {
            0 => 20,
            1 => 28,
            2 => 26,
            3 => 34,
            _ => 20,
        };
        LasFixture {
            point_format,
            record_length,
            number_of_points: 0,
            vlr_bytes: 0,
            offset_to_point_data: None,
        }
    }

    pub fn with_points(mut self, number_of_points: u32) -> Self {
        self.number_of_points = number_of_points;
        self
    }

    pub fn with_record_length(mut self, record_length: u16) -> Self {
        self.record_length = record_length;
        self
    }

    /// Adds a region of opaque bytes between the header and the point data.
    pub fn with_vlr_bytes(mut self, vlr_bytes: usize) -> Self {
        self.vlr_bytes = vlr_bytes;
        self
    }

    /// Overrides the offset to point data, that is otherwise derived from the vlr bytes.
    pub fn with_offset_to_point_data(mut self, offset: u32) -> Self {
        self.offset_to_point_data = Some(offset);
        self
    }

    pub fn header(&self) -> Vec<u8> {
        let mut wr = Vec::new();
        self.write_header(&mut wr).unwrap(); // unwrap: Vec does not produce i/o errors
        wr
    }

    fn write_header(&self, wr: &mut Vec<u8>) -> std::io::Result<()> {
        wr.extend_from_slice(b"LASF");
        wr.extend_from_slice(&[0; 20]);
        wr.write_u8(1)?;
        wr.write_u8(2)?;
        wr.extend_from_slice(&fixed_width(b"LASREAD TEST", 0));
        wr.extend_from_slice(&fixed_width(b"  lasread fixture", b' '));
        wr.write_u16::<LittleEndian>(42)?;
        wr.write_u16::<LittleEndian>(2024)?;
        wr.write_u16::<LittleEndian>(227)?;
        let offset = self
            .offset_to_point_data
            .unwrap_or(227 + self.vlr_bytes as u32);
        wr.write_u32::<LittleEndian>(offset)?;
        wr.write_u32::<LittleEndian>(if self.vlr_bytes > 0 { 1 } else { 0 })?;
        wr.write_u8(self.point_format)?;
        wr.write_u16::<LittleEndian>(self.record_length)?;
        wr.write_u32::<LittleEndian>(self.number_of_points)?;
        wr.write_u32::<LittleEndian>(self.number_of_points)?;
        wr.extend_from_slice(&[0; 16]);
        for value in [0.01, 0.01, 0.001, 500.0, -20.0, 3.5] {
            wr.write_f64::<LittleEndian>(value)?;
        }
        for value in [600.0, 400.0, 10.0, -50.0, 100.0, 0.0] {
            wr.write_f64::<LittleEndian>(value)?;
        }
        Ok(())
    }

    /// Encodes one point record, including gps time (format 1) and extra bytes.
    pub fn record(&self, point: &RawPoint) -> Vec<u8> {
        let mut wr = Vec::with_capacity(self.record_length as usize);
        self.write_record(&mut wr, point).unwrap(); // unwrap: Vec does not produce i/o errors
        wr
    }

    fn write_record(&self, wr: &mut Vec<u8>, point: &RawPoint) -> std::io::Result<()> {
        for c in point.xyz {
            wr.write_i32::<LittleEndian>(c)?;
        }
        wr.write_u16::<LittleEndian>(point.intensity)?;
        wr.write_u8(point.return_byte)?;
        wr.write_u8(point.classification)?;
        wr.write_i8(point.scan_angle_rank)?;
        wr.write_u8(point.user_data)?;
        wr.write_u16::<LittleEndian>(point.point_source_id)?;
        if self.point_format == 1 {
            wr.write_f64::<LittleEndian>(point.gps_time)?;
        }
        while wr.len() < self.record_length as usize {
            wr.write_u8(0xAB)?;
        }
        Ok(())
    }

    /// Complete file: header, vlr region filled with garbage, point records.
    pub fn file(&self, points: &[RawPoint]) -> Vec<u8> {
        let mut data = self.header();
        data.extend((0..self.vlr_bytes).map(|i| (i % 251) as u8 ^ 0x5A));
        for point in points {
            data.extend(self.record(point));
        }
        data
    }

    /// Complete file with `number_of_points` numbered points.
    pub fn numbered_file(&self) -> Vec<u8> {
        let points: Vec<_> = (0..self.number_of_points).map(RawPoint::numbered).collect();
        self.file(&points)
    }
}

fn fixed_width(text: &[u8], padding: u8) -> [u8; 32] {
    let mut field = [padding; 32];
    field[..text.len()].copy_from_slice(text);
    field
}
