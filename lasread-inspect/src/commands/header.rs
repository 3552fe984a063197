use crate::cli::HeaderOptions;
use anyhow::Result;
use lasread_common::las::header::LasHeader;
use log::{info, warn};
use std::{
    fs::File,
    io::{BufReader, Read, Write, stdout},
};

pub fn header(options: HeaderOptions) -> Result<()> {
    let mut read = BufReader::new(File::open(&options.file)?);
    write_header_json(&mut read, stdout().lock())
}

/// Parses the header and writes it as pretty printed json.
///
/// Problems that only affect the point records are logged, the header is written anyway.
fn write_header_json(read: &mut impl Read, mut out: impl Write) -> Result<()> {
    let header = LasHeader::read_from(read)?;

    match header.point_format().and_then(|f| Ok((f, header.extra_bytes()?))) {
        Ok((format, extra_bytes)) => info!(
            "Point format {format}: {} points, {extra_bytes} extra bytes per record.",
            header.number_of_point_records,
        ),
        Err(e) => warn!("{e}"),
    }

    serde_json::to_writer_pretty(&mut out, &header)?;
    writeln!(out)?;
    Ok(())
}
