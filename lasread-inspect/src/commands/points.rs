use crate::cli::PointsOptions;
use anyhow::Result;
use lasread_common::las::LasDecoder;
use log::{debug, info};
use std::io::{BufWriter, Write, stdout};

pub fn points(options: PointsOptions) -> Result<()> {
    let mut decoder = LasDecoder::open(&options.file)?;
    debug!("Header: {:?}", decoder.header());
    if options.start > 0 {
        decoder.seek_to_point(options.start)?;
    }

    let limit = options.limit.unwrap_or(u64::MAX);
    let mut out = BufWriter::new(stdout().lock());
    for point in decoder.by_ref().take(limit.try_into().unwrap_or(usize::MAX)) {
        serde_json::to_writer(&mut out, &point?)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!("Printed {} points.", decoder.points_read());
    Ok(())
}
