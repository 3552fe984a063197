use crate::cli::CheckOptions;
use anyhow::{Result, anyhow};
use lasread_common::geometry::bounding_box::Aabb;
use lasread_common::las::LasDecoder;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::{ops::Range, path::Path};

/// Number of points and their bounds, for a range of points or the whole file.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub nr_points: u64,
    pub bounds: Aabb,
}

pub fn check(options: CheckOptions) -> Result<()> {
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = options.threads {
        pool = pool.num_threads(threads);
    }
    let pool = pool.build()?;

    let summary = pool.install(|| check_file(&options.file, pool.current_num_threads()))?;
    info!("All {} points decoded successfully.", summary.nr_points);
    Ok(())
}

/// Decodes all points of the file in up to `parts` independent ranges.
///
/// Fails, if any range fails to decode, or if the number of decoded points
/// differs from the number of points declared in the header.
pub fn check_file(file: &Path, parts: usize) -> Result<CheckSummary> {
    let header = LasDecoder::open(file)?.header().clone();

    let ranges = header.partition(parts);
    info!(
        "Decoding {} points in {} ranges...",
        header.number_of_point_records,
        ranges.len()
    );
    let summaries = ranges
        .into_par_iter()
        .map(|range| check_range(file, range))
        .collect::<Result<Vec<_>>>()?;

    let mut total = CheckSummary {
        nr_points: 0,
        bounds: Aabb::empty(),
    };
    for summary in &summaries {
        total.nr_points += summary.nr_points;
        total.bounds.extend_aabb(&summary.bounds);
    }

    if total.nr_points != u64::from(header.number_of_point_records) {
        return Err(anyhow!(
            "The header declares {} points, but only {} could be decoded.",
            header.number_of_point_records,
            total.nr_points
        ));
    }
    if !total.bounds.is_empty()
        && !(header.bounds.contains(&total.bounds.min) && header.bounds.contains(&total.bounds.max))
    {
        warn!(
            "Points exceed the bounds declared in the header. (Declared: {:?}, actual: {:?})",
            header.bounds, total.bounds
        );
    }
    Ok(total)
}

fn check_range(file: &Path, range: Range<u64>) -> Result<CheckSummary> {
    debug!("Decoding points {range:?}");
    let mut decoder = LasDecoder::open(file)?;
    decoder.seek_to_point(range.start)?;

    let mut summary = CheckSummary {
        nr_points: 0,
        bounds: Aabb::empty(),
    };
    for _ in range {
        let point = match decoder.read_point()? {
            Some(p) => p,
            None => break,
        };
        summary.nr_points += 1;
        summary.bounds.extend(&point.position);
    }
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::{CheckSummary, check_file};
    use lasread_common::geometry::bounding_box::Aabb;
    use lasread_common::las::test_data::{LasFixture, RawPoint};
    use lasread_common::las::{LasDecoder, ReadLasError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    fn decode_sequentially(file: &NamedTempFile) -> CheckSummary {
        let mut summary = CheckSummary {
            nr_points: 0,
            bounds: Aabb::empty(),
        };
        for point in LasDecoder::open(file.path()).unwrap() {
            summary.nr_points += 1;
            summary.bounds.extend(&point.unwrap().position);
        }
        summary
    }

    #[test]
    fn test_partitions_match_sequential_decode() {
        let fixture = LasFixture::new(1).with_points(23).with_vlr_bytes(40);
        let file = write_file(&fixture.numbered_file());
        let expected = decode_sequentially(&file);
        assert_eq!(expected.nr_points, 23);

        for parts in [1, 4, 7, 100] {
            assert_eq!(check_file(file.path(), parts).unwrap(), expected);
        }
    }

    #[test]
    fn test_fewer_points_than_declared() {
        let fixture = LasFixture::new(0).with_points(10);
        let points: Vec<_> = (0..8).map(RawPoint::numbered).collect();
        let file = write_file(&fixture.file(&points));

        for parts in [1, 3] {
            let err = check_file(file.path(), parts).unwrap_err();
            assert!(err.to_string().contains("declares 10 points"), "{err}");
        }
    }

    #[test]
    fn test_truncated_last_record() {
        let fixture = LasFixture::new(0).with_points(10);
        let mut data = fixture.numbered_file();
        data.truncate(data.len() - 3);
        let file = write_file(&data);

        for parts in [1, 3] {
            let err = check_file(file.path(), parts).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ReadLasError>(),
                Some(ReadLasError::TruncatedRecord { index: 9, .. })
            ));
        }
    }

    #[test]
    fn test_empty_file() {
        let file = write_file(&LasFixture::new(0).numbered_file());
        let summary = check_file(file.path(), 4).unwrap();
        assert_eq!(summary.nr_points, 0);
        assert!(summary.bounds.is_empty());
    }
}
