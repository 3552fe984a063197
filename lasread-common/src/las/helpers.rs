use crate::las::ReadLasError;
use std::io;
use std::io::{ErrorKind, Read};

/// Converts a fixed width LAS text field into a string.
///
/// Surrounding whitespace and NUL padding are removed. Bytes that are not valid
/// utf8 are replaced rather than rejected.
pub fn read_las_string(las_str: &[u8]) -> String {
    String::from_utf8_lossy(las_str)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

/// Reads and discards exactly `nr_bytes` bytes.
///
/// Fails with [ErrorKind::UnexpectedEof] if the reader ends early.
pub fn skip_bytes<R: Read + ?Sized>(read: &mut R, nr_bytes: u64) -> io::Result<()> {
    let skipped = io::copy(&mut (&mut *read).take(nr_bytes), &mut io::sink())?;
    if skipped < nr_bytes {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("expected to skip {nr_bytes} bytes, but only {skipped} were available"),
        ));
    }
    Ok(())
}

/// Reads until `buf` is full or the reader is exhausted.
/// Returns the number of bytes that were read.
///
/// In contrast to [Read::read_exact], running out of data is not an error here,
/// so that the caller can tell a clean end of stream (0 bytes) from a short read.
pub fn read_up_to<R: Read + ?Sized>(read: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match read.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Attaches the name of the header field to an unexpected end of file.
/// Other i/o errors are passed through.
pub fn header_field<T>(field: &'static str, result: io::Result<T>) -> Result<T, ReadLasError> {
    result.map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => ReadLasError::TruncatedHeader { field },
        _ => ReadLasError::from(e),
    })
}
