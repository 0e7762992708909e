//! Positional I/O loops
//!
//! Offset-addressed reads and writes that retry short transfers until
//! the full count moves or a real error surfaces. Positional access
//! never touches the file cursor, so one `&File` can be shared across
//! encode workers without locking.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::os::unix::fs::FileExt;

/// Read up to `buf.len()` bytes at `offset`, retrying short reads.
///
/// Returns the number of bytes read; a short count only means end of
/// file.
pub fn read_full_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut done = 0;
    while done < buf.len() {
        match file.read_at(&mut buf[done..], offset + done as u64) {
            Ok(0) => break, // EOF
            Ok(n) => done += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(done)
}

/// Fill `buf` from `offset`, zero-padding whatever lies past end of
/// file. Backs the encoder's explicit tail-padding policy.
pub fn read_at_zero_padded(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    let n = read_full_at(file, buf, offset)?;
    buf[n..].fill(0);
    Ok(())
}

/// Write all of `buf` at `offset`, retrying short writes.
pub fn write_full_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    let mut done = 0;
    while done < buf.len() {
        match file.write_at(&buf[done..], offset + done as u64) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "write_at returned zero bytes",
                ))
            }
            Ok(n) => done += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
