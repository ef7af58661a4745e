//! Chunked streaming copy used by the copy-then-delete fallback.
//!
//! - Reads the source in fixed-size chunks and writes each chunk straight to
//!   the destination (created or truncated; the caller has already checked it
//!   is writable).
//! - After every chunk the `on_chunk(bytes_so_far, total)` callback decides
//!   whether to continue; returning `false` stops the copy and leaves the
//!   partially written destination in place.
//! - On completion the destination is flushed and fsynced before returning,
//!   so the caller may delete the source afterwards.
//!
//! Snapshot semantics: `total` is the source length at open time. If the file
//! grows while being copied the extra bytes are still copied; progress may
//! then report `bytes_so_far > total`.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use super::helpers::io_error_with_help_io;

/// Chunk size for the fallback copy; also the progress/cancellation granularity.
pub const COPY_CHUNK_SIZE: usize = 32 * 1024;

/// How a chunked copy ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CopyEnd {
    Completed(u64),
    Cancelled(u64),
}

pub(crate) fn copy_chunked<F>(
    src: &Path,
    dst: &Path,
    chunk_size: usize,
    mut on_chunk: F,
) -> io::Result<CopyEnd>
where
    F: FnMut(u64, u64) -> bool,
{
    let mut reader = File::open(src).map_err(io_error_with_help_io("open source", src))?;
    let total = reader
        .metadata()
        .map_err(io_error_with_help_io("stat source", src))?
        .len();

    let mut writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dst)
        .map_err(io_error_with_help_io("open destination", dst))?;

    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut copied: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_error_with_help_io("read source", src)(e)),
        };
        writer
            .write_all(&buf[..n])
            .map_err(io_error_with_help_io("write destination", dst))?;
        copied += n as u64;

        if !on_chunk(copied, total) {
            // Leave whatever was written; make it visible to whoever inspects it.
            let _ = writer.flush();
            return Ok(CopyEnd::Cancelled(copied));
        }
    }

    writer
        .flush()
        .map_err(io_error_with_help_io("flush destination", dst))?;
    writer
        .sync_all()
        .map_err(io_error_with_help_io("fsync destination", dst))?;
    Ok(CopyEnd::Completed(copied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn copies_across_chunk_boundaries() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("ep.mkv");
        let dst = dir.path().join("ep.out");
        let data = patterned(2 * COPY_CHUNK_SIZE + 123);
        fs::write(&src, &data).unwrap();

        let mut calls = Vec::new();
        let end = copy_chunked(&src, &dst, COPY_CHUNK_SIZE, |done, total| {
            calls.push((done, total));
            true
        })
        .unwrap();

        assert_eq!(end, CopyEnd::Completed(data.len() as u64));
        assert_eq!(fs::read(&dst).unwrap(), data);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls.last().copied(), Some((data.len() as u64, data.len() as u64)));
        assert!(calls.windows(2).all(|w| w[0].0 < w[1].0), "progress must be cumulative");
    }

    #[test]
    fn empty_source_makes_empty_destination_without_progress() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("empty");
        let dst = dir.path().join("out");
        File::create(&src).unwrap();

        let mut calls = 0;
        let end = copy_chunked(&src, &dst, COPY_CHUNK_SIZE, |_, _| {
            calls += 1;
            true
        })
        .unwrap();
        assert_eq!(end, CopyEnd::Completed(0));
        assert_eq!(calls, 0);
        assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
    }

    #[test]
    fn stop_after_first_chunk_leaves_partial_output() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("big.bin");
        let dst = dir.path().join("big.out");
        fs::write(&src, patterned(4 * COPY_CHUNK_SIZE)).unwrap();

        let end = copy_chunked(&src, &dst, COPY_CHUNK_SIZE, |_, _| false).unwrap();
        assert_eq!(end, CopyEnd::Cancelled(COPY_CHUNK_SIZE as u64));
        assert_eq!(fs::metadata(&dst).unwrap().len(), COPY_CHUNK_SIZE as u64);
        assert!(src.exists());
    }

    #[test]
    fn overwrites_existing_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("new");
        let dst = dir.path().join("old");
        fs::write(&src, b"abc").unwrap();
        fs::write(&dst, b"much longer previous content").unwrap();
        copy_chunked(&src, &dst, COPY_CHUNK_SIZE, |_, _| true).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"abc");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let err = copy_chunked(
            &dir.path().join("missing"),
            &dir.path().join("out"),
            COPY_CHUNK_SIZE,
            |_, _| true,
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("open source"));
    }
}
