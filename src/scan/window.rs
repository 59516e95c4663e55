//! Bounded sliding window over a byte source.
//!
//! The window reads its source in fixed-size chunks and hands out one
//! position at a time, guaranteeing that the configured number of bytes
//! before and after that position are resident. Positions whose look-ahead
//! bytes have not been read yet are deferred until the next chunk arrives,
//! so the visitor sees the same neighbourhood for every byte no matter how
//! the source splits its reads.

use std::io::{self, Read};

/// Default number of bytes read from the source per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
/// Default number of bytes guaranteed after the current position.
pub const DEFAULT_LOOK_AHEAD: usize = 3;
/// Default number of bytes guaranteed before the current position.
pub const DEFAULT_LOOK_BEHIND: usize = 1;

/// What the visitor wants the window to do after inspecting a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Move on to the next byte.
    Next,
    /// Consume this many extra bytes together with the current one.
    Skip(usize),
    /// Stop iterating. This is not an error.
    Stop,
}

/// The resident bytes around the position being visited.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Only built by the window, for positions inside `buf`.
    fn new(buf: &'a [u8], pos: usize) -> Self {
        debug_assert!(pos < buf.len());
        Self { buf, pos }
    }

    /// The byte being visited.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos]
    }

    /// The byte right before the current one, or None at the start of the stream.
    #[inline]
    pub fn prev(&self) -> Option<u8> {
        self.behind(1)
    }

    /// The byte `offset` positions back. Only offsets up to the window's
    /// look-behind are guaranteed to be resident.
    #[inline]
    pub fn behind(&self, offset: usize) -> Option<u8> {
        let i = self.pos.checked_sub(offset)?;
        self.buf.get(i).copied()
    }

    /// The byte `offset` positions ahead, or None past the end of the stream.
    /// Only offsets up to the window's look-ahead are guaranteed to be
    /// resident.
    #[inline]
    pub fn peek(&self, offset: usize) -> Option<u8> {
        self.buf.get(self.pos + offset).copied()
    }
}

/// Streams a reader through a fixed-size window.
#[derive(Debug)]
pub struct SlidingWindow<R> {
    reader: R,
    chunk_size: usize,
    look_ahead: usize,
    look_behind: usize,
    window: Vec<u8>,
    /// End of the valid bytes in `window`.
    end: usize,
    /// Next position to visit. May sit past `end` while a skip is pending.
    pos: usize,
}

impl<R: Read> SlidingWindow<R> {
    /// Create a window with explicit sizes. Zero values fall back to the defaults.
    pub fn with_sizes(reader: R, chunk_size: usize, look_ahead: usize, look_behind: usize) -> Self {
        let chunk_size = if chunk_size == 0 { DEFAULT_CHUNK_SIZE } else { chunk_size };
        let look_ahead = if look_ahead == 0 { DEFAULT_LOOK_AHEAD } else { look_ahead };
        let look_behind = if look_behind == 0 { DEFAULT_LOOK_BEHIND } else { look_behind };

        Self {
            reader,
            chunk_size,
            look_ahead,
            look_behind,
            window: vec![0; chunk_size + look_ahead + look_behind],
            end: 0,
            pos: 0,
        }
    }

    /// Visit every byte of the source once, in order, unless the visitor
    /// skips or stops.
    ///
    /// Read errors other than `Interrupted` are returned as-is. `Step::Stop`
    /// ends the iteration with `Ok(())`.
    pub fn iterate<F>(&mut self, mut visit: F) -> io::Result<()>
    where
        F: FnMut(Cursor<'_>) -> Step,
    {
        while self.fill()? > 0 {
            while self.pos + self.look_ahead < self.end {
                let cursor = Cursor::new(&self.window[..self.end], self.pos);
                match visit(cursor) {
                    Step::Next => self.pos += 1,
                    Step::Skip(extra) => self.pos += 1 + extra,
                    Step::Stop => return Ok(()),
                }
            }
        }

        // the stream is exhausted, so look-ahead may run past the end
        while self.pos < self.end {
            let cursor = Cursor::new(&self.window[..self.end], self.pos);
            match visit(cursor) {
                Step::Next => self.pos += 1,
                Step::Skip(extra) => self.pos += 1 + extra,
                Step::Stop => return Ok(()),
            }
        }

        Ok(())
    }

    /// Compact the window and append the next chunk. Returns the number of
    /// bytes read, 0 at the end of the stream.
    fn fill(&mut self) -> io::Result<usize> {
        self.compact();

        let chunk = &mut self.window[self.end..self.end + self.chunk_size];
        loop {
            match self.reader.read(chunk) {
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Shift the unvisited tail, plus `look_behind` bytes of history, to the
    /// front of the window.
    fn compact(&mut self) {
        let keep_from = self.pos.saturating_sub(self.look_behind).min(self.end);
        if keep_from == 0 {
            return;
        }
        self.window.copy_within(keep_from..self.end, 0);
        self.end -= keep_from;
        self.pos -= keep_from;
    }
}
