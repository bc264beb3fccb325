//! Buffered Console Output
//!
//! Small writes are staged in a page-sized buffer and handed to the kernel
//! in one `debug` call, either when a line ends or when the next chunk does
//! not fit.
//!
//! # Buffer Layout
//! ```text
//! [ staged bytes ... | NUL | unused ]
//!   0            len   len     PAGE_SIZE
//! ```
//! The staged bytes are always NUL-terminated, so `len` never exceeds
//! `PAGE_SIZE - 1`.

use core::fmt;

use super::gate::SyscallGate;
use crate::mm::PAGE_SIZE;
use crate::syscall::numbers::SYS_DEBUG;

/// Largest number of bytes one flush carries.
pub const CAPACITY: usize = PAGE_SIZE - 1;

/// A page of staged console output.
pub struct OutputBuffer<G: SyscallGate> {
    gate: G,
    buf: [u8; PAGE_SIZE],
    len: usize,
}

impl<G: SyscallGate> OutputBuffer<G> {
    pub const fn new(gate: G) -> Self {
        Self { gate, buf: [0; PAGE_SIZE], len: 0 }
    }

    /// Bytes waiting for the next flush.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Send the staged bytes to the console and empty the buffer.
    pub fn flush(&mut self) {
        self.buf[self.len] = 0;
        self.gate.syscall(SYS_DEBUG, [self.buf.as_ptr() as usize, 0, 0, 0, 0]);
        self.len = 0;
        self.buf[0] = 0;
    }

    /// Append one byte; a newline flushes.
    pub fn put_char(&mut self, c: u8) {
        self.stage(&[c]);
        if c == b'\n' {
            self.flush();
        }
    }

    /// Append a string, flushing after every newline in it.
    pub fn put_string(&mut self, s: &str) {
        for line in s.as_bytes().split_inclusive(|&b| b == b'\n') {
            self.stage(line);
            if line.last() == Some(&b'\n') {
                self.flush();
            }
        }
    }

    fn stage(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let chunk = bytes.len().min(CAPACITY);
            if chunk > CAPACITY - self.len {
                self.flush();
            }
            self.buf[self.len..self.len + chunk].copy_from_slice(&bytes[..chunk]);
            self.len += chunk;
            self.buf[self.len] = 0;
            bytes = &bytes[chunk..];
        }
    }
}

impl<G: SyscallGate> fmt::Write for OutputBuffer<G> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_string(s);
        Ok(())
    }
}

impl<G: SyscallGate> Drop for OutputBuffer<G> {
    fn drop(&mut self) {
        if self.len > 0 {
            self.flush();
        }
    }
}
