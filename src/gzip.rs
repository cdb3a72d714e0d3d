// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Splices a gzip decoder into the response body stream (§4.6).

use bytes::Bytes;
use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};

const OUTPUT_BUF: usize = 16 * 1024;

/// A streaming gzip decoder built on `flate2::Decompress`, configured with window-bits 31
/// so it accepts both a gzip-wrapped stream and raw DEFLATE data with no wrapper at all —
/// some origins send the latter despite advertising `Content-Encoding: gzip`.
pub struct GzipDecoder {
    decompress: Decompress,
}

impl GzipDecoder {
    pub fn new() -> Self {
        GzipDecoder {
            decompress: Decompress::new_with_window_bits(false, 31),
        }
    }

    /// Feeds one compressed chunk in, returning however much decompressed data it yielded
    /// (possibly none, if the chunk only advanced internal decoder state such as a gzip
    /// header).
    pub fn push(&mut self, input: &[u8]) -> Result<Bytes> {
        self.run(input, FlushDecompress::None)
    }

    /// Called once the compressed input stream has ended, to flush any buffered output.
    pub fn finish(&mut self) -> Result<Bytes> {
        self.run(&[], FlushDecompress::Finish)
    }

    fn run(&mut self, mut input: &[u8], flush: FlushDecompress) -> Result<Bytes> {
        let mut output = Vec::new();
        loop {
            let before_in = self.decompress.total_in();
            let before_out = self.decompress.total_out();
            let mut buf = vec![0u8; OUTPUT_BUF];
            let status = self
                .decompress
                .decompress(input, &mut buf, flush)
                .map_err(|_| Error::HttpParser { context: "Gzip decode" })?;
            let produced = (self.decompress.total_out() - before_out) as usize;
            output.extend_from_slice(&buf[..produced]);
            let consumed = (self.decompress.total_in() - before_in) as usize;
            input = &input[consumed..];

            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    if input.is_empty() {
                        break;
                    }
                    if consumed == 0 && produced == 0 {
                        // No forward progress possible with what we were given.
                        break;
                    }
                }
            }
        }
        Ok(Bytes::from(output))
    }
}
