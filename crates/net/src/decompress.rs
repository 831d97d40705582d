//! Content-Encoding decoding, split out from transport fetching so the
//! orchestrator can re-run it against a cached body without refetching
//! (§6 "pluggable decompression"). Grounded on hastur's
//! `try_decompress_response_body`, which dispatches on the same four
//! encodings.

use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};

use crate::error::NetError;

pub fn decompress(body: &[u8], content_encoding: &str) -> Result<Vec<u8>, NetError> {
    match content_encoding {
        "gzip" | "x-gzip" => {
            let mut out = Vec::new();
            GzDecoder::new(body)
                .read_to_end(&mut out)
                .map_err(|e| NetError::InvalidResponse(format!("gzip decode failed: {e}")))?;
            Ok(out)
        }
        "deflate" => {
            let mut out = Vec::new();
            ZlibDecoder::new(body)
                .read_to_end(&mut out)
                .map_err(|e| NetError::InvalidResponse(format!("deflate decode failed: {e}")))?;
            Ok(out)
        }
        "zstd" => zstd::stream::decode_all(body)
            .map_err(|e| NetError::InvalidResponse(format!("zstd decode failed: {e}"))),
        "br" => {
            let mut out = Vec::new();
            brotli::Decompressor::new(body, 4096)
                .read_to_end(&mut out)
                .map_err(|e| NetError::InvalidResponse(format!("brotli decode failed: {e}")))?;
            Ok(out)
        }
        other => Err(NetError::InvalidResponse(format!("unsupported content-encoding {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_encoding_is_an_invalid_response() {
        let err = decompress(b"xyz", "lzma").unwrap_err();
        assert!(matches!(err, NetError::InvalidResponse(_)));
    }

    #[test]
    fn gzip_round_trips() {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(b"hello world").unwrap();
        let packed = enc.finish().unwrap();
        let out = decompress(&packed, "gzip").unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn deflate_round_trips() {
        let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(b"hello world").unwrap();
        let packed = enc.finish().unwrap();
        let out = decompress(&packed, "deflate").unwrap();
        assert_eq!(out, b"hello world");
    }
}
