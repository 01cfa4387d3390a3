//! Incremental response body ingestion.
//!
//! A response body arrives as a sequence of byte chunks. [`ChunkReader`]
//! decodes them as UTF-8 while they arrive, carrying partial multi-byte
//! sequences from one chunk into the next, and hands back the complete text
//! once the stream is exhausted. [`read_json`] layers JSON parsing on top and
//! falls back to a whole-body parse when the transport has no chunked body.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::ApiError;

/// A boxed stream of body chunks.
pub type ChunkStream = BoxStream<'static, Result<Bytes, ApiError>>;

/// A response body as handed over by a [`Transport`](crate::Transport).
pub enum ResponseBody {
    /// The body is delivered incrementally.
    Chunked(ChunkStream),
    /// The transport only exposes the body as one buffered blob.
    Buffered(Bytes),
}

impl ResponseBody {
    pub fn chunked<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, ApiError>> + Send + 'static,
    {
        Self::Chunked(stream.boxed())
    }

    /// Take the chunk stream, or fail with [`ApiError::StreamUnsupported`]
    /// carrying the buffered body.
    pub fn into_stream(self) -> Result<ChunkStream, ApiError> {
        match self {
            Self::Chunked(stream) => Ok(stream),
            Self::Buffered(body) => Err(ApiError::StreamUnsupported { body }),
        }
    }
}

// ── Decoder ──────────────────────────────────────────────────────

/// Stateful UTF-8 decoder.
///
/// Bytes of a multi-byte sequence that is cut off at the end of a chunk are
/// held back and completed by the next chunk. Invalid input decodes to
/// U+FFFD, one per maximal invalid subsequence.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and append the text to `out`.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        let joined;
        let mut input = if self.pending.is_empty() {
            chunk
        } else {
            let mut buf = std::mem::take(&mut self.pending);
            buf.extend_from_slice(chunk);
            joined = buf;
            &joined[..]
        };

        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more bytes.
                            self.pending.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Flush at end of input. A sequence still pending is truncated and
    /// decodes to a single U+FFFD.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }

    /// Whether bytes of an unfinished sequence are being held back.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

// ── Reader ───────────────────────────────────────────────────────

/// Accumulates a chunked body into one string.
///
/// A reader is consumed by [`ChunkReader::read_to_string`], so every body gets
/// its own decoder.
#[derive(Debug, Default)]
pub struct ChunkReader {
    decoder: Utf8Decoder,
    text: String,
    chunks: usize,
    bytes: usize,
}

impl ChunkReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull chunks until the stream ends and return the decoded text.
    ///
    /// The first chunk error aborts the read.
    pub async fn read_to_string<S, B>(mut self, mut stream: S) -> Result<String, ApiError>
    where
        S: Stream<Item = Result<B, ApiError>> + Unpin,
        B: AsRef<[u8]>,
    {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let chunk = chunk.as_ref();
            self.chunks += 1;
            self.bytes += chunk.len();
            trace!(chunk = self.chunks, len = chunk.len(), "received body chunk");
            self.decoder.decode_into(chunk, &mut self.text);
        }
        self.decoder.finish(&mut self.text);

        debug!(
            chunks = self.chunks,
            bytes = self.bytes,
            "response body exhausted"
        );
        Ok(self.text)
    }
}

// ── JSON ─────────────────────────────────────────────────────────

/// Read a whole response body as text.
///
/// Chunked bodies go through a fresh [`ChunkReader`]; buffered bodies are
/// decoded in one step. Both paths produce the same text for the same bytes.
pub async fn read_text(body: ResponseBody) -> Result<String, ApiError> {
    match body.into_stream() {
        Ok(stream) => ChunkReader::new().read_to_string(stream).await,
        Err(ApiError::StreamUnsupported { body }) => {
            debug!(len = body.len(), "no chunked body, decoding whole response");
            Ok(String::from_utf8_lossy(&body).into_owned())
        }
        Err(e) => Err(e),
    }
}

/// Read a whole response body and parse it as JSON.
pub async fn read_json<T: DeserializeOwned>(body: ResponseBody) -> Result<T, ApiError> {
    parse_text(&read_text(body).await?)
}

/// Parse a fully buffered body.
pub fn parse_whole<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    parse_text(&String::from_utf8_lossy(body))
}

pub fn parse_text<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::MalformedPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks_of(parts: &[&[u8]]) -> impl Stream<Item = Result<Vec<u8>, ApiError>> + Unpin {
        let owned: Vec<Result<Vec<u8>, ApiError>> = parts.iter().map(|p| Ok(p.to_vec())).collect();
        futures::stream::iter(owned)
    }

    fn decode_all(parts: &[&[u8]]) -> String {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        for part in parts {
            decoder.decode_into(part, &mut out);
        }
        decoder.finish(&mut out);
        out
    }

    #[test]
    fn test_split_inside_multibyte_characters() {
        let text = "Amélie, 東京物語 🎬 ok";
        let bytes = text.as_bytes();

        for i in 0..=bytes.len() {
            for j in i..=bytes.len() {
                let decoded = decode_all(&[&bytes[..i], &bytes[i..j], &bytes[j..]]);
                assert_eq!(decoded, text, "split at {i}/{j}");
            }
        }
    }

    #[test]
    fn test_one_byte_chunks() {
        let text = "ñandú 🍿";
        let parts: Vec<&[u8]> = text.as_bytes().chunks(1).collect();
        assert_eq!(decode_all(&parts), text);
    }

    #[test]
    fn test_invalid_bytes_become_replacement() {
        assert_eq!(decode_all(&[b"a\xFFb"]), "a\u{FFFD}b");
        // A lead byte followed by ASCII is invalid even across a chunk boundary.
        assert_eq!(decode_all(&[b"x\xE2", b"A"]), "x\u{FFFD}A");
    }

    #[test]
    fn test_truncated_sequence_at_end_of_stream() {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        decoder.decode_into(&"é".as_bytes()[..1], &mut out);
        assert!(decoder.has_pending());
        assert_eq!(out, "");

        decoder.finish(&mut out);
        assert!(!decoder.has_pending());
        assert_eq!(out, "\u{FFFD}");
    }

    #[tokio::test]
    async fn test_reader_concatenates_chunks() {
        let text = ChunkReader::new()
            .read_to_string(chunks_of(&[b"{\"Title\":", b"\"Le Fabuleux Destin d'Am\xC3", b"\xA9lie\"}"]))
            .await
            .unwrap();
        assert_eq!(text, "{\"Title\":\"Le Fabuleux Destin d'Amélie\"}");
    }

    #[tokio::test]
    async fn test_reader_empty_stream() {
        let text = ChunkReader::new().read_to_string(chunks_of(&[])).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_reader_stops_on_chunk_error() {
        let stream = futures::stream::iter(vec![
            Ok(b"{\"a\":".to_vec()),
            Err(ApiError::Transport("connection reset".into())),
            Ok(b"1}".to_vec()),
        ]);
        let err = ChunkReader::new().read_to_string(stream).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_chunked_and_whole_body_parse_equal() {
        let payload = r#"{"Response":"True","Search":[{"Title":"Batman","Year":"1989","imdbID":"tt0096895","Type":"movie","Poster":"N/A"}]}"#;
        let bytes = payload.as_bytes();

        let whole: serde_json::Value =
            read_json(ResponseBody::Buffered(Bytes::copy_from_slice(bytes)))
                .await
                .unwrap();

        for size in [1, 3, 7, 64, bytes.len()] {
            let chunks: Vec<Result<Bytes, ApiError>> = bytes
                .chunks(size)
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect();
            let chunked: serde_json::Value =
                read_json(ResponseBody::chunked(futures::stream::iter(chunks)))
                    .await
                    .unwrap();
            assert_eq!(chunked, whole, "chunk size {size}");
        }
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let body = ResponseBody::chunked(futures::stream::iter(vec![
            Ok(Bytes::from_static(b"{\"Response\":")),
            Ok(Bytes::from_static(b"\"True\"")),
        ]));
        let err = read_json::<serde_json::Value>(body).await.unwrap_err();
        assert!(err.is_malformed());

        let err = parse_whole::<serde_json::Value>(b"<html>502</html>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_buffered_body_reports_stream_unsupported() {
        let body = ResponseBody::Buffered(Bytes::from_static(b"{}"));
        match body.into_stream() {
            Err(ApiError::StreamUnsupported { body }) => assert_eq!(&body[..], b"{}"),
            _ => panic!("expected StreamUnsupported"),
        }
    }
}
