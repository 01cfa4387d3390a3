//! Browser bindings: incremental body decoding and card/detail HTML for a page
//! that does its own `fetch`.

use reelscout_api::body::Utf8Decoder;
use reelscout_api::omdb::types::{OmdbDetailResponse, OmdbSearchResponse};
use reelscout_api::traits::Lookup;
use reelscout_core::error::LookupError;
use reelscout_core::session::DETAIL_NOT_FOUND_MESSAGE;
use reelscout_core::view::{Card, DetailView};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Stateful UTF-8 decoder for `ReadableStream` chunks. Use one per response.
#[wasm_bindgen]
#[derive(Default)]
pub struct ChunkDecoder {
    inner: Utf8Decoder,
}

#[wasm_bindgen]
impl ChunkDecoder {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk. Bytes of a character split across chunks are held
    /// until the next call.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        let mut out = String::new();
        self.inner.decode_into(chunk, &mut out);
        out
    }

    /// Flush at end of stream.
    pub fn finish(&mut self) -> String {
        let mut out = String::new();
        self.inner.finish(&mut out);
        out
    }
}

/// What a page shows for a search payload.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SearchOutcome {
    Cards(Vec<String>),
    NotFound { message: String },
}

/// What a page shows for a detail payload.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
enum DetailOutcome {
    Detail(String),
    NotFound { message: String },
}

/// Turn an OMDb search payload into JSON for the page:
/// `{"cards": ["<div ...>", ...]}` or `{"not_found": {"message": "..."}}`.
#[wasm_bindgen]
pub fn search_cards_html(payload: &str) -> Result<String, JsError> {
    Ok(serde_json::to_string(&search_outcome(payload)?)?)
}

/// Turn an OMDb detail payload into JSON for the page:
/// `{"detail": "<div ...>"}` or `{"not_found": {"message": "..."}}`.
#[wasm_bindgen]
pub fn detail_html(payload: &str) -> Result<String, JsError> {
    Ok(serde_json::to_string(&detail_outcome(payload)?)?)
}

fn search_outcome(payload: &str) -> Result<SearchOutcome, serde_json::Error> {
    let resp: OmdbSearchResponse = serde_json::from_str(payload)?;
    let message = match resp.into_lookup() {
        Lookup::Found(page) if !page.items.is_empty() => {
            return Ok(SearchOutcome::Cards(
                page.items
                    .iter()
                    .map(|item| Card::from_item(item).to_html())
                    .collect(),
            ));
        }
        Lookup::Found(_) => None,
        Lookup::NotFound { message } => message,
    };
    Ok(SearchOutcome::NotFound {
        message: LookupError::NoResults(message).to_string(),
    })
}

fn detail_outcome(payload: &str) -> Result<DetailOutcome, serde_json::Error> {
    let resp: OmdbDetailResponse = serde_json::from_str(payload)?;
    Ok(match resp.into_lookup() {
        Lookup::Found(record) => DetailOutcome::Detail(DetailView::from_record(&record).to_html()),
        Lookup::NotFound { .. } => DetailOutcome::NotFound {
            message: DETAIL_NOT_FOUND_MESSAGE.to_string(),
        },
    })
}
