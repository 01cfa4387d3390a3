use serde::Deserialize;

use crate::traits::{DetailRecord, Lookup, MediaKind, RatingEntry, SearchPage, SearchResultItem};

/// Marker OMDb uses for a field it has no data for.
pub const NOT_AVAILABLE: &str = "N/A";

// ── Wire types ───────────────────────────────────────────────────

/// Only the status flag. Anything that has one is an OMDb payload.
#[derive(Debug, Deserialize)]
pub struct OmdbEnvelope {
    #[serde(rename = "Response")]
    pub response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchResponse {
    /// A missing flag counts as negative.
    #[serde(default)]
    pub response: String,
    pub search: Option<Vec<OmdbSearchItem>>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub type_: String,
    pub poster: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbDetailResponse {
    #[serde(default)]
    pub response: String,
    pub error: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "Type")]
    pub type_: Option<String>,
    pub poster: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub box_office: Option<String>,
    pub metascore: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "totalSeasons")]
    pub total_seasons: Option<String>,
    #[serde(default)]
    pub ratings: Vec<OmdbRating>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRating {
    pub source: String,
    pub value: String,
}

// ── Conversions ──────────────────────────────────────────────────

fn is_affirmative(flag: &str) -> bool {
    flag.trim().eq_ignore_ascii_case("true")
}

/// Map the "N/A" marker and blank strings to `None`.
fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != NOT_AVAILABLE
    })
}

impl OmdbSearchItem {
    pub fn into_item(self) -> SearchResultItem {
        SearchResultItem {
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            kind: MediaKind::from(self.type_.as_str()),
            poster_url: available(self.poster),
        }
    }
}

impl OmdbSearchResponse {
    pub fn into_lookup(self) -> Lookup<SearchPage> {
        if !is_affirmative(&self.response) {
            return Lookup::NotFound {
                message: available(self.error),
            };
        }

        Lookup::Found(SearchPage {
            items: self
                .search
                .unwrap_or_default()
                .into_iter()
                .map(OmdbSearchItem::into_item)
                .collect(),
            total_results: self.total_results.and_then(|t| t.trim().parse().ok()),
        })
    }
}

impl OmdbDetailResponse {
    pub fn into_lookup(self) -> Lookup<DetailRecord> {
        if !is_affirmative(&self.response) {
            return Lookup::NotFound {
                message: available(self.error),
            };
        }

        Lookup::Found(DetailRecord {
            id: self.imdb_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            year: available(self.year),
            kind: MediaKind::from(self.type_.as_deref().unwrap_or_default()),
            poster_url: available(self.poster),
            rated: available(self.rated),
            released: available(self.released),
            runtime: available(self.runtime),
            genre: available(self.genre),
            director: available(self.director),
            writer: available(self.writer),
            actors: available(self.actors),
            plot: available(self.plot),
            language: available(self.language),
            country: available(self.country),
            awards: available(self.awards),
            box_office: available(self.box_office),
            metascore: available(self.metascore),
            imdb_rating: available(self.imdb_rating),
            imdb_votes: available(self.imdb_votes),
            total_seasons: available(self.total_seasons),
            ratings: self
                .ratings
                .into_iter()
                .map(|r| RatingEntry {
                    source: r.source,
                    value: r.value,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search() {
        let json = r#"{
            "Search": [
                {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie",
                 "Poster": "https://m.media-amazon.com/images/M/batman-begins.jpg"},
                {"Title": "Batman: The Animated Series", "Year": "1992–1995", "imdbID": "tt0103359",
                 "Type": "series", "Poster": "N/A"}
            ],
            "totalResults": "512",
            "Response": "True"
        }"#;

        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        let Lookup::Found(page) = resp.into_lookup() else {
            panic!("expected results");
        };
        assert_eq!(page.total_results, Some(512));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "tt0372784");
        assert_eq!(page.items[0].kind, MediaKind::Movie);
        assert!(page.items[0].poster_url.is_some());
        assert_eq!(page.items[1].kind, MediaKind::Series);
        assert_eq!(page.items[1].poster_url, None);
    }

    #[test]
    fn test_deserialize_search_not_found() {
        let json = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_lookup(),
            Lookup::NotFound {
                message: Some("Movie not found!".into())
            }
        );
    }

    #[test]
    fn test_missing_response_flag_is_negative() {
        let json = r#"{"Search":[{"Title":"Batman","Year":"1989","imdbID":"tt0096895","Type":"movie"}]}"#;
        let resp: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_lookup(), Lookup::NotFound { message: None });

        let json = r#"{"Error":"Something went wrong."}"#;
        let resp: OmdbDetailResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_lookup(),
            Lookup::NotFound {
                message: Some("Something went wrong.".into())
            }
        );
    }

    #[test]
    fn test_envelope_requires_flag() {
        assert!(serde_json::from_str::<OmdbEnvelope>(r#"{"Response":"False"}"#).is_ok());
        assert!(serde_json::from_str::<OmdbEnvelope>(r#"{"message":"rate limited"}"#).is_err());
    }

    #[test]
    fn test_deserialize_detail() {
        let json = r#"{
            "Title": "Batman", "Year": "1989", "Rated": "PG-13", "Released": "23 Jun 1989",
            "Runtime": "126 min", "Genre": "Action, Adventure", "Director": "Tim Burton",
            "Writer": "Bob Kane, Sam Hamm, Warren Skaaren", "Actors": "Michael Keaton, Jack Nicholson",
            "Plot": "The Dark Knight of Gotham City begins his war on crime.",
            "Language": "English, French, Spanish", "Country": "United States, United Kingdom",
            "Awards": "Won 1 Oscar. 9 wins & 26 nominations total", "Poster": "N/A",
            "Ratings": [
                {"Source": "Internet Movie Database", "Value": "7.5/10"},
                {"Source": "Rotten Tomatoes", "Value": "77%"}
            ],
            "Metascore": "69", "imdbRating": "7.5", "imdbVotes": "409,377", "imdbID": "tt0096895",
            "Type": "movie", "DVD": "N/A", "BoxOffice": "$251,409,241", "Production": "N/A",
            "Website": "N/A", "Response": "True"
        }"#;

        let resp: OmdbDetailResponse = serde_json::from_str(json).unwrap();
        let Lookup::Found(record) = resp.into_lookup() else {
            panic!("expected record");
        };
        assert_eq!(record.id, "tt0096895");
        assert_eq!(record.director.as_deref(), Some("Tim Burton"));
        assert_eq!(record.box_office.as_deref(), Some("$251,409,241"));
        assert_eq!(record.poster_url, None);
        assert_eq!(record.total_seasons, None);
        assert_eq!(record.ratings.len(), 2);
        assert_eq!(record.ratings[1].value, "77%");
        assert_eq!(record.imdb_score(), Some(7.5));
    }

    #[test]
    fn test_detail_sentinels_become_none() {
        let json = r#"{"Response":"True","Title":"Obscure","imdbID":"tt1","Type":"episode",
                       "Awards":"N/A","imdbRating":"N/A","Plot":""}"#;
        let resp: OmdbDetailResponse = serde_json::from_str(json).unwrap();
        let Lookup::Found(record) = resp.into_lookup() else {
            panic!("expected record");
        };
        assert_eq!(record.kind, MediaKind::Episode);
        assert_eq!(record.awards, None);
        assert_eq!(record.imdb_rating, None);
        assert_eq!(record.plot, None);
        assert_eq!(record.imdb_score(), None);
    }
}
