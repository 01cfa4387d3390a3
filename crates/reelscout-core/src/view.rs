//! Display elements built from API records: result cards and the details view.

use std::fmt::Write;

use reelscout_api::traits::{DetailRecord, MediaKind, RatingEntry, SearchResultItem};
use serde::Serialize;

const MAX_STARS: usize = 5;
const FULL_STAR: char = '★';
const HALF_STAR: char = '✬';
const EMPTY_STAR: char = '☆';

/// Shown in place of a missing poster image.
pub const POSTER_PLACEHOLDER: &str = "🎬";

// ── Card ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "url", rename_all = "lowercase")]
pub enum Poster {
    Image(String),
    Placeholder,
}

impl Poster {
    fn from_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => Self::Image(url.to_string()),
            None => Self::Placeholder,
        }
    }
}

/// One search result as shown in the results list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub year: String,
    pub kind: MediaKind,
    pub poster: Poster,
}

impl Card {
    pub fn from_item(item: &SearchResultItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            year: item.year.clone(),
            kind: item.kind.clone(),
            poster: Poster::from_url(item.poster_url.as_deref()),
        }
    }

    /// Single-line terminal rendering.
    pub fn to_text(&self) -> String {
        let poster = match &self.poster {
            Poster::Image(_) => "",
            Poster::Placeholder => " (no poster)",
        };
        format!(
            "{} ({}) [{}] {}{}",
            self.title, self.year, self.kind, self.id, poster
        )
    }

    pub fn to_html(&self) -> String {
        let poster = match &self.poster {
            Poster::Image(url) => format!(
                r#"<img src="{}" alt="{}" class="movie-poster">"#,
                escape_html(url),
                escape_html(&self.title)
            ),
            Poster::Placeholder => {
                format!(r#"<div class="movie-poster no-poster">{POSTER_PLACEHOLDER}</div>"#)
            }
        };
        format!(
            r#"<div class="movie-card" data-id="{id}">{poster}<div class="movie-info"><h3 class="movie-title">{title}</h3><p class="movie-year">{year}</p><span class="movie-type">{kind}</span></div></div>"#,
            id = escape_html(&self.id),
            title = escape_html(&self.title),
            year = escape_html(&self.year),
            kind = escape_html(self.kind.as_str()),
        )
    }
}

// ── Details ──────────────────────────────────────────────────────

/// Optional labelled sections of the details view, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Genre,
    Director,
    Writer,
    Cast,
    Language,
    Country,
    Awards,
    BoxOffice,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Genre => "Genre",
            Self::Director => "Director",
            Self::Writer => "Writer",
            Self::Cast => "Cast",
            Self::Language => "Language",
            Self::Country => "Country",
            Self::Awards => "Awards",
            Self::BoxOffice => "Box office",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingSection {
    pub stars: String,
    pub score: String,
    pub votes: Option<String>,
    pub others: Vec<RatingEntry>,
}

/// The details view for one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub meta: Vec<String>,
    pub poster: Poster,
    pub rating: Option<RatingSection>,
    pub plot: String,
    pub sections: Vec<Section>,
}

impl DetailView {
    pub fn from_record(record: &DetailRecord) -> Self {
        let meta = [
            record.year.clone(),
            record.runtime.clone(),
            record.rated.clone(),
            Some(record.kind.to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let rating = record.imdb_score().map(|score| RatingSection {
            stars: star_rating(score),
            score: format!("{}/10", record.imdb_rating.as_deref().unwrap_or_default()),
            votes: record.imdb_votes.clone(),
            others: record.ratings.clone(),
        });

        let sections = [
            (SectionKind::Genre, &record.genre),
            (SectionKind::Director, &record.director),
            (SectionKind::Writer, &record.writer),
            (SectionKind::Cast, &record.actors),
            (SectionKind::Language, &record.language),
            (SectionKind::Country, &record.country),
            (SectionKind::Awards, &record.awards),
            (SectionKind::BoxOffice, &record.box_office),
        ]
        .into_iter()
        .filter_map(|(kind, value)| {
            value.as_ref().map(|v| Section {
                kind,
                value: v.clone(),
            })
        })
        .collect();

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            meta,
            poster: Poster::from_url(record.poster_url.as_deref()),
            rating,
            plot: record
                .plot
                .clone()
                .unwrap_or_else(|| "No plot available.".to_string()),
            sections,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Multi-line terminal rendering.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if !self.meta.is_empty() {
            let _ = writeln!(out, "{}", self.meta.join(" · "));
        }
        if let Poster::Image(url) = &self.poster {
            let _ = writeln!(out, "Poster: {url}");
        }
        if let Some(rating) = &self.rating {
            let _ = write!(out, "\n{} {}", rating.stars, rating.score);
            if let Some(votes) = &rating.votes {
                let _ = write!(out, " (IMDb, {votes} votes)");
            }
            out.push('\n');
            for other in &rating.others {
                let _ = writeln!(out, "  {}: {}", other.source, other.value);
            }
        }
        let _ = writeln!(out, "\n{}", self.plot);
        if !self.sections.is_empty() {
            out.push('\n');
        }
        for section in &self.sections {
            let _ = writeln!(out, "{:<11} {}", format!("{}:", section.kind.label()), section.value);
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();

        out.push_str(r#"<div class="modal-header-section">"#);
        let _ = write!(
            out,
            r#"<h2 class="modal-movie-title">{}</h2><div class="modal-meta">"#,
            escape_html(&self.title)
        );
        for item in &self.meta {
            let _ = write!(out, r#"<span class="modal-meta-item">{}</span>"#, escape_html(item));
        }
        out.push_str("</div></div>");

        out.push_str(r#"<div class="modal-content-section"><div class="modal-poster-container">"#);
        match &self.poster {
            Poster::Image(url) => {
                let _ = write!(
                    out,
                    r#"<img src="{}" alt="{}" class="modal-poster">"#,
                    escape_html(url),
                    escape_html(&self.title)
                );
            }
            Poster::Placeholder => {
                let _ = write!(
                    out,
                    r#"<div class="modal-poster no-poster-modal">{POSTER_PLACEHOLDER}</div>"#
                );
            }
        }
        out.push_str(r#"</div><div class="modal-details">"#);

        if let Some(rating) = &self.rating {
            let _ = write!(
                out,
                r#"<div class="rating-section"><div class="rating-stars">{}</div><div class="rating-value">{}</div>"#,
                rating.stars,
                escape_html(&rating.score)
            );
            if let Some(votes) = &rating.votes {
                let _ = write!(
                    out,
                    r#"<div class="rating-source">IMDb ({} votes)</div>"#,
                    escape_html(votes)
                );
            }
            if !rating.others.is_empty() {
                out.push_str(r#"<div class="all-ratings">"#);
                for other in &rating.others {
                    let _ = write!(
                        out,
                        r#"<div class="rating-item"><div class="rating-item-source">{}</div><div class="rating-item-value">{}</div></div>"#,
                        escape_html(&other.source),
                        escape_html(&other.value)
                    );
                }
                out.push_str("</div>");
            }
            out.push_str("</div>");
        }

        let _ = write!(
            out,
            r#"<div class="plot-section"><div class="detail-label">Plot</div><div class="detail-value">{}</div></div>"#,
            escape_html(&self.plot)
        );

        for section in &self.sections {
            let class = match section.kind {
                SectionKind::Awards => "awards-section",
                _ => "detail-item",
            };
            let _ = write!(
                out,
                r#"<div class="{class}"><div class="detail-label">{}</div><div class="detail-value">{}</div></div>"#,
                section.kind.label(),
                escape_html(&section.value)
            );
        }

        out.push_str("</div></div>");
        out
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Five-star rendering of a 0–10 rating: one full star per two points and a
/// half star for a remainder of at least one point.
pub fn star_rating(rating: f32) -> String {
    let rating = if rating.is_finite() {
        rating.clamp(0.0, 10.0)
    } else {
        0.0
    };
    let halved = rating / 2.0;
    let full = halved.floor() as usize;
    let half = usize::from(halved.fract() >= 0.5);
    let empty = MAX_STARS - full - half;

    let mut stars = String::with_capacity(MAX_STARS * 3);
    stars.extend(std::iter::repeat(FULL_STAR).take(full));
    stars.extend(std::iter::repeat(HALF_STAR).take(half));
    stars.extend(std::iter::repeat(EMPTY_STAR).take(empty));
    stars
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DetailRecord {
        DetailRecord {
            id: "tt0096895".into(),
            title: "Batman".into(),
            year: Some("1989".into()),
            kind: MediaKind::Movie,
            poster_url: None,
            rated: Some("PG-13".into()),
            released: Some("23 Jun 1989".into()),
            runtime: Some("126 min".into()),
            genre: Some("Action, Adventure".into()),
            director: Some("Tim Burton".into()),
            writer: None,
            actors: Some("Michael Keaton, Jack Nicholson".into()),
            plot: Some("The Dark Knight of Gotham City begins his war on crime.".into()),
            language: Some("English".into()),
            country: None,
            awards: Some("Won 1 Oscar. 9 wins & 26 nominations total".into()),
            box_office: Some("$251,409,241".into()),
            metascore: Some("69".into()),
            imdb_rating: Some("7.5".into()),
            imdb_votes: Some("409,377".into()),
            total_seasons: None,
            ratings: vec![RatingEntry {
                source: "Rotten Tomatoes".into(),
                value: "77%".into(),
            }],
        }
    }

    #[test]
    fn test_star_rating() {
        assert_eq!(star_rating(7.5), "★★★✬☆");
        assert_eq!(star_rating(10.0), "★★★★★");
        assert_eq!(star_rating(0.0), "☆☆☆☆☆");
        assert_eq!(star_rating(6.9), "★★★☆☆");
        assert_eq!(star_rating(42.0), "★★★★★");
        assert_eq!(star_rating(f32::NAN), "☆☆☆☆☆");
    }

    #[test]
    fn test_card_placeholder_poster() {
        let card = Card::from_item(&SearchResultItem {
            id: "tt1".into(),
            title: "Batman".into(),
            year: "1989".into(),
            kind: MediaKind::Movie,
            poster_url: None,
        });
        assert_eq!(card.poster, Poster::Placeholder);
        assert!(card.to_text().contains("(no poster)"));
        assert!(card.to_html().contains("no-poster"));
    }

    #[test]
    fn test_card_html_escapes_text() {
        let card = Card::from_item(&SearchResultItem {
            id: "tt2".into(),
            title: "<script>alert(1)</script>".into(),
            year: "2001".into(),
            kind: MediaKind::Series,
            poster_url: Some("https://img.example/p.jpg?a=1&b=2".into()),
        });
        let html = card.to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a=1&amp;b=2"));
    }

    #[test]
    fn test_detail_awards_omitted_when_unavailable() {
        let mut without = record();
        without.awards = None;
        let view = DetailView::from_record(&without);
        assert!(view.section(SectionKind::Awards).is_none());
        assert!(!view.to_text().contains("Awards:"));
        assert!(!view.to_html().contains("awards-section"));

        let view = DetailView::from_record(&record());
        let awards = view.section(SectionKind::Awards).unwrap();
        assert_eq!(awards.value, "Won 1 Oscar. 9 wins & 26 nominations total");
        assert!(view.to_html().contains("awards-section"));
    }

    #[test]
    fn test_detail_sections_in_order() {
        let view = DetailView::from_record(&record());
        let kinds: Vec<SectionKind> = view.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Genre,
                SectionKind::Director,
                SectionKind::Cast,
                SectionKind::Language,
                SectionKind::Awards,
                SectionKind::BoxOffice,
            ]
        );
        assert_eq!(view.meta, vec!["1989", "126 min", "PG-13", "movie"]);
    }

    #[test]
    fn test_detail_rating_section() {
        let view = DetailView::from_record(&record());
        let rating = view.rating.as_ref().unwrap();
        assert_eq!(rating.stars, "★★★✬☆");
        assert_eq!(rating.score, "7.5/10");
        assert_eq!(rating.others.len(), 1);

        let mut unrated = record();
        unrated.imdb_rating = None;
        let view = DetailView::from_record(&unrated);
        assert!(view.rating.is_none());
        assert!(!view.to_html().contains("rating-section"));
    }

    #[test]
    fn test_detail_missing_plot() {
        let mut no_plot = record();
        no_plot.plot = None;
        assert_eq!(DetailView::from_record(&no_plot).plot, "No plot available.");
    }
}
