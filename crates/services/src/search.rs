//! Full-text search over cheat sheets and flashcards.

use regex::RegexBuilder;

use study_core::model::ContentBundle;

/// Queries shorter than this are not run.
pub const MIN_QUERY_CHARS: usize = 2;
/// Upper bound on returned hits.
pub const MAX_RESULTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Cheat-sheet title or `Week N` for flashcards.
    pub heading: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    TooShort,
    NoResults,
    Hits(Vec<SearchHit>),
}

/// Case-insensitive substring search.
///
/// Cheat-sheet titles and points come first, then flashcards, each in week
/// order.
#[must_use]
pub fn search(content: &ContentBundle, query: &str) -> SearchOutcome {
    if query.chars().count() < MIN_QUERY_CHARS {
        return SearchOutcome::TooShort;
    }
    let needle = query.to_lowercase();
    let found = |text: &str| text.to_lowercase().contains(&needle);

    let sheet_hits = content.cheatsheets.values().flat_map(|sheet| {
        let title = found(&sheet.title).then(|| SearchHit {
            heading: sheet.title.clone(),
            text: sheet.title.clone(),
        });
        let points = sheet
            .points
            .iter()
            .filter(|point| found(point))
            .map(|point| SearchHit {
                heading: sheet.title.clone(),
                text: point.clone(),
            });
        title.into_iter().chain(points)
    });

    let card_hits = content.flashcards.iter().flat_map(|(week, cards)| {
        cards
            .iter()
            .filter(|card| found(&card.front) || found(&card.back))
            .map(|card| SearchHit {
                heading: week.label(),
                text: format!("{} — {}", card.front, card.back),
            })
    });

    let hits: Vec<SearchHit> = sheet_hits.chain(card_hits).take(MAX_RESULTS).collect();
    if hits.is_empty() {
        SearchOutcome::NoResults
    } else {
        SearchOutcome::Hits(hits)
    }
}

/// A run of text that either matched the query or did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

/// Splits `text` around case-insensitive occurrences of `query`.
///
/// The query is matched literally. An empty query yields the whole text as
/// one plain segment.
#[must_use]
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    if query.is_empty() {
        return vec![Segment::Plain(text)];
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return vec![Segment::Plain(text)];
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Plain(&text[last..m.start()]));
        }
        segments.push(Segment::Match(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        segments.push(Segment::Plain(&text[last..]));
    }
    segments
}
