//! Anime records as exchanged between the tool and the widget.
//!
//! The upstream search API returns loosely shaped JSON. [`normalize`] turns
//! one search hit into an [`AnimePayload`] with a fixed set of nullable
//! fields, and [`AnimeLookup`] tells "no results" apart from a hit without
//! the widget having to inspect shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimePayload {
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub title_english: Option<String>,
    pub rating: Option<String>,
    pub score: Option<f64>,
    pub synopsis: Option<String>,
    pub year: Option<i64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
}

/// Outcome of a search. Travels as the nullable `anime` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<AnimePayload>", into = "Option<AnimePayload>")]
pub enum AnimeLookup {
    Empty,
    Found(AnimePayload),
}

impl From<Option<AnimePayload>> for AnimeLookup {
    fn from(value: Option<AnimePayload>) -> Self {
        match value {
            Some(payload) => Self::Found(payload),
            None => Self::Empty,
        }
    }
}

impl From<AnimeLookup> for Option<AnimePayload> {
    fn from(value: AnimeLookup) -> Self {
        match value {
            AnimeLookup::Found(payload) => Some(payload),
            AnimeLookup::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeStructuredContent {
    pub query: String,
    pub anime: AnimeLookup,
}

impl AnimeStructuredContent {
    /// One-line summary shown to the model next to the structured result.
    pub fn summary(&self) -> String {
        match &self.anime {
            AnimeLookup::Found(anime) => format!(
                "Showing results for \"{}\": {}.",
                self.query,
                anime.title_english.as_deref().unwrap_or("Unknown title")
            ),
            AnimeLookup::Empty => format!("No anime found for \"{}\".", self.query),
        }
    }
}

/// Map one element of the API's `data` array into an [`AnimePayload`].
///
/// Missing or mistyped fields become `None`; `genres`/`studios` keep only
/// entries with a string `name`.
pub fn normalize(raw: &Value) -> AnimePayload {
    AnimePayload {
        image_url: string_at(raw, "/images/jpg/image_url"),
        url: string_at(raw, "/url"),
        title_english: string_at(raw, "/title_english"),
        rating: string_at(raw, "/rating"),
        score: raw.pointer("/score").and_then(Value::as_f64),
        synopsis: string_at(raw, "/synopsis"),
        year: raw.pointer("/year").and_then(Value::as_i64),
        genres: names_at(raw, "genres"),
        studios: names_at(raw, "studios"),
    }
}

fn string_at(raw: &Value, pointer: &str) -> Option<String> {
    raw.pointer(pointer).and_then(Value::as_str).map(str::to_owned)
}

fn names_at(raw: &Value, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
