//! Display props for the anime card and their HTML rendering.

use std::borrow::Cow;
use std::fmt::Write;

use crate::anime::AnimePayload;

/// What the card shows. `None` means "leave it out".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimeCardProps {
    pub image_url: Option<String>,
    pub title_english: Option<String>,
    pub rating: Option<String>,
    pub score: Option<f64>,
    pub synopsis: Option<String>,
    pub year: Option<i64>,
    pub genres: Option<Vec<String>>,
    pub studios: Option<Vec<String>>,
}

impl From<&AnimePayload> for AnimeCardProps {
    fn from(anime: &AnimePayload) -> Self {
        Self {
            image_url: anime.image_url.clone(),
            title_english: anime.title_english.clone(),
            rating: anime.rating.clone(),
            score: anime.score,
            synopsis: anime.synopsis.clone(),
            year: anime.year,
            genres: non_empty(&anime.genres),
            studios: non_empty(&anime.studios),
        }
    }
}

fn non_empty(items: &[String]) -> Option<Vec<String>> {
    (!items.is_empty()).then(|| items.to_vec())
}

impl AnimeCardProps {
    pub fn title(&self) -> &str {
        self.title_english.as_deref().unwrap_or("Anime Title")
    }

    pub fn studios_line(&self) -> Option<String> {
        self.studios.as_ref().map(|studios| studios.join(", "))
    }

    /// First two genres, then `+N` for the rest.
    pub fn genres_label(&self) -> Option<String> {
        let genres = self.genres.as_ref()?;
        if genres.len() > 2 {
            Some(format!("{} +{}", genres[..2].join(" • "), genres.len() - 2))
        } else {
            Some(genres.join(" • "))
        }
    }

    /// Score with one decimal, passed through without clamping.
    pub fn score_label(&self) -> Option<String> {
        self.score.map(|score| format!("{score:.1}"))
    }

    /// Render the card. The open-link button is included when `can_open`
    /// and a title is known.
    pub fn render(&self, can_open: bool) -> String {
        let mut html = String::from(r#"<article class="anime-card">"#);

        if let Some(score) = self.score_label() {
            let _ = write!(html, r#"<div class="anime-card__score">★ {score}</div>"#);
        }

        match &self.image_url {
            Some(src) => {
                let alt = format!(
                    "{} poster",
                    self.title_english.as_deref().unwrap_or("Anime")
                );
                let _ = write!(
                    html,
                    r#"<img class="anime-card__poster" src="{}" alt="{}" loading="lazy" referrerpolicy="no-referrer">"#,
                    html_escape(src),
                    html_escape(&alt)
                );
            }
            None => html.push_str(r#"<div class="anime-card__poster anime-card__poster--empty">No Poster</div>"#),
        }

        html.push_str(r#"<div class="anime-card__body">"#);
        let _ = write!(html, "<h2>{}</h2>", html_escape(self.title()));
        if let Some(studios) = self.studios_line() {
            let _ = write!(html, r#"<p class="anime-card__studios">{}</p>"#, html_escape(&studios));
        }

        if can_open && self.title_english.is_some() {
            html.push_str(r#"<button type="button" data-action="open-link">Open in MyAnimeList</button>"#);
        }

        let chips: Vec<String> = [
            self.year.map(|year| year.to_string()),
            self.rating.clone(),
            self.genres_label(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !chips.is_empty() {
            html.push_str(r#"<div class="anime-card__chips">"#);
            for chip in &chips {
                let _ = write!(html, r#"<span class="chip">{}</span>"#, html_escape(chip));
            }
            html.push_str("</div>");
        }

        if let Some(synopsis) = &self.synopsis {
            let _ = write!(html, r#"<p class="anime-card__synopsis">{}</p>"#, html_escape(synopsis));
        }

        html.push_str("</div></article>");
        html
    }
}

pub(crate) fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
