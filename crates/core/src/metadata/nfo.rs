//! Kodi-style `.nfo` sidecar for an episode.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::text::html_to_text;

static SEASON_EPISODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"- S(\d+)E(\d+) -").unwrap());

/// Extracts season and episode from a file stem like `"Show - S2023E0405 - Title"`.
pub fn season_episode(file_stem: &str) -> Option<(String, String)> {
    let caps = SEASON_EPISODE.captures(file_stem)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Content of an episode sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeNfo {
    pub title: String,
    pub show_title: String,
    /// Plain text, written to both `description` and `plot`.
    pub description: String,
    pub aired: DateTime<Utc>,
    /// Empty when the file stem carries no season/episode marker.
    pub season: String,
    pub episode: String,
}

impl EpisodeNfo {
    /// Builds the sidecar content, deriving season and episode from the stem.
    pub fn new(
        title: impl Into<String>,
        show_title: impl Into<String>,
        html_description: &str,
        aired: DateTime<Utc>,
        file_stem: &str,
    ) -> Self {
        let (season, episode) = season_episode(file_stem).unwrap_or_default();
        Self {
            title: title.into(),
            show_title: show_title.into(),
            description: html_to_text(html_description),
            aired,
            season,
            episode,
        }
    }

    /// Renders the XML document.
    pub fn render(&self) -> String {
        let description = escape_xml(&self.description);
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n");
        out.push_str("<episodedetails>\n");
        push_element(&mut out, "title", &escape_xml(&self.title));
        push_element(&mut out, "showtitle", &escape_xml(&self.show_title));
        push_element(&mut out, "description", &description);
        push_element(&mut out, "plot", &description);
        push_element(&mut out, "aired", &self.aired.format("%Y-%m-%d").to_string());
        push_element(&mut out, "season", &escape_xml(&self.season));
        push_element(&mut out, "episode", &escape_xml(&self.episode));
        out.push_str("</episodedetails>\n");
        out
    }
}

fn push_element(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!("\t<{name}>{value}</{name}>\n"));
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_season_episode_from_stem() {
        assert_eq!(
            season_episode("Linus - S2023E0405060708 - Intro"),
            Some(("2023".to_string(), "0405060708".to_string()))
        );
        assert_eq!(season_episode("Linus - Intro"), None);
        assert_eq!(season_episode("S01E02 - no leading dash"), None);
    }

    #[test]
    fn test_render() {
        let aired = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap();
        let nfo = EpisodeNfo::new(
            "Tips & Tricks",
            "Linus",
            "<p>Hello <i>world</i></p>",
            aired,
            "Linus - S2023E0405 - Tips & Tricks",
        );

        let xml = nfo.render();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("\t<title>Tips &amp; Tricks</title>\n"));
        assert!(xml.contains("\t<showtitle>Linus</showtitle>\n"));
        assert!(xml.contains("\t<description>Hello world</description>\n"));
        assert!(xml.contains("\t<plot>Hello world</plot>\n"));
        assert!(xml.contains("\t<aired>2023-04-05</aired>\n"));
        assert!(xml.contains("\t<season>2023</season>\n"));
        assert!(xml.contains("\t<episode>0405</episode>\n"));
    }

    #[test]
    fn test_render_without_marker_has_empty_season() {
        let aired = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let xml = EpisodeNfo::new("Intro", "Linus", "", aired, "Intro").render();
        assert!(xml.contains("\t<season></season>\n"));
        assert!(xml.contains("\t<episode></episode>\n"));
    }
}
