//! Placeholder substitution for naming templates and hook commands.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// The values a template can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValues {
    pub channel_title: String,
    pub video_title: String,
    pub release_date: DateTime<Utc>,
}

impl TemplateValues {
    pub fn new(
        channel_title: impl Into<String>,
        video_title: impl Into<String>,
        release_date: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_title: channel_title.into(),
            video_title: video_title.into(),
            release_date,
        }
    }
}

/// Makes a title safe to use as a single path segment.
///
/// `" - "` collapses to a single space so titles do not produce
/// spurious separators in "Show - SxxEyy - Title" style templates,
/// and both slash kinds become spaces.
pub fn clean_video_title(title: &str) -> String {
    title.replace(" - ", " ").replace(['/', '\\'], " ")
}

/// Replaces every occurrence of every known placeholder.
///
/// Unknown `%...%` tokens are left untouched.
pub fn format_template(template: &str, values: &TemplateValues) -> String {
    let date = &values.release_date;
    let replacements = [
        ("%channelTitle%", values.channel_title.clone()),
        ("%year%", date.year().to_string()),
        ("%month%", format!("{:02}", date.month())),
        ("%day%", format!("{:02}", date.day())),
        ("%hour%", format!("{:02}", date.hour())),
        ("%minute%", format!("{:02}", date.minute())),
        ("%second%", format!("{:02}", date.second())),
        ("%videoTitle%", clean_video_title(&values.video_title)),
    ];

    replacements
        .iter()
        .fold(template.to_string(), |acc, (placeholder, value)| {
            acc.replace(placeholder, value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn values() -> TemplateValues {
        TemplateValues::new(
            "Linus",
            "Ep 1 - Intro",
            Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap(),
        )
    }

    #[test]
    fn test_all_placeholders() {
        let formatted = format_template(
            "%channelTitle%/%year%-%month%-%day% %hour%:%minute%:%second% %videoTitle%",
            &values(),
        );
        assert_eq!(formatted, "Linus/2023-04-05 06:07:08 Ep 1 Intro");
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let formatted = format_template("%channelTitle%/%channelTitle% - %year%%year%", &values());
        assert_eq!(formatted, "Linus/Linus - 20232023");
    }

    #[test]
    fn test_unknown_tokens_are_kept() {
        let formatted = format_template("%channelTitle%/%episode% %videoTitle%%", &values());
        assert_eq!(formatted, "Linus/%episode% Ep 1 Intro%");
    }

    #[test]
    fn test_clean_video_title_removes_separators() {
        assert_eq!(clean_video_title("A - B - C"), "A B C");
        assert_eq!(clean_video_title("AC/DC\\live"), "AC DC live");
        assert_eq!(clean_video_title("no-dash-spaces"), "no-dash-spaces");
    }

    #[test]
    fn test_title_cannot_inject_folders() {
        let vals = TemplateValues::new("Chan", "../../etc/passwd", values().release_date);
        let formatted = format_template("%channelTitle%/%videoTitle%", &vals);
        assert_eq!(formatted.matches('/').count(), 1);
    }
}
