//! Text shown on cards and the detail page.

use chrono::{DateTime, Utc};

use crate::models::Post;

pub const EXCERPT_CHARS: usize = 150;

pub fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub fn author_label(post: &Post) -> String {
    match post.author_email.as_deref() {
        Some(email) if !email.is_empty() => format!("By {}", email),
        _ => "Anonymous".to_string(),
    }
}

/// `March 1, 2024`
pub fn long_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Relative age such as `3 days ago`, in the coarse buckets readers expect.
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - at).num_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;

    match minutes {
        0 => "less than a minute ago".to_string(),
        1 => "1 minute ago".to_string(),
        2..=44 => format!("{} minutes ago", minutes),
        45..=89 => "about 1 hour ago".to_string(),
        _ if hours < 24 => format!("about {} hours ago", hours.max(2)),
        _ if hours < 42 => "1 day ago".to_string(),
        _ if days < 30 => format!("{} days ago", days.max(2)),
        _ if days < 60 => "about 1 month ago".to_string(),
        _ if days < 365 => format!("{} months ago", days / 30),
        _ => match days / 365 {
            1 => "about 1 year ago".to_string(),
            years => format!("about {} years ago", years),
        },
    }
}

/// Body split into display paragraphs, one per line.
pub fn paragraphs(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{identity, post_by};
    use chrono::{Duration, TimeZone};

    #[test]
    fn excerpt_cuts_on_char_boundary() {
        assert_eq!(excerpt("short"), "short");

        let long = "ж".repeat(200);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 3);

        let exact = "a".repeat(EXCERPT_CHARS);
        assert_eq!(excerpt(&exact), exact);
    }

    #[test]
    fn author_label_falls_back() {
        let ann = identity("ann@example.com");
        let mut post = post_by(&ann, "T");
        assert_eq!(author_label(&post), "By ann@example.com");
        post.author_email = None;
        assert_eq!(author_label(&post), "Anonymous");
    }

    #[test]
    fn long_date_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        assert_eq!(long_date(at), "March 1, 2024");
    }

    #[test]
    fn relative_times() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now, now), "less than a minute ago");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::minutes(60), now), "about 1 hour ago");
        assert_eq!(time_ago(now - Duration::hours(5), now), "about 5 hours ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3 days ago");
        assert_eq!(time_ago(now - Duration::days(400), now), "about 1 year ago");
        assert_eq!(time_ago(now + Duration::minutes(3), now), "less than a minute ago");
    }

    #[test]
    fn paragraphs_split_lines() {
        let lines: Vec<_> = paragraphs("one\ntwo\n\nthree").collect();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }
}
