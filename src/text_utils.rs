use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Accepts the date shapes found in frontmatter over the years:
/// a full RFC 3339 timestamp, a date-time without offset, or a bare date.
pub fn parse_published_at(buf: &str) -> Result<NaiveDateTime, String> {
    let buf = buf.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(buf) {
        return Ok(dt.naive_utc());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(buf, fmt) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(buf, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap());
    }

    Err(format!("Unable to parse publishedAt date {}", buf))
}

pub fn format_rfc2822(date_time: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(date_time).to_rfc2822()
}

pub fn format_rfc3339(date_time: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(date_time)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Turns a file stem into a URL-safe slug: accents stripped, lowercased,
/// separator runs collapsed into a single dash.
pub fn slugify(stem: &str) -> String {
    let ascii = unidecode::unidecode(stem);

    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = true;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_published_at() {
        let dt = parse_published_at("2024-01-02T05:06:07Z").unwrap();
        assert_eq!(dt.to_string(), "2024-01-02 05:06:07");

        let dt = parse_published_at("2024-01-02T05:06:07").unwrap();
        assert_eq!(dt.to_string(), "2024-01-02 05:06:07");

        let dt = parse_published_at("2024-01-02 05:06:07.123").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-02 05:06:07");

        let dt = parse_published_at("2024-01-02").unwrap();
        assert_eq!(dt.to_string(), "2024-01-02 00:00:00");

        assert!(parse_published_at("yesterday").is_err());
        assert!(parse_published_at("2024-13-40").is_err());
    }

    #[test]
    fn test_format_rfc2822() {
        let dt = parse_published_at("2024-01-02T05:06:07").unwrap();
        assert_eq!(format_rfc2822(&dt), "Tue, 2 Jan 2024 05:06:07 +0000");
    }

    #[test]
    fn test_format_rfc3339() {
        let dt = parse_published_at("2024-01-02T05:06:07").unwrap();
        assert_eq!(format_rfc3339(&dt), "2024-01-02T05:06:07Z");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Understanding DBMS"), "understanding-dbms");
        assert_eq!(slugify("what-i-learned"), "what-i-learned");
        assert_eq!(slugify("Ábaco  & friends"), "abaco-friends");
        assert_eq!(slugify("trailing---"), "trailing");
    }
}
