use std::collections::HashMap;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    /// Slug of the post to track. Whitespace-only values count as missing.
    pub fn get_slug(&self) -> Option<&str> {
        match self.items.get("slug").map(|s| s.trim()) {
            Some("") | None => None,
            Some(slug) => Some(slug),
        }
    }

    pub fn get_query(&self) -> Option<&str> {
        match self.items.get("query").map(|s| s.trim()) {
            Some("") | None => None,
            Some(query) => Some(query),
        }
    }

    /// Comma-separated tag filter. Empty entries are dropped.
    pub fn get_tags(&self) -> Vec<String> {
        let Some(tags) = self.items.get("tags") else {
            return vec![];
        };

        tags.split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_str() {
        let buf = "query=atomic%20writes&tags=rust,db";
        let qs = QueryString::from(buf);
        assert_eq!(qs.get_query(), Some("atomic writes"));
        assert_eq!(qs.get_tags(), vec!["rust".to_string(), "db".to_string()]);
    }

    #[test]
    fn test_parse_invalid_query_str() {
        let qs = QueryString::from("");
        assert_eq!(qs, QueryString { items: Default::default() });
        assert_eq!(qs.get_slug(), None);
        assert_eq!(qs.get_query(), None);
        assert!(qs.get_tags().is_empty());
    }

    #[test]
    fn test_get_slug() {
        let qs = QueryString::from("slug=my-post");
        assert_eq!(qs.get_slug(), Some("my-post"));

        // Key present but empty is still a missing slug
        let qs = QueryString::from("slug=");
        assert_eq!(qs.get_slug(), None);

        let qs = QueryString::from("slug=%20%20");
        assert_eq!(qs.get_slug(), None);
    }

    #[test]
    fn test_get_tags_skips_empty_entries() {
        let qs = QueryString::from("tags=rust,%20,db,");
        assert_eq!(qs.get_tags(), vec!["rust".to_string(), "db".to_string()]);
    }
}
