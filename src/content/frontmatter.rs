use std::io;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;

const DELIMITER: &str = "---";

/// Typed view of the YAML block at the top of a content file.
/// Every field is optional; defaulting happens when the Post is built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub published_at: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<Tags>,
    pub image: Option<String>,
}

/// Older posts carry `tags: "a, b, c"`, newer ones a YAML sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Csv(String),
}

impl FrontMatter {
    /// Tags normalized to a trimmed, order-preserving list.
    pub fn tag_list(&self) -> Vec<String> {
        match self.tags {
            None => vec![],
            Some(Tags::Csv(ref buf)) => buf
                .split(',')
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect(),
            Some(Tags::List(ref tags)) => tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// Splits a content file into its frontmatter and markdown body.
///
/// The file must open with a `---` line. A missing closing delimiter is a
/// content error, not something to paper over: the rest of the file would
/// otherwise be swallowed as metadata.
pub fn parse_frontmatter(file_name: &PathBuf, raw_content: &str) -> io::Result<(FrontMatter, String)> {
    let mut lines = raw_content.lines();

    let mut first = lines.next();
    while let Some(line) = first {
        if !line.trim().is_empty() {
            break;
        }
        first = lines.next();
    }

    match first {
        Some(line) if line.trim_end() == DELIMITER => {}
        _ => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Missing frontmatter block - file={}", file_name.to_str().unwrap()),
            ));
        }
    }

    let mut block = String::new();
    let mut closed = false;
    for line in &mut lines {
        if line.trim_end() == DELIMITER {
            closed = true;
            break;
        }
        block.push_str(line);
        block.push('\n');
    }

    if !closed {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("Frontmatter closing delimiter is missing - file={}", file_name.to_str().unwrap()),
        ));
    }

    let matter: FrontMatter = if block.trim().is_empty() {
        FrontMatter::default()
    } else {
        match serde_yaml::from_str(&block) {
            Ok(matter) => matter,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Error parsing frontmatter: {} - file={}", e, file_name.to_str().unwrap()),
                ));
            }
        }
    };

    let body: String = lines.collect::<Vec<_>>().join("\n");

    Ok((matter, body.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::POST_FULL_MDX;

    #[test]
    fn test_parse_full_frontmatter() {
        let path = PathBuf::from("writings/understanding-dbms/page.mdx");
        let (matter, body) = parse_frontmatter(&path, POST_FULL_MDX).unwrap();

        assert_eq!(matter.title, Some("Understanding Database Internals".to_string()));
        assert_eq!(matter.published_at, Some("2024-04-09".to_string()));
        assert_eq!(matter.summary, Some("How databases keep your data safe".to_string()));
        assert_eq!(matter.image, Some("/images/dbms.png".to_string()));
        assert!(body.starts_with("Every database"));
        assert!(!body.contains(DELIMITER));
    }

    #[test]
    fn test_csv_tags() {
        let path = PathBuf::from("a.mdx");
        let raw = "---\ntags: \"a, b, c\"\n---\nbody\n";
        let (matter, _body) = parse_frontmatter(&path, raw).unwrap();
        assert_eq!(matter.tag_list(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sequence_tags() {
        let path = PathBuf::from("a.mdx");
        let raw = "---\ntags:\n  - rust\n  - ' db '\n  - ''\n---\nbody\n";
        let (matter, _body) = parse_frontmatter(&path, raw).unwrap();
        assert_eq!(matter.tag_list(), vec!["rust", "db"]);
    }

    #[test]
    fn test_empty_block_defaults() {
        let path = PathBuf::from("a.mdx");
        let raw = "---\n---\nbody\n";
        let (matter, body) = parse_frontmatter(&path, raw).unwrap();
        assert_eq!(matter.title, None);
        assert!(matter.tag_list().is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let path = PathBuf::from("writings/broken.mdx");
        let raw = "---\ntitle: Broken\nNever closed.\n";
        let err = parse_frontmatter(&path, raw).unwrap_err();
        assert!(err.to_string().contains("closing delimiter"));
        assert!(err.to_string().contains("broken.mdx"));
    }

    #[test]
    fn test_missing_frontmatter() {
        let path = PathBuf::from("writings/plain.mdx");
        let raw = "# Just markdown\n\nNo metadata at all.\n";
        let err = parse_frontmatter(&path, raw).unwrap_err();
        assert!(err.to_string().contains("Missing frontmatter"));
    }

    #[test]
    fn test_leading_blank_lines_are_ok() {
        let path = PathBuf::from("a.mdx");
        let raw = "\n\n---\ntitle: Late start\n---\nbody\n";
        let (matter, _body) = parse_frontmatter(&path, raw).unwrap();
        assert_eq!(matter.title, Some("Late start".to_string()));
    }
}
