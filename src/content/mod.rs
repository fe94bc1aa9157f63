use std::path::PathBuf;
use std::{fs, io};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::content::frontmatter::parse_frontmatter;

pub mod frontmatter;
pub mod loader;

/// A single writing, read from the content directory. Immutable at runtime:
/// the filesystem is the source of truth and is edited out-of-band.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub slug: String,
    pub metadata: PostMeta,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub title: String,
    pub published_at: NaiveDateTime,
    pub summary: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Post {
    pub fn from_file(slug: String, file_path: PathBuf) -> io::Result<Post> {
        let raw_content = fs::read_to_string(&file_path)?;
        Self::from_string(slug, &file_path, &raw_content)
    }

    pub fn from_string(slug: String, file_path: &PathBuf, raw_content: &str) -> io::Result<Post> {
        let (matter, body) = parse_frontmatter(file_path, raw_content)?;

        let published_at = match matter.published_at {
            Some(ref buf) => match crate::text_utils::parse_published_at(buf) {
                Ok(dt) => dt,
                Err(e) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{} - file={}", e, file_path.to_str().unwrap()),
                    ));
                }
            },
            // Undated drafts surface at the top of the list until dated
            None => chrono::Utc::now().naive_utc(),
        };

        let tags = matter.tag_list();
        let metadata = PostMeta {
            title: matter.title.unwrap_or_else(|| slug.clone()),
            published_at,
            summary: matter.summary.unwrap_or_default(),
            tags,
            image: matter.image.filter(|img| !img.is_empty()),
        };

        Ok(Post {
            slug,
            metadata,
            content: body,
        })
    }
}
