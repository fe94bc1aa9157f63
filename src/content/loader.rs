use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::content::Post;
use crate::text_utils::slugify;

const CONTENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Scans the content directory on every call. At tens of files there is
/// nothing worth caching between requests.
pub struct ContentDir {
    pub root_dir: PathBuf,
    pub index_base_name: String,
}

impl ContentDir {
    pub fn new(root_dir: PathBuf, index_base_name: String) -> Self {
        ContentDir {
            root_dir,
            index_base_name,
        }
    }

    /// Every post, sorted by publication date descending.
    pub fn load_posts(&self) -> io::Result<Vec<Post>> {
        let mut posts = vec![];
        for (slug, path) in self.post_files()? {
            posts.push(Post::from_file(slug, path)?);
        }

        posts.sort_by(|a, b| b.metadata.published_at.cmp(&a.metadata.published_at));

        Ok(posts)
    }

    pub fn find(&self, slug: &str) -> io::Result<Option<Post>> {
        for (candidate, path) in self.post_files()? {
            if candidate == slug {
                return Ok(Some(Post::from_file(candidate, path)?));
            }
        }
        Ok(None)
    }

    /// Lists (slug, path) pairs for both content layouts: flat
    /// `<slug>.mdx` files and `<slug>/<index>.mdx` directories.
    fn post_files(&self) -> io::Result<Vec<(String, PathBuf)>> {
        let mut files = vec![];

        let entries = fs::read_dir(self.root_dir.as_path())?;
        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();

            if file_type.is_file() {
                if Self::is_content_file(&path) {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        files.push((slugify(stem), path));
                    }
                }
            } else if file_type.is_dir() {
                if let Some(index_path) = self.index_file(&path)? {
                    if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                        files.push((slugify(name), index_path));
                    }
                }
            }
        }

        Ok(files)
    }

    fn is_content_file(path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => CONTENT_EXTENSIONS.contains(&ext),
            None => false,
        }
    }

    fn index_file(&self, dir: &Path) -> io::Result<Option<PathBuf>> {
        for ext in CONTENT_EXTENSIONS {
            let candidate = dir.join(format!("{}.{}", self.index_base_name, ext));
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}
