use crate::config::Site;

pub mod atom;
pub mod json_feed;
pub mod rss;

pub const FORMATS: [&str; 3] = ["rss.xml", "atom.xml", "feed.json"];

/// Channel-level feed data, shared by the three renderers.
pub struct FeedInfo<'a> {
    pub title: &'a str,
    pub site_url: &'a str,
    pub description: &'a str,
    pub author: &'a str,
    pub email: &'a str,
}

impl<'a> FeedInfo<'a> {
    pub fn from_site(site: &'a Site) -> Self {
        FeedInfo {
            title: &site.title,
            site_url: &site.base_url,
            description: &site.description,
            author: &site.author,
            email: &site.email,
        }
    }

    pub fn base_url(&self) -> String {
        if self.site_url.ends_with('/') {
            self.site_url.to_string()
        } else {
            format!("{}/", self.site_url)
        }
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}writings/{}/", self.base_url(), slug)
    }

    pub fn feed_url(&self, format: &str) -> String {
        format!("{}feed/{}", self.base_url(), format)
    }
}
