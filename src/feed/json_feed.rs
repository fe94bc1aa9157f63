use serde::Serialize;

use crate::content::Post;
use crate::feed::FeedInfo;
use crate::text_utils::format_rfc3339;

const VERSION: &str = "https://jsonfeed.org/version/1.1";

#[derive(Serialize)]
struct JsonFeed<'a> {
    version: &'static str,
    title: &'a str,
    home_page_url: String,
    feed_url: String,
    description: &'a str,
    authors: Vec<JsonAuthor<'a>>,
    items: Vec<JsonItem<'a>>,
}

#[derive(Serialize)]
struct JsonAuthor<'a> {
    name: &'a str,
    url: String,
}

#[derive(Serialize)]
struct JsonItem<'a> {
    id: String,
    url: String,
    title: &'a str,
    summary: &'a str,
    tags: &'a [String],
    date_published: String,
}

pub fn render(info: &FeedInfo, posts: &[Post]) -> serde_json::Result<Vec<u8>> {
    let items = posts
        .iter()
        .map(|post| {
            let url = info.post_url(post.slug.as_str());
            JsonItem {
                id: url.clone(),
                url,
                title: post.metadata.title.as_str(),
                summary: post.metadata.summary.as_str(),
                tags: post.metadata.tags.as_slice(),
                date_published: format_rfc3339(&post.metadata.published_at),
            }
        })
        .collect();

    let feed = JsonFeed {
        version: VERSION,
        title: info.title,
        home_page_url: info.base_url(),
        feed_url: info.feed_url("feed.json"),
        description: info.description,
        authors: vec![JsonAuthor {
            name: info.author,
            url: info.base_url(),
        }],
        items,
    };

    serde_json::to_vec(&feed)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::test_data::{sample_feed_info, sample_post};

    use super::*;

    #[test]
    fn render_json() {
        let posts = vec![sample_post("1"), sample_post("2")];
        let info = sample_feed_info();

        let buf = render(&info, &posts).unwrap();
        let feed: Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(feed["version"], VERSION);
        assert_eq!(feed["title"], "My writings");
        assert_eq!(feed["home_page_url"], "https://example.com/");
        assert_eq!(feed["feed_url"], "https://example.com/feed/feed.json");
        assert_eq!(feed["authors"][0]["name"], "Someone");

        let items = feed["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "https://example.com/writings/post-1/");
        assert_eq!(items[0]["title"], "Title of post 1");
        assert_eq!(items[0]["summary"], "Summary of post 1");
        assert_eq!(items[0]["tags"][0], "tag-a-1");
        assert_eq!(items[0]["date_published"], "2024-01-02T05:06:07Z");
    }
}
