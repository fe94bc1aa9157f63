use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::Post;
use crate::feed::FeedInfo;
use crate::text_utils::format_rfc3339;

pub fn render(info: &FeedInfo, posts: &[Post]) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
    writer.write_event(decl)?;

    // <feed xmlns="http://www.w3.org/2005/Atom">
    let mut feed = BytesStart::new("feed");
    feed.push_attribute(("xmlns", "http://www.w3.org/2005/Atom"));
    writer.write_event(Event::Start(feed))?;

    push_text(&mut writer, "id", info.base_url().as_str())?;
    push_text(&mut writer, "title", info.title)?;

    // The feed is as fresh as its newest entry
    if let Some(latest) = posts.first() {
        push_text(&mut writer, "updated", format_rfc3339(&latest.metadata.published_at).as_str())?;
    }

    writer.write_event(Event::Start(BytesStart::new("author")))?;
    push_text(&mut writer, "name", info.author)?;
    push_text(&mut writer, "email", info.email)?;
    writer.write_event(Event::End(BytesEnd::new("author")))?;

    push_link(&mut writer, info.base_url().as_str(), "alternate")?;
    push_link(&mut writer, info.feed_url("atom.xml").as_str(), "self")?;

    for post in posts {
        writer.write_event(Event::Start(BytesStart::new("entry")))?;

        let url = info.post_url(post.slug.as_str());
        push_text(&mut writer, "id", url.as_str())?;
        push_text(&mut writer, "title", post.metadata.title.as_str())?;
        push_link(&mut writer, url.as_str(), "alternate")?;
        push_text(&mut writer, "updated", format_rfc3339(&post.metadata.published_at).as_str())?;
        push_text(&mut writer, "summary", post.metadata.summary.as_str())?;

        for tag in post.metadata.tags.iter() {
            let mut category = BytesStart::new("category");
            category.push_attribute(("term", tag.as_str()));
            writer.write_event(Event::Empty(category))?;
        }

        writer.write_event(Event::End(BytesEnd::new("entry")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("feed")))?;

    Ok(writer.into_inner().into_inner())
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_link(writer: &mut Writer<Cursor<Vec<u8>>>, href: &str, rel: &str) -> quick_xml::Result<()> {
    let mut link = BytesStart::new("link");
    link.push_attribute(("href", href));
    link.push_attribute(("rel", rel));
    writer.write_event(Event::Empty(link))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str;

    use crate::test_data::{sample_feed_info, sample_post};

    use super::*;

    #[test]
    fn render_xml() {
        let posts = vec![sample_post("1")];
        let info = sample_feed_info();

        let xml = render(&info, &posts).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    #[test]
    fn render_empty_feed() {
        let info = sample_feed_info();
        let xml = render(&info, &[]).unwrap();
        let buf = str::from_utf8(&xml).unwrap();
        assert!(!buf.contains("<entry>"));
        assert!(!buf.contains("<updated>"));
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><feed xmlns="http://www.w3.org/2005/Atom"><id>https://example.com/</id><title>My writings</title><updated>2024-01-02T05:06:07Z</updated><author><name>Someone</name><email>someone@example.com</email></author><link href="https://example.com/" rel="alternate"/><link href="https://example.com/feed/atom.xml" rel="self"/><entry><id>https://example.com/writings/post-1/</id><title>Title of post 1</title><link href="https://example.com/writings/post-1/" rel="alternate"/><updated>2024-01-02T05:06:07Z</updated><summary>Summary of post 1</summary><category term="tag-a-1"/><category term="tag-b-1"/></entry></feed>"##;
}
