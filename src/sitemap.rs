use std::io::Cursor;

use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::Post;
use crate::feed::{FeedInfo, FORMATS};

/// Fixed routes carry today's date as lastmod; post routes carry their
/// publication date.
pub fn render(info: &FeedInfo, posts: &[Post], today: NaiveDate) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
    writer.write_event(decl)?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9"));
    writer.write_event(Event::Start(urlset))?;

    let today = today.format("%Y-%m-%d").to_string();

    push_url(&mut writer, info.base_url().as_str(), today.as_str())?;
    push_url(&mut writer, format!("{}writings/", info.base_url()).as_str(), today.as_str())?;

    for post in posts {
        let lastmod = post.metadata.published_at.format("%Y-%m-%d").to_string();
        push_url(&mut writer, info.post_url(post.slug.as_str()).as_str(), lastmod.as_str())?;
    }

    for format in FORMATS {
        push_url(&mut writer, info.feed_url(format).as_str(), today.as_str())?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    Ok(writer.into_inner().into_inner())
}

fn push_url(writer: &mut Writer<Cursor<Vec<u8>>>, loc: &str, lastmod: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("url")))?;

    writer.write_event(Event::Start(BytesStart::new("loc")))?;
    writer.write_event(Event::Text(BytesText::new(loc)))?;
    writer.write_event(Event::End(BytesEnd::new("loc")))?;

    writer.write_event(Event::Start(BytesStart::new("lastmod")))?;
    writer.write_event(Event::Text(BytesText::new(lastmod)))?;
    writer.write_event(Event::End(BytesEnd::new("lastmod")))?;

    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}
