use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::Post;
use crate::feed::FeedInfo;
use crate::text_utils::format_rfc2822;

/* Example
<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">

<channel>
  <title>My writings</title>
  <link>https://example.com</link>
  <description>Notes on software</description>
  <item>
    <title>Understanding Database Internals</title>
    <link>https://example.com/writings/understanding-dbms/</link>
    <description>How databases keep your data safe</description>
  </item>
</channel>

</rss>
*/

pub fn render(info: &FeedInfo, posts: &[Post]) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    // <?xml version="1.0" encoding="UTF-8" ?>
    let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
    writer.write_event(decl)?;

    // <rss version="2.0">
    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;

    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    push_text(&mut writer, "title", info.title)?;
    push_text(&mut writer, "link", info.site_url)?;
    push_text(&mut writer, "description", info.description)?;

    for post in posts {
        writer.write_event(Event::Start(BytesStart::new("item")))?;

        push_text(&mut writer, "title", post.metadata.title.as_str())?;

        let link = info.post_url(post.slug.as_str());
        push_text(&mut writer, "link", link.as_str())?;

        // <guid isPermaLink="true">https://example.com/writings/understanding-dbms/</guid>
        let mut guid_elem = BytesStart::new("guid");
        guid_elem.push_attribute(("isPermaLink", "true"));
        writer.write_event(Event::Start(guid_elem))?;
        writer.write_event(Event::Text(BytesText::new(link.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        push_cdata(&mut writer, "description", post.metadata.summary.as_str())?;

        for tag in post.metadata.tags.iter() {
            push_text(&mut writer, "category", tag.as_str())?;
        }

        // <pubDate>Tue, 9 Apr 2024 00:00:00 +0000</pubDate>
        let pub_date = format_rfc2822(&post.metadata.published_at);
        push_text(&mut writer, "pubDate", pub_date.as_str())?;

        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(writer.into_inner().into_inner())
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(&new_text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
