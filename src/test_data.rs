use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::content::{Post, PostMeta};
use crate::feed::FeedInfo;

pub const POST_FULL_MDX: &str = r#"---
title: Understanding Database Internals
publishedAt: 2024-04-09
summary: How databases keep your data safe
tags: "database, storage, acid"
image: /images/dbms.png
---

Every database is, at its heart, a log and an index.

The log gives you durability. The index gives you speed. Everything else
is bookkeeping around those two facts.
"#;

pub fn sample_post(id: &str) -> Post {
    let dt = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 01, 02).unwrap(),
        NaiveTime::from_hms_opt(5, 6, 7).unwrap(),
    );

    Post {
        slug: format!("post-{}", id),
        metadata: PostMeta {
            title: format!("Title of post {}", id),
            published_at: dt,
            summary: format!("Summary of post {}", id),
            tags: vec![format!("tag-a-{}", id), format!("tag-b-{}", id)],
            image: None,
        },
        content: format!("Body of post {}", id),
    }
}

pub fn sample_feed_info() -> FeedInfo<'static> {
    FeedInfo {
        title: "My writings",
        site_url: "https://example.com",
        description: "Notes on software",
        author: "Someone",
        email: "someone@example.com",
    }
}
