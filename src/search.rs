use crate::content::Post;

/// Queries shorter than this match everything, mirroring the search box
/// behavior of only kicking in after a few characters.
const MIN_QUERY_LEN: usize = 3;

/// Filters posts by free-text query and tag list. Both filters compose
/// with AND; the incoming date-descending order is preserved.
pub fn filter_posts<'a>(posts: &'a [Post], query: Option<&str>, tags: &[String]) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| matches_query(post, query) && matches_tags(post, tags))
        .collect()
}

fn matches_query(post: &Post, query: Option<&str>) -> bool {
    let Some(query) = query else {
        return true;
    };
    if query.len() < MIN_QUERY_LEN {
        return true;
    }

    let query = query.to_lowercase();
    post.metadata.title.to_lowercase().contains(&query)
        || post.content.to_lowercase().contains(&query)
}

fn matches_tags(post: &Post, tags: &[String]) -> bool {
    if tags.is_empty() {
        return true;
    }

    tags.iter().any(|wanted| {
        let wanted = wanted.to_lowercase();
        post.metadata
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&wanted))
    })
}
