use std::io;
use std::io::ErrorKind;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use ntex::web;
use ntex::web::HttpRequest;
use serde::Serialize;
use spdlog::{error, info, warn};

use crate::config::Config;
use crate::content::loader::ContentDir;
use crate::content::Post;
use crate::feed::{FeedInfo, FORMATS};
use crate::feed::{atom, json_feed, rss};
use crate::memo::ViewMemo;
use crate::query_string::QueryString;
use crate::search::filter_posts;
use crate::sitemap;
use crate::views::store::RedisStore;
use crate::views::ViewCounter;

struct AppState {
    config: Config,
    views: ViewCounter<RedisStore>,
}

impl AppState {
    fn content_dir(&self) -> ContentDir {
        ContentDir::new(self.config.paths.content_dir.clone(), self.config.index_base_name())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewsBody<'a> {
    slug: &'a str,
    views: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary<'a> {
    slug: &'a str,
    title: &'a str,
    summary: &'a str,
    tags: &'a [String],
    published_at: &'a NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    views: u64,
}

impl<'a> PostSummary<'a> {
    fn from_post(post: &'a Post, views: u64) -> Self {
        PostSummary {
            slug: post.slug.as_str(),
            title: post.metadata.title.as_str(),
            summary: post.metadata.summary.as_str(),
            tags: post.metadata.tags.as_slice(),
            published_at: &post.metadata.published_at,
            image: post.metadata.image.as_deref(),
            views,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostDetail<'a> {
    #[serde(flatten)]
    summary: PostSummary<'a>,
    content: &'a str,
}

fn bad_request(msg: &str) -> web::HttpResponse {
    web::HttpResponse::BadRequest().json(&ErrorBody { error: msg })
}

fn not_found(msg: &str) -> web::HttpResponse {
    web::HttpResponse::NotFound().json(&ErrorBody { error: msg })
}

fn server_error(msg: &str) -> web::HttpResponse {
    web::HttpResponse::InternalServerError().json(&ErrorBody { error: msg })
}

#[web::get("/api/posts")]
async fn list_posts(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let posts = match state.content_dir().load_posts() {
        Ok(posts) => posts,
        Err(e) => {
            error!("Error listing posts: {}", e);
            return server_error("Error listing posts");
        }
    };

    let views = state.views.all().await;
    let items: Vec<PostSummary> = posts
        .iter()
        .map(|post| {
            let count = views.get(post.slug.as_str()).copied().unwrap_or(0);
            PostSummary::from_post(post, count)
        })
        .collect();

    web::HttpResponse::Ok().json(&items)
}

#[web::get("/api/posts/{slug}")]
async fn get_post(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let slug = path.into_inner();

    let post = match state.content_dir().find(slug.as_str()) {
        Ok(Some(post)) => post,
        Ok(None) => return not_found("Post not found"),
        Err(e) => {
            error!("Error loading post {}: {}", slug, e);
            return server_error("Error loading post");
        }
    };

    let views = state.views.get(post.slug.as_str()).await;
    web::HttpResponse::Ok().json(&PostDetail {
        summary: PostSummary::from_post(&post, views),
        content: post.content.as_str(),
    })
}

#[web::get("/api/search")]
async fn search(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let qs = QueryString::from(req.uri().query().unwrap_or(""));
    let tags = qs.get_tags();

    let posts = match state.content_dir().load_posts() {
        Ok(posts) => posts,
        Err(e) => {
            error!("Error listing posts: {}", e);
            return server_error("Error listing posts");
        }
    };

    let found = filter_posts(&posts, qs.get_query(), &tags);

    // One store read per distinct slug for the whole request
    let memo = ViewMemo::for_request(&state.views);
    let mut items = Vec::with_capacity(found.len());
    for post in found {
        let views = memo.views(post.slug.as_str()).await;
        items.push(PostSummary::from_post(post, views));
    }

    web::HttpResponse::Ok().json(&items)
}

#[web::post("/api/views")]
async fn increment_views(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let qs = QueryString::from(req.uri().query().unwrap_or(""));
    let Some(slug) = qs.get_slug() else {
        return bad_request("Missing slug parameter");
    };

    match state.views.incr(slug).await {
        Ok(views) => web::HttpResponse::Ok().json(&ViewsBody { slug, views }),
        Err(e) if e.kind() == ErrorKind::InvalidInput => bad_request("Invalid slug parameter"),
        Err(e) => {
            error!("Error incrementing view count for {}: {}", slug, e);
            server_error("Failed to update view count")
        }
    }
}

#[web::get("/api/views/{slug}")]
async fn get_views(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let slug = path.into_inner();
    let views = state.views.get(slug.as_str()).await;

    web::HttpResponse::Ok().json(&ViewsBody {
        slug: slug.as_str(),
        views,
    })
}

#[web::get("/feed/{format}")]
async fn feed(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let format = path.into_inner();
    if !FORMATS.contains(&format.as_str()) {
        return not_found("Unsupported feed format");
    }

    let posts = match state.content_dir().load_posts() {
        Ok(posts) => posts,
        Err(e) => {
            error!("Error listing posts: {}", e);
            return server_error("Error listing posts");
        }
    };

    let info = FeedInfo::from_site(&state.config.site);
    let rendered: Result<(Vec<u8>, &str), String> = match format.as_str() {
        "rss.xml" => rss::render(&info, &posts)
            .map(|buf| (buf, "application/xml"))
            .map_err(|e| e.to_string()),
        "atom.xml" => atom::render(&info, &posts)
            .map(|buf| (buf, "application/xml"))
            .map_err(|e| e.to_string()),
        _ => json_feed::render(&info, &posts)
            .map(|buf| (buf, "application/json"))
            .map_err(|e| e.to_string()),
    };

    match rendered {
        Ok((buf, content_type)) => web::HttpResponse::Ok()
            .content_type(content_type)
            .body(buf),
        Err(e) => {
            error!("Error rendering {} feed: {}", format, e);
            server_error("Error rendering feed")
        }
    }
}

#[web::get("/sitemap.xml")]
async fn sitemap_xml(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let posts = match state.content_dir().load_posts() {
        Ok(posts) => posts,
        Err(e) => {
            error!("Error listing posts: {}", e);
            return server_error("Error listing posts");
        }
    };

    let info = FeedInfo::from_site(&state.config.site);
    match sitemap::render(&info, &posts, Utc::now().date_naive()) {
        Ok(buf) => web::HttpResponse::Ok()
            .content_type("application/xml")
            .body(buf),
        Err(e) => {
            error!("Error rendering sitemap: {}", e);
            server_error("Error rendering sitemap")
        }
    }
}

pub async fn server_run(config: Config, views: ViewCounter<RedisStore>) -> io::Result<()> {
    let content = ContentDir::new(config.paths.content_dir.clone(), config.index_base_name());
    match content.load_posts() {
        Ok(posts) => {
            for post in posts.iter() {
                info!("Post: {}", post.slug);
            }
            info!("Serving {} posts from {}", posts.len(), config.paths.content_dir.to_str().unwrap());
        }
        Err(e) => warn!("Error loading content at startup: {}", e),
    }

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState { config, views });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(list_posts)
            .service(get_post)
            .service(search)
            .service(increment_views)
            .service(get_views)
            .service(feed)
            .service(sitemap_xml)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
