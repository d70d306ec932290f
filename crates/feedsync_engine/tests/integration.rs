//! Integration tests for the feed synchronizer and the reference server.

use feedsync_engine::{
    FeedApi, FeedConfig, FeedError, FeedResult, FeedSynchronizer, FormValue, HttpBody,
    HttpClient, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ImageFile, Intent,
    Operation, PostDraft,
};
use feedsync_protocol::{Post, PostId, PostInput, PostsPage};
use feedsync_server::{FeedServer, ServerConfig, ServerError, UploadedImage};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A transport that talks to an in-memory server.
struct InMemoryTransport {
    server: Arc<FeedServer>,
    token: Option<String>,
    connected: AtomicBool,
}

impl InMemoryTransport {
    fn new(server: Arc<FeedServer>, token: Option<String>) -> Self {
        Self {
            server,
            token,
            connected: AtomicBool::new(true),
        }
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

fn server_error(e: ServerError) -> FeedError {
    FeedError::Application(vec![e.to_string()])
}

impl FeedApi for InMemoryTransport {
    fn get_status(&self) -> FeedResult<String> {
        self.server.get_status(self.token()).map_err(server_error)
    }

    fn set_status(&self, status: &str) -> FeedResult<String> {
        self.server
            .set_status(self.token(), status)
            .map_err(server_error)
    }

    fn list_posts(&self, page: i64) -> FeedResult<PostsPage> {
        self.server
            .list_posts(self.token(), page)
            .map_err(server_error)
    }

    fn create_post(&self, input: &PostInput) -> FeedResult<Post> {
        self.server
            .create_post(self.token(), input)
            .map_err(server_error)
    }

    fn update_post(&self, id: &PostId, input: &PostInput) -> FeedResult<Post> {
        self.server
            .update_post(self.token(), id, input)
            .map_err(server_error)
    }

    fn delete_post(&self, id: &PostId) -> FeedResult<()> {
        self.server
            .delete_post(self.token(), id)
            .map(|_| ())
            .map_err(server_error)
    }

    fn upload_image(
        &self,
        image: &ImageFile,
        previous: Option<&str>,
    ) -> FeedResult<Option<String>> {
        let upload = UploadedImage::new(image.file_name.clone(), image.bytes.clone());
        self.server
            .upload_image(self.token(), Some(upload), previous)
            .map(|reply| reply.file_path)
            .map_err(server_error)
    }

    fn page_size(&self) -> usize {
        self.server.config().page_size
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn close(&self) -> FeedResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// An HTTP client that answers from an in-memory server.
///
/// It understands just enough of the GraphQL documents to route the status,
/// listing and create operations, and it keeps every query it saw.
struct LoopbackClient {
    server: Arc<FeedServer>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl LoopbackClient {
    fn new(server: Arc<FeedServer>) -> Self {
        Self {
            server,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn graph(&self, token: Option<&str>, query: &str) -> HttpResponse {
        let data = if query.contains("getUserStatus") {
            self.server
                .get_status(token)
                .map(|status| json!({ "getUserStatus": status }))
        } else if let Some(page) = query_argument(query, "currentPage: ") {
            let page: i64 = page.parse().unwrap();
            self.server
                .list_posts(token, page)
                .map(|page| json!({ "getPosts": page }))
        } else if query.contains("createPost(") {
            let input = PostInput::new(
                string_literal(query, "title: "),
                string_literal(query, "content: "),
                string_literal(query, "imageUrl: "),
            );
            self.server
                .create_post(token, &input)
                .map(|post| json!({ "createPost": post }))
        } else {
            return json_response(404, json!({ "message": "unsupported query" }));
        };

        match data {
            Ok(data) => json_response(200, json!({ "data": data })),
            Err(e) => json_response(
                200,
                json!({ "errors": [{ "message": e.to_string(), "status": e.status_code() }], "data": null }),
            ),
        }
    }

    fn upload(&self, token: Option<&str>, parts: &[feedsync_engine::FormPart]) -> HttpResponse {
        let mut image = None;
        let mut old_path = None;
        for part in parts {
            match (&part.name[..], &part.value) {
                ("image", FormValue::File(file)) => {
                    image = Some(UploadedImage::new(file.file_name.clone(), file.bytes.clone()));
                }
                ("oldPath", FormValue::Text(path)) => old_path = Some(path.clone()),
                _ => {}
            }
        }
        match self.server.upload_image(token, image, old_path.as_deref()) {
            Ok(reply) => json_response(201, serde_json::to_value(reply).unwrap()),
            Err(e) => json_response(e.status_code(), json!({ "message": e.to_string() })),
        }
    }
}

impl HttpClient for LoopbackClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let token = request.bearer.as_deref();
        match (request.method, &request.body) {
            (HttpMethod::Post, HttpBody::Json(bytes)) => {
                let body: serde_json::Value =
                    serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
                let query = body["query"].as_str().ok_or("missing query")?.to_string();
                self.queries.lock().push(query.clone());
                Ok(self.graph(token, &query))
            }
            (HttpMethod::Put, HttpBody::Multipart(parts)) => Ok(self.upload(token, parts)),
            (method, _) => Err(format!("unexpected {method:?} request")),
        }
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

/// Returns the bare token following `key`, e.g. a page number.
fn query_argument<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    let start = query.find(key)? + key.len();
    let rest = &query[start..];
    let end = rest
        .find(|c: char| c != '-' && !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Decodes the double-quoted string literal following `key` with JSON
/// string rules.
fn string_literal(query: &str, key: &str) -> String {
    let start = query.find(key).unwrap() + key.len();
    let rest = query[start..].strip_prefix('"').unwrap();
    let mut end = None;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                end = Some(i);
                break;
            }
            _ => {}
        }
    }
    let raw = &rest[..end.unwrap()];
    serde_json::from_str(&format!("\"{raw}\"")).unwrap()
}

struct Fixture {
    server: Arc<FeedServer>,
    token: String,
}

impl Fixture {
    fn new() -> Self {
        let server = Arc::new(FeedServer::new(ServerConfig::default()));
        let user = server.register_user("Max");
        let token = server.issue_token(&user).unwrap();
        Self { server, token }
    }

    fn seed(&self, titles: &[&str]) {
        for title in titles {
            self.server
                .create_post(
                    Some(self.token.as_str()),
                    &PostInput::new(*title, "Seeded content", ""),
                )
                .unwrap();
        }
    }

    fn synchronizer(&self) -> FeedSynchronizer<InMemoryTransport> {
        let transport =
            InMemoryTransport::new(Arc::clone(&self.server), Some(self.token.clone()));
        let mut sync = FeedSynchronizer::new(transport);
        sync.initialize();
        sync
    }
}

fn titles<A: FeedApi>(sync: &FeedSynchronizer<A>) -> Vec<String> {
    sync.posts().iter().map(|p| p.title.clone()).collect()
}

#[test]
fn initialize_against_server() {
    let fixture = Fixture::new();
    fixture.seed(&["Post one", "Post two", "Post three", "Post four"]);

    let sync = fixture.synchronizer();

    assert_eq!(sync.status(), "I am new!");
    assert_eq!(titles(&sync), vec!["Post four", "Post three", "Post two"]);
    assert_eq!(sync.total_posts(), 4);
    assert_eq!(sync.last_page(), 2);
    assert!(!sync.is_loading());
    assert!(sync.error().is_none());
}

#[test]
fn paginate_past_the_end() {
    let fixture = Fixture::new();
    fixture.seed(&["Post one", "Post two", "Post three", "Post four"]);
    let mut sync = fixture.synchronizer();

    sync.dispatch(Intent::LoadNext);
    assert_eq!(titles(&sync), vec!["Post one"]);

    sync.dispatch(Intent::LoadNext);
    assert_eq!(sync.current_page(), 3);
    assert!(sync.posts().is_empty());
    assert_eq!(sync.total_posts(), 4);
    assert!(sync.error().is_none());

    sync.dispatch(Intent::LoadPrevious);
    sync.dispatch(Intent::LoadPrevious);
    assert_eq!(sync.current_page(), 1);
    assert_eq!(sync.posts().len(), 3);
}

#[test]
fn status_update_round_trip() {
    let fixture = Fixture::new();
    let mut sync = fixture.synchronizer();

    sync.dispatch(Intent::StatusInput("  on vacation ".into()));
    sync.dispatch(Intent::UpdateStatus("  on vacation ".into()));

    assert_eq!(sync.status(), "on vacation");
    assert_eq!(
        fixture.server.get_status(Some(fixture.token.as_str())).unwrap(),
        "on vacation"
    );
}

#[test]
fn create_keeps_page_length_then_reload_is_authoritative() {
    let fixture = Fixture::new();
    fixture.seed(&["Post one", "Post two", "Post three"]);
    let mut sync = fixture.synchronizer();

    sync.dispatch(Intent::NewPost);
    sync.dispatch(Intent::SubmitEdit(PostDraft::new("Brand new", "Fresh content")));

    assert_eq!(titles(&sync), vec!["Brand new", "Post three", "Post two"]);
    assert_eq!(sync.total_posts(), 3);
    assert_eq!(fixture.server.post_count(), 4);

    sync.load_page(None);
    assert_eq!(titles(&sync), vec!["Brand new", "Post three", "Post two"]);
    assert_eq!(sync.total_posts(), 4);
}

#[test]
fn edit_with_new_image_replaces_old_one() {
    let fixture = Fixture::new();
    let mut sync = fixture.synchronizer();

    sync.begin_create();
    let first = ImageFile::new("first.png", "image/png", vec![1, 2, 3]);
    sync.submit_edit(PostDraft::new("Picture post", "With an image").with_image(first));

    let created = sync.posts()[0].clone();
    assert!(created.image_url.starts_with("images\\"));
    assert!(fixture.server.has_image(&created.image_url));

    assert!(sync.begin_edit(&created.id));
    let second = ImageFile::new("second.png", "image/png", vec![4, 5, 6]);
    sync.submit_edit(PostDraft::new("Picture post", "New image").with_image(second));

    let edited = &sync.posts()[0];
    assert_eq!(edited.id, created.id);
    assert_eq!(edited.content, "New image");
    assert_ne!(edited.image_url, created.image_url);
    assert!(!fixture.server.has_image(&created.image_url));
    assert!(fixture.server.has_image(&edited.image_url));
}

#[test]
fn edit_without_image_keeps_reference() {
    let fixture = Fixture::new();
    let mut sync = fixture.synchronizer();

    sync.begin_create();
    let image = ImageFile::new("keep.png", "image/png", vec![7]);
    sync.submit_edit(PostDraft::new("Keep image", "Original").with_image(image));
    let created = sync.posts()[0].clone();

    sync.begin_edit(&created.id);
    sync.submit_edit(PostDraft::new("Keep image", "Changed text"));

    assert_eq!(sync.posts()[0].image_url, created.image_url);
    assert!(fixture.server.has_image(&created.image_url));
}

#[test]
fn delete_resyncs_page() {
    let fixture = Fixture::new();
    fixture.seed(&["Post one", "Post two", "Post three", "Post four"]);
    let mut sync = fixture.synchronizer();

    let newest = sync.posts()[0].id.clone();
    sync.dispatch(Intent::DeletePost(newest));

    assert_eq!(titles(&sync), vec!["Post three", "Post two", "Post one"]);
    assert_eq!(sync.total_posts(), 3);
    assert!(!sync.is_loading());
}

#[test]
fn foreign_post_delete_is_rejected() {
    let fixture = Fixture::new();
    let other = fixture.server.register_user("Manu");
    let other_token = fixture.server.issue_token(&other).unwrap();
    fixture
        .server
        .create_post(
            Some(other_token.as_str()),
            &PostInput::new("Not yours", "Hands off", ""),
        )
        .unwrap();

    let mut sync = fixture.synchronizer();
    let id = sync.posts()[0].id.clone();
    sync.delete_post(&id);

    let error = sync.error().unwrap();
    assert_eq!(error.operation, Operation::DeletePost);
    assert_eq!(error.message, "Deleting the post failed!");
    assert_eq!(error.cause, FeedError::application("Not authorized!"));
    assert_eq!(sync.posts().len(), 1);
    assert_eq!(fixture.server.post_count(), 1);
}

#[test]
fn invalid_post_surfaces_save_error() {
    let fixture = Fixture::new();
    let mut sync = fixture.synchronizer();

    sync.begin_create();
    sync.submit_edit(PostDraft::new("Hi", "Too short"));

    let error = sync.error().unwrap();
    assert_eq!(error.operation, Operation::SavePost);
    assert_eq!(error.cause, FeedError::application("Invalid input."));
    assert!(sync.posts().is_empty());
    assert!(!sync.edit_mode().is_composing());

    sync.dispatch(Intent::DismissError);
    assert!(sync.error().is_none());
}

#[test]
fn unauthenticated_client_sees_latest_error() {
    let fixture = Fixture::new();
    let transport = InMemoryTransport::new(Arc::clone(&fixture.server), None);
    let mut sync = FeedSynchronizer::new(transport);

    sync.initialize();

    let error = sync.error().unwrap();
    assert_eq!(error.operation, Operation::LoadPosts);
    assert_eq!(error.cause, FeedError::application("Not authenticated!"));
    assert_eq!(sync.status(), "");
    assert!(!sync.is_loading());
}

#[test]
fn signed_tokens_work_end_to_end() {
    let server = Arc::new(FeedServer::new(
        ServerConfig::default().with_auth(b"integration-secret".to_vec()),
    ));
    let user = server.register_user("Max");
    let token = server.issue_token(&user).unwrap();

    let transport = InMemoryTransport::new(Arc::clone(&server), Some(token));
    let mut sync = FeedSynchronizer::new(transport);
    sync.initialize();
    sync.update_status("signed in");

    assert!(sync.error().is_none());
    assert_eq!(sync.status(), "signed in");
}

#[test]
fn create_with_image_over_http() {
    let fixture = Fixture::new();
    let client = LoopbackClient::new(Arc::clone(&fixture.server));
    let queries = Arc::clone(&client.queries);
    let config = FeedConfig::new("http://loopback.test").with_token(fixture.token.clone());
    let transport = HttpTransport::new(config, client);
    let mut sync = FeedSynchronizer::new(&transport);
    sync.initialize();
    assert!(sync.error().is_none());

    sync.begin_create();
    let image = ImageFile::new("cat.png", "image/png", vec![1, 2, 3]);
    sync.submit_edit(PostDraft::new("Cat picture", "A \"quoted\" cat").with_image(image));
    assert!(sync.error().is_none());

    let created = sync.posts()[0].clone();
    assert_eq!(created.content, "A \"quoted\" cat");
    assert!(created.image_url.starts_with("images\\"));
    assert_eq!(created.image_url.matches('\\').count(), 1);
    assert!(fixture.server.has_image(&created.image_url));

    let queries = queries.lock();
    let create = queries.iter().find(|q| q.contains("createPost(")).unwrap();
    assert_eq!(string_literal(create, "imageUrl: "), created.image_url);

    let stored = fixture
        .server
        .list_posts(Some(fixture.token.as_str()), 1)
        .unwrap();
    assert_eq!(stored.posts[0].image_url, created.image_url);
}
