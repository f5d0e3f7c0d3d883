use nover_server::config::{AuthConfig, Config, DatabaseConfig};
use nover_store::SqliteStore;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
    /// Direct store handle for fixtures no route exposes (unlock records)
    #[allow(dead_code)]
    pub store: Arc<SqliteStore>,
    pub client: Client,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0, // OS assigns port
            app_name: "nover-test".into(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::with_secret(TEST_SECRET),
        };

        let store = Arc::new(SqliteStore::in_memory().unwrap());
        store.seed_reference_data().unwrap();

        let state = nover_server::state::AppState::with_store(&config, store.clone());
        let app = nover_server::routes::router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            url: format!("http://{addr}"),
            addr,
            store,
            client: Client::new(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Register a user and return the response
    #[allow(dead_code)]
    pub async fn register(&self, username: &str) -> Response {
        self.client
            .post(self.endpoint("/api/auth/register"))
            .json(&json!({
                "email": format!("{username}@example.com"),
                "username": username,
                "password": "correct horse",
                "fullName": username,
            }))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Log in and return the bearer token
    #[allow(dead_code)]
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .client
            .post(self.endpoint("/api/auth/login"))
            .json(&json!({ "username": username, "password": "correct horse" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register, log in and upgrade to author; returns (user id, token)
    #[allow(dead_code)]
    pub async fn author(&self, username: &str) -> (i64, String) {
        assert_eq!(self.register(username).await.status(), 201);
        let token = self.login(username).await;

        let response = self
            .client
            .post(self.endpoint("/api/v1/user/request-author"))
            .bearer_auth(&token)
            .json(&json!({
                "penName": format!("{username} the scribe"),
                "phone": "08123456789",
                "bankId": 1,
                "accountNumber": "1234567890",
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        (body["user"]["userId"].as_i64().unwrap(), token)
    }

    /// Register and log in a plain reader; returns (user id, token)
    #[allow(dead_code)]
    pub async fn reader(&self, username: &str) -> (i64, String) {
        let response = self.register(username).await;
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        (body["userId"].as_i64().unwrap(), self.login(username).await)
    }

    /// Create a draft book as the given author; returns its id
    #[allow(dead_code)]
    pub async fn create_book(&self, token: &str, title: &str) -> i64 {
        let response = self
            .client
            .post(self.endpoint("/api/v1/books/create"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "description": "A tale", "genreIds": [1, 3] }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        body["bookId"].as_i64().unwrap()
    }

    /// Add a chapter; returns its JSON body
    #[allow(dead_code)]
    pub async fn add_chapter(
        &self,
        token: &str,
        book_id: i64,
        title: &str,
        coin_cost: i64,
    ) -> Value {
        let response = self
            .client
            .post(self.endpoint(&format!("/api/v1/books/{book_id}/chapters")))
            .bearer_auth(token)
            .json(&json!({
                "title": title,
                "content": format!("{title} text"),
                "coinCost": coin_cost,
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
        response.json().await.unwrap()
    }

    /// PATCH a status transition and return the response
    #[allow(dead_code)]
    pub async fn transition(&self, token: &str, book_id: i64, action: &str) -> Response {
        self.client
            .patch(self.endpoint(&format!("/api/v1/books/{book_id}/{action}")))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Read the machine code from an error envelope
#[allow(dead_code)]
pub async fn error_code(response: Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["code"].as_str().unwrap_or_default().to_string()
}
