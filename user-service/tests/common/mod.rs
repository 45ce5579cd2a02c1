#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use tempfile::TempDir;
use user_service::domain::user::models::Role;
use user_service::domain::user::models::UserChanges;
use user_service::domain::user::models::UserId;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: InMemoryUserRepository,
    pub authenticator: Arc<Authenticator>,
    pub upload_dir: TempDir,
}

/// Throwaway Postgres database with migrations applied
pub struct TestDb {
    pub pool: PgPool,
    admin_url: String,
    name: String,
}

/// A registered user together with a valid token
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = InMemoryUserRepository::new();
        let upload_dir = tempfile::tempdir().expect("Failed to create upload directory");

        // Minimum bcrypt cost keeps the suite fast
        let authenticator = Arc::new(
            Authenticator::new(TEST_SECRET, 24).with_password_hasher(PasswordHasher::with_cost(4)),
        );

        let user_service = Arc::new(UserService::new(
            Arc::new(repository.clone()),
            Arc::clone(&authenticator),
        ));

        let router = create_router(
            user_service,
            Arc::clone(&authenticator),
            upload_dir.path().to_path_buf(),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            authenticator,
            upload_dir,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PATCH request
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.patch(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.delete(path).bearer_auth(token)
    }

    /// Register a user through the API and return the response body
    pub async fn create_user(&self, username: &str) -> Value {
        let response = self
            .post("/api/users")
            .json(&json!({
                "name": format!("{username} Test"),
                "username": username,
                "email": format!("{username}@example.com"),
                "password": TEST_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Register and log in a user
    pub async fn signed_in_user(&self, username: &str) -> TestUser {
        let body = self.create_user(username).await;
        let email = format!("{username}@example.com");
        let token = self.login(&email, TEST_PASSWORD).await;

        TestUser {
            id: body["data"]["id"].as_str().unwrap().to_string(),
            email,
            token,
        }
    }

    /// Change a role directly in the store, bypassing the API
    pub async fn set_role(&self, user_id: &str, role: Role) {
        let id = UserId::from_string(user_id).expect("Invalid user id");
        self.repository
            .update(&id, UserChanges::role(role))
            .await
            .expect("Failed to set role");
    }
}

impl TestDb {
    /// Create a uniquely named database next to the one in `DATABASE_URL`.
    ///
    /// Returns `None` when `DATABASE_URL` is unset so the suite still runs
    /// without a server.
    pub async fn new() -> Option<Self> {
        let admin_url = std::env::var("DATABASE_URL").ok()?;
        let name = format!(
            "test_users_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            admin_url,
            name,
        })
    }

    /// Close the pool and drop the database
    pub async fn cleanup(self) {
        self.pool.close().await;

        if let Ok(mut conn) = PgConnection::connect(&self.admin_url).await {
            let _ = conn
                .execute(
                    format!(
                        r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                        self.name
                    )
                    .as_str(),
                )
                .await;

            let _ = conn
                .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, self.name).as_str())
                .await;
        }
    }
}
