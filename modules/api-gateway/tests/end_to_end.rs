#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use api_gateway::{GatewayConfig, GatewayModule, SecurityFilterChain};
use books::{BooksConfig, BooksModule, infra::storage::InMemoryBooksRepository};
use books_sdk::{Book, BooksError, BooksHttpClient, NewBook};
use bookshelf_security::{AuthConfig, JwtConfig};
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use serde_json::json;
use service_registry_sdk::StaticResolver;

const SECRET: &str = "e2e-secret";

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn token(roles: &[&str]) -> String {
    encode(
        &Header::default(),
        &json!({"sub": "spa", "exp": get_current_timestamp() + 600, "roles": roles}),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn stack(books_instances: usize) -> String {
    let cfg = BooksConfig {
        auth: AuthConfig {
            jwt: JwtConfig {
                secret: Some(SECRET.into()),
                ..JwtConfig::default()
            },
            ..AuthConfig::default()
        },
        ..BooksConfig::default()
    };

    let mut urls = Vec::new();
    if books_instances > 0 {
        let module =
            BooksModule::from_parts(Arc::new(InMemoryBooksRepository::new()), &cfg).unwrap();
        urls.push(serve(module.router()).await);
    }

    let resolver = StaticResolver::new().with_service("books-service", urls);
    let gateway = GatewayModule::new(
        &GatewayConfig::default(),
        SecurityFilterChain::empty(),
        Arc::new(resolver),
    );
    serve(gateway.router()).await
}

fn client(gateway: &str, roles: &[&str]) -> BooksHttpClient {
    BooksHttpClient::new(gateway, Duration::from_secs(5))
        .unwrap()
        .with_bearer_token(token(roles))
}

#[tokio::test]
async fn save_and_read_back_through_gateway() {
    let gw = stack(1).await;

    let saved = client(&gw, &["Books.Write"])
        .save_book(&NewBook::new("title1", "author1"))
        .await
        .unwrap();
    assert_eq!(saved.title, "title1");
    assert_eq!(saved.author, "author1");

    let read = client(&gw, &["Books.Read"]).get_book(saved.id).await.unwrap();
    assert_eq!(read, Some(saved));
}

#[tokio::test]
async fn absent_book_reads_as_none() {
    let gw = stack(1).await;
    let read = client(&gw, &["Books.Read"]).get_book(12345).await.unwrap();
    assert_eq!(read, None::<Book>);
}

#[tokio::test]
async fn missing_read_capability_is_forbidden() {
    let gw = stack(1).await;
    let err = client(&gw, &["Books.Write"]).get_book(1).await.unwrap_err();
    assert!(matches!(err, BooksError::Forbidden { .. }));
}

#[tokio::test]
async fn no_books_instance_is_unavailable() {
    let gw = stack(0).await;
    let err = client(&gw, &["Books.Read"]).get_book(1).await.unwrap_err();
    assert!(matches!(err, BooksError::Unavailable { .. }));
}
