// ABOUTME: Account and refresh token flow tests against an in-memory database
// ABOUTME: Covers registration uniqueness, credential checks and refresh token rotation

use chrono::{Duration, Utc};
use uuid::Uuid;

use agendly::auth::{hash_password, verify_password, AuthManager};
use agendly::database::{is_unique_violation, Database};
use agendly::models::{RefreshToken, User};

async fn setup() -> Database {
    let database = Database::new("sqlite::memory:").await.unwrap();
    database.migrate().await.unwrap();
    database
}

fn new_user(email: &str, password: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Owner".into(),
        email: email.into(),
        password_hash: hash_password(password).unwrap(),
        cell_phone: "5511999999999".into(),
        tax_id: "12345678901".into(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_registration_and_credential_check() {
    let database = setup().await;
    let user = new_user("owner@example.com", "hunter22");
    database.create_user(&user).await.unwrap();

    let stored = database
        .get_user_by_email("owner@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, user.id);
    assert!(verify_password("hunter22", &stored.password_hash).unwrap());
    assert!(!verify_password("wrong", &stored.password_hash).unwrap());
}

#[tokio::test]
async fn test_duplicate_email_is_a_unique_violation() {
    let database = setup().await;
    database
        .create_user(&new_user("owner@example.com", "hunter22"))
        .await
        .unwrap();

    let err = database
        .create_user(&new_user("owner@example.com", "other"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn test_issued_token_authenticates_the_user() {
    let database = setup().await;
    let user = new_user("owner@example.com", "hunter22");
    database.create_user(&user).await.unwrap();

    let manager = AuthManager::new("test-secret", 24);
    let token = manager.generate_token(&user).unwrap();
    let auth = manager.authenticate(&token).unwrap();

    assert_eq!(auth.user_id, user.id);
    let resolved = database.get_user(auth.user_id).await.unwrap().unwrap();
    assert_eq!(resolved.email, user.email);
}

#[tokio::test]
async fn test_profile_update_persists_fields_and_credentials() {
    let database = setup().await;
    let mut user = new_user("owner@example.com", "hunter22");
    database.create_user(&user).await.unwrap();

    user.name = "Renamed Owner".into();
    user.email = "renamed@example.com".into();
    user.password_hash = hash_password("new-secret").unwrap();
    user.cell_phone = "5511000000000".into();
    database.update_user(&user).await.unwrap();

    let stored = database.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Renamed Owner");
    assert_eq!(stored.cell_phone, "5511000000000");
    assert_eq!(stored.email, "renamed@example.com");
    // The old credentials no longer work
    assert!(verify_password("new-secret", &stored.password_hash).unwrap());
    assert!(!verify_password("hunter22", &stored.password_hash).unwrap());
    assert!(database
        .get_user_by_email("owner@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let database = setup().await;
    let user = new_user("owner@example.com", "hunter22");
    database.create_user(&user).await.unwrap();

    let now = Utc::now();
    let token = RefreshToken {
        id: Uuid::new_v4(),
        user_id: user.id,
        issued_at: now,
        expires_at: now + Duration::days(30),
    };
    database.create_refresh_token(&token).await.unwrap();

    let stored = database
        .get_refresh_token(token.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.user_id, user.id);
    assert!(stored.is_valid_at(now));

    // Rotation deletes the exchanged token
    database.delete_refresh_token(token.id).await.unwrap();
    assert!(database
        .get_refresh_token(token.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_expired_refresh_token_is_invalid() {
    let now = Utc::now();
    let token = RefreshToken {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        issued_at: now - Duration::days(31),
        expires_at: now - Duration::days(1),
    };
    assert!(!token.is_valid_at(now));
}
