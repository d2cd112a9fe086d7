//! Integration tests for the user and revoked-token repositories.

use chrono::{Duration, Utc};
use rentora_core::error::RentoraError;
use rentora_core::models::revoked_token::CreateRevokedToken;
use rentora_core::models::user::{CreateUser, Role, UpdateUser};
use rentora_core::repository::{RevokedTokenRepository, UserRepository};
use rentora_db::repository::{SurrealRevokedTokenRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentora_db::run_migrations(&db).await.unwrap();
    db
}

fn new_user(username: &str, role: Role) -> CreateUser {
    CreateUser {
        username: username.into(),
        first_name: "Test".into(),
        last_name: "User".into(),
        email: format!("{username}@example.com"),
        password: "SuperSecret123!".into(),
        role,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("alice", Role::Tenant)).await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, Role::Tenant);
    assert!(user.is_active);

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "SuperSecret123!");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);

    let by_name = repo.get_by_username("alice").await.unwrap();
    assert_eq!(by_name.id, user.id);

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(new_user("alice", Role::Tenant)).await.unwrap();

    let mut dup = new_user("alice", Role::Tenant);
    dup.email = "other@example.com".into();
    assert!(repo.create(dup).await.is_err());
}

#[tokio::test]
async fn update_and_soft_delete() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("bob", Role::Landlord)).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                first_name: Some("Robert".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Robert");
    assert_eq!(updated.username, "bob");

    repo.delete(user.id).await.unwrap();
    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(!fetched.is_active, "delete must deactivate, not remove");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RentoraError::NotFound { .. }));
}

#[tokio::test]
async fn revocation_round_trip() {
    let db = setup().await;
    let repo = SurrealRevokedTokenRepository::new(db);
    let jti = Uuid::new_v4().to_string();

    assert!(!repo.is_revoked(&jti).await.unwrap());

    let entry = repo
        .revoke(CreateRevokedToken {
            jti: jti.clone(),
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() + Duration::days(30),
        })
        .await
        .unwrap();
    assert_eq!(entry.jti, jti);
    assert!(repo.is_revoked(&jti).await.unwrap());

    // Revoking again is a no-op returning the same entry.
    let again = repo
        .revoke(CreateRevokedToken {
            jti: jti.clone(),
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() + Duration::days(30),
        })
        .await
        .unwrap();
    assert_eq!(again.id, entry.id);
}

#[tokio::test]
async fn concurrent_revocations_share_one_entry() {
    let db = setup().await;
    let repo = SurrealRevokedTokenRepository::new(db);
    let jti = Uuid::new_v4().to_string();
    let user_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::days(30);

    let (a, b) = tokio::join!(
        repo.revoke(CreateRevokedToken {
            jti: jti.clone(),
            user_id,
            expires_at,
        }),
        repo.revoke(CreateRevokedToken {
            jti: jti.clone(),
            user_id,
            expires_at,
        }),
    );
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.id, b.id, "racing revocations must converge on one row");
    assert!(repo.is_revoked(&jti).await.unwrap());
}

#[tokio::test]
async fn cleanup_removes_only_expired_entries() {
    let db = setup().await;
    let repo = SurrealRevokedTokenRepository::new(db);

    repo.revoke(CreateRevokedToken {
        jti: "expired".into(),
        user_id: Uuid::new_v4(),
        expires_at: Utc::now() - Duration::hours(1),
    })
    .await
    .unwrap();
    repo.revoke(CreateRevokedToken {
        jti: "live".into(),
        user_id: Uuid::new_v4(),
        expires_at: Utc::now() + Duration::days(30),
    })
    .await
    .unwrap();

    let removed = repo.cleanup_expired().await.unwrap();
    assert_eq!(removed, 1);
    assert!(!repo.is_revoked("expired").await.unwrap());
    assert!(repo.is_revoked("live").await.unwrap());
}
