// ABOUTME: Integration tests for registration, login, verification, and password reset
// ABOUTME: Registration is atomic; reset endpoints never leak account existence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use fithub_server::auth::AuthManager;
use fithub_server::database::Database;
use fithub_server::errors::ErrorCode;
use fithub_server::permissions::UserRole;
use fithub_server::services::accounts::Registration;
use fithub_server::services::AccountService;
use std::sync::Arc;

fn account_service(database: &Database) -> (AccountService, Arc<AuthManager>) {
    let auth = Arc::new(AuthManager::new(
        b"integration-test-secret-32-bytes!!",
        24,
    ));
    let service = AccountService::new(
        database.clone(),
        Arc::clone(&auth),
        common::test_notifier(),
        "http://localhost:5173".into(),
        "/media/avatars/default_avatar.jpg".into(),
    );
    (service, auth)
}

fn registration(email: &str) -> Registration {
    Registration {
        email: email.into(),
        password: "correct-horse-battery".into(),
        full_name: "Avery Quinn".into(),
        username: None,
        role: UserRole::Client,
    }
}

#[tokio::test]
async fn test_registration_creates_user_and_profile_atomically() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    let user = service
        .register(registration("avery@example.com"))
        .await
        .unwrap();

    assert_eq!(user.username, "avery");
    assert!(!user.is_verified);

    // Profile and verification token exist from the same transaction
    assert!(database.get_profile(user.id).await.unwrap().is_some());
    assert!(database
        .get_verification_token_for_user(user.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    service
        .register(registration("avery@example.com"))
        .await
        .unwrap();
    let error = service
        .register(registration("avery@example.com"))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_admin_self_registration_rejected() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    let mut attempt = registration("root@example.com");
    attempt.role = UserRole::Admin;
    let error = service.register(attempt).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_login_requires_verification() {
    let database = common::create_test_database().await;
    let (service, auth) = account_service(&database);

    let user = service
        .register(registration("avery@example.com"))
        .await
        .unwrap();

    // Unverified accounts cannot log in
    let error = service
        .login("avery@example.com", "correct-horse-battery")
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);

    // Verify through the emailed token, then login succeeds
    let token = database
        .get_verification_token_for_user(user.id)
        .await
        .unwrap()
        .unwrap();
    service.verify_email(token.token).await.unwrap();

    let (jwt, logged_in) = service
        .login("avery@example.com", "correct-horse-battery")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    let claims = auth.validate_token(&jwt).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.role, UserRole::Client);

    // The one-shot token is gone after use
    assert!(database
        .get_verification_token_for_user(user.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_answer_identically() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    service
        .register(registration("avery@example.com"))
        .await
        .unwrap();

    let wrong_password = service
        .login("avery@example.com", "nope-nope-nope")
        .await
        .unwrap_err();
    let unknown_email = service
        .login("ghost@example.com", "whatever-pass")
        .await
        .unwrap_err();
    assert_eq!(wrong_password.code, ErrorCode::AuthInvalid);
    assert_eq!(unknown_email.code, ErrorCode::AuthInvalid);
    assert_eq!(wrong_password.message, unknown_email.message);
}

#[tokio::test]
async fn test_resend_and_reset_never_leak_existence() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    // Unknown addresses still answer Ok
    assert!(service
        .resend_verification("nobody@example.com")
        .await
        .is_ok());
    assert!(service
        .request_password_reset("nobody@example.com")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_password_reset_flow() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    let user = service
        .register(registration("avery@example.com"))
        .await
        .unwrap();
    let verification = database
        .get_verification_token_for_user(user.id)
        .await
        .unwrap()
        .unwrap();
    service.verify_email(verification.token).await.unwrap();

    service
        .request_password_reset("avery@example.com")
        .await
        .unwrap();
    // In production the token arrives by email; fetch it from storage here
    let reset = database.create_reset_token(user.id).await.unwrap();

    service
        .reset_password(reset.token, "brand-new-password")
        .await
        .unwrap();

    // Old password dead, new one works, token single-use
    assert!(service
        .login("avery@example.com", "correct-horse-battery")
        .await
        .is_err());
    assert!(service
        .login("avery@example.com", "brand-new-password")
        .await
        .is_ok());
    let error = service
        .reset_password(reset.token, "another-password")
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    let mut attempt = registration("short@example.com");
    attempt.password = "tiny".into();
    let error = service.register(attempt).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let database = common::create_test_database().await;
    let (service, _) = account_service(&database);

    let mut attempt = registration("not-an-email");
    attempt.email = "not-an-email".into();
    let error = service.register(attempt).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}
