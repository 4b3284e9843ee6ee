// ABOUTME: Integration tests for the trainer-client connection state machine
// ABOUTME: Exercises request, accept, reject, permissions, termination, and versioning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use fithub_server::errors::ErrorCode;
use fithub_server::models::{ConnectionStatus, PermissionUpdate};
use fithub_server::permissions::UserRole;

#[tokio::test]
async fn test_request_creates_pending_connection_with_defaults() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let connection = service
        .request_connection(
            &common::principal(&client),
            trainer.id,
            Some("Help me get stronger".into()),
        )
        .await
        .unwrap();

    assert_eq!(connection.status, ConnectionStatus::Pending);
    assert!(connection.connected_at.is_none());
    assert!(connection.ended_at.is_none());
    assert_eq!(
        connection.request_message.as_deref(),
        Some("Help me get stronger")
    );

    // Declared permission defaults
    assert!(connection.permissions.can_view_workouts);
    assert!(connection.permissions.can_assign_workouts);
    assert!(connection.permissions.can_comment_workouts);
    assert!(!connection.permissions.can_view_nutrition);
    assert!(!connection.permissions.can_view_progress_photos);
    assert!(!connection.permissions.can_view_body_metrics);
}

#[tokio::test]
async fn test_second_request_while_pending_conflicts() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;
    let principal = common::principal(&client);

    service
        .request_connection(&principal, trainer.id, None)
        .await
        .unwrap();

    let error = service
        .request_connection(&principal, trainer.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StateConflict);
    assert_eq!(error.context.details["current_state"], "pending");

    // Never two live rows for the pair
    let live = database
        .find_live_connection(trainer.id, client.id)
        .await
        .unwrap();
    assert!(live.is_some());
    let connections = database
        .list_connections_for_trainer(trainer.id, None)
        .await
        .unwrap();
    assert_eq!(connections.len(), 1);
}

#[tokio::test]
async fn test_accept_flow_and_double_accept_conflict() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let connection = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();

    let accepted = service
        .accept_request(&common::principal(&trainer), connection.id)
        .await
        .unwrap();
    assert_eq!(accepted.status, ConnectionStatus::Active);
    assert!(accepted.connected_at.is_some());

    // Accepting again is a state conflict carrying the current state
    let error = service
        .accept_request(&common::principal(&trainer), connection.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StateConflict);
    assert_eq!(error.context.details["current_state"], "active");
}

#[tokio::test]
async fn test_only_the_named_trainer_may_accept() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let other = common::create_eligible_trainer(&database, "other@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let connection = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();

    // Another trainer sees NotFound, not the row's existence
    let error = service
        .accept_request(&common::principal(&other), connection.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    // A client cannot accept at all
    let error = service
        .accept_request(&common::principal(&client), connection.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_reject_stores_reason() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let connection = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();

    let rejected = service
        .reject_request(
            &common::principal(&trainer),
            connection.id,
            Some("Fully booked this season".into()),
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, ConnectionStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("Fully booked this season")
    );
}

#[tokio::test]
async fn test_permission_update_is_client_only_and_partial() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let connection = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();
    service
        .accept_request(&common::principal(&trainer), connection.id)
        .await
        .unwrap();

    // The trainer on the record cannot touch the flags
    let error = service
        .update_permissions(
            &common::principal(&trainer),
            connection.id,
            PermissionUpdate {
                can_view_nutrition: Some(true),
                ..PermissionUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    // Partial update: unspecified flags keep their prior value
    let updated = service
        .update_permissions(
            &common::principal(&client),
            connection.id,
            PermissionUpdate {
                can_view_nutrition: Some(true),
                can_view_workouts: Some(false),
                ..PermissionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.permissions.can_view_nutrition);
    assert!(!updated.permissions.can_view_workouts);
    assert!(updated.permissions.can_assign_workouts);
    assert!(updated.permissions.can_comment_workouts);
}

#[tokio::test]
async fn test_end_connection_and_terminal_state() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let connection = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();
    service
        .accept_request(&common::principal(&trainer), connection.id)
        .await
        .unwrap();

    // Either party may end; here the client does
    let ended = service
        .end_connection(&common::principal(&client), connection.id)
        .await
        .unwrap();
    assert_eq!(ended.status, ConnectionStatus::Ended);
    assert!(ended.ended_at.is_some());

    // Ending again fails loudly, not silently
    let error = service
        .end_connection(&common::principal(&trainer), connection.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StateConflict);
    assert_eq!(error.context.details["current_state"], "ended");

    // No updates on terminal rows
    let error = service
        .update_permissions(
            &common::principal(&client),
            connection.id,
            PermissionUpdate::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StateConflict);
}

#[tokio::test]
async fn test_pause_and_resume() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let connection = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();

    // Pause requires an active connection
    let error = service
        .pause_connection(&common::principal(&trainer), connection.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StateConflict);

    service
        .accept_request(&common::principal(&trainer), connection.id)
        .await
        .unwrap();
    let paused = service
        .pause_connection(&common::principal(&trainer), connection.id)
        .await
        .unwrap();
    assert_eq!(paused.status, ConnectionStatus::Paused);

    let resumed = service
        .resume_connection(&common::principal(&client), connection.id)
        .await
        .unwrap();
    assert_eq!(resumed.status, ConnectionStatus::Active);

    // Paused connections can also end
    service
        .pause_connection(&common::principal(&client), connection.id)
        .await
        .unwrap();
    let ended = service
        .end_connection(&common::principal(&trainer), connection.id)
        .await
        .unwrap();
    assert_eq!(ended.status, ConnectionStatus::Ended);
}

#[tokio::test]
async fn test_fresh_lifecycle_after_termination() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let client = common::create_test_client(&database, "client@example.com").await;

    let first = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();
    service
        .accept_request(&common::principal(&trainer), first.id)
        .await
        .unwrap();
    service
        .end_connection(&common::principal(&client), first.id)
        .await
        .unwrap();

    // History does not block a new request; it opens a new lifecycle row
    let second = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.status, ConnectionStatus::Pending);

    let all = database
        .list_connections_for_trainer(trainer.id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_request_requires_eligible_trainer() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let client = common::create_test_client(&database, "client@example.com").await;

    // Trainer without an active subscription is not eligible
    let trainer = common::create_test_user(&database, UserRole::Trainer, "free@example.com").await;
    let error = service
        .request_connection(&common::principal(&client), trainer.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    // A trainer cannot be the requester
    let eligible = common::create_eligible_trainer(&database, "trainer@example.com").await;
    let error = service
        .request_connection(&common::principal(&eligible), eligible.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    // Targeting a non-trainer is NotFound
    let other_client = common::create_test_client(&database, "other@example.com").await;
    let error = service
        .request_connection(&common::principal(&client), other_client.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_client_cap_blocks_new_requests() {
    let database = common::create_test_database().await;
    let service = common::connection_service(&database);
    let trainer = common::create_eligible_trainer(&database, "trainer@example.com").await;

    let mut profile = database.get_profile(trainer.id).await.unwrap().unwrap();
    profile.max_clients = Some(1);
    database.update_profile(trainer.id, &profile).await.unwrap();

    let first = common::create_test_client(&database, "first@example.com").await;
    let connection = service
        .request_connection(&common::principal(&first), trainer.id, None)
        .await
        .unwrap();
    service
        .accept_request(&common::principal(&trainer), connection.id)
        .await
        .unwrap();

    // The cap counts active connections
    let second = common::create_test_client(&database, "second@example.com").await;
    let error = service
        .request_connection(&common::principal(&second), trainer.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}
