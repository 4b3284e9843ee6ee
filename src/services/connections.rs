// ABOUTME: Trainer-client connection state machine and invitation handling
// ABOUTME: Enforces roles, lifecycle transitions, and client-owned permission flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! Connection lifecycle service
//!
//! The state machine: `pending -> {active, rejected}`, `active -> {paused,
//! ended}`, `paused -> {active, ended}`. Terminal states admit nothing.
//! Requests are validated against the capability model before a row is
//! created, and every lookup on behalf of a caller answers `NotFound` for
//! rows that exist but belong to someone else.

use crate::auth::AuthPrincipal;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ConnectionInvitation, ConnectionPermissions, ConnectionStatus, InvitationStatus,
    PermissionUpdate, TrainerClientConnection, User,
};
use crate::notifications::{EmailNotification, Notifier};
use crate::permissions::{self, UserRole};
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

/// Days a trainer invitation stays open
const INVITATION_TTL_DAYS: i64 = 14;

/// Connection lifecycle operations
pub struct ConnectionService {
    database: Database,
    notifier: Notifier,
}

impl ConnectionService {
    #[must_use]
    pub const fn new(database: Database, notifier: Notifier) -> Self {
        Self { database, notifier }
    }

    /// Client requests a connection with a trainer.
    ///
    /// Preconditions: the caller is a client, the target is a trainer who is
    /// currently eligible to accept clients, and no live connection exists
    /// for the pair. Rejected and ended history rows do not block a fresh
    /// request; they stay behind as prior lifecycles.
    pub async fn request_connection(
        &self,
        principal: &AuthPrincipal,
        trainer_id: Uuid,
        message: Option<String>,
    ) -> AppResult<TrainerClientConnection> {
        if principal.role != UserRole::Client {
            return Err(AppError::permission_denied(
                "Only clients can request trainer connections",
            ));
        }

        let trainer = self
            .database
            .get_user(trainer_id)
            .await?
            .filter(|user| user.role == UserRole::Trainer)
            .ok_or_else(|| AppError::not_found("Trainer"))?;

        let profile = self
            .database
            .get_profile(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer"))?;
        let active_clients = self.database.count_active_clients(trainer_id).await?;
        if !permissions::can_accept_clients(trainer.role, &profile, active_clients) {
            return Err(AppError::invalid_input(
                "This trainer is not accepting new clients",
            ));
        }

        if let Some(existing) = self
            .database
            .find_live_connection(trainer_id, principal.user_id)
            .await?
        {
            let message = match existing.status {
                ConnectionStatus::Pending => "A request to this trainer is already pending",
                ConnectionStatus::Active => "You are already connected to this trainer",
                _ => "A connection with this trainer already exists",
            };
            return Err(AppError::state_conflict(message, existing.status.as_str()));
        }

        let connection = TrainerClientConnection {
            id: Uuid::new_v4(),
            trainer_id,
            client_id: principal.user_id,
            status: ConnectionStatus::Pending,
            permissions: ConnectionPermissions::default(),
            request_message: message,
            rejection_reason: None,
            trainer_notes: None,
            requested_at: Utc::now(),
            connected_at: None,
            ended_at: None,
        };
        self.database.create_connection(&connection).await?;

        info!(
            connection_id = %connection.id,
            trainer_id = %trainer_id,
            client_id = %principal.user_id,
            "Connection requested"
        );
        self.notifier.enqueue(EmailNotification {
            to: trainer.email,
            subject: "New client connection request".into(),
            body: format!(
                "{} would like to train with you. Review the request in your dashboard.",
                principal.email
            ),
        });

        Ok(connection)
    }

    /// Trainer accepts a pending request addressed to them
    pub async fn accept_request(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
    ) -> AppResult<TrainerClientConnection> {
        if principal.role != UserRole::Trainer {
            return Err(AppError::permission_denied(
                "Only trainers can accept connection requests",
            ));
        }

        let connection = self.owned_by_trainer(principal, connection_id).await?;
        if connection.status != ConnectionStatus::Pending {
            return Err(AppError::state_conflict(
                "Only pending requests can be accepted",
                connection.status.as_str(),
            ));
        }

        // The guarded update is the authoritative transition; a concurrent
        // accept loses here and reports the conflict.
        let updated = self
            .database
            .mark_connection_accepted(connection_id, Utc::now())
            .await?;
        if !updated {
            return Err(self.transition_conflict(connection_id, "accepted").await);
        }

        let connection = self.require_connection(connection_id).await?;
        if let Some(client) = self.database.get_user(connection.client_id).await? {
            self.notifier.enqueue(EmailNotification {
                to: client.email,
                subject: "Your trainer accepted your request".into(),
                body: "Your connection request was accepted. Time to train!".into(),
            });
        }
        Ok(connection)
    }

    /// Trainer rejects a pending request addressed to them
    pub async fn reject_request(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
        reason: Option<String>,
    ) -> AppResult<TrainerClientConnection> {
        if principal.role != UserRole::Trainer {
            return Err(AppError::permission_denied(
                "Only trainers can reject connection requests",
            ));
        }

        let connection = self.owned_by_trainer(principal, connection_id).await?;
        if connection.status != ConnectionStatus::Pending {
            return Err(AppError::state_conflict(
                "Only pending requests can be rejected",
                connection.status.as_str(),
            ));
        }

        let updated = self
            .database
            .mark_connection_rejected(connection_id, reason.as_deref().unwrap_or(""))
            .await?;
        if !updated {
            return Err(self.transition_conflict(connection_id, "rejected").await);
        }

        self.require_connection(connection_id).await
    }

    /// Either party pauses an active connection
    pub async fn pause_connection(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
    ) -> AppResult<TrainerClientConnection> {
        let connection = self.owned_by_party(principal, connection_id).await?;
        if connection.status != ConnectionStatus::Active {
            return Err(AppError::state_conflict(
                "Only active connections can be paused",
                connection.status.as_str(),
            ));
        }

        if !self.database.mark_connection_paused(connection_id).await? {
            return Err(self.transition_conflict(connection_id, "paused").await);
        }
        self.require_connection(connection_id).await
    }

    /// Either party resumes a paused connection
    pub async fn resume_connection(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
    ) -> AppResult<TrainerClientConnection> {
        let connection = self.owned_by_party(principal, connection_id).await?;
        if connection.status != ConnectionStatus::Paused {
            return Err(AppError::state_conflict(
                "Only paused connections can be resumed",
                connection.status.as_str(),
            ));
        }

        if !self.database.mark_connection_resumed(connection_id).await? {
            return Err(self.transition_conflict(connection_id, "resumed").await);
        }
        self.require_connection(connection_id).await
    }

    /// Client updates the data-sharing flags on their connection. Partial
    /// semantics: unspecified flags keep their prior value. Permitted from
    /// any non-terminal status.
    pub async fn update_permissions(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
        update: PermissionUpdate,
    ) -> AppResult<TrainerClientConnection> {
        if principal.role != UserRole::Client {
            return Err(AppError::permission_denied(
                "Only the client can update sharing permissions",
            ));
        }

        let connection = self
            .database
            .get_connection(connection_id)
            .await?
            .filter(|c| c.client_id == principal.user_id)
            .ok_or_else(|| AppError::not_found("Connection"))?;

        if connection.status.is_terminal() {
            return Err(AppError::state_conflict(
                "Permissions cannot change on a terminal connection",
                connection.status.as_str(),
            ));
        }

        let next = update.apply(connection.permissions);
        self.database
            .update_connection_permissions(connection_id, next)
            .await?;
        self.require_connection(connection_id).await
    }

    /// Either party ends an active or paused connection. Calling again once
    /// ended is a terminal-state conflict, not a silent success.
    pub async fn end_connection(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
    ) -> AppResult<TrainerClientConnection> {
        let connection = self.owned_by_party(principal, connection_id).await?;
        if connection.status.is_terminal() {
            return Err(AppError::state_conflict(
                "Connection is already in a terminal state",
                connection.status.as_str(),
            ));
        }
        if connection.status == ConnectionStatus::Pending {
            return Err(AppError::state_conflict(
                "Pending requests are rejected, not ended",
                connection.status.as_str(),
            ));
        }

        if !self
            .database
            .mark_connection_ended(connection_id, Utc::now())
            .await?
        {
            return Err(self.transition_conflict(connection_id, "ended").await);
        }
        self.require_connection(connection_id).await
    }

    /// List the caller's connections: clients see their trainers, trainers
    /// see their clients.
    pub async fn list_connections(
        &self,
        principal: &AuthPrincipal,
        status: Option<ConnectionStatus>,
    ) -> AppResult<Vec<TrainerClientConnection>> {
        match principal.role {
            UserRole::Client => {
                self.database
                    .list_connections_for_client(principal.user_id, status)
                    .await
            }
            UserRole::Trainer | UserRole::Admin => {
                self.database
                    .list_connections_for_trainer(principal.user_id, status)
                    .await
            }
        }
    }

    /// Trainer invites a prospective client by email address. The recipient
    /// need not hold an account yet.
    pub async fn create_invitation(
        &self,
        principal: &AuthPrincipal,
        email: String,
        full_name: Option<String>,
        message: Option<String>,
    ) -> AppResult<ConnectionInvitation> {
        if principal.role != UserRole::Trainer {
            return Err(AppError::permission_denied(
                "Only trainers can send invitations",
            ));
        }

        let now = Utc::now();
        let invitation = ConnectionInvitation {
            id: Uuid::new_v4(),
            trainer_id: principal.user_id,
            email: email.clone(),
            full_name,
            message,
            status: InvitationStatus::Pending,
            accepted_by: None,
            created_at: now,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
        };
        self.database.create_invitation(&invitation).await?;

        self.notifier.enqueue(EmailNotification {
            to: email,
            subject: "A trainer invited you to Fitness Hub".into(),
            body: invitation
                .message
                .clone()
                .unwrap_or_else(|| "You have been invited to train on Fitness Hub.".into()),
        });

        Ok(invitation)
    }

    /// List invitations the trainer has sent
    pub async fn list_invitations(
        &self,
        principal: &AuthPrincipal,
    ) -> AppResult<Vec<ConnectionInvitation>> {
        if principal.role != UserRole::Trainer {
            return Err(AppError::permission_denied(
                "Only trainers can list their invitations",
            ));
        }
        self.database
            .list_invitations_for_trainer(principal.user_id)
            .await
    }

    /// Invited user accepts or declines. Expired invitations are marked as
    /// such on first touch and conflict thereafter.
    pub async fn respond_to_invitation(
        &self,
        principal: &AuthPrincipal,
        invitation_id: Uuid,
        accept: bool,
    ) -> AppResult<ConnectionInvitation> {
        let invitation = self
            .database
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation"))?;

        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::state_conflict(
                "Invitation has already been answered",
                invitation.status.as_str(),
            ));
        }
        if invitation.is_expired(Utc::now()) {
            self.database
                .update_invitation_status(invitation_id, InvitationStatus::Expired, None)
                .await?;
            return Err(AppError::state_conflict(
                "Invitation has expired",
                InvitationStatus::Expired.as_str(),
            ));
        }

        let (status, accepted_by) = if accept {
            (InvitationStatus::Accepted, Some(principal.user_id))
        } else {
            (InvitationStatus::Declined, None)
        };
        self.database
            .update_invitation_status(invitation_id, status, accepted_by)
            .await?;

        self.database
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation"))
    }

    /// Fetch a connection owned by this trainer, answering `NotFound` both
    /// for absent rows and rows that belong to another trainer.
    async fn owned_by_trainer(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
    ) -> AppResult<TrainerClientConnection> {
        self.database
            .get_connection(connection_id)
            .await?
            .filter(|c| c.trainer_id == principal.user_id)
            .ok_or_else(|| AppError::not_found("Connection request"))
    }

    /// Fetch a connection where the caller is the trainer or the client
    async fn owned_by_party(
        &self,
        principal: &AuthPrincipal,
        connection_id: Uuid,
    ) -> AppResult<TrainerClientConnection> {
        self.database
            .get_connection(connection_id)
            .await?
            .filter(|c| {
                c.trainer_id == principal.user_id || c.client_id == principal.user_id
            })
            .ok_or_else(|| AppError::not_found("Connection"))
    }

    async fn require_connection(&self, id: Uuid) -> AppResult<TrainerClientConnection> {
        self.database
            .get_connection(id)
            .await?
            .ok_or_else(|| AppError::not_found("Connection"))
    }

    /// Build the conflict error for a guarded transition that lost a race
    async fn transition_conflict(&self, id: Uuid, action: &str) -> AppError {
        let current = match self.database.get_connection(id).await {
            Ok(Some(connection)) => connection.status.as_str(),
            _ => "unknown",
        };
        AppError::state_conflict(
            format!("Connection could not be {action} from its current state"),
            current,
        )
    }

    // ------------------------------------------------------------------
    // Marketplace browse
    // ------------------------------------------------------------------

    /// Publicly listed trainers who are accepting clients, with live
    /// capability answers. `search` matches name, bio, and specializations.
    pub async fn list_trainers(&self, search: Option<&str>) -> AppResult<Vec<TrainerListing>> {
        let trainers = self.database.list_trainers().await?;
        let needle = search.map(str::to_lowercase);

        let mut listings = Vec::new();
        for (user, profile) in trainers {
            if profile.profile_visibility != crate::models::ProfileVisibility::Public
                || !profile.is_accepting_clients
            {
                continue;
            }
            if let Some(needle) = &needle {
                let haystack = format!(
                    "{} {} {}",
                    user.full_name.to_lowercase(),
                    profile.bio.as_deref().unwrap_or("").to_lowercase(),
                    profile.specializations.join(" ").to_lowercase()
                );
                if !haystack.contains(needle.as_str()) {
                    continue;
                }
            }

            let active_clients = self.database.count_active_clients(user.id).await?;
            let can_accept = permissions::can_accept_clients(user.role, &profile, active_clients);
            listings.push(TrainerListing {
                user,
                profile,
                active_clients,
                can_accept_clients: can_accept,
            });
        }

        Ok(listings)
    }

    /// A single trainer's public listing
    pub async fn trainer_detail(&self, trainer_id: Uuid) -> AppResult<TrainerListing> {
        let user = self
            .get_trainer(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer"))?;
        let profile = self
            .database
            .get_profile(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer"))?;

        let active_clients = self.database.count_active_clients(trainer_id).await?;
        let can_accept = permissions::can_accept_clients(user.role, &profile, active_clients);
        Ok(TrainerListing {
            user,
            profile,
            active_clients,
            can_accept_clients: can_accept,
        })
    }

    /// Expose the trainer lookup used by the browse endpoints
    pub async fn get_trainer(&self, trainer_id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .database
            .get_user(trainer_id)
            .await?
            .filter(|user| user.role == UserRole::Trainer))
    }
}

/// A trainer as shown in marketplace browse, with live capability answers
#[derive(Debug, Clone)]
pub struct TrainerListing {
    pub user: User,
    pub profile: crate::models::Profile,
    pub active_clients: u32,
    pub can_accept_clients: bool,
}
