//! Session lifecycle.
//!
//! `Unauthenticated → Authenticating → Authenticated → Unauthenticated`,
//! with the last transition coming from logout, restore-time expiry, or the
//! pipeline's 401 guard. The controller owns the user profile; profiles are
//! only ever re-fetched from the backend, never derived from claims.

use std::sync::Mutex;

use chrono::Utc;

use policydesk_auth::{Claims, decode_claims};

use crate::error::ApiError;
use crate::events::{SessionEvent, SessionEventBus};
use crate::http::ApiClient;
use crate::models::auth::LoginRequest;
use crate::models::user::UserProfile;
use crate::resources::auth::AuthApi;
use crate::resources::users::UsersApi;
use crate::token::TokenStore;

/// Where the controller currently is in the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// An established session: the credential plus what we know around it.
///
/// `claims` is `None` when the credential did not decode — it is still a
/// perfectly good bearer token (the backend validates it, not us), we just
/// can't read anything out of it locally.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub claims: Option<Claims>,
    pub profile: Option<UserProfile>,
}

#[derive(Debug)]
enum Slot {
    Unauthenticated,
    Authenticating,
    Authenticated(Session),
}

/// Owns login/restore/logout and the current [`Session`].
#[derive(Debug)]
pub struct SessionController {
    client: ApiClient,
    auth: AuthApi,
    users: UsersApi,
    slot: Mutex<Slot>,
}

impl SessionController {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            users: UsersApi::new(client.clone()),
            client,
            slot: Mutex::new(Slot::Unauthenticated),
        }
    }

    /// The bus carrying login/logout/expiry announcements.
    pub fn events(&self) -> &SessionEventBus {
        self.client.events()
    }

    /// Current lifecycle state.
    ///
    /// Forced expiry happens inside the pipeline (the 401 guard clears the
    /// store); the controller observes it lazily here, so a guard-ended
    /// session reads as `Unauthenticated` without any callback wiring.
    pub fn state(&self) -> SessionState {
        let mut slot = self.lock_slot();
        self.sync_with_store(&mut slot);

        match &*slot {
            Slot::Unauthenticated => SessionState::Unauthenticated,
            Slot::Authenticating => SessionState::Authenticating,
            Slot::Authenticated(_) => SessionState::Authenticated,
        }
    }

    /// The current session, if one is established.
    pub fn current(&self) -> Option<Session> {
        let mut slot = self.lock_slot();
        self.sync_with_store(&mut slot);

        match &*slot {
            Slot::Authenticated(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// Authenticate against the backend and establish a session.
    ///
    /// On success the returned credential is persisted (atomically replacing
    /// any prior one) and the user profile is fetched fresh. On any failure
    /// the controller is back in `Unauthenticated` with no credential
    /// stored, and the classified error is returned unwrapped.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        *self.lock_slot() = Slot::Authenticating;

        let response = match self.auth.login(request).await {
            Ok(response) => response,
            Err(e) => {
                *self.lock_slot() = Slot::Unauthenticated;
                return Err(e);
            }
        };

        let store = self.client.token_store();
        store.set(&response.token);
        self.client.guard().arm();

        // Decode failure is tolerated: claims are advisory and the token is
        // still valid for the backend. Without a readable subject we just
        // can't fetch the profile yet.
        let claims = decode_claims(&response.token).ok();

        let profile = match &claims {
            Some(claims) => match self.users.by_username(&claims.sub).await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    // A session without its profile is half-built; fail the
                    // login rather than limp along.
                    store.clear();
                    *self.lock_slot() = Slot::Unauthenticated;
                    return Err(e);
                }
            },
            None => None,
        };

        let session = Session {
            token: response.token,
            claims,
            profile,
        };

        *self.lock_slot() = Slot::Authenticated(session.clone());
        self.events().publish(SessionEvent::LoggedIn);
        tracing::info!(user = %request.username, "logged in");

        Ok(session)
    }

    /// Re-establish a session from a persisted credential, without any
    /// network round trip.
    ///
    /// A credential that is missing, undecodable, or past its expiry leaves
    /// the controller `Unauthenticated` (clearing the stale value). The
    /// restored session has no profile until [`Self::refresh_profile`].
    pub fn restore_from_storage(&self) -> Option<Session> {
        let store = self.client.token_store();
        let token = store.get()?;

        match decode_claims(&token) {
            Ok(claims) if !claims.is_expired(Utc::now()) => {
                self.client.guard().arm();
                tracing::info!(user = %claims.sub, "session restored from storage");
                let session = Session {
                    token,
                    claims: Some(claims),
                    profile: None,
                };
                *self.lock_slot() = Slot::Authenticated(session.clone());
                Some(session)
            }
            _ => {
                store.clear();
                *self.lock_slot() = Slot::Unauthenticated;
                tracing::info!("stored credential expired or unreadable; cleared");
                None
            }
        }
    }

    /// Re-fetch the current user's profile from the backend and attach it
    /// to the session.
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        let username = match self.current() {
            Some(session) => match session.claims {
                Some(claims) => claims.sub,
                None => {
                    return Err(ApiError::Unauthorized {
                        message: "credential carries no readable subject".to_string(),
                    });
                }
            },
            None => {
                return Err(ApiError::Unauthorized {
                    message: "no active session".to_string(),
                });
            }
        };

        let profile = self.users.by_username(&username).await?;

        let mut slot = self.lock_slot();
        if let Slot::Authenticated(session) = &mut *slot {
            session.profile = Some(profile.clone());
        }

        Ok(profile)
    }

    /// End the session. Unconditional: clears the credential, transitions
    /// to `Unauthenticated`, announces `LoggedOut`. Safe to call when no
    /// session exists.
    pub fn logout(&self) {
        self.client.token_store().clear();
        self.client.guard().disarm();
        *self.lock_slot() = Slot::Unauthenticated;
        self.events().publish(SessionEvent::LoggedOut);
        tracing::info!("logged out");
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The pipeline's 401 guard clears the store behind our back; fold that
    /// into the slot before reading it.
    fn sync_with_store(&self, slot: &mut Slot) {
        if matches!(*slot, Slot::Authenticated(_)) && self.client.token_store().get().is_none() {
            *slot = Slot::Unauthenticated;
        }
    }
}
