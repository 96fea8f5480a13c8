//! Session adapter: provider session + mirrored profile → internal user.
//!
//! Holds the one active session, exposes the merged [`User`], and
//! broadcasts auth-state transitions through a watch channel so screens
//! observe sign-in and sign-out without holding callbacks. Dropping the
//! watcher is the unsubscribe.

use tokio::sync::watch;
use tracing::{instrument, warn};

use bakehouse_core::{Email, Role};

use crate::db::ProfileRepository;
use crate::docstore::DocumentStore;
use crate::error::AppError;
use crate::models::{MirroredProfile, User};

use super::{AuthSession, IdentityProvider};

/// The active auth state: `None` when signed out.
pub type AuthState = Option<User>;

/// Adapter over the identity provider and the mirrored-profile store.
pub struct SessionAdapter<'a, I: IdentityProvider, S: DocumentStore> {
    identity: &'a I,
    profiles: ProfileRepository<'a, S>,
    session: Option<AuthSession>,
    user: Option<User>,
    tx: watch::Sender<AuthState>,
}

impl<'a, I: IdentityProvider, S: DocumentStore> SessionAdapter<'a, I, S> {
    /// Create a signed-out adapter.
    #[must_use]
    pub fn new(identity: &'a I, store: &'a S) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            identity,
            profiles: ProfileRepository::new(store),
            session: None,
            user: None,
            tx,
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether the signed-in user is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Subscribe to auth-state transitions.
    ///
    /// Each sign-in or sign-out produces one new state; drop the watcher
    /// to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> AuthWatcher {
        AuthWatcher {
            rx: self.tx.subscribe(),
        }
    }

    /// Sign in to an existing account.
    ///
    /// The mirrored profile is merged in on a best-effort basis: a
    /// missing or unreadable mirror degrades to customer role and unset
    /// phone, it never fails the sign-in.
    ///
    /// # Errors
    ///
    /// `Auth` if the identity service rejects the credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&mut self, email: &Email, password: &str) -> Result<User, AppError> {
        let session = self.identity.sign_in(email, password).await?;

        let mirror = match self.profiles.get(&session.user_id).await {
            Ok(mirror) => mirror,
            Err(e) => {
                warn!(error = %e, "could not read mirrored profile, degrading to defaults");
                None
            }
        };

        Ok(self.install(session, mirror))
    }

    /// Create an account, set its display name, and create the mirrored
    /// profile with customer role.
    ///
    /// If the display-name update or mirror creation fails after the
    /// account exists, the user stays signed in with a degraded profile;
    /// there is no rollback of the identity record.
    ///
    /// # Errors
    ///
    /// `Auth` if account creation itself fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &mut self,
        email: &Email,
        password: &str,
        display_name: &str,
        phone: Option<&str>,
    ) -> Result<User, AppError> {
        let mut session = self.identity.sign_up(email, password).await?;

        match self
            .identity
            .update_profile(&session, Some(display_name), None)
            .await
        {
            Ok(()) => session.display_name = Some(display_name.to_string()),
            Err(e) => warn!(error = %e, "could not set display name on new account"),
        }

        let mirror = MirroredProfile {
            display_name: display_name.to_string(),
            phone: phone.map(str::to_owned),
            photo_url: None,
            role: Role::Customer,
        };
        let mirror = match self.profiles.create(&session.user_id, email, &mirror).await {
            Ok(()) => Some(mirror),
            Err(e) => {
                warn!(error = %e, "could not create mirrored profile, continuing degraded");
                None
            }
        };

        Ok(self.install(session, mirror))
    }

    /// End the session. The cart is deliberately left alone: it belongs
    /// to the device, not the identity.
    #[instrument(skip(self))]
    pub async fn log_out(&mut self) {
        if let Some(session) = self.session.take()
            && let Err(e) = self.identity.sign_out(&session).await
        {
            warn!(error = %e, "token revocation failed, dropping session locally");
        }
        self.user = None;
        self.tx.send_replace(None);
    }

    /// Record a new profile photo URL on the provider profile, the
    /// mirror, and the in-memory user.
    ///
    /// # Errors
    ///
    /// `Validation` if signed out, `Auth`/`Storage` if either write
    /// fails.
    #[instrument(skip(self))]
    pub async fn set_profile_photo(&mut self, url: &str) -> Result<(), AppError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AppError::Validation("No user logged in".to_string()))?;

        self.identity
            .update_profile(session, None, Some(url))
            .await?;
        self.profiles.set_photo_url(&session.user_id, url).await?;

        if let Some(user) = &mut self.user {
            user.photo_url = Some(url.to_string());
            self.tx.send_replace(Some(user.clone()));
        }
        Ok(())
    }

    /// Store the session, project the merged user, and notify watchers.
    fn install(&mut self, session: AuthSession, mirror: Option<MirroredProfile>) -> User {
        let user = merge_user(&session, mirror);
        self.session = Some(session);
        self.user = Some(user.clone());
        self.tx.send_replace(Some(user.clone()));
        user
    }
}

/// Project a provider session plus an optional mirror into the internal
/// user shape. Provider-held fields win where both sides have a value.
fn merge_user(session: &AuthSession, mirror: Option<MirroredProfile>) -> User {
    let mirror = mirror.unwrap_or_default();
    User {
        id: session.user_id.clone(),
        email: session.email.clone(),
        display_name: session
            .display_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or(mirror.display_name),
        phone: mirror.phone,
        photo_url: session.photo_url.clone().or(mirror.photo_url),
        role: mirror.role,
    }
}

/// A live subscription to auth-state transitions.
pub struct AuthWatcher {
    rx: watch::Receiver<AuthState>,
}

impl AuthWatcher {
    /// The state as of the latest transition, marking it seen.
    #[must_use]
    pub fn current(&mut self) -> AuthState {
        self.rx.borrow_and_update().clone()
    }

    /// Whether a transition happened since the last [`Self::current`] or
    /// [`Self::next_change`] call.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next transition. Returns `None` once the adapter is
    /// gone.
    pub async fn next_change(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
