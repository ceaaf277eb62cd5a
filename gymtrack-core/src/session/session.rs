use chrono::Utc;
use log::{debug, info, warn};
use std::future::Future;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::auth::{Access, AuthState, AuthUser, Claims, Role, RoleGate};
use crate::cancel::{Scope, run_until_cancelled};
use crate::config::ClientConfig;
use crate::db::LocalStore;
use crate::error::{Error, Result};
use crate::models::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, User,
};
use crate::validation::{Validate, ValidationErrors, is_email};

pub struct Session {
    pub(super) api: ApiClient,
    store: LocalStore,
    state: RwLock<AuthState>,
    scope: Mutex<Scope>,
}

impl Session {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(AuthState::Unauthenticated),
            scope: Mutex::new(Scope::new()),
        }
    }

    /// Builds the client and opens the local store described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let store = LocalStore::open(&config.db_path)?;
        Ok(Self::new(api, store))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<AuthUser> {
        self.state.read().await.user().cloned()
    }

    pub async fn role(&self) -> Option<Role> {
        self.state.read().await.role()
    }

    pub async fn cached_user(&self) -> Result<Option<User>> {
        Ok(self.store.user().await?)
    }

    pub async fn check(&self, gate: RoleGate) -> Access {
        gate.check(&*self.state.read().await)
    }

    /// The signed-in user, provided their role reaches `required`.
    pub async fn require(&self, required: Role) -> Result<AuthUser> {
        let state = self.state.read().await;
        let user = state.user().ok_or(Error::NotAuthenticated)?;
        if !user.role.satisfies(required) {
            return Err(Error::Forbidden {
                required,
                actual: user.role,
            });
        }
        Ok(user.clone())
    }

    /// Token of the current scope. Replaced on logout, which abandons
    /// everything still running under the old one.
    pub async fn scope_token(&self) -> CancellationToken {
        self.scope.lock().await.token()
    }

    /// A screen-sized scope that ends with the session or on its own drop.
    pub async fn child_scope(&self) -> Scope {
        self.scope.lock().await.child()
    }

    /// Runs a backend call under the session scope. A 401 clears the stored
    /// credentials before the error is returned.
    pub(crate) async fn call<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let token = self.scope_token().await;
        match run_until_cancelled(&token, fut).await {
            Err(Error::Unauthorized) => {
                warn!("Token rejected by backend, clearing session");
                self.clear().await?;
                Err(Error::Unauthorized)
            }
            other => other,
        }
    }

    /// Picks up a session persisted by an earlier run. Expired or unreadable
    /// tokens are discarded. No request is made; see [`Session::verify`].
    pub async fn restore(&self) -> Result<AuthState> {
        let Some(token) = self.store.token().await? else {
            debug!("No stored token");
            return Ok(AuthState::Unauthenticated);
        };

        let claims = match Claims::decode(&token) {
            Ok(claims) if !claims.is_expired(Utc::now()) => claims,
            Ok(_) => {
                info!("Stored token expired, clearing");
                self.clear().await?;
                return Ok(AuthState::Unauthenticated);
            }
            Err(e) => {
                warn!("Stored token unreadable ({}), clearing", e);
                self.clear().await?;
                return Ok(AuthState::Unauthenticated);
            }
        };

        let state = self.authenticate(token, claims).await;
        info!("Restored session");
        Ok(state)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self.api.login(&request).await?;
        let claims = Claims::decode(&response.access_token)?;

        self.api.set_token(Some(response.access_token.clone()));
        let user = match self.api.user_data().await {
            Ok(user) => user,
            Err(e) => {
                self.api.set_token(None);
                return Err(e);
            }
        };

        self.store
            .save_credentials(&response.access_token, &user)
            .await?;
        self.authenticate(response.access_token, claims).await;
        info!("Logged in as {} ({})", user.email, user.role);
        Ok(user)
    }

    async fn authenticate(&self, token: String, claims: Claims) -> AuthState {
        self.api.set_token(Some(token.clone()));
        let state = AuthState::Authenticated(AuthUser {
            token,
            email: claims.sub,
            role: claims.role,
        });
        *self.state.write().await = state.clone();
        state
    }

    /// Drops the credentials everywhere and abandons in-flight work.
    pub async fn logout(&self) -> Result<()> {
        self.clear().await?;
        info!("Logged out");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        {
            let mut scope = self.scope.lock().await;
            scope.cancel();
            *scope = Scope::new();
        }
        self.api.set_token(None);
        *self.state.write().await = AuthState::Unauthenticated;
        self.store.clear_credentials().await?;
        Ok(())
    }

    /// Asks the backend whether the token still holds. A rejection logs the
    /// user out straight away.
    pub async fn verify(&self) -> Result<User> {
        let token = self
            .current_user()
            .await
            .ok_or(Error::NotAuthenticated)?
            .token;
        let user = self.call(self.api.user_data()).await?;
        self.store.save_credentials(&token, &user).await?;
        Ok(user)
    }

    pub async fn is_first_launch(&self) -> Result<bool> {
        Ok(self.store.is_first_launch().await?)
    }

    pub async fn mark_launched(&self) -> Result<()> {
        Ok(self.store.mark_launched().await?)
    }

    pub async fn register(&self, form: &RegisterRequest) -> Result<()> {
        form.validate()?;
        self.api.register(form).await
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if !is_email(email.trim()) {
            errors.add("email", "is not a valid email address");
        }
        if code.trim().is_empty() {
            errors.add("code", "is required");
        }
        errors.into_result()?;
        self.api.verify_email(email.trim(), code.trim()).await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        email_only(email)?;
        self.api.resend_verification(email.trim()).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        email_only(email)?;
        self.api.forgot_password(email.trim()).await
    }

    pub async fn reset_password(&self, form: &ResetPasswordRequest) -> Result<()> {
        form.validate()?;
        self.api.reset_password(form).await
    }

    pub async fn change_password(&self, form: &ChangePasswordRequest) -> Result<()> {
        self.require(Role::Logued).await?;
        form.validate()?;
        self.call(self.api.change_password(form)).await
    }
}

fn email_only(email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !is_email(email.trim()) {
        errors.add("email", "is not a valid email address");
    }
    errors.into_result()
}
