// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Login/logout orchestration and the observable session state.

use polctl_core::{StoreError, Workspace, DEFAULT_REALM_HEADER, DEFAULT_SCOPE};
use polctl_protocol::ClientCredentials;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::context::ConsoleContext;
use crate::error::AuthError;
use crate::token::TokenExchanger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Stores not inspected yet.
    Loading,
    Unauthenticated,
    Authenticated,
}

pub struct SessionController {
    ctx: ConsoleContext,
    exchanger: TokenExchanger,
    state: watch::Sender<SessionState>,
}

impl SessionController {
    pub fn new(ctx: ConsoleContext, exchanger: TokenExchanger) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            ctx,
            exchanger,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    fn transition(&self, next: SessionState) -> SessionState {
        self.state.send_replace(next);
        next
    }

    /// Derive the state from the stores: authenticated iff a workspace is
    /// active and holds a token.
    pub fn restore(&self) -> SessionState {
        let authenticated = self
            .ctx
            .active()
            .get()
            .is_some_and(|ws| self.ctx.credentials().has_token(&ws.name));
        self.transition(if authenticated {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        })
    }

    /// Exchange `credentials` for a token.
    ///
    /// A given `workspace` is activated before the exchange and supplies
    /// realm and realm header. Without one the exchange goes to the active
    /// workspace (or the configured default) with `realm` under the default
    /// header; when nothing was active the target is activated on success.
    ///
    /// An empty credentials scope is filled from the token provider's
    /// scope, else `PRINCIPAL_ROLE:ALL`.
    pub async fn login(
        &self,
        credentials: &ClientCredentials,
        realm: &str,
        workspace: Option<Workspace>,
    ) -> Result<(), AuthError> {
        match self.try_login(credentials, realm, workspace).await {
            Ok(()) => {
                self.transition(SessionState::Authenticated);
                Ok(())
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.transition(SessionState::Unauthenticated);
                Err(e)
            }
        }
    }

    async fn try_login(
        &self,
        credentials: &ClientCredentials,
        realm: &str,
        workspace: Option<Workspace>,
    ) -> Result<(), AuthError> {
        let (target, activate) = match workspace {
            Some(ws) => {
                self.ctx.active().set(&ws)?;
                (ws, false)
            }
            None => match self.ctx.active().get() {
                Some(active) => (active.with_realm(DEFAULT_REALM_HEADER, realm), false),
                None => {
                    let fallback = self.ctx.workspaces().load_config().await.resolve_default();
                    (fallback.with_realm(DEFAULT_REALM_HEADER, realm), true)
                }
            },
        };

        let endpoint = TokenExchanger::token_endpoint(&target)?;
        let mut credentials = credentials.clone();
        if credentials.scope.trim().is_empty() {
            credentials.scope = endpoint
                .scope
                .unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        }

        let token = self
            .exchanger
            .exchange(
                &endpoint.url,
                &credentials,
                target.realm_header_name(),
                &target.realm,
            )
            .await?;
        self.ctx
            .credentials()
            .set_token(&token.access_token, &target.name)?;
        if activate {
            self.ctx.active().set(&target)?;
        }
        info!("Logged in to workspace '{}'", target.name);
        Ok(())
    }

    /// Drop the active workspace's token and the active pointer. Tokens of
    /// other workspaces stay. Always ends unauthenticated; the first store
    /// failure, if any, is returned.
    pub fn logout(&self) -> Result<(), StoreError> {
        let cleared = match self.ctx.active().name() {
            Some(name) => {
                info!("Logging out of workspace '{}'", name);
                self.ctx.credentials().clear_token(&name)
            }
            None => Ok(()),
        };
        let deactivated = self.ctx.active().clear();
        self.transition(SessionState::Unauthenticated);
        cleared.and(deactivated)
    }

    /// Make `workspace` active without logging in.
    pub fn switch_workspace(&self, workspace: &Workspace) -> Result<SessionState, StoreError> {
        self.ctx.active().set(workspace)?;
        info!("Switched to workspace '{}'", workspace.name);
        Ok(self.restore())
    }
}
