//! Session-gated navigation guard. Each mount fetches the profile exactly once
//! and settles on allowed, denied-unauthenticated or denied-forbidden. There is
//! no retry and no re-check while mounted; a role change on the server is only
//! seen on the next mount.
//!
//! UX-only gate: the API enforces access on every call.

use crate::{
    navigation::{Access, Navigator, Route},
    service::SessionService,
    session::Role,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::debug;

pub const ADMIN_ACCESS_REQUIRED: &str = "Admin access required";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Pending,
    Allowed,
    DeniedUnauthenticated,
    DeniedForbidden,
}

impl GuardState {
    /// Where a denied mount sends the user.
    #[must_use]
    pub fn redirect(self) -> Option<Route> {
        match self {
            Self::DeniedUnauthenticated => Some(Route::Login),
            Self::DeniedForbidden => Some(Route::Dashboard),
            Self::Pending | Self::Allowed => None,
        }
    }
}

/// Outcome of one guard mount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessDecision {
    pub state: GuardState,
    pub role: Option<Role>,
}

impl AccessDecision {
    #[must_use]
    pub fn pending() -> Self {
        Self {
            state: GuardState::Pending,
            role: None,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.state == GuardState::Allowed
    }
}

/// Pure transition from pending. `role` is `None` when the profile fetch failed.
#[must_use]
pub fn decide(access: Access, role: Option<Role>) -> AccessDecision {
    let state = match (&role, access) {
        (None, _) => GuardState::DeniedUnauthenticated,
        (Some(role), Access::AdminOnly) if !role.is_admin() => GuardState::DeniedForbidden,
        (Some(_), _) => GuardState::Allowed,
    };
    AccessDecision { state, role }
}

/// Builds mounts for protected views.
#[derive(Clone, Debug)]
pub struct Guard {
    service: SessionService,
    navigator: Navigator,
}

impl Guard {
    #[must_use]
    pub fn new(service: SessionService, navigator: Navigator) -> Self {
        Self { service, navigator }
    }

    #[must_use]
    pub fn mount(&self, access: Access) -> Mount {
        Mount {
            access,
            live: Arc::new(AtomicBool::new(true)),
            decision: None,
            service: self.service.clone(),
            navigator: self.navigator.clone(),
        }
    }
}

/// Handle used to unmount from another task while the fetch is in flight.
#[derive(Clone, Debug)]
pub struct MountHandle {
    live: Arc<AtomicBool>,
}

impl MountHandle {
    pub fn unmount(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// One guard mount.
#[derive(Debug)]
pub struct Mount {
    access: Access,
    live: Arc<AtomicBool>,
    decision: Option<AccessDecision>,
    service: SessionService,
    navigator: Navigator,
}

impl Mount {
    #[must_use]
    pub fn state(&self) -> GuardState {
        self.decision
            .as_ref()
            .map_or(GuardState::Pending, |decision| decision.state)
    }

    #[must_use]
    pub fn handle(&self) -> MountHandle {
        MountHandle {
            live: self.live.clone(),
        }
    }

    pub fn unmount(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Fetches the profile (once per mount) and applies the decision: a toast
    /// for denied-forbidden and a redirect for either denial. Side effects are
    /// skipped when the mount went away before the fetch resolved.
    pub async fn resolve(&mut self) -> AccessDecision {
        if let Some(decision) = &self.decision {
            return decision.clone();
        }

        // failures were already toasted by the error pipeline
        let role = self.service.profile().await.ok().map(|profile| profile.role);
        let decision = decide(self.access, role);
        self.decision = Some(decision.clone());

        if !self.live.load(Ordering::SeqCst) {
            debug!(state = ?decision.state, "guard resolved after unmount, discarding");
            return decision;
        }

        debug!(access = ?self.access, state = ?decision.state, "guard resolved");

        if decision.state == GuardState::DeniedForbidden {
            self.service.notifier().error(ADMIN_ACCESS_REQUIRED, None);
        }
        if let Some(route) = decision.state.redirect() {
            self.navigator.navigate(route);
        }

        decision
    }
}
