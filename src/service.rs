//! Session service: the named backend operations used by the views. The
//! operations themselves live next to their payload types under `features`;
//! this type carries the injected dependencies they share and wraps each call in
//! the error pipeline.

use crate::{
    api::{ApiClient, AppError},
    notify::NotificationStore,
    pipeline::with_error_handling,
    session::SessionContext,
};
use std::future::Future;

#[derive(Clone, Debug)]
pub struct SessionService {
    api: ApiClient,
    notifier: NotificationStore,
    session: SessionContext,
}

impl SessionService {
    #[must_use]
    pub fn new(api: ApiClient, notifier: NotificationStore, session: SessionContext) -> Self {
        Self {
            api,
            notifier,
            session,
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn notifier(&self) -> &NotificationStore {
        &self.notifier
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Runs one operation through the error pipeline. A 401 that reaches the
    /// pipeline means the server dropped the session, so the cache goes with it.
    pub(crate) async fn guarded<T, F>(&self, operation: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let result = with_error_handling(&self.notifier, operation).await;
        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.session.teardown();
            }
        }
        result
    }
}
