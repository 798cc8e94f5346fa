//! Application state

use std::sync::Arc;

use tb_core::db::Database;
use tb_core::export::CsvExporter;

use crate::auth::{CredentialProvider, SessionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Database,
    sessions: SessionStore,
    credentials: Box<dyn CredentialProvider>,
    exporter: CsvExporter,
}

impl AppState {
    pub fn new(
        db: Database,
        credentials: Box<dyn CredentialProvider>,
        sessions: SessionStore,
        exporter: CsvExporter,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                sessions,
                credentials,
                exporter,
            }),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn credentials(&self) -> &dyn CredentialProvider {
        self.inner.credentials.as_ref()
    }

    pub fn exporter(&self) -> &CsvExporter {
        &self.inner.exporter
    }
}
