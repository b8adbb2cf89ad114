//! Service context
//!
//! Collaborators shared by every service call.

use std::sync::Arc;

use mm_core::config::AppConfig;
use mm_core::pagination::PageLimits;
use mm_db::{DocumentStore, SessionRepository, UserRepository};
use mm_notifications::{EmailSender, SessionMailer};
use mm_photos::{PhotoPolicy, Storage};

#[derive(Clone)]
pub struct ServiceContext {
    pub users: UserRepository,
    pub sessions: SessionRepository,
    pub email: Arc<dyn EmailSender>,
    pub mailer: SessionMailer,
    pub photos: Arc<dyn Storage>,
    pub photo_policy: PhotoPolicy,
    pub page_limits: PageLimits,
    pub send_notifications: bool,
}

impl ServiceContext {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        email: Arc<dyn EmailSender>,
        photos: Arc<dyn Storage>,
        config: &AppConfig,
    ) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            sessions: SessionRepository::new(store),
            email,
            mailer: SessionMailer::from_config(config),
            photos,
            photo_policy: PhotoPolicy::from_config(&config.storage),
            page_limits: config.query.page_limits(),
            send_notifications: true,
        }
    }

    pub fn without_notifications(mut self) -> Self {
        self.send_notifications = false;
        self
    }
}
