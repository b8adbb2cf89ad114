use std::sync::Arc;

use mm_core::config::AppConfig;
use mm_db::MemoryStore;
use mm_models::{NewUser, Role, User};
use mm_notifications::MemoryEmailSender;
use mm_photos::MemoryStorage;

use crate::context::ServiceContext;

pub struct Fixture {
    pub ctx: ServiceContext,
    pub email: Arc<MemoryEmailSender>,
    pub photos: Arc<MemoryStorage>,
    pub mentor: User,
    pub mentee: User,
    pub other_mentee: User,
    pub admin: User,
}

impl Fixture {
    pub async fn new() -> Self {
        let email = Arc::new(MemoryEmailSender::new());
        let photos = Arc::new(MemoryStorage::new());
        let ctx = ServiceContext::new(
            Arc::new(MemoryStore::new()),
            email.clone(),
            photos.clone(),
            &AppConfig::default(),
        );

        let create = |name: &str, role: Role| {
            NewUser::new(name, format!("{}@example.com", name.to_lowercase()), role)
        };
        let mentor = ctx.users.create(create("Grace", Role::Mentor)).await.unwrap();
        let mentee = ctx.users.create(create("Ada", Role::Mentee)).await.unwrap();
        let other_mentee = ctx.users.create(create("Linus", Role::Mentee)).await.unwrap();
        let admin = ctx.users.create(create("Root", Role::Admin)).await.unwrap();

        Self {
            ctx,
            email,
            photos,
            mentor,
            mentee,
            other_mentee,
            admin,
        }
    }
}
