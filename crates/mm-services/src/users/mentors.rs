//! Mentor directory

use mm_core::error::MmError;
use mm_core::result::MmResult;
use mm_db::UserRepository;
use mm_models::User;
use mm_queries::RawQuery;
use tracing::instrument;

use super::NOT_FOUND;
use crate::context::ServiceContext;
use crate::listing::{list_query, Listing};

pub struct MentorDirectory<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MentorDirectory<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Active mentors matching the request parameters
    #[instrument(skip(self, raw))]
    pub async fn list(&self, raw: RawQuery) -> MmResult<Listing> {
        let query = list_query(UserRepository::mentor_criteria(), raw, self.ctx.page_limits);
        Ok(Listing::new(self.ctx.users.list(&query).await?))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> MmResult<User> {
        self.ctx
            .users
            .find_mentor(id)
            .await?
            .ok_or_else(|| MmError::not_found(NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use mm_models::{NewUser, Role};

    #[tokio::test]
    async fn test_lists_only_mentors() {
        let fx = Fixture::new().await;
        fx.ctx
            .users
            .create(NewUser::new("Ken", "ken@example.com", Role::Mentor).with_bio("Unix"))
            .await
            .unwrap();

        let directory = MentorDirectory::new(&fx.ctx);
        let mentors = directory
            .list(RawQuery::parse("sort=name&fields=name").unwrap())
            .await
            .unwrap();

        let names: Vec<_> = mentors.documents.iter().map(|d| d["name"].clone()).collect();
        assert_eq!(names, vec!["Grace", "Ken"]);
        assert!(mentors.documents.iter().all(|d| d.len() == 2));
    }

    #[tokio::test]
    async fn test_get_requires_mentor() {
        let fx = Fixture::new().await;
        let directory = MentorDirectory::new(&fx.ctx);

        assert_eq!(directory.get(&fx.mentor.id).await.unwrap().name, "Grace");
        assert_eq!(directory.get(&fx.mentee.id).await.unwrap_err().status_code(), 404);
    }
}
