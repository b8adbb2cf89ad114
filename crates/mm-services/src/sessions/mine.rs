//! Session listings

use mm_core::result::MmResult;
use mm_db::SessionRepository;
use mm_models::User;
use mm_queries::{FilterCriteria, RawQuery};
use tracing::instrument;

use crate::context::ServiceContext;
use crate::listing::{list_query, Listing};

pub struct MySessionsService<'a> {
    ctx: &'a ServiceContext,
    user: &'a User,
}

impl<'a> MySessionsService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a User) -> Self {
        Self { ctx, user }
    }

    /// Admins take part in no session and get an empty listing
    #[instrument(skip(self, raw), fields(user = %self.user.id))]
    pub async fn call(self, raw: RawQuery) -> MmResult<Listing> {
        let Some(criteria) = SessionRepository::participant_criteria(self.user.role, &self.user.id)
        else {
            return Ok(Listing::default());
        };

        let query = list_query(criteria, raw, self.ctx.page_limits);
        Ok(Listing::new(self.ctx.sessions.list(&query).await?))
    }
}

/// Every session, for admins
pub struct AllSessionsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AllSessionsService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, raw))]
    pub async fn call(self, raw: RawQuery) -> MmResult<Listing> {
        let query = list_query(FilterCriteria::new(), raw, self.ctx.page_limits);
        Ok(Listing::new(self.ctx.sessions.list(&query).await?))
    }
}
