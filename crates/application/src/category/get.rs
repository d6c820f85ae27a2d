use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{CategoryRepository, Session};
use tokio_util::sync::CancellationToken;

use super::CategoryModelOutput;
use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

pub struct GetCategory {
    repository: Arc<dyn CategoryRepository>,
}

impl GetCategory {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.categories())
    }

    async fn run(&self, id: EntityId) -> Result<CategoryModelOutput> {
        let category = self.repository.get(id).await?;
        Ok(category.into())
    }
}

#[async_trait]
impl UseCase for GetCategory {
    type Input = EntityId;
    type Output = CategoryModelOutput;

    const NAME: &'static str = "get_category";

    #[tracing::instrument(name = "get_category", skip(self, cancel))]
    async fn execute(
        &self,
        id: EntityId,
        cancel: &CancellationToken,
    ) -> Result<CategoryModelOutput> {
        run_cancellable(Self::NAME, cancel, self.run(id)).await
    }
}
