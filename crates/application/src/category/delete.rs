use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{Aggregate, CategoryRepository, Session, UnitOfWork};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

pub struct DeleteCategory {
    repository: Arc<dyn CategoryRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl DeleteCategory {
    pub fn new(repository: Arc<dyn CategoryRepository>, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        Self {
            repository,
            unit_of_work,
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.categories(), session.unit_of_work())
    }

    async fn run(&self, id: EntityId) -> Result<()> {
        let category = self.repository.get(id).await?;

        self.repository.delete(&category).await?;
        self.unit_of_work.commit().await?;

        tracing::info!(id = %category.id(), "category deleted");
        Ok(())
    }
}

#[async_trait]
impl UseCase for DeleteCategory {
    type Input = EntityId;
    type Output = ();

    const NAME: &'static str = "delete_category";

    #[tracing::instrument(name = "delete_category", skip(self, cancel))]
    async fn execute(&self, id: EntityId, cancel: &CancellationToken) -> Result<()> {
        run_cancellable(Self::NAME, cancel, self.run(id)).await
    }
}
