use std::sync::Arc;

use async_trait::async_trait;
use domain::{CategoryRepository, Session};
use tokio_util::sync::CancellationToken;

use super::CategoryModelOutput;
use crate::error::Result;
use crate::listing::{ListInput, PaginatedListOutput};
use crate::use_case::{UseCase, run_cancellable};

pub struct ListCategories {
    repository: Arc<dyn CategoryRepository>,
}

impl ListCategories {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.categories())
    }

    async fn run(&self, input: ListInput) -> Result<PaginatedListOutput<CategoryModelOutput>> {
        let search = input.to_search_input();
        search.validate()?;

        let output = self.repository.search(&search).await?;
        Ok(PaginatedListOutput::from_search(
            output,
            CategoryModelOutput::from,
        ))
    }
}

#[async_trait]
impl UseCase for ListCategories {
    type Input = ListInput;
    type Output = PaginatedListOutput<CategoryModelOutput>;

    const NAME: &'static str = "list_categories";

    #[tracing::instrument(name = "list_categories", skip(self, cancel))]
    async fn execute(
        &self,
        input: ListInput,
        cancel: &CancellationToken,
    ) -> Result<PaginatedListOutput<CategoryModelOutput>> {
        run_cancellable(Self::NAME, cancel, self.run(input)).await
    }
}
