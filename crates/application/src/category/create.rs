use std::sync::Arc;

use async_trait::async_trait;
use domain::{Aggregate, Category, CategoryRepository, Session, UnitOfWork};
use tokio_util::sync::CancellationToken;

use super::CategoryModelOutput;
use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

/// Fields of a new category.
///
/// `description` is `None` only for an explicit null, which fails
/// validation. An omitted description is the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl CreateCategoryInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>, is_active: bool) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            is_active,
        }
    }
}

pub struct CreateCategory {
    repository: Arc<dyn CategoryRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl CreateCategory {
    pub fn new(repository: Arc<dyn CategoryRepository>, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        Self {
            repository,
            unit_of_work,
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.categories(), session.unit_of_work())
    }

    async fn run(&self, input: CreateCategoryInput) -> Result<CategoryModelOutput> {
        let category = Category::new(input.name, input.description, input.is_active)?;

        self.repository.insert(&category).await?;
        self.unit_of_work.commit().await?;

        tracing::info!(id = %category.id(), "category created");
        Ok(category.into())
    }
}

#[async_trait]
impl UseCase for CreateCategory {
    type Input = CreateCategoryInput;
    type Output = CategoryModelOutput;

    const NAME: &'static str = "create_category";

    #[tracing::instrument(name = "create_category", skip_all, fields(name = %input.name))]
    async fn execute(
        &self,
        input: CreateCategoryInput,
        cancel: &CancellationToken,
    ) -> Result<CategoryModelOutput> {
        run_cancellable(Self::NAME, cancel, self.run(input)).await
    }
}
