use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{CategoryRepository, Session, UnitOfWork};
use tokio_util::sync::CancellationToken;

use super::CategoryModelOutput;
use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

/// Replacement fields for an existing category.
///
/// `description` and `is_active` keep their stored values when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCategoryInput {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateCategoryInput {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            is_active: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

pub struct UpdateCategory {
    repository: Arc<dyn CategoryRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl UpdateCategory {
    pub fn new(repository: Arc<dyn CategoryRepository>, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        Self {
            repository,
            unit_of_work,
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.categories(), session.unit_of_work())
    }

    async fn run(&self, input: UpdateCategoryInput) -> Result<CategoryModelOutput> {
        let mut category = self.repository.get(input.id).await?;

        category.update(input.name, input.description)?;
        match input.is_active {
            Some(true) if !category.is_active() => category.activate(),
            Some(false) if category.is_active() => category.deactivate(),
            _ => {}
        }

        self.repository.update(&category).await?;
        self.unit_of_work.commit().await?;

        Ok(category.into())
    }
}

#[async_trait]
impl UseCase for UpdateCategory {
    type Input = UpdateCategoryInput;
    type Output = CategoryModelOutput;

    const NAME: &'static str = "update_category";

    #[tracing::instrument(name = "update_category", skip_all, fields(id = %input.id))]
    async fn execute(
        &self,
        input: UpdateCategoryInput,
        cancel: &CancellationToken,
    ) -> Result<CategoryModelOutput> {
        run_cancellable(Self::NAME, cancel, self.run(input)).await
    }
}
