use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{Aggregate, CategoryRepository, Genre, GenreRepository, Session, UnitOfWork};
use tokio_util::sync::CancellationToken;

use super::{GenreModelOutput, assign_categories};
use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGenreInput {
    pub name: String,
    pub is_active: bool,
    pub categories_ids: Option<Vec<EntityId>>,
}

impl CreateGenreInput {
    pub fn new(name: impl Into<String>, is_active: bool) -> Self {
        Self {
            name: name.into(),
            is_active,
            categories_ids: None,
        }
    }

    pub fn categories_ids(mut self, ids: Vec<EntityId>) -> Self {
        self.categories_ids = Some(ids);
        self
    }
}

pub struct CreateGenre {
    genres: Arc<dyn GenreRepository>,
    categories: Arc<dyn CategoryRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl CreateGenre {
    pub fn new(
        genres: Arc<dyn GenreRepository>,
        categories: Arc<dyn CategoryRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            genres,
            categories,
            unit_of_work,
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.genres(), session.categories(), session.unit_of_work())
    }

    async fn run(&self, input: CreateGenreInput) -> Result<GenreModelOutput> {
        let mut genre = Genre::new(input.name, input.is_active)?;
        if let Some(ids) = input.categories_ids.as_deref() {
            assign_categories(&mut genre, self.categories.as_ref(), ids).await?;
        }

        self.genres.insert(&genre).await?;
        self.unit_of_work.commit().await?;

        tracing::info!(
            id = %genre.id(),
            categories = genre.categories().len(),
            "genre created"
        );
        Ok(genre.into())
    }
}

#[async_trait]
impl UseCase for CreateGenre {
    type Input = CreateGenreInput;
    type Output = GenreModelOutput;

    const NAME: &'static str = "create_genre";

    #[tracing::instrument(name = "create_genre", skip_all, fields(name = %input.name))]
    async fn execute(
        &self,
        input: CreateGenreInput,
        cancel: &CancellationToken,
    ) -> Result<GenreModelOutput> {
        run_cancellable(Self::NAME, cancel, self.run(input)).await
    }
}
