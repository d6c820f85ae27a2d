use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{CategoryRepository, GenreRepository, Session, UnitOfWork};
use tokio_util::sync::CancellationToken;

use super::{GenreModelOutput, assign_categories};
use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

/// Replacement fields for an existing genre.
///
/// A `Some` category list replaces the stored one; `None` keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGenreInput {
    pub id: EntityId,
    pub name: String,
    pub is_active: Option<bool>,
    pub categories_ids: Option<Vec<EntityId>>,
}

impl UpdateGenreInput {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: None,
            categories_ids: None,
        }
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn categories_ids(mut self, ids: Vec<EntityId>) -> Self {
        self.categories_ids = Some(ids);
        self
    }
}

pub struct UpdateGenre {
    genres: Arc<dyn GenreRepository>,
    categories: Arc<dyn CategoryRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl UpdateGenre {
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

    async fn run(&self, input: UpdateGenreInput) -> Result<GenreModelOutput> {
        let mut genre = self.genres.get(input.id).await?;

        genre.update(input.name)?;
        match input.is_active {
            Some(true) if !genre.is_active() => genre.activate(),
            Some(false) if genre.is_active() => genre.deactivate(),
            _ => {}
        }
        if let Some(ids) = input.categories_ids.as_deref() {
            assign_categories(&mut genre, self.categories.as_ref(), ids).await?;
        }

        self.genres.update(&genre).await?;
        self.unit_of_work.commit().await?;

        Ok(genre.into())
    }
}

#[async_trait]
impl UseCase for UpdateGenre {
    type Input = UpdateGenreInput;
    type Output = GenreModelOutput;

    const NAME: &'static str = "update_genre";

    #[tracing::instrument(name = "update_genre", skip_all, fields(id = %input.id))]
    async fn execute(
        &self,
        input: UpdateGenreInput,
        cancel: &CancellationToken,
    ) -> Result<GenreModelOutput> {
        run_cancellable(Self::NAME, cancel, self.run(input)).await
    }
}
