use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{GenreRepository, Session};
use tokio_util::sync::CancellationToken;

use super::GenreModelOutput;
use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

pub struct GetGenre {
    genres: Arc<dyn GenreRepository>,
}

impl GetGenre {
    pub fn new(genres: Arc<dyn GenreRepository>) -> Self {
        Self { genres }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.genres())
    }

    async fn run(&self, id: EntityId) -> Result<GenreModelOutput> {
        let genre = self.genres.get(id).await?;
        Ok(genre.into())
    }
}

#[async_trait]
impl UseCase for GetGenre {
    type Input = EntityId;
    type Output = GenreModelOutput;

    const NAME: &'static str = "get_genre";

    #[tracing::instrument(name = "get_genre", skip(self, cancel))]
    async fn execute(&self, id: EntityId, cancel: &CancellationToken) -> Result<GenreModelOutput> {
        run_cancellable(Self::NAME, cancel, self.run(id)).await
    }
}
