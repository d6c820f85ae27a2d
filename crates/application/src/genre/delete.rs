use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{GenreRepository, Session, UnitOfWork};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::use_case::{UseCase, run_cancellable};

pub struct DeleteGenre {
    genres: Arc<dyn GenreRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl DeleteGenre {
    pub fn new(genres: Arc<dyn GenreRepository>, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        Self {
            genres,
            unit_of_work,
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.genres(), session.unit_of_work())
    }

    async fn run(&self, id: EntityId) -> Result<()> {
        let genre = self.genres.get(id).await?;
        self.genres.delete(&genre).await?;
        self.unit_of_work.commit().await?;
        tracing::info!(%id, "genre deleted");
        Ok(())
    }
}

#[async_trait]
impl UseCase for DeleteGenre {
    type Input = EntityId;
    type Output = ();

    const NAME: &'static str = "delete_genre";

    #[tracing::instrument(name = "delete_genre", skip(self, cancel))]
    async fn execute(&self, id: EntityId, cancel: &CancellationToken) -> Result<()> {
        run_cancellable(Self::NAME, cancel, self.run(id)).await
    }
}
