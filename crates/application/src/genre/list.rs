use std::sync::Arc;

use async_trait::async_trait;
use domain::{GenreRepository, Session};
use tokio_util::sync::CancellationToken;

use super::GenreModelOutput;
use crate::error::Result;
use crate::listing::{ListInput, PaginatedListOutput};
use crate::use_case::{UseCase, run_cancellable};

pub struct ListGenres {
    genres: Arc<dyn GenreRepository>,
}

impl ListGenres {
    pub fn new(genres: Arc<dyn GenreRepository>) -> Self {
        Self { genres }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.genres())
    }

    async fn run(&self, input: ListInput) -> Result<PaginatedListOutput<GenreModelOutput>> {
        let search = input.to_search_input();
        search.validate()?;

        let output = self.genres.search(&search).await?;
        Ok(PaginatedListOutput::from_search(output, GenreModelOutput::from))
    }
}

#[async_trait]
impl UseCase for ListGenres {
    type Input = ListInput;
    type Output = PaginatedListOutput<GenreModelOutput>;

    const NAME: &'static str = "list_genres";

    #[tracing::instrument(name = "list_genres", skip(self, cancel))]
    async fn execute(
        &self,
        input: ListInput,
        cancel: &CancellationToken,
    ) -> Result<PaginatedListOutput<GenreModelOutput>> {
        run_cancellable(Self::NAME, cancel, self.run(input)).await
    }
}
