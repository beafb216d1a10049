mod router;

pub use router::profile_router;

use crate::export::{self, ExportError, ExportedBatch};
use crate::generation::{
    GenerationError, GenerationRequest, InputError, PostalLookup, ProfileGenerator,
};
use chrono::Local;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Shares one generator between concurrent callers. The lock is held for a
/// whole batch, so name registration and city rotation stay serialized.
pub struct ProfileService<L> {
    generator: Mutex<ProfileGenerator<L>>,
}

impl<L> ProfileService<L>
where
    L: PostalLookup + 'static,
{
    pub fn new(generator: ProfileGenerator<L>) -> Self {
        Self {
            generator: Mutex::new(generator),
        }
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<ExportedBatch, ProfileServiceError> {
        let request = request.validated()?;

        let profiles = {
            let mut generator = self.generator.lock().await;
            generator
                .produce_batch(request.gender, request.count)
                .await?
        };

        let body = export::render(&profiles, request.layout, request.format)?;
        let file_name = export::export_file_name(
            &request.generated_for,
            request.format,
            Local::now().naive_local(),
        );

        info!(
            generated_for = %request.generated_for,
            count = profiles.len(),
            format = request.format.label(),
            %file_name,
            "profile export ready"
        );

        Ok(ExportedBatch {
            file_name,
            format: request.format,
            body,
        })
    }
}
