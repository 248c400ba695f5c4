mod completion_client;
mod feature_catalog;
mod project_writer;

pub use completion_client::{CompletionClient, CompletionRequest, CompletionResponse};
pub use feature_catalog::FeatureCatalog;
pub use project_writer::ProjectWriter;
