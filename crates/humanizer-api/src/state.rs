//! Application state shared by every handler.

use std::sync::Arc;

use humanizer_core::Config;
use humanizer_processing::UploadValidator;
use humanizer_services::Humanizer;
use humanizer_storage::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<FileStore>,
    pub validator: UploadValidator,
    /// OpenAI client or the local mock, chosen at startup
    pub humanizer: Arc<dyn Humanizer>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<FileStore>,
        validator: UploadValidator,
        humanizer: Arc<dyn Humanizer>,
    ) -> Self {
        Self {
            config,
            store,
            validator,
            humanizer,
        }
    }
}
