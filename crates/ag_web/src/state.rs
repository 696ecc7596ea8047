use ag_scrapers::ArticlePipeline;

use crate::auth::AuthConfig;

pub struct AppState {
    pub pipeline: ArticlePipeline,
    pub auth: AuthConfig,
    pub allowed_origins: Vec<String>,
}
