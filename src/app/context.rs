use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::digest::{DigestWriter, TemplateRenderer};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::normalizer::Normalizer;
use crate::store::JsonStore;

pub struct AppContext {
    pub config: Config,
    pub store: JsonStore,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub normalizer: Normalizer,
    pub renderer: TemplateRenderer,
    pub writer: DigestWriter,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::from_config(&config.feed)?);
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let store = JsonStore::new(&config.archive.path);
        let renderer = match &config.digest.template {
            Some(path) => TemplateRenderer::with_template(path)?,
            None => TemplateRenderer::new()?,
        };
        let writer = DigestWriter::new(
            &config.digest.output_dir,
            &config.digest.weekly_dir,
            &config.digest.summary_file,
        );

        Ok(Self {
            config,
            store,
            fetcher,
            normalizer: Normalizer::new(),
            renderer,
            writer,
        })
    }
}
