use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpAssetDownloader;
use crate::fetcher::AssetDownloader;
use crate::store::{sink_for, RecordSink};

pub struct AppContext {
    pub config: Config,
    pub downloader: Arc<dyn AssetDownloader>,
    pub sink: Box<dyn RecordSink + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let base_url = Url::parse(&config.search.start_url).ok();
        let downloader: Arc<dyn AssetDownloader> = Arc::new(HttpAssetDownloader::new(
            config.output.images_path(),
            base_url,
        )?);
        let sink = sink_for(config.output.format);

        Ok(Self {
            config,
            downloader,
            sink,
        })
    }

    pub fn records_path(&self) -> PathBuf {
        self.config.output.records_path()
    }
}
