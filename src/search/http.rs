//! Search API client backed by reqwest

use crate::data::facility::{FacilityCollection, FacilityFeature};
use crate::search::codec::FilterCodec;
use crate::search::fetcher::{FacilityFetcher, PageRequest};
use crate::search::filters::FilterState;
use crate::{MapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use url::Url;

/// Shared async HTTP client for API requests
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("facility-map/", env!("CARGO_PKG_VERSION")))
        .tcp_keepalive(std::time::Duration::from_secs(30))
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .build()
        .expect("failed to build reqwest async client")
});

/// Talks to `{api_base}facilities/`
#[derive(Debug, Clone)]
pub struct HttpFacilityFetcher {
    base: Url,
}

impl HttpFacilityFetcher {
    pub fn new(api_base: &str) -> Result<Self> {
        let mut base = Url::parse(api_base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn search_url(&self, filter: &FilterState, page_size: usize) -> Result<Url> {
        let mut url = self.base.join("facilities/")?;
        url.set_query(Some(&FilterCodec::encode_api_params(filter, page_size)));
        Ok(url)
    }

    /// Cursors are absolute `next` links; relative ones resolve against the base
    pub fn cursor_url(&self, cursor: &str) -> Result<Url> {
        match Url::parse(cursor) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(self.base.join(cursor)?),
            Err(err) => Err(err.into()),
        }
    }

    pub fn detail_url(&self, id: &str) -> Result<Url> {
        let mut url = self.base.join("facilities/")?;
        url.path_segments_mut()
            .map_err(|_| MapError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase))?
            .pop_if_empty()
            .push(id)
            .push("");
        Ok(url)
    }

    async fn get_collection(&self, url: Url) -> Result<FacilityCollection> {
        log::debug!("GET {}", url);
        let response = HTTP_CLIENT.get(url).send().await?.error_for_status()?;
        Ok(response.json::<FacilityCollection>().await?)
    }
}

#[async_trait]
impl FacilityFetcher for HttpFacilityFetcher {
    async fn fetch_page(&self, request: PageRequest) -> Result<FacilityCollection> {
        let url = match &request {
            PageRequest::First { filter, page_size } => self.search_url(filter, *page_size)?,
            PageRequest::Next { cursor } => self.cursor_url(cursor)?,
        };
        self.get_collection(url).await
    }

    async fn fetch_facility(&self, id: &str) -> Result<FacilityFeature> {
        let url = self.detail_url(id)?;
        log::debug!("GET {}", url);
        let response = HTTP_CLIENT.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MapError::NotFound(id.to_string()));
        }
        Ok(response.error_for_status()?.json::<FacilityFeature>().await?)
    }
}
