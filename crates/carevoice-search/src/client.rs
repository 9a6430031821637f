use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::query::HybridQuery;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Free-text snippet retrieval, the seam the chat hooks depend on.
#[async_trait]
pub trait SnippetSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError>;
}

#[derive(Debug, Default, Deserialize)]
struct DocumentFields {
    #[serde(default)]
    full_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    #[serde(default)]
    fields: DocumentFields,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    fields: DocumentFields,
}

#[derive(Debug, Default, Deserialize)]
struct QueryRoot {
    #[serde(default)]
    children: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    root: QueryRoot,
}

#[derive(Debug, Clone)]
pub struct VespaClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl VespaClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder().user_agent("carevoice/0.1 (asset-search)");
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Looks up asset text by document id or by free-text query.
    ///
    /// The id wins when both are given. Blank strings count as absent, and
    /// with nothing to look up the result is empty without any request
    /// being made.
    pub async fn lookup(
        &self,
        asset_id: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<String>, SearchError> {
        let asset_id = asset_id.filter(|id| !id.trim().is_empty());
        let search = search.filter(|q| !q.trim().is_empty());

        match (asset_id, search) {
            (Some(id), _) => self.fetch_document(id).await,
            (None, Some(query)) => self.query(query).await,
            (None, None) => Ok(Vec::new()),
        }
    }

    /// Fetches a single document's `full_text` by primary key.
    pub async fn fetch_document(&self, asset_id: &str) -> Result<Vec<String>, SearchError> {
        let mut url = self.base_url()?;
        url.path_segments_mut()
            .map_err(|_| SearchError::Config("search endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend([
                "document",
                "v1",
                self.config.namespace(),
                &self.config.schema,
                "docid",
                asset_id,
            ]);

        debug!(%url, "fetching asset document");
        let response = self.http.get(url).send().await?;
        let document: DocumentResponse = decode(response).await?;

        Ok(document.fields.full_text.into_iter().collect())
    }

    /// Runs the hybrid keyword/vector query and returns ranked snippets.
    pub async fn query(&self, text: &str) -> Result<Vec<String>, SearchError> {
        let query = HybridQuery::new(&self.config, text)?;
        let url = self.base_url()?.join("search/").map_err(|e| {
            SearchError::Config(format!("invalid search endpoint: {}", e))
        })?;

        debug!(%url, hits = self.config.hits, "querying asset index");
        let response = self.http.post(url).json(&query.body()).send().await?;
        let result: QueryResponse = decode(response).await?;

        Ok(result
            .root
            .children
            .into_iter()
            .filter_map(|hit| hit.fields.full_text)
            .collect())
    }

    fn base_url(&self) -> Result<Url, SearchError> {
        Url::parse(&self.config.endpoint())
            .map_err(|e| SearchError::Config(format!("invalid search endpoint: {}", e)))
    }
}

#[async_trait]
impl SnippetSearch for VespaClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        self.lookup(None, Some(query)).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SearchError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(SearchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))
}
