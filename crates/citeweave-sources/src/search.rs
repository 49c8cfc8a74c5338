use anyhow::{Context, Result};
use citeweave_engine::SourceDoc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

/// At most this many characters of draft tail go into the search query.
const QUERY_TAIL_CHARS: usize = 1000;

/// Fixed prompt appended to the draft tail to steer the neural search toward
/// follow-up reading material.
const QUERY_SUFFIX: &str =
    "\n\nIf you found the above interesting, here's another useful resource to read:";

const RESULT_LIMIT: usize = 5;

/// Client for the neural search collaborator.
///
/// By contract the editing core never sees an error from this path: a missing
/// API key or any transport/decode failure degrades to [`sample_results`].
pub struct SearchClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SearchClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Search for sources relevant to `draft`. Returns up to 5 documents, or
    /// the fixed sample set when the provider is unavailable; callers treat
    /// both identically.
    pub async fn search(&self, draft: &str) -> Vec<SourceDoc> {
        let Some(api_key) = self.api_key.clone() else {
            log::warn!("no search API key configured, returning sample results");
            return sample_results();
        };

        let query = build_search_query(draft);
        match self.request(&api_key, &query).await {
            Ok(docs) => {
                log::info!("search returned {} results", docs.len());
                docs
            }
            Err(err) => {
                log::warn!("search failed, returning sample results: {err:#}");
                sample_results()
            }
        }
    }

    async fn request(&self, api_key: &str, query: &str) -> Result<Vec<SourceDoc>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key)
            .json(&SearchRequest {
                query,
                r#type: "neural",
                use_autoprompt: false,
                num_results: RESULT_LIMIT,
                category: "research paper",
                highlights: HighlightsSpec {
                    num_sentences: 1,
                    highlights_per_url: 1,
                },
            })
            .send()
            .await
            .context("failed to call search endpoint")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("search endpoint returned {status}: {body}");
        }

        let response = response
            .json::<SearchResponse>()
            .await
            .context("failed to decode search response")?;

        Ok(response
            .results
            .into_iter()
            .take(RESULT_LIMIT)
            .map(SearchResult::into_doc)
            .collect())
    }
}

/// Query sent to the provider: the trailing portion of the draft (last 1000
/// characters when longer) with the suffix prompt appended.
pub fn build_search_query(draft: &str) -> String {
    let tail = match draft.char_indices().rev().nth(QUERY_TAIL_CHARS - 1) {
        Some((idx, _)) if idx > 0 => &draft[idx..],
        _ => draft,
    };
    format!("{tail}{QUERY_SUFFIX}")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    r#type: &'a str,
    use_autoprompt: bool,
    num_results: usize,
    category: &'a str,
    highlights: HighlightsSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HighlightsSpec {
    num_sentences: u32,
    highlights_per_url: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    highlights: Vec<String>,
}

impl SearchResult {
    fn into_doc(self) -> SourceDoc {
        SourceDoc {
            title: self.title.unwrap_or_else(|| "Untitled".to_string()),
            author: self.author,
            published_date: self.published_date,
            url: self.url,
            highlight: self.highlights.into_iter().next(),
        }
    }
}

/// Fixed fallback set served when the provider is unreachable or no API key
/// is configured.
pub fn sample_results() -> Vec<SourceDoc> {
    vec![
        SourceDoc {
            title: "A Comprehensive Overview of Large Language Models".to_string(),
            url: "https://arxiv.org/pdf/2307.06435.pdf".to_string(),
            published_date: Some("2023-11-16T01:36:32.547Z".to_string()),
            author: Some(
                "Humza Naveed, University of Engineering and Technology (UET), Lahore, Pakistan"
                    .to_string(),
            ),
            highlight: Some(
                "Such requirements have limited their adoption in various domains due to computational constraints."
                    .to_string(),
            ),
        },
        SourceDoc {
            title: "Toward a conceptual synthesis for climate change responses".to_string(),
            url: "https://onlinelibrary.wiley.com/doi/abs/10.1111/j.1466-8238.2011.00713.x"
                .to_string(),
            published_date: Some("2012-03-15T01:36:32.547Z".to_string()),
            author: Some("MI O'Connor, ER Selig, ML Pinsky, Global Ecology".to_string()),
            highlight: Some(
                "We synthesize climate change responses and their mechanisms to provide a comprehensive framework."
                    .to_string(),
            ),
        },
        SourceDoc {
            title: "The State of AI in 2023".to_string(),
            url: "https://www.example.com/ai-state-2023".to_string(),
            published_date: Some("2023-01-20T01:36:32.547Z".to_string()),
            author: Some("Sarah Johnson, AI Research Institute".to_string()),
            highlight: Some(
                "Generative AI has transformed multiple industries with unprecedented capabilities for content creation."
                    .to_string(),
            ),
        },
    ]
}
