use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
const MODEL: &str = "deepseek-chat";
const MAX_TOKENS: u32 = 200;

/// System prompt steering the model toward short, citing continuations that
/// never restate the stub it was given.
const SYSTEM_PROMPT: &str = "You are an essay-completion bot that continues/completes a sentence given some input stub of an essay/prose. You only complete 1-2 SHORT sentence MAX. If you get an input of a half sentence or similar, DO NOT repeat any of the preceding text of the prose. THIS MEANS DO NOT INCLUDE THE STARTS OF INCOMPLETE SENTENCES IN YOUR RESPONSE. This is also the case when there is a spelling, punctuation, capitalization or other error in the starter stub. Once you have made one citation, STOP GENERATING. BE PITHY. Where there is a full sentence fed in, you should continue on the next sentence as a generally good flowing essay would. You have a specialty in including content that is cited. Given the following two items, (1) citation context and (2) current essay writing, continue on the essay or prose inputting in-line citations in parentheses with the author's name, right after that followed by the relevant URL in square brackets. THEN put a parentheses around all of the above. If you cannot find an author (sometimes it is empty), use the generic name 'Source'. Example citation for you to follow the structure of: ((AUTHOR_X, 2021)[URL_X]). If there are more than 3 author names to include, use the first author name plus 'et al'";

/// Client for the LLM completion collaborator. Unused by the primary citation
/// flow but part of the external contract: drafts 1-2 continuation sentences
/// with an in-line citation derived from the supplied source context.
pub struct CompletionClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CompletionClient {
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

    /// Draft continuation text for `draft` given search-result context.
    pub async fn complete(&self, source_context: &str, draft: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            anyhow::bail!("no completion API key configured");
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: MODEL,
                max_tokens: MAX_TOKENS,
                messages: vec![
                    Message {
                        role: "system",
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    Message {
                        role: "user",
                        content: format!("{source_context} \n CONVERSATION INPUT:{draft}"),
                    },
                ],
            })
            .send()
            .await
            .context("failed to call completion endpoint")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("completion endpoint returned {status}: {body}");
        }

        let response = response
            .json::<CompletionResponse>()
            .await
            .context("failed to decode completion response")?;

        let fragment = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("completion response contained no choices"))?;

        Ok(fragment)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_response_yields_first_choice_content() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "is a growing field (Doe, 2020)[http://x]."}},
                {"message": {"role": "assistant", "content": "unused second choice"}}
            ]
        }"#;

        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        let fragment = response.choices.into_iter().next().unwrap().message.content;
        assert_eq!(fragment, "is a growing field (Doe, 2020)[http://x].");
    }

    #[tokio::test]
    async fn missing_api_key_is_an_error() {
        let client = CompletionClient::new(None);
        let result = client.complete("context", "draft").await;
        assert!(result.is_err());
    }
}
