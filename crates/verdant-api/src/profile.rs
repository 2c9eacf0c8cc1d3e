//! Profile and language-preference endpoint client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use verdant_core::backend::ProfileBackend;
use verdant_core::error::Result;
use verdant_core::locale::LanguageTag;
use verdant_core::session::{AuthToken, UserAccount};

use crate::client::{ApiClient, response_error, transport_error};

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    languages: Vec<LanguageTag>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LanguagePreference {
    language: LanguageTag,
}

/// Talks to the backend's `/api/users/me` and `/api/languages` endpoints.
#[derive(Clone)]
pub struct ProfileApiClient {
    api: ApiClient,
}

impl ProfileApiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
    ) -> Result<T> {
        let mut request = self.api.http().get(self.api.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        let response = request.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response, false).await);
        }
        response.json().await.map_err(transport_error)
    }
}

#[async_trait]
impl ProfileBackend for ProfileApiClient {
    async fn account(&self, token: &AuthToken) -> Result<UserAccount> {
        self.get_json("/api/users/me", Some(token)).await
    }

    async fn available_languages(&self) -> Result<Vec<LanguageTag>> {
        let payload: LanguagesResponse = self.get_json("/api/languages", None).await?;
        Ok(payload.languages)
    }

    async fn language_preference(&self, token: &AuthToken) -> Result<LanguageTag> {
        let payload: LanguagePreference = self.get_json("/api/users/me/language", Some(token)).await?;
        Ok(payload.language)
    }

    async fn set_language_preference(&self, token: &AuthToken, tag: &LanguageTag) -> Result<()> {
        let response = self
            .api
            .http()
            .put(self.api.url("/api/users/me/language"))
            .bearer_auth(token.as_str())
            .json(&LanguagePreference {
                language: tag.clone(),
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response, false).await);
        }
        tracing::debug!(language = %tag, "Language preference stored remotely");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn languages_response_parses_and_normalizes() {
        let payload: LanguagesResponse =
            serde_json::from_str(r#"{"languages":["en","VI"]}"#).unwrap();
        let codes: Vec<&str> = payload.languages.iter().map(|t| t.as_str()).collect();
        assert_eq!(codes, vec!["en", "vi"]);
    }

    #[test]
    fn preference_round_trips() {
        let body = serde_json::to_string(&LanguagePreference {
            language: LanguageTag::parse("vi").unwrap(),
        })
        .unwrap();
        assert_eq!(body, r#"{"language":"vi"}"#);

        let back: LanguagePreference = serde_json::from_str(&body).unwrap();
        assert_eq!(back.language.as_str(), "vi");
    }
}
