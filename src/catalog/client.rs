//! HTTP accessor for the catalog API.
//!
//! Stateless apart from the pooled `reqwest::Client`. No retries happen
//! here; callers decide whether and when to try again.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::error::CatalogError;
use super::request::{ItemRef, ListPageRequest, TypeMembershipRequest};
use super::types::{
    CatalogDetail, CatalogItem, ListPage, PageCursor, WireDetail, WireListResponse, WireTypeList,
    WireTypeMembership,
};
use super::CatalogSource;
use crate::config::ApiConfig;

/// Type names that exist upstream but carry no members worth browsing.
pub const SENTINEL_TYPES: &[&str] = &["unknown", "shadow"];

#[derive(Clone)]
pub struct RemoteCatalogClient {
    client: Client,
    base_url: Url,
    artwork_base_url: String,
}

impl RemoteCatalogClient {
    pub fn new(config: &ApiConfig) -> Result<Self, CatalogError> {
        let raw_base = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(raw_base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| CatalogError::InvalidUrl {
                url: raw_base.to_string(),
            })?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|source| CatalogError::Transport {
                url: raw_base.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            artwork_base_url: config.artwork_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Official artwork location for a numeric id.
    pub fn artwork_url(&self, id: u32) -> String {
        format!("{}/{}.png", self.artwork_base_url, id)
    }

    /// `GET {base}/pokemon?limit={n}&offset={m}`
    pub async fn list_page(&self, request: ListPageRequest) -> Result<ListPage, CatalogError> {
        let mut url = self.endpoint(&["pokemon"]);
        url.query_pairs_mut()
            .append_pair("limit", &request.limit.to_string())
            .append_pair("offset", &request.offset.to_string());
        let response: WireListResponse = self.get_json(url).await?;

        let next_cursor = response.next.as_deref().map(|next| PageCursor {
            offset: offset_from_next(next)
                .unwrap_or(request.offset + response.results.len()),
        });

        Ok(ListPage {
            exhausted: next_cursor.is_none(),
            next_cursor,
            items: response.results,
        })
    }

    /// `GET {base}/pokemon/{nameOrId}`
    ///
    /// A 404 becomes [`CatalogError::NotFound`].
    pub async fn detail(&self, item: &ItemRef) -> Result<CatalogDetail, CatalogError> {
        let segment = item.to_string();
        let url = self.endpoint(&["pokemon", &segment]);
        match self.get_json::<WireDetail>(url).await {
            Ok(wire) => Ok(wire.into()),
            Err(CatalogError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(CatalogError::NotFound {
                    target: item.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// `GET {base}/type`, minus the sentinel types.
    pub async fn type_names(&self) -> Result<Vec<String>, CatalogError> {
        let response: WireTypeList = self.get_json(self.endpoint(&["type"])).await?;
        Ok(response
            .results
            .into_iter()
            .map(|t| t.name)
            .filter(|name| !SENTINEL_TYPES.contains(&name.as_str()))
            .collect())
    }

    /// `GET {base}/type/{name}`. The full membership list in one response.
    pub async fn items_of_type(
        &self,
        request: &TypeMembershipRequest,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = self.endpoint(&["type", &request.type_name]);
        let response: WireTypeMembership = self.get_json(url).await?;
        Ok(response
            .pokemon
            .into_iter()
            .map(|member| member.pokemon)
            .collect())
    }

    /// Base URL extended by `segments`, each percent-encoded on its own so
    /// user input cannot add path levels or a query.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Url) -> Result<T, CatalogError> {
        let url = endpoint.to_string();
        tracing::debug!(url = %url, "Catalog request");

        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

/// Pull the `offset` query parameter out of an upstream `next` link.
fn offset_from_next(next: &str) -> Option<usize> {
    let url = Url::parse(next).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "offset")
        .and_then(|(_, value)| value.parse().ok())
}

#[async_trait]
impl CatalogSource for RemoteCatalogClient {
    async fn list_page(&self, request: ListPageRequest) -> Result<ListPage, CatalogError> {
        RemoteCatalogClient::list_page(self, request).await
    }

    async fn detail(&self, item: &ItemRef) -> Result<CatalogDetail, CatalogError> {
        RemoteCatalogClient::detail(self, item).await
    }

    async fn type_names(&self) -> Result<Vec<String>, CatalogError> {
        RemoteCatalogClient::type_names(self).await
    }

    async fn items_of_type(
        &self,
        request: &TypeMembershipRequest,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        RemoteCatalogClient::items_of_type(self, request).await
    }
}
