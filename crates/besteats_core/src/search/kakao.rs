//! Kakao local keyword search adapter.
//!
//! # Responsibility
//! - Build keyword search requests (`query`, `x`, `y`, `radius`, `sort`).
//! - Decode `documents[]` into `Place` values in server order.
//!
//! # Invariants
//! - Empty or malformed payloads map to `SearchError::EmptyData`.
//! - Empty string fields are decoded as absent.
//! - Documents without a usable id, name or coordinate are skipped.

use crate::config::SearchConfig;
use crate::model::geo::Coordinate;
use crate::model::place::Place;
use crate::search::client::{PlaceSearchClient, SearchError, SearchRequest, SearchResult};
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde::Deserialize;
use std::future::Future;

#[derive(Debug, Deserialize)]
struct KeywordResponse {
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    id: String,
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    category_name: Option<String>,
    #[serde(default)]
    road_address_name: Option<String>,
    #[serde(default)]
    address_name: Option<String>,
    #[serde(default)]
    distance: Option<String>,
    /// Longitude, sent as a decimal string.
    #[serde(default)]
    x: String,
    /// Latitude, sent as a decimal string.
    #[serde(default)]
    y: String,
}

/// Decodes a keyword search response body.
pub fn decode_keyword_response(body: &[u8]) -> SearchResult<Vec<Place>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SearchError::EmptyData);
    }

    let response: KeywordResponse = serde_json::from_slice(body).map_err(|err| {
        warn!("event=search_decode module=search status=error error={err}");
        SearchError::EmptyData
    })?;

    let total = response.documents.len();
    let places = response
        .documents
        .into_iter()
        .filter_map(into_place)
        .collect::<Vec<_>>();
    if places.len() != total {
        debug!(
            "event=search_decode module=search status=ok skipped={}",
            total - places.len()
        );
    }
    Ok(places)
}

fn into_place(document: Document) -> Option<Place> {
    let id = non_empty(Some(document.id))?;
    let name = non_empty(Some(document.place_name))?;
    let longitude = document.x.trim().parse::<f64>().ok()?;
    let latitude = document.y.trim().parse::<f64>().ok()?;
    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return None;
    }

    Some(Place {
        id,
        name,
        category_name: non_empty(document.category_name),
        road_address: non_empty(document.road_address_name),
        address: non_empty(document.address_name),
        distance: non_empty(document.distance),
        coordinate,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// HTTP client for the Kakao keyword search endpoint.
#[derive(Debug, Clone)]
pub struct KakaoPlaceSearchClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl KakaoPlaceSearchClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a client from config; `None` when no API key is configured.
    pub fn from_config(config: &SearchConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(Self::new(config.endpoint.clone(), api_key))
    }

    fn request_url(&self, request: &SearchRequest) -> SearchResult<Url> {
        let params = [
            ("query", request.category.keyword().to_string()),
            ("x", request.origin.longitude.to_string()),
            ("y", request.origin.latitude.to_string()),
            ("radius", request.radius_m.to_string()),
            ("size", request.page_size.to_string()),
            ("sort", "distance".to_string()),
        ];
        Url::parse_with_params(&self.endpoint, &params)
            .map_err(|err| SearchError::Transport(format!("invalid endpoint: {err}")))
    }
}

impl PlaceSearchClient for KakaoPlaceSearchClient {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = SearchResult<Vec<Place>>> + Send {
        let http = self.http.clone();
        let authorization = format!("KakaoAK {}", self.api_key);
        let url = self.request_url(request);

        async move {
            let response = http
                .get(url?)
                .header(AUTHORIZATION, authorization)
                .send()
                .await
                .map_err(|err| SearchError::Transport(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SearchError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|err| SearchError::Transport(err.to_string()))?;
            decode_keyword_response(&body)
        }
    }
}
