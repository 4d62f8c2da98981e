//! Remote game API client.
//!
//! Every elementary action is one authenticated HTTP call answered with a
//! `{ "data": ... }` envelope carrying the character's fresh state,
//! including its next cooldown expiration.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::actor::ActorState;
use crate::error::{GrindError, Result};
use crate::types::Position;

/// One elementary remote action per call.
///
/// The returned [`ActorState`] is the authoritative post-action state; its
/// `cooldown_expiration` gates the character's next action.
#[async_trait]
pub trait ActionClient: Send + Sync {
    async fn fetch_character(&self, name: &str) -> Result<ActorState>;
    async fn fetch_all_characters(&self) -> Result<Vec<ActorState>>;
    async fn move_to(&self, name: &str, destination: Position) -> Result<ActorState>;
    async fn gather(&self, name: &str) -> Result<ActorState>;
    async fn fight(&self, name: &str) -> Result<ActorState>;
    async fn rest(&self, name: &str) -> Result<ActorState>;
}

// ---------------------------------------------------------------------------
// Response schemas
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Action responses nest the character beside fight/skill details the
/// automation does not read.
#[derive(Debug, Deserialize)]
struct ActionData {
    character: ActorState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapTile {
    pub x: i32,
    pub y: i32,
    pub content: Option<MapContent>,
}

#[derive(Debug, Deserialize)]
pub struct MapPage {
    pub data: Vec<MapTile>,
    #[serde(default)]
    pub pages: Option<i32>,
}

// ---------------------------------------------------------------------------
// GameClient
// ---------------------------------------------------------------------------

pub struct GameClient {
    http: reqwest::Client,
    base_url: String,
}

impl GameClient {
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if !token.is_empty() {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| GrindError::Config(format!("api token: {e}")))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub async fn fetch_maps(&self, content_code: &str, page: i32, page_size: i32) -> Result<MapPage> {
        self.get(&format!(
            "/maps?content_code={content_code}&page={page}&page_size={page_size}"
        ))
        .await
    }

    pub async fn fetch_map(&self, x: i32, y: i32) -> Result<MapTile> {
        let envelope: Envelope<MapTile> = self.get(&format!("/maps/{x}/{y}")).await?;
        Ok(envelope.data)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn action(&self, name: &str, action: &str, body: Option<serde_json::Value>) -> Result<ActorState> {
        let url = format!("{}/my/{name}/action/{action}", self.base_url);
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let envelope: Envelope<ActionData> = Self::decode(request.send().await?).await?;
        Ok(envelope.data.character)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GrindError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ActionClient for GameClient {
    async fn fetch_character(&self, name: &str) -> Result<ActorState> {
        let envelope: std::result::Result<Envelope<ActorState>, _> =
            self.get(&format!("/characters/{name}")).await;
        match envelope {
            Ok(e) => Ok(e.data),
            Err(GrindError::Api { status: 404, .. }) => {
                Err(GrindError::CharacterNotFound(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_all_characters(&self) -> Result<Vec<ActorState>> {
        let envelope: Envelope<Vec<ActorState>> = self.get("/my/characters").await?;
        Ok(envelope.data)
    }

    async fn move_to(&self, name: &str, destination: Position) -> Result<ActorState> {
        self.action(
            name,
            "move",
            Some(serde_json::json!({ "x": destination.x, "y": destination.y })),
        )
        .await
    }

    async fn gather(&self, name: &str) -> Result<ActorState> {
        self.action(name, "gathering", None).await
    }

    async fn fight(&self, name: &str) -> Result<ActorState> {
        self.action(name, "fight", None).await
    }

    async fn rest(&self, name: &str) -> Result<ActorState> {
        self.action(name, "rest", None).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
