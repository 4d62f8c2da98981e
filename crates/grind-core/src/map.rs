//! Map lookups against the remote tile index.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{GameClient, MapTile};
use crate::error::Result;
use crate::types::Position;

/// Resolves the nearest map tile carrying a given content code.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// `None` means no tile anywhere matches the code.
    async fn find_nearest(&self, from: Position, content_code: &str) -> Result<Option<Position>>;
}

const PAGE_SIZE: i32 = 50;

pub struct MapService {
    client: Arc<GameClient>,
}

impl MapService {
    pub fn new(client: Arc<GameClient>) -> Self {
        Self { client }
    }

    pub async fn tile(&self, x: i32, y: i32) -> Result<MapTile> {
        self.client.fetch_map(x, y).await
    }

    async fn find_all(&self, content_code: &str) -> Result<Vec<MapTile>> {
        let first = self.client.fetch_maps(content_code, 1, PAGE_SIZE).await?;
        let pages = first.pages.unwrap_or(1);
        let mut tiles = first.data;
        for page in 2..=pages {
            tiles.extend(self.client.fetch_maps(content_code, page, PAGE_SIZE).await?.data);
        }
        Ok(tiles)
    }
}

#[async_trait]
impl LocationProvider for MapService {
    async fn find_nearest(&self, from: Position, content_code: &str) -> Result<Option<Position>> {
        let tiles = self.find_all(content_code).await?;
        // On exact distance ties the first tile in API page order wins.
        let mut best: Option<Position> = None;
        for tile in tiles {
            let candidate = Position::new(tile.x, tile.y);
            if best.is_none_or(|b| from.distance(candidate) < from.distance(b)) {
                best = Some(candidate);
            }
        }
        Ok(best)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: i32, y: i32, code: &str) -> String {
        format!(
            r#"{{"x": {x}, "y": {y}, "content": {{"type": "resource", "code": "{code}"}}}}"#
        )
    }

    #[tokio::test]
    async fn find_nearest_minimizes_distance() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/maps")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"data": [{}, {}, {}], "page": 1, "pages": 1}}"#,
                tile(10, 10, "copper_rocks"),
                tile(3, 4, "copper_rocks"),
                tile(-8, 2, "copper_rocks"),
            ))
            .create_async()
            .await;

        let client = Arc::new(GameClient::new(server.url(), "").unwrap());
        let map = MapService::new(client);
        let nearest = map
            .find_nearest(Position::new(0, 0), "copper_rocks")
            .await
            .unwrap();
        assert_eq!(nearest, Some(Position::new(3, 4)));
    }

    #[tokio::test]
    async fn find_nearest_keeps_first_on_ties() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/maps")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"data": [{}, {}], "page": 1, "pages": 1}}"#,
                tile(0, 5, "ash_tree"),
                tile(5, 0, "ash_tree"),
            ))
            .create_async()
            .await;

        let client = Arc::new(GameClient::new(server.url(), "").unwrap());
        let map = MapService::new(client);
        let nearest = map
            .find_nearest(Position::new(0, 0), "ash_tree")
            .await
            .unwrap();
        assert_eq!(nearest, Some(Position::new(0, 5)));
    }

    #[tokio::test]
    async fn find_nearest_walks_every_page() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/maps")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"data": [{}], "page": 1, "pages": 2}}"#,
                tile(40, 40, "gold_rocks"),
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/maps")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"data": [{}], "page": 2, "pages": 2}}"#,
                tile(1, 1, "gold_rocks"),
            ))
            .create_async()
            .await;

        let client = Arc::new(GameClient::new(server.url(), "").unwrap());
        let map = MapService::new(client);
        let nearest = map
            .find_nearest(Position::new(0, 0), "gold_rocks")
            .await
            .unwrap();
        assert_eq!(nearest, Some(Position::new(1, 1)));
    }

    #[tokio::test]
    async fn no_matching_tiles_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/maps")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": [], "page": 1, "pages": 1}"#)
            .create_async()
            .await;

        let client = Arc::new(GameClient::new(server.url(), "").unwrap());
        let map = MapService::new(client);
        let nearest = map
            .find_nearest(Position::new(0, 0), "mithril_rocks")
            .await
            .unwrap();
        assert_eq!(nearest, None);
    }
}
