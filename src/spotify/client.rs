use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::CatalogClient;
use crate::{
    config,
    error::CatalogError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, Artist, ArtistTopTracksResponse,
        CreatePlaylistRequest, Paging, PlayHistory, Playlist, RelatedArtistsResponse,
        SearchResponse, Track, User,
    },
};

const TOP_ITEMS_TIME_RANGE: &str = "medium_term";
const TOP_TRACKS_MARKET: &str = "US";
const MAX_URIS_PER_REQUEST: usize = 100;

/// [`CatalogClient`] backed by the Spotify Web API.
///
/// Holds one access token for the lifetime of a request. Token refresh is the
/// job of [`crate::management::TokenManager`] before the client is built.
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(config::spotify_apiurl(), token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{uri}{path}", uri = self.base_url, path = path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.bearer_auth(&self.token).send().await?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(response.json::<T>().await?),
            StatusCode::UNAUTHORIZED => Err(CatalogError::Unauthorized),
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(path.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(CatalogError::RateLimited),
            _ => Err(CatalogError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(path, request).await
    }
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn get_current_user(&self) -> Result<User, CatalogError> {
        self.get("/me", &[]).await
    }

    async fn get_top_tracks(&self, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let page: Paging<Track> = self
            .get(
                "/me/top/tracks",
                &[
                    ("limit", limit.to_string()),
                    ("time_range", TOP_ITEMS_TIME_RANGE.to_string()),
                ],
            )
            .await?;
        Ok(page.items)
    }

    async fn get_top_artists(&self, limit: u32) -> Result<Vec<Artist>, CatalogError> {
        let page: Paging<Artist> = self
            .get(
                "/me/top/artists",
                &[
                    ("limit", limit.to_string()),
                    ("time_range", TOP_ITEMS_TIME_RANGE.to_string()),
                ],
            )
            .await?;
        Ok(page.items)
    }

    async fn get_recently_played(&self, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let page: Paging<PlayHistory> = self
            .get("/me/player/recently-played", &[("limit", limit.to_string())])
            .await?;
        Ok(page.items.into_iter().map(|h| h.track).collect())
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let res: SearchResponse = self
            .get(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(res.tracks.items)
    }

    async fn get_related_artists(&self, artist_id: &str) -> Result<Vec<Artist>, CatalogError> {
        let path = format!("/artists/{id}/related-artists", id = artist_id);
        let res: RelatedArtistsResponse = self.get(&path, &[]).await?;
        Ok(res.artists)
    }

    async fn get_artist_top_tracks(&self, artist_id: &str) -> Result<Vec<Track>, CatalogError> {
        let path = format!("/artists/{id}/top-tracks", id = artist_id);
        let res: ArtistTopTracksResponse = self
            .get(&path, &[("market", TOP_TRACKS_MARKET.to_string())])
            .await?;
        Ok(res.tracks)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, CatalogError> {
        let path = format!("/users/{user_id}/playlists", user_id = user_id);
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };
        let request = self.client.post(self.url(&path)).json(&body);
        self.send(&path, request).await
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<String, CatalogError> {
        let path = format!("/playlists/{playlist_id}/tracks", playlist_id = playlist_id);
        let mut snapshot_id = String::new();

        // Spotify accepts at most 100 uris per call; chunks keep the final order
        for chunk in uris.chunks(MAX_URIS_PER_REQUEST) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let request = self.client.post(self.url(&path)).json(&body);
            let res: AddTrackToPlaylistResponse = self.send(&path, request).await?;
            snapshot_id = res.snapshot_id;
        }

        Ok(snapshot_id)
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError> {
        let path = format!("/playlists/{playlist_id}", playlist_id = playlist_id);
        self.get(&path, &[]).await
    }
}
