//! HTTP access to the notification endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use carehub_core::config::ClientConfig;
use carehub_core::error::{AppError, ErrorKind};
use carehub_core::result::AppResult;
use carehub_core::types::{NotificationId, UserId};
use carehub_entity::notification::Notification;

/// Pagination block returned with a notification page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub limit: u64,
}

/// One page of notifications as the server returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub pagination: Pagination,
}

impl NotificationPage {
    /// Whether the server has pages after this one.
    pub fn has_more(&self) -> bool {
        self.pagination.current_page < self.pagination.total_pages
    }
}

/// The notification endpoints the cache depends on.
#[async_trait]
pub trait NotificationApi: Send + Sync + 'static {
    /// `GET notifications?page=&limit=`
    async fn fetch_page(&self, page: u64, limit: u64) -> AppResult<NotificationPage>;

    /// `GET notifications/unread-count`
    async fn unread_count(&self) -> AppResult<u64>;

    /// `POST notifications/{id}/read`
    async fn mark_read(&self, id: NotificationId) -> AppResult<()>;

    /// `POST notifications/read-all`; returns the number modified.
    async fn mark_all_read(&self) -> AppResult<u64>;

    /// `DELETE notifications/{id}`
    async fn delete(&self, id: NotificationId) -> AppResult<()>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountBody {
    unread_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModifiedCountBody {
    modified_count: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`NotificationApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpNotificationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNotificationApi {
    /// Build a client that identifies as `user_id` on every request.
    pub fn new(config: &ClientConfig, user_id: UserId, user_name: &str) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-user-id",
            HeaderValue::from_str(&user_id.to_string())
                .map_err(|e| AppError::configuration(format!("Invalid user id header: {e}")))?,
        );
        headers.insert(
            "x-user-name",
            HeaderValue::from_str(user_name)
                .map_err(|e| AppError::configuration(format!("Invalid user name header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Request failed", e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());

        Err(match status {
            StatusCode::NOT_FOUND => AppError::not_found(message),
            StatusCode::UNAUTHORIZED => AppError::authentication(message),
            StatusCode::FORBIDDEN => AppError::authorization(message),
            StatusCode::BAD_REQUEST => AppError::validation(message),
            StatusCode::SERVICE_UNAVAILABLE => AppError::service_unavailable(message),
            _ => AppError::external_service(format!("{status}: {message}")),
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> AppResult<T> {
        self.send(request).await?.json::<T>().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Malformed response body", e)
        })
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn fetch_page(&self, page: u64, limit: u64) -> AppResult<NotificationPage> {
        let url = self.url(&format!("notifications?page={page}&limit={limit}"));
        self.json(self.client.get(url)).await
    }

    async fn unread_count(&self) -> AppResult<u64> {
        let body: UnreadCountBody = self
            .json(self.client.get(self.url("notifications/unread-count")))
            .await?;
        Ok(body.unread_count)
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        let url = self.url(&format!("notifications/{id}/read"));
        self.send(self.client.post(url)).await.map(|_| ())
    }

    async fn mark_all_read(&self) -> AppResult<u64> {
        let body: ModifiedCountBody = self
            .json(self.client.post(self.url("notifications/read-all")))
            .await?;
        Ok(body.modified_count)
    }

    async fn delete(&self, id: NotificationId) -> AppResult<()> {
        let url = self.url(&format!("notifications/{id}"));
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            ..ClientConfig::default()
        };
        let api = HttpNotificationApi::new(&config, UserId::new(), "Rae").unwrap();
        assert_eq!(
            api.url("notifications/read-all"),
            "http://localhost:8080/api/notifications/read-all"
        );
    }

    #[test]
    fn test_rejects_unprintable_user_name() {
        let result = HttpNotificationApi::new(&ClientConfig::default(), UserId::new(), "bad\nname");
        assert!(result.is_err());
    }

    #[test]
    fn test_page_has_more() {
        let page: NotificationPage = serde_json::from_value(serde_json::json!({
            "notifications": [],
            "unreadCount": 0,
            "pagination": {"currentPage": 1, "totalPages": 2, "totalCount": 25, "limit": 20}
        }))
        .unwrap();
        assert!(page.has_more());
    }
}
