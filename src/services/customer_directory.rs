//! Customer Directory Client
//!
//! Customer 서비스 (`/api/customers`) 연동. 대출 생성 전 고객 존재 확인에 사용.
//!
//! ```text
//! GET {base}/api/customers/exists/{customerId}  -> bool
//! GET {base}/api/customers/{customerId}         -> CustomerRecord
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Customer 서비스의 고객 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn customer_exists(&self, customer_id: &str) -> Result<bool, UpstreamError>;
    async fn get_customer(&self, customer_id: &str) -> Result<CustomerRecord, UpstreamError>;
}

/// HTTP 구현
pub struct HttpCustomerDirectory {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpCustomerDirectory {
    /// `timeout` 초과 시 `UpstreamError::Timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build customer-service HTTP client")?;

        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid customer-service URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Customer-service URL cannot be a base: {}", base_url);
        }

        Ok(Self { base_url, client })
    }

    /// `{base}/api/customers/{segments..}`
    ///
    /// 각 segment는 percent-encoding 되므로 `/`, `..` 가 경로를 바꾸지 못함
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "customers"]).extend(segments);
        }
        url
    }
}

#[async_trait]
impl CustomerDirectory for HttpCustomerDirectory {
    async fn customer_exists(&self, customer_id: &str) -> Result<bool, UpstreamError> {
        let url = self.endpoint(&["exists", customer_id]);
        tracing::debug!(%url, "Checking customer existence");

        let exists = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<bool>()
            .await?;

        Ok(exists)
    }

    async fn get_customer(&self, customer_id: &str) -> Result<CustomerRecord, UpstreamError> {
        let url = self.endpoint(&[customer_id]);
        tracing::debug!(%url, "Fetching customer");

        let customer = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<CustomerRecord>()
            .await?;

        Ok(customer)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::spawn_stub_server;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};

    fn customer_service() -> Router {
        Router::new()
            .route(
                "/api/customers/exists/:id",
                get(|Path(id): Path<String>| async move { Json(id == "C1") }),
            )
            .route(
                "/api/customers/:id",
                get(|Path(id): Path<String>| async move {
                    if id == "C1" {
                        Ok(Json(serde_json::json!({
                            "id": "C1",
                            "firstName": "Ada",
                            "lastName": "Lovelace",
                            "email": "ada@example.com",
                            "phoneNumber": "5550100"
                        })))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                }),
            )
            .route(
                "/slow/api/customers/exists/:id",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Json(true)
                }),
            )
    }

    #[tokio::test]
    async fn test_customer_exists() {
        let base = spawn_stub_server(customer_service()).await;
        let directory = HttpCustomerDirectory::new(&base, Duration::from_secs(2)).unwrap();

        assert!(directory.customer_exists("C1").await.unwrap());
        assert!(!directory.customer_exists("C2").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_customer_decodes_camel_case() {
        let base = spawn_stub_server(customer_service()).await;
        let directory = HttpCustomerDirectory::new(&base, Duration::from_secs(2)).unwrap();

        let customer = directory.get_customer("C1").await.unwrap();
        assert_eq!(customer.first_name, "Ada");
        assert_eq!(customer.phone_number.as_deref(), Some("5550100"));

        assert!(matches!(
            directory.get_customer("C404").await,
            Err(UpstreamError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_customer_id_cannot_escape_its_path_segment() {
        let base = spawn_stub_server(customer_service()).await;
        let directory = HttpCustomerDirectory::new(&base, Duration::from_secs(2)).unwrap();

        // `/exists/C1` 로 정규화되면 안 됨
        assert!(!matches!(
            directory.customer_exists("GHOST/../C1").await,
            Ok(true)
        ));
        assert!(!matches!(directory.customer_exists("..").await, Ok(true)));
        assert!(directory.get_customer("../customers/C1").await.is_err());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let directory =
            HttpCustomerDirectory::new("http://customers:8081/", Duration::from_secs(1)).unwrap();

        assert_eq!(
            directory.endpoint(&["exists", "C1"]).as_str(),
            "http://customers:8081/api/customers/exists/C1"
        );
        assert!(!directory
            .endpoint(&["exists", "GHOST/../C1"])
            .path()
            .ends_with("/exists/C1"));
        assert!(HttpCustomerDirectory::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let base = spawn_stub_server(customer_service()).await;
        let directory =
            HttpCustomerDirectory::new(&format!("{}/slow", base), Duration::from_millis(50))
                .unwrap();

        assert!(matches!(
            directory.customer_exists("C1").await,
            Err(UpstreamError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // 아무도 listen 하지 않는 포트
        let directory =
            HttpCustomerDirectory::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

        assert!(matches!(
            directory.customer_exists("C1").await,
            Err(UpstreamError::Transport(_)) | Err(UpstreamError::Timeout)
        ));
    }
}
