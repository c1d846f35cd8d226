use std::{future::Future, time::Duration};

use api_types::{
    ApiResponse,
    capital_flow::{
        CapitalFlowDelete, CapitalFlowList, CapitalFlowListResponse, CapitalFlowNew,
        CapitalFlowUpdate,
    },
    category::CategoryView,
};
use flow_browser::{LedgerApi, RemoteFailure};
use reqwest::Url;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

#[derive(Debug, Serialize)]
struct Empty {}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // Endpoints are joined as relative paths, so the base must end in `/`.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| AppError::BaseUrl(format!("{base_url}: {err}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    async fn post<TReq, TResp>(
        &self,
        path: &str,
        payload: &TReq,
    ) -> std::result::Result<Option<TResp>, RemoteFailure>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| RemoteFailure::Server(format!("invalid base_url: {err}")))?;

        tracing::debug!("POST {endpoint}");
        let res = self
            .http
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        if res.status().is_success() {
            let envelope = res.json::<ApiResponse<TResp>>().await.map_err(transport)?;
            return unwrap_envelope(envelope);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(failure_for_status(status.as_u16(), body))
    }

    async fn post_data<TReq, TResp>(
        &self,
        path: &str,
        payload: &TReq,
    ) -> std::result::Result<TResp, RemoteFailure>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        self.post(path, payload)
            .await?
            .ok_or_else(|| RemoteFailure::Server(format!("{path}: response without data")))
    }
}

impl LedgerApi for Client {
    fn fetch_transactions(
        &self,
        query: CapitalFlowList,
    ) -> impl Future<Output = std::result::Result<CapitalFlowListResponse, RemoteFailure>> + Send
    {
        async move { self.post_data("capital-flow/list", &query).await }
    }

    fn fetch_categories(
        &self,
    ) -> impl Future<Output = std::result::Result<Vec<CategoryView>, RemoteFailure>> + Send {
        async move { self.post_data("capital-flow/type/list", &Empty {}).await }
    }

    fn delete_transaction(
        &self,
        id: i64,
    ) -> impl Future<Output = std::result::Result<(), RemoteFailure>> + Send {
        async move {
            self.post::<_, serde_json::Value>("capital-flow/delete", &CapitalFlowDelete { id })
                .await
                .map(|_| ())
        }
    }

    fn create_transaction(
        &self,
        record: CapitalFlowNew,
    ) -> impl Future<Output = std::result::Result<(), RemoteFailure>> + Send {
        async move {
            self.post::<_, serde_json::Value>("capital-flow/create", &record)
                .await
                .map(|_| ())
        }
    }

    fn update_transaction(
        &self,
        record: CapitalFlowUpdate,
    ) -> impl Future<Output = std::result::Result<(), RemoteFailure>> + Send {
        async move {
            self.post::<_, serde_json::Value>("capital-flow/update", &record)
                .await
                .map(|_| ())
        }
    }
}

fn transport(err: reqwest::Error) -> RemoteFailure {
    RemoteFailure::Transport(err.to_string())
}

fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> std::result::Result<Option<T>, RemoteFailure> {
    if envelope.success {
        return Ok(envelope.data);
    }
    Err(RemoteFailure::Rejected(
        envelope
            .message
            .unwrap_or_else(|| "request rejected".to_string()),
    ))
}

fn failure_for_status(status: u16, body: String) -> RemoteFailure {
    match status {
        401 => RemoteFailure::Unauthorized,
        403 => RemoteFailure::Forbidden,
        404 => RemoteFailure::NotFound,
        _ => RemoteFailure::Server(format!("{status}: {body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_failures() {
        assert_eq!(failure_for_status(401, String::new()), RemoteFailure::Unauthorized);
        assert_eq!(failure_for_status(403, String::new()), RemoteFailure::Forbidden);
        assert_eq!(failure_for_status(404, String::new()), RemoteFailure::NotFound);
        assert_eq!(
            failure_for_status(500, "db down".to_string()),
            RemoteFailure::Server("500: db down".to_string())
        );
    }

    #[test]
    fn unsuccessful_envelope_is_rejected() {
        let envelope: ApiResponse<Vec<CategoryView>> = ApiResponse::failed("not allowed");
        assert_eq!(
            unwrap_envelope(envelope),
            Err(RemoteFailure::Rejected("not allowed".to_string()))
        );

        let envelope = ApiResponse::ok(3);
        assert_eq!(unwrap_envelope(envelope), Ok(Some(3)));
    }

    #[test]
    fn invalid_base_url_is_refused() {
        assert!(Client::new("not a url", Duration::from_secs(1)).is_err());
        let client = Client::new("http://ledger.local/api", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.base_url.join("capital-flow/list").unwrap().as_str(),
            "http://ledger.local/api/capital-flow/list"
        );
    }
}
