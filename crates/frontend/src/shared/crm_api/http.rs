use super::{ApiResult, CrmApi};
use crate::shared::api_utils::{api_url, ListParams};
use async_trait::async_trait;
use contracts::domain::a005_funnel::FunnelDto;
use contracts::domain::a006_contract::ContractWriteDto;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;

/// `CrmApi` over the same-origin proxy (session cookie travels with the request)
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpCrmApi;

impl HttpCrmApi {
    pub fn new() -> Self {
        Self
    }
}

fn resource(path: &str, id: &str) -> String {
    api_url(&format!("{}/{}", path, urlencoding::encode(id)))
}

async fn read_json(response: Response, action: &str) -> ApiResult<Value> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::warn!("{} failed: HTTP {} {}", action, status, body);
        return Err(error_message(status, &body, action));
    }
    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse response: {}", e))
}

// Backend errors come as {"message": ...} or {"error": ...}
fn error_message(status: u16, body: &str, action: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error", "detail"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| format!("{}: HTTP {}", action, status))
}

async fn get(path: &str, params: &ListParams, action: &str) -> ApiResult<Value> {
    let url = format!("{}{}", api_url(path), params.to_query());
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response, action).await
}

async fn send_json<T: Serialize>(builder: RequestBuilder, body: &T, action: &str) -> ApiResult<Value> {
    let response = builder
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response, action).await
}

async fn delete(url: &str, action: &str) -> ApiResult<()> {
    let response = Request::delete(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response, action).await.map(|_| ())
}

#[async_trait(?Send)]
impl CrmApi for HttpCrmApi {
    async fn get_clients(&self, params: &ListParams) -> ApiResult<Value> {
        get("/clients", params, "Load clients").await
    }

    async fn get_counterparties(&self, params: &ListParams) -> ApiResult<Value> {
        get("/counterparties", params, "Load counterparties").await
    }

    async fn get_companies(&self, params: &ListParams) -> ApiResult<Value> {
        get("/companies", params, "Load companies").await
    }

    async fn get_products(&self, params: &ListParams) -> ApiResult<Value> {
        get("/products", params, "Load products").await
    }

    async fn get_funnels(&self, params: &ListParams) -> ApiResult<Value> {
        get("/funnels", params, "Load funnels").await
    }

    async fn get_contracts(&self, params: &ListParams) -> ApiResult<Value> {
        get("/contracts", params, "Load contracts").await
    }

    async fn get_contract_by_id(&self, id: &str) -> ApiResult<Value> {
        let response = Request::get(&resource("/contracts", id))
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if response.status() == 404 {
            return Err("Not found".to_string());
        }
        read_json(response, "Load contract").await
    }

    async fn create_contract(&self, payload: &ContractWriteDto) -> ApiResult<Value> {
        send_json(Request::post(&api_url("/contracts")), payload, "Create contract").await
    }

    async fn update_contract(&self, id: &str, payload: &ContractWriteDto) -> ApiResult<Value> {
        send_json(Request::put(&resource("/contracts", id)), payload, "Update contract").await
    }

    async fn delete_contract(&self, id: &str) -> ApiResult<()> {
        delete(&resource("/contracts", id), "Delete contract").await
    }

    async fn create_funnel(&self, payload: &FunnelDto) -> ApiResult<Value> {
        send_json(Request::post(&api_url("/funnels")), payload, "Create funnel").await
    }

    async fn update_funnel(&self, id: &str, payload: &FunnelDto) -> ApiResult<Value> {
        send_json(Request::put(&resource("/funnels", id)), payload, "Update funnel").await
    }

    async fn delete_funnel(&self, id: &str) -> ApiResult<()> {
        delete(&resource("/funnels", id), "Delete funnel").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_backend_text() {
        assert_eq!(
            error_message(400, r#"{"message": "Funnel is in use"}"#, "Delete funnel"),
            "Funnel is in use"
        );
        assert_eq!(error_message(502, "<html>", "Load funnels"), "Load funnels: HTTP 502");
    }
}
