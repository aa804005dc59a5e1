//! REST client for the platform API.
//!
//! A thin capability wrapper: fetch/list/create/save/delete plus the action
//! endpoints (`start`, `stop`, `redeploy`, ...). The resolution layer only
//! depends on `fetch` and `list`; everything else exists for the command
//! handlers.
//!
//! Status mapping matters to the resolvers: a 404 on fetch-by-id is a clean
//! miss (`Ok(None)`), 401/403 is an authentication error, and every other
//! failure — connect errors, 5xx, malformed payloads — is a `Transport`
//! error that propagates instead of being read as "not found".

use crate::config::Session;
use crate::error::{FleetctlError, Result};
use crate::remote::types::{NewTrigger, Record, ResourceKind, Tag, Trigger};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const API_PREFIX: &str = "api/v1";

#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: String,
    auth: String,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    objects: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct LogsEnvelope {
    #[serde(default)]
    logs: String,
}

impl PlatformClient {
    pub fn new(session: &Session) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("fleetctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FleetctlError::Transport {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            http,
            base_url: session.host.trim_end_matches('/').to_string(),
            auth: format!("ApiKey {}:{}", session.user, session.apikey),
        })
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}/{}/", self.base_url, API_PREFIX, kind.path())
    }

    fn object_url(&self, kind: ResourceKind, id: &str) -> String {
        format!("{}/{}/{}/{}/", self.base_url, API_PREFIX, kind.path(), id)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .header("Authorization", &self.auth)
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| FleetctlError::Transport {
                message: format!("request failed: {}", e),
                source: Some(Box::new(e)),
            })
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FleetctlError::Auth);
        }
        Err(FleetctlError::transport(format!(
            "platform returned {} for {}",
            status,
            response.url()
        )))
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| FleetctlError::Transport {
            message: "invalid response payload".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Fetch one record by id. A 404 is a clean miss, not an error.
    pub async fn fetch<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let url = self.object_url(R::KIND, id);
        debug!("GET {}", url);
        let response = self.send(self.http.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response)?;
        Ok(Some(Self::parse(response).await?))
    }

    pub async fn list<R: Record>(&self, filters: &[(&str, &str)]) -> Result<Vec<R>> {
        let url = self.collection_url(R::KIND);
        debug!("GET {} {:?}", url, filters);
        let response = self.send(self.http.get(&url).query(filters)).await?;
        let response = Self::check(response)?;
        let envelope: ListEnvelope<R> = Self::parse(response).await?;
        Ok(envelope.objects)
    }

    pub async fn create<R: Record, B: Serialize + ?Sized>(&self, body: &B) -> Result<R> {
        let url = self.collection_url(R::KIND);
        debug!("POST {}", url);
        let response = self.send(self.http.post(&url).json(body)).await?;
        Self::parse(Self::check(response)?).await
    }

    /// Push local changes upstream (partial update).
    pub async fn save<R: Record, B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<R> {
        let url = self.object_url(R::KIND, id);
        debug!("PATCH {}", url);
        let response = self.send(self.http.patch(&url).json(body)).await?;
        Self::parse(Self::check(response)?).await
    }

    /// Terminate a record.
    pub async fn delete<R: Record>(&self, id: &str) -> Result<()> {
        let url = self.object_url(R::KIND, id);
        debug!("DELETE {}", url);
        let response = self.send(self.http.delete(&url)).await?;
        Self::check(response)?;
        Ok(())
    }

    /// Lifecycle action endpoint: `start`, `stop`, `redeploy`, `scale`, ...
    pub async fn action<R: Record>(&self, id: &str, action: &str) -> Result<R> {
        let url = format!("{}{}/", self.object_url(R::KIND, id), action);
        debug!("POST {}", url);
        let response = self.send(self.http.post(&url)).await?;
        Self::parse(Self::check(response)?).await
    }

    pub async fn logs<R: Record>(&self, id: &str) -> Result<String> {
        let url = format!("{}logs/", self.object_url(R::KIND, id));
        let response = self.send(self.http.get(&url)).await?;
        let envelope: LogsEnvelope = Self::parse(Self::check(response)?).await?;
        Ok(envelope.logs)
    }

    pub async fn list_tags(&self, kind: ResourceKind, id: &str) -> Result<Vec<Tag>> {
        let url = format!("{}tags/", self.object_url(kind, id));
        let response = self.send(self.http.get(&url)).await?;
        let envelope: ListEnvelope<Tag> = Self::parse(Self::check(response)?).await?;
        Ok(envelope.objects)
    }

    pub async fn add_tags(&self, kind: ResourceKind, id: &str, names: &[String]) -> Result<()> {
        let url = format!("{}tags/", self.object_url(kind, id));
        let body: Vec<Tag> = names.iter().map(|n| Tag { name: n.clone() }).collect();
        let response = self.send(self.http.post(&url).json(&body)).await?;
        Self::check(response)?;
        Ok(())
    }

    pub async fn remove_tag(&self, kind: ResourceKind, id: &str, name: &str) -> Result<()> {
        let url = format!("{}tags/{}/", self.object_url(kind, id), name);
        let response = self.send(self.http.delete(&url)).await?;
        Self::check(response)?;
        Ok(())
    }

    pub async fn list_triggers(&self, service_uuid: &str) -> Result<Vec<Trigger>> {
        let url = format!(
            "{}trigger/",
            self.object_url(ResourceKind::Service, service_uuid)
        );
        let response = self.send(self.http.get(&url)).await?;
        let envelope: ListEnvelope<Trigger> = Self::parse(Self::check(response)?).await?;
        Ok(envelope.objects)
    }

    pub async fn create_trigger(&self, service_uuid: &str, body: &NewTrigger) -> Result<Trigger> {
        let url = format!(
            "{}trigger/",
            self.object_url(ResourceKind::Service, service_uuid)
        );
        let response = self.send(self.http.post(&url).json(body)).await?;
        Self::parse(Self::check(response)?).await
    }

    pub async fn delete_trigger(&self, service_uuid: &str, trigger_uuid: &str) -> Result<()> {
        let url = format!(
            "{}trigger/{}/",
            self.object_url(ResourceKind::Service, service_uuid),
            trigger_uuid
        );
        let response = self.send(self.http.delete(&url)).await?;
        Self::check(response)?;
        Ok(())
    }
}
