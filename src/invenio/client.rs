use super::{Config, InvenioError};
use crosswalk::{AccessLevel, InvenioRecord};
use log::{debug, error, info, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};
use std::path::Path;

// String at the given JSON pointer of a response.
pub(crate) fn field<'a>(value: &'a Value, pointer: &str) -> Result<&'a str, InvenioError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| InvenioError::UnexpectedResponse(format!("missing {} in {}", pointer, value)))
}

pub struct InvenioClient {
    client: Client,
    base: Url,
    // Log failed requests and carry on instead of stopping.
    ignore_errors: bool,
}

impl InvenioClient {
    pub fn new(config: &Config, ignore_errors: bool) -> Result<Self, InvenioError> {
        let base = Url::parse(&config.base_url()).map_err(|e| {
            InvenioError::ConfigError(format!("Invalid HOST {}: {}", config.host, e))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| InvenioError::ConfigError("Invalid access token".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!config.verify)
            .build()?;
        Ok(InvenioClient {
            client,
            base,
            ignore_errors,
        })
    }

    // API url from unescaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // Links returned by the API are absolute.
    fn link(&self, value: &Value, pointer: &str) -> Result<Url, InvenioError> {
        let link = field(value, pointer)?;
        Url::parse(link)
            .map_err(|e| InvenioError::UnexpectedResponse(format!("invalid link {}: {}", link, e)))
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, InvenioError> {
        let response = request.send()?;
        let status = response.status();
        let url = response.url().to_string();
        debug!("HTTP {} {}", status.as_u16(), url);
        let body = response.text()?;
        if !status.is_success() {
            if !self.ignore_errors {
                return Err(InvenioError::StatusError(url, status.as_u16(), body));
            }
            warn!("Ignoring HTTP {} {}: {}", status.as_u16(), url, body);
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Ok(Value::Null),
            Err(e) => Err(InvenioError::UnexpectedResponse(format!(
                "{} returned invalid JSON: {}",
                url, e
            ))),
        }
    }

    pub fn create_draft(&self, record: &InvenioRecord) -> Result<Value, InvenioError> {
        let url = self.endpoint(&["api", "records"]);
        self.send(self.client.post(url).json(record))
    }

    // Initiate, upload & commit every file then re-send the record, which sets
    // the default preview now that its file exists.
    pub fn add_files(
        &self,
        draft: &Value,
        directory: &Path,
        filenames: &[String],
        record: &InvenioRecord,
    ) -> Result<(), InvenioError> {
        let id = field(draft, "/id")?;
        let keys: Vec<Value> = filenames.iter().map(|key| json!({ "key": key })).collect();
        let files = self.send(self.client.post(self.link(draft, "/links/files")?).json(&keys))?;

        for filename in filenames {
            let path = directory.join(filename);
            let content = std::fs::read(&path).map_err(|e| InvenioError::io(&path, e))?;
            let url = self.endpoint(&["api", "records", id, "draft", "files", filename, "content"]);
            self.send(
                self.client
                    .put(url)
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .body(content),
            )?;
        }

        let entries = files
            .get("entries")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for entry in &entries {
            self.send(self.client.post(self.link(entry, "/links/commit")?))?;
        }

        self.send(self.client.put(self.link(draft, "/links/self")?).json(record))?;
        Ok(())
    }

    pub fn publish(&self, draft: &Value) -> Result<Value, InvenioError> {
        let id = field(draft, "/id")?;
        let url = self.endpoint(&["api", "records", id, "draft", "actions", "publish"]);
        self.send(self.client.post(url))
    }

    // None when the community does not exist.
    fn community(&self, slug: &str) -> Result<Option<Value>, InvenioError> {
        let url = self.endpoint(&["api", "communities", slug]);
        let response = self.client.get(url).send()?;
        debug!("HTTP {} {}", response.status().as_u16(), response.url());
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json()?)),
            status => {
                let url = response.url().to_string();
                let body = response.text()?;
                if self.ignore_errors {
                    warn!("Ignoring HTTP {} {}: {}", status.as_u16(), url, body);
                    Ok(None)
                } else {
                    Err(InvenioError::StatusError(url, status.as_u16(), body))
                }
            }
        }
    }

    // Requests inclusion in each community & accepts the requests left open.
    // Returns the communities the record was added to.
    pub fn add_to_communities(
        &self,
        record: &Value,
        communities: &[String],
    ) -> Result<Vec<String>, InvenioError> {
        let public = record
            .pointer("/access/record")
            .and_then(Value::as_str)
            .map_or(false, |level| level == AccessLevel::Public.to_string());
        let mut slugs = Vec::new();
        for slug in communities {
            let community = match self.community(slug)? {
                Some(community) => community,
                None => {
                    warn!("Community {} does not exist", slug);
                    continue;
                }
            };
            // Cannot add a public record to a restricted community.
            let restricted = community.pointer("/access/visibility").and_then(Value::as_str)
                == Some("restricted");
            if public && restricted {
                error!(
                    "Cannot add public record {} to restricted community {}",
                    field(record, "/id")?,
                    slug
                );
                continue;
            }
            slugs.push(slug.clone());
        }
        if slugs.is_empty() {
            return Ok(slugs);
        }

        let body = json!({
            "communities": slugs.iter().map(|slug| json!({ "id": slug })).collect::<Vec<_>>()
        });
        let response = self.send(
            self.client
                .post(self.link(record, "/links/communities")?)
                .json(&body),
        )?;
        let processed = response
            .get("processed")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for inclusion in &processed {
            let request = inclusion.get("request").unwrap_or(&Value::Null);
            let open = request.get("is_open").and_then(Value::as_bool) == Some(true)
                && request.get("is_closed").and_then(Value::as_bool) != Some(true);
            match request.pointer("/links/actions/accept").and_then(Value::as_str) {
                Some(accept) if open => {
                    let url = Url::parse(accept).map_err(|e| {
                        InvenioError::UnexpectedResponse(format!("invalid link {}: {}", accept, e))
                    })?;
                    self.send(self.client.post(url).json(&json!({})))?;
                }
                _ => debug!(
                    "Community request for {} is closed or was accepted automatically",
                    inclusion
                        .get("community_id")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown community")
                ),
            }
        }
        info!("Added {} to communities: {}", field(record, "/id")?, slugs.join(", "));
        Ok(slugs)
    }

    // Invenio user id for a username.
    pub fn find_user(&self, username: &str) -> Result<Option<String>, InvenioError> {
        let url = self.endpoint(&["api", "users"]);
        let query = format!("username:{}", username);
        let users = self.send(self.client.get(url).query(&[("q", query)]))?;
        let id = users.pointer("/hits/hits/0/id").and_then(|id| match id {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        });
        Ok(id)
    }

    pub fn set_owner(&self, record_id: &str, user_id: &str) -> Result<(), InvenioError> {
        let url = self.endpoint(&["api", "records", record_id, "access"]);
        let body = json!({ "owned_by": { "user": user_id } });
        self.send(self.client.put(url).json(&body))?;
        Ok(())
    }

    // Shares the record with each user at the given permission level, e.g. "edit".
    pub fn grant_access(
        &self,
        record_id: &str,
        user_ids: &[String],
        permission: &str,
    ) -> Result<(), InvenioError> {
        let url = self.endpoint(&["api", "records", record_id, "access", "grants"]);
        let grants: Vec<Value> = user_ids
            .iter()
            .map(|id| {
                json!({
                    "subject": { "type": "user", "id": id },
                    "permission": permission,
                    "origin": "migration"
                })
            })
            .collect();
        self.send(self.client.post(url).json(&json!({ "grants": grants })))?;
        Ok(())
    }
}
