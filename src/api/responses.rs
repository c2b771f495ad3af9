// src/api/responses.rs
//! Wire shapes of backend responses.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::AppError;
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

/// A successful response with its metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
    /// Duration of the attempt that succeeded.
    pub duration: Duration,
    /// Attempts spent on this call, the successful one included.
    pub attempts: u32,
}

impl ApiResponse {
    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_str(&self.body).map_err(|e| {
            AppError::MalformedResponse(format!(
                "{} from {}: {}",
                e,
                self.url,
                preview(&self.body)
            ))
        })
    }
}

/// List endpoints answer either with a bare array or with `{ "data": [...] }`.
///
/// Deserialized by shape so a malformed record reports its own error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) | ListPayload::Wrapped { data: items } => items,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ListPayload<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ListPayloadVisitor(PhantomData))
    }
}

struct ListPayloadVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ListPayloadVisitor<T> {
    type Value = ListPayload<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array or an object with a `data` array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ListPayload::Bare(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut data = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "data" {
                if data.is_some() {
                    return Err(de::Error::duplicate_field("data"));
                }
                data = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        data.map(|data| ListPayload::Wrapped { data })
            .ok_or_else(|| de::Error::missing_field("data"))
    }
}

/// Body of `GET /images/url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintedUrl {
    pub url: String,
}

/// Body of `GET /health`. Backends add fields freely; only `status` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}

/// Fields pulled out of a non-2xx response body.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Reads `code` (or a string `error`), `message`, and `details`.
    ///
    /// A JSON object without `details` becomes the details itself. A body
    /// that is not JSON is kept as a truncated message.
    pub fn parse(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        let value: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(_) => {
                return Self {
                    message: Some(preview(trimmed)),
                    ..Self::default()
                }
            }
        };

        let Some(object) = value.as_object() else {
            return Self {
                message: value.as_str().map(str::to_string),
                ..Self::default()
            };
        };

        let string_field = |name: &str| {
            object
                .get(name)
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        let code = string_field("code").or_else(|| string_field("error"));
        let message = string_field("message");
        let details = match object.get("details") {
            Some(serde_json::Value::Null) => None,
            Some(details) => Some(details.clone()),
            None => Some(value.clone()),
        };

        Self {
            code,
            message,
            details,
        }
    }
}

/// First characters of a body, for error messages.
pub(crate) fn preview(body: &str) -> String {
    let mut shown: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        shown.push_str("...");
    }
    shown
}
