//! Art-mode requests and replies.
//!
//! Everything here is pure: it builds the JSON the TV expects and picks
//! apart what it sends back. The channel code owns the socket.
//!
//! Requests travel inside an `ms.channel.emit` envelope whose `data` is
//! itself a JSON *string*. Replies come back as `d2d_service_message`
//! events, again with a stringified `data` payload.

use crate::error::TvError;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

pub const ART_CHANNEL: &str = "com.samsung.art-app";
pub const REMOTE_CHANNEL: &str = "samsung.remote.control";

const SERVICE_MESSAGE: &str = "d2d_service_message";

// ── Requests ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ArtRequest {
    pub id: String,
    pub name: &'static str,
    /// The reply event to wait for. `None` means the TV may or may not
    /// answer; only an error reply is significant.
    pub reply: Option<&'static str>,
    fields: Map<String, Value>,
}

impl ArtRequest {
    pub fn new(name: &'static str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            reply: None,
            fields: Map::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn expecting(mut self, reply: &'static str) -> Self {
        self.reply = Some(reply);
        self
    }

    /// The inner payload, before stringification.
    pub fn data(&self) -> Value {
        let mut data = self.fields.clone();
        data.insert("request".into(), json!(self.name));
        data.insert("id".into(), json!(self.id));
        data.insert("request_id".into(), json!(self.id));
        Value::Object(data)
    }

    pub fn envelope(&self) -> Value {
        json!({
            "method": "ms.channel.emit",
            "params": {
                "event": "art_app_request",
                "to": "host",
                "data": self.data().to_string(),
            }
        })
    }

    /// Whether `reply` answers this request, waiting for `event`.
    ///
    /// Replies that carry an id must carry ours. Replies without one are
    /// accepted by event name. An `error` reply always answers.
    pub fn is_answered_by(&self, reply: &Value, event: Option<&str>) -> bool {
        let sub_event = reply["event"].as_str();
        let wanted = sub_event == Some("error") || event.is_none_or(|e| sub_event == Some(e));

        match reply_id(reply) {
            Some(id) => id == self.id && wanted,
            None => event.is_some() && wanted,
        }
    }
}

fn reply_id(reply: &Value) -> Option<&str> {
    reply["request_id"].as_str().or_else(|| reply["id"].as_str())
}

pub fn get_artmode_status() -> ArtRequest {
    ArtRequest::new("get_artmode_status").expecting("artmode_status")
}

pub fn set_artmode_status(on: bool) -> ArtRequest {
    ArtRequest::new("set_artmode_status").field("value", json!(if on { "on" } else { "off" }))
}

pub fn get_content_list() -> ArtRequest {
    ArtRequest::new("get_content_list")
        .field("category", Value::Null)
        .expecting("content_list")
}

pub fn get_current_artwork() -> ArtRequest {
    ArtRequest::new("get_current_artwork").expecting("current_artwork")
}

pub fn select_image(content_id: &str) -> ArtRequest {
    ArtRequest::new("select_image")
        .field("content_id", json!(content_id))
        .field("category_id", Value::Null)
        .field("show", json!(true))
}

pub fn change_matte(content_id: &str) -> ArtRequest {
    ArtRequest::new("change_matte")
        .field("content_id", json!(content_id))
        .field("matte_id", json!("none"))
}

/// `image_date` is `YYYY:MM:DD HH:MM:SS`.
pub fn send_image(file_type: super::FileType, file_size: usize, image_date: &str, connection_id: u32) -> ArtRequest {
    let request = ArtRequest::new("send_image").expecting("ready_to_use");
    let conn_info = json!({
        "d2d_mode": "socket",
        "connection_id": connection_id,
        "id": request.id,
    });
    request
        .field("file_type", json!(file_type.as_str()))
        .field("conn_info", conn_info)
        .field("image_date", json!(image_date))
        .field("matte_id", json!("none"))
        .field("portrait_matte_id", json!("none"))
        .field("file_size", json!(file_size))
}

// ── Replies ──────────────────────────────────────────────────────────

/// The inner payload of a `d2d_service_message`, or `None` for any other
/// event.
pub fn service_message(event: &Value) -> Option<Value> {
    if event["event"].as_str() != Some(SERVICE_MESSAGE) {
        return None;
    }
    match &event["data"] {
        Value::String(s) => serde_json::from_str(s).ok(),
        Value::Object(_) => Some(event["data"].clone()),
        _ => None,
    }
}

/// The error code of an `error` reply. Codes arrive as strings or numbers.
pub fn error_code(reply: &Value) -> Option<String> {
    if reply["event"].as_str() != Some("error") {
        return None;
    }
    Some(match &reply["error_code"] {
        Value::String(s) => s.clone(),
        Value::Null => "unknown".to_string(),
        other => other.to_string(),
    })
}

/// A value that may be a JSON document encoded as a string.
fn unstring(value: &Value) -> Result<Value, TvError> {
    match value {
        Value::String(s) => serde_json::from_str(s)
            .map_err(|e| TvError::Protocol(format!("bad embedded JSON: {e}"))),
        other => Ok(other.clone()),
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ContentItem {
    pub content_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
}

pub fn content_list(reply: &Value) -> Result<Vec<ContentItem>, TvError> {
    let list = unstring(&reply["content_list"])?;
    serde_json::from_value(list).map_err(|e| TvError::Protocol(format!("bad content list: {e}")))
}

pub fn current_artwork(reply: &Value) -> Option<ContentItem> {
    serde_json::from_value(reply.clone()).ok()
}

/// Where the TV wants the image bytes sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnInfo {
    pub ip: String,
    pub port: u16,
    pub key: String,
    pub secured: bool,
}

impl ConnInfo {
    pub fn from_reply(reply: &Value) -> Result<Self, TvError> {
        let info = unstring(&reply["conn_info"])?;
        let missing = |field: &str| TvError::Protocol(format!("conn_info has no {field}"));

        let ip = info["ip"].as_str().ok_or_else(|| missing("ip"))?.to_string();
        let port = match &info["port"] {
            Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| missing("port"))?;
        let key = info["key"].as_str().ok_or_else(|| missing("key"))?.to_string();
        let secured = match &info["secured"] {
            Value::Bool(b) => *b,
            Value::String(s) => s.eq_ignore_ascii_case("true"),
            _ => false,
        };

        Ok(Self {
            ip,
            port,
            key,
            secured,
        })
    }
}

// ── Remote keys ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Click,
    Press,
    Release,
}

impl KeyAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Click => "Click",
            Self::Press => "Press",
            Self::Release => "Release",
        }
    }
}

pub fn remote_key(action: KeyAction, key: &str) -> Value {
    json!({
        "method": "ms.remote.control",
        "params": {
            "Cmd": action.as_str(),
            "DataOfCmd": key,
            "Option": "false",
            "TypeOfRemote": "SendRemoteKey",
        }
    })
}
