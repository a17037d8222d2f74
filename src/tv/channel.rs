//! One WebSocket channel to the TV.
//!
//! Every receive is bounded by a deadline. The TV is slow to answer while
//! it processes an upload, so the session timeout is long, but it is
//! never unbounded.

use super::art::{self, ART_CHANNEL, ArtRequest, ConnInfo};
use super::{FileType, TvConfig, tls, transfer};
use crate::error::TvError;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async, connect_async_tls_with_config,
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
/// How long a request without an expected reply waits for an error.
pub const ACK_WINDOW: Duration = Duration::from_secs(3);

pub struct Channel {
    socket: Socket,
    name: &'static str,
    timeout: Duration,
}

impl Channel {
    /// Connect and complete the handshake.
    pub async fn open(config: &TvConfig, name: &'static str) -> Result<Self, TvError> {
        let token = config.load_token();
        let url = config.channel_url(name, token.as_deref())?;
        tracing::debug!(
            "Opening {} channel on {}:{} (token: {})",
            name,
            config.host,
            config.port,
            if token.is_some() { "yes" } else { "no" }
        );

        let connect = async {
            let (socket, _response) = if config.is_secure() {
                let connector = Connector::Rustls(tls::client_config()?);
                connect_async_tls_with_config(url.as_str(), None, false, Some(connector)).await?
            } else {
                connect_async(url.as_str()).await?
            };
            Ok::<_, TvError>(socket)
        };
        let socket = tokio::time::timeout(CONNECT_TIMEOUT, connect)
            .await
            .map_err(|_| TvError::Timeout(CONNECT_TIMEOUT))??;

        let mut channel = Self {
            socket,
            name,
            timeout: config.timeout,
        };
        channel.handshake(config).await?;
        tracing::debug!("{} channel ready", name);
        Ok(channel)
    }

    async fn handshake(&mut self, config: &TvConfig) -> Result<(), TvError> {
        let event = self.next_event(self.timeout).await?;
        match event["event"].as_str() {
            Some("ms.channel.connect") => {}
            other => {
                return Err(TvError::Unauthorized(
                    other.unwrap_or("no event").to_string(),
                ));
            }
        }

        if let Some(token) = event["data"]["token"].as_str() {
            config.save_token(token);
        }

        if self.name == ART_CHANNEL {
            let ready = self.next_event(self.timeout).await?;
            if ready["event"].as_str() != Some("ms.channel.ready") {
                return Err(TvError::Protocol(format!(
                    "expected ms.channel.ready, got {}",
                    ready["event"]
                )));
            }
        }
        Ok(())
    }

    pub async fn send(&mut self, value: &Value) -> Result<(), TvError> {
        self.socket.send(Message::Text(value.to_string())).await?;
        Ok(())
    }

    /// The next JSON event. Control frames and non-JSON text are skipped.
    pub async fn next_event(&mut self, timeout: Duration) -> Result<Value, TvError> {
        let deadline = Instant::now() + timeout;
        loop {
            let message = tokio::time::timeout_at(deadline, self.socket.next())
                .await
                .map_err(|_| TvError::Timeout(timeout))?;

            match message {
                None | Some(Ok(Message::Close(_))) => return Err(TvError::Closed),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<Value>(&text) {
                    Ok(event) => {
                        tracing::trace!("{} ← {}", self.name, text);
                        return Ok(event);
                    }
                    Err(e) => tracing::debug!("Ignoring non-JSON frame on {}: {}", self.name, e),
                },
                Some(Ok(_)) => {}
            }
        }
    }

    /// Wait for the reply to `request` carrying `event`. An error reply
    /// becomes [`TvError::Art`].
    pub async fn wait_reply(
        &mut self,
        request: &ArtRequest,
        event: Option<&str>,
        timeout: Duration,
    ) -> Result<Value, TvError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let raw = match self.next_event(remaining).await {
                Err(TvError::Timeout(_)) => return Err(TvError::Timeout(timeout)),
                other => other?,
            };

            let Some(reply) = art::service_message(&raw) else {
                tracing::debug!("Skipping {} event while waiting for {}", raw["event"], request.name);
                continue;
            };
            if !request.is_answered_by(&reply, event) {
                tracing::debug!("Skipping unrelated {} reply", reply["event"]);
                continue;
            }
            if let Some(code) = art::error_code(&reply) {
                return Err(TvError::Art {
                    request: request.name.to_string(),
                    code,
                });
            }
            return Ok(reply);
        }
    }

    /// Send an art request and wait for its reply. Requests that expect
    /// no reply return `None` if the TV stays quiet.
    pub async fn request(&mut self, request: &ArtRequest) -> Result<Option<Value>, TvError> {
        self.send(&request.envelope()).await?;
        match request.reply {
            Some(event) => self.wait_reply(request, Some(event), self.timeout).await.map(Some),
            None => match self.wait_reply(request, None, ACK_WINDOW).await {
                Ok(reply) => Ok(Some(reply)),
                Err(TvError::Timeout(_)) => Ok(None),
                Err(e) => Err(e),
            },
        }
    }

    /// Announce the image, push the bytes over the socket the TV opens,
    /// and return the new content ID.
    pub async fn upload(&mut self, data: &[u8], file_type: FileType, timeout: Duration) -> Result<String, TvError> {
        let image_date = chrono::Local::now().format("%Y:%m:%d %H:%M:%S").to_string();
        let request = art::send_image(file_type, data.len(), &image_date, rand::random());

        self.send(&request.envelope()).await?;
        let ready = self.wait_reply(&request, Some("ready_to_use"), timeout).await?;
        let conn = ConnInfo::from_reply(&ready)?;

        transfer::send(&conn, data, file_type, timeout).await?;

        let added = self.wait_reply(&request, Some("image_added"), timeout).await?;
        added["content_id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TvError::Protocol("image_added reply has no content_id".into()))
    }

    pub async fn close(mut self) {
        if let Err(e) = self.socket.close(None).await {
            tracing::debug!("Error closing {} channel: {}", self.name, e);
        }
    }
}
