//! The raw socket the TV opens for image bytes.
//!
//! Framing: a 4-byte big-endian header length, the JSON header, then the
//! file itself. TLS is used when the TV marks the connection as secured.

use super::FileType;
use super::art::ConnInfo;
use crate::error::TvError;
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

pub fn header(file_length: usize, file_type: FileType, key: &str) -> Vec<u8> {
    let header = json!({
        "num": 0,
        "total": 1,
        "fileLength": file_length,
        "fileName": "dummy",
        "fileType": file_type.as_str(),
        "secKey": key,
        "version": "0.0.1",
    })
    .to_string();

    let mut framed = Vec::with_capacity(4 + header.len());
    framed.extend_from_slice(&(header.len() as u32).to_be_bytes());
    framed.extend_from_slice(header.as_bytes());
    framed
}

async fn write_framed<S>(stream: &mut S, header: &[u8], data: &[u8]) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(header).await?;
    stream.write_all(data).await?;
    stream.flush().await?;
    stream.shutdown().await
}

/// Send `data` to the socket described by `conn`, within `timeout`.
pub async fn send(conn: &ConnInfo, data: &[u8], file_type: FileType, timeout: Duration) -> Result<(), TvError> {
    let framed_header = header(data.len(), file_type, &conn.key);

    let transfer = async {
        let mut tcp = TcpStream::connect((conn.ip.as_str(), conn.port)).await?;
        tracing::debug!(
            "Upload socket connected to {}:{} (secured: {})",
            conn.ip,
            conn.port,
            conn.secured
        );

        if conn.secured {
            let connector = TlsConnector::from(super::tls::client_config()?);
            let mut tls = connector.connect(super::tls::server_name(&conn.ip)?, tcp).await?;
            write_framed(&mut tls, &framed_header, data).await?;
        } else {
            write_framed(&mut tcp, &framed_header, data).await?;
        }
        Ok::<(), TvError>(())
    };

    tokio::time::timeout(timeout, transfer)
        .await
        .map_err(|_| TvError::Timeout(timeout))?
}
