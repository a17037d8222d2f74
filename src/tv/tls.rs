//! TLS for the TV's self-signed certificate.
//!
//! Frame TVs serve `wss://` and the upload socket with a certificate no
//! public root signs, so the chain is not checked. Handshake signatures
//! still are.

use crate::error::TvError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::sync::Arc;

#[derive(Debug)]
struct AcceptTvCertificate(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptTvCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

pub fn client_config() -> Result<Arc<ClientConfig>, TvError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptTvCertificate(provider)))
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// rustls wants a server name even for a bare IP.
pub fn server_name(host: &str) -> Result<ServerName<'static>, TvError> {
    ServerName::try_from(host.to_string())
        .map_err(|_| TvError::Protocol(format!("invalid TLS server name {host:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_config() {
        let config = client_config().unwrap();
        assert!(config.alpn_protocols.is_empty());
    }

    #[test]
    fn ip_addresses_are_valid_server_names() {
        assert!(matches!(
            server_name("192.168.1.50").unwrap(),
            ServerName::IpAddress(_)
        ));
        assert!(matches!(
            server_name("frame.local").unwrap(),
            ServerName::DnsName(_)
        ));
        assert!(server_name("not a host").is_err());
    }
}
