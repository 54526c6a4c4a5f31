//! IMAP connection and TLS helpers
//!
//! Opens a STARTTLS session the way Proton Bridge and other local
//! bridges expect: plain TCP, `STARTTLS`, TLS handshake, then `LOGIN`.

use crate::config::ImapConfig;
use crate::error::{Error, Result};
use async_imap::Session;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

/// Logged-in session over the upgraded connection.
pub type ImapSession = Session<Compat<TlsStream<TcpStream>>>;

/// Connect, upgrade to TLS and log in.
///
/// # Errors
///
/// Returns an error if the TCP connection, STARTTLS upgrade, TLS
/// handshake or login fails.
pub async fn connect(config: &ImapConfig) -> Result<ImapSession> {
    let addr = format!("{}:{}", config.host, config.port);
    debug!("Connecting to IMAP server at {}", addr);
    let tcp = TcpStream::connect(&addr).await?;

    let tls = starttls(tcp, &config.host).await?;
    let session = async_imap::Client::new(tls.compat())
        .login(&config.username, &config.password)
        .await
        .map_err(|(e, _)| Error::Imap(format!("Login failed: {e}")))?;

    info!("Logged in to {} as {}", addr, config.username);
    Ok(session)
}

/// Issue `STARTTLS` in plaintext, then hand the raw socket to rustls.
async fn starttls(tcp: TcpStream, host: &str) -> Result<TlsStream<TcpStream>> {
    let mut plain = async_imap::Client::new(tcp.compat());
    plain
        .run_command_and_check_ok("STARTTLS", None)
        .await
        .map_err(|e| Error::Tls(format!("STARTTLS failed: {e}")))?;

    let server_name = ServerName::try_from(host.to_owned())
        .map_err(|e| Error::Tls(format!("Invalid server name {host}: {e}")))?;
    let config = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
        .connect(server_name, plain.into_inner().into_inner())
        .await
        .map_err(|e| Error::Tls(format!("Handshake with {host} failed: {e}")))
}

/// Accepts every server certificate. Local bridges only ship
/// self-signed ones.
#[derive(Debug)]
struct AcceptAnyCert;

impl ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
