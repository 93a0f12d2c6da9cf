//! Printer Feed
//!
//! Maintains the MQTT connection to the printer and keeps the latest
//! status available on a watch channel. Bambu printers expose a TLS MQTT
//! broker with a self-signed certificate, so certificate verification is
//! disabled for this connection.
//!
//! Connectivity doubles as the overlay's visibility signal: while the feed
//! is up the page is Visible, and a lost connection marks it Hidden until
//! the broker is reachable again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS, TlsConfiguration, Transport};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::MqttConfig;
use crate::printer::report::BambuReport;
use crate::printer::status::PrinterStatus;
use crate::refresh::Visibility;

/// Delay before the event loop retries after a connection failure.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

// == Printer Feed ==
/// A running MQTT feed for one printer.
pub struct PrinterFeed {
    client: AsyncClient,
    status: watch::Receiver<PrinterStatus>,
    handle: JoinHandle<()>,
}

impl PrinterFeed {
    /// Starts the feed task and returns it together with the visibility
    /// event stream derived from broker connectivity.
    ///
    /// Subscription happens on every (re)connect acknowledgement; when no
    /// serial is configured the feed subscribes to all devices and logs the
    /// serial discovered from the first report.
    pub fn connect(config: &MqttConfig) -> (Self, mpsc::UnboundedReceiver<Visibility>) {
        let mut options = MqttOptions::new(
            format!("bambu-status-{}", Utc::now().timestamp()),
            config.host.clone(),
            config.port,
        );
        options.set_credentials(config.username.clone(), config.password.clone());
        options.set_keep_alive(Duration::from_secs(60));
        options.set_transport(Transport::Tls(insecure_tls_config()));

        let (client, mut eventloop) = AsyncClient::new(options, 16);
        let (status_tx, status_rx) = watch::channel(PrinterStatus::new());
        let (visibility_tx, visibility_rx) = mpsc::unbounded_channel();

        let serial = config.serial.clone();
        let task_client = client.clone();
        info!("Connecting to MQTT broker at {}:{}...", config.host, config.port);

        let handle = tokio::spawn(async move {
            let mut connected = false;
            let mut discovered = serial.is_some();

            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                        info!("Connected to MQTT broker");
                        if !connected {
                            connected = true;
                            let _ = visibility_tx.send(Visibility::Visible);
                        }

                        let topic = report_topic(serial.as_deref());
                        if serial.is_none() {
                            info!("Auto-discovering printer serial number...");
                        }
                        match task_client.subscribe(topic.clone(), QoS::AtMostOnce).await {
                            Ok(_) => info!("Subscribed to topic: {}", topic),
                            Err(e) => warn!("Error subscribing to topic {}: {}", topic, e),
                        }
                    }
                    Ok(Event::Incoming(Incoming::Publish(publish))) => {
                        debug!("Received message on topic: {}", publish.topic);
                        if !discovered {
                            if let Some(found) = serial_from_topic(&publish.topic) {
                                info!("Discovered printer serial: {}", found);
                                discovered = true;
                            }
                        }

                        match serde_json::from_slice::<BambuReport>(&publish.payload) {
                            Ok(report) => {
                                status_tx.send_replace(report.to_status());
                            }
                            Err(e) => warn!("Error parsing MQTT message: {}", e),
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("MQTT connection lost: {}", e);
                        if connected {
                            connected = false;
                            let _ = visibility_tx.send(Visibility::Hidden);
                        }
                        sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        });

        let feed = Self {
            client,
            status: status_rx,
            handle,
        };
        (feed, visibility_rx)
    }

    /// A receiver for the latest printer status.
    pub fn status_updates(&self) -> watch::Receiver<PrinterStatus> {
        self.status.clone()
    }

    /// Disconnects from the broker and stops the feed task.
    pub async fn disconnect(self) {
        if let Err(e) = self.client.disconnect().await {
            debug!("MQTT disconnect failed: {}", e);
        } else {
            info!("Disconnected from MQTT broker");
        }
        self.handle.abort();
    }
}

// == TLS ==
/// TLS transport that accepts the printer's self-signed certificate.
fn insecure_tls_config() -> TlsConfiguration {
    let tls = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
        .with_no_client_auth();
    TlsConfiguration::Rustls(Arc::new(tls))
}

/// Accepts any server certificate.
///
/// Bambu printers present a self-signed certificate, so the connection is
/// encrypted but the peer is not authenticated.
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
        vec![
            SignatureScheme::RSA_PKCS1_SHA1,
            SignatureScheme::ECDSA_SHA1_Legacy,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

/// Report topic for a printer, wildcarded when the serial is unknown.
fn report_topic(serial: Option<&str>) -> String {
    match serial {
        Some(serial) => format!("device/{}/report", serial),
        None => "device/+/report".to_string(),
    }
}

/// Extracts the serial from a `device/<serial>/report` topic.
fn serial_from_topic(topic: &str) -> Option<&str> {
    let mut parts = topic.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("device"), Some(serial), Some("report"), None) if !serial.is_empty() => {
            Some(serial)
        }
        _ => None,
    }
}
