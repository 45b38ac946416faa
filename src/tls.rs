//! TLS setup for `wss://` stream connections.
//!
//! `tokio-tungstenite` builds its rustls client config from the bundled
//! webpki roots, which needs a process-wide crypto provider. This crate
//! uses `ring`.

use tracing::debug;

/// Installs `ring` as the process-default rustls crypto provider.
///
/// Must run before the first connection. Calling it again, or after
/// another provider was installed, leaves the existing provider in place.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installing_twice_is_harmless() {
        install_crypto_provider();
        install_crypto_provider();
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }
}
