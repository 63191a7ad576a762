#![cfg(feature = "loopback")]

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::{
    client::AuthClient, session::SessionToken, types::CallbackParams, utils::generate_state,
};
use fbgraph_common::{
    error::{Result, TransportError},
    http_client::HttpClient,
};
use rouille::Server;
use tokio::sync::mpsc;
use url::{Host, Url};

#[derive(Clone, Debug)]
pub struct LoopbackConfig {
    pub open_browser: bool,
    /// How long to wait for the user to finish the login dialog.
    pub timeout: Duration,
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            open_browser: true,
            timeout: Duration::from_secs(5 * 60),
        }
    }
}

#[cfg(feature = "browser-open")]
fn try_open_in_browser(url: &str) -> bool {
    webbrowser::open(url).is_ok()
}
#[cfg(not(feature = "browser-open"))]
fn try_open_in_browser(_url: &str) -> bool {
    false
}

pub fn create_callback_router(
    request: &rouille::Request,
    path: &str,
    tx: &mpsc::Sender<CallbackParams>,
) -> rouille::Response {
    if request.method() != "GET" || request.url() != path {
        return rouille::Response::empty_404();
    }
    match CallbackParams::from_query(request.raw_query_string()) {
        Ok(params) => {
            let declined = params.error.is_some();
            let _ = tx.try_send(params);
            if declined {
                rouille::Response::text("Login was declined. You can close this window.")
            } else {
                rouille::Response::text("Logged in! You can close this window.")
            }
        }
        Err(_) => rouille::Response::text("Unreadable login callback.").with_status_code(400),
    }
}

/// Socket the callback server listens on: the callback URL's host and port.
fn listen_addr(callback: &Url) -> Result<SocketAddr> {
    let port = callback.port_or_known_default().unwrap_or(80);
    let ip = match callback.host() {
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip),
        Some(Host::Domain(domain)) => {
            return (domain, port)
                .to_socket_addrs()
                .map_err(|e| TransportError::Connect(format!("resolving {domain}: {e}")))?
                .next()
                .ok_or_else(|| TransportError::Connect(format!("{domain} has no address")).into());
        }
        None => IpAddr::V4(Ipv4Addr::LOCALHOST),
    };
    Ok(SocketAddr::new(ip, port))
}

/// Wait for the redirect to reach the callback server.
async fn wait_for_callback(
    rx: &mut mpsc::Receiver<CallbackParams>,
    timeout: Duration,
) -> Result<CallbackParams> {
    match tokio::time::timeout(timeout, rx.recv()).await {
        Ok(Some(params)) => Ok(params),
        Ok(None) => Err(TransportError::Other(
            "callback server stopped before the login finished".into(),
        )
        .into()),
        Err(_elapsed) => Err(TransportError::Timeout.into()),
    }
}

impl<T> AuthClient<T>
where
    T: HttpClient + Sync,
{
    /// Drive the whole login from a local process: serve the configured
    /// callback URL, send the user to the login dialog, and exchange the code
    /// that comes back.
    ///
    /// The callback URL must point at this machine (e.g.
    /// `http://localhost:4000/auth/callback`) and be registered with the app.
    pub async fn login_with_local_server(&self, cfg: LoopbackConfig) -> Result<SessionToken> {
        let callback = self.config().callback_url();
        let addr = listen_addr(callback)?;
        let path = callback.path().to_owned();

        let (tx, mut callback_rx) = mpsc::channel(1);
        let server = Server::new(addr, move |request| {
            create_callback_router(request, &path, &tx)
        })
        .map_err(|e| TransportError::Connect(e.to_string()))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(addr = %server.server_addr(), "loopback callback server listening");
        let (_server_handle, server_stop) = server.stoppable();

        let state = generate_state();
        let auth_url = self.authorization_url(Some(&state));
        println!("To log in, visit:\n{}\n", auth_url);
        if cfg.open_browser {
            let _ = try_open_in_browser(&auth_url);
        }

        let received = wait_for_callback(&mut callback_rx, cfg.timeout).await;
        // trigger shutdown
        let _ = server_stop.send(());
        self.callback(received?, Some(&state)).await
    }
}
