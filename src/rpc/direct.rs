/*!
Direct websocket transport.

Dial sequence:
  1. build the upgrade request (ws/wss URL, basic auth header)
  2. load TLS material (CA bundle replaces built-in roots, optional client
     identity); loaded for every scheme, used only for wss
  3. open TCP, or a SOCKS5 tunnel when a proxy is configured
  4. websocket handshake over that stream

Any failure before the handshake completes is `CtlError::Dial`.
*/

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::{SinkExt, StreamExt};
use native_tls::{Certificate, Identity, TlsConnector};
use serde_json::value::RawValue;
use tokio::net::TcpStream;
use tokio_socks::tcp::Socks5Stream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream, client_async_tls_with_config};
use url::Url;

use super::context::CallContext;
use super::pem;
use super::wire::{REQUEST_ID, RpcRequest, RpcResponse};
use super::{AuthType, Caller, TransportConfig};
use crate::error::CtlError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A dialed websocket good for exactly one call.
pub struct DirectCaller {
    ws: Option<WsStream>,
}

impl DirectCaller {
    pub async fn dial(cfg: &TransportConfig, ctx: &CallContext) -> Result<Self, CtlError> {
        let ws = ctx.run(dial_ws(cfg)).await?;
        Ok(Self { ws: Some(ws) })
    }
}

/* ---- Dial ---- */

async fn dial_ws(cfg: &TransportConfig) -> Result<WsStream, CtlError> {
    let url = websocket_url(cfg.server()?)?;
    let host = url
        .host_str()
        .ok_or_else(|| CtlError::dial(format!("server URL has no host: {url}")))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let port = url
        .port_or_known_default()
        .ok_or_else(|| CtlError::dial(format!("server URL has no port: {url}")))?;

    let request = upgrade_request(&url, cfg)?;
    let tls = tls_connector(cfg)?;
    let connector = if url.scheme() == "wss" {
        Connector::NativeTls(tls)
    } else {
        Connector::Plain
    };

    let stream = match cfg.proxy.as_deref() {
        Some(proxy) => socks_connect(proxy, cfg, &host, port).await?,
        None => TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| CtlError::dial(format!("dial {host}:{port}: {e}")))?,
    };
    tracing::debug!(%url, "websocket handshake");

    let (ws, _response) = client_async_tls_with_config(request, stream, None, Some(connector))
        .await
        .map_err(|e| CtlError::dial(format!("websocket handshake with {url}: {e}")))?;
    Ok(ws)
}

/// Map http(s) onto ws(s); reject anything else.
fn websocket_url(server: &Url) -> Result<Url, CtlError> {
    let mut url = server.clone();
    let scheme = match server.scheme() {
        "ws" | "http" => "ws",
        "wss" | "https" => "wss",
        other => {
            return Err(CtlError::dial(format!(
                "unsupported server URL scheme {other:?}"
            )));
        }
    };
    if url.scheme() != scheme {
        // http<->ws and https<->wss are all special schemes, so this cannot fail.
        let _ = url.set_scheme(scheme);
    }
    Ok(url)
}

fn upgrade_request(url: &Url, cfg: &TransportConfig) -> Result<Request, CtlError> {
    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| CtlError::dial(format!("invalid server URL {url}: {e}")))?;
    if let Some((user, pass)) = cfg.basic_credentials() {
        let token = BASE64.encode(format!("{user}:{pass}"));
        let value = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|e| CtlError::dial(format!("invalid basic auth header: {e}")))?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }
    Ok(request)
}

fn read_file(path: &std::path::Path, what: &str) -> Result<Vec<u8>, CtlError> {
    std::fs::read(path).map_err(|e| CtlError::dial(format!("read {what} {}: {e}", path.display())))
}

fn tls_connector(cfg: &TransportConfig) -> Result<TlsConnector, CtlError> {
    let mut builder = TlsConnector::builder();

    if let Some(path) = &cfg.ca_cert {
        let bundle = read_file(path, "certificate file")?;
        let roots = Certificate::stack_from_pem(&bundle)
            .ok()
            .filter(|certs| !certs.is_empty())
            .ok_or_else(|| {
                CtlError::dial(format!("invalid certificate file: {}", path.display()))
            })?;
        tracing::debug!(count = roots.len(), "trusting certificates from {}", path.display());
        for cert in roots {
            builder.add_root_certificate(cert);
        }
        builder.disable_built_in_roots(true);
    }

    if cfg.auth_type == AuthType::ClientCert {
        let (Some(cert_path), Some(key_path)) = (&cfg.client_cert, &cfg.client_key) else {
            return Err(CtlError::dial(
                "clientcert authentication requires a client certificate and key",
            ));
        };
        let cert = read_file(cert_path, "client certificate")?;
        let key = pem::private_key_to_pkcs8(&read_file(key_path, "client key")?)
            .map_err(|e| CtlError::dial(format!("read client keypair: {e}")))?;
        let identity = Identity::from_pkcs8(&cert, &key)
            .map_err(|e| CtlError::dial(format!("read client keypair: {e}")))?;
        builder.identity(identity);
    }

    builder
        .build()
        .map_err(|e| CtlError::dial(format!("tls setup: {e}")))
}

async fn socks_connect(
    proxy: &str,
    cfg: &TransportConfig,
    host: &str,
    port: u16,
) -> Result<TcpStream, CtlError> {
    let user = cfg.proxy_user.as_deref().unwrap_or("");
    let pass = cfg.proxy_pass.as_deref().unwrap_or("");
    tracing::debug!(proxy, "dialing through socks5 proxy");

    let tunnel = if user.is_empty() && pass.is_empty() {
        Socks5Stream::connect(proxy, (host, port)).await
    } else {
        Socks5Stream::connect_with_password(proxy, (host, port), user, pass).await
    };
    tunnel
        .map(Socks5Stream::into_inner)
        .map_err(|e| CtlError::dial(format!("socks5 proxy {proxy}: {e}")))
}

/* ---- Call ---- */

async fn round_trip(
    ws: &mut WsStream,
    method: &str,
    params: &[Box<RawValue>],
) -> Result<Option<Box<RawValue>>, CtlError> {
    let request = RpcRequest {
        method: method.to_string(),
        params: params.to_vec(),
        id: REQUEST_ID,
    };
    let text = serde_json::to_string(&request).map_err(CtlError::Encoding)?;
    ws.send(Message::Text(text))
        .await
        .map_err(|e| CtlError::transport(format!("send: {e}")))?;

    while let Some(frame) = ws.next().await {
        let frame = frame.map_err(|e| CtlError::transport(format!("receive: {e}")))?;
        let text = match frame {
            Message::Text(t) => t,
            Message::Binary(b) => String::from_utf8(b)
                .map_err(|e| CtlError::transport(format!("non-utf8 response: {e}")))?,
            Message::Close(_) => break,
            _ => continue,
        };
        let response = RpcResponse::parse(&text)?;
        if !response.is_for(REQUEST_ID) {
            tracing::debug!(id = %response.id, "skipping unrelated message");
            continue;
        }
        tracing::debug!(bytes = text.len(), "received response");
        return response.into_result();
    }
    Err(CtlError::transport("connection closed before response"))
}

#[async_trait]
impl Caller for DirectCaller {
    async fn call(
        &mut self,
        ctx: &CallContext,
        method: &str,
        out: &mut Option<Box<RawValue>>,
        params: &[Box<RawValue>],
    ) -> Result<(), CtlError> {
        let mut ws = self
            .ws
            .take()
            .ok_or_else(|| CtlError::transport("connection already used"))?;

        // On error or cancellation the stream is dropped here, never reused.
        let result = ctx.run(round_trip(&mut ws, method, params)).await?;
        *out = result;

        let _ = ctx
            .run(async {
                ws.close(None)
                    .await
                    .map_err(|e| CtlError::transport(e.to_string()))
            })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio_tungstenite::tungstenite::handshake::server::{
        ErrorResponse, Request as ServerRequest, Response,
    };

    fn raw(s: &str) -> Box<RawValue> {
        RawValue::from_string(s.to_string()).unwrap()
    }

    fn cfg_for(addr: std::net::SocketAddr) -> TransportConfig {
        TransportConfig {
            server: Some(Url::parse(&format!("ws://{addr}/ws")).unwrap()),
            ..Default::default()
        }
    }

    /// Accept one websocket, report the request text and auth header, and
    /// answer with `reply` (or never answer when `None`).
    async fn one_shot_server(
        reply: Option<&'static str>,
    ) -> (
        std::net::SocketAddr,
        oneshot::Receiver<Option<String>>,
        oneshot::Receiver<String>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (auth_tx, auth_rx) = oneshot::channel();
        let (req_tx, req_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let callback = move |req: &ServerRequest, resp: Response| {
                let auth = req
                    .headers()
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let _ = auth_tx.send(auth);
                Ok::<Response, ErrorResponse>(resp)
            };
            let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
                .await
                .unwrap();
            if let Some(Ok(Message::Text(t))) = ws.next().await {
                let _ = req_tx.send(t);
            }
            match reply {
                Some(body) => {
                    ws.send(Message::Text(r#"{"method":"noise","params":[],"id":null}"#.into()))
                        .await
                        .unwrap();
                    ws.send(Message::Text(body.into())).await.unwrap();
                    let _ = ws.next().await;
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });
        (addr, auth_rx, req_rx)
    }

    #[tokio::test]
    async fn round_trip_binds_result() {
        let (addr, auth_rx, req_rx) =
            one_shot_server(Some(r#"{"result":{"a":1},"error":null,"id":1}"#)).await;
        let mut cfg = cfg_for(addr);
        cfg.user = Some("user".into());
        cfg.pass = Some("pass".into());

        let ctx = CallContext::default();
        let mut caller = DirectCaller::dial(&cfg, &ctx).await.unwrap();
        let mut out = None;
        caller
            .call(&ctx, "getblock", &mut out, &[raw(r#""00ff""#), raw("true")])
            .await
            .unwrap();

        assert_eq!(out.unwrap().get(), r#"{"a":1}"#);
        assert_eq!(
            req_rx.await.unwrap(),
            r#"{"method":"getblock","params":["00ff",true],"id":1}"#
        );
        // base64("user:pass")
        assert_eq!(auth_rx.await.unwrap().as_deref(), Some("Basic dXNlcjpwYXNz"));
    }

    #[tokio::test]
    async fn no_credentials_no_auth_header() {
        let (addr, auth_rx, _req_rx) =
            one_shot_server(Some(r#"{"result":42,"error":null,"id":1}"#)).await;
        let ctx = CallContext::default();
        let mut caller = DirectCaller::dial(&cfg_for(addr), &ctx).await.unwrap();
        let mut out = None;
        caller.call(&ctx, "getblockcount", &mut out, &[]).await.unwrap();
        assert_eq!(out.unwrap().get(), "42");
        assert_eq!(auth_rx.await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_envelope_is_rpc_error() {
        let (addr, _auth, _req) = one_shot_server(Some(
            r#"{"result":null,"error":{"code":-8,"message":"Block not found"},"id":1}"#,
        ))
        .await;
        let ctx = CallContext::default();
        let mut caller = DirectCaller::dial(&cfg_for(addr), &ctx).await.unwrap();
        let mut out = None;
        let err = caller
            .call(&ctx, "getblock", &mut out, &[raw(r#""00""#)])
            .await
            .unwrap_err();
        assert!(matches!(err, CtlError::Rpc { code: -8, .. }));
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn cancel_before_response_leaves_out_unset() {
        let (addr, _auth, req_rx) = one_shot_server(None).await;
        let ctx = CallContext::default();
        let mut caller = DirectCaller::dial(&cfg_for(addr), &ctx).await.unwrap();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            let _ = req_rx.await;
            canceller.cancel();
        });

        let mut out = None;
        let err = caller
            .call(&ctx, "getbestblock", &mut out, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CtlError::Cancelled));
        assert!(out.is_none());

        // the connection was torn down, not kept for reuse
        let err = caller
            .call(&CallContext::default(), "getbestblock", &mut out, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CtlError::Transport(_)));
    }

    #[tokio::test]
    async fn timeout_before_response() {
        let (addr, _auth, _req) = one_shot_server(None).await;
        let ctx = CallContext::new(Some(Duration::from_millis(200)));
        let mut caller = DirectCaller::dial(&cfg_for(addr), &ctx).await.unwrap();
        let mut out = None;
        let err = caller.call(&ctx, "ping", &mut out, &[]).await.unwrap_err();
        assert!(matches!(err, CtlError::Timeout(_)));
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn missing_ca_file_is_dial_failure() {
        let cfg = TransportConfig {
            server: Some(Url::parse("wss://127.0.0.1:1/ws").unwrap()),
            ca_cert: Some("/nonexistent/rpc.cert".into()),
            ..Default::default()
        };
        let err = DirectCaller::dial(&cfg, &CallContext::default())
            .await
            .err()
            .unwrap();
        match err {
            CtlError::Dial(msg) => assert!(msg.contains("/nonexistent/rpc.cert"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn clientcert_without_paths_is_dial_failure() {
        let cfg = TransportConfig {
            server: Some(Url::parse("wss://127.0.0.1:1/ws").unwrap()),
            auth_type: AuthType::ClientCert,
            ..Default::default()
        };
        let err = DirectCaller::dial(&cfg, &CallContext::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CtlError::Dial(_)));
    }

    #[tokio::test]
    async fn unreachable_proxy_is_dial_failure() {
        // grab a free port, then close it so the proxy dial is refused
        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let proxy = closed.local_addr().unwrap().to_string();
        drop(closed);

        let cfg = TransportConfig {
            server: Some(Url::parse("ws://example.invalid:9109/ws").unwrap()),
            proxy: Some(proxy),
            ..Default::default()
        };
        let err = DirectCaller::dial(&cfg, &CallContext::default())
            .await
            .err()
            .unwrap();
        match err {
            CtlError::Dial(msg) => assert!(msg.contains("socks5"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn tls_material_is_loaded_for_plain_websocket_too() {
        let (addr, _auth, _req) = one_shot_server(Some(r#"{"result":1,"error":null,"id":1}"#)).await;
        let mut cfg = cfg_for(addr);
        cfg.ca_cert = Some("/nonexistent/rpc.cert".into());
        let err = DirectCaller::dial(&cfg, &CallContext::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CtlError::Dial(_)));
    }

    const SERVER_CERT: &str = include_str!("testdata/server-cert.pem");
    const SERVER_KEY: &str = include_str!("testdata/server-key.pem");
    const OTHER_CERT: &str = include_str!("testdata/other-cert.pem");

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn testdata(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("src/rpc/testdata")
            .join(name)
    }

    /// Blocking TLS websocket server for `localhost`; answers one request.
    fn tls_server(reply: &'static str) -> (u16, std::thread::JoinHandle<Option<String>>) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let identity = Identity::from_pkcs8(SERVER_CERT.as_bytes(), SERVER_KEY.as_bytes()).unwrap();
        let acceptor = native_tls::TlsAcceptor::new(identity).unwrap();
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().ok()?;
            let tls = acceptor.accept(stream).ok()?;
            let mut ws = tokio_tungstenite::tungstenite::accept(tls).ok()?;
            let request = ws.read().ok()?.into_text().ok()?;
            ws.send(Message::Text(reply.into())).ok()?;
            let _ = ws.read();
            Some(request)
        });
        (port, handle)
    }

    fn wss_cfg(port: u16, ca: std::path::PathBuf) -> TransportConfig {
        TransportConfig {
            server: Some(Url::parse(&format!("wss://localhost:{port}/ws")).unwrap()),
            ca_cert: Some(ca),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn trusted_cert_later_in_bundle_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_temp(&dir, "bundle.pem", &format!("{OTHER_CERT}{SERVER_CERT}"));
        let (port, server) = tls_server(r#"{"result":"ok","error":null,"id":1}"#);

        let mut cfg = wss_cfg(port, bundle);
        cfg.auth_type = AuthType::ClientCert;
        cfg.client_cert = Some(testdata("client-ec-cert.pem"));
        cfg.client_key = Some(testdata("client-ec-key.pem"));

        let ctx = CallContext::new(Some(Duration::from_secs(10)));
        let mut caller = DirectCaller::dial(&cfg, &ctx).await.unwrap();
        let mut out = None;
        caller.call(&ctx, "ping", &mut out, &[]).await.unwrap();
        assert_eq!(out.unwrap().get(), r#""ok""#);
        assert_eq!(
            server.join().unwrap().as_deref(),
            Some(r#"{"method":"ping","params":[],"id":1}"#)
        );
    }

    #[tokio::test]
    async fn untrusted_server_cert_fails_dial() {
        let dir = tempfile::tempdir().unwrap();
        let ca = write_temp(&dir, "other.pem", OTHER_CERT);
        let (port, _server) = tls_server(r#"{"result":"ok","error":null,"id":1}"#);
        let ctx = CallContext::new(Some(Duration::from_secs(10)));
        let err = DirectCaller::dial(&wss_cfg(port, ca), &ctx).await.err().unwrap();
        assert!(matches!(err, CtlError::Dial(_)), "{err:?}");
    }

    #[test]
    fn file_without_certificates_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TransportConfig {
            ca_cert: Some(write_temp(&dir, "empty.pem", "not a certificate\n")),
            ..Default::default()
        };
        match tls_connector(&cfg) {
            Err(CtlError::Dial(msg)) => assert!(msg.contains("invalid certificate file"), "{msg}"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn sec1_and_pkcs1_client_keys_are_accepted() {
        for (cert, key) in [
            ("client-ec-cert.pem", "client-ec-key.pem"),
            ("client-rsa-cert.pem", "client-rsa-key.pem"),
        ] {
            let cfg = TransportConfig {
                auth_type: AuthType::ClientCert,
                client_cert: Some(testdata(cert)),
                client_key: Some(testdata(key)),
                ..Default::default()
            };
            if let Err(e) = tls_connector(&cfg) {
                panic!("{key}: {e}");
            }
        }
    }

    #[test]
    fn http_schemes_map_to_websocket() {
        let u = websocket_url(&Url::parse("https://host:9109/ws").unwrap()).unwrap();
        assert_eq!(u.as_str(), "wss://host:9109/ws");
        let u = websocket_url(&Url::parse("http://host:9109/ws").unwrap()).unwrap();
        assert_eq!(u.as_str(), "ws://host:9109/ws");
        assert!(websocket_url(&Url::parse("ftp://host/ws").unwrap()).is_err());
    }
}
