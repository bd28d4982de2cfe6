//! WebSocket IPC bridge between the viewer and the embedding page.
//!
//! The server runs on its own thread with a current-thread tokio runtime
//! and talks to the viewer loop through a pair of unbounded channels
//! carrying JSON text.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::ipc::ViewerToUi;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("failed to build tokio runtime for WS bridge: {0}")]
    Runtime(std::io::Error),

    #[error("capture of {width}x{height} has the wrong number of pixels")]
    FrameSize { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Pause before accepting again after a failed `accept`.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Channel endpoints for the viewer loop.
pub struct WsBridge {
    /// Address the server is bound to.
    pub local_addr: SocketAddr,
    /// Send messages to the WebSocket client.
    pub outbound_tx: mpsc::UnboundedSender<String>,
    /// Receive messages from the WebSocket client.
    pub inbound_rx: mpsc::UnboundedReceiver<String>,
}

impl WsBridge {
    /// Serialize and queue `msg` for the page.
    pub fn send(&self, msg: &ViewerToUi) -> Result<(), BridgeError> {
        let json = serde_json::to_string(msg)?;
        if self.outbound_tx.send(json).is_err() {
            tracing::warn!("WebSocket server is gone, message dropped");
        }
        Ok(())
    }
}

/// Spawn the WebSocket server on a dedicated thread.
///
/// The server listens on `ws://127.0.0.1:{port}` and handles one client
/// connection at a time. Messages queued while no client is connected are
/// delivered to the next one. With `exit_on_disconnect` the server shuts
/// down once the first client goes away, which closes `inbound_rx`.
pub fn spawn_ws_server(port: u16, exit_on_disconnect: bool) -> Result<WsBridge, BridgeError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener =
        std::net::TcpListener::bind(addr).map_err(|source| BridgeError::Bind { addr, source })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| BridgeError::Bind { addr, source })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| BridgeError::Bind { addr, source })?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(BridgeError::Runtime)?;

    let (viewer_to_ws_tx, mut viewer_to_ws_rx) = mpsc::unbounded_channel::<String>();
    let (ws_to_viewer_tx, ws_to_viewer_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        rt.block_on(async move {
            let listener = match tokio::net::TcpListener::from_std(listener) {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!("failed to register WebSocket listener: {e}");
                    return;
                }
            };
            tracing::info!("WebSocket IPC server listening on ws://{local_addr}");

            loop {
                let (stream, peer) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!("accept failed: {e}");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                };
                tracing::info!("WebSocket client connected: {peer}");

                let ws_stream = match tokio_tungstenite::accept_async(stream).await {
                    Ok(ws) => ws,
                    Err(e) => {
                        tracing::error!("WebSocket handshake failed: {e}");
                        continue;
                    }
                };

                let (mut ws_sink, mut ws_source) = ws_stream.split();
                let tx = ws_to_viewer_tx.clone();

                let recv_handle = tokio::spawn(async move {
                    while let Some(Ok(msg)) = ws_source.next().await {
                        if let Message::Text(text) = msg
                            && tx.send(text.to_string()).is_err()
                        {
                            break;
                        }
                    }
                });

                tokio::pin!(recv_handle);
                loop {
                    tokio::select! {
                        _ = &mut recv_handle => break,
                        msg = viewer_to_ws_rx.recv() => {
                            let Some(text) = msg else {
                                tracing::info!("viewer loop ended, closing bridge");
                                return;
                            };
                            if ws_sink.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                }

                tracing::info!("WebSocket client disconnected");
                if exit_on_disconnect {
                    tracing::info!("closing bridge after disconnect");
                    return;
                }
            }
        });
    });

    Ok(WsBridge {
        local_addr,
        outbound_tx: viewer_to_ws_tx,
        inbound_rx: ws_to_viewer_rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_closes_after_client_disconnects() {
        let mut bridge = spawn_ws_server(0, true).unwrap();
        let url = format!("ws://{}", bridge.local_addr);

        let client = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        client.block_on(async {
            let (mut ws, _) = tokio_tungstenite::connect_async(url).await.unwrap();
            ws.send(Message::Text(r#"{"type":"TOGGLE_DARK_MODE"}"#.into()))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        });
        drop(client);

        assert_eq!(
            bridge.inbound_rx.blocking_recv().as_deref(),
            Some(r#"{"type":"TOGGLE_DARK_MODE"}"#)
        );
        assert_eq!(bridge.inbound_rx.blocking_recv(), None);
    }
}
