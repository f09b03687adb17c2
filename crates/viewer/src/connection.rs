// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One client connection.
//!
//! Frames are handled strictly in arrival order, so a sync echo is written
//! only after every earlier update on the connection has been applied.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vx_core::tag::{CLIENT_INFORMATION, SYNC_ATTRIBUTES, VIEWER_RPC};
use vx_core::{fields, Severity, StateUpdate, StatusRecord};
use vx_wire::{read_frame_async, read_frame_timeout, write_frame_async, Frame, ProtocolError, PROTOCOL_VERSION};

use crate::error::ViewerError;
use crate::rpc::{RpcEffect, ViewerRpc};
use crate::server::ViewerCtx;

/// What to write back for one update
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reply {
    Send(Frame),
    /// Sent after the configured echo delay
    Echo(Frame),
    Close,
}

pub(crate) async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ViewerCtx,
    cancel: CancellationToken,
) -> Result<(), ViewerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match read_frame_timeout(&mut reader, ctx.config.hello_timeout).await {
        Ok(Frame::Hello { version }) => {
            if version != PROTOCOL_VERSION {
                warn!(client_version = %version, "client speaks a different protocol version");
            }
            write_frame_async(&mut writer, &Frame::hello()).await?;
        }
        Ok(other) => {
            warn!(frame = other.kind(), "expected hello, closing connection");
            return Ok(());
        }
        Err(ProtocolError::ConnectionClosed) => return Ok(()),
        Err(e) => return Err(e.into()),
    }
    info!("client connected");

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("viewer stopping, closing connection");
                break;
            }
            frame = read_frame_async(&mut reader) => frame,
        };

        match frame {
            Ok(Frame::Update { update }) => {
                for reply in process_update(ctx, &update) {
                    match reply {
                        Reply::Send(frame) => write_frame_async(&mut writer, &frame).await?,
                        Reply::Echo(frame) => {
                            if !ctx.config.echo_delay.is_zero() {
                                tokio::time::sleep(ctx.config.echo_delay).await;
                            }
                            write_frame_async(&mut writer, &frame).await?;
                        }
                        Reply::Close => {
                            warn!("dropping client connection on request");
                            return Ok(());
                        }
                    }
                }
            }
            Ok(Frame::Hello { .. }) => debug!("ignoring repeated hello"),
            Ok(Frame::Detach) => {
                ctx.stats.lock().detaches += 1;
                info!("client detached");
                break;
            }
            Err(ProtocolError::ConnectionClosed) => {
                info!("client disconnected");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Apply one update to the viewer's state and decide the replies.
pub(crate) fn process_update(ctx: &ViewerCtx, update: &StateUpdate) -> Vec<Reply> {
    let mut registry = ctx.registry.lock();
    ctx.stats.lock().updates += 1;

    let object = match registry.apply_or_declare(update) {
        Ok(object) => object,
        Err(e) => {
            warn!(tag = %update.tag, error = %e, "rejected update");
            return vec![status(Severity::Error, &e.to_string())];
        }
    };

    match update.tag.as_str() {
        SYNC_ATTRIBUTES => match object.int(fields::SYNC_TAG) {
            Ok(tag) => {
                ctx.stats.lock().syncs_echoed += 1;
                debug!(tag, "echoing sync tag");
                vec![Reply::Echo(Frame::update(StateUpdate::new(SYNC_ATTRIBUTES).with(fields::SYNC_TAG, tag)))]
            }
            Err(e) => vec![status(Severity::Error, &e.to_string())],
        },
        VIEWER_RPC => match ViewerRpc::from_object(object) {
            Ok(rpc) => {
                info!(rpc = rpc.name(), "running rpc");
                match rpc.effect() {
                    RpcEffect::None => vec![],
                    RpcEffect::Status(record) => vec![Reply::Send(Frame::update(record.to_update()))],
                    RpcEffect::Method(method) => vec![Reply::Send(Frame::update(method.to_update()))],
                    RpcEffect::Close => vec![Reply::Close],
                }
            }
            Err(e) => {
                warn!(error = %e, "rpc failed");
                vec![status(Severity::Error, &e.to_string())]
            }
        },
        CLIENT_INFORMATION => {
            let client = object.str(fields::CLIENT_NAME).unwrap_or_default();
            let methods = object.list(fields::METHODS).map(<[_]>::len).unwrap_or_default();
            info!(%client, methods, "client information received");
            vec![]
        }
        tag => {
            debug!(%tag, revision = object.revision(), "applied update");
            vec![]
        }
    }
}

fn status(severity: Severity, text: &str) -> Reply {
    Reply::Send(Frame::update(StatusRecord::new(severity, text).to_update()))
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
