// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands a client asks the viewer to run via the `ViewerRpc` object.

use thiserror::Error;
use vx_core::{fields, ClientMethod, Severity, StateError, StateObject, StatusRecord, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerRpc {
    /// Do nothing; useful as a marker in the update stream
    Noop,
    /// Report an error to the client
    RaiseError(String),
    Warn(String),
    Message(String),
    Inform(String),
    /// Withdraw the previously reported error
    ClearError,
    /// Ask the client to run one of its methods
    InvokeClient { name: String, args: Vec<Value> },
    /// Ask the client to unwind its pending rendezvous
    Interrupt,
    /// Ask the client to quit
    Quit,
    /// Ask the client which methods it supports
    QueryClient,
    /// Drop the connection without a reply
    Crash,
}

#[derive(Debug, Error, PartialEq)]
pub enum RpcError {
    #[error("unknown rpc '{0}'")]
    Unknown(String),

    #[error("rpc '{rpc}' needs a {what} argument")]
    MissingArgument { rpc: String, what: &'static str },

    #[error(transparent)]
    State(#[from] StateError),
}

/// What the connection does in response to an rpc
#[derive(Debug, Clone, PartialEq)]
pub enum RpcEffect {
    None,
    Status(StatusRecord),
    Method(ClientMethod),
    Close,
}

impl ViewerRpc {
    pub fn parse(name: &str, args: &[Value]) -> Result<Self, RpcError> {
        let text = |what| text_arg(name, args, what);
        Ok(match name {
            "Noop" => ViewerRpc::Noop,
            "RaiseError" => ViewerRpc::RaiseError(text("message")?),
            "Warn" => ViewerRpc::Warn(text("message")?),
            "Message" => ViewerRpc::Message(text("message")?),
            "Inform" => ViewerRpc::Inform(text("message")?),
            "ClearError" => ViewerRpc::ClearError,
            "InvokeClient" => ViewerRpc::InvokeClient { name: text("method name")?, args: args.iter().skip(1).cloned().collect() },
            "Interrupt" => ViewerRpc::Interrupt,
            "Quit" => ViewerRpc::Quit,
            "QueryClient" => ViewerRpc::QueryClient,
            "Crash" => ViewerRpc::Crash,
            other => return Err(RpcError::Unknown(other.to_string())),
        })
    }

    pub fn from_object(object: &StateObject) -> Result<Self, RpcError> {
        Self::parse(object.str(fields::RPC)?, object.list(fields::ARGS)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewerRpc::Noop => "Noop",
            ViewerRpc::RaiseError(_) => "RaiseError",
            ViewerRpc::Warn(_) => "Warn",
            ViewerRpc::Message(_) => "Message",
            ViewerRpc::Inform(_) => "Inform",
            ViewerRpc::ClearError => "ClearError",
            ViewerRpc::InvokeClient { .. } => "InvokeClient",
            ViewerRpc::Interrupt => "Interrupt",
            ViewerRpc::Quit => "Quit",
            ViewerRpc::QueryClient => "QueryClient",
            ViewerRpc::Crash => "Crash",
        }
    }

    pub fn effect(&self) -> RpcEffect {
        let status = |severity, text: &str| RpcEffect::Status(StatusRecord::new(severity, text));
        match self {
            ViewerRpc::Noop => RpcEffect::None,
            ViewerRpc::RaiseError(text) => status(Severity::Error, text.as_str()),
            ViewerRpc::Warn(text) => status(Severity::Warning, text.as_str()),
            ViewerRpc::Message(text) => status(Severity::Message, text.as_str()),
            ViewerRpc::Inform(text) => status(Severity::Information, text.as_str()),
            ViewerRpc::ClearError => status(Severity::ErrorClear, ""),
            ViewerRpc::InvokeClient { name, args } => RpcEffect::Method(ClientMethod::from_call(name, args.clone())),
            ViewerRpc::Interrupt => RpcEffect::Method(ClientMethod::Interrupt),
            ViewerRpc::Quit => RpcEffect::Method(ClientMethod::Quit),
            ViewerRpc::QueryClient => RpcEffect::Method(ClientMethod::QueryClientInformation),
            ViewerRpc::Crash => RpcEffect::Close,
        }
    }
}

fn text_arg(rpc: &str, args: &[Value], what: &'static str) -> Result<String, RpcError> {
    match args.first() {
        Some(Value::Str(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(RpcError::MissingArgument { rpc: rpc.to_string(), what }),
    }
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
