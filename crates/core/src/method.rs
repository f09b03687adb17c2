// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Methods the viewer asks the control process to run.

use crate::error::StateError;
use crate::state::{StateObject, StateUpdate};
use crate::tag::{fields, CLIENT_METHOD};
use crate::value::Value;

pub const QUIT: &str = "Quit";
pub const INTERRUPT: &str = "Interrupt";
pub const QUERY_CLIENT_INFORMATION: &str = "_QueryClientInformation";

/// A client method invocation.
///
/// Names the control process knows natively get their own variant;
/// everything else is `Named` and is either handled by a registered
/// handler or dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMethod {
    /// Terminate the control process
    Quit,
    /// Unwind the next rendezvous with an interruption error
    Interrupt,
    /// Reply with the client's supported methods
    QueryClientInformation,
    /// Any other method, by name
    Named { name: String, args: Vec<Value> },
}

impl ClientMethod {
    pub fn named(name: impl Into<String>, args: Vec<Value>) -> Self {
        ClientMethod::Named { name: name.into(), args }
    }

    pub fn from_call(name: &str, args: Vec<Value>) -> Self {
        match name {
            QUIT => ClientMethod::Quit,
            INTERRUPT => ClientMethod::Interrupt,
            QUERY_CLIENT_INFORMATION => ClientMethod::QueryClientInformation,
            _ => ClientMethod::Named { name: name.to_string(), args },
        }
    }

    pub fn from_object(object: &StateObject) -> Result<Self, StateError> {
        let name = object.str(fields::METHOD_NAME)?;
        let args = object.list(fields::ARGS)?.to_vec();
        Ok(Self::from_call(name, args))
    }

    pub fn name(&self) -> &str {
        match self {
            ClientMethod::Quit => QUIT,
            ClientMethod::Interrupt => INTERRUPT,
            ClientMethod::QueryClientInformation => QUERY_CLIENT_INFORMATION,
            ClientMethod::Named { name, .. } => name,
        }
    }

    pub fn args(&self) -> &[Value] {
        match self {
            ClientMethod::Named { args, .. } => args,
            _ => &[],
        }
    }

    pub fn to_update(&self) -> StateUpdate {
        StateUpdate::new(CLIENT_METHOD)
            .with(fields::METHOD_NAME, self.name())
            .with(fields::ARGS, Value::List(self.args().to_vec()))
    }
}

/// Method names the control process handles without a registered handler.
pub fn builtin_method_names() -> [&'static str; 3] {
    [QUIT, INTERRUPT, QUERY_CLIENT_INFORMATION]
}

#[cfg(test)]
#[path = "method_tests.rs"]
mod tests;
