// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-scoped collection of state objects, keyed by tag.

use indexmap::IndexMap;

use crate::error::StateError;
use crate::state::{StateObject, StateUpdate};
use crate::tag::{fields, ObjectTag};
use crate::tag::{CLIENT_INFORMATION, CLIENT_METHOD, MESSAGE_ATTRIBUTES, SYNC_ATTRIBUTES, VIEWER_RPC};
use crate::value::Value;

/// Objects are declared once and live for the whole session.
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    objects: IndexMap<ObjectTag, StateObject>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every well-known protocol object.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for object in builtin_objects() {
            registry.declare(object);
        }
        registry
    }

    /// Declare an object. Re-declaring a tag replaces the previous object.
    pub fn declare(&mut self, object: StateObject) {
        self.objects.insert(object.tag().clone(), object);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.objects.contains_key(tag)
    }

    pub fn get(&self, tag: &str) -> Option<&StateObject> {
        self.objects.get(tag)
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut StateObject> {
        self.objects.get_mut(tag)
    }

    pub fn require_mut(&mut self, tag: &str) -> Result<&mut StateObject, StateError> {
        self.objects.get_mut(tag).ok_or_else(|| StateError::UnknownObject(ObjectTag::new(tag)))
    }

    pub fn tags(&self) -> impl Iterator<Item = &ObjectTag> {
        self.objects.keys()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Apply an incoming update to the object it addresses.
    pub fn apply(&mut self, update: &StateUpdate) -> Result<&StateObject, StateError> {
        let object = self.require_mut(update.tag.as_str())?;
        object.apply(update)?;
        Ok(&*object)
    }

    /// Apply an update, declaring the object first if the tag is new.
    pub fn apply_or_declare(&mut self, update: &StateUpdate) -> Result<&StateObject, StateError> {
        if !self.contains(update.tag.as_str()) {
            self.declare(StateObject::new(update.tag.clone()));
        }
        self.apply(update)
    }
}

/// Fresh copies of the protocol's well-known objects.
pub fn builtin_objects() -> Vec<StateObject> {
    vec![
        StateObject::new(SYNC_ATTRIBUTES).with_field(fields::SYNC_TAG, -1i64),
        StateObject::new(MESSAGE_ATTRIBUTES)
            .with_field(fields::TEXT, "")
            .with_field(fields::SEVERITY, "message"),
        StateObject::new(CLIENT_METHOD)
            .with_field(fields::METHOD_NAME, "")
            .with_field(fields::ARGS, Value::List(Vec::new())),
        StateObject::new(CLIENT_INFORMATION)
            .with_field(fields::CLIENT_NAME, "")
            .with_field(fields::METHODS, Value::List(Vec::new())),
        StateObject::new(VIEWER_RPC)
            .with_field(fields::RPC, "")
            .with_field(fields::ARGS, Value::List(Vec::new())),
    ]
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
