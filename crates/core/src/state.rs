// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned, field-selectable state objects.
//!
//! A field becomes *selected* when it is mutated locally. Only selected
//! fields travel in an outgoing [`StateUpdate`]; an incoming update is
//! applied field by field and never marks anything selected.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::tag::ObjectTag;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
struct Field {
    value: Value,
    selected: bool,
}

/// A named record of typed fields with per-field selection.
#[derive(Debug, Clone, PartialEq)]
pub struct StateObject {
    tag: ObjectTag,
    fields: IndexMap<String, Field>,
    revision: u64,
}

/// The serialized form of a state object change.
///
/// Symmetric: the same shape flows from the control process to the viewer
/// and back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub tag: ObjectTag,
    pub fields: IndexMap<String, Value>,
}

impl StateUpdate {
    pub fn new(tag: impl Into<ObjectTag>) -> Self {
        Self { tag: tag.into(), fields: IndexMap::new() }
    }

    /// Add a field (builder style).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl StateObject {
    pub fn new(tag: impl Into<ObjectTag>) -> Self {
        Self { tag: tag.into(), fields: IndexMap::new(), revision: 0 }
    }

    /// Declare a field with its initial value (builder style, unselected).
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), Field { value: value.into(), selected: false });
        self
    }

    pub fn tag(&self) -> &ObjectTag {
        &self.tag
    }

    /// Incremented on every local mutation and every applied update.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).map(|f| &f.value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_selected(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|f| f.selected)
    }

    pub fn has_selected(&self) -> bool {
        self.fields.values().any(|f| f.selected)
    }

    /// Mutate a field locally and mark it selected.
    ///
    /// A declared field keeps its kind; new fields are added.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), StateError> {
        self.write(field, value.into(), true)
    }

    /// Mutate a field without selecting it, so it is not transmitted.
    pub fn store(&mut self, field: &str, value: impl Into<Value>) -> Result<(), StateError> {
        self.write(field, value.into(), false)
    }

    fn write(&mut self, field: &str, value: Value, select: bool) -> Result<(), StateError> {
        self.check_kind(field, &value)?;
        match self.fields.get_mut(field) {
            Some(existing) => {
                existing.value = value;
                existing.selected |= select;
            }
            None => {
                self.fields.insert(field.to_string(), Field { value, selected: select });
            }
        }
        self.revision += 1;
        Ok(())
    }

    fn check_kind(&self, field: &str, value: &Value) -> Result<(), StateError> {
        match self.fields.get(field) {
            Some(existing) if existing.value.kind() != value.kind() => {
                Err(StateError::TypeMismatch {
                    tag: self.tag.clone(),
                    field: field.to_string(),
                    expected: existing.value.kind(),
                    actual: value.kind(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn select_all(&mut self) {
        for f in self.fields.values_mut() {
            f.selected = true;
        }
    }

    pub fn unselect_all(&mut self) {
        for f in self.fields.values_mut() {
            f.selected = false;
        }
    }

    /// Collect the selected fields into an update and clear the selection.
    pub fn take_update(&mut self) -> StateUpdate {
        let fields = self
            .fields
            .iter()
            .filter(|(_, f)| f.selected)
            .map(|(name, f)| (name.clone(), f.value.clone()))
            .collect();
        self.unselect_all();
        StateUpdate { tag: self.tag.clone(), fields }
    }

    /// An update carrying every field, regardless of selection.
    pub fn full_update(&self) -> StateUpdate {
        let fields =
            self.fields.iter().map(|(name, f)| (name.clone(), f.value.clone())).collect();
        StateUpdate { tag: self.tag.clone(), fields }
    }

    /// Apply an incoming update.
    ///
    /// Every field is type-checked before any is written, so a rejected
    /// update leaves the object untouched. Selection is not changed.
    pub fn apply(&mut self, update: &StateUpdate) -> Result<(), StateError> {
        if update.tag != self.tag {
            return Err(StateError::Malformed {
                tag: self.tag.clone(),
                message: format!("update addressed to {}", update.tag),
            });
        }
        for (name, value) in &update.fields {
            self.check_kind(name, value)?;
        }
        for (name, value) in &update.fields {
            match self.fields.get_mut(name) {
                Some(existing) => existing.value = value.clone(),
                None => {
                    self.fields
                        .insert(name.clone(), Field { value: value.clone(), selected: false });
                }
            }
        }
        self.revision += 1;
        Ok(())
    }

    // ── Typed accessors ─────────────────────────────────────────────────

    pub fn int(&self, field: &str) -> Result<i64, StateError> {
        self.require(field)?.as_int().ok_or_else(|| self.mismatch(field, crate::ValueKind::Int))
    }

    pub fn str(&self, field: &str) -> Result<&str, StateError> {
        self.require(field)?.as_str().ok_or_else(|| self.mismatch(field, crate::ValueKind::Str))
    }

    pub fn list(&self, field: &str) -> Result<&[Value], StateError> {
        self.require(field)?.as_list().ok_or_else(|| self.mismatch(field, crate::ValueKind::List))
    }

    fn require(&self, field: &str) -> Result<&Value, StateError> {
        self.get(field).ok_or_else(|| StateError::MissingField {
            tag: self.tag.clone(),
            field: field.to_string(),
        })
    }

    fn mismatch(&self, field: &str, expected: crate::ValueKind) -> StateError {
        let actual = self.get(field).map(Value::kind).unwrap_or(expected);
        StateError::TypeMismatch { tag: self.tag.clone(), field: field.to_string(), expected, actual }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
