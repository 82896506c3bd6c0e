//! Savable model instances
//!
//! An `Instance` holds the attribute tree of one object as loaded from the
//! server, lets view models read and write attributes by dotted path, and
//! persists itself through an `InstanceBackend` supplied by the embedding
//! application.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::{ExError, ExErrorKind, GgrcError, Result};
use crate::{log_op_end, log_op_error, log_op_start};

/// Persistence collaborator for instances (the REST client)
#[async_trait]
pub trait InstanceBackend: Send + Sync {
    /// Persist `attrs`; the response body is merged back into the instance
    async fn save(&self, model: &str, attrs: Value) -> std::result::Result<Value, ExError>;

    /// Fetch the current server copy of the instance
    async fn refresh(&self, model: &str, id: Option<i64>)
        -> std::result::Result<Value, ExError>;
}

/// Model-level facts about an instance's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelClass {
    pub name: String,
    /// Changes to proposable models go through proposals, not direct edits
    pub is_proposable: bool,
}

impl ModelClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_proposable: false,
        }
    }

    pub fn proposable(mut self, is_proposable: bool) -> Self {
        self.is_proposable = is_proposable;
        self
    }
}

/// Notification delivered to `on_change` listeners
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceEvent {
    Changed { path: String, value: Value },
    /// Named event raised by a view model, e.g. `refreshInstance`
    Dispatched(String),
}

type Listener = Arc<dyn Fn(&InstanceEvent) + Send + Sync>;

pub struct Instance {
    class: ModelClass,
    attrs: Mutex<Value>,
    listeners: Mutex<Vec<Listener>>,
    backend: Arc<dyn InstanceBackend>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(GgrcError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        });
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(GgrcError::InvalidPath {
            path: path.to_string(),
            reason: "empty path segment".to_string(),
        });
    }
    Ok(segments)
}

impl Instance {
    /// Create an instance from an attribute object
    ///
    /// Non-object `attrs` are replaced by an empty object.
    pub fn new(class: ModelClass, attrs: Value, backend: Arc<dyn InstanceBackend>) -> Self {
        let attrs = if attrs.is_object() {
            attrs
        } else {
            Value::Object(Map::new())
        };
        Self {
            class,
            attrs: Mutex::new(attrs),
            listeners: Mutex::new(Vec::new()),
            backend,
        }
    }

    pub fn class(&self) -> &ModelClass {
        &self.class
    }

    pub fn id(&self) -> Option<i64> {
        lock(&self.attrs).get("id").and_then(Value::as_i64)
    }

    /// Read an attribute by dotted path (`issue_tracker.component_id`)
    ///
    /// Numeric segments index into arrays. Returns `None` for missing
    /// attributes and malformed paths alike.
    pub fn get(&self, path: &str) -> Option<Value> {
        let segments = split_path(path).ok()?;
        let attrs = lock(&self.attrs);
        let mut current = &*attrs;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Whole attribute tree
    pub fn attrs(&self) -> Value {
        lock(&self.attrs).clone()
    }

    /// Write an attribute by dotted path, creating intermediate objects
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for empty segments and `NotAnObject` when an
    /// intermediate attribute exists but is not an object.
    pub fn set(&self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path)?;
        {
            let mut attrs = lock(&self.attrs);
            let (last, parents) = segments
                .split_last()
                .ok_or_else(|| GgrcError::Internal {
                    message: "split_path returned no segments".to_string(),
                })?;

            let mut current = &mut *attrs;
            for (depth, segment) in parents.iter().enumerate() {
                let map = current.as_object_mut().ok_or_else(|| GgrcError::NotAnObject {
                    path: segments[..depth].join("."),
                })?;
                current = map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
            }
            let map = current.as_object_mut().ok_or_else(|| GgrcError::NotAnObject {
                path: parents.join("."),
            })?;
            map.insert(last.to_string(), value.clone());
        }

        self.notify(&InstanceEvent::Changed {
            path: path.to_string(),
            value,
        });
        Ok(())
    }

    /// Register a change listener
    ///
    /// Listeners run synchronously on the writing thread, after the
    /// attribute lock is released, so they may read or write the instance.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&InstanceEvent) + Send + Sync + 'static,
    {
        lock(&self.listeners).push(Arc::new(listener));
    }

    pub fn dispatch(&self, name: &str) {
        self.notify(&InstanceEvent::Dispatched(name.to_string()));
    }

    fn notify(&self, event: &InstanceEvent) {
        let listeners: Vec<Listener> = lock(&self.listeners).clone();
        for listener in listeners {
            listener(event);
        }
    }

    fn merge_response(&self, response: &Value) {
        let Some(fields) = response.as_object() else {
            return;
        };
        let mut changed = Vec::new();
        {
            let mut attrs = lock(&self.attrs);
            let Some(map) = attrs.as_object_mut() else {
                return;
            };
            for (key, value) in fields {
                if map.get(key) != Some(value) {
                    map.insert(key.clone(), value.clone());
                    changed.push((key.clone(), value.clone()));
                }
            }
        }
        for (path, value) in changed {
            self.notify(&InstanceEvent::Changed { path, value });
        }
    }

    /// Persist the current attributes
    ///
    /// On success the response object is merged into the attributes.
    ///
    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn save(&self) -> std::result::Result<Value, ExError> {
        let started = Instant::now();
        log_op_start!("instance_save", model_type = %self.class.name);

        let result = self.backend.save(&self.class.name, self.attrs()).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(response) => {
                self.merge_response(response);
                log_op_end!("instance_save", duration_ms = duration_ms, model_type = %self.class.name);
            }
            Err(err) => {
                log_op_error!("instance_save", err.clone(), duration_ms = duration_ms, model_type = %self.class.name);
            }
        }
        result
    }

    /// Replace the attributes with the server's current copy
    ///
    /// # Errors
    ///
    /// Returns `RefreshFailed` wrapping the backend error, or when the
    /// response is not an object.
    pub async fn refresh(&self) -> std::result::Result<(), ExError> {
        let started = Instant::now();
        log_op_start!("instance_refresh", model_type = %self.class.name);

        let result = match self.backend.refresh(&self.class.name, self.id()).await {
            Ok(fresh) if fresh.is_object() => {
                let previous = std::mem::replace(&mut *lock(&self.attrs), fresh.clone());
                for (path, value) in changed_keys(&previous, &fresh) {
                    self.notify(&InstanceEvent::Changed { path, value });
                }
                Ok(())
            }
            Ok(_) => Err(ExError::new(ExErrorKind::RefreshFailed)
                .with_op("instance_refresh")
                .with_message("refresh response is not an object")),
            Err(source) => Err(ExError::new(ExErrorKind::RefreshFailed)
                .with_op("instance_refresh")
                .with_message(source.message().to_string())
                .with_source(source)),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!("instance_refresh", duration_ms = duration_ms);
            }
            Err(err) => {
                log_op_error!("instance_refresh", err.clone(), duration_ms = duration_ms);
            }
        }
        result
    }
}

/// Top-level keys whose value differs between two attribute objects
///
/// Keys missing from `after` are reported with `Value::Null`.
fn changed_keys(before: &Value, after: &Value) -> Vec<(String, Value)> {
    let empty = Map::new();
    let before = before.as_object().unwrap_or(&empty);
    let after = after.as_object().unwrap_or(&empty);

    let mut changed: Vec<(String, Value)> = after
        .iter()
        .filter(|(key, value)| before.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    changed.extend(
        before
            .keys()
            .filter(|key| !after.contains_key(*key))
            .map(|key| (key.clone(), Value::Null)),
    );
    changed
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class)
            .field("attrs", &*lock(&self.attrs))
            .finish_non_exhaustive()
    }
}
