use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Result, StoreError};

/// A record that can live in an item store.
///
/// Items are stored as JSON objects. The key attribute and the creation
/// timestamp attribute are owned by the store: they are fixed at insert time
/// and cannot be changed through an [`Update`].
pub trait Item: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the primary-key attribute.
    const KEY_ATTRIBUTE: &'static str;

    /// Name of the creation timestamp attribute.
    const CREATED_AT_ATTRIBUTE: &'static str = "created_at";

    /// Returns the primary key.
    fn key(&self) -> &str;

    /// Returns the creation timestamp, if one has been set.
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Sets the creation timestamp.
    fn set_created_at(&mut self, at: DateTime<Utc>);
}

/// A set of attributes to overwrite on an existing item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    attributes: Map<String, Value>,
}

impl Update {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets an attribute only when a value is given.
    pub fn set_if_some(self, name: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns the attributes to write.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub(crate) fn into_value(self) -> Value {
        Value::Object(self.attributes)
    }
}

/// Rejects keys no backend call should ever be made with.
pub(crate) fn require_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidInput("key must not be empty".to_string()));
    }
    Ok(())
}

/// Checks an update against the attributes the store owns.
pub(crate) fn validate_update<I: Item>(update: &Update) -> Result<()> {
    if update.is_empty() {
        return Err(StoreError::InvalidInput(
            "update requires at least one attribute".to_string(),
        ));
    }
    for owned in [I::KEY_ATTRIBUTE, I::CREATED_AT_ATTRIBUTE] {
        if update.attributes().contains_key(owned) {
            return Err(StoreError::InvalidInput(format!(
                "attribute '{owned}' cannot be updated"
            )));
        }
    }
    Ok(())
}

/// Stamps the creation time on an item that has none.
///
/// Called by backends immediately before the conditional insert.
pub(crate) fn stamp_created_at<I: Item>(item: &mut I) {
    if item.created_at().is_none() {
        item.set_created_at(Utc::now());
    }
}

/// Overwrites the updated attributes in a stored JSON object.
pub(crate) fn merge_attributes(value: &mut Value, update: &Update) -> Result<()> {
    let Some(fields) = value.as_object_mut() else {
        return Err(StoreError::InvalidInput(
            "items must serialize to JSON objects".to_string(),
        ));
    };
    for (name, attribute) in update.attributes() {
        fields.insert(name.clone(), attribute.clone());
    }
    Ok(())
}

/// Applies an update to an item through its JSON form.
///
/// Fails without side effects if the result no longer decodes as `I`.
pub(crate) fn apply_update<I: Item>(item: &I, update: &Update) -> Result<I> {
    let mut value = serde_json::to_value(item)?;
    merge_attributes(&mut value, update)?;
    Ok(serde_json::from_value(value)?)
}
