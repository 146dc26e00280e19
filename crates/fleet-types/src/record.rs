//! Service records kept verbatim alongside their typed view
//!
//! The typed structs drive filtering and display. Anything written back out
//! uses the JSON exactly as the service sent it, so explicit nulls, timestamp
//! precision and fields this crate does not model all survive.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Borrow;
use std::ops::Deref;

/// A typed record plus the raw document it was decoded from
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    data: T,
    raw: Value,
}

impl<T: DeserializeOwned> Record<T> {
    /// Decode `raw`, keeping it for later output
    pub fn from_value(raw: Value) -> serde_json::Result<Self> {
        let data = T::deserialize(&raw)?;
        Ok(Self { data, raw })
    }
}

impl<T> Record<T> {
    /// Document as received
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> Borrow<T> for Record<T> {
    fn borrow(&self) -> &T {
        &self.data
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Record<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(raw).map_err(D::Error::custom)
    }
}

impl<T> Serialize for Record<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}
