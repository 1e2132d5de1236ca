/*
 * Copyright 2019 Cargill Incorporated
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 * -----------------------------------------------------------------------------
 */

//! Native types exchanged with the ledger host and stored in state.
//!
//! Records are stored as flat JSON objects whose field names match the ones the rest of the
//! network already reads (`id`, `price`, `qty`, `status`, `statuses`, ...).

pub mod invocation;
pub mod order;
pub mod response;
pub mod transport;

use std::error::Error as StdError;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug)]
pub enum ProtocolError {
    /// Returned when bytes do not match the expected record structure.
    DeserializationError(String),
    /// Returned when a native value cannot be written out.
    SerializationError(String),
}

impl StdError for ProtocolError {}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ProtocolError::DeserializationError(ref s) => {
                write!(f, "DeserializationError: {}", s)
            }
            ProtocolError::SerializationError(ref s) => write!(f, "SerializationError: {}", s),
        }
    }
}

#[derive(Debug)]
pub enum ProtocolBuildError {
    MissingField(String),
}

impl StdError for ProtocolBuildError {}

impl std::fmt::Display for ProtocolBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ProtocolBuildError::MissingField(ref s) => write!(f, "'{}' field is required", s),
        }
    }
}

/// Decodes a native type from its stored byte form.
pub trait FromBytes<T> {
    fn from_bytes(bytes: &[u8]) -> Result<T, ProtocolError>;
}

/// Encodes a native type into its stored byte form.
pub trait IntoBytes: Sized {
    fn into_bytes(self) -> Result<Vec<u8>, ProtocolError>;
}

pub(crate) fn from_json<T: DeserializeOwned>(
    bytes: &[u8],
    type_name: &str,
) -> Result<T, ProtocolError> {
    serde_json::from_slice(bytes).map_err(|err| {
        ProtocolError::DeserializationError(format!(
            "Unable to get {} from bytes: {}",
            type_name, err
        ))
    })
}

pub(crate) fn to_json<T: Serialize>(value: &T, type_name: &str) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(value).map_err(|err| {
        ProtocolError::SerializationError(format!(
            "Unable to get bytes from {}: {}",
            type_name, err
        ))
    })
}

// Records written by other clients may carry `null` where a field was never set. It decodes
// the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
