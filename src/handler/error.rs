/*
 * Copyright 2017 Bitwise IO, Inc.
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
use std::error::Error;

use crate::protocol::response::Response;
use crate::protocol::{ProtocolBuildError, ProtocolError};

/// Message returned for any function a contract does not recognize.
pub const INVALID_FUNCTION_MESSAGE: &str = "Invalid invoke function name.";

#[derive(Debug)]
pub enum ApplyError {
    /// Returned when the caller's organization may not perform the operation.
    AuthorizationError(String),
    /// Returned when the wrong number of arguments was supplied.
    InvalidArguments(String),
    /// Returned for a function name the contract does not recognize.
    InvalidFunction(String),
    /// Returned when a record may not move to the requested status.
    InvalidTransition(String),
    /// Returned when supplied or stored bytes do not match the expected record.
    DecodeError(String),
    /// Returned when no record exists for the requested key.
    NotFound(String),
    /// Returned when a call into another contract did not succeed.
    DownstreamError(String),
    /// Returned when an internal error occurs during transaction processing.
    InternalError(String),
}

impl ApplyError {
    /// The response status reported to the caller. Mistakes made by the caller are kept apart
    /// from failures inside the ledger or the contract.
    pub fn status(&self) -> i32 {
        match *self {
            ApplyError::AuthorizationError(_)
            | ApplyError::InvalidArguments(_)
            | ApplyError::InvalidFunction(_)
            | ApplyError::InvalidTransition(_) => Response::FORBIDDEN,
            ApplyError::NotFound(_) => Response::NOT_FOUND,
            ApplyError::DecodeError(_)
            | ApplyError::DownstreamError(_)
            | ApplyError::InternalError(_) => Response::ERROR,
        }
    }

    pub fn is_caller_error(&self) -> bool {
        self.status() == Response::FORBIDDEN
    }

    fn message(&self) -> String {
        match *self {
            ApplyError::InvalidFunction(_) => INVALID_FUNCTION_MESSAGE.to_string(),
            ApplyError::AuthorizationError(ref s)
            | ApplyError::InvalidArguments(ref s)
            | ApplyError::InvalidTransition(ref s)
            | ApplyError::DecodeError(ref s)
            | ApplyError::NotFound(ref s)
            | ApplyError::DownstreamError(ref s)
            | ApplyError::InternalError(ref s) => s.clone(),
        }
    }
}

impl Error for ApplyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ApplyError::AuthorizationError(ref s) => write!(f, "AuthorizationError: {}", s),
            ApplyError::InvalidArguments(ref s) => write!(f, "InvalidArguments: {}", s),
            ApplyError::InvalidFunction(ref s) => {
                write!(f, "InvalidFunction: {} ({})", INVALID_FUNCTION_MESSAGE, s)
            }
            ApplyError::InvalidTransition(ref s) => write!(f, "InvalidTransition: {}", s),
            ApplyError::DecodeError(ref s) => write!(f, "DecodeError: {}", s),
            ApplyError::NotFound(ref s) => write!(f, "NotFound: {}", s),
            ApplyError::DownstreamError(ref s) => write!(f, "DownstreamError: {}", s),
            ApplyError::InternalError(ref s) => write!(f, "InternalError: {}", s),
        }
    }
}

impl From<ApplyError> for Response {
    fn from(err: ApplyError) -> Self {
        Response::error(err.status(), err.message())
    }
}

impl From<ProtocolError> for ApplyError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::DeserializationError(msg) => ApplyError::DecodeError(msg),
            ProtocolError::SerializationError(msg) => ApplyError::InternalError(msg),
        }
    }
}

impl From<ProtocolBuildError> for ApplyError {
    fn from(err: ProtocolBuildError) -> Self {
        ApplyError::InternalError(err.to_string())
    }
}

#[derive(Debug)]
pub enum ContextError {
    /// Returned when the invoking identity cannot be obtained from the host
    AuthorizationError(String),
    /// Returned when reading or scanning state fails
    StateReadError(String),
    /// Returned when a write is rejected by the host
    StateWriteError(String),
    /// Returned when the host cannot deliver a call to another contract
    InvokeError(String),
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ContextError::AuthorizationError(ref s) => write!(f, "AuthorizationError: {}", s),
            ContextError::StateReadError(ref s) => write!(f, "StateReadError: {}", s),
            ContextError::StateWriteError(ref s) => write!(f, "StateWriteError: {}", s),
            ContextError::InvokeError(ref s) => write!(f, "InvokeError: {}", s),
        }
    }
}

impl From<ContextError> for ApplyError {
    fn from(context_error: ContextError) -> Self {
        match context_error {
            ContextError::AuthorizationError(..) => {
                ApplyError::AuthorizationError(format!("{}", context_error))
            }
            ContextError::InvokeError(..) => {
                ApplyError::DownstreamError(format!("{}", context_error))
            }
            _ => ApplyError::InternalError(format!("{}", context_error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Caller mistakes are reported as 403, missing records as 404 and everything else as 500.
    fn test_status_classes() {
        assert_eq!(
            ApplyError::AuthorizationError("org".into()).status(),
            Response::FORBIDDEN
        );
        assert_eq!(
            ApplyError::InvalidArguments("count".into()).status(),
            Response::FORBIDDEN
        );
        assert_eq!(ApplyError::NotFound("O1".into()).status(), Response::NOT_FOUND);
        assert_eq!(ApplyError::DecodeError("bad".into()).status(), Response::ERROR);
        assert_eq!(
            ApplyError::DownstreamError("peer".into()).status(),
            Response::ERROR
        );
        assert!(ApplyError::InvalidFunction("remove".into()).is_caller_error());
        assert!(!ApplyError::InternalError("io".into()).is_caller_error());
    }

    #[test]
    fn test_invalid_function_response() {
        let response = Response::from(ApplyError::InvalidFunction("remove".into()));
        assert_eq!(response.status(), 403);
        assert_eq!(response.message(), "Invalid invoke function name.");
        assert!(response.payload().is_empty());
    }

    #[test]
    fn test_context_error_conversion() {
        match ApplyError::from(ContextError::InvokeError("timeout".into())) {
            ApplyError::DownstreamError(msg) => assert!(msg.contains("timeout")),
            other => panic!("Expected downstream error, got {:?}", other),
        }
        match ApplyError::from(ContextError::StateReadError("closed".into())) {
            ApplyError::InternalError(_) => (),
            other => panic!("Expected internal error, got {:?}", other),
        }
    }
}
