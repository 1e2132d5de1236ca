// Copyright 2019 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error as StdError;

use crate::contract::address::AddresserError;
use crate::handler::{ApplyError, ContextError};
use crate::protocol::ProtocolError;

#[derive(Debug)]
pub enum ContractContextError {
    AddresserError(AddresserError),
    ProtocolError(ProtocolError),
    TransactionContextError(ContextError),
}

impl StdError for ContractContextError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            ContractContextError::AddresserError(ref err) => Some(err),
            ContractContextError::ProtocolError(ref err) => Some(err),
            ContractContextError::TransactionContextError(ref err) => Some(err),
        }
    }
}

impl std::fmt::Display for ContractContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ContractContextError::AddresserError(ref err) => {
                write!(f, "Error occurred while computing a key: {}", err)
            }
            ContractContextError::ProtocolError(ref err) => {
                write!(f, "Error occurred while converting a record: {}", err)
            }
            ContractContextError::TransactionContextError(ref err) => {
                write!(f, "Error occurred in TransactionContext method: {}", err)
            }
        }
    }
}

impl From<ProtocolError> for ContractContextError {
    fn from(e: ProtocolError) -> Self {
        ContractContextError::ProtocolError(e)
    }
}

impl From<AddresserError> for ContractContextError {
    fn from(e: AddresserError) -> Self {
        ContractContextError::AddresserError(e)
    }
}

impl From<ContextError> for ContractContextError {
    fn from(e: ContextError) -> Self {
        ContractContextError::TransactionContextError(e)
    }
}

impl From<ContractContextError> for ApplyError {
    fn from(err: ContractContextError) -> Self {
        match err {
            // only ids supplied by the caller are turned into keys
            ContractContextError::AddresserError(err) => {
                ApplyError::InvalidArguments(err.to_string())
            }
            ContractContextError::ProtocolError(err) => ApplyError::from(err),
            ContractContextError::TransactionContextError(err) => ApplyError::from(err),
        }
    }
}
