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

//! Traits for handling the execution of a contract invocation.
//!
//! The ContractHandler trait is the interface the ledger host drives. Handlers must be stateless
//! and deterministic. They are provided, along with the invocation itself, a TransactionContext
//! implementation which gives access to the invoking identity, to reading and writing state, and
//! to calling other contracts.

mod error;

use std::time::Duration;

pub use crate::handler::error::{ApplyError, ContextError, INVALID_FUNCTION_MESSAGE};
use crate::protocol::invocation::Invocation;
use crate::protocol::response::Response;

/// An iterator over `(key, value)` pairs returned by a prefix scan.
///
/// The host resources behind a cursor are released when it is dropped.
pub type StateCursor<'a> = Box<dyn Iterator<Item = Result<(String, Vec<u8>), ContextError>> + 'a>;

pub trait TransactionContext {
    /// get_creator returns the serialized identity of the party that submitted the invocation.
    fn get_creator(&self) -> Result<Vec<u8>, ContextError>;

    /// get_state queries the ledger for the value stored at the given key. Returns `None` if the
    /// key is not set.
    ///
    /// # Arguments
    ///
    /// * `key` - the composite key to fetch
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, ContextError>;

    /// put_state requests that the given key be set to the provided value when the transaction
    /// commits.
    ///
    /// # Arguments
    ///
    /// * `key` - the composite key to write
    /// * `value` - the data to store at the key
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), ContextError>;

    /// get_state_by_prefix opens a cursor over every entry whose key starts with `prefix`, in
    /// key order.
    ///
    /// # Arguments
    ///
    /// * `prefix` - a partial composite key
    fn get_state_by_prefix(&self, prefix: &str) -> Result<StateCursor<'_>, ContextError>;

    /// invoke_contract calls a function of another contract and blocks until it responds or
    /// `timeout` elapses.
    ///
    /// # Arguments
    ///
    /// * `contract_name` - name of the contract to call
    /// * `args` - function name followed by its arguments
    /// * `channel` - the ledger the target contract runs on
    /// * `timeout` - how long the host may wait for the response
    fn invoke_contract(
        &self,
        contract_name: &str,
        args: &[Vec<u8>],
        channel: &str,
        timeout: Duration,
    ) -> Result<Response, ContextError>;
}

pub trait ContractHandler: Send {
    /// contract_name should return the name the contract is installed under, e.g. "order"
    fn contract_name(&self) -> &str;

    /// init is called once when the contract is instantiated.
    fn init(
        &self,
        _invocation: &Invocation,
        _context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        Ok(Vec::new())
    }

    /// invoke is the single method where all the business logic of a contract is defined. The
    /// returned bytes become the payload of a successful response.
    fn invoke(
        &self,
        invocation: &Invocation,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError>;
}

/// Runs an invocation against a handler and converts the outcome into a response.
///
/// Failures caused by the caller are logged at debug level, all others at warn.
pub fn execute(
    handler: &dyn ContractHandler,
    invocation: &Invocation,
    context: &mut dyn TransactionContext,
) -> Response {
    match handler.invoke(invocation, context) {
        Ok(payload) => Response::success(payload),
        Err(err) => {
            let level = if err.is_caller_error() {
                log::Level::Debug
            } else {
                log::Level::Warn
            };
            log!(
                level,
                "{} {} failed in tx {}: {}",
                handler.contract_name(),
                invocation.function(),
                invocation.tx_id(),
                err
            );
            Response::from(err)
        }
    }
}

/// Runs a handler's `init` and converts the outcome into a response.
pub fn execute_init(
    handler: &dyn ContractHandler,
    invocation: &Invocation,
    context: &mut dyn TransactionContext,
) -> Response {
    match handler.init(invocation, context) {
        Ok(payload) => Response::success(payload),
        Err(err) => Response::from(err),
    }
}
