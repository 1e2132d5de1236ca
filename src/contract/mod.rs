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

pub mod address;
pub mod context;
pub mod handler;

use std::fmt::Debug;
use std::str::FromStr;

use crate::contract::address::Addresser;
use crate::handler::{ApplyError, TransactionContext};
use crate::identity::{Creator, IdentityResolver};
use crate::logging::{ContractLogger, InvocationLogger};

/// A contract whose invocations are dispatched on a function name and authorized by the
/// resolved identity of their creator.
///
/// Every SmartContract is also a ContractHandler. The handler resolves the creator, parses the
/// function name and then calls `apply`.
pub trait SmartContract: Send {
    /// The functions the contract exposes. Parsing an unknown name must fail with
    /// `ApplyError::InvalidFunction`.
    type Function: FromStr<Err = ApplyError> + Debug;
    type Addr: Addresser<String>;

    fn get_contract_name(&self) -> &str;

    fn get_addresser(&self) -> Self::Addr;

    fn get_logger(&self) -> &ContractLogger;

    fn get_identity_resolver(&self) -> &dyn IdentityResolver;

    fn apply(
        &self,
        function: Self::Function,
        args: &[String],
        creator: &Creator,
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Vec<u8>, ApplyError>;
}
