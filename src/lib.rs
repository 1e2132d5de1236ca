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

//! Order and transport contracts for a permissioned supply-chain ledger.
//!
//! The contracts hold no state of their own. Every invocation is handed a
//! [`TransactionContext`](handler::TransactionContext) by the ledger host, which provides
//! reads and writes against versioned state, prefix scans and calls into other contracts.

pub mod contract;
pub mod families;
pub mod handler;
pub mod identity;
#[cfg(feature = "memory-ledger")]
pub mod ledger;
pub mod logging;
pub mod protocol;

#[macro_use]
extern crate log;
