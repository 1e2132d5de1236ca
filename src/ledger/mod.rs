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

//! An in-memory ledger host.
//!
//! `MemoryLedger` keeps the committed state of one channel in a BTreeMap, each key carrying the
//! version of the commit that last wrote it. A transaction reads committed state only, buffers
//! its writes and records the version of everything it read. Committing validates those
//! versions; if another transaction has committed a newer version of any key that was read, the
//! commit fails and nothing is applied.
//!
//! A `Network` groups ledgers by channel name and the contracts installed on them, so that
//! contracts can call each other with `invoke_contract`.

mod error;
mod memory;

pub use crate::ledger::error::LedgerError;
pub use crate::ledger::memory::{InstalledContract, MemoryLedger, MemoryTransactionContext, Network};
