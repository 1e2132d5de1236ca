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

use std::error::Error;

#[derive(Debug, PartialEq)]
pub enum LedgerError {
    /// Returned when a key read by the transaction was changed by a later commit
    MvccConflict(String),
    /// Returned when no contract of the given name is installed on the channel
    ContractNotFound(String),
    /// Returned when a lock guarding ledger state was poisoned
    LockPoisoned(String),
}

impl Error for LedgerError {}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            LedgerError::MvccConflict(ref key) => {
                write!(f, "MvccConflict: {:?} was modified after it was read", key)
            }
            LedgerError::ContractNotFound(ref s) => write!(f, "ContractNotFound: {}", s),
            LedgerError::LockPoisoned(ref s) => write!(f, "LockPoisoned: {}", s),
        }
    }
}
