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

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Included, Unbounded};
use std::rc::Rc;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::handler::{
    execute, execute_init, ContextError, ContractHandler, StateCursor, TransactionContext,
};
use crate::ledger::error::LedgerError;
use crate::protocol::invocation::Invocation;
use crate::protocol::response::Response;

/// Version reported for a key that has never been written.
const ABSENT: u64 = 0;

/// A contract installed on a channel of a `Network`.
pub type InstalledContract = Arc<dyn ContractHandler + Sync>;

#[derive(Default)]
struct LedgerState {
    entries: BTreeMap<String, (u64, Vec<u8>)>,
    height: u64,
}

impl LedgerState {
    fn version(&self, key: &str) -> u64 {
        self.entries
            .get(key)
            .map(|(version, _)| *version)
            .unwrap_or(ABSENT)
    }

    /// Every entry whose key starts with `prefix`, in key order.
    fn scan(&self, prefix: &str) -> Vec<(String, u64, Vec<u8>)> {
        self.entries
            .range::<str, _>((Included(prefix), Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, (version, value))| (key.clone(), *version, value.clone()))
            .collect()
    }
}

/// The committed state of one channel.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger::default()
    }

    /// Returns the committed value at `key`.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self
            .read_state()?
            .entries
            .get(key)
            .map(|(_, value)| value.clone()))
    }

    /// Returns the number of commits that wrote at least one key.
    pub fn height(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.height)
    }

    /// Starts a transaction against this ledger. Calls to other contracts fail, since the ledger
    /// is not part of a `Network`.
    pub fn begin(&self, tx_id: &str, creator: Vec<u8>) -> MemoryTransactionContext {
        MemoryTransactionContext::new(self.clone(), None, None, tx_id, creator)
    }

    /// Runs the invocation and commits its writes if it succeeded.
    ///
    /// # Arguments
    ///
    /// * `handler` - the contract to invoke
    /// * `invocation` - function, arguments and transaction id
    /// * `creator` - the serialized identity of the submitter
    pub fn submit(
        &self,
        handler: &dyn ContractHandler,
        invocation: &Invocation,
        creator: &[u8],
    ) -> Result<Response, LedgerError> {
        let mut context = self.begin(invocation.tx_id(), creator.to_vec());
        let response = execute(handler, invocation, &mut context);
        if response.is_success() {
            context.commit()?;
        }
        Ok(response)
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.state
            .read()
            .map_err(|_| LedgerError::LockPoisoned("ledger state".into()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.state
            .write()
            .map_err(|_| LedgerError::LockPoisoned("ledger state".into()))
    }
}

struct RangeRead {
    prefix: String,
    observed: Vec<(String, u64)>,
}

/// A transaction in progress against a `MemoryLedger`.
///
/// Reads see committed state only; writes become visible when `commit` succeeds.
pub struct MemoryTransactionContext {
    ledger: MemoryLedger,
    channel: Option<String>,
    network: Option<Network>,
    tx_id: String,
    creator: Vec<u8>,
    reads: RefCell<HashMap<String, u64>>,
    range_reads: RefCell<Vec<RangeRead>>,
    writes: RefCell<BTreeMap<String, Vec<u8>>>,
    open_cursors: Rc<Cell<usize>>,
}

impl MemoryTransactionContext {
    fn new(
        ledger: MemoryLedger,
        channel: Option<String>,
        network: Option<Network>,
        tx_id: &str,
        creator: Vec<u8>,
    ) -> Self {
        MemoryTransactionContext {
            ledger,
            channel,
            network,
            tx_id: tx_id.to_string(),
            creator,
            reads: RefCell::new(HashMap::new()),
            range_reads: RefCell::new(Vec::new()),
            writes: RefCell::new(BTreeMap::new()),
            open_cursors: Rc::new(Cell::new(0)),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Number of cursors returned by `get_state_by_prefix` that have not been dropped.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.get()
    }

    /// The writes that `commit` would apply.
    pub fn pending_writes(&self) -> BTreeMap<String, Vec<u8>> {
        self.writes.borrow().clone()
    }

    /// Validates the read set against the committed state and applies the buffered writes.
    ///
    /// Fails with `LedgerError::MvccConflict` if any key that was read, or any key under a
    /// scanned prefix, has changed since; nothing is applied in that case.
    pub fn commit(self) -> Result<(), LedgerError> {
        let mut state = self.ledger.write_state()?;

        for (key, version) in self.reads.borrow().iter() {
            if state.version(key) != *version {
                return Err(LedgerError::MvccConflict(key.clone()));
            }
        }
        for range in self.range_reads.borrow().iter() {
            let current: Vec<(String, u64)> = state
                .scan(&range.prefix)
                .into_iter()
                .map(|(key, version, _)| (key, version))
                .collect();
            if current != range.observed {
                return Err(LedgerError::MvccConflict(range.prefix.clone()));
            }
        }

        let writes = self.writes.into_inner();
        if writes.is_empty() {
            return Ok(());
        }
        state.height += 1;
        let version = state.height;
        for (key, value) in writes {
            state.entries.insert(key, (version, value));
        }
        debug!("tx {} committed at height {}", self.tx_id, version);
        Ok(())
    }

    /// Folds the reads and writes of a call made on the same channel into this transaction.
    fn absorb(&self, other: MemoryTransactionContext) {
        let mut reads = self.reads.borrow_mut();
        for (key, version) in other.reads.into_inner() {
            reads.entry(key).or_insert(version);
        }
        self.range_reads
            .borrow_mut()
            .extend(other.range_reads.into_inner());
        self.writes.borrow_mut().extend(other.writes.into_inner());
    }

    fn read_error(err: LedgerError) -> ContextError {
        ContextError::StateReadError(err.to_string())
    }
}

struct MemoryCursor {
    entries: std::vec::IntoIter<(String, Vec<u8>)>,
    open_cursors: Rc<Cell<usize>>,
}

impl Iterator for MemoryCursor {
    type Item = Result<(String, Vec<u8>), ContextError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(Ok)
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.open_cursors.set(self.open_cursors.get() - 1);
    }
}

impl TransactionContext for MemoryTransactionContext {
    fn get_creator(&self) -> Result<Vec<u8>, ContextError> {
        Ok(self.creator.clone())
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, ContextError> {
        let state = self.ledger.read_state().map_err(Self::read_error)?;
        self.reads
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(|| state.version(key));
        Ok(state.entries.get(key).map(|(_, value)| value.clone()))
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), ContextError> {
        if key.is_empty() {
            return Err(ContextError::StateWriteError("key must not be empty".into()));
        }
        self.writes.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_prefix(&self, prefix: &str) -> Result<StateCursor<'_>, ContextError> {
        let scanned = self
            .ledger
            .read_state()
            .map_err(Self::read_error)?
            .scan(prefix);

        let mut observed = Vec::with_capacity(scanned.len());
        let mut entries = Vec::with_capacity(scanned.len());
        for (key, version, value) in scanned {
            observed.push((key.clone(), version));
            entries.push((key, value));
        }
        self.range_reads.borrow_mut().push(RangeRead {
            prefix: prefix.to_string(),
            observed,
        });

        self.open_cursors.set(self.open_cursors.get() + 1);
        Ok(Box::new(MemoryCursor {
            entries: entries.into_iter(),
            open_cursors: self.open_cursors.clone(),
        }))
    }

    fn invoke_contract(
        &self,
        contract_name: &str,
        args: &[Vec<u8>],
        channel: &str,
        timeout: Duration,
    ) -> Result<Response, ContextError> {
        let network = self.network.as_ref().ok_or_else(|| {
            ContextError::InvokeError("ledger is not attached to a network".into())
        })?;
        let started = Instant::now();

        let (ledger, handler) = network
            .lookup(channel, contract_name)
            .map_err(|err| ContextError::InvokeError(err.to_string()))?;
        let invocation = Invocation::from_raw_args(&self.tx_id, args)
            .map_err(|err| ContextError::InvokeError(err.to_string()))?;

        let mut callee = MemoryTransactionContext::new(
            ledger,
            Some(channel.to_string()),
            Some(network.clone()),
            &self.tx_id,
            self.creator.clone(),
        );
        let response = execute(handler.as_ref(), &invocation, &mut callee);

        if started.elapsed() > timeout {
            return Err(ContextError::InvokeError(format!(
                "{} on {} did not respond within {:?}",
                contract_name, channel, timeout
            )));
        }
        // writes made on another channel are never committed
        if response.is_success() && self.channel.as_deref() == Some(channel) {
            self.absorb(callee);
        }
        Ok(response)
    }
}

#[derive(Default)]
struct NetworkState {
    ledgers: HashMap<String, MemoryLedger>,
    contracts: HashMap<(String, String), InstalledContract>,
}

/// Ledgers by channel name, and the contracts installed on each.
#[derive(Clone, Default)]
pub struct Network {
    state: Arc<RwLock<NetworkState>>,
}

impl Network {
    pub fn new() -> Self {
        Network::default()
    }

    /// Returns the ledger of `channel`, creating an empty one if needed.
    pub fn ledger(&self, channel: &str) -> Result<MemoryLedger, LedgerError> {
        let mut state = self.write_state()?;
        Ok(state
            .ledgers
            .entry(channel.to_string())
            .or_insert_with(MemoryLedger::new)
            .clone())
    }

    /// Installs a contract on `channel` under its contract name, replacing any previous one.
    pub fn install(&self, channel: &str, handler: InstalledContract) -> Result<(), LedgerError> {
        let mut state = self.write_state()?;
        state
            .ledgers
            .entry(channel.to_string())
            .or_insert_with(MemoryLedger::new);
        state.contracts.insert(
            (channel.to_string(), handler.contract_name().to_string()),
            handler,
        );
        Ok(())
    }

    /// Installs a contract and runs its `init`, committing the result if it succeeded.
    pub fn instantiate(
        &self,
        channel: &str,
        handler: InstalledContract,
        invocation: &Invocation,
        creator: &[u8],
    ) -> Result<Response, LedgerError> {
        self.install(channel, handler.clone())?;
        let mut context = self.begin(channel, invocation.tx_id(), creator.to_vec())?;
        let response = execute_init(handler.as_ref(), invocation, &mut context);
        if response.is_success() {
            context.commit()?;
        }
        Ok(response)
    }

    /// Starts a transaction on `channel` that may call contracts installed on this network.
    pub fn begin(
        &self,
        channel: &str,
        tx_id: &str,
        creator: Vec<u8>,
    ) -> Result<MemoryTransactionContext, LedgerError> {
        Ok(MemoryTransactionContext::new(
            self.ledger(channel)?,
            Some(channel.to_string()),
            Some(self.clone()),
            tx_id,
            creator,
        ))
    }

    /// Runs the invocation against a contract installed on `channel` and commits its writes if
    /// it succeeded.
    pub fn submit(
        &self,
        channel: &str,
        contract_name: &str,
        invocation: &Invocation,
        creator: &[u8],
    ) -> Result<Response, LedgerError> {
        let (_, handler) = self.lookup(channel, contract_name)?;
        let mut context = self.begin(channel, invocation.tx_id(), creator.to_vec())?;
        let response = execute(handler.as_ref(), invocation, &mut context);
        if response.is_success() {
            context.commit()?;
        }
        Ok(response)
    }

    /// Runs the invocation and discards its writes.
    pub fn evaluate(
        &self,
        channel: &str,
        contract_name: &str,
        invocation: &Invocation,
        creator: &[u8],
    ) -> Result<Response, LedgerError> {
        let (_, handler) = self.lookup(channel, contract_name)?;
        let mut context = self.begin(channel, invocation.tx_id(), creator.to_vec())?;
        Ok(execute(handler.as_ref(), invocation, &mut context))
    }

    fn lookup(
        &self,
        channel: &str,
        contract_name: &str,
    ) -> Result<(MemoryLedger, InstalledContract), LedgerError> {
        let state = self
            .state
            .read()
            .map_err(|_| LedgerError::LockPoisoned("network".into()))?;
        let handler = state
            .contracts
            .get(&(channel.to_string(), contract_name.to_string()))
            .cloned()
            .ok_or_else(|| {
                LedgerError::ContractNotFound(format!("{} on {}", contract_name, channel))
            })?;
        let ledger = state.ledgers.get(channel).cloned().ok_or_else(|| {
            LedgerError::ContractNotFound(format!("{} on {}", contract_name, channel))
        })?;
        Ok((ledger, handler))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, NetworkState>, LedgerError> {
        self.state
            .write()
            .map_err(|_| LedgerError::LockPoisoned("network".into()))
    }
}
