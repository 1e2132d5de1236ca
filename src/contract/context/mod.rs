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

mod error;

use std::marker::PhantomData;

pub use crate::contract::context::error::ContractContextError;

use crate::contract::address::Addresser;
use crate::handler::TransactionContext;
use crate::protocol::order::Order;
use crate::protocol::transport::Transport;
use crate::protocol::{FromBytes, IntoBytes};

/// A record stored whole under a key derived from its id.
pub trait Record: FromBytes<Self> + IntoBytes + Sized {
    fn record_id(&self) -> &str;
}

impl Record for Order {
    fn record_id(&self) -> &str {
        self.id()
    }
}

impl Record for Transport {
    fn record_id(&self) -> &str {
        self.id()
    }
}

/// RecordContext gives typed access to the records of one object type. Uses an implementation
/// of the Addresser trait to calculate the ledger keys of records in the internal transaction
/// context.
///
/// Records are always read and written whole; there is no partial update.
pub struct RecordContext<'a, A, R>
where
    A: Addresser<String>,
{
    context: &'a dyn TransactionContext,
    addresser: A,
    // PhantomData<R> ties the context to a single record type, which is not otherwise stored.
    _record: PhantomData<R>,
}

impl<'a, A, R> RecordContext<'a, A, R>
where
    A: Addresser<String>,
    R: Record,
{
    pub fn new(context: &'a dyn TransactionContext, addresser: A) -> RecordContext<'a, A, R> {
        RecordContext {
            context,
            addresser,
            _record: PhantomData,
        }
    }

    /// Returns the stored bytes of the record with the given id, or `None` if it is absent.
    ///
    /// An empty value is treated the same as an absent one.
    ///
    /// # Arguments
    ///
    /// * `id` - The id of the record to fetch
    pub fn get_raw(&self, id: &str) -> Result<Option<Vec<u8>>, ContractContextError> {
        let key = self.addresser.compute(&id.to_string())?;
        Ok(self
            .context
            .get_state(&key)?
            .filter(|value| !value.is_empty()))
    }

    /// Returns the decoded record with the given id, or `None` if it is absent.
    ///
    /// # Arguments
    ///
    /// * `id` - The id of the record to fetch
    pub fn get_record(&self, id: &str) -> Result<Option<R>, ContractContextError> {
        match self.get_raw(id)? {
            Some(bytes) => Ok(Some(R::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Stores the given bytes as the record with the given id, replacing any previous value.
    ///
    /// # Arguments
    ///
    /// * `id` - The id of the record to store
    /// * `bytes` - The serialized record
    pub fn set_raw(&self, id: &str, bytes: Vec<u8>) -> Result<(), ContractContextError> {
        let id = id.to_string();
        let key = self.addresser.compute(&id)?;
        trace!("Setting {}", self.addresser.normalize(&id));
        self.context.put_state(&key, bytes)?;
        Ok(())
    }

    /// Serializes the record and stores it under its id, replacing any previous value.
    pub fn set_record(&self, record: R) -> Result<(), ContractContextError> {
        let id = record.record_id().to_string();
        let bytes = record.into_bytes()?;
        self.set_raw(&id, bytes)
    }

    /// Decodes every record of this object type, in key order.
    ///
    /// The scan is aborted by the first record that fails to decode. The cursor is released
    /// either way.
    pub fn list_records(&self) -> Result<Vec<R>, ContractContextError> {
        let prefix = self.addresser.prefix()?;
        let cursor = self.context.get_state_by_prefix(&prefix)?;

        cursor
            .map(|entry| -> Result<R, ContractContextError> {
                let (_, value) = entry?;
                Ok(R::from_bytes(&value)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use std::time::Duration;

    use crate::contract::address::composite_key::CompositeKeyAddresser;
    use crate::handler::{ApplyError, ContextError, StateCursor};
    use crate::protocol::order::{OrderBuilder, OrderStatus};
    use crate::protocol::response::Response;

    /// Simple state backed by a BTreeMap, counting open cursors.
    struct TestContext {
        state: RefCell<BTreeMap<String, Vec<u8>>>,
        open_cursors: Rc<Cell<usize>>,
    }

    impl TestContext {
        fn new() -> Self {
            TestContext {
                state: RefCell::new(BTreeMap::new()),
                open_cursors: Rc::new(Cell::new(0)),
            }
        }
    }

    struct TestCursor {
        entries: std::vec::IntoIter<(String, Vec<u8>)>,
        open_cursors: Rc<Cell<usize>>,
    }

    impl Iterator for TestCursor {
        type Item = Result<(String, Vec<u8>), ContextError>;

        fn next(&mut self) -> Option<Self::Item> {
            self.entries.next().map(Ok)
        }
    }

    impl Drop for TestCursor {
        fn drop(&mut self) {
            self.open_cursors.set(self.open_cursors.get() - 1);
        }
    }

    impl TransactionContext for TestContext {
        fn get_creator(&self) -> Result<Vec<u8>, ContextError> {
            Ok(Vec::new())
        }

        fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, ContextError> {
            Ok(self.state.borrow().get(key).cloned())
        }

        fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), ContextError> {
            self.state.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }

        fn get_state_by_prefix(&self, prefix: &str) -> Result<StateCursor<'_>, ContextError> {
            let entries = self
                .state
                .borrow()
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Vec<_>>();
            self.open_cursors.set(self.open_cursors.get() + 1);
            Ok(Box::new(TestCursor {
                entries: entries.into_iter(),
                open_cursors: self.open_cursors.clone(),
            }))
        }

        fn invoke_contract(
            &self,
            _contract_name: &str,
            _args: &[Vec<u8>],
            _channel: &str,
            _timeout: Duration,
        ) -> Result<Response, ContextError> {
            Err(ContextError::InvokeError("not supported".into()))
        }
    }

    fn orders<'a>(context: &'a TestContext) -> RecordContext<'a, CompositeKeyAddresser, Order> {
        RecordContext::new(context, CompositeKeyAddresser::new("Order".into()))
    }

    fn order(id: &str, status: OrderStatus) -> Order {
        OrderBuilder::new()
            .with_id(id.into())
            .with_qty(1)
            .with_status(status)
            .build()
            .unwrap()
    }

    #[test]
    /// 1. Store a record and read it back decoded and raw
    /// 2. Overwrite it and verify only the second value remains
    fn test_set_and_get_record() {
        let context = TestContext::new();
        let records = orders(&context);

        records.set_record(order("O1", OrderStatus::Open)).unwrap();
        assert_eq!(
            records.get_record("O1").unwrap(),
            Some(order("O1", OrderStatus::Open))
        );

        records.set_record(order("O1", OrderStatus::Ready)).unwrap();
        assert_eq!(
            records.get_record("O1").unwrap().unwrap().status(),
            &OrderStatus::Ready
        );
        assert_eq!(context.state.borrow().len(), 1);
        assert!(context
            .state
            .borrow()
            .contains_key("\u{0}Order\u{0}O1\u{0}"));
    }

    #[test]
    /// Absent and empty values are both reported as missing.
    fn test_absent_and_empty() {
        let context = TestContext::new();
        let records = orders(&context);

        assert_eq!(records.get_raw("O1").unwrap(), None);
        records.set_raw("O1", Vec::new()).unwrap();
        assert_eq!(records.get_raw("O1").unwrap(), None);
        assert_eq!(records.get_record("O1").unwrap(), None);
    }

    #[test]
    /// A scan only sees records of its own object type and releases its cursor.
    fn test_list_records() {
        let context = TestContext::new();
        let records = orders(&context);
        records.set_record(order("O1", OrderStatus::Open)).unwrap();
        records.set_record(order("O2", OrderStatus::Ready)).unwrap();
        context
            .put_state("\u{0}Transport\u{0}T1\u{0}", b"{}".to_vec())
            .unwrap();

        let listed = records.list_records().unwrap();
        let ids: Vec<&str> = listed.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec!["O1", "O2"]);
        assert_eq!(context.open_cursors.get(), 0);
    }

    #[test]
    /// A record that fails to decode aborts the scan, and the cursor is still released.
    fn test_list_records_decode_failure() {
        let context = TestContext::new();
        let records = orders(&context);
        records.set_record(order("O1", OrderStatus::Open)).unwrap();
        records.set_raw("O2", b"not an order".to_vec()).unwrap();
        records.set_record(order("O3", OrderStatus::Open)).unwrap();

        match records.list_records() {
            Err(err @ ContractContextError::ProtocolError(_)) => match ApplyError::from(err) {
                ApplyError::DecodeError(_) => (),
                other => panic!("Expected decode error, got {:?}", other),
            },
            other => panic!("Expected protocol error, got {:?}", other),
        }
        assert_eq!(context.open_cursors.get(), 0);
    }

    #[test]
    fn test_invalid_id() {
        let context = TestContext::new();
        match orders(&context).get_raw("O\u{0}1") {
            Err(err @ ContractContextError::AddresserError(_)) => match ApplyError::from(err) {
                ApplyError::InvalidArguments(_) => (),
                other => panic!("Expected invalid arguments, got {:?}", other),
            },
            other => panic!("Expected addresser error, got {:?}", other),
        }
    }
}
