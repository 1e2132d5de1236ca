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

pub mod order;
pub mod transport;

use crate::handler::ApplyError;

/// Returns the only argument, or `InvalidArguments` with the given message.
pub(crate) fn single_arg<'a>(args: &'a [String], message: &str) -> Result<&'a str, ApplyError> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(ApplyError::InvalidArguments(message.to_string())),
    }
}

/// Returns the first argument, or `InvalidArguments` with the given message. Any further
/// arguments are ignored.
pub(crate) fn first_arg<'a>(args: &'a [String], message: &str) -> Result<&'a str, ApplyError> {
    args.first()
        .map(String::as_str)
        .ok_or_else(|| ApplyError::InvalidArguments(message.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, VecDeque};
    use std::time::Duration;

    use crate::handler::{ContextError, StateCursor, TransactionContext};
    use crate::identity::{Creator, IdentityError, IdentityResolver};
    use crate::protocol::invocation::{Invocation, InvocationBuilder};
    use crate::protocol::response::Response;

    /// A call made through `invoke_contract`: contract, args and channel.
    pub(crate) type RecordedInvoke = (String, Vec<String>, String);

    /// State backed by a BTreeMap. Calls to other contracts are answered from a queue.
    #[derive(Default)]
    pub(crate) struct TestContext {
        pub(crate) state: RefCell<BTreeMap<String, Vec<u8>>>,
        pub(crate) invokes: RefCell<Vec<RecordedInvoke>>,
        responses: RefCell<VecDeque<Result<Response, ContextError>>>,
    }

    impl TestContext {
        pub(crate) fn new() -> Self {
            TestContext::default()
        }

        /// Queues the outcome of the next call to another contract.
        pub(crate) fn respond(&self, response: Result<Response, ContextError>) {
            self.responses.borrow_mut().push_back(response);
        }
    }

    impl TransactionContext for TestContext {
        fn get_creator(&self) -> Result<Vec<u8>, ContextError> {
            Ok(b"creator".to_vec())
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
                .map(|(key, value)| Ok((key.clone(), value.clone())))
                .collect::<Vec<_>>();
            Ok(Box::new(entries.into_iter()))
        }

        fn invoke_contract(
            &self,
            contract_name: &str,
            args: &[Vec<u8>],
            channel: &str,
            _timeout: Duration,
        ) -> Result<Response, ContextError> {
            self.invokes.borrow_mut().push((
                contract_name.to_string(),
                args.iter()
                    .map(|arg| String::from_utf8_lossy(arg).into_owned())
                    .collect(),
                channel.to_string(),
            ));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ContextError::InvokeError("no response queued".into())))
        }
    }

    /// Resolves every creator to the same claims.
    pub(crate) struct FixedResolver(pub(crate) Creator);

    impl FixedResolver {
        pub(crate) fn boxed(org: &str) -> Box<dyn IdentityResolver> {
            Box::new(FixedResolver(Creator::new(
                format!("User1@{}.example.com", org),
                format!("{}.example.com", org),
            )))
        }
    }

    impl IdentityResolver for FixedResolver {
        fn resolve(&self, _creator: &[u8]) -> Result<Creator, IdentityError> {
            Ok(self.0.clone())
        }
    }

    pub(crate) fn invocation(function: &str, args: &[&str]) -> Invocation {
        InvocationBuilder::new()
            .with_tx_id("tx-1".into())
            .with_function(function.into())
            .with_args(args.iter().map(|arg| arg.to_string()).collect())
            .build()
            .unwrap()
    }
}
