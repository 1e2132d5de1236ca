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

use crate::contract::SmartContract;
use crate::handler::{ApplyError, ContractHandler, TransactionContext};
use crate::protocol::invocation::Invocation;

impl<T> ContractHandler for T
where
    T: SmartContract + Send,
{
    fn contract_name(&self) -> &str {
        self.get_contract_name()
    }

    fn init(
        &self,
        invocation: &Invocation,
        _context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        self.get_logger()
            .for_invocation(invocation.tx_id())
            .debug(format_args!("Init"));
        Ok(Vec::new())
    }

    fn invoke(
        &self,
        invocation: &Invocation,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        let log = self.get_logger().for_invocation(invocation.tx_id());
        log.debug(format_args!("Invoke"));

        let creator = self
            .get_identity_resolver()
            .resolve(&context.get_creator()?)?;
        log.debug(format_args!(
            "commonName: {}, organization: {}",
            creator.common_name(),
            creator.issuer_organization()
        ));
        log.debug(format_args!(
            "transaction creator {}@{}",
            creator.common_name(),
            creator.organization()
        ));

        let function = invocation.function().parse::<T::Function>()?;
        log.debug(format_args!("function {:?} args {:?}", function, invocation.args()));

        self.apply(function, invocation.args(), &creator, &*context, &log)
    }
}
