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

use std::str::FromStr;
use std::thread;

use crate::contract::address::composite_key::CompositeKeyAddresser;
use crate::contract::context::RecordContext;
use crate::contract::SmartContract;
use crate::families::order::config::OrderContractConfig;
use crate::families::{first_arg, single_arg};
use crate::handler::{ApplyError, TransactionContext};
use crate::identity::{Creator, IdentityResolver, X509IdentityResolver};
use crate::logging::{ContractLogger, InvocationLogger};
use crate::protocol::order::{Order, OrderStatus};
use crate::protocol::response::Response;
use crate::protocol::{FromBytes, IntoBytes};

pub const ORDER_CONTRACT_NAME: &str = "order";
pub const ORDER_OBJECT_TYPE: &str = "Order";

const QUERY_ARGS_MESSAGE: &str = "Incorrect number of arguments, provide id or status (open, ready)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFunction {
    Create,
    Complete,
    Query,
}

impl FromStr for OrderFunction {
    type Err = ApplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(OrderFunction::Create),
            "complete" => Ok(OrderFunction::Complete),
            "query" => Ok(OrderFunction::Query),
            _ => Err(ApplyError::InvalidFunction(s.to_string())),
        }
    }
}

type OrderRecords<'a> = RecordContext<'a, CompositeKeyAddresser, Order>;

pub struct OrderContract {
    name: String,
    config: OrderContractConfig,
    logger: ContractLogger,
    resolver: Box<dyn IdentityResolver>,
}

impl OrderContract {
    /// Creates an order contract that resolves X.509 identities and logs to the process logger.
    pub fn new(config: OrderContractConfig) -> Self {
        OrderContract {
            name: ORDER_CONTRACT_NAME.to_string(),
            config,
            logger: ContractLogger::new("OrderContract"),
            resolver: Box::new(X509IdentityResolver::new()),
        }
    }

    pub fn with_logger(mut self, logger: ContractLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_identity_resolver(mut self, resolver: Box<dyn IdentityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &OrderContractConfig {
        &self.config
    }

    fn records<'a>(&self, context: &'a dyn TransactionContext) -> OrderRecords<'a> {
        RecordContext::new(context, self.get_addresser())
    }

    fn apply_create(
        &self,
        args: &[String],
        creator: &Creator,
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Vec<u8>, ApplyError> {
        let org = creator.organization();
        if org == self.config.creator_org() {
            let payload = first_arg(args, "Incorrect number of arguments")?;
            let order = Order::from_bytes(payload.as_bytes())?;
            log.debug(format_args!("creating order {}", order.id()));
            // the caller's bytes are stored as given
            self.records(context)
                .set_raw(order.id(), payload.as_bytes().to_vec())?;
            Ok(Vec::new())
        } else if org == self.config.importer_org() {
            self.import_upstream(context, log)
        } else {
            log.warn(format_args!("Don't know how to handle org {}", org));
            Err(ApplyError::AuthorizationError(format!(
                "Don't know how to handle org {}",
                org
            )))
        }
    }

    /// Copies every order the upstream query returns into this ledger as an open order.
    fn import_upstream(
        &self,
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Vec<u8>, ApplyError> {
        let response = self.invoke_upstream(context, log)?;
        log.debug(format_args!(
            "upstream returned {}",
            String::from_utf8_lossy(response.payload())
        ));

        let orders = Vec::<Order>::from_bytes(response.payload())?;
        let count = orders.len();
        let records = self.records(context);
        for order in orders {
            let order = order
                .into_builder()
                .with_status(OrderStatus::Open)
                .build()?;
            log.debug(format_args!("importing order {}", order.id()));
            records.set_record(order)?;
        }
        log.info(format_args!(
            "imported {} orders from {}",
            count,
            self.config.upstream_channel()
        ));

        Ok(Vec::new())
    }

    /// Calls the upstream contract, retrying as the invoke policy allows.
    fn invoke_upstream(
        &self,
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Response, ApplyError> {
        let policy = self.config.invoke_policy();
        let contract = self.config.upstream_contract();
        let channel = self.config.upstream_channel();
        let args: Vec<Vec<u8>> = self
            .config
            .upstream_args()
            .iter()
            .map(|arg| arg.as_bytes().to_vec())
            .collect();

        let mut delay = policy.initial_delay();
        let mut attempt = 1;
        loop {
            let err = match context.invoke_contract(contract, &args, channel, policy.timeout()) {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => ApplyError::DownstreamError(format!(
                    "Got unexpected return from {} on {}: {} {}",
                    contract,
                    channel,
                    response.status(),
                    response.message()
                )),
                Err(err) => ApplyError::from(err),
            };

            if attempt >= policy.max_attempts() {
                return Err(err);
            }
            log.warn(format_args!(
                "attempt {} of {} failed, retrying in {:?}: {}",
                attempt,
                policy.max_attempts(),
                delay,
                err
            ));
            thread::sleep(delay);
            delay = policy.next_delay(delay);
            attempt += 1;
        }
    }

    fn apply_complete(
        &self,
        args: &[String],
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Vec<u8>, ApplyError> {
        let id = single_arg(args, "Incorrect number of arguments")?;
        let records = self.records(context);
        let order = records
            .get_record(id)?
            .ok_or_else(|| ApplyError::NotFound(format!("Order {} does not exist", id)))?;

        if self.config.strict_transitions()
            && !order.status().can_transition_to(&OrderStatus::Ready)
        {
            return Err(ApplyError::InvalidTransition(format!(
                "Order {} cannot move from {} to {}",
                id,
                order.status(),
                OrderStatus::Ready
            )));
        }

        log.debug(format_args!("order {} {} -> ready", id, order.status()));
        let order = order
            .into_builder()
            .with_status(OrderStatus::Ready)
            .build()?;
        // written back under the key it was read from
        records.set_raw(id, order.into_bytes()?)?;
        Ok(Vec::new())
    }

    fn apply_query(
        &self,
        args: &[String],
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Vec<u8>, ApplyError> {
        let arg = single_arg(args, QUERY_ARGS_MESSAGE)?;
        let records = self.records(context);

        match OrderStatus::from_filter(arg) {
            Some(status) => {
                let orders: Vec<Order> = records
                    .list_records()?
                    .into_iter()
                    .filter(|order| order.status() == &status)
                    .collect();
                log.debug(format_args!("{} orders are {}", orders.len(), status));
                Ok(orders.into_bytes()?)
            }
            None => records
                .get_raw(arg)?
                .ok_or_else(|| ApplyError::NotFound(format!("Order {} does not exist", arg))),
        }
    }
}

impl SmartContract for OrderContract {
    type Function = OrderFunction;
    type Addr = CompositeKeyAddresser;

    fn get_contract_name(&self) -> &str {
        &self.name
    }

    fn get_addresser(&self) -> Self::Addr {
        CompositeKeyAddresser::new(ORDER_OBJECT_TYPE.to_string())
    }

    fn get_logger(&self) -> &ContractLogger {
        &self.logger
    }

    fn get_identity_resolver(&self) -> &dyn IdentityResolver {
        self.resolver.as_ref()
    }

    fn apply(
        &self,
        function: OrderFunction,
        args: &[String],
        creator: &Creator,
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Vec<u8>, ApplyError> {
        match function {
            OrderFunction::Create => self.apply_create(args, creator, context, log),
            OrderFunction::Complete => self.apply_complete(args, context, log),
            OrderFunction::Query => self.apply_query(args, context, log),
        }
    }
}
