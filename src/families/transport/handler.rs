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

use crate::contract::address::composite_key::CompositeKeyAddresser;
use crate::contract::context::RecordContext;
use crate::contract::SmartContract;
use crate::families::first_arg;
use crate::handler::{ApplyError, TransactionContext};
use crate::identity::{Creator, IdentityResolver, X509IdentityResolver};
use crate::logging::{ContractLogger, InvocationLogger};
use crate::protocol::transport::{Status, Transport};
use crate::protocol::{FromBytes, IntoBytes};

pub const TRANSPORT_CONTRACT_NAME: &str = "transport";
pub const TRANSPORT_OBJECT_TYPE: &str = "Transport";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFunction {
    Create,
    Update,
    Query,
}

impl FromStr for TransportFunction {
    type Err = ApplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(TransportFunction::Create),
            "update" => Ok(TransportFunction::Update),
            "query" => Ok(TransportFunction::Query),
            _ => Err(ApplyError::InvalidFunction(s.to_string())),
        }
    }
}

type TransportRecords<'a> = RecordContext<'a, CompositeKeyAddresser, Transport>;

pub struct TransportContract {
    name: String,
    logger: ContractLogger,
    resolver: Box<dyn IdentityResolver>,
}

impl Default for TransportContract {
    fn default() -> Self {
        TransportContract::new()
    }
}

impl TransportContract {
    pub fn new() -> Self {
        TransportContract {
            name: TRANSPORT_CONTRACT_NAME.to_string(),
            logger: ContractLogger::new("TransportContract"),
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

    fn records<'a>(&self, context: &'a dyn TransactionContext) -> TransportRecords<'a> {
        RecordContext::new(context, self.get_addresser())
    }
}

impl SmartContract for TransportContract {
    type Function = TransportFunction;
    type Addr = CompositeKeyAddresser;

    fn get_contract_name(&self) -> &str {
        &self.name
    }

    fn get_addresser(&self) -> Self::Addr {
        CompositeKeyAddresser::new(TRANSPORT_OBJECT_TYPE.to_string())
    }

    fn get_logger(&self) -> &ContractLogger {
        &self.logger
    }

    fn get_identity_resolver(&self) -> &dyn IdentityResolver {
        self.resolver.as_ref()
    }

    fn apply(
        &self,
        function: TransportFunction,
        args: &[String],
        creator: &Creator,
        context: &dyn TransactionContext,
        log: &InvocationLogger,
    ) -> Result<Vec<u8>, ApplyError> {
        let records = self.records(context);
        match function {
            TransportFunction::Create => apply_create(args, &records, log),
            TransportFunction::Update => apply_update(args, creator, &records, log),
            TransportFunction::Query => apply_query(&records, log),
        }
    }
}

fn apply_create(
    args: &[String],
    records: &TransportRecords,
    log: &InvocationLogger,
) -> Result<Vec<u8>, ApplyError> {
    let payload = first_arg(args, "Incorrect number of arguments")?;
    let transport = Transport::from_bytes(payload.as_bytes())?;
    log.debug(format_args!("creating transport {}", transport.id()));
    records.set_raw(transport.id(), payload.as_bytes().to_vec())?;
    Ok(Vec::new())
}

fn apply_update(
    args: &[String],
    creator: &Creator,
    records: &TransportRecords,
    log: &InvocationLogger,
) -> Result<Vec<u8>, ApplyError> {
    let (id, label) = match args {
        [id, label] => (id, label),
        _ => {
            return Err(ApplyError::InvalidArguments(
                "Incorrect number of arguments, provide id and status".into(),
            ))
        }
    };

    let mut transport = records
        .get_record(id)?
        .ok_or_else(|| ApplyError::NotFound(format!("Transport {} does not exist", id)))?;
    log.debug(format_args!(
        "transport {} status {} by {}",
        id,
        label,
        creator.organization()
    ));
    transport.append_status(Status::new(label.clone(), creator.organization().to_string()));
    records.set_raw(id, transport.into_bytes()?)?;
    Ok(Vec::new())
}

fn apply_query(records: &TransportRecords, log: &InvocationLogger) -> Result<Vec<u8>, ApplyError> {
    let transports = records.list_records()?;
    log.debug(format_args!("{} transports", transports.len()));
    Ok(transports.into_bytes()?)
}
