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

//! The order contract.
//!
//! The following are the functions that can be invoked on the [`OrderContract`], with a brief
//! explanation of what they do:
//!
//! create - Store an order. The retailer passes the order as its only argument; the distributor
//!          passes nothing and imports every ready order from the retailer's ledger as open.
//! complete - Mark the order with the given id as ready
//! query - Return the order with the given id, or every order with status `open` or `ready`

mod config;
mod handler;

pub use self::config::{
    ConfigError, InvokePolicy, OrderContractConfig, OrderContractConfigBuilder,
};
pub use self::handler::{OrderContract, OrderFunction, ORDER_CONTRACT_NAME, ORDER_OBJECT_TYPE};
