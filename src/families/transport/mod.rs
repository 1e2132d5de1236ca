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

//! The transport contract.
//!
//! create - Store the shipment passed as the only argument
//! update - Append a status, authored by the caller's organization, to a shipment
//! query - Return every shipment

mod handler;

pub use self::handler::{
    TransportContract, TransportFunction, TRANSPORT_CONTRACT_NAME, TRANSPORT_OBJECT_TYPE,
};
