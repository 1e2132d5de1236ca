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

//! Identities, invocations and a two-channel network shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use openssl::asn1::Asn1Time;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::x509::{X509Builder, X509NameBuilder};

use supply_chaincode::families::order::{OrderContract, OrderContractConfig};
use supply_chaincode::families::transport::TransportContract;
use supply_chaincode::ledger::Network;
use supply_chaincode::protocol::invocation::{Invocation, InvocationBuilder};

pub const RETAILER_CHANNEL: &str = "retailer-distributor";
pub const DISTRIBUTOR_CHANNEL: &str = "distributor-production";
pub const TRANSPORT_CHANNEL: &str = "transport";

/// Serialized identity of `user` in the organization `org`, issued by `org.example.com`.
pub fn identity(user: &str, org: &str) -> Vec<u8> {
    let domain = format!("{}.example.com", org);
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    let key = PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap();

    let mut subject = X509NameBuilder::new().unwrap();
    subject
        .append_entry_by_nid(Nid::COMMONNAME, &format!("{}@{}", user, domain))
        .unwrap();
    let subject = subject.build();

    let mut issuer = X509NameBuilder::new().unwrap();
    issuer
        .append_entry_by_nid(Nid::ORGANIZATIONNAME, &domain)
        .unwrap();
    issuer
        .append_entry_by_nid(Nid::COMMONNAME, &format!("ca.{}", domain))
        .unwrap();
    let issuer = issuer.build();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&subject).unwrap();
    builder.set_issuer_name(&issuer).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(30).unwrap())
        .unwrap();
    builder.sign(&key, MessageDigest::sha256()).unwrap();
    let pem = builder.build().to_pem().unwrap();

    let msp_id = format!("{}MSP", org);
    let mut bytes = vec![0x0a, msp_id.len() as u8];
    bytes.extend_from_slice(msp_id.as_bytes());
    bytes.push(0x12);
    let mut len = pem.len();
    while len >= 0x80 {
        bytes.push((len as u8 & 0x7f) | 0x80);
        len >>= 7;
    }
    bytes.push(len as u8);
    bytes.extend_from_slice(&pem);
    bytes
}

pub fn invocation(tx_id: &str, function: &str, args: &[&str]) -> Invocation {
    InvocationBuilder::new()
        .with_tx_id(tx_id.into())
        .with_function(function.into())
        .with_args(args.iter().map(|arg| arg.to_string()).collect())
        .build()
        .unwrap()
}

pub fn order_json(id: &str, price: f64, qty: i64, status: &str) -> String {
    format!(
        r#"{{"id":"{}","price":{},"qty":{},"status":"{}"}}"#,
        id, price, qty, status
    )
}

/// The retailer's and the distributor's order ledgers, each running the order contract, and a
/// transport ledger.
pub fn network(distributor_config: OrderContractConfig) -> Network {
    let network = Network::new();
    network
        .install(
            RETAILER_CHANNEL,
            Arc::new(OrderContract::new(OrderContractConfig::default())),
        )
        .unwrap();
    network
        .install(
            DISTRIBUTOR_CHANNEL,
            Arc::new(OrderContract::new(distributor_config)),
        )
        .unwrap();
    network
        .install(TRANSPORT_CHANNEL, Arc::new(TransportContract::new()))
        .unwrap();
    network
}
