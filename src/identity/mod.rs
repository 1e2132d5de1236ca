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

//! Resolution of the invoking identity.
//!
//! The ledger host hands contracts the creator of a transaction as an opaque envelope with a PEM
//! certificate embedded in it. The organization of the certificate's issuer acts as the
//! caller's role.

mod error;

use openssl::nid::Nid;
use openssl::x509::{X509NameRef, X509};

pub use crate::identity::error::IdentityError;

const PEM_MARKER: &[u8] = b"-----";

/// The claims contracts act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    common_name: String,
    issuer_organization: String,
    organization: String,
}

impl Creator {
    pub fn new(common_name: String, issuer_organization: String) -> Self {
        let organization = issuer_organization
            .split('.')
            .next()
            .unwrap_or("")
            .to_string();

        Creator {
            common_name,
            issuer_organization,
            organization,
        }
    }

    /// The subject's common name, e.g. `User1@retailer.example.com`
    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    /// The issuer's full organization, e.g. `retailer.example.com`
    pub fn issuer_organization(&self) -> &str {
        &self.issuer_organization
    }

    /// The issuer's organization up to its first `.`, e.g. `retailer`
    pub fn organization(&self) -> &str {
        &self.organization
    }
}

pub trait IdentityResolver: Send + Sync {
    /// Extracts the claims of the invoking identity from its serialized form.
    ///
    /// # Arguments
    ///
    /// * `creator` - the serialized identity as provided by the ledger host
    fn resolve(&self, creator: &[u8]) -> Result<Creator, IdentityError>;
}

/// Resolves identities carrying an X.509 certificate.
#[derive(Debug, Default, Clone)]
pub struct X509IdentityResolver;

impl X509IdentityResolver {
    pub fn new() -> Self {
        X509IdentityResolver
    }
}

impl IdentityResolver for X509IdentityResolver {
    fn resolve(&self, creator: &[u8]) -> Result<Creator, IdentityError> {
        let pem = extract_pem(creator)?;
        let cert = X509::from_pem(pem)
            .map_err(|err| IdentityError::InvalidCertificate(err.to_string()))?;

        // the common name is only reported, so a certificate without one still resolves
        let common_name = first_entry(cert.subject_name(), Nid::COMMONNAME)?.unwrap_or_default();
        let organization = first_entry(cert.issuer_name(), Nid::ORGANIZATIONNAME)?
            .ok_or(IdentityError::MissingOrganization)?;

        Ok(Creator::new(common_name, organization))
    }
}

/// Returns the bytes from the first boundary marker to the end of the last one.
fn extract_pem(creator: &[u8]) -> Result<&[u8], IdentityError> {
    let start = creator
        .windows(PEM_MARKER.len())
        .position(|window| window == PEM_MARKER)
        .ok_or_else(|| {
            IdentityError::MalformedEnvelope("no certificate boundary marker found".into())
        })?;
    let end = creator
        .windows(PEM_MARKER.len())
        .rposition(|window| window == PEM_MARKER)
        .map(|i| i + PEM_MARKER.len())
        .ok_or_else(|| {
            IdentityError::MalformedEnvelope("no certificate boundary marker found".into())
        })?;

    Ok(&creator[start..end])
}

fn first_entry(name: &X509NameRef, nid: Nid) -> Result<Option<String>, IdentityError> {
    match name.entries_by_nid(nid).next() {
        Some(entry) => std::str::from_utf8(entry.data().as_slice())
            .map(|value| Some(value.to_string()))
            .map_err(|err| {
                IdentityError::InvalidCertificate(format!("{:?} is not UTF-8: {}", nid, err))
            }),
        None => Ok(None),
    }
}
