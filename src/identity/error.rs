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

use std::error::Error as StdError;

use crate::handler::ApplyError;

#[derive(Debug)]
pub enum IdentityError {
    /// The certificate boundary markers could not be found in the envelope.
    MalformedEnvelope(String),
    /// The enclosed data is not a PEM encoded X.509 certificate.
    InvalidCertificate(String),
    /// The certificate issuer carries no organization.
    MissingOrganization,
}

impl StdError for IdentityError {}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            IdentityError::MalformedEnvelope(ref s) => {
                write!(f, "Malformed identity envelope: {}", s)
            }
            IdentityError::InvalidCertificate(ref s) => {
                write!(f, "Invalid identity certificate: {}", s)
            }
            IdentityError::MissingOrganization => {
                f.write_str("Identity certificate issuer has no organization")
            }
        }
    }
}

impl From<IdentityError> for ApplyError {
    fn from(err: IdentityError) -> Self {
        ApplyError::AuthorizationError(format!("Unable to resolve invoking identity: {}", err))
    }
}
