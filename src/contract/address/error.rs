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

use std::error::Error;

#[derive(Debug)]
pub enum AddresserError {
    /// Returned when a key component cannot be embedded in a composite key
    KeyError(String),
}

impl Error for AddresserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            AddresserError::KeyError(_) => None,
        }
    }
}

impl std::fmt::Display for AddresserError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            AddresserError::KeyError(ref s) => write!(f, "KeyError: {}", s),
        }
    }
}
