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

/// Result of an invocation as returned to the ledger host.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: i32,
    message: String,
    payload: Vec<u8>,
}

impl Response {
    pub const OK: i32 = 200;
    /// Statuses at or above this value are failures.
    pub const ERROR_THRESHOLD: i32 = 400;
    /// The caller is not allowed to do this or asked for it the wrong way.
    pub const FORBIDDEN: i32 = 403;
    pub const NOT_FOUND: i32 = 404;
    pub const ERROR: i32 = 500;

    pub fn success(payload: Vec<u8>) -> Self {
        Response {
            status: Response::OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(status: i32, message: String) -> Self {
        Response {
            status,
            message,
            payload: Vec::new(),
        }
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn is_success(&self) -> bool {
        self.status == Response::OK
    }
}
