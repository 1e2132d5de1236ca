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

use crate::contract::address::{create_composite_key, Addresser, AddresserError};

/// Addresses records of one object type by their id.
#[derive(Debug, Clone)]
pub struct CompositeKeyAddresser {
    object_type: String,
}

impl CompositeKeyAddresser {
    pub fn new(object_type: String) -> CompositeKeyAddresser {
        CompositeKeyAddresser { object_type }
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }
}

impl Addresser<String> for CompositeKeyAddresser {
    fn compute(&self, key: &String) -> Result<String, AddresserError> {
        create_composite_key(&self.object_type, &[key.as_str()])
    }

    fn normalize(&self, key: &String) -> String {
        format!("{}:{}", self.object_type, key)
    }

    fn prefix(&self) -> Result<String, AddresserError> {
        create_composite_key(&self.object_type, &[])
    }
}
