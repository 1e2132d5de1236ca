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

use super::{ProtocolBuildError, ProtocolError};

/// A request to run one function of a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    tx_id: String,
    function: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Splits raw invocation arguments into a function name followed by its parameters, the
    /// form in which one contract calls another.
    pub fn from_raw_args(tx_id: &str, raw_args: &[Vec<u8>]) -> Result<Invocation, ProtocolError> {
        let mut strings = raw_args
            .iter()
            .map(|arg| {
                String::from_utf8(arg.clone()).map_err(|err| {
                    ProtocolError::DeserializationError(format!(
                        "Invocation argument is not valid UTF-8: {}",
                        err
                    ))
                })
            })
            .collect::<Result<Vec<String>, ProtocolError>>()?
            .into_iter();

        let function = strings.next().unwrap_or_default();

        Ok(Invocation {
            tx_id: tx_id.to_string(),
            function,
            args: strings.collect(),
        })
    }
}

/// Builder used to create an Invocation
#[derive(Default, Clone, Debug)]
pub struct InvocationBuilder {
    tx_id: Option<String>,
    function: Option<String>,
    args: Vec<String>,
}

impl InvocationBuilder {
    pub fn new() -> Self {
        InvocationBuilder::default()
    }

    pub fn with_tx_id(mut self, tx_id: String) -> InvocationBuilder {
        self.tx_id = Some(tx_id);
        self
    }

    pub fn with_function(mut self, function: String) -> InvocationBuilder {
        self.function = Some(function);
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> InvocationBuilder {
        self.args = args;
        self
    }

    pub fn build(self) -> Result<Invocation, ProtocolBuildError> {
        let tx_id = self
            .tx_id
            .ok_or_else(|| ProtocolBuildError::MissingField("tx_id".to_string()))?;
        let function = self
            .function
            .ok_or_else(|| ProtocolBuildError::MissingField("function".to_string()))?;

        Ok(Invocation {
            tx_id,
            function,
            args: self.args,
        })
    }
}
