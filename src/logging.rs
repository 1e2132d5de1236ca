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

//! Loggers handed to each contract instance.
//!
//! A contract owns a `ContractLogger` and derives an `InvocationLogger` for every invocation, so
//! that each record carries the contract name as its target and the transaction id as a prefix.
//! Records go to the process-wide `log` implementation unless another sink is injected.

use std::fmt;
use std::sync::Arc;

use log::{Level, Log, Metadata, Record};

#[derive(Clone)]
pub struct ContractLogger {
    target: String,
    sink: Option<Arc<dyn Log>>,
}

impl ContractLogger {
    /// Creates a logger that writes to the process-wide `log` implementation.
    pub fn new(target: &str) -> Self {
        ContractLogger {
            target: target.to_string(),
            sink: None,
        }
    }

    /// Creates a logger that writes to the given sink.
    pub fn with_sink(target: &str, sink: Arc<dyn Log>) -> Self {
        ContractLogger {
            target: target.to_string(),
            sink: Some(sink),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn for_invocation(&self, tx_id: &str) -> InvocationLogger<'_> {
        InvocationLogger {
            logger: self,
            tx_id: tx_id.to_string(),
        }
    }
}

impl fmt::Debug for ContractLogger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ContractLogger")
            .field("target", &self.target)
            .field("injected", &self.sink.is_some())
            .finish()
    }
}

/// Logger scoped to a single invocation.
pub struct InvocationLogger<'a> {
    logger: &'a ContractLogger,
    tx_id: String,
}

impl<'a> InvocationLogger<'a> {
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn debug(&self, args: fmt::Arguments) {
        self.log(Level::Debug, args)
    }

    pub fn info(&self, args: fmt::Arguments) {
        self.log(Level::Info, args)
    }

    pub fn warn(&self, args: fmt::Arguments) {
        self.log(Level::Warn, args)
    }

    fn log(&self, level: Level, args: fmt::Arguments) {
        let sink: &dyn Log = match self.logger.sink {
            Some(ref sink) => sink.as_ref(),
            None if level > log::max_level() => return,
            None => log::logger(),
        };

        let metadata = Metadata::builder()
            .level(level)
            .target(&self.logger.target)
            .build();
        if !sink.enabled(&metadata) {
            return;
        }

        sink.log(
            &Record::builder()
                .metadata(metadata)
                .args(format_args!("[{}] {}", self.tx_id, args))
                .module_path(Some(module_path!()))
                .build(),
        );
    }
}
