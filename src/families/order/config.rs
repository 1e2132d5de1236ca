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

//! Settings of the order contract.
//!
//! An `OrderContractConfig` can be built in code with `OrderContractConfigBuilder` or read from
//! JSON; every field that is left out takes its default.

use std::convert::TryFrom;
use std::error::Error as StdError;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_CREATOR_ORG: &str = "retailer";
const DEFAULT_IMPORTER_ORG: &str = "distributor";
const DEFAULT_UPSTREAM_CONTRACT: &str = "order";
const DEFAULT_UPSTREAM_CHANNEL: &str = "retailer-distributor";

const DEFAULT_TIMEOUT_MILLIS: u64 = 30_000;
const DEFAULT_INITIAL_DELAY_MILLIS: u64 = 100;
const DEFAULT_MAX_DELAY_MILLIS: u64 = 5_000;

#[derive(Debug)]
pub enum ConfigError {
    /// Returned when a setting has a value the contract cannot work with.
    InvalidSetting(String),
    /// Returned when the JSON form of the config cannot be read.
    DeserializationError(String),
}

impl StdError for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ConfigError::InvalidSetting(ref s) => write!(f, "Invalid setting: {}", s),
            ConfigError::DeserializationError(ref s) => {
                write!(f, "Unable to read config: {}", s)
            }
        }
    }
}

/// How a call to the upstream contract is made and retried.
///
/// A failed call is one where the host reports an error or the upstream contract answers with a
/// status other than 200. Delays grow by `multiplier` after each failure, up to `max_delay`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InvokePolicy {
    timeout_millis: u64,
    max_attempts: u32,
    initial_delay_millis: u64,
    max_delay_millis: u64,
    multiplier: f64,
}

impl InvokePolicy {
    /// Fails if any duration is too long to be kept as a count of milliseconds.
    pub fn new(
        timeout: Duration,
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    ) -> Result<Self, ConfigError> {
        Ok(InvokePolicy {
            timeout_millis: millis("timeout", timeout)?,
            max_attempts,
            initial_delay_millis: millis("initial_delay", initial_delay)?,
            max_delay_millis: millis("max_delay", max_delay)?,
            multiplier,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_millis)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_millis)
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// The delay to wait after a failure that followed a wait of `delay`.
    pub fn next_delay(&self, delay: Duration) -> Duration {
        let next = delay.as_millis() as f64 * self.multiplier;
        let max = self.max_delay_millis as f64;
        if next >= max {
            self.max_delay()
        } else {
            Duration::from_millis(next as u64)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting(
                "invoke_policy.max_attempts must be at least 1".into(),
            ));
        }
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err(ConfigError::InvalidSetting(
                "invoke_policy.multiplier must be at least 1.0".into(),
            ));
        }
        if self.initial_delay_millis > self.max_delay_millis {
            return Err(ConfigError::InvalidSetting(
                "invoke_policy.initial_delay_millis exceeds max_delay_millis".into(),
            ));
        }
        Ok(())
    }
}

fn millis(setting: &str, duration: Duration) -> Result<u64, ConfigError> {
    u64::try_from(duration.as_millis()).map_err(|_| {
        ConfigError::InvalidSetting(format!(
            "invoke_policy.{} of {:?} does not fit in u64 milliseconds",
            setting, duration
        ))
    })
}

impl Default for InvokePolicy {
    /// A single attempt with a 30 second timeout.
    fn default() -> Self {
        InvokePolicy {
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            max_attempts: 1,
            initial_delay_millis: DEFAULT_INITIAL_DELAY_MILLIS,
            max_delay_millis: DEFAULT_MAX_DELAY_MILLIS,
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderContractConfig {
    creator_org: String,
    importer_org: String,
    upstream_contract: String,
    upstream_channel: String,
    upstream_args: Vec<String>,
    invoke_policy: InvokePolicy,
    strict_transitions: bool,
}

impl OrderContractConfig {
    /// Reads a config from JSON. Missing fields take their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: OrderContractConfig = serde_json::from_slice(bytes)
            .map_err(|err| ConfigError::DeserializationError(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The organization allowed to create orders directly.
    pub fn creator_org(&self) -> &str {
        &self.creator_org
    }

    /// The organization that creates orders by importing them from upstream.
    pub fn importer_org(&self) -> &str {
        &self.importer_org
    }

    pub fn upstream_contract(&self) -> &str {
        &self.upstream_contract
    }

    pub fn upstream_channel(&self) -> &str {
        &self.upstream_channel
    }

    /// Function name and arguments sent to the upstream contract.
    pub fn upstream_args(&self) -> &[String] {
        &self.upstream_args
    }

    pub fn invoke_policy(&self) -> &InvokePolicy {
        &self.invoke_policy
    }

    /// When set, `complete` refuses status changes the transition table does not allow.
    pub fn strict_transitions(&self) -> bool {
        self.strict_transitions
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("creator_org", &self.creator_org),
            ("importer_org", &self.importer_org),
            ("upstream_contract", &self.upstream_contract),
            ("upstream_channel", &self.upstream_channel),
        ];
        for (field, value) in names.iter() {
            if value.is_empty() {
                return Err(ConfigError::InvalidSetting(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }
        if self.creator_org == self.importer_org {
            return Err(ConfigError::InvalidSetting(
                "creator_org and importer_org must differ".into(),
            ));
        }
        if self.upstream_args.is_empty() {
            return Err(ConfigError::InvalidSetting(
                "upstream_args must name a function".into(),
            ));
        }
        self.invoke_policy.validate()
    }
}

impl Default for OrderContractConfig {
    fn default() -> Self {
        OrderContractConfig {
            creator_org: DEFAULT_CREATOR_ORG.to_string(),
            importer_org: DEFAULT_IMPORTER_ORG.to_string(),
            upstream_contract: DEFAULT_UPSTREAM_CONTRACT.to_string(),
            upstream_channel: DEFAULT_UPSTREAM_CHANNEL.to_string(),
            upstream_args: vec!["query".to_string(), "ready".to_string()],
            invoke_policy: InvokePolicy::default(),
            strict_transitions: false,
        }
    }
}

#[derive(Default, Clone)]
pub struct OrderContractConfigBuilder {
    creator_org: Option<String>,
    importer_org: Option<String>,
    upstream_contract: Option<String>,
    upstream_channel: Option<String>,
    upstream_args: Option<Vec<String>>,
    invoke_policy: Option<InvokePolicy>,
    strict_transitions: Option<bool>,
}

impl OrderContractConfigBuilder {
    pub fn new() -> Self {
        OrderContractConfigBuilder::default()
    }

    pub fn with_creator_org(mut self, org: String) -> OrderContractConfigBuilder {
        self.creator_org = Some(org);
        self
    }

    pub fn with_importer_org(mut self, org: String) -> OrderContractConfigBuilder {
        self.importer_org = Some(org);
        self
    }

    pub fn with_upstream_contract(mut self, name: String) -> OrderContractConfigBuilder {
        self.upstream_contract = Some(name);
        self
    }

    pub fn with_upstream_channel(mut self, channel: String) -> OrderContractConfigBuilder {
        self.upstream_channel = Some(channel);
        self
    }

    pub fn with_upstream_args(mut self, args: Vec<String>) -> OrderContractConfigBuilder {
        self.upstream_args = Some(args);
        self
    }

    pub fn with_invoke_policy(mut self, policy: InvokePolicy) -> OrderContractConfigBuilder {
        self.invoke_policy = Some(policy);
        self
    }

    pub fn with_strict_transitions(mut self, strict: bool) -> OrderContractConfigBuilder {
        self.strict_transitions = Some(strict);
        self
    }

    pub fn build(self) -> Result<OrderContractConfig, ConfigError> {
        let defaults = OrderContractConfig::default();
        let config = OrderContractConfig {
            creator_org: self.creator_org.unwrap_or(defaults.creator_org),
            importer_org: self.importer_org.unwrap_or(defaults.importer_org),
            upstream_contract: self.upstream_contract.unwrap_or(defaults.upstream_contract),
            upstream_channel: self.upstream_channel.unwrap_or(defaults.upstream_channel),
            upstream_args: self.upstream_args.unwrap_or(defaults.upstream_args),
            invoke_policy: self.invoke_policy.unwrap_or(defaults.invoke_policy),
            strict_transitions: self
                .strict_transitions
                .unwrap_or(defaults.strict_transitions),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrderContractConfigBuilder::new().build().unwrap();
        assert_eq!(config, OrderContractConfig::default());
        assert_eq!(config.creator_org(), "retailer");
        assert_eq!(config.importer_org(), "distributor");
        assert_eq!(config.upstream_contract(), "order");
        assert_eq!(config.upstream_channel(), "retailer-distributor");
        assert_eq!(config.upstream_args(), &["query".to_string(), "ready".to_string()]);
        assert_eq!(config.invoke_policy().timeout(), Duration::from_secs(30));
        assert_eq!(config.invoke_policy().max_attempts(), 1);
        assert!(!config.strict_transitions());
    }

    #[test]
    /// Fields left out of the JSON keep their defaults.
    fn test_from_json() {
        let config = OrderContractConfig::from_json(
            br#"{"upstream_channel": "east", "invoke_policy": {"max_attempts": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.upstream_channel(), "east");
        assert_eq!(config.creator_org(), "retailer");
        assert_eq!(config.invoke_policy().max_attempts(), 3);
        assert_eq!(config.invoke_policy().timeout(), Duration::from_secs(30));

        match OrderContractConfig::from_json(b"[1, 2]") {
            Err(ConfigError::DeserializationError(_)) => (),
            other => panic!("Expected deserialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_settings() {
        let zero_attempts = InvokePolicy::new(
            Duration::from_secs(1),
            0,
            Duration::from_millis(10),
            Duration::from_millis(100),
            2.0,
        )
        .unwrap();
        assert!(OrderContractConfigBuilder::new()
            .with_invoke_policy(zero_attempts)
            .build()
            .is_err());
        assert!(OrderContractConfigBuilder::new()
            .with_importer_org("retailer".into())
            .build()
            .is_err());
        assert!(OrderContractConfigBuilder::new()
            .with_upstream_args(vec![])
            .build()
            .is_err());
        assert!(OrderContractConfig::from_json(br#"{"creator_org": ""}"#).is_err());
    }

    #[test]
    /// Delays grow by the multiplier and stop at the maximum.
    fn test_next_delay() {
        let policy = InvokePolicy::new(
            Duration::from_secs(1),
            5,
            Duration::from_millis(100),
            Duration::from_millis(500),
            2.0,
        )
        .unwrap();
        let mut delay = policy.initial_delay();
        let mut delays = vec![];
        for _ in 0..4 {
            delays.push(delay.as_millis());
            delay = policy.next_delay(delay);
        }
        assert_eq!(delays, vec![100, 200, 400, 500]);
    }

    #[test]
    /// Durations whose milliseconds overflow a u64 are refused instead of wrapping.
    fn test_policy_duration_overflow() {
        match InvokePolicy::new(
            Duration::from_secs(u64::MAX),
            1,
            Duration::from_millis(10),
            Duration::from_millis(100),
            2.0,
        ) {
            Err(ConfigError::InvalidSetting(msg)) => assert!(msg.contains("timeout")),
            other => panic!("Expected invalid setting, got {:?}", other),
        }

        assert!(InvokePolicy::new(
            Duration::from_secs(1),
            1,
            Duration::from_millis(10),
            Duration::MAX,
            2.0,
        )
        .is_err());

        let largest = Duration::from_millis(u64::MAX);
        let policy = InvokePolicy::new(largest, 1, largest, largest, 1.0).unwrap();
        assert_eq!(policy.timeout(), largest);
    }
}
