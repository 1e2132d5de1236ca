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

use serde::{Deserialize, Serialize};

use super::{
    from_json, null_as_default, to_json, FromBytes, IntoBytes, ProtocolBuildError, ProtocolError,
};

/// Lifecycle position of an order.
///
/// Stored as a bare string. Values other than `open` and `ready` are kept verbatim in `Other`,
/// since records written by other parties were never restricted to the two known states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Open,
    Ready,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Ready => "ready",
            OrderStatus::Other(s) => s.as_str(),
        }
    }

    /// Returns true if an order in this state may be moved to `next`.
    ///
    /// `Ready` is reached only from `Open` (or again from `Ready`). `Open` is reached by
    /// importing an order, which may arrive in any state.
    pub fn can_transition_to(&self, next: &OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Open, OrderStatus::Ready) => true,
            (OrderStatus::Ready, OrderStatus::Ready) => true,
            (_, OrderStatus::Open) => true,
            _ => false,
        }
    }

    /// Parses one of the two filterable states; anything else is `None`.
    pub fn from_filter(s: &str) -> Option<OrderStatus> {
        match s {
            "open" => Some(OrderStatus::Open),
            "ready" => Some(OrderStatus::Ready),
            _ => None,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Other(String::new())
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => OrderStatus::Open,
            "ready" => OrderStatus::Ready,
            _ => OrderStatus::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native implementation of an order record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(deserialize_with = "null_as_default")]
    id: String,
    #[serde(deserialize_with = "null_as_default")]
    price: f64,
    #[serde(deserialize_with = "null_as_default")]
    qty: i64,
    #[serde(deserialize_with = "null_as_default")]
    status: OrderStatus,
}

impl Order {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn qty(&self) -> i64 {
        self.qty
    }

    pub fn status(&self) -> &OrderStatus {
        &self.status
    }

    pub fn into_builder(self) -> OrderBuilder {
        OrderBuilder::new()
            .with_id(self.id)
            .with_price(self.price)
            .with_qty(self.qty)
            .with_status(self.status)
    }
}

impl FromBytes<Order> for Order {
    fn from_bytes(bytes: &[u8]) -> Result<Order, ProtocolError> {
        from_json(bytes, "Order")
    }
}

impl IntoBytes for Order {
    fn into_bytes(self) -> Result<Vec<u8>, ProtocolError> {
        to_json(&self, "Order")
    }
}

impl FromBytes<Vec<Order>> for Vec<Order> {
    fn from_bytes(bytes: &[u8]) -> Result<Vec<Order>, ProtocolError> {
        from_json(bytes, "OrderList")
    }
}

impl IntoBytes for Vec<Order> {
    fn into_bytes(self) -> Result<Vec<u8>, ProtocolError> {
        to_json(&self, "OrderList")
    }
}

/// Builder used to create an Order
#[derive(Default, Clone, Debug)]
pub struct OrderBuilder {
    id: Option<String>,
    price: Option<f64>,
    qty: Option<i64>,
    status: Option<OrderStatus>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        OrderBuilder::default()
    }

    pub fn with_id(mut self, id: String) -> OrderBuilder {
        self.id = Some(id);
        self
    }

    pub fn with_price(mut self, price: f64) -> OrderBuilder {
        self.price = Some(price);
        self
    }

    pub fn with_qty(mut self, qty: i64) -> OrderBuilder {
        self.qty = Some(qty);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> OrderBuilder {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> Result<Order, ProtocolBuildError> {
        let id = self
            .id
            .ok_or_else(|| ProtocolBuildError::MissingField("id".to_string()))?;

        Ok(Order {
            id,
            price: self.price.unwrap_or_default(),
            qty: self.qty.unwrap_or_default(),
            status: self.status.unwrap_or(OrderStatus::Open),
        })
    }
}
