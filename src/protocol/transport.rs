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

use super::{from_json, null_as_default, to_json, FromBytes, IntoBytes, ProtocolError};

/// A single entry in a transport's history. `author` is the organization that recorded it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    author: String,
}

impl Status {
    pub fn new(name: String, author: String) -> Self {
        Status { name, author }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

/// Native implementation of a transport record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transport {
    #[serde(deserialize_with = "null_as_default")]
    id: String,
    #[serde(deserialize_with = "null_as_default")]
    qty: i64,
    #[serde(deserialize_with = "null_as_default")]
    statuses: Vec<Status>,
}

impl Transport {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn qty(&self) -> i64 {
        self.qty
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    /// Appends to the history. Entries are never removed or reordered.
    pub fn append_status(&mut self, status: Status) {
        self.statuses.push(status);
    }
}

impl FromBytes<Transport> for Transport {
    fn from_bytes(bytes: &[u8]) -> Result<Transport, ProtocolError> {
        from_json(bytes, "Transport")
    }
}

impl IntoBytes for Transport {
    fn into_bytes(self) -> Result<Vec<u8>, ProtocolError> {
        to_json(&self, "Transport")
    }
}

impl FromBytes<Vec<Transport>> for Vec<Transport> {
    fn from_bytes(bytes: &[u8]) -> Result<Vec<Transport>, ProtocolError> {
        from_json(bytes, "TransportList")
    }
}

impl IntoBytes for Vec<Transport> {
    fn into_bytes(self) -> Result<Vec<u8>, ProtocolError> {
        to_json(&self, "TransportList")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::distributions::{Alphanumeric, Standard};
    use rand::Rng;

    fn transport(id: &str, qty: i64, statuses: Vec<Status>) -> Transport {
        Transport {
            id: id.to_string(),
            qty,
            statuses,
        }
    }

    fn awkward_string<R: Rng>(rng: &mut R) -> String {
        let len = rng.gen_range(0..12);
        let mut s: String = (0..len).map(|_| rng.sample::<char, _>(Standard)).collect();
        s.push_str(match rng.gen_range(0..4) {
            0 => "\"",
            1 => "\\",
            2 => "\u{0}",
            _ => "é",
        });
        s
    }

    #[test]
    fn test_transport_bytes_round_trip() {
        let original = transport(
            "T1",
            5,
            vec![
                Status::new("loaded".into(), "carrier".into()),
                Status::new("picked_up".into(), "distributor".into()),
            ],
        );

        let bytes = original.clone().into_bytes().expect("Unable to encode");
        assert_eq!(original, Transport::from_bytes(&bytes).expect("Unable to decode"));

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["statuses"][1]["name"], "picked_up");
        assert_eq!(value["statuses"][1]["author"], "distributor");
    }

    #[test]
    /// Generated transports come back unchanged from their stored form.
    ///
    /// Ids and status entries mix arbitrary unicode, quotes, backslashes and NULs, quantities span
    /// the whole i64 range, and histories hold zero to several entries.
    fn test_generated_transport_round_trip() {
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let statuses = (0..rng.gen_range(0..6))
                .map(|_| {
                    let author: String = (&mut rng)
                        .sample_iter(&Alphanumeric)
                        .take(8)
                        .map(char::from)
                        .collect();
                    Status::new(awkward_string(&mut rng), author)
                })
                .collect();
            let original = transport(&awkward_string(&mut rng), rng.gen::<i64>(), statuses);

            let bytes = original.clone().into_bytes().expect("Unable to encode");
            let decoded = Transport::from_bytes(&bytes).expect("Unable to decode");
            assert_eq!(original, decoded);
        }

        let list = vec![transport("T1", i64::MIN, vec![]), transport("T2", i64::MAX, vec![])];
        let bytes = list.clone().into_bytes().unwrap();
        assert_eq!(list, Vec::<Transport>::from_bytes(&bytes).unwrap());
    }

    #[test]
    /// A null or missing history decodes as empty; anything else malformed is rejected.
    fn test_transport_null_statuses() {
        let transport = Transport::from_bytes(br#"{"id":"T1","qty":5,"statuses":null}"#).unwrap();
        assert!(transport.statuses().is_empty());

        let transport = Transport::from_bytes(br#"{"id":"T2"}"#).unwrap();
        assert!(transport.statuses().is_empty());

        assert!(Transport::from_bytes(br#"{"id":"T3","statuses":"loaded"}"#).is_err());
    }

    #[test]
    /// Null scalars in a transport and in its history entries decode as their zero values.
    fn test_transport_null_fields() {
        let decoded = Transport::from_bytes(
            br#"{"id":null,"qty":null,"statuses":[{"name":"loaded","author":null}]}"#,
        )
        .unwrap();

        assert_eq!(decoded.id(), "");
        assert_eq!(decoded.qty(), 0);
        assert_eq!(decoded.statuses()[0].name(), "loaded");
        assert_eq!(decoded.statuses()[0].author(), "");
    }

    #[test]
    fn test_append_status_keeps_order() {
        let mut transport = transport("T1", 0, vec![]);
        transport.append_status(Status::new("a".into(), "carrier".into()));
        transport.append_status(Status::new("b".into(), "retailer".into()));

        let names: Vec<&str> = transport.statuses().iter().map(Status::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
