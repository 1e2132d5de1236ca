/*
 * Copyright 2019 Cargill Incorporated
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 * -----------------------------------------------------------------------------
 */

pub mod composite_key;
mod error;

pub use crate::contract::address::error::AddresserError;

/// Separator and namespace marker of composite keys.
pub const COMPOSITE_KEY_SEPARATOR: char = '\u{0}';
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

pub trait Addresser<K> {
    /// Returns a ledger key calculated from the given natural key
    ///
    /// # Arguments
    ///
    /// * `key` - A natural key, as defined by K, used to calculate a ledger key
    ///
    fn compute(&self, key: &K) -> Result<String, AddresserError>;

    /// Returns a human readable string of the given key
    ///
    /// # Arguments
    ///
    /// * `key` - A natural key, as defined by K
    ///
    fn normalize(&self, key: &K) -> String;

    /// Returns the partial key shared by every key this addresser computes
    fn prefix(&self) -> Result<String, AddresserError>;
}

/// Builds a composite key from an object type and its identifying attributes.
///
/// The layout is the separator, the object type and then each attribute, every component
/// followed by a separator. With no attributes the result is the prefix of all keys of that
/// object type.
pub fn create_composite_key(
    object_type: &str,
    attributes: &[&str],
) -> Result<String, AddresserError> {
    validate_component(object_type)?;
    let mut key = String::with_capacity(
        object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>() + 2,
    );
    key.push(COMPOSITE_KEY_SEPARATOR);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_SEPARATOR);
    for attribute in attributes {
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_SEPARATOR);
    }
    Ok(key)
}

fn validate_component(component: &str) -> Result<(), AddresserError> {
    if component.contains(COMPOSITE_KEY_SEPARATOR) || component.contains(MAX_UNICODE_RUNE) {
        return Err(AddresserError::KeyError(format!(
            "{:?} contains a reserved character",
            component
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key_layout() {
        assert_eq!(
            create_composite_key("Order", &["O1"]).unwrap(),
            "\u{0}Order\u{0}O1\u{0}"
        );
        assert_eq!(create_composite_key("Order", &[]).unwrap(), "\u{0}Order\u{0}");
        assert_eq!(
            create_composite_key("Lane", &["A", "B"]).unwrap(),
            "\u{0}Lane\u{0}A\u{0}B\u{0}"
        );
    }

    #[test]
    /// Keys of one object type never share a prefix with keys of another object type whose name
    /// starts the same way.
    fn test_prefix_is_exclusive() {
        let prefix = create_composite_key("Order", &[]).unwrap();
        let other = create_composite_key("OrderLine", &["O1"]).unwrap();
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn test_reserved_characters() {
        assert!(create_composite_key("Order", &["a\u{0}b"]).is_err());
        assert!(create_composite_key("Ord\u{10FFFF}er", &["a"]).is_err());
    }
}
