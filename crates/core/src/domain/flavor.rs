use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key for an ice cream flavor.
///
/// The raw name is trimmed and lower-cased on construction so `"Vanilla "`
/// and `"vanilla"` address the same inventory row. Use [`Flavor::display_name`]
/// when echoing the flavor back to a customer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Flavor(String);

impl Flavor {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn display_name(&self) -> String {
        title_case(&self.0)
    }
}

impl From<String> for Flavor {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Flavor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Flavor> for String {
    fn from(value: Flavor) -> Self {
        value.0
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_alphabetic = false;

    for character in text.chars() {
        if character.is_alphabetic() {
            if previous_alphabetic {
                output.extend(character.to_lowercase());
            } else {
                output.extend(character.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            output.push(character);
            previous_alphabetic = false;
        }
    }

    output
}
