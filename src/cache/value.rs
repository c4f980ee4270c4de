//! Stored Value Module
//!
//! The tagged envelope the façade serializes into a backing-store entry.
//! Carrying an explicit shape tag turns "wrong accessor" mistakes into a
//! structural check instead of guessing from the decoded value (an empty
//! list and an empty map would otherwise be indistinguishable).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == Shape ==
/// The logical shape a key currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    List,
    Map,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Scalar => "scalar",
            Shape::List => "list",
            Shape::Map => "map",
        };
        f.write_str(name)
    }
}

// == Stored Value ==
/// One persisted logical value, tagged with its shape.
///
/// Serialized form:
/// ```json
/// {"kind":"scalar","data":42}
/// {"kind":"list","data":[1,2,3]}
/// {"kind":"map","data":{"x":1}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub(crate) enum StoredValue {
    Scalar(Value),
    List(Vec<Value>),
    Map(Map<String, Value>),
}

impl StoredValue {
    pub(crate) fn shape(&self) -> Shape {
        match self {
            StoredValue::Scalar(_) => Shape::Scalar,
            StoredValue::List(_) => Shape::List,
            StoredValue::Map(_) => Shape::Map,
        }
    }
}
