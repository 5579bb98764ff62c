//! Shape validation for squad payloads.
//!
//! The squad API is untrusted input: every payload is checked against the
//! schema of the configured feed version before anything else touches it.
//! Validation is all-or-nothing and stops at the first violation.
//!
//! Walks `serde_json::Value` by hand rather than deriving `Deserialize` so
//! every error carries the JSON path of the offending value.

use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

use super::types::{ExternalImage, ExternalPlayer, PlayerId, SquadPayload};

/// Squad feed contract the validator enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// String ids, only names required.
    V1,
    /// Numeric ids with slug, stats, flags and portrait.
    V2,
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::V1 => f.write_str("v1"),
            SchemaVersion::V2 => f.write_str("v2"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown squad schema version `{0}` (expected v1 or v2)")]
pub struct UnknownSchemaVersion(pub String);

impl FromStr for SchemaVersion {
    type Err = UnknownSchemaVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(SchemaVersion::V1),
            "v2" | "2" => Ok(SchemaVersion::V2),
            _ => Err(UnknownSchemaVersion(s.to_owned())),
        }
    }
}

/// First structural violation found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("{path}: required field is missing")]
    Missing { path: String },

    #[error("{path}: expected {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ValidationError {
    /// JSON path of the offending value, if the payload decoded at all.
    pub fn path(&self) -> Option<&str> {
        match self {
            ValidationError::Malformed(_) => None,
            ValidationError::Missing { path } | ValidationError::WrongType { path, .. } => {
                Some(path)
            }
        }
    }
}

/// Decode raw response bytes and validate them.
pub fn parse_squad(bytes: &[u8], version: SchemaVersion) -> Result<SquadPayload, ValidationError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    validate_squad(&value, version)
}

/// Validate an already-decoded payload.
pub fn validate_squad(
    value: &Value,
    version: SchemaVersion,
) -> Result<SquadPayload, ValidationError> {
    let root = Obj::root(value)?;
    let players = root
        .required_array("players")?
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let obj = Obj::new(entry, format!("players[{i}]"))?;
            match version {
                SchemaVersion::V1 => player_v1(&obj),
                SchemaVersion::V2 => player_v2(&obj),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SquadPayload { players })
}

fn player_v1(o: &Obj<'_>) -> Result<ExternalPlayer, ValidationError> {
    Ok(ExternalPlayer {
        id: PlayerId::Text(o.required("id")?),
        first_name: o.required("firstName")?,
        last_name: o.required("lastName")?,
        jersey_number: o.optional("jerseyNumber")?,
        position: o.optional("position")?,
        date_of_birth: o.optional("dateOfBirth")?,
        nationality: o.optional("nationality")?,
        slug: None,
        is_deactivated: None,
        image: None,
        matches: None,
        goals: None,
        flags: None,
        age: None,
    })
}

fn player_v2(o: &Obj<'_>) -> Result<ExternalPlayer, ValidationError> {
    let id = PlayerId::Numeric(o.required("id")?);
    let slug: String = o.required("slug")?;
    let first_name: String = o.required("firstName")?;
    let last_name: String = o.required("lastName")?;
    let is_deactivated: bool = o.required("isDeactivated")?;
    let position: String = o.required("position")?;
    let image = match o.nullable_object("image")? {
        None => None,
        Some(None) => Some(None),
        Some(Some(img)) => Some(Some(parse_image(&img)?)),
    };
    let jersey_number: Option<i64> = o.optional("jerseyNumber")?;
    let jersey_number = jersey_number.map(|n| n as f64);
    let matches: i64 = o.required("matches")?;
    let goals: i64 = o.required("goals")?;
    let flags = o.required_strings("flags")?;
    let age: i64 = o.required("age")?;

    Ok(ExternalPlayer {
        id,
        slug: Some(slug),
        first_name,
        last_name,
        is_deactivated: Some(is_deactivated),
        position: Some(position),
        image,
        jersey_number,
        matches: Some(matches),
        goals: Some(goals),
        flags: Some(flags),
        age: Some(age),
        date_of_birth: None,
        nationality: None,
    })
}

fn parse_image(o: &Obj<'_>) -> Result<ExternalImage, ValidationError> {
    Ok(ExternalImage {
        path: o.required("path")?,
        description: o.required("description")?,
        source: o.required("source")?,
        svg: o.required("svg")?,
    })
}

//////////////////////////////////////////////////
// Field access helpers
//////////////////////////////////////////////////

/// JSON scalar types the schema can declare.
trait Scalar: Sized {
    const EXPECTED: &'static str;
    fn from_json(v: &Value) -> Option<Self>;
}

impl Scalar for String {
    const EXPECTED: &'static str = "string";
    fn from_json(v: &Value) -> Option<Self> {
        v.as_str().map(str::to_owned)
    }
}

impl Scalar for i64 {
    const EXPECTED: &'static str = "integer";
    fn from_json(v: &Value) -> Option<Self> {
        v.as_i64()
    }
}

impl Scalar for f64 {
    const EXPECTED: &'static str = "number";
    fn from_json(v: &Value) -> Option<Self> {
        v.as_f64()
    }
}

impl Scalar for bool {
    const EXPECTED: &'static str = "boolean";
    fn from_json(v: &Value) -> Option<Self> {
        v.as_bool()
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(path: String, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::WrongType {
        path,
        expected,
        found: kind_of(found),
    }
}

/// A JSON object together with its path from the payload root.
struct Obj<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Obj<'a> {
    fn root(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Obj {
                map,
                path: String::new(),
            }),
            other => Err(wrong_type("payload".into(), "object", other)),
        }
    }

    fn new(value: &'a Value, path: String) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Obj { map, path }),
            other => Err(wrong_type(path, "object", other)),
        }
    }

    fn child(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn present(&self, key: &str) -> Result<&'a Value, ValidationError> {
        self.map.get(key).ok_or_else(|| ValidationError::Missing {
            path: self.child(key),
        })
    }

    fn required<T: Scalar>(&self, key: &str) -> Result<T, ValidationError> {
        let v = self.present(key)?;
        T::from_json(v).ok_or_else(|| wrong_type(self.child(key), T::EXPECTED, v))
    }

    fn optional<T: Scalar>(&self, key: &str) -> Result<Option<T>, ValidationError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(v) => T::from_json(v)
                .map(Some)
                .ok_or_else(|| wrong_type(self.child(key), T::EXPECTED, v)),
        }
    }

    fn required_array(&self, key: &str) -> Result<&'a [Value], ValidationError> {
        match self.present(key)? {
            Value::Array(items) => Ok(items),
            other => Err(wrong_type(self.child(key), "array", other)),
        }
    }

    fn required_strings(&self, key: &str) -> Result<Vec<String>, ValidationError> {
        let base = self.child(key);
        self.required_array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                String::from_json(v).ok_or_else(|| wrong_type(format!("{base}[{i}]"), "string", v))
            })
            .collect()
    }

    /// Absent → `None`, `null` → `Some(None)`, object → `Some(Some(_))`.
    fn nullable_object(&self, key: &str) -> Result<Option<Option<Obj<'a>>>, ValidationError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(v) => Obj::new(v, self.child(key)).map(|o| Some(Some(o))),
        }
    }
}
