//! Field types the converter understands and where it looks them up.

use core::fmt;
use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    Number,
    Keyword,
    Text,
    Date,
    Ip,
    Version,
    Boolean,
    Binary,
}

impl FieldType {
    /// Keyword and text, the types regexp, wildcard and fuzzy queries apply to.
    pub fn is_string(self) -> bool {
        matches!(self, FieldType::Keyword | FieldType::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            FieldType::Number => "number",
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Ip => "ip",
            FieldType::Version => "version",
            FieldType::Boolean => "boolean",
            FieldType::Binary => "binary",
        })
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" | "long" | "integer" | "short" | "byte" | "double" | "float"
            | "half_float" | "scaled_float" | "unsigned_long" => Ok(FieldType::Number),
            "keyword" | "constant_keyword" | "wildcard" => Ok(FieldType::Keyword),
            "text" | "match_only_text" => Ok(FieldType::Text),
            "date" | "date_nanos" => Ok(FieldType::Date),
            "ip" => Ok(FieldType::Ip),
            "version" => Ok(FieldType::Version),
            "boolean" => Ok(FieldType::Boolean),
            "binary" => Ok(FieldType::Binary),
            _ => Err(format!("unsupported field type `{}`", s)),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Property {
    pub fn new(ty: FieldType) -> Self {
        Self { ty, format: None }
    }

    pub fn with_format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }
}

impl From<FieldType> for Property {
    fn from(ty: FieldType) -> Self {
        Self::new(ty)
    }
}

/// Resolves a (dotted) field name to its type.
pub trait Schema {
    fn property(&self, field: &str) -> Option<&Property>;
}

impl Schema for HashMap<String, Property> {
    fn property(&self, field: &str) -> Option<&Property> {
        self.get(field)
    }
}

impl Schema for BTreeMap<String, Property> {
    fn property(&self, field: &str) -> Option<&Property> {
        self.get(field)
    }
}

/// Flat field name to property table.
///
/// Built by hand:
///
/// ```rust
/// use lucene2sql::schema::{FieldType, Mapping, Property, Schema};
///
/// let mapping = Mapping::new()
///     .field("name", FieldType::Text)
///     .field("ts", Property::new(FieldType::Date).with_format("epoch_second"));
///
/// assert_eq!(mapping.property("name").map(|p| p.ty), Some(FieldType::Text));
/// assert_eq!(mapping.property("age"), None);
/// ```
///
/// or loaded from an Elasticsearch mapping, where nested `properties` and
/// multi-`fields` become dotted names:
///
/// ```rust
/// use lucene2sql::schema::{FieldType, Mapping, Schema};
///
/// let mapping = Mapping::from_json(r#"{
///     "properties": {
///         "user": { "properties": { "id": { "type": "long" } } },
///         "title": { "type": "text", "fields": { "raw": { "type": "keyword" } } }
///     }
/// }"#).unwrap();
///
/// assert_eq!(mapping.property("user.id").map(|p| p.ty), Some(FieldType::Number));
/// assert_eq!(mapping.property("title.raw").map(|p| p.ty), Some(FieldType::Keyword));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    fields: HashMap<String, Property>,
}

#[derive(Deserialize)]
struct RawMapping {
    #[serde(default)]
    mappings: Option<Box<RawMapping>>,
    #[serde(default)]
    properties: BTreeMap<String, RawProperty>,
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(default, rename = "type")]
    ty: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, RawProperty>,
    #[serde(default)]
    fields: BTreeMap<String, RawProperty>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<S: Into<String>, P: Into<Property>>(mut self, name: S, prop: P) -> Self {
        self.fields.insert(name.into(), prop.into());
        self
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, prop: Property) -> Option<Property> {
        self.fields.insert(name.into(), prop)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: RawMapping =
            serde_json::from_str(json).map_err(|e| Error::Mapping(e.to_string()))?;
        let root = match raw.mappings {
            Some(inner) => *inner,
            None => raw,
        };
        let mut mapping = Mapping::new();
        mapping.flatten("", &root.properties);
        Ok(mapping)
    }

    fn flatten(&mut self, prefix: &str, props: &BTreeMap<String, RawProperty>) {
        for (name, raw) in props {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            match raw.ty.as_deref() {
                None | Some("object") | Some("nested") => {}
                Some(ty) => match ty.parse::<FieldType>() {
                    Ok(ty) => {
                        self.fields.insert(
                            path.clone(),
                            Property {
                                ty,
                                format: raw.format.clone(),
                            },
                        );
                    }
                    Err(e) => warn!("skipping field `{}`: {}", path, e),
                },
            }
            self.flatten(&path, &raw.properties);
            self.flatten(&path, &raw.fields);
        }
    }
}

impl Schema for Mapping {
    fn property(&self, field: &str) -> Option<&Property> {
        self.fields.get(field)
    }
}

impl FromIterator<(String, Property)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (String, Property)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::schema::{FieldType, Mapping, Property, Schema};

    #[test]
    fn test_field_type_names() {
        let tests = [
            ("long", Ok(FieldType::Number)),
            ("scaled_float", Ok(FieldType::Number)),
            ("number", Ok(FieldType::Number)),
            ("constant_keyword", Ok(FieldType::Keyword)),
            ("match_only_text", Ok(FieldType::Text)),
            ("date_nanos", Ok(FieldType::Date)),
            ("ip", Ok(FieldType::Ip)),
            ("version", Ok(FieldType::Version)),
            ("boolean", Ok(FieldType::Boolean)),
            ("binary", Ok(FieldType::Binary)),
            ("geo_point", Err("unsupported field type `geo_point`".to_string())),
        ];
        for (input, expected) in tests {
            assert_eq!(input.parse::<FieldType>(), expected, "{}", input);
        }
        assert!(FieldType::Keyword.is_string());
        assert!(FieldType::Text.is_string());
        assert!(!FieldType::Ip.is_string());
    }

    #[test]
    fn test_mapping_from_json() {
        let mapping = Mapping::from_json(
            r#"{
                "mappings": {
                    "properties": {
                        "ts": { "type": "date", "format": "yyyy-MM-dd||epoch_millis" },
                        "location": { "type": "geo_point" },
                        "host": {
                            "type": "object",
                            "properties": {
                                "ip": { "type": "ip" },
                                "os": { "properties": { "version": { "type": "version" } } }
                            }
                        },
                        "msg": { "type": "text", "fields": { "keyword": { "type": "keyword" } } }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(mapping.len(), 5);
        assert_eq!(
            mapping.property("ts"),
            Some(&Property::new(FieldType::Date).with_format("yyyy-MM-dd||epoch_millis"))
        );
        assert_eq!(mapping.property("host.ip"), Some(&Property::new(FieldType::Ip)));
        assert_eq!(
            mapping.property("host.os.version"),
            Some(&Property::new(FieldType::Version))
        );
        assert_eq!(mapping.property("msg"), Some(&Property::new(FieldType::Text)));
        assert_eq!(
            mapping.property("msg.keyword"),
            Some(&Property::new(FieldType::Keyword))
        );
        assert_eq!(mapping.property("host"), None);
        assert_eq!(mapping.property("location"), None);
    }

    #[test]
    fn test_mapping_from_bad_json() {
        assert!(matches!(Mapping::from_json("{"), Err(Error::Mapping(_))));
        assert!(matches!(
            Mapping::from_json(r#"{"properties": []}"#),
            Err(Error::Mapping(_))
        ));
        assert_eq!(Mapping::from_json("{}"), Ok(Mapping::new()));
    }

    #[test]
    fn test_property_serde() {
        let prop: Property = serde_json::from_str(r#"{"type": "integer"}"#).unwrap();
        assert_eq!(prop, Property::new(FieldType::Number));
        assert_eq!(serde_json::to_string(&prop).unwrap(), r#"{"type":"number"}"#);
        assert!(serde_json::from_str::<Property>(r#"{"type": "shape"}"#).is_err());
    }
}
