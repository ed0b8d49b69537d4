// Strongly-typed IR for the validator generator: the type tree and the struct
// definitions it hangs off. Deserialized straight from the front-end's JSON dump.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ty {
    Void,                    // never valid as a field type; kept so the error path is real
    Bool,
    Integer { width: u8 },   // 8 | 16 | 32 | 64, checked at generation time
    Double,
    String,
    Binary,
    Enum { name: String },
    List { elem: Box<Ty> },
    Set { elem: Box<Ty> },
    Map { key: Box<Ty>, value: Box<Ty> },
    Struct { name: String },
    Exception { name: String },
    Alias { name: String, target: Box<Ty> },
}

impl Ty {
    /// Unwind typedef chains down to the underlying type.
    pub fn resolve(&self) -> &Ty {
        let mut ty = self;
        while let Ty::Alias { target, .. } = ty {
            ty = target;
        }
        ty
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Ty::Alias { .. })
    }

    /// Human-readable IDL spelling, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Ty::Void => "void".into(),
            Ty::Bool => "bool".into(),
            Ty::Integer { width: 8 } => "byte".into(),
            Ty::Integer { width } => format!("i{width}"),
            Ty::Double => "double".into(),
            Ty::String => "string".into(),
            Ty::Binary => "binary".into(),
            Ty::Enum { name }
            | Ty::Struct { name }
            | Ty::Exception { name }
            | Ty::Alias { name, .. } => name.clone(),
            Ty::List { elem } => format!("list<{}>", elem.describe()),
            Ty::Set { elem } => format!("set<{}>", elem.describe()),
            Ty::Map { key, value } => format!("map<{},{}>", key.describe(), value.describe()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requiredness {
    Required,
    Optional,
    #[default]
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub id: Option<i16>,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Ty,
    #[serde(default)]
    pub requiredness: Requiredness,
    /// IDL default value, if declared. Only its presence matters: it decides
    /// whether Go Thrift holds an optional field behind a pointer.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Raw annotations in declaration order; repeated keys collect their values.
    #[serde(default)]
    pub annotations: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>, // declaration order drives emission order
}

impl StructDef {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One front-end dump: a Go package worth of structs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub package: String,
    #[serde(default)]
    pub structs: Vec<StructDef>,
}
