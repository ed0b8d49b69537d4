//! Go naming conventions for Thrift-generated code: how a field is reached
//! from the `p` receiver, and how IDL identifiers map to Go identifiers.

use crate::ir::{Field, Requiredness, Ty};

pub const RECEIVER: &str = "p";
pub const VALIDATOR_METHOD: &str = "IsValid";

/// Upper-cased when they end a name after a `_`, as Go Thrift does.
const COMMON_INITIALISMS: &[&str] = &[
    "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
    "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SSH", "TCP", "TLS", "TTL", "UDP",
    "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XSRF", "XSS",
];

/// How generated code reaches one field's current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    pub expr: String,  // `p.Name`, never dereferenced
    pub pointer: bool, // Go holds the field behind a pointer
}

impl FieldAccess {
    pub fn of(field: &Field) -> Self {
        FieldAccess {
            expr: format!("{RECEIVER}.{}", publicize(&field.name)),
            pointer: is_pointer_field(field),
        }
    }

    /// Expression yielding the value itself.
    pub fn value_expr(&self) -> String {
        if self.pointer {
            format!("*{}", self.expr)
        } else {
            self.expr.clone()
        }
    }
}

/// Optional scalars and enums are pointers unless they carry a default;
/// optional containers only when they do. Binary stays a plain `[]byte`.
/// Structs are always pointers in Go Thrift, but they are never
/// dereferenced here, so they report `false`.
fn is_pointer_field(field: &Field) -> bool {
    if field.requiredness != Requiredness::Optional {
        return false;
    }
    let has_default = field.default.is_some();
    match field.ty.resolve() {
        Ty::Bool | Ty::Integer { .. } | Ty::Double | Ty::String | Ty::Enum { .. } => !has_default,
        Ty::List { .. } | Ty::Set { .. } | Ty::Map { .. } => has_default,
        Ty::Binary | Ty::Struct { .. } | Ty::Exception { .. } | Ty::Void | Ty::Alias { .. } => false,
    }
}

/// Go Thrift identifier for an IDL name: `user_name` -> `UserName`,
/// `user_id` -> `UserID`, `new_value` -> `NewValue_`. A package qualifier
/// (`shared.user_id`) is kept as is.
pub fn publicize(name: &str) -> String {
    let (prefix, base) = match name.rfind('.') {
        Some(dot) => name.split_at(dot + 1),
        None => ("", name),
    };
    let mut chars: Vec<char> = base.chars().collect();
    let Some(first) = chars.first_mut() else {
        return name.to_string();
    };
    *first = first.to_ascii_uppercase();

    let mut i = 1;
    while i + 1 < chars.len() {
        if chars[i] == '_' {
            if chars[i + 1].is_ascii_lowercase() {
                chars.remove(i);
                chars[i] = chars[i].to_ascii_uppercase();
            }
            // Same word slice as Go Thrift: it reaches past the next `_`, so
            // only a trailing word is ever an initialism (`owner_id_list`
            // stays `OwnerIdList`).
            let end = match chars[i..].iter().position(|&c| c == '_') {
                Some(offset) => (i + i + offset).min(chars.len()),
                None => chars.len(),
            };
            let word: String = chars[i..end].iter().collect::<String>().to_ascii_uppercase();
            if COMMON_INITIALISMS.contains(&word.as_str()) {
                chars.splice(i..end, word.chars());
            }
        }
        i += 1;
    }

    let mut out: String = chars.into_iter().collect();
    // Go Thrift reserves these shapes for constructors and service helpers
    let helper_suffix = out.ends_with("Args") || out.ends_with("Result");
    if out.starts_with("New") {
        out.push('_');
    }
    if helper_suffix {
        out.push('_');
    }
    format!("{prefix}{out}")
}

/// Go spelling of a (declared, possibly aliased) scalar type.
pub fn go_type_name(ty: &Ty) -> Option<String> {
    Some(match ty {
        Ty::Alias { name, .. } => publicize(name),
        Ty::Bool => "bool".into(),
        Ty::Integer { width: w @ (8 | 16 | 32 | 64) } => format!("int{w}"),
        Ty::Double => "float64".into(),
        Ty::String => "string".into(),
        Ty::Binary => "[]byte".into(),
        Ty::Enum { name } => publicize(name),
        _ => return None,
    })
}

/// Thrift-Go enum constant: `Color_RED`. Accepts `RED` or `Color.RED`.
pub fn enum_constant(enum_name: &str, value: &str) -> String {
    let value = value.rsplit('.').next().unwrap_or(value);
    format!("{}_{}", publicize(enum_name), value)
}

/// Quote a Go interpreted string literal.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
