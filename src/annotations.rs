//! `vt.*` annotation parser: raw field annotations -> structured [`Rule`]s.
//!
//! Key grammar: `vt.<rule>` or `vt.<elem|key|value>.<...>.<rule>`, each nesting
//! segment stepping into the element, key or value type. Value grammar:
//! `$field` (sibling reference), `@func(arg, ...)` (derived call), otherwise a
//! literal whose type follows from the rule and the field type.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CodegenError, Result};
use crate::ir::{Field, StructDef, Ty};
use crate::rules::{Category, FunctionCall, Literal, Rule, RuleKind, ValidationValue};

const RULE_PREFIX: &str = "vt.";

static CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([A-Za-z_][A-Za-z0-9_]*)\((.*)\)$").unwrap());

static ENUM_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*\.)?[A-Za-z_][A-Za-z0-9_]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralKind {
    Bool,
    Int,
    Double,
    Str,
    EnumValue,
}

impl LiteralKind {
    fn describe(self) -> &'static str {
        match self {
            LiteralKind::Bool => "bool",
            LiteralKind::Int => "integer",
            LiteralKind::Double => "double",
            LiteralKind::Str => "string",
            LiteralKind::EnumValue => "enum value",
        }
    }
}

/// Parse every `vt.*` annotation on `field`, in annotation order.
pub fn parse_field(strukt: &StructDef, field: &Field) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    for (key, values) in &field.annotations {
        let Some(path) = key.strip_prefix(RULE_PREFIX) else {
            continue;
        };
        let segments: Vec<&str> = path.split('.').collect();
        rules.extend(parse_key(strukt, key, &segments, &field.ty, values)?);
    }
    Ok(rules)
}

fn parse_key(
    strukt: &StructDef,
    key: &str,
    segments: &[&str],
    ty: &Ty,
    values: &[String],
) -> Result<Vec<Rule>> {
    let Some((head, rest)) = segments.split_first() else {
        return Err(malformed(key, "missing rule name"));
    };
    let kind = RuleKind::from_segment(head)
        .ok_or_else(|| CodegenError::UnknownRule { key: key.to_string() })?;
    let category = Category::of(ty)
        .ok_or_else(|| CodegenError::UnsupportedType { ty: ty.describe() })?;
    if !kind.applies_to(category) {
        return Err(CodegenError::InapplicableRule { rule: kind.name(), ty: ty.describe() });
    }

    if kind.is_nesting() {
        if rest.is_empty() {
            return Err(malformed(key, "expected a nested rule after the container selector"));
        }
        let component = component_type(kind, ty)?;
        let inner = parse_key(strukt, key, rest, component, values)?;
        return Ok(inner.into_iter().map(|rule| Rule::nested(kind, rule)).collect());
    }
    if !rest.is_empty() {
        return Err(malformed(key, "unexpected segment after rule name"));
    }

    if values.is_empty() {
        tracing::warn!(key, "validation annotation has no values; rule will be ignored");
        return Ok(vec![Rule::new(kind, Vec::new())]);
    }

    if kind.takes_list() {
        let args = values
            .iter()
            .map(|raw| parse_value(strukt, kind, ty, raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(vec![Rule::new(kind, args)])
    } else {
        values
            .iter()
            .map(|raw| Ok(Rule::new(kind, vec![parse_value(strukt, kind, ty, raw)?])))
            .collect()
    }
}

fn component_type(kind: RuleKind, ty: &Ty) -> Result<&Ty> {
    match (kind, ty.resolve()) {
        (RuleKind::Elem, Ty::List { elem } | Ty::Set { elem }) => Ok(elem),
        (RuleKind::Key, Ty::Map { key, .. }) => Ok(key),
        (RuleKind::Value, Ty::Map { value, .. }) => Ok(value),
        _ => Err(CodegenError::InapplicableRule { rule: kind.name(), ty: ty.describe() }),
    }
}

fn parse_value(strukt: &StructDef, kind: RuleKind, ty: &Ty, raw: &str) -> Result<ValidationValue> {
    if let Some(name) = raw.strip_prefix('$') {
        return parse_reference(strukt, kind, name.trim());
    }
    // `@` alone is not a call: `vt.contains: ["@"]` is a plain string
    if let Some(caps) = CALL.captures(raw.trim()) {
        let args = caps[2]
            .split(',')
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .map(|arg| match arg.strip_prefix('$') {
                Some(name) => parse_reference(strukt, kind, name),
                None => Ok(ValidationValue::Literal(Literal::Str(arg.to_string()))),
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(ValidationValue::Call(FunctionCall { name: caps[1].to_string(), args }));
    }

    let expected = literal_kind(kind, ty);
    let invalid = || CodegenError::InvalidLiteral {
        rule: kind.name(),
        value: raw.to_string(),
        expected: expected.describe(),
    };
    let literal = match expected {
        LiteralKind::Bool => match raw.trim() {
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            _ => return Err(invalid()),
        },
        LiteralKind::Int => Literal::Int(raw.trim().parse().map_err(|_| invalid())?),
        LiteralKind::Double => {
            let x: f64 = raw.trim().parse().map_err(|_| invalid())?;
            if !x.is_finite() {
                return Err(invalid());
            }
            Literal::Double(x)
        }
        LiteralKind::EnumValue => {
            let value = raw.trim();
            if !ENUM_VALUE.is_match(value) {
                return Err(invalid());
            }
            Literal::Str(value.to_string())
        }
        LiteralKind::Str => {
            if kind == RuleKind::Pattern {
                Regex::new(raw).map_err(|source| CodegenError::InvalidPattern {
                    rule: kind.name(),
                    pattern: raw.to_string(),
                    source,
                })?;
            }
            Literal::Str(raw.to_string())
        }
    };
    Ok(ValidationValue::Literal(literal))
}

fn parse_reference(strukt: &StructDef, kind: RuleKind, name: &str) -> Result<ValidationValue> {
    let target = strukt
        .field(name)
        .ok_or_else(|| CodegenError::UnknownField { field: name.to_string() })?;
    let needs_bool = matches!(kind, RuleKind::Skip | RuleKind::DefinedOnly);
    if needs_bool && !matches!(target.ty.resolve(), Ty::Bool) {
        return Err(CodegenError::InvalidReference {
            rule: kind.name(),
            field: name.to_string(),
            expected: "bool",
        });
    }
    Ok(ValidationValue::FieldRef(name.to_string()))
}

fn literal_kind(kind: RuleKind, ty: &Ty) -> LiteralKind {
    match kind {
        RuleKind::Skip | RuleKind::DefinedOnly => return LiteralKind::Bool,
        RuleKind::MinSize | RuleKind::MaxSize => return LiteralKind::Int,
        _ => {}
    }
    match ty.resolve() {
        Ty::Bool => LiteralKind::Bool,
        Ty::Integer { .. } => LiteralKind::Int,
        Ty::Double => LiteralKind::Double,
        Ty::Enum { .. } => LiteralKind::EnumValue,
        _ => LiteralKind::Str,
    }
}

fn malformed(key: &str, reason: &str) -> CodegenError {
    CodegenError::MalformedAnnotation { key: key.to_string(), reason: reason.to_string() }
}
