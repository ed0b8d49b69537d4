//! Validation rule model.
//!
//! Rules arrive already structured (see [`crate::annotations`]); the
//! generator only ever reads them. Rule names are a closed set so an
//! unknown `vt.*` key is rejected at parse time instead of being ignored.

use serde::Serialize;

use crate::ir::Ty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Const,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    MinSize,
    MaxSize,
    Pattern,
    Prefix,
    Suffix,
    Contains,
    NotContains,
    DefinedOnly,
    Skip,
    Elem,
    Key,
    Value,
}

/// Coarse category of a resolved type; what rule applicability is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Bool,
    Integer,
    Double,
    String,
    Binary,
    Enum,
    List,
    Set,
    Map,
    Struct,
}

impl Category {
    pub fn of(ty: &Ty) -> Option<Category> {
        Some(match ty.resolve() {
            Ty::Bool => Category::Bool,
            Ty::Integer { .. } => Category::Integer,
            Ty::Double => Category::Double,
            Ty::String => Category::String,
            Ty::Binary => Category::Binary,
            Ty::Enum { .. } => Category::Enum,
            Ty::List { .. } => Category::List,
            Ty::Set { .. } => Category::Set,
            Ty::Map { .. } => Category::Map,
            Ty::Struct { .. } | Ty::Exception { .. } => Category::Struct,
            Ty::Void | Ty::Alias { .. } => return None,
        })
    }
}

impl RuleKind {
    pub const ALL: [RuleKind; 19] = [
        RuleKind::Const,
        RuleKind::Lt,
        RuleKind::Le,
        RuleKind::Gt,
        RuleKind::Ge,
        RuleKind::In,
        RuleKind::NotIn,
        RuleKind::MinSize,
        RuleKind::MaxSize,
        RuleKind::Pattern,
        RuleKind::Prefix,
        RuleKind::Suffix,
        RuleKind::Contains,
        RuleKind::NotContains,
        RuleKind::DefinedOnly,
        RuleKind::Skip,
        RuleKind::Elem,
        RuleKind::Key,
        RuleKind::Value,
    ];

    /// Annotation key, also the rule name reported by generated failures.
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::Const => "vt.const",
            RuleKind::Lt => "vt.lt",
            RuleKind::Le => "vt.le",
            RuleKind::Gt => "vt.gt",
            RuleKind::Ge => "vt.ge",
            RuleKind::In => "vt.in",
            RuleKind::NotIn => "vt.not_in",
            RuleKind::MinSize => "vt.min_size",
            RuleKind::MaxSize => "vt.max_size",
            RuleKind::Pattern => "vt.pattern",
            RuleKind::Prefix => "vt.prefix",
            RuleKind::Suffix => "vt.suffix",
            RuleKind::Contains => "vt.contains",
            RuleKind::NotContains => "vt.not_contains",
            RuleKind::DefinedOnly => "vt.defined_only",
            RuleKind::Skip => "vt.skip",
            RuleKind::Elem => "vt.elem",
            RuleKind::Key => "vt.key",
            RuleKind::Value => "vt.value",
        }
    }

    /// Parse the segment after `vt.`.
    pub fn from_segment(segment: &str) -> Option<RuleKind> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| &kind.name()["vt.".len()..] == segment)
    }

    /// Go operator that holds when the value VIOLATES the bound.
    pub fn violation_operator(self) -> Option<&'static str> {
        match self {
            RuleKind::Const => Some("!="),
            RuleKind::Lt => Some(">="),
            RuleKind::Le => Some(">"),
            RuleKind::Gt => Some("<="),
            RuleKind::Ge => Some("<"),
            RuleKind::MinSize => Some("<"),
            RuleKind::MaxSize => Some(">"),
            _ => None,
        }
    }

    /// Rules that wrap a nested rule for container components.
    pub fn is_nesting(self) -> bool {
        matches!(self, RuleKind::Elem | RuleKind::Key | RuleKind::Value)
    }

    /// All values of the annotation key form one argument list.
    pub fn takes_list(self) -> bool {
        matches!(self, RuleKind::In | RuleKind::NotIn)
    }

    pub fn applies_to(self, category: Category) -> bool {
        use Category as C;
        match self {
            RuleKind::Const => matches!(
                category,
                C::Bool | C::Integer | C::Double | C::String | C::Binary | C::Enum
            ),
            RuleKind::Lt | RuleKind::Le | RuleKind::Gt | RuleKind::Ge => {
                matches!(category, C::Integer | C::Double)
            }
            RuleKind::In | RuleKind::NotIn => {
                matches!(category, C::Integer | C::Double | C::String | C::Binary)
            }
            RuleKind::MinSize | RuleKind::MaxSize => {
                matches!(category, C::String | C::Binary | C::List | C::Set | C::Map)
            }
            RuleKind::Pattern
            | RuleKind::Prefix
            | RuleKind::Suffix
            | RuleKind::Contains
            | RuleKind::NotContains => matches!(category, C::String | C::Binary),
            RuleKind::DefinedOnly => category == C::Enum,
            RuleKind::Skip => category == C::Struct,
            RuleKind::Elem => matches!(category, C::List | C::Set),
            RuleKind::Key | RuleKind::Value => category == C::Map,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<ValidationValue>,
}

/// A rule argument: a constant, a sibling field, or a derived call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationValue {
    Literal(Literal),
    FieldRef(String),
    Call(FunctionCall),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub kind: RuleKind,
    pub args: Vec<ValidationValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<Rule>>,
}

impl Rule {
    pub fn new(kind: RuleKind, args: Vec<ValidationValue>) -> Self {
        Rule { kind, args, inner: None }
    }

    pub fn nested(kind: RuleKind, inner: Rule) -> Self {
        Rule { kind, args: Vec::new(), inner: Some(Box::new(inner)) }
    }

    // NOTE: a rule without arguments or nested rule is skipped, not rejected.
    // That is how the annotation front-end has always behaved and it may hide
    // parser defects upstream.
    pub fn is_noop(&self) -> bool {
        self.args.is_empty() && self.inner.is_none()
    }

    pub fn first_arg(&self) -> Option<&ValidationValue> {
        self.args.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_names_round_trip_through_segments() {
        for kind in RuleKind::ALL {
            let segment = kind.name().strip_prefix("vt.").unwrap();
            assert_eq!(RuleKind::from_segment(segment), Some(kind));
        }
        assert_eq!(RuleKind::from_segment("lenght"), None);
    }

    #[test]
    fn ordering_bounds_are_numeric_only() {
        assert!(RuleKind::Lt.applies_to(Category::Integer));
        assert!(RuleKind::Ge.applies_to(Category::Double));
        assert!(!RuleKind::Gt.applies_to(Category::String));
        assert!(!RuleKind::Le.applies_to(Category::Enum));
        assert!(RuleKind::Const.applies_to(Category::Enum));
        assert!(!RuleKind::In.applies_to(Category::Enum));
    }

    #[test]
    fn category_sees_through_aliases() {
        let ty = Ty::Alias { name: "Tags".into(), target: Box::new(Ty::Set { elem: Box::new(Ty::String) }) };
        assert_eq!(Category::of(&ty), Some(Category::Set));
        assert_eq!(Category::of(&Ty::Void), None);
    }

    #[test]
    fn empty_rule_is_noop_but_nested_rule_is_not() {
        assert!(Rule::new(RuleKind::Gt, vec![]).is_noop());
        let nested = Rule::nested(RuleKind::Elem, Rule::new(RuleKind::Gt, vec![]));
        assert!(!nested.is_noop());
    }
}
