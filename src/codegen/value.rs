//! Rule arguments as Go expressions.
//!
//! Every emitter goes through [`Generator::render`], so literals, sibling
//! references and `@len(...)` calls are handled the same way for every rule
//! family. The [`Operand`] says what the argument is compared against and
//! picks the conversion.

use crate::error::{CodegenError, Result};
use crate::naming::{self, FieldAccess};
use crate::rules::{FunctionCall, Literal, RuleKind, ValidationValue};

use super::Generator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'t> {
    Bool,
    /// Integer of an exact width; `go_type` is the declared Go type.
    Int { width: u8, go_type: &'t str },
    Double { go_type: &'t str },
    Str,
    /// A length, compared with `len(...)`.
    Size,
    Enum { name: &'t str },
}

impl Operand<'_> {
    fn describe(&self) -> &'static str {
        match self {
            Operand::Bool => "bool",
            Operand::Int { .. } | Operand::Size => "integer",
            Operand::Double { .. } => "double",
            Operand::Str => "string",
            Operand::Enum { .. } => "enum value",
        }
    }
}

impl Generator<'_> {
    pub(super) fn render(
        &self,
        value: &ValidationValue,
        operand: Operand<'_>,
        rule: RuleKind,
    ) -> Result<String> {
        match value {
            ValidationValue::Literal(literal) => render_literal(literal, operand, rule),
            ValidationValue::FieldRef(name) => {
                let expr = self.sibling(name)?.value_expr();
                Ok(match operand {
                    Operand::Bool | Operand::Enum { .. } => expr,
                    Operand::Int { go_type, .. } | Operand::Double { go_type } => {
                        format!("{go_type}({expr})")
                    }
                    Operand::Str => format!("string({expr})"),
                    Operand::Size => format!("int({expr})"),
                })
            }
            ValidationValue::Call(call) => self.render_call(call, operand, rule),
        }
    }

    fn render_call(&self, call: &FunctionCall, operand: Operand<'_>, rule: RuleKind) -> Result<String> {
        if call.name != "len" {
            return Err(CodegenError::UnsupportedFunction { name: call.name.clone() });
        }
        let [ValidationValue::FieldRef(name)] = call.args.as_slice() else {
            return Err(CodegenError::InvalidLiteral {
                rule: rule.name(),
                value: format!("@len with {} argument(s)", call.args.len()),
                expected: "single field reference",
            });
        };
        let length = format!("len({})", self.sibling(name)?.value_expr());
        match operand {
            Operand::Size => Ok(length),
            Operand::Int { go_type, .. } | Operand::Double { go_type } => Ok(format!("{go_type}({length})")),
            Operand::Bool | Operand::Str | Operand::Enum { .. } => Err(CodegenError::InvalidLiteral {
                rule: rule.name(),
                value: format!("@len(${name})"),
                expected: operand.describe(),
            }),
        }
    }

    fn sibling(&self, name: &str) -> Result<FieldAccess> {
        self.strukt
            .field(name)
            .map(FieldAccess::of)
            .ok_or_else(|| CodegenError::UnknownField { field: name.to_string() })
    }
}

fn render_literal(literal: &Literal, operand: Operand<'_>, rule: RuleKind) -> Result<String> {
    Ok(match (operand, literal) {
        (Operand::Bool, Literal::Bool(b)) => b.to_string(),
        (Operand::Int { width, .. }, Literal::Int(v)) => {
            if !fits_width(*v, width) {
                return Err(CodegenError::LiteralOutOfRange { value: *v, width });
            }
            v.to_string()
        }
        (Operand::Size, Literal::Int(v)) => v.to_string(),
        (Operand::Double { .. }, Literal::Double(x)) => format!("{x:?}"),
        (Operand::Double { .. }, Literal::Int(v)) => v.to_string(),
        (Operand::Str, Literal::Str(s)) => naming::go_quote(s),
        (Operand::Enum { name }, Literal::Str(s)) => naming::enum_constant(name, s),
        (operand, literal) => {
            return Err(CodegenError::InvalidLiteral {
                rule: rule.name(),
                value: format!("{literal:?}"),
                expected: operand.describe(),
            });
        }
    })
}

fn fits_width(v: i64, width: u8) -> bool {
    if width >= 64 {
        return true;
    }
    let Some(shift) = width.checked_sub(1) else {
        return false;
    };
    let half = 1i64 << shift;
    (-half..half).contains(&v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::tests::{lit_bool, lit_int, strukt};
    use serde_json::json;

    fn sample() -> crate::ir::StructDef {
        strukt(json!([
            { "name": "limit", "type": { "integer": { "width": 64 } }, "requiredness": "optional" },
            { "name": "names", "type": { "list": { "elem": "string" } } },
            { "name": "label", "type": "string" },
            { "name": "flag", "type": "bool", "requiredness": "optional" }
        ]))
    }

    fn len_of(field: &str) -> ValidationValue {
        ValidationValue::Call(FunctionCall {
            name: "len".into(),
            args: vec![ValidationValue::FieldRef(field.into())],
        })
    }

    #[test]
    fn literals_follow_operand() {
        let s = sample();
        let g = Generator::new(&s);
        let i16_ = Operand::Int { width: 16, go_type: "int16" };
        assert_eq!(g.render(&lit_int(-7), i16_, RuleKind::Gt).unwrap(), "-7");
        assert_eq!(g.render(&lit_bool(true), Operand::Bool, RuleKind::Const).unwrap(), "true");
        let half = ValidationValue::Literal(Literal::Double(0.5));
        assert_eq!(g.render(&half, Operand::Double { go_type: "float64" }, RuleKind::Lt).unwrap(), "0.5");
        let two = ValidationValue::Literal(Literal::Double(2.0));
        assert_eq!(g.render(&two, Operand::Double { go_type: "float64" }, RuleKind::Lt).unwrap(), "2.0");
        let red = ValidationValue::Literal(Literal::Str("Color.RED".into()));
        assert_eq!(g.render(&red, Operand::Enum { name: "Color" }, RuleKind::Const).unwrap(), "Color_RED");
        let quoted = ValidationValue::Literal(Literal::Str("a\"b".into()));
        assert_eq!(g.render(&quoted, Operand::Str, RuleKind::Const).unwrap(), r#""a\"b""#);
    }

    #[test]
    fn integer_literals_are_range_checked() {
        let s = sample();
        let g = Generator::new(&s);
        let i8_ = Operand::Int { width: 8, go_type: "int8" };
        assert_eq!(g.render(&lit_int(127), i8_, RuleKind::Le).unwrap(), "127");
        assert_eq!(g.render(&lit_int(-128), i8_, RuleKind::Ge).unwrap(), "-128");
        assert!(matches!(
            g.render(&lit_int(128), i8_, RuleKind::Le),
            Err(CodegenError::LiteralOutOfRange { value: 128, width: 8 })
        ));
        let i64_ = Operand::Int { width: 64, go_type: "int64" };
        assert_eq!(g.render(&lit_int(i64::MIN), i64_, RuleKind::Ge).unwrap(), i64::MIN.to_string());
    }

    #[test]
    fn references_are_converted_for_the_operand() {
        let s = sample();
        let g = Generator::new(&s);
        let limit = ValidationValue::FieldRef("limit".into());
        let i32_ = Operand::Int { width: 32, go_type: "int32" };
        assert_eq!(g.render(&limit, i32_, RuleKind::Lt).unwrap(), "int32(*p.Limit)");
        assert_eq!(g.render(&limit, Operand::Size, RuleKind::MaxSize).unwrap(), "int(*p.Limit)");
        let label = ValidationValue::FieldRef("label".into());
        assert_eq!(g.render(&label, Operand::Str, RuleKind::In).unwrap(), "string(p.Label)");
        let flag = ValidationValue::FieldRef("flag".into());
        assert_eq!(g.render(&flag, Operand::Bool, RuleKind::Skip).unwrap(), "*p.Flag");
    }

    #[test]
    fn len_calls_render_as_length_of_sibling() {
        let s = sample();
        let g = Generator::new(&s);
        let len_names = len_of("names");
        assert_eq!(g.render(&len_names, Operand::Size, RuleKind::MinSize).unwrap(), "len(p.Names)");
        let i8_ = Operand::Int { width: 8, go_type: "int8" };
        assert_eq!(g.render(&len_names, i8_, RuleKind::Le).unwrap(), "int8(len(p.Names))");
        assert!(matches!(
            g.render(&len_names, Operand::Str, RuleKind::Const),
            Err(CodegenError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn unknown_functions_and_fields_fail() {
        let s = sample();
        let g = Generator::new(&s);
        let call = ValidationValue::Call(FunctionCall { name: "sum".into(), args: vec![] });
        assert!(matches!(
            g.render(&call, Operand::Size, RuleKind::MinSize),
            Err(CodegenError::UnsupportedFunction { ref name }) if name == "sum"
        ));
        assert!(matches!(
            g.render(&len_of("missing"), Operand::Size, RuleKind::MinSize),
            Err(CodegenError::UnknownField { .. })
        ));
        assert!(matches!(
            g.render(&lit_bool(true), Operand::Size, RuleKind::MinSize),
            Err(CodegenError::InvalidLiteral { expected: "integer", .. })
        ));
    }
}
