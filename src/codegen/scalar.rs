//! Checks for bool, integer, double, string/binary and enum values.

use crate::error::{CodegenError, Result};
use crate::ir::Ty;
use crate::naming;
use crate::rules::{Category, Literal, RuleKind, ValidationValue};

use super::{FieldContext, Generator, Operand, Source};

const UNSET_ENUM: &str = "<UNSET>";

impl Generator<'_> {
    pub(super) fn bool_checks(&mut self, ctx: &FieldContext<'_>, value: &str) -> Result<Source> {
        let mut out = Source::new();
        for rule in ctx.rules {
            let Some(arg) = rule.first_arg() else {
                self.skip_rule(ctx, rule);
                continue;
            };
            match rule.kind {
                RuleKind::Const => {
                    let arg = self.render(arg, Operand::Bool, rule.kind)?;
                    self.reject(&mut out, &format!("{value} != {arg}"), value, rule.kind);
                }
                _ => self.skip_rule(ctx, rule),
            }
        }
        Ok(out)
    }

    pub(super) fn integer_checks(&mut self, ctx: &FieldContext<'_>, value: &str, width: u8) -> Result<Source> {
        if !matches!(width, 8 | 16 | 32 | 64) {
            return Err(CodegenError::UnsupportedType { ty: format!("i{width}") });
        }
        let go_type = naming::go_type_name(ctx.ty).unwrap_or_else(|| format!("int{width}"));
        self.numeric_checks(ctx, value, &go_type, Operand::Int { width, go_type: &go_type })
    }

    pub(super) fn double_checks(&mut self, ctx: &FieldContext<'_>, value: &str) -> Result<Source> {
        let go_type = naming::go_type_name(ctx.ty).unwrap_or_else(|| "float64".to_string());
        self.numeric_checks(ctx, value, &go_type, Operand::Double { go_type: &go_type })
    }

    fn numeric_checks(
        &mut self,
        ctx: &FieldContext<'_>,
        value: &str,
        go_type: &str,
        operand: Operand<'_>,
    ) -> Result<Source> {
        let mut out = Source::new();
        for rule in ctx.rules {
            let Some(arg) = rule.first_arg() else {
                self.skip_rule(ctx, rule);
                continue;
            };
            match (rule.kind, rule.kind.violation_operator()) {
                (RuleKind::In | RuleKind::NotIn, _) => {
                    let items = rule
                        .args
                        .iter()
                        .map(|arg| self.render(arg, operand, rule.kind))
                        .collect::<Result<Vec<_>>>()?;
                    self.membership(&mut out, value, value, go_type, &items, rule.kind);
                }
                (RuleKind::MinSize | RuleKind::MaxSize, _) | (_, None) => self.skip_rule(ctx, rule),
                (kind, Some(op)) => {
                    let arg = self.render(arg, operand, kind)?;
                    self.reject(&mut out, &format!("{value} {op} {arg}"), value, kind);
                }
            }
        }
        Ok(out)
    }

    /// Binary and aliased strings are checked through a `string(...)` copy.
    pub(super) fn string_checks(&mut self, ctx: &FieldContext<'_>, value: &str) -> Result<Source> {
        let mut out = Source::new();
        let effective = ctx
            .rules
            .iter()
            .any(|rule| !rule.args.is_empty() && rule.kind.applies_to(Category::String));
        if !effective {
            ctx.rules.iter().for_each(|rule| self.skip_rule(ctx, rule));
            return Ok(out);
        }

        let coerce = matches!(ctx.ty.resolve(), Ty::Binary) || ctx.ty.is_alias();
        let target = if coerce {
            let tmp = self.names.fresh("_tgt");
            out.line(format!("{tmp} := string({value})"));
            tmp
        } else {
            value.to_string()
        };

        for rule in ctx.rules {
            let Some(arg) = rule.first_arg() else {
                self.skip_rule(ctx, rule);
                continue;
            };
            let kind = rule.kind;
            let violated = match kind {
                RuleKind::Const => format!("{target} != {}", self.render(arg, Operand::Str, kind)?),
                RuleKind::MinSize | RuleKind::MaxSize => {
                    let Some(op) = kind.violation_operator() else {
                        self.skip_rule(ctx, rule);
                        continue;
                    };
                    format!("len({target}) {op} {}", self.render(arg, Operand::Size, kind)?)
                }
                RuleKind::In | RuleKind::NotIn => {
                    let items = rule
                        .args
                        .iter()
                        .map(|arg| self.render(arg, Operand::Str, kind))
                        .collect::<Result<Vec<_>>>()?;
                    self.membership(&mut out, &target, value, "string", &items, kind);
                    continue;
                }
                RuleKind::Pattern => {
                    self.imports.regexp = true;
                    let pattern = self.render(arg, Operand::Str, kind)?;
                    format!("ok, _ := regexp.MatchString({pattern}, {target}); !ok")
                }
                RuleKind::Prefix | RuleKind::Suffix | RuleKind::Contains | RuleKind::NotContains => {
                    self.imports.strings = true;
                    let needle = self.render(arg, Operand::Str, kind)?;
                    match kind {
                        RuleKind::Prefix => format!("!strings.HasPrefix({target}, {needle})"),
                        RuleKind::Suffix => format!("!strings.HasSuffix({target}, {needle})"),
                        RuleKind::Contains => format!("!strings.Contains({target}, {needle})"),
                        _ => format!("strings.Contains({target}, {needle})"),
                    }
                }
                _ => {
                    self.skip_rule(ctx, rule);
                    continue;
                }
            };
            self.reject(&mut out, &violated, value, kind);
        }
        Ok(out)
    }

    pub(super) fn enum_checks(&mut self, ctx: &FieldContext<'_>, value: &str, name: &str) -> Result<Source> {
        let mut out = Source::new();
        for rule in ctx.rules {
            let Some(arg) = rule.first_arg() else {
                self.skip_rule(ctx, rule);
                continue;
            };
            let kind = rule.kind;
            let violated = match kind {
                RuleKind::Const => {
                    format!("{value} != {}", self.render(arg, Operand::Enum { name }, kind)?)
                }
                RuleKind::DefinedOnly => {
                    let unset = format!("({value}).String() == {}", naming::go_quote(UNSET_ENUM));
                    match arg {
                        ValidationValue::Literal(Literal::Bool(false)) => continue,
                        ValidationValue::Literal(Literal::Bool(true)) => unset,
                        other => format!("{} && {unset}", self.render(other, Operand::Bool, kind)?),
                    }
                }
                _ => {
                    self.skip_rule(ctx, rule);
                    continue;
                }
            };
            self.reject(&mut out, &violated, value, kind);
        }
        Ok(out)
    }

    /// Materialize the arguments as a slice and scan it.
    fn membership(
        &mut self,
        out: &mut Source,
        target: &str,
        label: &str,
        elem_type: &str,
        items: &[String],
        kind: RuleKind,
    ) {
        let src = self.names.fresh("_src");
        out.line(format!("{src} := []{elem_type}{{{}}}", items.join(", ")));

        if kind == RuleKind::NotIn {
            let item = self.names.fresh("_v");
            out.open(format!("for _, {item} := range {src}"));
            self.reject(out, &format!("{target} == {item}"), label, kind);
            out.close();
            return;
        }

        let exist = self.names.fresh("_exist");
        let item = self.names.fresh("_v");
        out.line(format!("{exist} := false"));
        out.open(format!("for _, {item} := range {src}"));
        out.open(format!("if {target} == {item}"));
        out.line(format!("{exist} = true"));
        out.line("break");
        out.close();
        out.close();
        self.reject(out, &format!("!{exist}"), label, kind);
    }
}
