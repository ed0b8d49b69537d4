use crate::error::Result;
use crate::rules::{Literal, RuleKind, ValidationValue};

use super::{FieldContext, Generator, Operand, Source};

impl Generator<'_> {
    /// Delegate to the nested structure's own `IsValid`. Only the last
    /// `vt.skip` with an argument decides whether, and when, that happens.
    pub(super) fn struct_checks(&mut self, ctx: &FieldContext<'_>) -> Result<Source> {
        let mut skip = None;
        for rule in ctx.rules {
            match (rule.kind, rule.first_arg()) {
                (RuleKind::Skip, Some(arg)) => skip = Some(arg),
                _ => self.skip_rule(ctx, rule),
            }
        }

        let mut call = Source::new();
        call.open(format!("if err := {}.IsValid(); err != nil", ctx.target));
        call.line("return err");
        call.close();

        match skip {
            None | Some(ValidationValue::Literal(Literal::Bool(false))) => Ok(call),
            Some(ValidationValue::Literal(Literal::Bool(true))) => Ok(Source::new()),
            Some(flag) => {
                let flag = self.render(flag, Operand::Bool, RuleKind::Skip)?;
                let mut out = Source::new();
                out.block(format!("if !{flag}"), call);
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::tests::{lit_bool, strukt};
    use crate::codegen::{generate_struct, FieldContext, Generator};
    use crate::ir::Ty;
    use crate::rules::{Rule, RuleKind, ValidationValue};
    use serde_json::json;

    const CALL: &str = "if err := p.Inner.IsValid(); err != nil {\n\treturn err\n}\n";

    fn emit(rules: Vec<Rule>) -> String {
        let s = strukt(json!([
            { "name": "lazy", "type": "bool" },
            { "name": "maybe", "type": "bool", "requiredness": "optional" }
        ]));
        let ty = Ty::Struct { name: "Inner".into() };
        let ctx = FieldContext { target: "p.Inner".into(), optional: false, ty: &ty, rules: &rules };
        Generator::new(&s).field(&ctx).unwrap().render(0)
    }

    fn skip(value: ValidationValue) -> Rule {
        Rule::new(RuleKind::Skip, vec![value])
    }

    #[test]
    fn last_skip_wins() {
        assert_eq!(emit(vec![skip(lit_bool(true)), skip(lit_bool(false))]), CALL);
        assert_eq!(emit(vec![skip(lit_bool(false)), skip(lit_bool(true))]), "");
        assert_eq!(emit(vec![]), CALL);
    }

    #[test]
    fn empty_skip_does_not_override() {
        let noop = Rule::new(RuleKind::Skip, vec![]);
        assert_eq!(emit(vec![skip(lit_bool(true)), noop]), "");
    }

    #[test]
    fn reference_guards_the_call() {
        let out = emit(vec![skip(ValidationValue::FieldRef("lazy".into()))]);
        assert_eq!(
            out,
            "if !p.Lazy {\n\tif err := p.Inner.IsValid(); err != nil {\n\t\treturn err\n\t}\n}\n"
        );

        let out = emit(vec![skip(lit_bool(true)), skip(ValidationValue::FieldRef("maybe".into()))]);
        assert!(out.starts_with("if !*p.Maybe {\n\tif err := p.Inner.IsValid(); err != nil {\n"));
    }

    #[test]
    fn fields_without_rules_are_not_delegated() {
        let s = strukt(json!([
            { "name": "inner", "type": { "struct": { "name": "Inner" } } },
            { "name": "fault", "type": { "exception": { "name": "Fault" } }, "annotations": { "vt.skip": ["false"] } }
        ]));
        let out = generate_struct(&s).unwrap().body.render(0);
        assert_eq!(out, "if err := p.Fault.IsValid(); err != nil {\n\treturn err\n}\n");
    }
}
