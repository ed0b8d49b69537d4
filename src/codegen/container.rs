//! List, set and map checks. Element, key and value rules recurse through
//! the dispatcher with a freshly named loop variable as their target.

use crate::error::Result;
use crate::ir::Ty;
use crate::rules::{Rule, RuleKind};

use super::{FieldContext, Generator, Operand, Source};

impl Generator<'_> {
    /// Lists and sets share one shape: Go holds both as slices.
    pub(super) fn list_checks(&mut self, ctx: &FieldContext<'_>, elem: &Ty) -> Result<Source> {
        let value = ctx.value_expr();
        let mut out = Source::new();
        for rule in ctx.rules {
            match (rule.kind, rule.inner.as_deref()) {
                (RuleKind::MinSize | RuleKind::MaxSize, _) => self.size_check(&mut out, ctx, &value, rule)?,
                (RuleKind::Elem, Some(inner)) => {
                    let index = self.names.fresh("_i");
                    let item = self.names.fresh("_elem");
                    let sub = ctx.component(item.clone(), elem, inner);
                    let checks = self.field(&sub)?;
                    if checks.is_empty() {
                        continue;
                    }
                    let mut body = Source::new();
                    body.line(format!("{item} := {}[{index}]", ctx.container_expr()));
                    body.append(checks);
                    out.block(
                        format!("for {index} := 0; {index} < len({value}); {index}++"),
                        body,
                    );
                }
                _ => self.skip_rule(ctx, rule),
            }
        }
        Ok(out)
    }

    pub(super) fn map_checks(&mut self, ctx: &FieldContext<'_>, key: &Ty, value: &Ty) -> Result<Source> {
        let map = ctx.value_expr();
        let mut out = Source::new();
        for rule in ctx.rules {
            match (rule.kind, rule.inner.as_deref()) {
                (RuleKind::MinSize | RuleKind::MaxSize, _) => self.size_check(&mut out, ctx, &map, rule)?,
                (RuleKind::Key, Some(inner)) => {
                    let name = self.names.fresh("_key");
                    let checks = self.field(&ctx.component(name.clone(), key, inner))?;
                    out.block(format!("for {name} := range {map}"), checks);
                }
                (RuleKind::Value, Some(inner)) => {
                    let name = self.names.fresh("_value");
                    let checks = self.field(&ctx.component(name.clone(), value, inner))?;
                    out.block(format!("for _, {name} := range {map}"), checks);
                }
                _ => self.skip_rule(ctx, rule),
            }
        }
        Ok(out)
    }

    fn size_check(&mut self, out: &mut Source, ctx: &FieldContext<'_>, value: &str, rule: &Rule) -> Result<()> {
        let (Some(arg), Some(op)) = (rule.first_arg(), rule.kind.violation_operator()) else {
            self.skip_rule(ctx, rule);
            return Ok(());
        };
        let bound = self.render(arg, Operand::Size, rule.kind)?;
        self.reject(out, &format!("len({value}) {op} {bound}"), value, rule.kind);
        Ok(())
    }
}
