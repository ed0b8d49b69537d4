//! Go validator generation.
//!
//! One [`Generator`] per structure walks its fields, dispatches on each
//! field's resolved type and emits the checks for every attached rule. The
//! dispatcher ([`Generator::field`]) is the single recursive entry point:
//! container and struct emitters call back into it for element, key and
//! value rules, with a freshly named local as the new target.
//!
//! [`Codegen`] collects finished validators and renders the Go file.
pub mod names;
pub mod source;

mod container;
mod scalar;
mod structure;
mod value;

use std::collections::BTreeSet;

use crate::annotations;
use crate::error::{CodegenError, Result};
use crate::ir::{StructDef, Ty};
use crate::naming::{self, FieldAccess, RECEIVER, VALIDATOR_METHOD};
use crate::rules::{Rule, RuleKind};

pub use names::NameAllocator;
pub use source::Source;
pub use value::Operand;

/// Standard-library packages referenced by generated checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Imports {
    pub errors: bool,
    pub regexp: bool,
    pub strings: bool,
}

impl Imports {
    pub fn merge(&mut self, other: Imports) {
        self.errors |= other.errors;
        self.regexp |= other.regexp;
        self.strings |= other.strings;
    }

    pub fn paths(&self) -> BTreeSet<&'static str> {
        let mut out = BTreeSet::new();
        if self.errors {
            out.insert("errors");
        }
        if self.regexp {
            out.insert("regexp");
        }
        if self.strings {
            out.insert("strings");
        }
        out
    }
}

/// What the dispatcher needs to know about one value being validated.
#[derive(Debug, Clone)]
pub struct FieldContext<'a> {
    /// Expression naming the value: `p.Age`, `_elem3`, ...
    pub target: String,
    /// Value held behind a pointer. Checks run on `*target`, and only when
    /// it is non-nil.
    pub optional: bool,
    /// Declared type; aliases are resolved by the dispatcher.
    pub ty: &'a Ty,
    pub rules: &'a [Rule],
}

impl<'a> FieldContext<'a> {
    pub fn value_expr(&self) -> String {
        if self.optional {
            format!("*{}", self.target)
        } else {
            self.target.clone()
        }
    }

    /// Indexable form of the value: `(*p.Tags)[_i0]`, not `*p.Tags[_i0]`.
    fn container_expr(&self) -> String {
        if self.optional {
            format!("(*{})", self.target)
        } else {
            self.target.clone()
        }
    }

    /// Context for an element, key or value of this container.
    fn component(&self, target: String, ty: &'a Ty, rule: &'a Rule) -> FieldContext<'a> {
        FieldContext {
            target,
            optional: false,
            ty,
            rules: std::slice::from_ref(rule),
        }
    }
}

/// One generation pass over one structure.
pub struct Generator<'a> {
    strukt: &'a StructDef,
    names: NameAllocator,
    imports: Imports,
}

impl<'a> Generator<'a> {
    pub fn new(strukt: &'a StructDef) -> Self {
        Generator { strukt, names: NameAllocator::new(), imports: Imports::default() }
    }

    pub fn imports(&self) -> Imports {
        self.imports
    }

    /// Body of the structure's validity check: field validators in
    /// declaration order. Fields without rules contribute nothing.
    pub fn struct_body(&mut self) -> Result<Source> {
        let strukt = self.strukt;
        self.names = NameAllocator::new();
        self.imports = Imports::default();

        let mut body = Source::new();
        for field in &strukt.fields {
            let in_field = |e: CodegenError| e.in_field(&strukt.name, &field.name);
            let rules = annotations::parse_field(strukt, field).map_err(in_field)?;
            if rules.is_empty() {
                continue;
            }
            tracing::debug!(
                strukt = %strukt.name,
                field = %field.name,
                rules = rules.len(),
                "emitting field validator"
            );
            let access = FieldAccess::of(field);
            let ctx = FieldContext {
                target: access.expr,
                optional: access.pointer,
                ty: &field.ty,
                rules: &rules,
            };
            body.append(self.field(&ctx).map_err(in_field)?);
        }
        Ok(body)
    }

    /// Type-directed dispatch for one value.
    pub fn field(&mut self, ctx: &FieldContext<'_>) -> Result<Source> {
        let value = ctx.value_expr();
        let checks = match ctx.ty.resolve() {
            Ty::Bool => self.bool_checks(ctx, &value)?,
            Ty::Integer { width } => self.integer_checks(ctx, &value, *width)?,
            Ty::Double => self.double_checks(ctx, &value)?,
            Ty::String | Ty::Binary => self.string_checks(ctx, &value)?,
            Ty::Enum { name } => self.enum_checks(ctx, &value, name)?,
            Ty::List { elem } | Ty::Set { elem } => self.list_checks(ctx, elem)?,
            Ty::Map { key, value } => self.map_checks(ctx, key, value)?,
            Ty::Struct { .. } | Ty::Exception { .. } => return self.struct_checks(ctx),
            ty @ (Ty::Void | Ty::Alias { .. }) => {
                return Err(CodegenError::UnsupportedType { ty: ty.describe() });
            }
        };

        if !ctx.optional {
            return Ok(checks);
        }
        let mut out = Source::new();
        out.block(format!("if {} != nil", ctx.target), checks);
        Ok(out)
    }

    /// `if <violated> { return errors.New("...") }`
    fn reject(&mut self, out: &mut Source, violated: &str, label: &str, rule: RuleKind) {
        out.open(format!("if {violated}"));
        out.line(self.failure(label, rule));
        out.close();
    }

    fn failure(&mut self, label: &str, rule: RuleKind) -> String {
        self.imports.errors = true;
        let message = format!("{label} not valid, rule {} check failed", rule.name());
        format!("return errors.New({})", naming::go_quote(&message))
    }

    fn skip_rule(&self, ctx: &FieldContext<'_>, rule: &Rule) {
        if rule.is_noop() {
            tracing::trace!(target = %ctx.target, rule = rule.kind.name(), "rule has no arguments; skipped");
        } else {
            tracing::debug!(
                target = %ctx.target,
                rule = rule.kind.name(),
                ty = %ctx.ty.describe(),
                "rule does not apply to this type; skipped"
            );
        }
    }
}

/// Finished validator for one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValidator {
    pub name: String,
    pub body: Source,
    pub imports: Imports,
}

impl StructValidator {
    pub fn render(&self) -> String {
        let mut out = format!(
            "func ({RECEIVER} *{}) {VALIDATOR_METHOD}() error {{\n",
            naming::publicize(&self.name)
        );
        out.push_str(&self.body.render(1));
        out.push_str("\treturn nil\n}\n");
        out
    }
}

/// Run a fresh generation pass over `strukt`.
pub fn generate_struct(strukt: &StructDef) -> Result<StructValidator> {
    let mut generator = Generator::new(strukt);
    let body = generator.struct_body()?;
    Ok(StructValidator {
        name: strukt.name.clone(),
        body,
        imports: generator.imports(),
    })
}

#[derive(Debug, Default)]
pub struct Codegen {
    validators: Vec<StructValidator>,
    imports: Imports,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, strukt: &StructDef) -> Result<()> {
        let validator = generate_struct(strukt)?;
        self.push(validator);
        Ok(())
    }

    pub fn push(&mut self, validator: StructValidator) {
        self.imports.merge(validator.imports);
        self.validators.push(validator);
    }

    /// Validator methods only, in emission order.
    pub fn into_string(self) -> String {
        self.validators
            .iter()
            .map(StructValidator::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Complete Go file: header, package clause, imports, methods.
    pub fn into_file(self, package: &str) -> String {
        let mut out = format!(
            "// Code generated by thrift-vgen {}. DO NOT EDIT.\n\npackage {package}\n\n",
            env!("CARGO_PKG_VERSION")
        );
        let paths = self.imports.paths();
        if !paths.is_empty() {
            out.push_str("import (\n");
            for path in paths {
                out.push_str(&format!("\t{path:?}\n"));
            }
            out.push_str(")\n\n");
        }
        out.push_str(&self.into_string());
        out
    }
}
