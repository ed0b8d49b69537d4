//! CLI: IDL dump → (Go validators | parsed rules | pass/fail report)
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::annotations;
use crate::codegen::{generate_struct, Codegen};
use crate::ir::{Document, StructDef};
use crate::rules::Rule;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Go `IsValid()` methods from `vt.*` annotated Thrift structures
#[derive(Parser, Debug)]
#[command(name = "thrift-vgen", version, about)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit a Go file with one validator method per structure
    Go(GoOut),
    /// print the parsed validation rules per structure and field
    Rules(RulesOut),
    /// generate every validator and report which structures fail
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to the IDL document inside each input (e.g. /program)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GoOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// Go package name (defaults to the inputs' package)
    #[arg(long)]
    package: Option<String>,

    /// output .go file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct RulesOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> anyhow::Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut documents = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            let mut json_value = serde_json::from_str::<serde_json::Value>(&source)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
            if let Some(pointer) = self.json_pointer.as_deref() {
                json_value = json_value
                    .pointer_mut(pointer)
                    .map(serde_json::Value::take)
                    .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {source_path_str}"))?;
            }
            let document = crate::path_de::from_value_with_path::<Document>(json_value)
                .map_err(|error| anyhow!("invalid IDL document ({source_path_str}): {error}"))?;
            tracing::debug!(
                path = %source_path_str,
                package = %document.package,
                structs = document.structs.len(),
                "loaded document"
            );
            documents.push(document);
        }
        Ok(documents)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Go(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let documents = target.input_settings.load_documents()?;
                let package = resolve_package(&documents, target.package.as_deref())?;
                let structs: Vec<&StructDef> = documents.iter().flat_map(|d| &d.structs).collect();

                // independent passes per structure; collect keeps input order
                let validators = structs
                    .par_iter()
                    .map(|strukt| generate_struct(strukt))
                    .collect::<Result<Vec<_>, _>>()
                    .context("validator generation failed")?;

                let mut cg = Codegen::new();
                for validator in validators {
                    cg.push(validator);
                }
                write_output(target.out.as_deref(), &cg.into_file(&package))
            }
            Command::Rules(target) => {
                let documents = target.input_settings.load_documents()?;
                let mut dump = IndexMap::<String, IndexMap<String, Vec<Rule>>>::new();
                for strukt in documents.iter().flat_map(|d| &d.structs) {
                    let mut fields = IndexMap::new();
                    for field in &strukt.fields {
                        let rules = annotations::parse_field(strukt, field)
                            .map_err(|e| e.in_field(&strukt.name, &field.name))?;
                        if !rules.is_empty() {
                            fields.insert(field.name.clone(), rules);
                        }
                    }
                    dump.insert(strukt.name.clone(), fields);
                }
                let dump_src = serde_json::to_string_pretty(&dump)?;
                write_output(target.out.as_deref(), &dump_src)
            }
            Command::Check(target) => {
                let documents = target.input_settings.load_documents()?;
                let structs: Vec<&StructDef> = documents.iter().flat_map(|d| &d.structs).collect();
                let results: Vec<_> = structs
                    .par_iter()
                    .map(|strukt| (strukt.name.as_str(), generate_struct(strukt)))
                    .collect();

                let mut failed = 0usize;
                for (name, result) in &results {
                    match result {
                        Ok(_) => eprintln!("{} {}", "✅".green(), name),
                        Err(error) => {
                            failed += 1;
                            eprintln!("{} {}: {}", "❌".red(), name.bold(), error.to_string().red());
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} structures failed validator generation", results.len());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_package(documents: &[Document], explicit: Option<&str>) -> anyhow::Result<String> {
    if let Some(package) = explicit {
        return Ok(package.to_string());
    }
    let mut packages = documents.iter().map(|d| d.package.as_str());
    let Some(first) = packages.next() else {
        bail!("no input documents");
    };
    if let Some(other) = packages.find(|p| *p != first) {
        bail!("inputs declare different packages ({first}, {other}); pass --package");
    }
    Ok(first.to_string())
}

fn write_output(out: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        println!("{contents}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
            if matched.is_empty() {
                // an explicit glob that matches nothing is a mistake, not an empty input
                bail!("glob pattern matched no files: {pattern}");
            }
            // glob order is platform-dependent; keep output stable
            matched.sort();
            out.append(&mut matched);
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
