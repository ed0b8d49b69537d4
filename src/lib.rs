pub mod annotations;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod ir;
pub mod naming;
pub mod path_de;
pub mod rules;

pub use codegen::{generate_struct, Codegen, StructValidator};
pub use error::CodegenError;
pub use ir::{Document, StructDef};
