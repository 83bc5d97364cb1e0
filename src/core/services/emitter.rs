use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Deserialize;

use crate::core::models::artifact::ObfuscatedPayload;
use crate::core::models::environment::EnvironmentDefinition;
use crate::core::models::field::{Field, FieldType};
use crate::core::services::obfuscator::DEFAULT_MASK_KEY;

/// How obfuscated values are embedded in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    /// Two `u32` tables per field, one `(key, cipher)` pair per scalar.
    #[default]
    Scalar,
    /// One byte-string table per field, repeating-key XOR of the value
    /// bytes against a shared key constant.
    Packed,
}

/// Embedded data for one obfuscated field, produced upstream by the
/// obfuscator and matching the chosen [`EmitFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Scalar(ObfuscatedPayload),
    Packed(Vec<u8>),
}

/// One environment ready for emission: its definition plus embedded
/// data for every field that required obfuscation, keyed by variable
/// name.
#[derive(Debug, Clone)]
pub struct PreparedEnvironment {
    pub definition: EnvironmentDefinition,
    pub data: BTreeMap<String, FieldData>,
}

/// Renders the merged artifact: one shared accessor trait, one struct
/// per environment with constructor and accessors, the obfuscation
/// tables, and self-contained helper functions.
///
/// Emission is a two-step pass: the environments are first lowered into
/// an ordered declaration list ([`Document`]), then rendered to text.
/// Output is deterministic for a fixed input: the caller passes
/// environments in sorted-name order and fields keep file order.
pub struct CodeEmitter {
    /// Namespace label for the artifact header, from the run config.
    pub package: String,
    pub format: EmitFormat,
}

impl CodeEmitter {
    /// Render the full artifact. The first environment is the reference
    /// for the shared trait.
    pub fn emit(&self, environments: &[PreparedEnvironment]) -> String {
        self.build_document(environments).render()
    }

    /// Lower the environments into the ordered declaration list.
    pub fn build_document(&self, environments: &[PreparedEnvironment]) -> Document {
        let mut decls = Vec::new();

        let names: Vec<&str> = environments
            .iter()
            .map(|e| e.definition.name.as_str())
            .collect();
        decls.push(Decl::Raw(format!(
            "//! Generated configuration for package `{}`. DO NOT EDIT.\n//!\n//! @generated by envigen from environments: {}\n\n#![allow(dead_code)]",
            self.package,
            names.join(", "),
        )));

        if let Some(reference) = environments.first() {
            decls.push(Decl::Trait {
                name: TRAIT_NAME.to_string(),
                accessors: accessors_for(&reference.definition.fields),
            });
        }

        if self.format == EmitFormat::Packed && environments.iter().any(|e| !e.data.is_empty()) {
            decls.push(Decl::ByteTable {
                name: MASK_KEY_CONST.to_string(),
                bytes: DEFAULT_MASK_KEY.as_bytes().to_vec(),
            });
        }

        for env in environments {
            self.lower_environment(env, &mut decls);
        }

        decls.push(Decl::Helpers(self.format));

        Document { decls }
    }

    fn lower_environment(&self, env: &PreparedEnvironment, decls: &mut Vec<Decl>) {
        let def = &env.definition;
        decls.push(Decl::Comment(format!(
            "---- {} ({}) ----",
            def.name, def.struct_name
        )));

        // Data tables first, in field order, so the constructor below
        // only references constants already declared.
        for field in &def.fields {
            match env.data.get(&field.name) {
                Some(FieldData::Scalar(payload)) => {
                    decls.push(Decl::KeyTable {
                        name: const_ident(&def.name, &field.name, "KEYS"),
                        values: payload.keys.clone(),
                    });
                    decls.push(Decl::KeyTable {
                        name: const_ident(&def.name, &field.name, "DATA"),
                        values: payload.cipher.clone(),
                    });
                }
                Some(FieldData::Packed(bytes)) => {
                    decls.push(Decl::ByteTable {
                        name: const_ident(&def.name, &field.name, "MASKED"),
                        bytes: bytes.clone(),
                    });
                }
                None => {}
            }
        }

        decls.push(Decl::Struct {
            name: def.struct_name.clone(),
            fields: def
                .fields
                .iter()
                .map(|f| (field_ident(&f.name), f.field_type))
                .collect(),
        });

        decls.push(Decl::Constructor {
            struct_name: def.struct_name.clone(),
            env_name: def.name.clone(),
            inits: def
                .fields
                .iter()
                .map(|f| (field_ident(&f.name), self.init_expr(&def.name, f, env.data.get(&f.name))))
                .collect(),
        });

        decls.push(Decl::TraitImpl {
            trait_name: TRAIT_NAME.to_string(),
            struct_name: def.struct_name.clone(),
            accessors: accessors_for(&def.fields),
        });
    }

    /// Pick the constructor expression for one field.
    ///
    /// Strings and floats reconstruct through the obfuscation tables;
    /// ints and bools embed the raw text as a plain literal and parse
    /// at construction time with zero-value fallback.
    fn init_expr(&self, env_name: &str, field: &Field, data: Option<&FieldData>) -> InitExpr {
        match (field.field_type, data) {
            (FieldType::Str, Some(_)) | (FieldType::Float, Some(_)) => {
                let table = match self.format {
                    EmitFormat::Scalar => TableRef::Scalar {
                        keys: const_ident(env_name, &field.name, "KEYS"),
                        data: const_ident(env_name, &field.name, "DATA"),
                    },
                    EmitFormat::Packed => TableRef::Packed {
                        data: const_ident(env_name, &field.name, "MASKED"),
                    },
                };
                if field.field_type == FieldType::Float {
                    InitExpr::RecoverFloat(table)
                } else {
                    InitExpr::RecoverString(table)
                }
            }
            (FieldType::Str, None) => InitExpr::EmptyString,
            (FieldType::Float, None) => InitExpr::ParseFloat(field.raw_value.clone()),
            (FieldType::Int, _) => InitExpr::ParseInt(field.raw_value.clone()),
            (FieldType::Bool, _) => InitExpr::ParseBool(field.raw_value.clone()),
        }
    }
}

const TRAIT_NAME: &str = "ConfigAccess";
const MASK_KEY_CONST: &str = "MASK_KEY";

/// One accessor of the shared trait.
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    method: String,
    field: String,
    ty: FieldType,
}

fn accessors_for(fields: &[Field]) -> Vec<Accessor> {
    fields
        .iter()
        .map(|f| {
            let field = field_ident(&f.name);
            Accessor {
                method: format!("get_{field}"),
                field,
                ty: f.field_type,
            }
        })
        .collect()
}

/// Reference to the data tables backing one obfuscated field.
#[derive(Debug, Clone, PartialEq)]
enum TableRef {
    Scalar { keys: String, data: String },
    Packed { data: String },
}

impl TableRef {
    fn render(&self) -> String {
        match self {
            TableRef::Scalar { keys, data } => format!("deobfuscate(&{keys}, &{data})"),
            TableRef::Packed { data } => format!("unmask({data}, {MASK_KEY_CONST})"),
        }
    }
}

/// Constructor expression for one generated struct field.
#[derive(Debug, Clone, PartialEq)]
enum InitExpr {
    RecoverString(TableRef),
    RecoverFloat(TableRef),
    ParseInt(String),
    ParseBool(String),
    ParseFloat(String),
    EmptyString,
}

impl InitExpr {
    fn render(&self) -> String {
        match self {
            InitExpr::RecoverString(table) => table.render(),
            InitExpr::RecoverFloat(table) => format!("parse_float(&{})", table.render()),
            InitExpr::ParseInt(raw) => format!("parse_int(\"{}\")", raw.escape_default()),
            InitExpr::ParseBool(raw) => format!("parse_bool(\"{}\")", raw.escape_default()),
            InitExpr::ParseFloat(raw) => format!("parse_float(\"{}\")", raw.escape_default()),
            InitExpr::EmptyString => "String::new()".to_string(),
        }
    }
}

/// One top-level declaration of the artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// Verbatim text (header block).
    Raw(String),
    /// A `// ----` section marker.
    Comment(String),
    /// `static NAME: [u32; N] = [..];`
    KeyTable { name: String, values: Vec<u32> },
    /// `static NAME: &[u8] = b"..";`
    ByteTable { name: String, bytes: Vec<u8> },
    Trait {
        name: String,
        accessors: Vec<Accessor>,
    },
    Struct {
        name: String,
        fields: Vec<(String, FieldType)>,
    },
    Constructor {
        struct_name: String,
        env_name: String,
        inits: Vec<(String, InitExpr)>,
    },
    TraitImpl {
        trait_name: String,
        struct_name: String,
        accessors: Vec<Accessor>,
    },
    /// The self-contained helper functions for the given format.
    Helpers(EmitFormat),
}

/// Ordered declaration list with a single render pass.
#[derive(Debug, Clone)]
pub struct Document {
    pub decls: Vec<Decl>,
}

impl Document {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, decl) in self.decls.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            decl.render(&mut out);
        }
        out
    }
}

impl Decl {
    fn render(&self, out: &mut String) {
        match self {
            Decl::Raw(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Decl::Comment(text) => {
                let _ = writeln!(out, "// {text}");
            }
            Decl::KeyTable { name, values } => {
                let joined = values
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "static {name}: [u32; {}] = [{joined}];", values.len());
            }
            Decl::ByteTable { name, bytes } => {
                let _ = writeln!(out, "static {name}: &[u8] = b\"{}\";", byte_string(bytes));
            }
            Decl::Trait { name, accessors } => {
                out.push_str("/// Accessors shared by every generated environment config.\n");
                let _ = writeln!(out, "pub trait {name} {{");
                for acc in accessors {
                    let _ = writeln!(out, "    fn {}(&self) -> {};", acc.method, acc.ty.rust_type());
                }
                out.push_str("}\n");
            }
            Decl::Struct { name, fields } => {
                out.push_str("#[derive(Debug, Clone)]\n");
                let _ = writeln!(out, "pub struct {name} {{");
                for (ident, ty) in fields {
                    let _ = writeln!(out, "    {ident}: {},", ty.rust_type());
                }
                out.push_str("}\n");
            }
            Decl::Constructor {
                struct_name,
                env_name,
                inits,
            } => {
                let _ = writeln!(out, "impl {struct_name} {{");
                let _ = writeln!(
                    out,
                    "    /// Builds the {env_name} configuration, reversing value obfuscation."
                );
                out.push_str("    pub fn new() -> Self {\n        Self {\n");
                for (ident, expr) in inits {
                    let _ = writeln!(out, "            {ident}: {},", expr.render());
                }
                out.push_str("        }\n    }\n}\n\n");
                let _ = writeln!(out, "impl Default for {struct_name} {{");
                out.push_str("    fn default() -> Self {\n        Self::new()\n    }\n}\n");
            }
            Decl::TraitImpl {
                trait_name,
                struct_name,
                accessors,
            } => {
                let _ = writeln!(out, "impl {trait_name} for {struct_name} {{");
                for (i, acc) in accessors.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    let body = match acc.ty {
                        FieldType::Str => format!("self.{}.clone()", acc.field),
                        _ => format!("self.{}", acc.field),
                    };
                    let _ = writeln!(
                        out,
                        "    fn {}(&self) -> {} {{\n        {body}\n    }}",
                        acc.method,
                        acc.ty.rust_type()
                    );
                }
                out.push_str("}\n");
            }
            Decl::Helpers(format) => {
                out.push_str("// ---- helpers ----\n\n");
                match format {
                    EmitFormat::Scalar => out.push_str(HELPER_DEOBFUSCATE),
                    EmitFormat::Packed => out.push_str(HELPER_UNMASK),
                }
                out.push('\n');
                out.push_str(HELPER_PARSERS);
            }
        }
    }
}

const HELPER_DEOBFUSCATE: &str = "\
fn deobfuscate(keys: &[u32], data: &[u32]) -> String {
    if keys.len() != data.len() {
        return String::new();
    }
    keys.iter()
        .zip(data)
        .map(|(k, d)| char::from_u32(k ^ d).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
";

const HELPER_UNMASK: &str = "\
fn unmask(data: &[u8], key: &[u8]) -> String {
    let bytes: Vec<u8> = data
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ key[i % key.len()])
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
";

const HELPER_PARSERS: &str = "\
fn parse_int(raw: &str) -> i64 {
    raw.parse().unwrap_or_default()
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw, \"1\" | \"t\" | \"T\" | \"TRUE\" | \"true\" | \"True\")
}

fn parse_float(raw: &str) -> f64 {
    raw.parse().unwrap_or_default()
}
";

/// Lower a variable name to a Rust field/method identifier.
///
/// `DB_HOST` becomes `db_host`; characters outside `[A-Za-z0-9_]` map
/// to `_`, a leading digit gets a `_` prefix, and identifiers that
/// collide with a Rust keyword get a trailing `_`.
pub fn field_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if is_keyword(&ident) {
        ident.push('_');
    }
    ident
}

/// Environment-qualified SCREAMING_SNAKE constant name, so environments
/// sharing a field name never collide.
fn const_ident(env: &str, field: &str, suffix: &str) -> String {
    let upper = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    };
    let mut name = format!("{}_{}_{suffix}", upper(env), upper(field));
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Escape raw bytes into a `b"..."` literal body.
fn byte_string(bytes: &[u8]) -> String {
    let mut out = String::new();
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out
}

fn is_keyword(ident: &str) -> bool {
    matches!(
        ident,
        "as" | "async" | "await" | "break" | "const" | "continue" | "crate" | "dyn" | "else"
            | "enum" | "extern" | "false" | "fn" | "for" | "gen" | "if" | "impl" | "in" | "let"
            | "loop" | "match" | "mod" | "move" | "mut" | "pub" | "ref" | "return" | "self"
            | "static" | "struct" | "super" | "trait" | "true" | "try" | "type" | "unsafe"
            | "use" | "where" | "while" | "yield"
    )
}
