//! Source-text rendering of a synthesized surface.
//!
//! Produces a deterministic, human-readable listing of the generated
//! classes as Rust-flavored stub declarations, suitable for ahead-of-time
//! code generation review. Call-time interpretation of the same table lives
//! in the dispatch layer.

use std::fmt::Write;

use veneer_model::{Primitive, TypeRef};

use crate::case::{escape_reserved, to_snake_case};
use crate::surface::{ClassSurface, MethodEntry, Surface};

/// Render the surface as generated source text.
pub fn render(surface: &Surface) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "// Generated binding surface for `{}`. Do not edit by hand.",
        surface.api_name
    );

    for e in &surface.enums {
        let _ = writeln!(out, "\npub enum {} {{", e.name);
        for (name, value) in &e.variants {
            let _ = writeln!(out, "    {name} = {value},");
        }
        out.push_str("}\n");
    }

    if !surface.constants.is_empty() {
        out.push('\n');
        for c in &surface.constants {
            let _ = writeln!(out, "pub const {}: i64 = {};", c.name, c.value);
        }
    }

    for class in surface.classes.values() {
        if class.is_empty() {
            continue;
        }
        render_class(&mut out, class);
    }

    if !surface.globals.is_empty() {
        out.push('\n');
        for entry in &surface.globals {
            let _ = writeln!(out, "/// See {}.", entry.backing.name);
            let _ = writeln!(
                out,
                "pub fn {}({}){};",
                escape_reserved(&entry.method_name),
                param_list(entry, 0),
                return_clause(&entry.backing.return_type)
            );
        }
    }

    out
}

fn render_class(out: &mut String, class: &ClassSurface) {
    let _ = writeln!(out, "\npub struct {}(Handle);", class.owner_type);
    let _ = writeln!(out, "\nimpl {} {{", class.owner_type);

    for entry in &class.methods {
        let _ = writeln!(out, "    /// See {}.", entry.backing.name);
        let _ = writeln!(
            out,
            "    pub fn {}(&self{}){};",
            escape_reserved(&entry.method_name),
            prefix_comma(param_list(entry, 1)),
            return_clause(&entry.backing.return_type)
        );
    }

    if !class.properties.is_empty() {
        out.push_str("\n    // properties:\n");
        for prop in &class.properties {
            let access = match (&prop.getter, &prop.setter) {
                (Some(_), Some(_)) => "read-write",
                (Some(_), None) => "read-only",
                (None, Some(_)) => "write-only",
                (None, None) => "unreachable",
            };
            let mut sources = Vec::new();
            if let Some(g) = &prop.getter {
                sources.push(g.name.as_str());
            }
            if let Some(s) = &prop.setter {
                sources.push(s.name.as_str());
            }
            let _ = writeln!(
                out,
                "    //   {}: {access}, see {}",
                escape_reserved(&prop.property_name),
                sources.join(" and ")
            );
        }
    }

    for it in &class.iterators {
        let _ = writeln!(
            out,
            "\n    /// See {} and {}.",
            it.first_step.name, it.next_step.name
        );
        let _ = writeln!(
            out,
            "    pub fn iter_{}s(&self) -> impl Iterator<Item = {}>;",
            it.iterated_name,
            rust_type(&it.next_step.return_type)
        );
    }

    out.push_str("}\n");
}

fn param_list(entry: &MethodEntry, skip: usize) -> String {
    entry
        .backing
        .parameters
        .iter()
        .skip(skip)
        .enumerate()
        .map(|(i, p)| {
            let name = if p.name.is_empty() {
                format!("arg{i}")
            } else {
                escape_reserved(&to_snake_case(&p.name))
            };
            format!("{name}: {}", rust_type(&p.ty))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn prefix_comma(params: String) -> String {
    if params.is_empty() {
        params
    } else {
        format!(", {params}")
    }
}

fn return_clause(ty: &TypeRef) -> String {
    if ty.is_void() {
        String::new()
    } else {
        format!(" -> {}", rust_type(ty))
    }
}

/// Rust spelling for a foreign type in the generated listing.
fn rust_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive(p) => match p {
            Primitive::Void => "()",
            Primitive::Bool => "bool",
            Primitive::Char => "u8",
            Primitive::Int => "i64",
            Primitive::UInt => "u64",
            Primitive::Float => "f32",
            Primitive::Double => "f64",
            Primitive::Size => "usize",
        }
        .to_string(),
        TypeRef::Opaque(name) => name.clone(),
        TypeRef::Enum(name) => name.clone(),
        TypeRef::Pointer(_) if ty.is_string() => "String".to_string(),
        TypeRef::Pointer(inner) => match inner.as_ref() {
            TypeRef::Opaque(name) => name.clone(),
            _ => "Handle".to_string(),
        },
    }
}
