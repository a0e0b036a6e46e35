//! Declaration signature parser.
//!
//! Parses C-like declaration strings ("Value* GetNextValue(Value* v)") into
//! [`FunctionDecl`]s. Named types resolve against the manifest's opaque and
//! enum type lists. Does NOT handle function pointers, array parameters, or
//! variadic declarations.

use std::collections::BTreeSet;

use crate::declaration::{FunctionDecl, Parameter};
use crate::error::{ModelError, Result};
use crate::types::{Primitive, TypeRef};

/// Named-type resolution context for signature parsing.
#[derive(Debug, Clone, Default)]
pub struct SignatureContext {
    opaque: BTreeSet<String>,
    enums: BTreeSet<String>,
}

impl SignatureContext {
    pub fn new() -> Self {
        SignatureContext::default()
    }

    pub fn add_opaque(&mut self, name: impl Into<String>) {
        self.opaque.insert(name.into());
    }

    pub fn add_enum(&mut self, name: impl Into<String>) {
        self.enums.insert(name.into());
    }

    fn resolve(&self, ident: &str) -> Option<TypeRef> {
        if self.opaque.contains(ident) {
            Some(TypeRef::Opaque(ident.to_string()))
        } else if self.enums.contains(ident) {
            Some(TypeRef::Enum(ident.to_string()))
        } else {
            None
        }
    }
}

/// Parse a declaration signature string into a function declaration.
pub fn parse_signature(input: &str, ctx: &SignatureContext) -> Result<FunctionDecl> {
    let input = input.trim();
    if input.is_empty() {
        return Err(invalid("empty signature"));
    }

    let paren_pos = input.find('(').ok_or_else(|| invalid("missing '('"))?;
    if !input.ends_with(')') {
        return Err(invalid("missing ')'"));
    }

    let before_paren = input[..paren_pos].trim();
    let params_str = &input[paren_pos + 1..input.len() - 1];

    let (return_type, name) = parse_type_and_name(before_paren, ctx, input)?;
    let parameters = parse_params(params_str, ctx, input)?;

    Ok(FunctionDecl {
        name,
        parameters,
        return_type,
    })
}

fn invalid(detail: &str) -> ModelError {
    ModelError::InvalidSignature {
        detail: detail.to_string(),
    }
}

/// Tokenize a declaration fragment, splitting on whitespace but keeping `*`
/// as separate tokens.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for part in s.split_whitespace() {
        let mut remaining = part;
        while !remaining.is_empty() {
            if let Some(star_pos) = remaining.find('*') {
                if star_pos > 0 {
                    tokens.push(&remaining[..star_pos]);
                }
                tokens.push("*");
                remaining = &remaining[star_pos + 1..];
            } else {
                tokens.push(remaining);
                break;
            }
        }
    }
    tokens
}

/// Parse a type specifier from the front of a token sequence.
///
/// Returns the parsed type and the number of tokens consumed. `const` is
/// accepted and ignored; it carries no meaning for surface synthesis.
fn parse_base_type(tokens: &[&str], ctx: &SignatureContext, signature: &str) -> Result<(TypeRef, usize)> {
    let mut pos = 0;
    while tokens.get(pos) == Some(&"const") {
        pos += 1;
    }
    let Some(&tok) = tokens.get(pos) else {
        return Err(invalid("expected type"));
    };

    let ty = match tok {
        "void" => TypeRef::Primitive(Primitive::Void),
        "bool" | "_Bool" => TypeRef::Primitive(Primitive::Bool),
        "char" => TypeRef::Primitive(Primitive::Char),
        "int" | "long" => {
            pos += if tok == "long" && tokens.get(pos + 1) == Some(&"long") { 1 } else { 0 };
            TypeRef::Primitive(Primitive::Int)
        }
        "unsigned" => {
            // `unsigned`, `unsigned int`, `unsigned long (long)` all map to UInt.
            if matches!(tokens.get(pos + 1), Some(&"int") | Some(&"long")) {
                let was_long = tokens.get(pos + 1) == Some(&"long");
                pos += 1;
                if was_long && tokens.get(pos + 1) == Some(&"long") {
                    pos += 1;
                }
            }
            TypeRef::Primitive(Primitive::UInt)
        }
        "float" => TypeRef::Primitive(Primitive::Float),
        "double" => TypeRef::Primitive(Primitive::Double),
        "size_t" => TypeRef::Primitive(Primitive::Size),
        "..." => return Err(invalid("variadic declarations are not supported")),
        ident => ctx.resolve(ident).ok_or_else(|| ModelError::UnknownType {
            name: ident.to_string(),
            signature: signature.to_string(),
        })?,
    };
    Ok((ty, pos + 1))
}

/// Parse "return_type function_name" from the part before `(`.
fn parse_type_and_name(s: &str, ctx: &SignatureContext, signature: &str) -> Result<(TypeRef, String)> {
    let tokens = tokenize(s);
    if tokens.is_empty() {
        return Err(invalid("empty return type and name"));
    }

    let (base_type, consumed) = parse_base_type(&tokens, ctx, signature)?;
    let remaining = &tokens[consumed..];

    let mut ptr_count = 0;
    let mut name = None;
    for tok in remaining {
        match *tok {
            "*" => ptr_count += 1,
            "const" => {}
            ident => name = Some(ident.to_string()),
        }
    }
    let name = name.ok_or_else(|| invalid("missing function name"))?;

    let mut result = base_type;
    for _ in 0..ptr_count {
        result = TypeRef::pointer_to(result);
    }
    Ok((result, name))
}

/// Parse one parameter; the name is optional.
fn parse_param(s: &str, ctx: &SignatureContext, signature: &str) -> Result<Parameter> {
    let tokens = tokenize(s);
    let (base_type, consumed) = parse_base_type(&tokens, ctx, signature)?;
    let remaining = &tokens[consumed..];

    let mut ptr_count = 0;
    let mut name = String::new();
    for tok in remaining {
        match *tok {
            "*" => ptr_count += 1,
            "const" => {}
            ident => name = ident.to_string(),
        }
    }

    let mut ty = base_type;
    for _ in 0..ptr_count {
        ty = TypeRef::pointer_to(ty);
    }
    Ok(Parameter { name, ty })
}

/// Parse the parameter list between `(` and `)`.
fn parse_params(s: &str, ctx: &SignatureContext, signature: &str) -> Result<Vec<Parameter>> {
    let s = s.trim();
    if s.is_empty() || s == "void" {
        return Ok(Vec::new());
    }

    s.split(',')
        .map(|part| parse_param(part.trim(), ctx, signature))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llvm_ctx() -> SignatureContext {
        let mut ctx = SignatureContext::new();
        ctx.add_opaque("Value");
        ctx.add_opaque("Module");
        ctx.add_opaque("BasicBlock");
        ctx.add_enum("Opcode");
        ctx
    }

    #[test]
    fn parse_simple_function() {
        let f = parse_signature("double LLVMSomething(double x)", &llvm_ctx()).unwrap();
        assert_eq!(f.name, "LLVMSomething");
        assert_eq!(f.return_type, TypeRef::Primitive(Primitive::Double));
        assert_eq!(f.parameters.len(), 1);
        assert_eq!(f.parameters[0].name, "x");
        assert_eq!(f.parameters[0].ty, TypeRef::Primitive(Primitive::Double));
    }

    #[test]
    fn parse_opaque_receiver() {
        let f = parse_signature("void LLVMDumpValue(Value* v)", &llvm_ctx()).unwrap();
        assert!(f.return_type.is_void());
        assert_eq!(
            f.parameters[0].ty,
            TypeRef::pointer_to(TypeRef::Opaque("Value".to_string()))
        );
        assert_eq!(f.receiver_type().unwrap().opaque_name(), Some("Value"));
    }

    #[test]
    fn parse_opaque_return() {
        let f = parse_signature("Value* LLVMGetFirstInstruction(BasicBlock* bb)", &llvm_ctx()).unwrap();
        assert_eq!(f.return_type.opaque_name(), Some("Value"));
    }

    #[test]
    fn parse_string_and_enum() {
        let f = parse_signature("const char* LLVMGetValueName(Value* v, Opcode op)", &llvm_ctx()).unwrap();
        assert!(f.return_type.is_string());
        assert_eq!(f.parameters[1].ty, TypeRef::Enum("Opcode".to_string()));
    }

    #[test]
    fn parse_unsigned_variants() {
        let f = parse_signature("unsigned LLVMCountParams(Value* fn)", &llvm_ctx()).unwrap();
        assert_eq!(f.return_type, TypeRef::Primitive(Primitive::UInt));
        let f = parse_signature("unsigned int LLVMCountOperands(Value* v)", &llvm_ctx()).unwrap();
        assert_eq!(f.return_type, TypeRef::Primitive(Primitive::UInt));
    }

    #[test]
    fn parse_void_params() {
        let f = parse_signature("Module* LLVMModuleCreate(void)", &llvm_ctx()).unwrap();
        assert!(f.parameters.is_empty());
        let f = parse_signature("Module* LLVMModuleCreate()", &llvm_ctx()).unwrap();
        assert!(f.parameters.is_empty());
    }

    #[test]
    fn parse_unnamed_parameter() {
        let f = parse_signature("void LLVMShutdown(int)", &llvm_ctx()).unwrap();
        assert_eq!(f.parameters[0].name, "");
    }

    #[test]
    fn unknown_type_rejected() {
        let err = parse_signature("Widget* LLVMGetWidget(Value* v)", &llvm_ctx()).unwrap_err();
        match err {
            ModelError::UnknownType { name, .. } => assert_eq!(name, "Widget"),
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn malformed_rejected() {
        assert!(parse_signature("", &llvm_ctx()).is_err());
        assert!(parse_signature("void LLVMNoParens", &llvm_ctx()).is_err());
        assert!(parse_signature("int LLVMPrintf(const char* fmt, ...)", &llvm_ctx()).is_err());
    }
}
