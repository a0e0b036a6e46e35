//! Identifier case conversion.

/// Convert a camel-case declaration name to snake case.
///
/// `"GetFunctionID"` becomes `"get_function_id"`: an underscore is emitted
/// wherever the case changes, an all-caps name maps to its plain lowercase,
/// and a trailing run of capitals reads as one word.
pub fn to_snake_case(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = name.chars().collect();
    let has_alpha = chars.iter().any(|c| c.is_alphabetic());
    if has_alpha && !chars.iter().any(|c| c.is_lowercase()) {
        return name.to_lowercase();
    }

    let mut out: Vec<char> = Vec::with_capacity(chars.len() + 8);
    for (i, &cur) in chars.iter().enumerate() {
        let prev = if i == 0 { 'a' } else { chars[i - 1] };
        let next = if i + 1 < chars.len() { chars[i + 1] } else { 'a' };
        if cur.is_uppercase() && (prev.is_lowercase() || next.is_lowercase()) {
            out.push('_');
        }
        out.extend(cur.to_lowercase());
    }

    // "FunctionID" ends in a capital run: drop the underscore inserted
    // before its last letter so the run stays one word.
    let n = chars.len();
    if n >= 2 && chars[n - 1].is_uppercase() && chars[n - 2].is_uppercase() {
        if let Some(last) = out.pop() {
            out.pop();
            out.push(last);
        }
    }

    if out.first() == Some(&'_') {
        out.remove(0);
    }
    out.into_iter().collect()
}

/// Rust keywords that cannot be used as bare identifiers in generated code.
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Append an underscore to names that collide with a reserved word.
pub fn escape_reserved(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_to_snake() {
        assert_eq!(to_snake_case("GetValueName"), "get_value_name");
        assert_eq!(to_snake_case("DumpModule"), "dump_module");
        assert_eq!(to_snake_case("ParseIRInContext"), "parse_ir_in_context");
    }

    #[test]
    fn trailing_capital_run_is_one_word() {
        assert_eq!(to_snake_case("GetFunctionID"), "get_function_id");
        assert_eq!(to_snake_case("GetID"), "get_id");
    }

    #[test]
    fn all_caps_name() {
        assert_eq!(to_snake_case("ABI"), "abi");
    }

    #[test]
    fn already_lower() {
        assert_eq!(to_snake_case("create"), "create");
    }

    #[test]
    fn empty_input() {
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn determinism() {
        let a = to_snake_case("GetBasicBlockTerminator");
        let b = to_snake_case("GetBasicBlockTerminator");
        assert_eq!(a, b);
    }

    #[test]
    fn reserved_names_escaped() {
        assert_eq!(escape_reserved("type"), "type_");
        assert_eq!(escape_reserved("move"), "move_");
        assert_eq!(escape_reserved("name"), "name");
    }
}
