//! Naming authority shared by both emitters
//!
//! Every generated identifier comes from here. Neither emitter builds a
//! symbol or type name on its own.

use crate::ir::struct_name;

/// Fixed namespace token at the front of every extern symbol
pub const NAMESPACE_TOKEN: &str = "lean";

/// Suffix of generated opaque handle types
pub const OPAQUE_SUFFIX: &str = "Ref";

/// Prefix of static helpers in the C glue. Adapters all start with
/// [`NAMESPACE_TOKEN`], so the two sets never collide.
const HELPER_PREFIX: &str = "bindgen";

/// Lean 4 keywords and reserved tokens that are also valid C identifiers
const LEAN_KEYWORDS: &[&str] = &[
    "Prop", "Sort", "Type", "abbrev", "at", "attribute", "axiom", "break", "builtin_initialize",
    "by", "calc", "catch", "class", "continue", "decreasing_by", "def", "deriving", "do", "elab",
    "elab_rules", "else", "end", "example", "exists", "export", "extends", "finally", "for",
    "forall", "from", "fun", "have", "hiding", "if", "import", "in", "include", "inductive",
    "infix", "infixl", "infixr", "initialize", "instance", "let", "local", "macro",
    "macro_rules", "match", "mut", "mutual", "namespace", "nofun", "nomatch", "noncomputable",
    "nonrec", "notation", "omit", "opaque", "open", "partial", "postfix", "prefix", "private",
    "protected", "renaming", "repeat", "return", "scoped", "section", "set_option", "show",
    "sorry", "structure", "suffices", "syntax", "termination_by", "then", "theorem", "this",
    "try", "unif_hint", "universe", "unless", "unsafe", "using", "variable", "where", "while",
    "with",
];

/// Extern symbol for a native function: `lean_{prefix}_{name}`
///
/// ```
/// use lean_bindgen::lean::naming::extern_symbol;
/// assert_eq!(extern_symbol("simple_math", "add"), "lean_simple_math_add");
/// ```
pub fn extern_symbol(module_prefix: &str, c_name: &str) -> String {
    format!("{}_{}_{}", NAMESPACE_TOKEN, module_prefix, c_name)
}

/// Lean type name for an opaque struct.
///
/// The `struct` keyword is dropped, the rest is split on underscores, each
/// segment gets an upper-case first letter and a lower-case tail, and
/// [`OPAQUE_SUFFIX`] is appended.
///
/// ```
/// use lean_bindgen::lean::naming::opaque_type_name;
/// assert_eq!(opaque_type_name("my_handle"), "MyHandleRef");
/// assert_eq!(opaque_type_name("struct sqlite3"), "Sqlite3Ref");
/// ```
pub fn opaque_type_name(spelling: &str) -> String {
    let mut name: String = struct_name(spelling)
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect();
    name.push_str(OPAQUE_SUFFIX);
    name
}

/// Lean identifier for a native name, guillemet-escaped when it is a keyword
pub fn lean_ident(name: &str) -> String {
    if LEAN_KEYWORDS.contains(&name) {
        format!("«{}»", name)
    } else {
        name.to_string()
    }
}

/// `base`, with underscores appended until it differs from every name in `taken`
///
/// ```
/// use lean_bindgen::lean::naming::fresh_local;
/// assert_eq!(fresh_local("result", &["a", "b"]), "result");
/// assert_eq!(fresh_local("result", &["result", "result_"]), "result__");
/// ```
pub fn fresh_local(base: &str, taken: &[&str]) -> String {
    let mut name = base.to_string();
    while taken.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// Static getter returning the external class for an opaque struct
pub fn external_class_getter(c_name: &str) -> String {
    format!("{}_{}_class", HELPER_PREFIX, c_name)
}

/// Static variable caching the registered external class
pub fn external_class_slot(c_name: &str) -> String {
    format!("{}_{}_class_ptr", HELPER_PREFIX, c_name)
}

/// Static finalizer for an opaque struct (the handle is borrowed, not owned)
pub fn external_finalizer(c_name: &str) -> String {
    format!("{}_{}_finalize", HELPER_PREFIX, c_name)
}

/// Static foreach callback for an opaque struct
pub fn external_foreach(c_name: &str) -> String {
    format!("{}_{}_foreach", HELPER_PREFIX, c_name)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extern_symbol() {
        assert_eq!(extern_symbol("simple_math", "add"), "lean_simple_math_add");
        assert_eq!(extern_symbol("mixed_api", "db_open"), "lean_mixed_api_db_open");
    }

    #[test]
    fn test_opaque_type_name() {
        assert_eq!(opaque_type_name("my_handle"), "MyHandleRef");
        assert_eq!(opaque_type_name("struct sqlite3"), "Sqlite3Ref");
        assert_eq!(opaque_type_name("db_conn"), "DbConnRef");
        assert_eq!(opaque_type_name("_private__thing"), "PrivateThingRef");
    }

    #[test]
    fn test_capitalize_lowers_tail() {
        assert_eq!(opaque_type_name("HTTP_conn"), "HttpConnRef");
    }

    #[test]
    fn test_lean_ident_escapes_keywords() {
        assert_eq!(lean_ident("fun"), "«fun»");
        assert_eq!(lean_ident("path"), "path");
    }

    #[test]
    fn test_lean_ident_escapes_command_and_sort_keywords() {
        for word in [
            "try", "catch", "finally", "partial", "axiom", "abbrev", "unsafe", "macro", "syntax",
            "local", "mutual", "noncomputable", "calc", "suffices", "nomatch", "unless", "repeat",
            "notation", "infix", "Type", "Prop", "Sort",
        ] {
            assert_eq!(lean_ident(word), format!("«{}»", word));
        }
        assert_eq!(lean_ident("type"), "type");
    }

    #[test]
    fn test_fresh_local_avoids_taken_names() {
        assert_eq!(fresh_local("result", &[]), "result");
        assert_eq!(fresh_local("result", &["result"]), "result_");
    }

    #[test]
    fn test_helpers_never_look_like_adapters() {
        assert!(!external_class_getter("db_conn").starts_with(NAMESPACE_TOKEN));
        assert_eq!(external_finalizer("db_conn"), "bindgen_db_conn_finalize");
    }
}
