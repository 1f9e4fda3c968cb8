//! C type model
//!
//! [`TypeKind`] is a closed union: every consumer matches it exhaustively, so a
//! new variant fails to compile wherever it is not handled.

use std::fmt;

use super::ids::TypeId;

/// Integer type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    /// `char`
    Char,
    /// `signed char`
    SChar,
    /// `unsigned char`
    UChar,
    /// `short`
    Short,
    /// `unsigned short`
    UShort,
    /// `int`
    Int,
    /// `unsigned int`
    UInt,
    /// `long`
    Long,
    /// `unsigned long`
    ULong,
    /// `long long`
    LongLong,
    /// `unsigned long long`
    ULongLong,
}

impl IntKind {
    /// Signedness of the kind. Plain `char` counts as signed.
    pub fn is_signed(self) -> bool {
        !matches!(
            self,
            IntKind::UChar | IntKind::UShort | IntKind::UInt | IntKind::ULong | IntKind::ULongLong
        )
    }

    /// Plain `char` (the only kind a C string is made of)
    pub fn is_plain_char(self) -> bool {
        self == IntKind::Char
    }

    /// Storage width class in bytes (LP64)
    pub fn width(self) -> u8 {
        match self {
            IntKind::Char | IntKind::SChar | IntKind::UChar => 1,
            IntKind::Short | IntKind::UShort => 2,
            IntKind::Int | IntKind::UInt => 4,
            IntKind::Long | IntKind::ULong | IntKind::LongLong | IntKind::ULongLong => 8,
        }
    }
}

/// Floating point type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    /// `float`
    Float,
    /// `double`
    Double,
    /// `long double`
    LongDouble,
}

/// Semantic classification of pointer usage.
///
/// The builder only produces `Opaque` and `String`; the rest are reserved and
/// the mapper rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Opaque handle like `sqlite3 *`
    Opaque,
    /// `const char *` string
    String,
    /// `void *` plus length buffer
    Buffer,
    /// Output parameter like `int *`
    OutParam,
    /// Function pointer (callback)
    Function,
    /// Regular typed pointer
    Typed,
}

/// Memory layout of a type, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Size in bytes
    pub size: u64,
    /// Alignment in bytes
    pub align: u64,
}

/// Structural shape of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Integer with signedness
    Int {
        /// Which C integer type
        kind: IntKind,
        /// Signed or not, fixed by `kind`
        is_signed: bool,
    },
    /// Floating point
    Float {
        /// Which C floating type
        kind: FloatKind,
    },
    /// Pointer with semantic classification
    Pointer {
        /// Pointed-to type
        pointee: TypeId,
        /// How the pointer is used
        classification: PointerKind,
        /// Whether the pointee is const-qualified
        is_const: bool,
    },
    /// `void`, only valid as a return type
    Void,
    /// A typedef naming another type
    Alias {
        /// Typedef name
        name: String,
        /// Aliased type
        target: TypeId,
    },
    /// A struct seen only through a pointer; its layout is never examined
    Opaque {
        /// Struct or typedef name without the `struct` keyword
        name: String,
    },
}

/// A type in the IR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    /// Arena id
    pub id: TypeId,
    /// Structural shape
    pub kind: TypeKind,
    /// Typedef resolution link
    pub canonical: Option<TypeId>,
    /// Original C spelling
    pub c_spelling: String,
    /// Memory layout, when known
    pub layout: Option<Layout>,
}

/// Struct name behind a spelling: drops a leading `const` and `struct` keyword.
///
/// `"struct sqlite3"` gives `"sqlite3"`, `"my_handle"` is returned unchanged.
pub fn struct_name(spelling: &str) -> &str {
    let mut name = spelling.trim();
    if let Some(rest) = name.strip_prefix("const ") {
        name = rest.trim_start();
    }
    name.strip_prefix("struct ")
        .map(str::trim_start)
        .unwrap_or(name)
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntKind::Char => "char",
            IntKind::SChar => "signed char",
            IntKind::UChar => "unsigned char",
            IntKind::Short => "short",
            IntKind::UShort => "unsigned short",
            IntKind::Int => "int",
            IntKind::UInt => "unsigned int",
            IntKind::Long => "long",
            IntKind::ULong => "unsigned long",
            IntKind::LongLong => "long long",
            IntKind::ULongLong => "unsigned long long",
        };
        f.write_str(s)
    }
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloatKind::Float => f.write_str("float"),
            FloatKind::Double => f.write_str("double"),
            FloatKind::LongDouble => f.write_str("long double"),
        }
    }
}

impl fmt::Display for PointerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PointerKind::Opaque => "opaque",
            PointerKind::String => "string",
            PointerKind::Buffer => "buffer",
            PointerKind::OutParam => "out-param",
            PointerKind::Function => "function",
            PointerKind::Typed => "typed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signedness_table() {
        assert!(IntKind::Char.is_signed());
        assert!(IntKind::SChar.is_signed());
        assert!(!IntKind::UChar.is_signed());
        assert!(IntKind::Long.is_signed());
        assert!(!IntKind::ULongLong.is_signed());
    }

    #[test]
    fn test_struct_name() {
        assert_eq!(struct_name("struct sqlite3"), "sqlite3");
        assert_eq!(struct_name("const struct db_conn"), "db_conn");
        assert_eq!(struct_name("my_handle"), "my_handle");
    }

    #[test]
    fn test_width_ignores_signedness() {
        assert_eq!(IntKind::Int.width(), IntKind::UInt.width());
        assert_eq!(IntKind::Long.width(), IntKind::ULongLong.width());
        assert_eq!(IntKind::SChar.width(), 1);
    }
}
