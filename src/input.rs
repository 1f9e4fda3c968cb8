//! Declaration list produced by the C front end
//!
//! The front end (libclang or anything else) hands over finished records; the
//! builder never looks at C source text. Native kind tags use Clang's canonical
//! `TypeKind` names so `int`, `int32_t` and `signed int` all arrive as `INT`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical native type kind as reported by the front end
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NativeKind {
    /// `char` on targets where it is signed
    CharS,
    /// `char` on targets where it is unsigned
    CharU,
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
    /// `float`
    Float,
    /// `double`
    Double,
    /// `long double`
    LongDouble,
    /// `void`
    Void,
    /// Any pointer
    Pointer,
    /// `struct` or `union`
    Record,
    /// Function type with a prototype
    FunctionProto,
    /// K&R function type
    FunctionNoProto,
    /// Anything else (enums, arrays, bool, ...), kept verbatim
    Other(String),
}

impl NativeKind {
    /// Clang tag for this kind
    pub fn as_tag(&self) -> &str {
        match self {
            NativeKind::CharS => "CHAR_S",
            NativeKind::CharU => "CHAR_U",
            NativeKind::SChar => "SCHAR",
            NativeKind::UChar => "UCHAR",
            NativeKind::Short => "SHORT",
            NativeKind::UShort => "USHORT",
            NativeKind::Int => "INT",
            NativeKind::UInt => "UINT",
            NativeKind::Long => "LONG",
            NativeKind::ULong => "ULONG",
            NativeKind::LongLong => "LONGLONG",
            NativeKind::ULongLong => "ULONGLONG",
            NativeKind::Float => "FLOAT",
            NativeKind::Double => "DOUBLE",
            NativeKind::LongDouble => "LONGDOUBLE",
            NativeKind::Void => "VOID",
            NativeKind::Pointer => "POINTER",
            NativeKind::Record => "RECORD",
            NativeKind::FunctionProto => "FUNCTIONPROTO",
            NativeKind::FunctionNoProto => "FUNCTIONNOPROTO",
            NativeKind::Other(tag) => tag,
        }
    }

    /// Plain `char`, whichever signedness the target gives it
    pub fn is_plain_char(&self) -> bool {
        matches!(self, NativeKind::CharS | NativeKind::CharU)
    }
}

impl From<String> for NativeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "CHAR_S" => NativeKind::CharS,
            "CHAR_U" => NativeKind::CharU,
            "SCHAR" => NativeKind::SChar,
            "UCHAR" => NativeKind::UChar,
            "SHORT" => NativeKind::Short,
            "USHORT" => NativeKind::UShort,
            "INT" => NativeKind::Int,
            "UINT" => NativeKind::UInt,
            "LONG" => NativeKind::Long,
            "ULONG" => NativeKind::ULong,
            "LONGLONG" => NativeKind::LongLong,
            "ULONGLONG" => NativeKind::ULongLong,
            "FLOAT" => NativeKind::Float,
            "DOUBLE" => NativeKind::Double,
            "LONGDOUBLE" => NativeKind::LongDouble,
            "VOID" => NativeKind::Void,
            "POINTER" => NativeKind::Pointer,
            "RECORD" => NativeKind::Record,
            "FUNCTIONPROTO" => NativeKind::FunctionProto,
            "FUNCTIONNOPROTO" => NativeKind::FunctionNoProto,
            _ => NativeKind::Other(tag),
        }
    }
}

impl From<NativeKind> for String {
    fn from(kind: NativeKind) -> Self {
        kind.as_tag().to_string()
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// What a pointer points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointeeDesc {
    /// Pointee spelling, e.g. `char` or `struct sqlite3`
    pub spelling: String,
    /// Canonical kind of the pointee
    pub kind: NativeKind,
    /// Whether the pointee is const-qualified
    #[serde(default)]
    pub is_const: bool,
}

/// A type as the front end saw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDesc {
    /// Canonical kind
    pub kind: NativeKind,
    /// User-facing spelling, e.g. `uint32_t` or `const char *`
    pub spelling: String,
    /// Present for pointer kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointee: Option<PointeeDesc>,
}

impl TypeDesc {
    /// A non-pointer type
    pub fn new(kind: NativeKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            pointee: None,
        }
    }

    /// A pointer type
    pub fn pointer(spelling: impl Into<String>, pointee: PointeeDesc) -> Self {
        Self {
            kind: NativeKind::Pointer,
            spelling: spelling.into(),
            pointee: Some(pointee),
        }
    }
}

/// A function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name; absent for unnamed parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parameter type
    #[serde(rename = "type")]
    pub ty: TypeDesc,
}

/// A function declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function name
    pub name: String,
    /// Return type
    pub return_type: TypeDesc,
    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Source file (and position) of the declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<String>,
    /// Attached doc comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A typedef declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefDecl {
    /// Typedef name
    pub name: String,
    /// Spelling of the underlying type, e.g. `struct db_conn`
    pub underlying: String,
    /// Canonical kind of the underlying type
    pub underlying_kind: NativeKind,
    /// Whether the underlying type is a struct
    #[serde(default)]
    pub is_struct: bool,
}

/// Everything the front end extracted from one header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDecls {
    /// Function declarations in header order
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    /// Typedef declarations in header order
    #[serde(default)]
    pub typedefs: Vec<TypedefDecl>,
}

impl HeaderDecls {
    /// Parse a declaration list from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::input(format!("malformed declaration list: {}", e)))
    }

    /// Read a declaration list from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::input(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}
