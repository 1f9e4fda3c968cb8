//! Functions and the generic item graph

use super::ids::{FunctionId, ItemId, TypeId};

/// A function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name (placeholder `arg{index}` when the header has none)
    pub name: String,
    /// Parameter type
    pub type_id: TypeId,
}

/// A C function in the IR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Arena id
    pub id: FunctionId,
    /// Native symbol name
    pub c_name: String,
    /// Return type
    pub return_type: TypeId,
    /// Parameters in declaration order
    pub params: Vec<Param>,
    /// Always false today; variadics are never lowered
    pub is_variadic: bool,
    /// Where the declaration came from
    pub source_location: Option<String>,
    /// Doc comment attached to the declaration
    pub comment: Option<String>,
}

/// A constant value (e.g. from `#define` or an enum)
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    /// Constant name
    pub name: String,
    /// Literal value
    pub value: ConstantValue,
    /// Declared type, when known
    pub type_id: Option<TypeId>,
}

/// Literal value of a [`Constant`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// Integer literal
    Int(i64),
    /// Floating literal
    Float(f64),
    /// String literal
    Str(String),
}

/// A global variable
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVar {
    /// Variable name
    pub name: String,
    /// Variable type
    pub type_id: TypeId,
    /// Declared `const`
    pub is_const: bool,
}

/// Discriminator for [`ItemData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A type
    Type,
    /// A function
    Function,
    /// A constant
    Constant,
    /// A global variable
    GlobalVar,
}

/// Payload of an [`Item`]
#[derive(Debug, Clone, PartialEq)]
pub enum ItemData {
    /// Points at a type in the type arena
    Type(TypeId),
    /// Points at a function in the function arena
    Function(FunctionId),
    /// Constants are modeled but not produced by the builder yet
    Constant(Constant),
    /// Globals are modeled but not produced by the builder yet
    GlobalVar(GlobalVar),
}

impl ItemData {
    /// Kind tag of this payload
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemData::Type(_) => ItemKind::Type,
            ItemData::Function(_) => ItemKind::Function,
            ItemData::Constant(_) => ItemKind::Constant,
            ItemData::GlobalVar(_) => ItemKind::GlobalVar,
        }
    }
}

/// A node in the IR item graph
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Arena id
    pub id: ItemId,
    /// Payload
    pub data: ItemData,
    /// Name the item is known by
    pub canonical_name: String,
    /// Attached documentation
    pub comment: Option<String>,
    /// Whether the item passes the allow-list
    pub is_allowlisted: bool,
}

impl Item {
    /// Kind tag of this item
    pub fn kind(&self) -> ItemKind {
        self.data.kind()
    }
}
