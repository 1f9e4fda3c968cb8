//! IR context - owner of every arena
//!
//! One context is built per header. It is only mutated while the
//! [`IrBuilder`](super::IrBuilder) runs and is read-only afterwards.

use std::collections::HashSet;

use super::arena::Arena;
use super::function::{Function, Item, ItemData};
use super::ids::{FunctionId, ItemId, TypeId};
use super::types::{Layout, Type, TypeKind};
use crate::config::BindgenConfig;
use crate::error::{InvariantViolation, Result};

/// Central context that holds the entire IR graph
#[derive(Debug, Clone)]
pub struct IRContext {
    /// Configuration the IR was built for
    pub config: BindgenConfig,
    types: Arena<TypeId, Type>,
    functions: Arena<FunctionId, Function>,
    items: Arena<ItemId, Item>,
    supported_functions: Vec<FunctionId>,
}

impl IRContext {
    /// Create an empty context
    pub fn new(config: BindgenConfig) -> Self {
        Self {
            config,
            types: Arena::new(),
            functions: Arena::new(),
            items: Arena::new(),
            supported_functions: Vec::new(),
        }
    }

    /// Add a type and return its id
    pub fn add_type(
        &mut self,
        kind: TypeKind,
        c_spelling: impl Into<String>,
        canonical: Option<TypeId>,
        layout: Option<Layout>,
    ) -> Result<TypeId> {
        if let TypeKind::Pointer { pointee, .. } = &kind {
            self.require_type(*pointee)?;
        }
        if let Some(target) = canonical {
            self.require_type(target)?;
        }
        let c_spelling = c_spelling.into();
        let id = self.types.alloc_with(|id| Type {
            id,
            kind,
            canonical,
            c_spelling,
            layout,
        })?;
        Ok(id)
    }

    /// Add a function and return its id. The function's `id` field is overwritten.
    pub fn add_function(&mut self, mut func: Function) -> Result<FunctionId> {
        self.require_type(func.return_type)?;
        for param in &func.params {
            self.require_type(param.type_id)?;
        }
        let id = self.functions.alloc_with(|id| {
            func.id = id;
            func
        })?;
        Ok(id)
    }

    /// Add an item and return its id
    pub fn add_item(
        &mut self,
        data: ItemData,
        canonical_name: impl Into<String>,
        comment: Option<String>,
        is_allowlisted: bool,
    ) -> Result<ItemId> {
        match &data {
            ItemData::Type(id) => {
                self.require_type(*id)?;
            }
            ItemData::Function(id) => {
                self.require_function(*id)?;
            }
            ItemData::Constant(_) | ItemData::GlobalVar(_) => {}
        }
        let canonical_name = canonical_name.into();
        let id = self.items.alloc_with(|id| Item {
            id,
            data,
            canonical_name,
            comment,
            is_allowlisted,
        })?;
        Ok(id)
    }

    /// Look up a type by id
    pub fn get_type(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id)
    }

    /// Look up a function by id
    pub fn get_function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id)
    }

    /// Look up an item by id
    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Look up a type that must exist
    pub fn require_type(&self, id: TypeId) -> Result<&Type> {
        self.types
            .get(id)
            .ok_or_else(|| InvariantViolation::DanglingType(id).into())
    }

    /// Look up a function that must exist
    pub fn require_function(&self, id: FunctionId) -> Result<&Function> {
        self.functions
            .get(id)
            .ok_or_else(|| InvariantViolation::DanglingFunction(id).into())
    }

    /// Look up an item that must exist
    pub fn require_item(&self, id: ItemId) -> Result<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| InvariantViolation::DanglingItem(id).into())
    }

    /// Link `alias` to its canonical type after both exist
    pub fn set_canonical(&mut self, alias: TypeId, canonical: TypeId) -> Result<()> {
        self.require_type(canonical)?;
        let typ = self
            .types
            .get_mut(alias)
            .ok_or(InvariantViolation::DanglingType(alias))?;
        typ.canonical = Some(canonical);
        Ok(())
    }

    /// Follow typedef links to the canonical type.
    ///
    /// Returns `type_id` itself when it has no `canonical` link. A cycle or a
    /// dangling link is an invariant violation.
    pub fn resolve_canonical_type(&self, type_id: TypeId) -> Result<TypeId> {
        let mut visited = HashSet::new();
        let mut current = type_id;
        loop {
            if !visited.insert(current) {
                return Err(InvariantViolation::CanonicalCycle {
                    start: type_id,
                    revisited: current,
                }
                .into());
            }
            match self.require_type(current)?.canonical {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
    }

    /// All types in allocation order
    pub fn all_types(&self) -> impl Iterator<Item = &Type> {
        self.types.iter()
    }

    /// All functions in allocation order
    pub fn all_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter()
    }

    /// All items in allocation order
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Number of types
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of functions
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Mark a function as supported for code generation. Re-marking is a no-op.
    pub fn mark_function_supported(&mut self, id: FunctionId) -> Result<()> {
        self.require_function(id)?;
        if !self.supported_functions.contains(&id) {
            self.supported_functions.push(id);
        }
        Ok(())
    }

    /// Supported function ids in the order they were marked
    pub fn get_supported_functions(&self) -> &[FunctionId] {
        &self.supported_functions
    }
}
