//! Class and module object model.
//!
//! Every class, module, singleton class and include proxy is a `ClassNode`
//! stored in the `ObjectSpace` arena and addressed by `ClassId`. Method
//! tables and variable tables live in their own arenas; include proxies
//! alias the tables of the module they stand for, and table identity
//! (arena index, never content) is what "the same module" means.
//!
//! # Architecture
//!
//! ```text
//! ObjectSpace
//! ├── nodes: Arena<ClassNode>          (classes, modules, singletons, proxies)
//! ├── method_tables: Arena<MethodTable> (owned by one node, viewed by proxies)
//! ├── var_tables: Arena<VarTable>       (same ownership rule)
//! └── instances: Arena<Instance>        (plain heap objects)
//! ```
//!
//! Structural mutators (`include_module`, `singleton_class_of`,
//! `clone_singleton`, method definition) take `&mut ObjectSpace`; the
//! read-only queries in `introspect` take `&ObjectSpace`.

pub mod class;
pub mod handle;
pub mod include;
pub mod introspect;
pub mod method_table;
pub mod methods;
pub mod shared;
pub mod singleton;
pub mod space;
pub mod symbol_map;
pub mod value;
pub mod var_table;

use garnet_core::Id;

pub use class::{ClassFlags, ClassKind, ClassNode};
pub use handle::{Owned, TableRef, View};
pub use introspect::{Ancestors, MethodFilter, SuperChain};
pub use method_table::{MethodBody, MethodEntry, MethodKind, MethodSlot, MethodTable, Visibility};
pub use shared::SharedObjectSpace;
pub use space::{BootClasses, ObjectSpace};
pub use value::{Instance, ObjectFlags, Value};
pub use var_table::VarTable;

/// Handle of a class, module, singleton class or include proxy.
pub type ClassId = Id<ClassNode>;

/// Handle of a heap instance.
pub type ObjectId = Id<Instance>;

/// Slot name under which a singleton class records its attached object.
///
/// The leading underscores keep it out of reach of `@ivar` syntax.
pub const ATTACHED_SLOT: &str = "__attached__";
