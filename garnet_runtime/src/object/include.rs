//! Module inclusion.
//!
//! Including `M` into `C` splices an include proxy for `M` between `C` and
//! its superclass:
//!
//! ```text
//! before:  C ──> S ──> ...
//! after:   C ──> [M] ──> S ──> ...
//! ```
//!
//! Modules included by `M` itself sit on `M`'s own superclass chain as
//! proxies; each gets its own proxy further away from `C`, in order.
//! A module already present above `C` (compared by method table identity)
//! is skipped, and when no class lies between `C` and that occurrence the
//! insertion point moves behind it.

use super::class::{ClassKind, ClassNode};
use super::space::ObjectSpace;
use super::ClassId;
use garnet_core::{GarnetError, GarnetResult};
use smallvec::SmallVec;

impl ObjectSpace {
    /// Include `module` and the modules it includes into `target`.
    ///
    /// Returns whether any proxy was spliced. The method cache is
    /// invalidated exactly when it returns `true`.
    pub fn include_module(&mut self, target: ClassId, module: ClassId) -> GarnetResult<bool> {
        self.check_frozen_class(target)?;
        if self.node(target).is_include_proxy() {
            return Err(GarnetError::type_error("can't include into an include proxy"));
        }
        self.expect_module(module)?;

        let entries: SmallVec<[ClassId; 8]> = self
            .superclass_chain(Some(module))
            .map(|(id, _)| id)
            .collect();

        let own_table = self.node(target).methods().id();
        if entries
            .iter()
            .any(|&entry| self.node(entry).methods().id() == own_table)
        {
            return Err(GarnetError::argument_error("cyclic include detected"));
        }

        let mut insertion_point = target;
        let mut changed = false;

        for &entry in &entries {
            match self.find_included(target, entry) {
                Some((existing, superclass_seen)) => {
                    if !superclass_seen {
                        insertion_point = existing;
                    }
                    if let Some(stats) = self.tracked() {
                        stats.record_skipped_include();
                    }
                }
                None => {
                    let next = self.node(insertion_point).superclass();
                    let proxy = self.new_include_proxy(entry, next);
                    self.nodes[insertion_point].set_superclass(Some(proxy));
                    insertion_point = proxy;
                    changed = true;

                    if let Some(stats) = self.tracked() {
                        stats.record_proxy();
                    }
                    self.trace(|| {
                        format!(
                            "include {} <- {}",
                            self.inspect_class(target),
                            self.inspect_class(proxy)
                        )
                    });
                }
            }
        }

        if changed {
            self.invalidate_all();
        }
        Ok(changed)
    }

    /// Proxy above `target` sharing `entry`'s method table, and whether a
    /// class was crossed before reaching it.
    fn find_included(&self, target: ClassId, entry: ClassId) -> Option<(ClassId, bool)> {
        let table = self.node(entry).methods().id();
        let mut superclass_seen = false;

        for (id, node) in self.superclass_chain(self.node(target).superclass()) {
            match node.kind() {
                ClassKind::IncludeProxy => {
                    if node.methods().id() == table {
                        return Some((id, superclass_seen));
                    }
                }
                ClassKind::Class | ClassKind::Singleton => superclass_seen = true,
                ClassKind::Module => {}
            }
        }
        None
    }

    /// A proxy for `module` (or for the module behind a proxy) linking to
    /// `superclass`. The module's variable table is created if missing so
    /// both nodes share it from the start.
    pub(crate) fn new_include_proxy(
        &mut self,
        module: ClassId,
        superclass: Option<ClassId>,
    ) -> ClassId {
        let module = self.node(module).included_module().unwrap_or(module);
        let vars = self.ensure_var_table(module);
        let methods = self.node(module).methods();
        self.nodes
            .alloc(ClassNode::include_proxy(module, superclass, methods, vars))
    }
}
