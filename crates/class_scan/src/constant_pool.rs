use std::collections::HashMap;

/// String views over one class file's constant pool.
///
/// Only Utf8 entries (and Class entries once resolved to the name they
/// reference) carry a string; every other entry kind is decoded far enough
/// to keep the slot arithmetic right and then dropped. Slot 0 is never
/// used, and Long/Double entries burn a second slot that must never be
/// dereferenced, so the forward table holds `Option<String>` per slot.
#[derive(Debug, Default)]
pub struct ConstantPool {
    strings: Vec<Option<String>>,
    indices: HashMap<String, u16>,
    pending_classes: Vec<(u16, u16)>,
}

impl ConstantPool {
    pub(crate) fn with_slot_count(count: u16) -> Self {
        Self {
            strings: vec![None; count as usize],
            indices: HashMap::new(),
            pending_classes: Vec::new(),
        }
    }

    pub(crate) fn put_utf8(&mut self, index: u16, s: String) {
        self.indices.entry(s.clone()).or_insert(index);
        self.strings[index as usize] = Some(s);
    }

    /// A Class entry may name a Utf8 slot that has not been read yet, so
    /// the cross-reference is held back and applied by [`resolve_classes`]
    /// once the whole pool has been read.
    ///
    /// [`resolve_classes`]: ConstantPool::resolve_classes
    pub(crate) fn defer_class(&mut self, index: u16, name_index: u16) {
        self.pending_classes.push((index, name_index));
    }

    pub(crate) fn resolve_classes(&mut self) {
        for (index, name_index) in std::mem::take(&mut self.pending_classes) {
            let Some(name) = self.strings.get(name_index as usize).cloned().flatten() else {
                continue;
            };
            self.indices.entry(name.clone()).or_insert(index);
            self.strings[index as usize] = Some(name);
        }
    }

    /// The string at a pool slot, if that slot resolved to one.
    pub fn get(&self, index: u16) -> Option<&str> {
        self.strings.get(index as usize)?.as_deref()
    }

    /// The first slot that produced this exact string, if any. Attribute
    /// name indices are compared against this.
    pub fn index_of(&self, s: &str) -> Option<u16> {
        self.indices.get(s).copied()
    }

    pub fn contains(&self, s: &str) -> bool {
        self.indices.contains_key(s)
    }
}
