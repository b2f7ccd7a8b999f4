use crate::parser::{OpcodeEntry, OpcodeTable};
use serde::{Deserialize, Serialize};

/// Sentinel offset for code values with no declared opcode
pub const NO_ENTRY: i32 = -1;

/// Size of the 8-bit opcode space
pub const CODE_SPACE: usize = 256;

/// The three synchronized views the dispatch loop consumes
///
/// `symbols` holds the declarations in their final order, `offsets` maps every
/// possible code value to a declaration index (or [`NO_ENTRY`]), and `names`
/// is `symbols` projected to mnemonics with the same indexing. Built once,
/// then handed read-only to the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTables {
    pub symbols: Vec<OpcodeEntry>,
    pub offsets: Vec<i32>,
    pub names: Vec<String>,
}

impl DispatchTables {
    /// Look up the mnemonic for a raw code value, if one is declared.
    pub fn name_of(&self, code: u8) -> Option<&str> {
        match self.offsets.get(code as usize).copied() {
            Some(offset) if offset != NO_ENTRY => Some(&self.names[offset as usize]),
            _ => None,
        }
    }
}

/// Derives the dispatch tables from a fully parsed opcode table.
///
/// Runs strictly after parsing completes; driving it from a partially built
/// table would bake in offsets for entries that later get overwritten.
pub struct TableBuilder {
    code_space: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            code_space: CODE_SPACE,
        }
    }

    /// Override the code space size for VMs with non-8-bit opcode spaces.
    pub fn with_code_space(mut self, code_space: usize) -> Self {
        self.code_space = code_space;
        self
    }

    pub fn build(&self, table: &OpcodeTable) -> DispatchTables {
        let symbols: Vec<OpcodeEntry> = table.entries().to_vec();

        // A code outside the space means the parser contract was broken
        debug_assert!(
            symbols.iter().all(|e| (e.code as usize) < self.code_space),
            "opcode outside the configured code space"
        );

        let mut offsets = vec![NO_ENTRY; self.code_space];
        for value in 0..self.code_space {
            if let Some(index) = symbols.iter().position(|e| e.code as usize == value) {
                offsets[value] = index as i32;
            }
        }

        let names = symbols.iter().map(|e| e.mnemonic.clone()).collect();

        DispatchTables {
            symbols,
            offsets,
            names,
        }
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
