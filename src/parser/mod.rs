use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comment marker in opcode definition files; lines starting with it are skipped.
pub const COMMENT_MARKER: char = ';';

/// A single parsed opcode declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeEntry {
    pub mnemonic: String,
    pub code: u8,
}

impl OpcodeEntry {
    pub fn new(mnemonic: impl Into<String>, code: u8) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            code,
        }
    }
}

impl fmt::Display for OpcodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0x{:02X}", self.mnemonic, self.code)
    }
}

/// Ordered collection of opcode declarations, unique by code.
///
/// Insertion order is declaration order. Re-declaring a code replaces the old
/// entry and moves it to the back, so an entry's position always reflects the
/// last write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeTable {
    entries: Vec<OpcodeEntry>,
}

impl OpcodeTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an entry; a later declaration with the same code wins.
    pub fn insert(&mut self, entry: OpcodeEntry) {
        if let Some(pos) = self.entries.iter().position(|e| e.code == entry.code) {
            self.entries.remove(pos);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[OpcodeEntry] {
        &self.entries
    }

    pub fn get(&self, code: u8) -> Option<&OpcodeEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parser for plain-text opcode definition files
///
/// One declaration per line: `MNEMONIC CODE`, where the code is decimal or
/// `0x`-prefixed hexadecimal. Blank lines and `;` comments are ignored. The
/// first malformed line aborts the whole parse.
pub struct DefinitionParser {
    mnemonic_pattern: Regex,
}

impl DefinitionParser {
    pub fn new() -> Self {
        Self {
            mnemonic_pattern: Regex::new(r"^[A-Za-z_][A-Za-z_0-9]*$")
                .expect("mnemonic pattern is valid"),
        }
    }

    pub fn parse(&self, source: &str) -> Result<OpcodeTable, ParseError> {
        let mut table = OpcodeTable::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_number = idx + 1; // diagnostics are 1-based
            let line = raw.trim();

            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 2 {
                return Err(ParseError::MalformedLine {
                    line: line_number,
                    content: line.to_string(),
                });
            }

            let mnemonic = tokens[0];
            if !self.mnemonic_pattern.is_match(mnemonic) {
                return Err(ParseError::InvalidMnemonic {
                    line: line_number,
                    token: mnemonic.to_string(),
                });
            }

            let code = parse_code(tokens[1]).ok_or_else(|| ParseError::InvalidCode {
                line: line_number,
                token: tokens[1].to_string(),
            })?;

            // Symbolic constants are uppercase by convention
            table.insert(OpcodeEntry::new(mnemonic.to_uppercase(), code));
        }

        Ok(table)
    }
}

impl Default for DefinitionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a code token as decimal or `0x`/`0X` hexadecimal, rejecting values
/// that do not fit in a byte.
fn parse_code(token: &str) -> Option<u8> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else {
        token.parse::<u8>().ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed opcode definition at line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("Invalid mnemonic '{token}' at line {line}")]
    InvalidMnemonic { line: usize, token: String },

    #[error("Invalid opcode value '{token}' at line {line}")]
    InvalidCode { line: usize, token: String },
}

impl ParseError {
    /// 1-based source line of the offending definition
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedLine { line, .. }
            | ParseError::InvalidMnemonic { line, .. }
            | ParseError::InvalidCode { line, .. } => *line,
        }
    }
}
