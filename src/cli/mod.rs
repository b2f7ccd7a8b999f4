use crate::emitter;
use crate::parser::DefinitionParser;
use crate::table::TableBuilder;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Compiles a VM opcode definition file into symbol and dispatch table sources
#[derive(Parser, Debug)]
#[command(name = "opcodegen", version)]
pub struct Cli {
    /// Opcode definition file, one `MNEMONIC CODE` pair per line
    pub definitions: PathBuf,

    /// Destination for the generated symbol header
    pub header_out: PathBuf,

    /// Destination for the generated table source
    pub table_out: PathBuf,
}

pub struct CliHandler {
    parser: DefinitionParser,
    builder: TableBuilder,
}

impl CliHandler {
    pub fn new() -> Self {
        Self {
            parser: DefinitionParser::new(),
            builder: TableBuilder::new(),
        }
    }

    /// Run the full pipeline: read definitions, parse, build, emit.
    ///
    /// Parsing completes before either output file is created, so a malformed
    /// definition never leaves a partial artifact behind.
    pub fn handle(&self, cli: Cli) -> Result<()> {
        let source = fs::read_to_string(&cli.definitions)
            .with_context(|| format!("Failed to read {}", cli.definitions.display()))?;

        let table = self.parser.parse(&source)?;
        let tables = self.builder.build(&table);

        emitter::write_symbol_header(&tables, &cli.header_out)
            .with_context(|| format!("Failed to write {}", cli.header_out.display()))?;
        emitter::write_table_source(&tables, &cli.table_out)
            .with_context(|| format!("Failed to write {}", cli.table_out.display()))?;

        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cli(dir: &std::path::Path) -> Cli {
        Cli {
            definitions: dir.join("vm_codes"),
            header_out: dir.join("vm_opcodes.h"),
            table_out: dir.join("vm_opcodes.c"),
        }
    }

    #[test]
    fn test_handle_full_pipeline() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        fs::write(&cli.definitions, "; VM opcodes\nADD 0x00\nSUB 0x01\nJMP 0x10\n").unwrap();

        let header_out = cli.header_out.clone();
        let table_out = cli.table_out.clone();
        CliHandler::new().handle(cli).unwrap();

        let header = fs::read_to_string(&header_out).unwrap();
        let source = fs::read_to_string(&table_out).unwrap();
        assert!(header.contains("#define VM_ADD"));
        assert!(source.contains("\"ADD\", \"SUB\", \"JMP\""));
    }

    #[test]
    fn test_handle_malformed_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        fs::write(&cli.definitions, "ADD 0x00\n!!!not-an-opcode\n").unwrap();

        let header_out = cli.header_out.clone();
        let table_out = cli.table_out.clone();
        let err = CliHandler::new().handle(cli).unwrap_err();

        assert!(err.to_string().contains("line 2"));
        assert!(!header_out.exists());
        assert!(!table_out.exists());
    }

    #[test]
    fn test_handle_missing_definitions_file() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());

        let err = CliHandler::new().handle(cli).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_handle_reruns_are_byte_identical() {
        let dir = tempdir().unwrap();
        let definitions = dir.path().join("vm_codes");
        fs::write(&definitions, "NOP 0x00\nHALT 0x01\n").unwrap();

        let handler = CliHandler::new();
        let mut outputs = Vec::new();
        for run in ["a", "b"] {
            let cli = Cli {
                definitions: definitions.clone(),
                header_out: dir.path().join(format!("{}.h", run)),
                table_out: dir.path().join(format!("{}.c", run)),
            };
            let header_out = cli.header_out.clone();
            let table_out = cli.table_out.clone();
            handler.handle(cli).unwrap();
            outputs.push((fs::read(header_out).unwrap(), fs::read(table_out).unwrap()));
        }

        assert_eq!(outputs[0], outputs[1]);
    }
}
