//! Writers for the generated C artifacts

use crate::table::DispatchTables;
use std::fs::File;
use std::io::{BufWriter, Error as IoError, Write};
use std::path::Path;

/// Column budget for wrapped array initializer lines
const WRAP_WIDTH: usize = 75;

const BANNER: &str = "/*\n * WARNING: THIS FILE IS AUTOGENERATED! DO NOT EDIT BY HAND.\n */\n";

/// Writes the symbol header artifact: one `#define` per declared mnemonic plus
/// the extern declarations for the tables the source artifact populates.
pub fn write_symbol_header<P: AsRef<Path>>(
    tables: &DispatchTables,
    path: P,
) -> Result<(), IoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(BANNER.as_bytes())?;
    writeln!(writer, "#ifndef __VM_OPCODES_H__")?;
    writeln!(writer, "#define __VM_OPCODES_H__")?;
    writeln!(writer)?;

    for entry in &tables.symbols {
        writeln!(
            writer,
            "    #define VM_{:<20}0x{:02X}",
            entry.mnemonic, entry.code
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "extern int vm_codes_index[{}];", tables.symbols.len())?;
    writeln!(writer, "extern int vm_codes_offset[{}];", tables.offsets.len())?;
    writeln!(writer, "extern char *vm_code_names[{}];", tables.names.len())?;
    writeln!(writer)?;

    writeln!(writer, "#endif")?;
    writer.flush()?;
    Ok(())
}

/// Writes the table source artifact: declared codes in declaration order, the
/// dense offset table, and the aligned name table.
pub fn write_table_source<P: AsRef<Path>>(
    tables: &DispatchTables,
    path: P,
) -> Result<(), IoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(BANNER.as_bytes())?;
    writeln!(writer)?;

    let codes: Vec<String> = tables
        .symbols
        .iter()
        .map(|e| format!("0x{:02X}", e.code))
        .collect();
    write_array(&mut writer, "int vm_codes_index", tables.symbols.len(), &codes)?;

    let offsets: Vec<String> = tables.offsets.iter().map(|o| o.to_string()).collect();
    write_array(
        &mut writer,
        "int vm_codes_offset",
        tables.offsets.len(),
        &offsets,
    )?;

    let names: Vec<String> = tables.names.iter().map(|n| format!("\"{}\"", n)).collect();
    write_array(&mut writer, "char *vm_code_names", tables.names.len(), &names)?;

    writer.flush()?;
    Ok(())
}

fn write_array<W: Write>(
    writer: &mut W,
    declaration: &str,
    size: usize,
    items: &[String],
) -> Result<(), IoError> {
    writeln!(writer, "{}[{}] = {{", declaration, size)?;
    writeln!(writer, "{}", wrap_join(items, WRAP_WIDTH, "    "))?;
    writeln!(writer, "}};")?;
    writeln!(writer)?;
    Ok(())
}

/// Joins items with `", "`, breaking onto a fresh indented line once a line
/// would pass `width` columns.
fn wrap_join(items: &[String], width: usize, indent: &str) -> String {
    let mut out = String::new();
    let mut line = String::from(indent);

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            line.push(',');
            if line.len() + 1 + item.len() > width {
                out.push_str(&line);
                out.push('\n');
                line = String::from(indent);
            } else {
                line.push(' ');
            }
        }
        line.push_str(item);
    }
    out.push_str(&line);
    out
}
