use anyhow::{Context, Result};
use clap::Parser;
use sad::analysis::{assess_normality, execute};
use sad::cli::{to_index, Cli, Command, GridOp};
use sad::clipboard::{copy_cell, paste, parse_block};
use sad::config::{ReportFormat, SadConfig};
use sad::report::Report;
use sad::table::Table;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// `<dir>/<stem>_report.<ext>` next to the table file
fn default_report_path(table_path: &Path, format: ReportFormat) -> PathBuf {
    let stem = table_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sad".to_string());
    table_path.with_file_name(format!("{}_report.{}", stem, format.extension()))
}

fn read_block_text(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read paste input: {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read paste input from stdin")?;
            Ok(text)
        }
    }
}

fn run(command: Command, config: &SadConfig) -> Result<()> {
    match command {
        Command::Init {
            file,
            rows,
            columns,
            force,
        } => {
            if file.exists() && !force {
                anyhow::bail!(
                    "Table file already exists: {} (use --force to overwrite)",
                    file.display()
                );
            }
            let rows = rows.unwrap_or(config.table.default_rows);
            let columns = columns.unwrap_or(config.table.default_columns);
            let table = Table::new(rows, columns)?;
            table.save(&file)?;
            println!(
                "Created {}x{} table: {}",
                rows,
                columns,
                file.display()
            );
        }

        Command::Show { file } => {
            let table = Table::load(&file)?;
            print!("{}", table);
        }

        Command::Set {
            file,
            row,
            col,
            value,
        } => {
            let mut table = Table::load(&file)?;
            table.set_text(to_index(row, "Row")?, to_index(col, "Column")?, &value)?;
            table.save(&file)?;
        }

        Command::Get { file, row, col } => {
            let table = Table::load(&file)?;
            println!(
                "{}",
                copy_cell(&table, to_index(row, "Row")?, to_index(col, "Column")?)?
            );
        }

        Command::Grid { file, op } => {
            let mut table = Table::load(&file)?;
            match op {
                GridOp::AddRow => table.add_row(),
                GridOp::RemoveRow => table.remove_row()?,
                GridOp::AddColumn => table.add_column(),
                GridOp::RemoveColumn => table.remove_column()?,
            }
            table.save(&file)?;
            println!(
                "Table is now {}x{}",
                table.row_count(),
                table.column_count()
            );
        }

        Command::Paste {
            file,
            row,
            col,
            input,
            grow,
        } => {
            let mut table = Table::load(&file)?;
            let text = read_block_text(input.as_deref())?;
            let block = parse_block(&text)?;
            paste(
                &mut table,
                &block,
                to_index(row, "Row")?,
                to_index(col, "Column")?,
                grow,
            )?;
            table.save(&file)?;
            println!(
                "Pasted {}x{} block at Row {}, Col {}",
                block.rows(),
                block.columns(),
                row,
                col
            );
        }

        Command::Check { file } => {
            let table = Table::load(&file)?;
            let verdict = assess_normality(&table)?;
            print!("{}", verdict.to_report_string());
        }

        Command::Analyze {
            file,
            analysis,
            output,
            format,
        } => {
            let table = Table::load(&file)?;
            let verdict = assess_normality(&table)?;
            println!("{}", verdict.summary());

            let kind = verdict.choose(analysis)?;
            let result = execute(kind, &table)?;
            print!("{}", result.to_report_string());

            let format = format.unwrap_or(config.report.format);
            let output = output.unwrap_or_else(|| default_report_path(&file, format));
            Report::build(&table, kind, verdict, result, &config.report).save(&output, format)?;
            println!("Report saved to: {}", output.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = SadConfig::load(args.config.as_deref())?;
    run(args.command, &config)
}
