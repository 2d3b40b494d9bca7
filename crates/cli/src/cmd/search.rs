//! Search command implementation.

use std::path::Path;

use notesieve_core::config::loader::ConfigLoader;
use notesieve_core::filter::{QuerySession, SearchScope};
use notesieve_core::note::{MetadataIndex, NoteRecord};
use notesieve_core::vault::scan_vault;
use tabled::{settings::Style, Table};

use super::output::{NoteOutput, NoteRow};
use crate::{logging, OutputFormat, SearchArgs};

pub fn run(config: Option<&Path>, profile: Option<&str>, args: SearchArgs) {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    let log = logging::init(&rc.logging);

    let snapshot = match scan_vault(&rc) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error scanning vault: {}", e);
            drop(log);
            std::process::exit(1);
        }
    };

    let scope = match (args.folder, args.tag) {
        (Some(folder), _) => SearchScope::Folder(folder),
        (None, Some(tag)) => SearchScope::Tag(tag),
        (None, None) => SearchScope::All,
    };

    let mut session = QuerySession::new(rc.search_options());
    let mut hits = session.filter_scoped(&args.query, &scope, snapshot.records());
    let total = hits.len();
    if let Some(limit) = args.limit {
        hits.truncate(limit);
    }
    tracing::debug!(total, shown = hits.len(), "search finished");

    match resolve_format(args.output, args.json, args.quiet) {
        OutputFormat::Table => print_notes_table(&hits, total),
        OutputFormat::Json => print_notes_json(&hits),
        OutputFormat::Quiet => print_notes_quiet(&hits),
    }
}

fn print_notes_table(notes: &[&NoteRecord], total: usize) {
    if notes.is_empty() {
        println!("(no notes found)");
        return;
    }

    let rows: Vec<NoteRow> = notes.iter().map(|n| NoteRow::from(*n)).collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{}", table);

    if total > notes.len() {
        println!("\nShowing {} of {} notes", notes.len(), total);
    } else {
        println!("\nTotal: {} notes", total);
    }
}

fn print_notes_json(notes: &[&NoteRecord]) {
    let output: Vec<NoteOutput> = notes.iter().map(|n| NoteOutput::from(*n)).collect();
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}

fn print_notes_quiet(notes: &[&NoteRecord]) {
    for note in notes {
        println!("{}", note.path);
    }
}

fn resolve_format(output: OutputFormat, json: bool, quiet: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if quiet {
        OutputFormat::Quiet
    } else {
        output
    }
}
