//! CLI tool for simpletable - applies view operations to an HTML table and exports it
//!
//! Usage:
//!   simpletable_cli <table.html>                          # Print the first page
//!   simpletable_cli <table.html> --search ann --sort 2:desc
//!   simpletable_cli <table.html> --per-page 5 --page 2
//!   simpletable_cli <table.html> --select 1,3 --selected -o out/
//!   simpletable_cli <table.html> --csv -o out/            # Write table-export-<ts>.csv
//!   simpletable_cli <table.html> --json                   # Export records as JSON

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use simpletable::export_selected::SelectionExport;
use simpletable::host::DirectorySink;
use simpletable::{markup, ExportOutcome, SelectionExportExtension, SortDirection, TableController};

const USAGE: &str = "Usage: simpletable_cli <table.html> [--search T] [--sort COL[:desc]] \
[--per-page N] [--page N] [--select N,N..] [--csv | --xlsx | --selected | --json] [-o DIR]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Page,
    Csv,
    Xlsx,
    Selected,
    Json,
}

#[derive(Debug)]
struct Options {
    input: String,
    search: Option<String>,
    sort: Option<(usize, SortDirection)>,
    per_page: usize,
    page: usize,
    select: Vec<usize>,
    output: Output,
    out_dir: String,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn parse_number(flag: &str, value: Option<&String>) -> usize {
    match value.map(|v| v.parse::<usize>()) {
        Some(Ok(n)) => n,
        _ => fail(&format!("{flag} expects a number\n{USAGE}")),
    }
}

fn parse_args(args: &[String]) -> Options {
    if args.len() < 2 {
        fail(USAGE);
    }
    let mut options = Options {
        input: args[1].clone(),
        search: None,
        sort: None,
        per_page: 10,
        page: 1,
        select: Vec::new(),
        output: Output::Page,
        out_dir: ".".to_string(),
    };

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match flag {
            "--search" => {
                options.search = Some(value.cloned().unwrap_or_default());
                i += 1;
            }
            "--sort" => {
                let sort_arg = value.cloned().unwrap_or_default();
                let (column, direction) = match sort_arg.split_once(':') {
                    Some((column, "desc")) => (column.to_string(), SortDirection::Desc),
                    Some((column, _)) => (column.to_string(), SortDirection::Asc),
                    None => (sort_arg, SortDirection::Asc),
                };
                let column = parse_number("--sort", Some(&column));
                options.sort = Some((column, direction));
                i += 1;
            }
            "--per-page" => {
                options.per_page = parse_number(flag, value);
                i += 1;
            }
            "--page" => {
                options.page = parse_number(flag, value);
                i += 1;
            }
            "--select" => {
                let list = value.cloned().unwrap_or_default();
                options.select = list
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| parse_number(flag, Some(&s.trim().to_string())))
                    .collect();
                i += 1;
            }
            "--csv" => options.output = Output::Csv,
            "--xlsx" => options.output = Output::Xlsx,
            "--selected" => options.output = Output::Selected,
            "--json" => options.output = Output::Json,
            "-o" => {
                options.out_dir = value.cloned().unwrap_or_else(|| fail(USAGE));
                i += 1;
            }
            other => fail(&format!("Unknown argument: {other}\n{USAGE}")),
        }
        i += 1;
    }
    options
}

fn print_page(table: &TableController) {
    let headers: Vec<&str> = table
        .table()
        .headers()
        .iter()
        .map(|h| h.field_name())
        .collect();
    println!("{}", headers.join(" | "));
    for row in table.visible_rows() {
        let mark = match row.checkbox() {
            Some(cb) if cb.is_checked() => "[x] ",
            Some(_) => "[ ] ",
            None => "",
        };
        let cells: Vec<String> = row.cells().iter().map(|c| c.export_text()).collect();
        println!("{mark}{}", cells.join(" | "));
    }
    if let Some(placeholder) = table.table().placeholder() {
        println!("{}", placeholder.message);
    }
    println!("{}", table.controls().info);
    println!("{}", table.controls().selection_counter);
}

fn report(outcome: &ExportOutcome, sink: &DirectorySink) {
    match outcome {
        ExportOutcome::Saved { filename, rows } | ExportOutcome::FellBackToCsv { filename, rows } => {
            eprintln!("Written: {} ({rows} rows)", sink.path_for(filename).display());
        }
        ExportOutcome::NothingSelected => {}
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    // Read input file
    let html = match fs::read_to_string(&options.input) {
        Ok(h) => h,
        Err(e) => fail(&format!("Error reading {}: {}", options.input, e)),
    };

    let parsed = match markup::parse_table(&html) {
        Ok(t) => t,
        Err(e) => fail(&format!("Error reading table: {e}")),
    };

    let sink = DirectorySink::new(&options.out_dir);
    let mut table = match TableController::builder(parsed)
        .per_page(options.per_page)
        .sink(sink.clone())
        .extension(SelectionExportExtension::new())
        .build()
    {
        Ok(t) => t,
        Err(e) => fail(&format!("Error: {e}")),
    };

    // View operations, in the order a user would apply them
    if let Some(term) = &options.search {
        table.set_search(term);
    }
    if let Some((column, direction)) = options.sort {
        table.handle_sort(column);
        if direction == SortDirection::Desc {
            table.handle_sort(column);
        }
    }
    table.go_to_page(options.page);
    for ordinal in &options.select {
        let row = table.filtered_rows().get(ordinal.saturating_sub(1)).cloned();
        match row.and_then(|r| r.checkbox()) {
            Some(checkbox) => table.set_checkbox(&checkbox, true),
            None => eprintln!("Row {ordinal} has no checkbox"),
        }
    }

    let outcome = match options.output {
        Output::Page => {
            print_page(&table);
            return;
        }
        Output::Json => {
            let json = match table.export_json(true) {
                Ok(j) => j,
                Err(e) => fail(&format!("Error: {e}")),
            };
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
            return;
        }
        Output::Csv => table.export_to_csv(),
        Output::Xlsx => table.export_to_excel(),
        Output::Selected => table.export_selected(),
    };

    match outcome {
        Ok(outcome) => report(&outcome, &sink),
        Err(e) => fail(&format!("Export failed: {e}")),
    }
}
