use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hcdw_cli::pipeline::PipelineOutcome;
use hcdw_load::{LoadReport, TargetCount, TargetOutcome};
use hcdw_model::StageReport;

pub fn print_silver_summary(outcome: &PipelineOutcome) {
    print_stage_table(&outcome.reports());
    match &outcome.handoff {
        Some(report) => print_load_table(report),
        None => println!("Dry run: silver tables were not written."),
    }
    if let Some(counts) = &outcome.verification {
        print_verification_table(counts);
    }
}

pub fn print_stage_table(reports: &[StageReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("In"),
        header_cell("Duplicates"),
        header_cell("Invalid"),
        header_cell("Orphaned"),
        header_cell("Out"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_in = 0usize;
    let mut total_out = 0usize;
    for report in reports {
        total_in += report.input;
        total_out += report.output;
        table.add_row(vec![
            Cell::new(report.target.label()).add_attribute(Attribute::Bold),
            Cell::new(report.input),
            count_cell(report.duplicates, Color::Yellow),
            count_cell(report.invalid, Color::Red),
            count_cell(report.orphaned, Color::Red),
            Cell::new(report.output),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_in).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_out).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_load_table(report: &LoadReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target"),
        header_cell("Rows"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for load in &report.targets {
        let (rows, status) = match &load.outcome {
            TargetOutcome::Loaded(rows) => (Cell::new(rows), status_cell("ok", Color::Green)),
            TargetOutcome::Failed(_) => (dim_cell("-"), status_cell("failed", Color::Red)),
        };
        table.add_row(vec![Cell::new(load.target), rows, status]);
    }
    println!("{table}");
    let mut failures = report.failures().peekable();
    if failures.peek().is_some() {
        eprintln!("Errors:");
        for load in failures {
            if let TargetOutcome::Failed(message) = &load.outcome {
                eprintln!("- {}: {message}", load.target);
            }
        }
    }
}

pub fn print_verification_table(counts: &[TargetCount]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Target"), header_cell("Rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for count in counts {
        let rows = match &count.rows {
            Ok(rows) => Cell::new(rows),
            Err(_) => status_cell("error", Color::Red),
        };
        table.add_row(vec![Cell::new(count.target.silver_table()), rows]);
    }
    println!("{table}");
    for count in counts {
        if let Err(message) = &count.rows {
            eprintln!("- {}: {message}", count.target.silver_table());
        }
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn status_cell(label: &str, color: Color) -> Cell {
    Cell::new(label).fg(color).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
