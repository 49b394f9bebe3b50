use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use hanzi_grader::rules::RuleTable;
use hanzi_grader::scorer::{HolisticScore, LegacyReport, LevelBreakdown, LevelScore};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn add_level_rows(table: &mut Table, level_name: &str, level: &LevelScore) {
    for r in level.results() {
        let deducted = r.amount();
        let amount = Cell::new(format!("{:.4}", deducted));
        table.add_row(vec![
            Cell::new(level_name).add_attribute(Attribute::Bold),
            Cell::new(r.metric.to_string()),
            Cell::new(r.code()),
            Cell::new(format!("{:+.4}", r.raw_value)),
            if deducted > 0.0 { amount.fg(Color::Red) } else { amount },
            Cell::new(format!("{:.3}", r.full_score)),
            Cell::new(r.comment()),
        ]);
    }
}

/// Every metric of every level, followed by the level totals.
pub fn print_level_report(breakdown: &LevelBreakdown, rules: &RuleTable) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Level").add_attribute(Attribute::Bold),
        Cell::new("Metric"),
        Cell::new("Code"),
        Cell::new("Raw"),
        Cell::new("Deduct").fg(Color::Red),
        Cell::new("Full"),
        Cell::new("Comment"),
    ]);
    align_right(&mut table, 2..=5);

    add_level_rows(&mut table, "character", &breakdown.character);
    for s in &breakdown.structions {
        add_level_rows(&mut table, &format!("struction {}", s.index), &s.level);
    }
    for s in &breakdown.strokes {
        add_level_rows(&mut table, &format!("stroke {} {}", s.order + 1, s.name), &s.level);
    }
    add_level_rows(&mut table, "base", &breakdown.base);
    println!("\n{}", table);

    let mut totals = new_table();
    totals.add_row(vec![
        Cell::new("Mode").add_attribute(Attribute::Bold),
        Cell::new("Character"),
        Cell::new("Structions"),
        Cell::new("Strokes"),
        Cell::new("Base"),
        Cell::new("Score").fg(Color::Cyan),
    ]);
    align_right(&mut totals, 1..=5);
    totals.add_row(vec![
        Cell::new(format!("{:?}", breakdown.mode)),
        Cell::new(format!("{:.4}", breakdown.character_deduction)),
        Cell::new(format!("{:.4}", breakdown.struction_deduction)),
        Cell::new(format!("{:.4}", breakdown.stroke_deduction)),
        Cell::new(format!("{:.4}", breakdown.base_deduction)),
        Cell::new(format!("{:.2}", breakdown.total())).fg(Color::Cyan),
    ]);
    println!("{}", totals);

    let unweighted: Vec<String> = breakdown
        .character
        .results()
        .filter(|r| rules.full_score(r.metric) == 0.0)
        .map(|r| r.metric.to_string())
        .collect();
    if !unweighted.is_empty() {
        println!("⚠️  Metrics without weight: {}", unweighted.join(", "));
    }
}

/// The legacy report as field/value pairs.
pub fn print_legacy_report(report: &LegacyReport, highlight: &[usize]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Field").add_attribute(Attribute::Bold),
        Cell::new("Type"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Comment"),
    ]);
    align_right(&mut table, 1..=2);

    let rows: [(&str, String, i32, &str); 7] = [
        ("Center of gravity", report.center_of_gravity_type.to_string(), report.center_of_gravity_score, ""),
        ("Font size", report.font_size.to_string(), report.font_size_score, ""),
        ("Tilt", report.fount_type.to_string(), report.fount_score, ""),
        ("Stroke count", format!("{:+}", report.stroke_count_diff), report.stroke_count_score, report.stroke_count.as_str()),
        ("Stroke order", String::new(), report.stroke_order_score, report.stroke_order.as_str()),
        ("Stroke length", String::new(), report.stroke_length_score, report.stroke_length.as_str()),
        ("Spacing", String::new(), report.spacing_structure_score, report.spacing_structure.as_str()),
    ];
    for (field, kind, score, comment) in rows {
        let score_cell = Cell::new(score);
        table.add_row(vec![
            Cell::new(field).add_attribute(Attribute::Bold),
            Cell::new(kind),
            if score < 100 { score_cell.fg(Color::Red) } else { score_cell },
            Cell::new(comment),
        ]);
    }
    table.add_row(vec![
        Cell::new("Struction").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(report.struction_score),
        Cell::new(&report.struction),
    ]);
    println!("\n{}", table);

    println!(
        "🏁 Score {} (error {}), highlight {:?}",
        report.score, report.error, highlight
    );
}

pub fn print_holistic_report(score: &HolisticScore) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Raw").add_attribute(Attribute::Bold),
        Cell::new("Resized"),
        Cell::new("Components"),
        Cell::new("Scale"),
        Cell::new("Strokes"),
        Cell::new("Total").fg(Color::Cyan),
    ]);
    align_right(&mut table, 0..=5);
    table.add_row(vec![
        Cell::new(format!("{:.4}", score.overlap_raw)),
        Cell::new(format!("{:.4}", score.overlap_resized)),
        Cell::new(score.component_overlap.map_or_else(|| "-".to_string(), |c| format!("{:.4}", c))),
        Cell::new(format!("{:.4}", score.scale_score)),
        Cell::new(format!("{:.4}", score.stroke_score)),
        Cell::new(format!("{:.2}", score.total)).fg(Color::Cyan),
    ]);
    println!("\n{}", table);
}
