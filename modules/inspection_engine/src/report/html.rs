//! Printable HTML output
//!
//! One self-contained document: `@page` sizing, one `<section class="page">` per
//! laid-out page, diagrams inlined as SVG. Arabic reports are `dir="rtl"`.

use super::assembler::{InfoField, ReportDocument, Section};
use super::i18n::Phrase;
use super::layout::Block;
use crate::render::svg::escape_into;
use std::fmt::Write;

const STYLE: &str = "\
body { font-family: 'Noto Sans Arabic', 'Segoe UI', Arial, sans-serif; color: #111827; margin: 0; }
.page { page-break-after: always; padding: 0; }
.page:last-child { page-break-after: auto; }
h1 { font-size: 20pt; margin: 0 0 4mm; }
h2 { font-size: 13pt; margin: 4mm 0 2mm; border-bottom: 1px solid #d1d5db; }
.status { display: inline-block; padding: 1mm 3mm; border-radius: 2mm; background: #f3f4f6; }
.status.draft { background: #fef3c7; }
dl { display: grid; grid-template-columns: max-content 1fr; gap: 1mm 4mm; margin: 0; }
dt { font-weight: 600; }
.diagram svg { width: 100%; max-height: 90mm; }
.legend { display: grid; grid-template-columns: 1fr 1fr; gap: 1mm 4mm; }
.swatch { display: inline-block; width: 4mm; height: 4mm; border: 1px solid #6b7280; vertical-align: middle; margin-inline-end: 2mm; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #d1d5db; padding: 1.5mm 2mm; text-align: start; vertical-align: top; }
thead { display: table-header-group; }
.photos { display: grid; grid-template-columns: repeat(3, 1fr); gap: 3mm; }
.photos figure { margin: 0; }
.photos img { width: 100%; height: 45mm; object-fit: cover; }
.notes { white-space: pre-wrap; }
footer { text-align: center; font-size: 9pt; color: #6b7280; margin-top: 4mm; }
";

fn esc(out: &mut String, value: &str) {
    escape_into(out, value, true);
}

/// Render the paginated report as printable HTML
pub fn render_html(report: &ReportDocument) -> String {
    let lang = report.language;
    let dir = if report.is_rtl() { "rtl" } else { "ltr" };
    let mut out = String::with_capacity(64 * 1024);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"{}\" dir=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>",
        lang.as_str(),
        dir
    );
    esc(&mut out, &report.title);
    let _ = write!(
        out,
        "</title>\n<style>\n@page {{ size: {}; margin: 15mm; }}\n{}</style>\n</head>\n<body>\n",
        report.page_size.css_name(),
        STYLE
    );

    let total = report.pages.len();
    for page in &report.pages {
        let _ = writeln!(out, "<section class=\"page\" data-page=\"{}\">", page.number);
        for block in &page.blocks {
            let Some(section) = report.sections.get(block.section()) else {
                continue;
            };
            match block {
                Block::Whole(_) => write_section(&mut out, section),
                Block::TableRows {
                    rows, continued, ..
                } => write_table(&mut out, section, rows.clone(), *continued, report),
            }
        }
        let _ = write!(out, "<footer>");
        esc(&mut out, Phrase::Page.text(lang));
        let _ = write!(out, " {} ", page.number);
        esc(&mut out, Phrase::Of.text(lang));
        let _ = writeln!(out, " {}</footer>\n</section>", total);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn write_fields(out: &mut String, fields: &[InfoField]) {
    out.push_str("<dl>");
    for field in fields {
        out.push_str("<dt>");
        esc(out, &field.label);
        out.push_str("</dt><dd>");
        esc(out, &field.value);
        out.push_str("</dd>");
    }
    out.push_str("</dl>\n");
}

fn write_heading(out: &mut String, tag: &str, text: &str) {
    let _ = write!(out, "<{}>", tag);
    esc(out, text);
    let _ = writeln!(out, "</{}>", tag);
}

fn write_section(out: &mut String, section: &Section) {
    match section {
        Section::Header {
            title,
            lines,
            status,
        } => {
            out.push_str("<header>\n");
            write_heading(out, "h1", title);
            out.push_str("<p class=\"status\">");
            esc(out, status);
            out.push_str("</p>\n");
            write_fields(out, lines);
            out.push_str("</header>\n");
        }
        Section::Info { title, fields } => {
            out.push_str("<div class=\"info\">\n");
            write_heading(out, "h2", title);
            write_fields(out, fields);
            out.push_str("</div>\n");
        }
        Section::Diagram {
            angle, title, svg, ..
        } => {
            let _ = writeln!(out, "<div class=\"diagram\" data-angle=\"{}\">", angle);
            write_heading(out, "h2", title);
            // already serialized with escaping
            out.push_str(svg);
            out.push_str("\n</div>\n");
        }
        Section::Legend { title, entries } => {
            write_heading(out, "h2", title);
            out.push_str("<div class=\"legend\">\n");
            for entry in entries {
                let _ = write!(
                    out,
                    "<div data-condition=\"{}\"><span class=\"swatch\" style=\"background:",
                    entry.condition
                );
                esc(out, &entry.color);
                out.push_str("\"></span>");
                esc(out, &entry.label);
                out.push_str("</div>\n");
            }
            out.push_str("</div>\n");
        }
        Section::DamageTable { .. } => {}
        Section::Photos { title, items } => {
            write_heading(out, "h2", title);
            out.push_str("<div class=\"photos\">\n");
            for item in items {
                out.push_str("<figure><img src=\"");
                esc(out, &item.reference);
                out.push_str("\" alt=\"\"><figcaption>");
                esc(out, &item.part_label);
                out.push_str("</figcaption></figure>\n");
            }
            out.push_str("</div>\n");
        }
        Section::Notes { title, text } => {
            write_heading(out, "h2", title);
            out.push_str("<p class=\"notes\">");
            esc(out, text);
            out.push_str("</p>\n");
        }
        Section::Summary {
            title,
            counts,
            inspected_label,
            inspected,
            total,
        } => {
            write_heading(out, "h2", title);
            out.push_str("<p>");
            esc(out, inspected_label);
            let _ = writeln!(out, ": {} / {}</p>", inspected, total);
            out.push_str("<ul class=\"summary\">\n");
            for (entry, count) in counts.iter().filter(|(_, n)| *n > 0) {
                out.push_str("<li><span class=\"swatch\" style=\"background:");
                esc(out, &entry.color);
                out.push_str("\"></span>");
                esc(out, &entry.label);
                let _ = writeln!(out, ": {}</li>", count);
            }
            out.push_str("</ul>\n");
        }
    }
}

fn write_table(
    out: &mut String,
    section: &Section,
    rows: std::ops::Range<usize>,
    continued: bool,
    report: &ReportDocument,
) {
    let Section::DamageTable {
        title,
        columns,
        rows: all_rows,
        empty_message,
    } = section
    else {
        return;
    };

    out.push_str("<h2>");
    esc(out, title);
    if continued {
        out.push_str(" (");
        esc(out, Phrase::Continued.text(report.language));
        out.push(')');
    }
    out.push_str("</h2>\n<table class=\"damage\">\n<thead><tr>");
    for column in columns {
        out.push_str("<th>");
        esc(out, column);
        out.push_str("</th>");
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    if all_rows.is_empty() {
        let _ = write!(out, "<tr><td colspan=\"{}\">", columns.len());
        esc(out, empty_message);
        out.push_str("</td></tr>\n");
    }
    for row in all_rows.get(rows).unwrap_or_default() {
        let _ = write!(out, "<tr data-part=\"{}\">", row.part_key);
        out.push_str("<td>");
        esc(out, &row.part_label);
        out.push_str("</td><td><span class=\"swatch\" style=\"background:");
        esc(out, &row.condition_color);
        out.push_str("\"></span>");
        esc(out, &row.condition_label);
        out.push_str("</td><td>");
        esc(out, &row.severity_label);
        out.push_str("</td><td>");
        esc(out, &row.notes);
        let _ = writeln!(out, "</td><td>{}</td></tr>", row.photo_count);
    }
    out.push_str("</tbody>\n</table>\n");
}
