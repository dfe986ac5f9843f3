//! Pagination by estimated section height
//!
//! Heights are rough millimetre estimates; the goal is predictable page breaks
//! in print, not typesetting. Only the damage table may split, and every page
//! holding part of it repeats the header row.

use super::assembler::{PageSize, Section};
use std::ops::Range;

const MARGIN_MM: f64 = 15.0;
const TITLE_MM: f64 = 12.0;
const LINE_MM: f64 = 7.0;
const TABLE_ROW_MM: f64 = 9.0;
const DIAGRAM_MM: f64 = 95.0;
const PHOTO_ROW_MM: f64 = 55.0;
const PHOTOS_PER_ROW: usize = 3;
const NOTE_CHARS_PER_LINE: usize = 90;

/// What one page shows of one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Whole(usize),
    /// Rows of a table section; `continued` is set on every slice but the first
    TableRows {
        section: usize,
        rows: Range<usize>,
        continued: bool,
    },
}

impl Block {
    pub fn section(&self) -> usize {
        match self {
            Block::Whole(index) => *index,
            Block::TableRows { section, .. } => *section,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based
    pub number: usize,
    pub blocks: Vec<Block>,
}

impl PageSize {
    /// Width and height in millimetres
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }

    fn content_height_mm(&self) -> f64 {
        self.dimensions_mm().1 - 2.0 * MARGIN_MM
    }
}

/// Estimated height of a whole section
pub fn estimate_height(section: &Section) -> f64 {
    match section {
        Section::Header { .. } => TITLE_MM * 2.0 + LINE_MM * 2.0,
        Section::Info { fields, .. } => TITLE_MM + LINE_MM * fields.len() as f64,
        Section::Diagram { .. } => TITLE_MM + DIAGRAM_MM,
        Section::Legend { entries, .. } => TITLE_MM + LINE_MM * entries.len().div_ceil(2) as f64,
        Section::DamageTable { rows, .. } => TITLE_MM + TABLE_ROW_MM * (rows.len() + 1) as f64,
        Section::Photos { items, .. } => {
            TITLE_MM + PHOTO_ROW_MM * items.len().div_ceil(PHOTOS_PER_ROW) as f64
        }
        Section::Notes { text, .. } => {
            let lines = text
                .lines()
                .map(|l| l.chars().count().div_ceil(NOTE_CHARS_PER_LINE).max(1))
                .sum::<usize>();
            TITLE_MM + LINE_MM * lines as f64
        }
        Section::Summary { counts, .. } => TITLE_MM + LINE_MM * (counts.len() + 1) as f64,
    }
}

/// Lay sections onto pages in order
pub fn paginate(sections: &[Section], page_size: PageSize) -> Vec<Page> {
    let capacity = page_size.content_height_mm();
    let mut pages = vec![Page {
        number: 1,
        blocks: Vec::new(),
    }];
    let mut used = 0.0;

    for (index, section) in sections.iter().enumerate() {
        if let Section::DamageTable { rows, .. } = section {
            let mut start = 0;
            let mut first = true;
            // Empty tables still print their header and empty-state line
            loop {
                let header = TITLE_MM + TABLE_ROW_MM;
                if used > 0.0 && used + header + TABLE_ROW_MM > capacity {
                    new_page(&mut pages);
                    used = 0.0;
                }
                let fit = (((capacity - used - header) / TABLE_ROW_MM).floor() as usize).max(1);
                let end = (start + fit).min(rows.len());
                if let Some(page) = pages.last_mut() {
                    page.blocks.push(Block::TableRows {
                        section: index,
                        rows: start..end,
                        continued: !first,
                    });
                }
                used += header + TABLE_ROW_MM * (end - start).max(1) as f64;
                first = false;
                start = end;
                if start >= rows.len() {
                    break;
                }
                new_page(&mut pages);
                used = 0.0;
            }
            continue;
        }

        let height = estimate_height(section);
        if used > 0.0 && used + height > capacity {
            new_page(&mut pages);
            used = 0.0;
        }
        if let Some(page) = pages.last_mut() {
            page.blocks.push(Block::Whole(index));
        }
        used += height;
    }

    pages
}

fn new_page(pages: &mut Vec<Page>) {
    let number = pages.len() + 1;
    pages.push(Page {
        number,
        blocks: Vec::new(),
    });
}
