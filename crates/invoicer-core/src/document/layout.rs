//! Lowers a [`DocumentModel`] to rendering primitives.

use super::model::{
    DocumentModel, FooterBlock, HEADER_FILL, HeaderBlock, IconCell, Section, ServiceTable,
};
use crate::docx::{
    Alignment, Block, Layout, Paragraph, ParagraphStyle, Run, Table, TableCell, TableRow,
};

/// Base font size in points.
pub const BASE_FONT_SIZE_PT: f64 = 12.0;
/// Company name size in points.
pub const COMPANY_NAME_SIZE_PT: f64 = 16.0;
/// Footer text size in points.
pub const FOOTER_SIZE_PT: f64 = 8.0;
/// Display width of the company icon in inches.
pub const ICON_WIDTH_IN: f64 = 2.0;
/// Display width of the paid stamp in inches.
pub const STAMP_WIDTH_IN: f64 = 1.5;

// A4 with one-inch margins leaves 6.27in of text width.
const SERVICE_COLUMNS: [f64; 2] = [4.77, 1.5];
const SERVICE_COLUMNS_DATED: [f64; 3] = [1.0, 3.77, 1.5];

/// Build the page layout for a document.
pub fn lay_out(model: &DocumentModel) -> Layout {
    let body = model
        .sections
        .iter()
        .map(|section| match section {
            Section::Header(header) => Block::Table(header_table(header)),
            Section::Spacer => Block::Paragraph(Paragraph::empty()),
            Section::Heading(title) => {
                Block::Paragraph(Paragraph::text(title.as_str()).styled(ParagraphStyle::Heading2))
            }
            Section::Services(table) => Block::Table(service_table(table)),
            Section::Footer(footer) => Block::Paragraph(footer_paragraph(footer)),
        })
        .collect();

    let page_footer = model
        .paid_stamp
        .iter()
        .map(|stamp| Paragraph::default().with_run(Run::image(stamp.clone(), STAMP_WIDTH_IN)))
        .collect();

    Layout {
        font_name: model.font_name.clone(),
        font_size_pt: BASE_FONT_SIZE_PT,
        body,
        page_footer,
    }
}

fn header_table(header: &HeaderBlock) -> Table {
    let icon = match &header.icon {
        IconCell::Image(image) => {
            Paragraph::default().with_run(Run::image(image.clone(), ICON_WIDTH_IN))
        }
        IconCell::Placeholder(text) => Paragraph::text(text.as_str()),
    };

    let company = Paragraph::default()
        .aligned(Alignment::Right)
        .with_run(Run::text(header.company_name.as_str()).bold().sized(COMPANY_NAME_SIZE_PT));

    let details = Paragraph::default()
        .aligned(Alignment::Right)
        .with_run(Run::text("Invoice #: ").bold())
        .with_run(Run::text(header.invoice_number.to_string()).bold())
        .with_run(Run::text(format!("\nDate: {}\n\n", header.date)).bold())
        .with_run(Run::text(header.client_name.as_str()).bold())
        .with_run(Run::text("\n"))
        .with_run(Run::text(header.client_address.as_str()).bold());

    Table {
        column_widths: header.column_widths.to_vec(),
        grid: false,
        rows: vec![TableRow {
            cells: vec![
                TableCell::new(vec![icon]),
                TableCell::new(vec![company, details]),
            ],
        }],
    }
}

fn service_table(table: &ServiceTable) -> Table {
    let column_widths = if table.show_dates {
        SERVICE_COLUMNS_DATED.to_vec()
    } else {
        SERVICE_COLUMNS.to_vec()
    };
    let last = table.headings().len() - 1;

    let heading_row = TableRow {
        cells: table
            .headings()
            .iter()
            .enumerate()
            .map(|(i, heading)| {
                TableCell::new(vec![amount_aligned(Paragraph::text(*heading), i == last)])
                    .filled(HEADER_FILL)
            })
            .collect(),
    };

    let mut rows = vec![heading_row];
    for row in &table.rows {
        let cell = |text: &str| {
            let run = Run::text(text);
            let run = if row.kind.is_bold() { run.bold() } else { run };
            Paragraph::default().with_run(run)
        };

        let mut cells = Vec::with_capacity(3);
        if table.show_dates {
            cells.push(TableCell::new(vec![cell(row.date.as_str())]));
        }
        cells.push(TableCell::new(vec![cell(row.label.as_str())]));
        cells.push(TableCell::new(vec![amount_aligned(cell(row.amount.as_str()), true)]));
        rows.push(TableRow { cells });
    }

    Table {
        column_widths,
        grid: true,
        rows,
    }
}

fn amount_aligned(paragraph: Paragraph, right: bool) -> Paragraph {
    if right {
        paragraph.aligned(Alignment::Right)
    } else {
        paragraph
    }
}

fn footer_paragraph(footer: &FooterBlock) -> Paragraph {
    Paragraph::default().with_run(Run::text(footer.text()).sized(FOOTER_SIZE_PT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::RunContent;
    use crate::document::assets::ImageAsset;
    use crate::document::assets::tests::png_bytes;
    use crate::document::model::{RowKind, TableRow as ModelRow};
    use pretty_assertions::assert_eq;

    fn row(kind: RowKind, date: &str, label: &str, amount: &str) -> ModelRow {
        ModelRow {
            kind,
            date: date.to_string(),
            label: label.to_string(),
            amount: amount.to_string(),
        }
    }

    fn model(show_dates: bool, stamp: Option<ImageAsset>) -> DocumentModel {
        DocumentModel {
            font_name: "Arial".to_string(),
            sections: vec![
                Section::Header(HeaderBlock {
                    column_widths: [2.0, 4.0],
                    icon: IconCell::Placeholder("Acme (Icon not found)".to_string()),
                    company_name: "Acme".to_string(),
                    invoice_number: 7,
                    date: "01.05.25".to_string(),
                    client_name: "Client".to_string(),
                    client_address: "Street".to_string(),
                }),
                Section::Spacer,
                Section::Heading("Invoice Details".to_string()),
                Section::Services(ServiceTable {
                    show_dates,
                    rows: vec![
                        row(RowKind::Service, "01.05.25", "Work", "£10.00"),
                        row(RowKind::TotalDue, "", "Total Amount Due", "£12.00"),
                    ],
                }),
                Section::Footer(FooterBlock {
                    lines: vec!["a".to_string(), "b".to_string()],
                }),
            ],
            paid_stamp: stamp,
        }
    }

    fn text_of(paragraph: &Paragraph) -> String {
        paragraph
            .runs
            .iter()
            .filter_map(|r| match &r.content {
                RunContent::Text(t) => Some(t.as_str()),
                RunContent::Image(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_blocks_follow_sections() {
        let layout = lay_out(&model(false, None));

        assert_eq!(layout.font_name, "Arial");
        assert_eq!(layout.font_size_pt, 12.0);
        assert_eq!(layout.body.len(), 5);
        assert!(layout.page_footer.is_empty());

        let Block::Paragraph(heading) = &layout.body[2] else {
            panic!("expected heading paragraph");
        };
        assert_eq!(heading.style, ParagraphStyle::Heading2);
        assert_eq!(text_of(heading), "Invoice Details");

        let Block::Paragraph(footer) = &layout.body[4] else {
            panic!("expected footer paragraph");
        };
        assert_eq!(footer.runs[0].size_pt, Some(8.0));
        assert_eq!(text_of(footer), "a\nb");
    }

    #[test]
    fn test_header_details() {
        let layout = lay_out(&model(false, None));
        let Block::Table(table) = &layout.body[0] else {
            panic!("expected header table");
        };

        assert!(!table.grid);
        assert_eq!(table.column_widths, vec![2.0, 4.0]);

        let right = &table.rows[0].cells[1];
        assert_eq!(right.paragraphs[0].runs[0].size_pt, Some(16.0));
        assert_eq!(right.paragraphs[1].alignment, Alignment::Right);
        assert_eq!(
            text_of(&right.paragraphs[1]),
            "Invoice #: 7\nDate: 01.05.25\n\nClient\nStreet"
        );
    }

    #[test]
    fn test_service_table_columns() {
        for (show_dates, columns) in [(false, 2), (true, 3)] {
            let layout = lay_out(&model(show_dates, None));
            let Block::Table(table) = &layout.body[3] else {
                panic!("expected service table");
            };

            assert!(table.grid);
            assert_eq!(table.column_widths.len(), columns);
            assert!(table.rows.iter().all(|r| r.cells.len() == columns));
            assert!(table.rows[0].cells.iter().all(|c| c.fill.as_deref() == Some("A9D08E")));

            let total = table.rows.last().unwrap();
            assert!(total.cells.iter().all(|c| c.paragraphs[0].runs[0].bold));
            assert_eq!(total.cells[columns - 1].paragraphs[0].alignment, Alignment::Right);
        }
    }

    #[test]
    fn test_paid_stamp_goes_to_page_footer() {
        let stamp = ImageAsset::from_bytes(png_bytes(3, 3)).unwrap();
        let layout = lay_out(&model(false, Some(stamp)));

        assert_eq!(layout.page_footer.len(), 1);
        let RunContent::Image(image) = &layout.page_footer[0].runs[0].content else {
            panic!("expected image run");
        };
        assert_eq!(image.width_in, 1.5);
    }
}
