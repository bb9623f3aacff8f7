//! WordprocessingML (.docx) writer.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::xml::XmlWriter;
use super::{
    Alignment, Block, DocumentWriter, InlineImage, Layout, Paragraph, ParagraphStyle, Result, Run,
    RunContent, Table,
};

const NAMESPACES: [(&str, &str); 5] = [
    ("xmlns:w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main"),
    ("xmlns:r", "http://schemas.openxmlformats.org/officeDocument/2006/relationships"),
    ("xmlns:wp", "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"),
    ("xmlns:a", "http://schemas.openxmlformats.org/drawingml/2006/main"),
    ("xmlns:pic", "http://schemas.openxmlformats.org/drawingml/2006/picture"),
];

const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const PICTURE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

const EMU_PER_INCH: f64 = 914_400.0;
const TWIPS_PER_INCH: f64 = 1_440.0;

// A4 portrait, one-inch margins, in twips.
const PAGE_WIDTH: u32 = 11_906;
const PAGE_HEIGHT: u32 = 16_838;
const PAGE_MARGIN: u32 = 1_440;

const TABLE_BORDERS: [&str; 6] = [
    "w:top",
    "w:left",
    "w:bottom",
    "w:right",
    "w:insideH",
    "w:insideV",
];

/// Writes [`Layout`]s as Office Open XML word-processing documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxWriter;

impl DocxWriter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentWriter for DocxWriter {
    fn write(&self, layout: &Layout) -> Result<Vec<u8>> {
        let mut media = MediaStore::default();

        let mut document = Part::new()?;
        document.add_relationship(REL_STYLES, "styles.xml");

        // The footer is written first so the stamp is always image1.
        let footer = if layout.page_footer.is_empty() {
            None
        } else {
            let mut footer = Part::new()?;
            footer.xml.start_element_with_attrs("w:ftr", &NAMESPACES)?;
            for paragraph in &layout.page_footer {
                write_paragraph(&mut footer, &mut media, paragraph)?;
            }
            footer.xml.end_element("w:ftr")?;
            Some(footer)
        };
        let footer_ref = footer
            .as_ref()
            .map(|_| document.add_relationship(REL_FOOTER, "footer1.xml"));

        document.xml.start_element_with_attrs("w:document", &NAMESPACES)?;
        document.xml.start_element("w:body")?;
        for block in &layout.body {
            match block {
                Block::Paragraph(paragraph) => {
                    write_paragraph(&mut document, &mut media, paragraph)?
                }
                Block::Table(table) => write_table(&mut document, &mut media, table)?,
            }
        }
        write_section_properties(&mut document.xml, footer_ref.as_deref())?;
        document.xml.end_element("w:body")?;
        document.xml.end_element("w:document")?;

        debug!(
            "Packaging document: {} body blocks, {} images, footer: {}",
            layout.body.len(),
            media.files.len(),
            footer.is_some()
        );

        package(layout, document, footer, &media)
    }
}

/// An XML part and the relationships it owns.
struct Part {
    xml: XmlWriter,
    relationships: Vec<(String, &'static str, String)>,
}

impl Part {
    fn new() -> Result<Self> {
        Ok(Self {
            xml: XmlWriter::new()?,
            relationships: Vec::new(),
        })
    }

    fn add_relationship(&mut self, kind: &'static str, target: &str) -> String {
        let id = format!("rId{}", self.relationships.len() + 1);
        self.relationships.push((id.clone(), kind, target.to_string()));
        id
    }

    /// Finished part XML and its `.rels` XML.
    fn finish(self) -> Result<(Vec<u8>, Vec<u8>)> {
        let rels = relationships_xml(&self.relationships)?;
        Ok((self.xml.finish()?, rels))
    }
}

fn relationships_xml(relationships: &[(String, &'static str, String)]) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start_element_with_attrs("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    for (id, kind, target) in relationships {
        xml.empty_element_with_attrs(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *kind), ("Target", target.as_str())],
        )?;
    }
    xml.end_element("Relationships")?;
    xml.finish()
}

/// Images embedded in the package, shared by all parts.
#[derive(Default)]
struct MediaStore {
    /// File name under word/media and its bytes.
    files: Vec<(String, Vec<u8>)>,
    /// Extension to content type.
    content_types: BTreeMap<&'static str, &'static str>,
}

impl MediaStore {
    /// Store an image; returns its file name and a drawing id unique in the package.
    fn add(&mut self, image: &InlineImage) -> (String, usize) {
        let id = self.files.len() + 1;
        let extension = image.image.extension();
        let name = format!("image{id}.{extension}");

        self.content_types.insert(extension, image.image.content_type());
        self.files.push((name.clone(), image.image.bytes.clone()));
        (name, id)
    }
}

fn write_paragraph(part: &mut Part, media: &mut MediaStore, paragraph: &Paragraph) -> Result<()> {
    let style = match paragraph.style {
        ParagraphStyle::Normal => None,
        ParagraphStyle::Heading2 => Some("Heading2"),
    };
    let align = match paragraph.alignment {
        Alignment::Left => None,
        Alignment::Right => Some("right"),
    };

    if style.is_none() && align.is_none() && paragraph.runs.is_empty() {
        return part.xml.empty_element("w:p");
    }

    part.xml.start_element("w:p")?;
    if style.is_some() || align.is_some() {
        part.xml.start_element("w:pPr")?;
        if let Some(style) = style {
            part.xml.val_element("w:pStyle", style)?;
        }
        if let Some(align) = align {
            part.xml.val_element("w:jc", align)?;
        }
        part.xml.end_element("w:pPr")?;
    }

    for run in &paragraph.runs {
        write_run(part, media, run)?;
    }

    part.xml.end_element("w:p")
}

fn write_run(part: &mut Part, media: &mut MediaStore, run: &Run) -> Result<()> {
    part.xml.start_element("w:r")?;

    if run.bold || run.size_pt.is_some() {
        part.xml.start_element("w:rPr")?;
        if run.bold {
            part.xml.empty_element("w:b")?;
            part.xml.empty_element("w:bCs")?;
        }
        if let Some(size) = run.size_pt {
            let half_points = half_points(size).to_string();
            part.xml.val_element("w:sz", &half_points)?;
            part.xml.val_element("w:szCs", &half_points)?;
        }
        part.xml.end_element("w:rPr")?;
    }

    match &run.content {
        RunContent::Text(text) => {
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    part.xml.empty_element("w:br")?;
                }
                if !line.is_empty() {
                    part.xml
                        .text_element_with_attrs("w:t", line, &[("xml:space", "preserve")])?;
                }
            }
        }
        RunContent::Image(image) => write_drawing(part, media, image)?,
    }

    part.xml.end_element("w:r")
}

fn write_drawing(part: &mut Part, media: &mut MediaStore, image: &InlineImage) -> Result<()> {
    let (name, id) = media.add(image);
    let rel = part.add_relationship(REL_IMAGE, &format!("media/{name}"));

    let cx = emu(image.width_in).to_string();
    let cy = emu(image.image.height_for_width(image.width_in)).to_string();
    let extent = [("cx", cx.as_str()), ("cy", cy.as_str())];
    let title = format!("Picture {id}");
    let id = id.to_string();

    let xml = &mut part.xml;
    xml.start_element("w:drawing")?;
    xml.start_element_with_attrs(
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    xml.empty_element_with_attrs("wp:extent", &extent)?;
    xml.empty_element_with_attrs("wp:docPr", &[("id", id.as_str()), ("name", title.as_str())])?;
    xml.start_element("wp:cNvGraphicFramePr")?;
    xml.empty_element_with_attrs("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    xml.end_element("wp:cNvGraphicFramePr")?;

    xml.start_element("a:graphic")?;
    xml.start_element_with_attrs("a:graphicData", &[("uri", PICTURE_URI)])?;
    xml.start_element("pic:pic")?;

    xml.start_element("pic:nvPicPr")?;
    xml.empty_element_with_attrs("pic:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    xml.empty_element("pic:cNvPicPr")?;
    xml.end_element("pic:nvPicPr")?;

    xml.start_element("pic:blipFill")?;
    xml.empty_element_with_attrs("a:blip", &[("r:embed", rel.as_str())])?;
    xml.start_element("a:stretch")?;
    xml.empty_element("a:fillRect")?;
    xml.end_element("a:stretch")?;
    xml.end_element("pic:blipFill")?;

    xml.start_element("pic:spPr")?;
    xml.start_element("a:xfrm")?;
    xml.empty_element_with_attrs("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty_element_with_attrs("a:ext", &extent)?;
    xml.end_element("a:xfrm")?;
    xml.start_element_with_attrs("a:prstGeom", &[("prst", "rect")])?;
    xml.empty_element("a:avLst")?;
    xml.end_element("a:prstGeom")?;
    xml.end_element("pic:spPr")?;

    xml.end_element("pic:pic")?;
    xml.end_element("a:graphicData")?;
    xml.end_element("a:graphic")?;
    xml.end_element("wp:inline")?;
    xml.end_element("w:drawing")
}

fn write_table(part: &mut Part, media: &mut MediaStore, table: &Table) -> Result<()> {
    let widths: Vec<String> = table
        .column_widths
        .iter()
        .map(|w| twips(*w).to_string())
        .collect();

    part.xml.start_element("w:tbl")?;
    part.xml.start_element("w:tblPr")?;
    if table.grid {
        part.xml.val_element("w:tblStyle", "TableGrid")?;
    }
    part.xml
        .empty_element_with_attrs("w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
    part.xml
        .empty_element_with_attrs("w:tblLayout", &[("w:type", "fixed")])?;
    part.xml.end_element("w:tblPr")?;

    part.xml.start_element("w:tblGrid")?;
    for width in &widths {
        part.xml
            .empty_element_with_attrs("w:gridCol", &[("w:w", width.as_str())])?;
    }
    part.xml.end_element("w:tblGrid")?;

    for row in &table.rows {
        part.xml.start_element("w:tr")?;
        for (i, cell) in row.cells.iter().enumerate() {
            part.xml.start_element("w:tc")?;
            part.xml.start_element("w:tcPr")?;
            if let Some(width) = widths.get(i) {
                part.xml.empty_element_with_attrs(
                    "w:tcW",
                    &[("w:w", width.as_str()), ("w:type", "dxa")],
                )?;
            }
            if let Some(fill) = &cell.fill {
                part.xml.empty_element_with_attrs(
                    "w:shd",
                    &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill.as_str())],
                )?;
            }
            part.xml.end_element("w:tcPr")?;

            // A cell must hold at least one paragraph.
            if cell.paragraphs.is_empty() {
                part.xml.empty_element("w:p")?;
            }
            for paragraph in &cell.paragraphs {
                write_paragraph(part, media, paragraph)?;
            }
            part.xml.end_element("w:tc")?;
        }
        part.xml.end_element("w:tr")?;
    }

    part.xml.end_element("w:tbl")
}

fn write_section_properties(xml: &mut XmlWriter, footer_ref: Option<&str>) -> Result<()> {
    let width = PAGE_WIDTH.to_string();
    let height = PAGE_HEIGHT.to_string();
    let margin = PAGE_MARGIN.to_string();
    let margin = margin.as_str();

    xml.start_element("w:sectPr")?;
    if let Some(id) = footer_ref {
        xml.empty_element_with_attrs(
            "w:footerReference",
            &[("w:type", "default"), ("r:id", id)],
        )?;
    }
    xml.empty_element_with_attrs("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
    xml.empty_element_with_attrs(
        "w:pgMar",
        &[
            ("w:top", margin),
            ("w:right", margin),
            ("w:bottom", margin),
            ("w:left", margin),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end_element("w:sectPr")
}

fn styles_xml(layout: &Layout) -> Result<Vec<u8>> {
    let font = layout.font_name.as_str();
    let size = half_points(layout.font_size_pt).to_string();

    let mut xml = XmlWriter::new()?;
    xml.start_element_with_attrs("w:styles", &NAMESPACES)?;

    xml.start_element("w:docDefaults")?;
    xml.start_element("w:rPrDefault")?;
    xml.start_element("w:rPr")?;
    xml.empty_element_with_attrs(
        "w:rFonts",
        &[("w:ascii", font), ("w:hAnsi", font), ("w:eastAsia", font), ("w:cs", font)],
    )?;
    xml.val_element("w:sz", &size)?;
    xml.val_element("w:szCs", &size)?;
    xml.val_element("w:lang", "en-GB")?;
    xml.end_element("w:rPr")?;
    xml.end_element("w:rPrDefault")?;
    xml.start_element("w:pPrDefault")?;
    xml.start_element("w:pPr")?;
    xml.empty_element_with_attrs(
        "w:spacing",
        &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
    )?;
    xml.end_element("w:pPr")?;
    xml.end_element("w:pPrDefault")?;
    xml.end_element("w:docDefaults")?;

    xml.start_element_with_attrs(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    xml.val_element("w:name", "Normal")?;
    xml.empty_element("w:qFormat")?;
    xml.end_element("w:style")?;

    xml.start_element_with_attrs("w:style", &[("w:type", "paragraph"), ("w:styleId", "Heading2")])?;
    xml.val_element("w:name", "heading 2")?;
    xml.val_element("w:basedOn", "Normal")?;
    xml.val_element("w:next", "Normal")?;
    xml.empty_element("w:qFormat")?;
    xml.start_element("w:pPr")?;
    xml.empty_element("w:keepNext")?;
    xml.empty_element_with_attrs("w:spacing", &[("w:before", "200"), ("w:after", "0")])?;
    xml.val_element("w:outlineLvl", "1")?;
    xml.end_element("w:pPr")?;
    xml.start_element("w:rPr")?;
    xml.empty_element("w:b")?;
    xml.empty_element("w:bCs")?;
    xml.val_element("w:color", "4F81BD")?;
    xml.val_element("w:sz", "26")?;
    xml.val_element("w:szCs", "26")?;
    xml.end_element("w:rPr")?;
    xml.end_element("w:style")?;

    xml.start_element_with_attrs(
        "w:style",
        &[("w:type", "table"), ("w:default", "1"), ("w:styleId", "TableNormal")],
    )?;
    xml.val_element("w:name", "Normal Table")?;
    xml.start_element("w:tblPr")?;
    xml.empty_element_with_attrs("w:tblInd", &[("w:w", "0"), ("w:type", "dxa")])?;
    xml.start_element("w:tblCellMar")?;
    let margins = [("w:top", "0"), ("w:left", "108"), ("w:bottom", "0"), ("w:right", "108")];
    for (side, width) in margins {
        xml.empty_element_with_attrs(side, &[("w:w", width), ("w:type", "dxa")])?;
    }
    xml.end_element("w:tblCellMar")?;
    xml.end_element("w:tblPr")?;
    xml.end_element("w:style")?;

    xml.start_element_with_attrs("w:style", &[("w:type", "table"), ("w:styleId", "TableGrid")])?;
    xml.val_element("w:name", "Table Grid")?;
    xml.val_element("w:basedOn", "TableNormal")?;
    xml.start_element("w:tblPr")?;
    xml.start_element("w:tblBorders")?;
    for border in TABLE_BORDERS {
        xml.empty_element_with_attrs(
            border,
            &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", "auto")],
        )?;
    }
    xml.end_element("w:tblBorders")?;
    xml.end_element("w:tblPr")?;
    xml.end_element("w:style")?;

    xml.end_element("w:styles")?;
    xml.finish()
}

fn content_types_xml(media: &MediaStore, has_footer: bool) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start_element_with_attrs("Types", &[("xmlns", NS_CONTENT_TYPES)])?;

    let defaults = [("rels", CT_RELATIONSHIPS), ("xml", "application/xml")]
        .into_iter()
        .chain(media.content_types.iter().map(|(ext, ct)| (*ext, *ct)));
    for (extension, content_type) in defaults {
        xml.empty_element_with_attrs(
            "Default",
            &[("Extension", extension), ("ContentType", content_type)],
        )?;
    }

    let mut overrides = vec![("/word/document.xml", CT_DOCUMENT), ("/word/styles.xml", CT_STYLES)];
    if has_footer {
        overrides.push(("/word/footer1.xml", CT_FOOTER));
    }
    for (part_name, content_type) in overrides {
        xml.empty_element_with_attrs(
            "Override",
            &[("PartName", part_name), ("ContentType", content_type)],
        )?;
    }

    xml.end_element("Types")?;
    xml.finish()
}

fn package(
    layout: &Layout,
    document: Part,
    footer: Option<Part>,
    media: &MediaStore,
) -> Result<Vec<u8>> {
    let root_rels = relationships_xml(&[(
        "rId1".to_string(),
        REL_OFFICE_DOCUMENT,
        "word/document.xml".to_string(),
    )])?;
    let (document_xml, document_rels) = document.finish()?;

    let mut entries: Vec<(String, Vec<u8>)> = vec![
        (
            "[Content_Types].xml".to_string(),
            content_types_xml(media, footer.is_some())?,
        ),
        ("_rels/.rels".to_string(), root_rels),
        ("word/document.xml".to_string(), document_xml),
        ("word/_rels/document.xml.rels".to_string(), document_rels),
        ("word/styles.xml".to_string(), styles_xml(layout)?),
    ];
    if let Some(footer) = footer {
        let (footer_xml, footer_rels) = footer.finish()?;
        entries.push(("word/footer1.xml".to_string(), footer_xml));
        entries.push(("word/_rels/footer1.xml.rels".to_string(), footer_rels));
    }
    for (name, bytes) in &media.files {
        entries.push((format!("word/media/{name}"), bytes.clone()));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in entries {
        zip.start_file(name, options)?;
        zip.write_all(&bytes).map_err(ZipError::from)?;
    }

    Ok(zip.finish()?.into_inner())
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

fn twips(inches: f64) -> i64 {
    (inches * TWIPS_PER_INCH).round() as i64
}

fn half_points(points: f64) -> i64 {
    (points * 2.0).round() as i64
}
