//! Minimal deck builder for handler tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub struct SlideFixture {
    pub shapes: String,
    pub chart: Option<String>,
    pub notes: Option<String>,
    /// Raw slide part bytes overriding everything else (for fault injection).
    pub raw: Option<Vec<u8>>,
}

impl Default for SlideFixture {
    fn default() -> Self {
        Self { shapes: String::new(), chart: None, notes: None, raw: None }
    }
}

impl SlideFixture {
    pub fn with_shapes(shapes: impl Into<String>) -> Self {
        Self { shapes: shapes.into(), ..Default::default() }
    }
}

pub fn title_shape(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" b="1" sz="2000"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill><a:latin typeface="Calibri"/></a:rPr><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#
    )
}

pub fn table_shape(cells: &[&str]) -> String {
    let cells_xml: String = cells
        .iter()
        .map(|cell| {
            format!(
                r#"<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>{cell}</a:t></a:r></a:p></a:txBody></a:tc>"#
            )
        })
        .collect();
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="3" name="Table 2"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tr h="370840">{cells_xml}</a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
    )
}

pub fn chart_shape() -> String {
    r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="4" name="Chart 3"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="rId2"/></a:graphicData></a:graphic></p:graphicFrame>"#.to_string()
}

pub fn picture_shape(alt_text: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="5" name="Picture 4" descr="{alt_text}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill/><p:spPr/></p:pic>"#
    )
}

pub fn chart_part(title: &str) -> String {
    format!(
        r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><c:chart><c:title><c:tx><c:rich><a:bodyPr/><a:p><a:r><a:t>{title}</a:t></a:r></a:p></c:rich></c:tx></c:title><c:plotArea/></c:chart></c:chartSpace>"#
    )
}

pub fn notes_part(text: &str) -> String {
    format!(
        r#"<p:notes xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Notes Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#
    )
}

fn slide_part(shapes: &str) -> String {
    format!(
        r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:sld>"#
    )
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

fn add_part(zip: &mut ZipWriter<File>, options: SimpleFileOptions, name: &str, body: &str) {
    zip.start_file(name, options).unwrap();
    zip.write_all(XML_DECL.as_bytes()).unwrap();
    zip.write_all(body.as_bytes()).unwrap();
}

/// Write a deck with the given slides to `path`.
pub fn write_deck(path: &Path, slides: &[SlideFixture]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    add_part(
        &mut zip,
        options,
        "[Content_Types].xml",
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/></Types>"#,
    );
    add_part(
        &mut zip,
        options,
        "_rels/.rels",
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#,
    );

    let slide_ids: String = (0..slides.len())
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 1))
        .collect();
    add_part(
        &mut zip,
        options,
        "ppt/presentation.xml",
        &format!(
            r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst>{slide_ids}</p:sldIdLst></p:presentation>"#
        ),
    );

    let presentation_rels: String = (0..slides.len())
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                i + 1,
                i + 1
            )
        })
        .collect();
    add_part(
        &mut zip,
        options,
        "ppt/_rels/presentation.xml.rels",
        &format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{presentation_rels}</Relationships>"#
        ),
    );

    for (i, spec) in slides.iter().enumerate() {
        let number = i + 1;
        let slide_name = format!("ppt/slides/slide{number}.xml");

        if let Some(raw) = &spec.raw {
            zip.start_file(slide_name.as_str(), options).unwrap();
            zip.write_all(raw).unwrap();
        } else {
            add_part(&mut zip, options, &slide_name, &slide_part(&spec.shapes));
        }

        let mut rels = String::new();
        if spec.chart.is_some() {
            rels.push_str(&format!(
                r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart{number}.xml"/>"#
            ));
        }
        if spec.notes.is_some() {
            rels.push_str(&format!(
                r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide{number}.xml"/>"#
            ));
        }
        if !rels.is_empty() {
            add_part(
                &mut zip,
                options,
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                &format!(
                    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
                ),
            );
        }
        if let Some(chart) = &spec.chart {
            add_part(&mut zip, options, &format!("ppt/charts/chart{number}.xml"), chart);
        }
        if let Some(notes) = &spec.notes {
            add_part(&mut zip, options, &format!("ppt/notesSlides/notesSlide{number}.xml"), notes);
        }
    }

    zip.finish().unwrap();
}
