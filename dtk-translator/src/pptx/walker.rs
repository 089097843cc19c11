//! Ordered slide traversal.
//!
//! The walk visits shapes in `spTree` order; per shape it handles picture
//! alt text, table cells, chart titles, then plain text frames, and finally
//! the slide's notes body. EXTRACT and REPLACE run the same code with a
//! different [`TextSink`], which is what makes the two passes of parallel
//! mode visit identical text units in identical order.

use crate::pptx::package::{ChartPart, SlideParts};
use crate::pptx::xml::{XmlElement, XmlNode};
use dtk_core::{DtkError, Result};
use std::collections::HashMap;

pub struct WalkOptions {
    pub translate_pictures: bool,
    pub target_font: String,
}

/// Where the walk's text units go (EXTRACT) or come from (REPLACE).
pub enum TextSink {
    Extract(Vec<String>),
    Replace(std::vec::IntoIter<String>),
}

impl TextSink {
    pub fn extract() -> Self {
        Self::Extract(Vec::new())
    }

    pub fn replace(texts: Vec<String>) -> Self {
        Self::Replace(texts.into_iter())
    }

    pub fn into_texts(self) -> Vec<String> {
        match self {
            Self::Extract(texts) => texts,
            Self::Replace(rest) => rest.collect(),
        }
    }

    /// EXTRACT records the original and returns `None`; REPLACE returns the
    /// next translated text to write back.
    fn on_text(&mut self, original: String) -> Result<Option<String>> {
        match self {
            Self::Extract(texts) => {
                texts.push(original);
                Ok(None)
            }
            Self::Replace(texts) => texts
                .next()
                .map(Some)
                .ok_or_else(|| DtkError::Document("replacement text underrun".to_string())),
        }
    }
}

/// Walk one slide (shapes in document order, then notes).
pub fn walk_slide(parts: &mut SlideParts, sink: &mut TextSink, opts: &WalkOptions) -> Result<()> {
    let SlideParts { slide, charts, notes, .. } = parts;

    if let Some(sp_tree) =
        slide.root.child_mut("p:cSld").and_then(|c_sld| c_sld.child_mut("p:spTree"))
    {
        for shape in sp_tree.elements_mut() {
            match shape.name.as_str() {
                "p:pic" if opts.translate_pictures => visit_picture(shape, sink)?,
                "p:graphicFrame" => visit_graphic_frame(shape, charts, sink, opts)?,
                "p:sp" => {
                    if let Some(tx_body) = shape.child_mut("p:txBody") {
                        visit_text_frame(tx_body, sink, &opts.target_font)?;
                        apply_autofit(tx_body);
                    }
                }
                _ => {}
            }
        }
    }

    if let Some(notes) = notes {
        if let Some(tx_body) = notes_body_text_frame(&mut notes.doc.root) {
            visit_text_frame(tx_body, sink, &opts.target_font)?;
        }
    }

    Ok(())
}

fn visit_picture(shape: &mut XmlElement, sink: &mut TextSink) -> Result<()> {
    let alt_text = shape
        .child("p:nvPicPr")
        .and_then(|nv| nv.child("p:cNvPr"))
        .and_then(|c_nv_pr| c_nv_pr.attr("descr"))
        .unwrap_or_default()
        .to_string();

    if let Some(translated) = sink.on_text(alt_text)? {
        if let Some(c_nv_pr) = shape.child_mut("p:nvPicPr").and_then(|nv| nv.child_mut("p:cNvPr"))
        {
            c_nv_pr.set_attr("descr", translated);
        }
    }
    Ok(())
}

fn visit_graphic_frame(
    shape: &mut XmlElement,
    charts: &mut HashMap<String, ChartPart>,
    sink: &mut TextSink,
    opts: &WalkOptions,
) -> Result<()> {
    let Some(graphic_data) =
        shape.child_mut("a:graphic").and_then(|graphic| graphic.child_mut("a:graphicData"))
    else {
        return Ok(());
    };

    if let Some(table) = graphic_data.child_mut("a:tbl") {
        for row in table.children_named_mut("a:tr") {
            for cell in row.children_named_mut("a:tc") {
                if let Some(tx_body) = cell.child_mut("a:txBody") {
                    visit_text_frame(tx_body, sink, &opts.target_font)?;
                }
            }
        }
        return Ok(());
    }

    let chart_rel = graphic_data
        .child("c:chart")
        .and_then(|chart| chart.attr("r:id"))
        .map(str::to_string);
    if let Some(chart) = chart_rel.and_then(|rel_id| charts.get_mut(&rel_id)) {
        if let Some(rich) = chart_title_text_frame(&mut chart.doc.root) {
            visit_text_frame(rich, sink, &opts.target_font)?;
        }
    }
    Ok(())
}

fn chart_title_text_frame(root: &mut XmlElement) -> Option<&mut XmlElement> {
    root.child_mut("c:chart")?.child_mut("c:title")?.child_mut("c:tx")?.child_mut("c:rich")
}

fn is_body_placeholder(shape: &XmlElement) -> bool {
    shape
        .child("p:nvSpPr")
        .and_then(|nv| nv.child("p:nvPr"))
        .and_then(|nv_pr| nv_pr.child("p:ph"))
        .is_some_and(|ph| ph.attr("type") == Some("body"))
}

fn notes_body_text_frame(root: &mut XmlElement) -> Option<&mut XmlElement> {
    let sp_tree = root.child_mut("p:cSld")?.child_mut("p:spTree")?;
    let position = sp_tree.children.iter().position(|node| {
        matches!(node, XmlNode::Element(shape) if shape.name == "p:sp" && is_body_placeholder(shape))
    })?;
    match &mut sp_tree.children[position] {
        XmlNode::Element(shape) => shape.child_mut("p:txBody"),
        XmlNode::Text(_) => None,
    }
}

/// Styled-text translation over one text frame: per paragraph, concatenate
/// the runs, hand the buffer to the sink, and on REPLACE rebuild the
/// paragraph as a single run that keeps the first run's properties.
fn visit_text_frame(
    tx_body: &mut XmlElement,
    sink: &mut TextSink,
    target_font: &str,
) -> Result<()> {
    for paragraph in tx_body.children_named_mut("a:p") {
        let mut buffer = String::new();
        for run in paragraph.children_named("a:r") {
            if let Some(t) = run.child("a:t") {
                buffer.push_str(&t.text());
            }
        }
        if buffer.is_empty() {
            continue;
        }

        if let Some(translated) = sink.on_text(buffer)? {
            rebuild_paragraph(paragraph, translated, target_font);
        }
    }
    Ok(())
}

/// Replace a paragraph's runs with one run holding the translated text.
///
/// The new run carries the first original run's properties; the font family
/// is switched to the target language's default when one was set, and a
/// black solid fill is added when the original color is unavailable.
/// `a:pPr` (alignment) and `a:endParaRPr` stay untouched.
fn rebuild_paragraph(paragraph: &mut XmlElement, translated: String, target_font: &str) {
    let mut run_props = paragraph
        .children_named("a:r")
        .next()
        .and_then(|run| run.child("a:rPr"))
        .cloned()
        .unwrap_or_else(|| XmlElement::new("a:rPr"));

    if let Some(latin) = run_props.child_mut("a:latin") {
        latin.set_attr("typeface", target_font);
    }
    if run_props.child("a:solidFill").is_none() {
        let mut color = XmlElement::new("a:srgbClr");
        color.set_attr("val", "000000");
        let mut fill = XmlElement::new("a:solidFill");
        fill.push_element(color);
        // the fill group precedes the font elements in the rPr content model
        let position = run_props
            .children
            .iter()
            .position(|node| {
                matches!(
                    node,
                    XmlNode::Element(e)
                        if matches!(e.name.as_str(), "a:latin" | "a:ea" | "a:cs" | "a:sym")
                )
            })
            .unwrap_or(run_props.children.len());
        run_props.children.insert(position, XmlNode::Element(fill));
    }

    paragraph.remove_children_named(&["a:r", "a:br", "a:fld"]);

    let mut text = XmlElement::new("a:t");
    text.push_text(translated);
    let mut run = XmlElement::new("a:r");
    run.push_element(run_props);
    run.push_element(text);

    let position = paragraph.position_of("a:endParaRPr").unwrap_or(paragraph.children.len());
    paragraph.children.insert(position, XmlNode::Element(run));
}

/// Shape autofit policy: autosize text to the shape with word wrap on, no
/// explicit font downscaling. Skipped for empty frames.
fn apply_autofit(tx_body: &mut XmlElement) {
    let has_text = tx_body
        .children_named("a:p")
        .any(|p| p.children_named("a:r").any(|r| r.child("a:t").is_some_and(|t| !t.text().is_empty())));
    if !has_text {
        return;
    }

    if tx_body.child("a:bodyPr").is_none() {
        tx_body.children.insert(0, XmlNode::Element(XmlElement::new("a:bodyPr")));
    }
    if let Some(body_pr) = tx_body.child_mut("a:bodyPr") {
        body_pr.set_attr("wrap", "square");
        body_pr.remove_children_named(&["a:noAutofit", "a:normAutofit", "a:spAutoFit"]);
        body_pr.push_element(XmlElement::new("a:normAutofit"));
    }
}
