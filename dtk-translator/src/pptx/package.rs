//! OPC package access for `.pptx` files.
//!
//! A presentation is a zip of XML parts. Only the parts the walker touches
//! (slides, charts, notes) are parsed and re-serialized; every other part is
//! copied through byte for byte.

use crate::pptx::xml::XmlDocument;
use dtk_core::{DtkError, Result};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const PRESENTATION_PART: &str = "ppt/presentation.xml";

#[derive(Debug, Clone)]
pub struct Relationship {
    pub rel_type: String,
    /// Target resolved to an absolute part name within the package.
    pub target: String,
}

pub struct ChartPart {
    pub part_name: String,
    pub doc: XmlDocument,
}

pub struct NotesPart {
    pub part_name: String,
    pub doc: XmlDocument,
}

/// One slide plus the related parts its walk can touch. `charts` is keyed by
/// relationship id, which is how the slide XML references them.
pub struct SlideParts {
    pub part_name: String,
    pub slide: XmlDocument,
    pub charts: HashMap<String, ChartPart>,
    pub notes: Option<NotesPart>,
}

pub struct PptxPackage {
    parts: Vec<(String, Vec<u8>)>,
    index: HashMap<String, usize>,
}

impl PptxPackage {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| DtkError::Document(format!("cannot open pptx package: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        let mut index = HashMap::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| DtkError::Document(format!("cannot read pptx entry: {}", e)))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            index.insert(name.clone(), parts.len());
            parts.push((name, data));
        }

        if !index.contains_key(PRESENTATION_PART) {
            return Err(DtkError::Document("package has no presentation part".to_string()));
        }

        Ok(Self { parts, index })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.index.get(name).map(|&i| self.parts[i].1.as_slice())
    }

    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.index.get(name) {
            Some(&i) => self.parts[i].1 = data,
            None => {
                self.index.insert(name.to_string(), self.parts.len());
                self.parts.push((name.to_string(), data));
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| DtkError::Document(format!("cannot write pptx entry: {}", e)))?;
            writer.write_all(data)?;
        }
        writer
            .finish()
            .map_err(|e| DtkError::Document(format!("cannot finish pptx package: {}", e)))?;
        Ok(())
    }

    fn parse_part(&self, name: &str) -> Result<XmlDocument> {
        let data = self
            .part(name)
            .ok_or_else(|| DtkError::Document(format!("missing part: {}", name)))?;
        XmlDocument::parse(data)
    }

    /// Relationships of a part, keyed by relationship id, with targets
    /// resolved to absolute part names. Missing rels part means no
    /// relationships.
    pub fn relationships(&self, part_name: &str) -> Result<HashMap<String, Relationship>> {
        let Some(data) = self.part(&rels_part_name(part_name)) else {
            return Ok(HashMap::new());
        };
        let doc = XmlDocument::parse(data)?;
        let base_dir = parent_dir(part_name);

        let mut rels = HashMap::new();
        for rel in doc.root.children_named("Relationship") {
            let (Some(id), Some(rel_type), Some(target)) =
                (rel.attr("Id"), rel.attr("Type"), rel.attr("Target"))
            else {
                continue;
            };
            rels.insert(
                id.to_string(),
                Relationship {
                    rel_type: rel_type.to_string(),
                    target: resolve_target(base_dir, target),
                },
            );
        }
        Ok(rels)
    }

    /// Slide part names in deck order, from the presentation's slide id list.
    pub fn slide_part_names(&self) -> Result<Vec<String>> {
        let rels = self.relationships(PRESENTATION_PART)?;
        let presentation = self.parse_part(PRESENTATION_PART)?;

        let Some(id_list) = presentation.root.child("p:sldIdLst") else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for slide_id in id_list.children_named("p:sldId") {
            let rel_id = slide_id
                .attr("r:id")
                .ok_or_else(|| DtkError::Document("slide id without relationship".to_string()))?;
            let rel = rels.get(rel_id).ok_or_else(|| {
                DtkError::Document(format!("unresolved slide relationship: {}", rel_id))
            })?;
            names.push(rel.target.clone());
        }
        Ok(names)
    }

    /// Load a slide with its chart and notes parts.
    pub fn load_slide(&self, part_name: &str) -> Result<SlideParts> {
        let slide = self.parse_part(part_name)?;
        let rels = self.relationships(part_name)?;

        let mut charts = HashMap::new();
        let mut notes = None;
        for (id, rel) in &rels {
            if rel.rel_type.ends_with("/chart") {
                charts.insert(
                    id.clone(),
                    ChartPart { part_name: rel.target.clone(), doc: self.parse_part(&rel.target)? },
                );
            } else if rel.rel_type.ends_with("/notesSlide") {
                notes = Some(NotesPart {
                    part_name: rel.target.clone(),
                    doc: self.parse_part(&rel.target)?,
                });
            }
        }

        Ok(SlideParts { part_name: part_name.to_string(), slide, charts, notes })
    }

    /// Serialize a mutated slide (and its related parts) back into the
    /// package.
    pub fn store_slide(&mut self, parts: &SlideParts) -> Result<()> {
        let data = parts.slide.to_bytes()?;
        self.set_part(&parts.part_name, data);
        for chart in parts.charts.values() {
            self.set_part(&chart.part_name, chart.doc.to_bytes()?);
        }
        if let Some(notes) = &parts.notes {
            self.set_part(&notes.part_name, notes.doc.to_bytes()?);
        }
        Ok(())
    }
}

fn parent_dir(part_name: &str) -> &str {
    part_name.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn rels_part_name(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_name),
    }
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> =
        base_dir.split('/').filter(|segment| !segment.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rels_part_name() {
        assert_eq!(rels_part_name("ppt/presentation.xml"), "ppt/_rels/presentation.xml.rels");
        assert_eq!(rels_part_name("ppt/slides/slide1.xml"), "ppt/slides/_rels/slide1.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt/slides", "../charts/chart1.xml"), "ppt/charts/chart1.xml");
        assert_eq!(
            resolve_target("ppt/slides", "../notesSlides/notesSlide1.xml"),
            "ppt/notesSlides/notesSlide1.xml"
        );
        assert_eq!(resolve_target("ppt/slides", "/docProps/core.xml"), "docProps/core.xml");
    }
}
