//! PPTX file parser implementation.

use deck_core::{Error, ExtractedSlide, Presentation, Result, TextNormalizer};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Parser for PPTX (Office Open XML) files.
#[derive(Debug, Clone, Default)]
pub struct PptxParser {
    normalizer: TextNormalizer,
}

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom normalizer for run text.
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Presentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new(filename);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("{}: {} slides", filename, slide_order.len());

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx)?;
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Get the ordered list of slide part paths.
    ///
    /// The authoritative order is `p:sldIdLst` in `presentation.xml`. Packages
    /// without one fall back to the numeric order of the slide relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PART)?;
        let slide_rels = parse_slide_relationships(&rels_content)?;

        let listed_ids = match self.read_file_from_archive(archive, PRESENTATION_PART) {
            Ok(content) => parse_slide_id_list(&content)?,
            Err(e) => {
                log::warn!("{} unreadable, using relationship order: {}", PRESENTATION_PART, e);
                Vec::new()
            }
        };

        if !listed_ids.is_empty() {
            let by_id: HashMap<&str, &str> = slide_rels
                .iter()
                .map(|rel| (rel.id.as_str(), rel.target.as_str()))
                .collect();

            let mut ordered = Vec::with_capacity(listed_ids.len());
            for id in &listed_ids {
                match by_id.get(id.as_str()) {
                    Some(target) => ordered.push(resolve_target(target)),
                    None => log::warn!("Slide id {} has no relationship; skipping", id),
                }
            }
            return Ok(ordered);
        }

        let mut slides: Vec<(String, Option<usize>)> = slide_rels
            .iter()
            .map(|rel| {
                let order_num =
                    extract_slide_number(&rel.target).or_else(|| extract_slide_number(&rel.id));
                (resolve_target(&rel.target), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        index: usize,
    ) -> Result<ExtractedSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = ExtractedSlide::new(index);

        for run in self.extract_runs_from_xml(&content) {
            if let Some(text) = self.normalizer.normalize_run(&run) {
                slide.add_run(text);
            }
        }

        Ok(slide)
    }

    /// Collect the text of every run (`a:r`) inside the text body of a
    /// shape (`p:sp`), in document order.
    fn extract_runs_from_xml(&self, xml_content: &str) -> Vec<String> {
        let mut runs = Vec::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(false);

        let mut shape_depth = 0usize;
        let mut in_text_body = false;
        let mut in_run = false;
        let mut in_text = false;
        let mut current_run = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => shape_depth += 1,
                    b"txBody" if shape_depth > 0 => in_text_body = true,
                    b"r" if in_text_body => {
                        in_run = true;
                        current_run.clear();
                    }
                    b"t" if in_run => in_text = true,
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_text {
                        match e.unescape() {
                            Ok(text) => current_run.push_str(&text),
                            Err(err) => log::warn!("Bad text escape (skipping): {}", err),
                        }
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => {
                        shape_depth = shape_depth.saturating_sub(1);
                        in_text_body = false;
                        in_run = false;
                        in_text = false;
                    }
                    b"txBody" => in_text_body = false,
                    b"r" if in_run => {
                        in_run = false;
                        runs.push(std::mem::take(&mut current_run));
                    }
                    b"t" => in_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("XML parsing error in slide (stopping): {}", e);
                    break;
                }
                _ => {}
            }
        }

        runs
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

/// Open and parse the presentation at `path`.
pub fn extract_file(path: &Path, parser: &PptxParser) -> Result<Presentation> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    parser.parse(BufReader::new(file), filename)
}

/// A slide relationship from `presentation.xml.rels`.
#[derive(Debug, Clone)]
struct SlideRelationship {
    id: String,
    target: String,
}

fn parse_slide_relationships(rels_content: &str) -> Result<Vec<SlideRelationship>> {
    let mut slides = Vec::new();
    let mut reader = Reader::from_str(rels_content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let rel_type = attribute(e, b"Type").unwrap_or_default();
                let target = attribute(e, b"Target").unwrap_or_default();
                let id = attribute(e, b"Id").unwrap_or_default();

                // `.../relationships/slide` only, not slideLayout/slideMaster
                if rel_type.ends_with("/slide") && !target.is_empty() {
                    slides.push(SlideRelationship { id, target });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship ids of `p:sldIdLst/p:sldId`, in list order.
fn parse_slide_id_list(presentation_content: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(presentation_content);
    reader.trim_text(true);

    let mut in_list = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = true;
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = false;
            }
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if in_list && local_name(e.name().as_ref()) == b"sldId" =>
            {
                // The relationship id lives in the `r:` namespace.
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| {
                        let key = attr.key.as_ref();
                        key != b"id" && local_name(key) == b"id"
                    })
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string());

                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing {}: {}",
                    PRESENTATION_PART, e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Turn a relationship target (relative to `ppt/`) into an archive path.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("ppt/{}", target)
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const SLIDE_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    const LAYOUT_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    fn slide_xml(shapes: &[&[&str]]) -> String {
        let mut body = String::new();
        for paragraphs in shapes {
            body.push_str("<p:sp><p:nvSpPr/><p:txBody><a:bodyPr/>");
            for para in paragraphs.iter() {
                body.push_str("<a:p>");
                for run in para.split('|') {
                    body.push_str(&format!("<a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r>", run));
                }
                body.push_str("</a:p>");
            }
            body.push_str("</p:txBody></p:sp>");
        }
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
                "<p:sld xmlns:a=\"a\" xmlns:p=\"p\"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"
            ),
            body
        )
    }

    /// Build a package where `slides[i]` is stored as `slide{i+1}.xml` and
    /// `sld_order` lists relationship ids for `p:sldIdLst`.
    fn build_pptx(slides: &[String], sld_order: Option<&[&str]>) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        let mut rels = String::from("<Relationships xmlns=\"rels\">");
        rels.push_str(&format!(
            "<Relationship Id=\"rId1\" Type=\"{}\" Target=\"slideMasters/slideMaster1.xml\"/>",
            LAYOUT_REL
        ));
        for i in 0..slides.len() {
            rels.push_str(&format!(
                "<Relationship Id=\"rId{}\" Type=\"{}\" Target=\"slides/slide{}.xml\"/>",
                i + 2,
                SLIDE_REL,
                i + 1
            ));
        }
        rels.push_str("</Relationships>");
        zip.start_file(PRESENTATION_RELS_PART, options).unwrap();
        zip.write_all(rels.as_bytes()).unwrap();

        if let Some(order) = sld_order {
            let mut pres = String::from("<p:presentation xmlns:p=\"p\" xmlns:r=\"r\"><p:sldIdLst>");
            for (n, rel_id) in order.iter().enumerate() {
                pres.push_str(&format!("<p:sldId id=\"{}\" r:id=\"{}\"/>", 256 + n, rel_id));
            }
            pres.push_str("</p:sldIdLst></p:presentation>");
            zip.start_file(PRESENTATION_PART, options).unwrap();
            zip.write_all(pres.as_bytes()).unwrap();
        }

        for (i, slide) in slides.iter().enumerate() {
            zip.start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(slide.as_bytes()).unwrap();
        }

        let inner = zip.finish().unwrap().into_inner();
        Cursor::new(inner)
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slides/slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("/ppt/slides/slide1.xml"), "ppt/slides/slide1.xml");
    }

    #[test]
    fn test_runs_are_trimmed_and_joined() {
        let slides = vec![slide_xml(&[&["  Quarterly |Review "], &["Revenue| |up"]])];
        let presentation = PptxParser::new()
            .parse(build_pptx(&slides, None), "deck.pptx")
            .unwrap();

        let texts = presentation.slide_texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].index, 0);
        assert_eq!(texts[0].text, "Quarterly Review Revenue up");
    }

    #[test]
    fn test_sld_id_list_defines_order() {
        let slides = vec![slide_xml(&[&["first stored"]]), slide_xml(&[&["second stored"]])];
        // rId3 -> slide2.xml, rId2 -> slide1.xml
        let presentation = PptxParser::new()
            .parse(build_pptx(&slides, Some(&["rId3", "rId2"])), "deck.pptx")
            .unwrap();

        let texts = presentation.slide_texts();
        assert_eq!(texts[0].text, "second stored");
        assert_eq!(texts[0].index, 0);
        assert_eq!(texts[1].text, "first stored");
        assert_eq!(texts[1].index, 1);
    }

    #[test]
    fn test_fallback_order_without_sld_id_list() {
        let slides: Vec<String> = (1..=11)
            .map(|n| {
                let text = format!("slide {}", n);
                slide_xml(&[&[text.as_str()]])
            })
            .collect();
        let presentation = PptxParser::new()
            .parse(build_pptx(&slides, None), "deck.pptx")
            .unwrap();

        let texts = presentation.slide_texts();
        assert_eq!(texts.len(), 11);
        assert_eq!(texts[1].text, "slide 2");
        assert_eq!(texts[10].text, "slide 11");
    }

    #[test]
    fn test_text_outside_shapes_is_ignored() {
        let xml = concat!(
            "<p:sld xmlns:a=\"a\" xmlns:p=\"p\"><p:cSld><p:spTree>",
            "<p:graphicFrame><a:graphic><a:r><a:t>table cell</a:t></a:r></a:graphic></p:graphicFrame>",
            "<p:sp><p:txBody><a:p><a:r><a:t>Title &amp; more</a:t></a:r></a:p></p:txBody></p:sp>",
            "</p:spTree></p:cSld></p:sld>"
        );
        let runs = PptxParser::new().extract_runs_from_xml(xml);
        assert_eq!(runs, vec!["Title & more"]);
    }

    #[test]
    fn test_grouped_shapes_are_included() {
        let xml = concat!(
            "<p:sld xmlns:a=\"a\" xmlns:p=\"p\"><p:cSld><p:spTree>",
            "<p:sp><p:txBody><a:p><a:r><a:t>Heading</a:t></a:r></a:p></p:txBody></p:sp>",
            "<p:grpSp><p:nvGrpSpPr/>",
            "<p:sp><p:txBody><a:p><a:r><a:t>Left box</a:t></a:r></a:p></p:txBody></p:sp>",
            "<p:sp><p:txBody><a:p><a:r><a:t>Right box</a:t></a:r></a:p></p:txBody></p:sp>",
            "</p:grpSp>",
            "</p:spTree></p:cSld></p:sld>"
        );
        let runs = PptxParser::new().extract_runs_from_xml(xml);
        assert_eq!(runs, vec!["Heading", "Left box", "Right box"]);
    }

    #[test]
    fn test_blank_slide_reports_empty_text() {
        let slides = vec![slide_xml(&[]), slide_xml(&[&["  "]])];
        let presentation = PptxParser::new()
            .parse(build_pptx(&slides, None), "deck.pptx")
            .unwrap();

        let texts = presentation.slide_texts();
        assert_eq!(texts.len(), 2);
        assert!(texts.iter().all(|t| t.text.is_empty()));
    }

    #[test]
    fn test_not_a_zip() {
        let err = PptxParser::new()
            .parse(Cursor::new(b"not a zip".to_vec()), "bad.pptx")
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }

    #[test]
    fn test_extract_file_missing() {
        let err = extract_file(Path::new("/definitely/not/here.pptx"), &PptxParser::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found: /definitely/not/here.pptx");
    }
}
