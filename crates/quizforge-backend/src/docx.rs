//! DOCX container extraction.
//!
//! A DOCX file is a ZIP archive; the main content lives in
//! `word/document.xml` and images are reachable through the relationship
//! table in `word/_rels/document.xml.rels`. This backend walks the body in
//! document order, flattening paragraphs to text, tables to minimal HTML,
//! equations to linear math markup, and inline images to
//! `[IMAGE:<relId>.<ext>]` placeholders with the raw bytes carried
//! alongside.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use roxmltree::Node;
use zip::ZipArchive;

use quizforge_core::error::{ExtractionError, Result};
use quizforge_core::math::{looks_like_prose, MathNode};
use quizforge_core::model::{ExtractedImage, Extraction};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_M: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_V: &str = "urn:schemas-microsoft-com:vml";

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Extract text and images from DOCX bytes.
///
/// Fails with [`ExtractionError::InvalidContainer`] when the bytes are not a
/// ZIP archive or the main document part is missing, and with
/// [`ExtractionError::MalformedDocument`] when `document.xml` is not
/// well-formed XML. Everything past that point is total: unrecognized
/// elements are skipped, unreadable images are logged and dropped.
pub fn extract(bytes: &[u8]) -> Result<Extraction> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::InvalidContainer(format!("not a ZIP archive: {e}")))?;

    let relationships = parse_relationships(&mut archive)?;
    let document_xml = read_zip_string(&mut archive, "word/document.xml").ok_or_else(|| {
        ExtractionError::InvalidContainer("missing word/document.xml".to_string())
    })?;

    let doc = roxmltree::Document::parse(&document_xml)
        .map_err(|e| ExtractionError::MalformedDocument(format!("document.xml: {e}")))?;

    let body = doc
        .root_element()
        .children()
        .find(|n| is_elem(n, NS_W, "body"))
        .ok_or_else(|| ExtractionError::MalformedDocument("document has no body".to_string()))?;

    let mut walker = BodyWalker {
        archive: &mut archive,
        relationships: &relationships,
        images: Vec::new(),
        seen: HashSet::new(),
    };

    let mut blocks: Vec<String> = Vec::new();
    for child in body.children().filter(roxmltree::Node::is_element) {
        match (child.tag_name().namespace(), child.tag_name().name()) {
            (Some(NS_W), "p") => {
                let text = walker.paragraph_text(child);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
            (Some(NS_W), "tbl") => blocks.push(walker.table_html(child)),
            _ => {}
        }
    }

    debug!(
        "docx extraction: {} blocks, {} images",
        blocks.len(),
        walker.images.len()
    );

    Ok(Extraction {
        text: blocks.join("\n\n"),
        images: walker.images,
    })
}

/// Per-document walk state: the open archive for image reads, the
/// relationship map, and the images collected so far.
struct BodyWalker<'a, 'input> {
    archive: &'a mut Archive<'input>,
    relationships: &'a HashMap<String, String>,
    images: Vec<ExtractedImage>,
    seen: HashSet<String>,
}

impl BodyWalker<'_, '_> {
    fn paragraph_text(&mut self, p: Node<'_, '_>) -> String {
        let mut out = String::new();
        self.render_inline(p, &mut out);
        out.trim().to_string()
    }

    fn render_inline(&mut self, node: Node<'_, '_>, out: &mut String) {
        for child in node.children().filter(roxmltree::Node::is_element) {
            match (child.tag_name().namespace(), child.tag_name().name()) {
                (Some(NS_W), "r") => self.render_run(child, out),
                (Some(NS_M), "oMath" | "oMathPara") => out.push_str(&render_math(child)),
                // Wrappers whose runs must still land in reading order.
                (Some(NS_W), "hyperlink" | "smartTag" | "ins") => self.render_inline(child, out),
                _ => {}
            }
        }
    }

    fn render_run(&mut self, run: Node<'_, '_>, out: &mut String) {
        for child in run.children().filter(roxmltree::Node::is_element) {
            match (child.tag_name().namespace(), child.tag_name().name()) {
                (Some(NS_W), "t") => out.push_str(child.text().unwrap_or("")),
                (Some(NS_W), "br") => out.push('\n'),
                (Some(NS_W), "tab") => out.push('\t'),
                (Some(NS_W), "drawing" | "pict" | "object") => self.render_image(child, out),
                _ => {}
            }
        }
    }

    /// Emit an image placeholder and record the image bytes once per
    /// relationship id. DrawingML anchors carry the id on `a:blip/@r:embed`,
    /// legacy VML on `v:imagedata/@r:id`.
    fn render_image(&mut self, node: Node<'_, '_>, out: &mut String) {
        let rel_id = node.descendants().find_map(|d| {
            if is_elem(&d, NS_A, "blip") {
                d.attribute((NS_R, "embed")).map(str::to_string)
            } else if is_elem(&d, NS_V, "imagedata") {
                d.attribute((NS_R, "id")).map(str::to_string)
            } else {
                None
            }
        });
        let Some(rel_id) = rel_id else { return };

        let Some(target) = self.relationships.get(&rel_id) else {
            warn!("image relationship {rel_id} not found in document rels");
            return;
        };
        let extension = media_extension(target);
        out.push_str(&format!("[IMAGE:{rel_id}.{extension}]"));

        if !self.seen.insert(rel_id.clone()) {
            return;
        }
        let path = resolve_media_path(target);
        match read_zip_bytes(self.archive, &path) {
            Some(bytes) => self.images.push(ExtractedImage {
                suggested_name: format!("{rel_id}.{extension}"),
                id: rel_id,
                extension,
                bytes,
            }),
            None => warn!("image part {path} missing from archive"),
        }
    }

    /// Flatten a table to minimal HTML so row/column adjacency survives the
    /// text representation.
    fn table_html(&mut self, tbl: Node<'_, '_>) -> String {
        let mut html = String::from("<table>");
        for row in tbl.children().filter(|n| is_elem(n, NS_W, "tr")) {
            html.push_str("<tr>");
            for cell in row.children().filter(|n| is_elem(n, NS_W, "tc")) {
                html.push_str("<td>");
                let paragraphs: Vec<String> = cell
                    .children()
                    .filter(|n| is_elem(n, NS_W, "p"))
                    .map(|p| self.paragraph_text(p))
                    .filter(|t| !t.is_empty())
                    .collect();
                html.push_str(&paragraphs.join(" "));
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

#[inline]
fn is_elem(n: &Node<'_, '_>, ns: &str, name: &str) -> bool {
    n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == Some(ns)
}

/// Extension from a media target path, lowercased; `bin` when the path has
/// no usable extension.
fn media_extension(target: &str) -> String {
    std::path::Path::new(target)
        .extension()
        .and_then(|e| e.to_str())
        .map_or_else(|| "bin".to_string(), str::to_lowercase)
}

/// Relationship targets are relative to `word/`; a leading slash marks a
/// package-absolute path.
fn resolve_media_path(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("word/{target}")
    }
}

/// Convert an OMML subtree to text: linear math markup normally, or the
/// flattened literal text when it reads as prose mistyped into the equation
/// editor.
fn render_math(node: Node<'_, '_>) -> String {
    let tree = MathNode::Container(build_math_children(node));
    let flat = tree.flatten_text();
    if looks_like_prose(&flat) {
        flat
    } else {
        tree.to_latex()
    }
}

fn build_math_children(node: Node<'_, '_>) -> Vec<MathNode> {
    node.children()
        .filter(roxmltree::Node::is_element)
        .filter_map(build_math_node)
        .collect()
}

/// Build one [`MathNode`] from an OMML element. Property elements (`*Pr`)
/// carry no content and yield `None`; anything unrecognized degrades to
/// [`MathNode::Unknown`] so its children still render.
fn build_math_node(node: Node<'_, '_>) -> Option<MathNode> {
    if node.tag_name().namespace() != Some(NS_M) {
        return None;
    }
    let name = node.tag_name().name();
    if name.ends_with("Pr") {
        return None;
    }
    Some(match name {
        "oMath" | "oMathPara" => MathNode::Container(build_math_children(node)),
        "f" => MathNode::Fraction {
            num: math_group(node, "num"),
            den: math_group(node, "den"),
        },
        "rad" => MathNode::Radical {
            base: math_group(node, "e"),
            degree: optional_math_group(node, "deg"),
        },
        "sSup" => MathNode::Superscript {
            base: math_group(node, "e"),
            exp: math_group(node, "sup"),
        },
        "sSub" => MathNode::Subscript {
            base: math_group(node, "e"),
            sub: math_group(node, "sub"),
        },
        "sSubSup" => MathNode::SubSup {
            base: math_group(node, "e"),
            sub: math_group(node, "sub"),
            exp: math_group(node, "sup"),
        },
        "d" => MathNode::Delimiter(
            node.children()
                .filter(|c| is_elem(c, NS_M, "e"))
                .map(|e| collapse(build_math_children(e)))
                .collect(),
        ),
        "nary" => MathNode::NAry {
            op: nary_chr(node),
            base: math_group(node, "e"),
            sub: optional_math_group(node, "sub"),
            sup: optional_math_group(node, "sup"),
        },
        "r" => MathNode::Run(build_math_children(node)),
        "t" => MathNode::Text(node.text().unwrap_or("").to_string()),
        _ => MathNode::Unknown(build_math_children(node)),
    })
}

/// Mandatory child group (`m:num`, `m:den`, `m:e`, ...): missing or empty
/// groups become an empty text leaf so rendering stays total.
fn math_group(node: Node<'_, '_>, name: &str) -> Box<MathNode> {
    match optional_math_group(node, name) {
        Some(built) => built,
        None => Box::new(MathNode::Text(String::new())),
    }
}

fn optional_math_group(node: Node<'_, '_>, name: &str) -> Option<Box<MathNode>> {
    let group = node.children().find(|c| is_elem(c, NS_M, name))?;
    let children = build_math_children(group);
    if children.is_empty() {
        None
    } else {
        Some(Box::new(collapse(children)))
    }
}

fn collapse(mut children: Vec<MathNode>) -> MathNode {
    if children.len() == 1 {
        children.remove(0)
    } else {
        MathNode::Run(children)
    }
}

/// N-ary operator character from `m:naryPr/m:chr/@m:val`; OOXML defaults to
/// summation when the property is absent.
fn nary_chr(node: Node<'_, '_>) -> char {
    node.children()
        .find(|c| is_elem(c, NS_M, "naryPr"))
        .and_then(|pr| pr.children().find(|c| is_elem(c, NS_M, "chr")))
        .and_then(|chr| chr.attribute((NS_M, "val")))
        .and_then(|val| val.chars().next())
        .unwrap_or('∑')
}

/// Parse `word/_rels/document.xml.rels` into a relationship-id to target
/// map, keeping only media and embedded-object targets. A missing rels
/// part is fine (a text-only document); broken XML in an existing part is
/// not.
fn parse_relationships(archive: &mut Archive<'_>) -> Result<HashMap<String, String>> {
    let Some(xml_content) = read_zip_string(archive, "word/_rels/document.xml.rels") else {
        return Ok(HashMap::new());
    };

    let mut relationships = HashMap::new();
    let mut reader = Reader::from_str(&xml_content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                let mut rel_id = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => rel_id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        b"Target" => {
                            target = Some(String::from_utf8_lossy(&attr.value).to_string());
                        }
                        _ => {}
                    }
                }
                if let (Some(id), Some(tgt)) = (rel_id, target) {
                    if tgt.contains("media/") || tgt.contains("embeddings/") {
                        relationships.insert(id, tgt);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::MalformedDocument(format!(
                    "document.xml.rels: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

fn read_zip_string(archive: &mut Archive<'_>, name: &str) -> Option<String> {
    let mut file = archive.by_name(name).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).ok()?;
    Some(content)
}

fn read_zip_bytes(archive: &mut Archive<'_>, name: &str) -> Option<Vec<u8>> {
    let mut file = archive.by_name(name).ok()?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).ok()?;
    Some(bytes)
}
