//! Compile a deck description into a python-pptx script.
//!
//! The script is ordinary sandbox input: it imports python-pptx, builds the
//! slides and saves to `PPTX_OUTPUT_PATH`. User text only ever appears
//! inside string literals produced by [`py_str`].

use crate::spec::{DeckSpec, SlideLayout, SlideSpec, TextBoxSpec};
use crate::theme::Theme;

const PRELUDE: &str = r#"import os

from pptx import Presentation
from pptx.dml.color import RGBColor
from pptx.util import Inches


def _fill_background(slide, color):
    fill = slide.background.fill
    fill.solid()
    fill.fore_color.rgb = RGBColor.from_string(color)


def _color_text(shape, color):
    if not shape.has_text_frame:
        return
    for paragraph in shape.text_frame.paragraphs:
        paragraph.font.color.rgb = RGBColor.from_string(color)


prs = Presentation()
"#;

const SAVE: &str = "prs.save(os.environ['PPTX_OUTPUT_PATH'])\n";

const DEFAULT_TITLE: &str = "Untitled";

/// Python source that builds `deck`.
pub fn compile_script(deck: &DeckSpec) -> String {
    let theme = deck.theme.as_deref().and_then(|name| {
        let theme = Theme::by_name(name);
        if theme.is_none() {
            log::warn!("Unknown theme '{}', generating without one", name);
        }
        theme
    });

    let mut out = String::from(PRELUDE);

    if deck.slides.is_empty() {
        let title = deck.title.as_deref().unwrap_or(DEFAULT_TITLE);
        emit_placeholder_slide(&mut out, title, theme);
    } else {
        for (i, slide) in deck.slides.iter().enumerate() {
            emit_slide(&mut out, i + 1, slide, theme);
        }
    }

    out.push('\n');
    out.push_str(SAVE);
    out
}

fn emit_placeholder_slide(out: &mut String, title: &str, theme: Option<&Theme>) {
    out.push_str("\n# empty deck\n");
    add_slide(out, SlideLayout::Title, theme);
    set_title(out, title, theme);
    line(out, 0, "if len(slide.placeholders) > 1:");
    line(out, 1, "slide.placeholders[1].text = ''");
}

fn emit_slide(out: &mut String, number: usize, slide: &SlideSpec, theme: Option<&Theme>) {
    let layout = slide.layout();
    out.push_str(&format!("\n# slide {}: {:?}\n", number, layout));
    add_slide(out, layout, theme);

    let title = slide.title.as_deref().unwrap_or("");
    match layout {
        SlideLayout::Title => {
            set_title(out, title, theme);
            let subtitle = slide.subtitle.as_deref().unwrap_or("");
            line(out, 0, "if len(slide.placeholders) > 1:");
            line(
                out,
                1,
                &format!("slide.placeholders[1].text = {}", py_str(subtitle)),
            );
            if let Some(theme) = theme {
                color_body(out, theme);
            }
        }
        SlideLayout::Content => {
            set_title(out, title, theme);
            line(out, 0, "if len(slide.placeholders) > 1:");
            line(out, 1, "body = slide.placeholders[1].text_frame");
            if let Some((first, rest)) = slide.bullets.split_first() {
                line(out, 1, &format!("body.text = {}", py_str(first)));
                for bullet in rest {
                    line(out, 1, "paragraph = body.add_paragraph()");
                    line(out, 1, &format!("paragraph.text = {}", py_str(bullet)));
                    line(out, 1, "paragraph.level = 0");
                }
            }
            if let Some(theme) = theme {
                color_body(out, theme);
            }
        }
        SlideLayout::TitleOnly => set_title(out, title, theme),
        SlideLayout::Blank => {
            for textbox in &slide.textboxes {
                emit_textbox(out, textbox, theme);
            }
        }
        SlideLayout::Unknown => {
            log::warn!(
                "Unknown layout '{}' on slide {}, leaving it empty",
                slide.layout.as_deref().unwrap_or_default(),
                number
            );
        }
    }
}

fn emit_textbox(out: &mut String, textbox: &TextBoxSpec, theme: Option<&Theme>) {
    line(
        out,
        0,
        &format!(
            "textbox = slide.shapes.add_textbox(Inches({}), Inches({}), Inches({}), Inches({}))",
            py_float(textbox.left),
            py_float(textbox.top),
            py_float(textbox.width),
            py_float(textbox.height)
        ),
    );
    line(
        out,
        0,
        &format!("textbox.text_frame.text = {}", py_str(&textbox.text)),
    );
    if let Some(theme) = theme {
        line(
            out,
            0,
            &format!("_color_text(textbox, {})", py_str(theme.body)),
        );
    }
}

fn add_slide(out: &mut String, layout: SlideLayout, theme: Option<&Theme>) {
    line(
        out,
        0,
        &format!(
            "slide = prs.slides.add_slide(prs.slide_layouts[{}])",
            layout.index()
        ),
    );
    if let Some(theme) = theme {
        line(
            out,
            0,
            &format!("_fill_background(slide, {})", py_str(theme.background)),
        );
    }
}

fn set_title(out: &mut String, title: &str, theme: Option<&Theme>) {
    line(out, 0, "if slide.shapes.title is not None:");
    line(out, 1, &format!("slide.shapes.title.text = {}", py_str(title)));
    if let Some(theme) = theme {
        line(
            out,
            1,
            &format!("_color_text(slide.shapes.title, {})", py_str(theme.title)),
        );
    }
}

fn color_body(out: &mut String, theme: &Theme) {
    line(
        out,
        1,
        &format!("_color_text(slide.placeholders[1], {})", py_str(theme.body)),
    );
}

fn line(out: &mut String, indent: usize, text: &str) {
    for _ in 0..indent {
        out.push_str("    ");
    }
    out.push_str(text);
    out.push('\n');
}

/// A double-quoted literal that Python reads back as `s`.
///
/// JSON string escapes (`\"`, `\\`, `\n`, `\uXXXX`, ...) are a subset of
/// Python's, so a JSON-encoded string is a valid Python literal.
pub fn py_str(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

/// Deck geometry comes from JSON numbers, so it is always finite.
fn py_float(value: f64) -> String {
    format!("{:?}", value)
}
