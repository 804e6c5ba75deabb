//! Report template: turns a title and widget list into layout commands.
//!
//! The layout step is pure. It decides what text appears, in which style and
//! order; the PDF writer decides where each line lands and when a page breaks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::widget::{Report, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

/// Read-only styling table for the document template. Sizes are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyle {
    pub page_width: f32,
    pub page_height: f32,
    pub page_padding: f32,
    pub section_margin: f32,
    pub section_padding: f32,
    pub title_size: f32,
    pub title_margin_bottom: f32,
    pub subtitle_size: f32,
    pub subtitle_margin_bottom: f32,
    pub text_size: f32,
    pub text_margin_bottom: f32,
    pub widget_spacing: f32,
    pub line_height: f32,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            // A4
            page_width: 595.28,
            page_height: 841.89,
            page_padding: 30.0,
            section_margin: 10.0,
            section_padding: 10.0,
            title_size: 24.0,
            title_margin_bottom: 20.0,
            subtitle_size: 18.0,
            subtitle_margin_bottom: 10.0,
            text_size: 12.0,
            text_margin_bottom: 5.0,
            widget_spacing: 20.0,
            line_height: 1.2,
        }
    }
}

impl DocumentStyle {
    /// Distance from each page edge to the content box.
    pub fn content_inset(&self) -> f32 {
        self.page_padding + self.section_margin + self.section_padding
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.content_inset()
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.content_inset()
    }

    fn title(&self, text: String) -> TextLine {
        TextLine {
            text,
            weight: FontWeight::Bold,
            size: self.title_size,
            align: Align::Center,
            margin_bottom: self.title_margin_bottom,
        }
    }

    fn subtitle(&self, text: String) -> TextLine {
        TextLine {
            text,
            weight: FontWeight::Bold,
            size: self.subtitle_size,
            align: Align::Left,
            margin_bottom: self.subtitle_margin_bottom,
        }
    }

    fn text(&self, text: String) -> TextLine {
        TextLine {
            text,
            weight: FontWeight::Regular,
            size: self.text_size,
            align: Align::Left,
            margin_bottom: self.text_margin_bottom,
        }
    }
}

/// One styled paragraph. It may wrap onto several lines when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub weight: FontWeight,
    pub size: f32,
    pub align: Align,
    pub margin_bottom: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutCommand {
    Text(TextLine),
    Space(f32),
}

impl LayoutCommand {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(line) => Some(&line.text),
            Self::Space(_) => None,
        }
    }
}

/// Header line shown under the title, e.g. `Generated on 3/9/2024`.
pub fn generated_on_line(date: NaiveDate) -> String {
    format!("Generated on {}", date.format("%-m/%-d/%Y"))
}

/// Build the command list for `report`: the header block, then three lines
/// and a gap per widget, in widget order.
pub fn layout_report(
    report: &Report,
    style: &DocumentStyle,
    generated_on: NaiveDate,
) -> Vec<LayoutCommand> {
    let mut commands = Vec::with_capacity(2 + report.widgets.len() * 4);
    commands.push(LayoutCommand::Text(style.title(report.title.clone())));
    commands.push(LayoutCommand::Text(style.text(generated_on_line(generated_on))));

    for widget in &report.widgets {
        push_widget(&mut commands, widget, style);
    }

    commands
}

fn push_widget(commands: &mut Vec<LayoutCommand>, widget: &Widget, style: &DocumentStyle) {
    commands.push(LayoutCommand::Text(style.subtitle(widget.title.clone())));
    commands.push(LayoutCommand::Text(style.text(format!("Type: {}", widget.kind))));
    commands.push(LayoutCommand::Text(
        style.text(widget.kind.placeholder().to_string()),
    ));
    commands.push(LayoutCommand::Space(style.widget_spacing));
}
