//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render to a writer
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        writer.write_all(output.as_bytes())?;
        if !output.is_empty() && !output.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let sections = [
            (Kind::Diagnostic, "Diagnostics"),
            (Kind::TextNode, "Text Nodes"),
            (Kind::Anchor, "Anchors"),
            (Kind::Keyword, "Keywords"),
            (Kind::Chunk, "Chunks"),
        ];

        for (kind, title) in sections {
            let items: Vec<_> = result_set
                .items
                .iter()
                .filter(|item| item.kind == kind)
                .collect();
            if items.is_empty() {
                continue;
            }

            output.push_str(&format!("## {}\n\n", title));
            for item in items {
                self.render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        output.push_str("- ");
        if let Some(excerpt) = &item.excerpt {
            output.push_str(&format!("`{}`", excerpt.replace('`', "\\`")));
        }
        if let Some(range) = &item.range {
            output.push_str(&format!(" (bytes {}-{})", range.start, range.end));
        }

        let meta = &item.meta;
        let mut notes = Vec::new();
        if let Some(tag) = &meta.tag {
            let fragment = meta
                .fragment
                .map(|f| format!("{:?}", f).to_lowercase())
                .unwrap_or_default();
            notes.push(format!("<{}> {}", tag, fragment).trim_end().to_string());
        }
        if let Some(anchor_type) = meta.anchor_type {
            notes.push(anchor_type.to_string());
        }
        if let Some(version) = &meta.version {
            notes.push(format!("version {}", version));
        }
        if let Some(parent) = meta.parent {
            notes.push(format!("parent {}", parent));
        }
        if !notes.is_empty() {
            output.push_str(&format!(" [{}]", notes.join(", ")));
        }
        output.push('\n');

        for error in &item.errors {
            output.push_str(&format!("  - **{}**: {}\n", error.code, error.message));
        }

        if let Some(anchors) = item
            .data
            .as_ref()
            .and_then(|data| data.get("anchors"))
            .and_then(|anchors| anchors.as_array())
        {
            for anchor in anchors {
                if let Some(value) = anchor.get("value").and_then(|v| v.as_str()) {
                    output.push_str(&format!("  - anchor `{}`\n", value));
                }
            }
        }

        if meta.truncated {
            output.push_str("  > ⚠️ Content was truncated\n");
        }
    }

    /// Render as raw output (for debugging)
    fn render_raw(&self, result_set: &ResultSet) -> String {
        // Raw mode: just output excerpts directly
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}
