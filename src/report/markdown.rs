use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::report::document::{ReportDocument, Section, TextStyle};

pub const REPORT_FILE: &str = "report.md";

fn figure_name(index: usize) -> String {
    format!("figure-{:02}.png", index + 1)
}

impl ReportDocument {
    /// Render as Markdown. Images are referenced as `figure-NN.png` in
    /// document order, matching [`ReportDocument::write_markdown`].
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let mut figure = 0;
        for section in self.sections() {
            match section {
                Section::Heading { text, level } => {
                    let hashes = "#".repeat(*level as usize + 1);
                    let _ = writeln!(out, "{hashes} {text}\n");
                }
                Section::Paragraph { text, style } => match style {
                    Some(TextStyle::ListBullet) => {
                        let _ = writeln!(out, "- {text}\n");
                    }
                    Some(TextStyle::Emphasis) => {
                        let _ = writeln!(out, "*{text}*\n");
                    }
                    None => {
                        let _ = writeln!(out, "{text}\n");
                    }
                },
                Section::Image { image, .. } => {
                    let _ = writeln!(out, "![{}]({})\n", image.caption, figure_name(figure));
                    figure += 1;
                }
                Section::BulletList { items } => {
                    for item in items {
                        let _ = writeln!(out, "- {item}");
                    }
                    out.push('\n');
                }
                Section::Statistics { column, stats } => {
                    let _ = writeln!(out, "```text\n{}\n```\n", stats.report(column));
                }
            }
        }
        out
    }

    /// Write `report.md` and one PNG per image into `dir`, creating it if
    /// needed. Returns the Markdown path.
    pub fn write_markdown(&self, dir: &Path) -> Result<PathBuf> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ReportError::Io { path, source }
        };

        std::fs::create_dir_all(dir).map_err(io_err(dir))?;
        for (i, image) in self.images().into_iter().enumerate() {
            let path = dir.join(figure_name(i));
            std::fs::write(&path, &image.bytes).map_err(io_err(&path))?;
        }
        let path = dir.join(REPORT_FILE);
        std::fs::write(&path, self.to_markdown()).map_err(io_err(&path))?;
        tracing::info!("Report written to {:?}", path);
        Ok(path)
    }
}
