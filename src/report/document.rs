use crate::processing::statistics::DescriptiveStats;
use crate::render::RenderedImage;

/// Display style attached to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    ListBullet,
    Emphasis,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Level 0 is the document title.
    Heading { text: String, level: u8 },
    Paragraph { text: String, style: Option<TextStyle> },
    Image { image: RenderedImage, width_inches: f32 },
    BulletList { items: Vec<String> },
    /// Descriptive statistics of one column; formatted only when presented.
    Statistics { column: String, stats: DescriptiveStats },
}

/// Ordered, immutable report produced by the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    sections: Vec<Section>,
}

impl ReportDocument {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// Heading texts in document order.
    pub fn headings(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Heading { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<&RenderedImage> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Image { image, .. } => Some(image),
                _ => None,
            })
            .collect()
    }

    /// All bullet items, whether from lists or bullet-styled paragraphs.
    pub fn bullets(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for s in &self.sections {
            match s {
                Section::BulletList { items } => out.extend(items.iter().map(String::as_str)),
                Section::Paragraph { text, style: Some(TextStyle::ListBullet) } => out.push(text.as_str()),
                _ => {}
            }
        }
        out
    }
}

/// Append-only builder; the document is sealed by [`DocumentBuilder::finish`].
#[derive(Debug, Default)]
pub(crate) struct DocumentBuilder {
    sections: Vec<Section>,
}

impl DocumentBuilder {
    pub fn heading(&mut self, text: impl Into<String>, level: u8) -> &mut Self {
        self.sections.push(Section::Heading { text: text.into(), level });
        self
    }

    pub fn paragraph(&mut self, text: impl Into<String>, style: Option<TextStyle>) -> &mut Self {
        self.sections.push(Section::Paragraph { text: text.into(), style });
        self
    }

    pub fn image(&mut self, image: RenderedImage, width_inches: f32) -> &mut Self {
        self.sections.push(Section::Image { image, width_inches });
        self
    }

    pub fn bullets(&mut self, items: Vec<String>) -> &mut Self {
        self.sections.push(Section::BulletList { items });
        self
    }

    pub fn statistics(&mut self, column: impl Into<String>, stats: DescriptiveStats) -> &mut Self {
        self.sections.push(Section::Statistics { column: column.into(), stats });
        self
    }

    pub fn finish(self) -> ReportDocument {
        ReportDocument { sections: self.sections }
    }
}
