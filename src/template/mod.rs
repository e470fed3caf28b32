//! Page templates and their resolution into pixel geometry

use crate::error::ConfigError;
use crate::units::{Length, Unit, DEFAULT_FONT_PX};
use serde::{Deserialize, Serialize};

/// Content height used for reflowable templates, large enough that every
/// realistic document fits on one virtual page
pub const VIRTUAL_CONTENT_HEIGHT: f32 = 1_000_000.0;

/// Content width used when the template width itself is reflowable
/// (US Letter with 1in margins)
pub const DEFAULT_REFLOW_WIDTH: f32 = 816.0 - 2.0 * 96.0;

/// Visual gap between stacked pages when a template does not name one
pub const DEFAULT_PAGE_GAP: &str = "24px";

/// Header or footer reservation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub enabled: bool,
    pub height: String,
}

impl Band {
    pub fn new(height: impl Into<String>) -> Self {
        Self {
            enabled: true,
            height: height.into(),
        }
    }

    /// Reserved height, zero when disabled
    fn reserved_px(&self, font_px: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        Length::parse(&self.height, Unit::Pixel).to_px(font_px).max(0.0)
    }
}

/// Body typography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    /// Bare numbers are points
    pub font_size: String,
    /// Bare numbers are multiples of the font size
    pub line_height: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "serif".to_string(),
            font_size: "12pt".to_string(),
            line_height: "1.5".to_string(),
        }
    }
}

impl Typography {
    /// Font size in pixels
    pub fn font_px(&self) -> f32 {
        let px = Length::parse(&self.font_size, Unit::Point).to_px(DEFAULT_FONT_PX);
        if px > 0.0 {
            px
        } else {
            DEFAULT_FONT_PX
        }
    }

    /// Line height in pixels
    pub fn line_height_px(&self) -> f32 {
        let font_px = self.font_px();
        let px = Length::parse(&self.line_height, Unit::Em).to_px(font_px);
        if px > 0.0 {
            px
        } else {
            font_px
        }
    }
}

/// A named page template, in mixed physical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTemplate {
    pub name: String,
    pub width: String,
    pub height: String,
    pub margin_top: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub margin_right: String,
    #[serde(default)]
    pub header: Band,
    #[serde(default)]
    pub footer: Band,
    #[serde(default)]
    pub page_gap: Option<String>,
    #[serde(default)]
    pub typography: Typography,
}

impl PageTemplate {
    /// Template with uniform margins and no header/footer
    pub fn new(
        name: impl Into<String>,
        width: impl Into<String>,
        height: impl Into<String>,
        margin: &str,
    ) -> Self {
        Self {
            name: name.into(),
            width: width.into(),
            height: height.into(),
            margin_top: margin.to_string(),
            margin_bottom: margin.to_string(),
            margin_left: margin.to_string(),
            margin_right: margin.to_string(),
            header: Band::default(),
            footer: Band::default(),
            page_gap: None,
            typography: Typography::default(),
        }
    }

    pub fn with_header(mut self, height: &str) -> Self {
        self.header = Band::new(height);
        self
    }

    pub fn with_footer(mut self, height: &str) -> Self {
        self.footer = Band::new(height);
        self
    }

    pub fn with_typography(mut self, typography: Typography) -> Self {
        self.typography = typography;
        self
    }

    /// Whether this template has no fixed page size
    pub fn is_reflowable(&self) -> bool {
        Length::parse(&self.width, Unit::Pixel).is_reflow()
            || Length::parse(&self.height, Unit::Pixel).is_reflow()
    }

    /// Resolve with the default page gap
    pub fn geometry(&self) -> CanonicalGeometry {
        resolve(self, DEFAULT_PAGE_GAP)
    }
}

/// Pixel-space geometry derived from a [`PageTemplate`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub content_width: f32,
    /// Usable height per page after margins and header/footer
    pub content_height: f32,
    pub page_gap: f32,
    /// Margin top plus header band
    pub content_top_offset: f32,
    /// Margin bottom plus footer band
    pub content_bottom_offset: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub header_height: f32,
    pub footer_height: f32,
    pub font_size: f32,
    pub line_height: f32,
    /// Pagination disabled; previews and exporters skip page chrome
    pub reflowable: bool,
}

impl CanonicalGeometry {
    /// Vertical travel from the end of one page's content area to the start
    /// of the next one's
    pub fn inter_page_space(&self) -> f32 {
        self.content_bottom_offset + self.page_gap + self.content_top_offset
    }

    /// Distance between the tops of consecutive pages in the continuous view
    pub fn page_stride(&self) -> f32 {
        self.page_height + self.page_gap
    }
}

/// Derive canonical geometry. `fallback_gap` applies when the template
/// does not set its own page gap.
pub fn resolve(template: &PageTemplate, fallback_gap: &str) -> CanonicalGeometry {
    let font_px = template.typography.font_px();
    let line_height = template.typography.line_height_px();
    let px = |s: &str| Length::parse(s, Unit::Pixel).to_px(font_px);

    let width = Length::parse(&template.width, Unit::Pixel);
    let height = Length::parse(&template.height, Unit::Pixel);

    let margin_left = px(&template.margin_left).max(0.0);
    let margin_right = px(&template.margin_right).max(0.0);

    let content_width = if width.is_reflow() {
        DEFAULT_REFLOW_WIDTH
    } else {
        let w = width.to_px(font_px) - margin_left - margin_right;
        if !w.is_finite() || w <= 0.0 {
            log::warn!(
                "Template {:?} leaves no content width, clamping to one em",
                template.name
            );
            font_px
        } else {
            w
        }
    };

    if width.is_reflow() || height.is_reflow() {
        log::debug!("Template {:?} is reflowable, pagination disabled", template.name);
        return CanonicalGeometry {
            page_width: if width.is_reflow() {
                content_width
            } else {
                width.to_px(font_px)
            },
            page_height: VIRTUAL_CONTENT_HEIGHT,
            content_width,
            content_height: VIRTUAL_CONTENT_HEIGHT,
            page_gap: 0.0,
            content_top_offset: 0.0,
            content_bottom_offset: 0.0,
            margin_left,
            margin_right,
            header_height: 0.0,
            footer_height: 0.0,
            font_size: font_px,
            line_height,
            reflowable: true,
        };
    }

    let page_height = height.to_px(font_px);
    let margin_top = px(&template.margin_top).max(0.0);
    let margin_bottom = px(&template.margin_bottom).max(0.0);
    let header_height = template.header.reserved_px(font_px);
    let footer_height = template.footer.reserved_px(font_px);
    let gap = template.page_gap.as_deref().unwrap_or(fallback_gap);

    let mut content_height =
        page_height - margin_top - margin_bottom - header_height - footer_height;
    if !content_height.is_finite() || content_height <= 0.0 {
        log::warn!(
            "Template {:?} leaves {} px of content height, clamping to one line",
            template.name,
            content_height
        );
        content_height = line_height;
    }

    CanonicalGeometry {
        page_width: width.to_px(font_px),
        page_height,
        content_width,
        content_height,
        page_gap: px(gap).max(0.0),
        content_top_offset: margin_top + header_height,
        content_bottom_offset: margin_bottom + footer_height,
        margin_left,
        margin_right,
        header_height,
        footer_height,
        font_size: font_px,
        line_height,
        reflowable: false,
    }
}

/// Named templates available to the editor
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<PageTemplate>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    /// The stock page sizes
    pub fn builtin() -> Self {
        let manuscript = PageTemplate::new("manuscript", "6in", "9in", "0.75in")
            .with_header("0.4in")
            .with_footer("0.4in")
            .with_typography(Typography {
                font_family: "Garamond".to_string(),
                font_size: "11pt".to_string(),
                line_height: "1.4".to_string(),
            });

        let mut web = PageTemplate::new("web", "100%", "auto", "0");
        web.typography.font_family = "sans-serif".to_string();

        Self {
            templates: vec![
                PageTemplate::new("a4", "210mm", "297mm", "25.4mm"),
                PageTemplate::new("a5", "148mm", "210mm", "20mm"),
                PageTemplate::new("letter", "8.5in", "11in", "1in"),
                PageTemplate::new("legal", "8.5in", "14in", "1in"),
                manuscript,
                web,
            ],
        }
    }

    /// Built-ins extended (or overridden by name) with templates from a JSON
    /// array
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let extra: Vec<PageTemplate> = serde_json::from_str(json)?;
        let mut catalog = Self::builtin();
        for template in extra {
            catalog.insert(template);
        }
        Ok(catalog)
    }

    /// Add a template, replacing any with the same name
    pub fn insert(&mut self, template: PageTemplate) {
        match self
            .templates
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(&template.name))
        {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    /// Look up a template by name (case-insensitive)
    pub fn get(&self, name: &str) -> Result<&PageTemplate, ConfigError> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }
}
