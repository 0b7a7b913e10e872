use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_COLUMN_WIDTH: u32 = 400;
pub const MIN_COLUMN_WIDTH: u32 = 200;
pub const MAX_COLUMN_WIDTH: u32 = 800;
pub const MIN_SPLIT_PARTS: usize = 2;
pub const MAX_SPLIT_PARTS: usize = 8;
pub const DEFAULT_CATEGORY: &str = "blue";
pub const DEFAULT_BOX_TEXT: &str = "New Box";
pub const DEFAULT_LINE_STYLE: &str = "line-thin";
pub const LINE_STYLES: [&str; 5] = [
    "line-thin",
    "line-medium",
    "line-thick",
    "line-dashed",
    "line-dotted",
];

/// Category map keyed by the value boxes carry in their `type` field.
pub type CategoryMap = BTreeMap<String, Category>;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn one() -> u8 {
    1
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoxWidth {
    #[default]
    #[serde(rename = "full-width")]
    Full,
    #[serde(rename = "half-width")]
    Half,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// What a box shows. Image and divider are exclusive with each other and with text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoxContent {
    #[default]
    Text,
    Image {
        src: String,
    },
    Line {
        style: String,
    },
}

impl BoxContent {
    pub fn is_image(&self) -> bool {
        matches!(self, BoxContent::Image { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, BoxContent::Line { .. })
    }
}

/// Leaf content unit. Named `LayoutBox` to stay clear of `std::boxed::Box`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireBox", into = "WireBox")]
pub struct LayoutBox {
    pub id: String,
    pub text: String,
    pub category: String,
    pub width: BoxWidth,
    pub lines: u8,
    pub base_lines: u8,
    pub dynamic: bool,
    pub text_color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub content: BoxContent,
    pub resized: bool,
    pub height_px: Option<u32>,
}

impl LayoutBox {
    /// Builds a box with a fresh id; fields missing from the patch take their defaults.
    pub fn from_patch(patch: BoxPatch) -> Self {
        let mut created = Self {
            id: new_id(),
            text: DEFAULT_BOX_TEXT.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            width: BoxWidth::Full,
            lines: 1,
            base_lines: 1,
            dynamic: false,
            text_color: None,
            text_align: None,
            content: BoxContent::Text,
            resized: false,
            height_px: None,
        };
        created.apply(patch);
        created
    }

    /// Shallow merge: only the fields present in the patch change.
    pub fn apply(&mut self, patch: BoxPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(lines) = patch.lines {
            self.lines = lines.clamp(1, 3);
        }
        if let Some(base_lines) = patch.base_lines {
            self.base_lines = base_lines.max(1);
        }
        if let Some(dynamic) = patch.dynamic {
            self.dynamic = dynamic;
        }
        if let Some(text_color) = patch.text_color {
            self.text_color = Some(text_color);
        }
        if let Some(text_align) = patch.text_align {
            self.text_align = Some(text_align);
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }
}

/// Partial box used both for creation and for `update_box`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxPatch {
    pub text: Option<String>,
    pub category: Option<String>,
    pub width: Option<BoxWidth>,
    pub lines: Option<u8>,
    pub base_lines: Option<u8>,
    pub dynamic: Option<bool>,
    pub text_color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub content: Option<BoxContent>,
}

impl BoxPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Copies every field of an existing box except its id.
    pub fn from_box(source: &LayoutBox) -> Self {
        Self {
            text: Some(source.text.clone()),
            category: Some(source.category.clone()),
            width: Some(source.width),
            lines: Some(source.lines),
            base_lines: Some(source.base_lines),
            dynamic: Some(source.dynamic),
            text_color: source.text_color.clone(),
            text_align: source.text_align,
            content: Some(source.content.clone()),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBox {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(rename = "type", default = "default_category")]
    category: String,
    #[serde(default)]
    width: BoxWidth,
    #[serde(default = "one")]
    lines: u8,
    #[serde(default = "one")]
    base_lines: u8,
    #[serde(default)]
    dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "is_false")]
    is_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_src: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    is_line: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line_class: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    resized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height_px: Option<u32>,
}

impl From<WireBox> for LayoutBox {
    fn from(wire: WireBox) -> Self {
        // An image without a source cannot render, so the divider wins in that case.
        let content = match (wire.is_image, wire.image_src, wire.is_line) {
            (true, Some(src), _) => BoxContent::Image { src },
            (_, _, true) => BoxContent::Line {
                style: wire
                    .line_class
                    .unwrap_or_else(|| DEFAULT_LINE_STYLE.to_string()),
            },
            _ => BoxContent::Text,
        };
        Self {
            id: wire.id,
            text: wire.text,
            category: wire.category,
            width: wire.width,
            lines: wire.lines.clamp(1, 3),
            base_lines: wire.base_lines.max(1),
            dynamic: wire.dynamic,
            text_color: wire.text_color,
            text_align: wire.text_align,
            content,
            resized: wire.resized,
            height_px: wire.height_px,
        }
    }
}

impl From<LayoutBox> for WireBox {
    fn from(value: LayoutBox) -> Self {
        let (is_image, image_src, is_line, line_class) = match value.content {
            BoxContent::Text => (false, None, false, None),
            BoxContent::Image { src } => (true, Some(src), false, None),
            BoxContent::Line { style } => (false, None, true, Some(style)),
        };
        Self {
            id: value.id,
            text: value.text,
            category: value.category,
            width: value.width,
            lines: value.lines,
            base_lines: value.base_lines,
            dynamic: value.dynamic,
            text_color: value.text_color,
            text_align: value.text_align,
            is_image,
            image_src,
            is_line,
            line_class,
            resized: value.resized,
            height_px: value.height_px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub boxes: Vec<LayoutBox>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            color: None,
            boxes: Vec::new(),
        }
    }

    /// Deep copy with fresh ids for the section and every box.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            title: self.title.clone(),
            color: self.color.clone(),
            boxes: self.boxes.iter().map(LayoutBox::duplicate).collect(),
        }
    }

    pub fn position_of(&self, box_id: &str) -> Option<usize> {
        self.boxes.iter().position(|b| b.id == box_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub color: Option<String>,
}

impl SectionPatch {
    pub fn apply(self, section: &mut Section) {
        if let Some(title) = self.title {
            section.title = title;
        }
        if let Some(color) = self.color {
            section.color = Some(color);
        }
    }
}

/// Section storage of a column: one flat list, or one list per split part.
#[derive(Debug, Clone, PartialEq)]
pub enum Sections {
    Flat(Vec<Section>),
    Split(Vec<Vec<Section>>),
}

impl Default for Sections {
    fn default() -> Self {
        Sections::Flat(Vec::new())
    }
}

impl Sections {
    pub fn is_split(&self) -> bool {
        matches!(self, Sections::Split(_))
    }

    pub fn split_parts(&self) -> usize {
        match self {
            Sections::Flat(_) => 1,
            Sections::Split(parts) => parts.len(),
        }
    }

    /// All sections in concatenation order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Section> + '_> {
        match self {
            Sections::Flat(list) => Box::new(list.iter()),
            Sections::Split(parts) => Box::new(parts.iter().flatten()),
        }
    }

    pub fn total(&self) -> usize {
        match self {
            Sections::Flat(list) => list.len(),
            Sections::Split(parts) => parts.iter().map(Vec::len).sum(),
        }
    }

    pub fn flat(&self) -> Option<&Vec<Section>> {
        match self {
            Sections::Flat(list) => Some(list),
            Sections::Split(_) => None,
        }
    }

    pub fn flat_mut(&mut self) -> Option<&mut Vec<Section>> {
        match self {
            Sections::Flat(list) => Some(list),
            Sections::Split(_) => None,
        }
    }

    pub fn parts(&self) -> Option<&Vec<Vec<Section>>> {
        match self {
            Sections::Split(parts) => Some(parts),
            Sections::Flat(_) => None,
        }
    }

    pub fn parts_mut(&mut self) -> Option<&mut Vec<Vec<Section>>> {
        match self {
            Sections::Split(parts) => Some(parts),
            Sections::Flat(_) => None,
        }
    }

    pub fn into_flat(self) -> Vec<Section> {
        match self {
            Sections::Flat(list) => list,
            Sections::Split(parts) => parts.into_iter().flatten().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireColumn", into = "WireColumn")]
pub struct Column {
    pub id: String,
    pub title: String,
    pub width: u32,
    pub header_color: Option<String>,
    pub sections: Sections,
    pub canvas_position: Option<CanvasPosition>,
    pub hide_column_header: bool,
    pub hide_section_headers: bool,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            width: DEFAULT_COLUMN_WIDTH,
            header_color: None,
            sections: Sections::default(),
            canvas_position: None,
            hide_column_header: false,
            hide_section_headers: false,
        }
    }

    pub fn is_split(&self) -> bool {
        self.sections.is_split()
    }

    pub fn split_parts(&self) -> usize {
        self.sections.split_parts()
    }

    /// `"normal"` or `"split-N"`, as stored in the `splitState` field.
    pub fn split_state(&self) -> String {
        match &self.sections {
            Sections::Flat(_) => "normal".to_string(),
            Sections::Split(parts) => format!("split-{}", parts.len()),
        }
    }

    /// Deep copy with fresh ids at every level.
    pub fn duplicate(&self) -> Self {
        let sections = match &self.sections {
            Sections::Flat(list) => Sections::Flat(list.iter().map(Section::duplicate).collect()),
            Sections::Split(parts) => Sections::Split(
                parts
                    .iter()
                    .map(|part| part.iter().map(Section::duplicate).collect())
                    .collect(),
            ),
        };
        Self {
            id: new_id(),
            sections,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub header_color: Option<String>,
    pub hide_column_header: Option<bool>,
    pub hide_section_headers: Option<bool>,
}

impl ColumnPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn apply(self, column: &mut Column) {
        if let Some(title) = self.title {
            column.title = title;
        }
        if let Some(width) = self.width {
            column.width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        }
        if let Some(color) = self.header_color {
            column.header_color = Some(color);
        }
        if let Some(hide) = self.hide_column_header {
            column.hide_column_header = hide;
        }
        if let Some(hide) = self.hide_section_headers {
            column.hide_section_headers = hide;
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireWidth {
    Text(String),
    Pixels(f64),
}

impl Default for WireWidth {
    fn default() -> Self {
        WireWidth::Pixels(DEFAULT_COLUMN_WIDTH as f64)
    }
}

impl WireWidth {
    fn pixels(&self) -> u32 {
        match self {
            WireWidth::Pixels(px) if *px > 0.0 => px.round() as u32,
            WireWidth::Pixels(_) => DEFAULT_COLUMN_WIDTH,
            WireWidth::Text(text) => text
                .trim()
                .trim_end_matches("px")
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|px| *px > 0.0)
                .map(|px| px.round() as u32)
                .unwrap_or(DEFAULT_COLUMN_WIDTH),
        }
    }
}

// Nested must come first: `[]` and `[[...]]` both parse as nested.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireSections {
    Split(Vec<Vec<Section>>),
    Flat(Vec<Section>),
}

impl Default for WireSections {
    fn default() -> Self {
        WireSections::Flat(Vec::new())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireColumn {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    width: WireWidth,
    #[serde(default)]
    split_state: Option<String>,
    #[serde(default)]
    split_parts: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_color: Option<String>,
    #[serde(default)]
    sections: WireSections,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canvas_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canvas_y: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    hide_column_header: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    hide_section_headers: bool,
}

impl From<WireColumn> for Column {
    fn from(wire: WireColumn) -> Self {
        let declared_parts = wire.split_parts.unwrap_or(1);
        let sections = match wire.sections {
            WireSections::Split(parts)
                if (MIN_SPLIT_PARTS..=MAX_SPLIT_PARTS).contains(&parts.len()) =>
            {
                Sections::Split(parts)
            }
            WireSections::Split(parts) => {
                if !parts.is_empty() {
                    warn!(
                        column = %wire.id,
                        parts = parts.len(),
                        "nested sections with unsupported part count, flattening"
                    );
                }
                Sections::Flat(parts.into_iter().flatten().collect())
            }
            WireSections::Flat(list) => Sections::Flat(list),
        };
        if sections.split_parts() != declared_parts.max(1) && wire.split_parts.is_some() {
            warn!(
                column = %wire.id,
                declared = declared_parts,
                actual = sections.split_parts(),
                state = wire.split_state.as_deref().unwrap_or("normal"),
                "split state disagrees with section shape, using the shape"
            );
        }
        let canvas_position = match (wire.canvas_x, wire.canvas_y) {
            (None, None) => None,
            (x, y) => Some(CanvasPosition {
                x: x.unwrap_or(0.0),
                y: y.unwrap_or(0.0),
            }),
        };
        Self {
            id: wire.id,
            title: wire.title,
            width: wire.width.pixels(),
            header_color: wire.header_color,
            sections,
            canvas_position,
            hide_column_header: wire.hide_column_header,
            hide_section_headers: wire.hide_section_headers,
        }
    }
}

impl From<Column> for WireColumn {
    fn from(column: Column) -> Self {
        let split_state = Some(column.split_state());
        let split_parts = Some(column.split_parts());
        let sections = match column.sections {
            Sections::Flat(list) => WireSections::Flat(list),
            Sections::Split(parts) => WireSections::Split(parts),
        };
        Self {
            id: column.id,
            title: column.title,
            width: WireWidth::Text(format!("{}px", column.width)),
            split_state,
            split_parts,
            header_color: column.header_color,
            sections,
            canvas_x: column.canvas_position.map(|p| p.x),
            canvas_y: column.canvas_position.map(|p| p.y),
            hide_column_header: column.hide_column_header,
            hide_section_headers: column.hide_section_headers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub color1: String,
    pub color2: String,
    pub text_color: String,
}

impl Category {
    pub fn new(name: &str, color1: &str, color2: &str, text_color: &str) -> Self {
        Self {
            name: name.to_string(),
            color1: color1.to_string(),
            color2: color2.to_string(),
            text_color: text_color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 8] = [
        Anchor::Top,
        Anchor::Bottom,
        Anchor::Left,
        Anchor::Right,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    pub from_column_id: String,
    pub to_column_id: String,
    pub from_anchor: Anchor,
    pub to_anchor: Anchor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// Serializable canvas settings, the `canvas` member of export documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    #[serde(default)]
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default)]
    pub snap_to_grid: bool,
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

fn default_grid_size() -> u32 {
    40
}
