use crate::errors::StoreError;
use crate::model::{Category, CategoryMap};
use serde::{Deserialize, Serialize};

const FALLBACK_COLOR1: &str = "#95a5a6";
const FALLBACK_COLOR2: &str = "#7f8c8d";
const FALLBACK_TEXT_COLOR: &str = "#ffffff";

/// The ten built-in categories.
pub fn default_categories() -> CategoryMap {
    [
        ("blue", Category::new("Blau", "#3498db", "#2980b9", "#ffffff")),
        ("green", Category::new("Grün", "#2ecc71", "#27ae60", "#ffffff")),
        ("red", Category::new("Rot", "#e74c3c", "#c0392b", "#ffffff")),
        ("yellow", Category::new("Gelb", "#f1c40f", "#f39c12", "#000000")),
        ("purple", Category::new("Lila", "#9b59b6", "#8e44ad", "#ffffff")),
        ("orange", Category::new("Orange", "#e67e22", "#d35400", "#ffffff")),
        ("gray", Category::new("Grau", "#95a5a6", "#7f8c8d", "#ffffff")),
        ("brown", Category::new("Braun", "#8B4513", "#A0522D", "#ffffff")),
        ("pink", Category::new("Rosa", "#ff6b9d", "#c44569", "#ffffff")),
        ("cyan", Category::new("Cyan", "#00d2d3", "#00a0a0", "#ffffff")),
    ]
    .into_iter()
    .map(|(key, category)| (key.to_string(), category))
    .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color1: Option<String>,
    pub color2: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryStore {
    pub categories: CategoryMap,
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn add(&mut self, key: &str, category: Category) -> Result<(), StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::BlankName);
        }
        self.categories.insert(key.to_string(), category);
        Ok(())
    }

    /// Merges the patch into the category. A missing key is created from the
    /// neutral gray look, named after the key.
    pub fn update(&mut self, key: &str, patch: CategoryPatch) {
        let entry = self.categories.entry(key.to_string()).or_insert_with(|| {
            Category::new(key, FALLBACK_COLOR1, FALLBACK_COLOR2, FALLBACK_TEXT_COLOR)
        });
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(color) = patch.color1 {
            entry.color1 = color;
        }
        if let Some(color) = patch.color2 {
            entry.color2 = color;
        }
        if let Some(color) = patch.text_color {
            entry.text_color = color;
        }
    }

    /// A key for a new category called `name`: the lowercased name with
    /// everything but letters and digits turned into `-`, numbered when taken.
    pub fn key_for(&self, name: &str) -> String {
        let slug: String = name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect();
        let slug = slug.trim_matches('-');
        let base = if slug.is_empty() { "custom" } else { slug };
        let mut key = base.to_string();
        let mut n = 2;
        while self.categories.contains_key(&key) {
            key = format!("{base}-{n}");
            n += 1;
        }
        key
    }

    pub fn delete(&mut self, key: &str) -> Result<Category, StoreError> {
        self.categories
            .remove(key)
            .ok_or_else(|| StoreError::CategoryNotFound(key.to_string()))
    }

    pub fn reset(&mut self) {
        self.categories = default_categories();
    }

    pub fn load(&mut self, categories: CategoryMap) {
        self.categories = categories;
    }

    /// CSS gradient for a category, gray when the key is unknown.
    pub fn gradient(&self, key: &str) -> String {
        let (c1, c2) = self
            .categories
            .get(key)
            .map_or((FALLBACK_COLOR1, FALLBACK_COLOR2), |c| {
                (c.color1.as_str(), c.color2.as_str())
            });
        format!("linear-gradient(135deg, {c1} 0%, {c2} 100%)")
    }

    pub fn text_color(&self, key: &str) -> &str {
        self.categories
            .get(key)
            .map_or(FALLBACK_TEXT_COLOR, |c| c.text_color.as_str())
    }

    /// Primary color of a category, parsed from `#rrggbb`.
    pub fn rgb(&self, key: &str) -> (u8, u8, u8) {
        let hex = self
            .categories
            .get(key)
            .map_or(FALLBACK_COLOR1, |c| c.color1.as_str());
        parse_hex(hex).unwrap_or((0x95, 0xa5, 0xa6))
    }
}

/// Parses `name #color1 #color2 [#textcolor]`. The name may contain spaces;
/// the text color defaults to white.
pub fn parse_category(input: &str) -> Result<Category, StoreError> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let colors = words.iter().rev().take_while(|w| w.starts_with('#')).count().min(3);
    let (name, colors) = words.split_at(words.len() - colors);
    let name = name.join(" ");
    if name.is_empty() {
        return Err(StoreError::BlankName);
    }
    if let Some(bad) = colors.iter().find(|c| parse_hex(c).is_none()) {
        return Err(StoreError::InvalidColor(bad.to_string()));
    }
    match colors {
        [c1, c2] => Ok(Category::new(&name, c1, c2, FALLBACK_TEXT_COLOR)),
        [c1, c2, text] => Ok(Category::new(&name, c1, c2, text)),
        _ => Err(StoreError::InvalidColor(input.trim().to_string())),
    }
}

/// The prompt form read by `parse_category`.
pub fn describe_category(category: &Category) -> String {
    format!(
        "{} {} {} {}",
        category.name, category.color1, category.color2, category.text_color
    )
}

/// Checks a `#rrggbb` color typed by the user.
pub fn check_color(color: &str) -> Result<String, StoreError> {
    let color = color.trim();
    parse_hex(color)
        .map(|_| color.to_string())
        .ok_or_else(|| StoreError::InvalidColor(color.to_string()))
}

pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
