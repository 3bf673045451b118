use crate::format::rjust;
use crate::map::MetricMap;
use crate::metric::{Header, Metric};
use crate::style::Palette;
use crate::value::Value;
use crate::Result;
use std::any::Any;

/// Named child metrics rendered as adjacent columns under one shared title.
///
/// The children's titles form the subtitle row; the group is as wide as its
/// children plus one separator between each pair.
#[derive(Debug)]
pub struct MetricGroup {
    header: Header,
    children: MetricMap,
}

impl MetricGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            header: Header::new(title, 0),
            children: MetricMap::new(),
        }
    }

    /// Builder form of [`MetricGroup::insert`].
    pub fn with(mut self, name: impl Into<String>, metric: impl Metric + 'static) -> Self {
        self.children.insert(name, metric);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, metric: impl Metric + 'static) {
        self.children.insert(name, metric);
    }

    pub fn children(&self) -> &MetricMap {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut MetricMap {
        &mut self.children
    }

    pub fn get(&self, name: &str) -> Option<&dyn Metric> {
        self.children.get(name)
    }

    pub fn get_as_mut<T: Metric + 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.children.get_as_mut(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.children.set(name, value)
    }

    pub fn accumulate_child(&mut self, name: &str, delta: impl Into<Value>) -> Result<()> {
        self.children.accumulate(name, delta)
    }

    pub(crate) fn child_value(&self, name: &str) -> Value {
        self.children
            .get(name)
            .map(|metric| metric.value())
            .unwrap_or_default()
    }
}

impl Metric for MetricGroup {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn value(&self) -> Value {
        Value::Unset
    }

    fn display(&self) -> String {
        " ".to_string()
    }

    fn render_subtitle(&mut self, palette: &Palette) -> String {
        if let Some(cached) = self.header.cached_subtitle() {
            return cached.to_string();
        }

        let mut cells = Vec::with_capacity(self.children.len());
        let mut width = 0;
        for child in self.children.values_mut() {
            let column = child.width().max(child.title().chars().count());
            cells.push(palette.subtitle(&rjust(child.title(), column)));
            child.header_mut().set_width(column);
            width += column;
        }

        let separators = self.children.len().saturating_sub(1);
        self.header.set_width(width + separators);
        self.header.cache_subtitle(cells.join(" "))
    }

    fn cell_text(&self) -> String {
        self.children
            .values()
            .map(|child| child.cell_text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_cell(&mut self, commit: bool, palette: &Palette) -> String {
        self.children
            .values()
            .map(|child| palette.value(commit, &child.cell_text()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn as_group(&self) -> Option<&MetricGroup> {
        Some(self)
    }

    fn as_group_mut(&mut self) -> Option<&mut MetricGroup> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    fn random_group() -> MetricGroup {
        MetricGroup::new("random")
            .with("a", Scalar::integer("a"))
            .with("b", Scalar::integer("b"))
            .with("c", Scalar::integer("c"))
    }

    #[test]
    fn test_subtitle_lists_children() {
        let mut group = random_group();
        let subtitle = group.render_subtitle(&Palette::plain());
        assert_eq!(subtitle, "      a       b       c");
        assert_eq!(group.width(), 23);
    }

    #[test]
    fn test_title_spans_children() {
        let mut group = random_group();
        let title = group.render_title(&Palette::plain());
        assert_eq!(title.len(), 23);
        assert!(title.contains("random"));
        assert!(title.starts_with("--------"));
    }

    #[test]
    fn test_child_widens_to_its_title() {
        let mut group = MetricGroup::new("cache").with("evictions", Scalar::float("evictions"));
        group.render_subtitle(&Palette::plain());
        assert_eq!(group.get("evictions").unwrap().width(), 9);
        assert_eq!(group.width(), 9);
    }

    #[test]
    fn test_cells_join_children() {
        let mut group = random_group();
        group.render_subtitle(&Palette::plain());
        group.set("a", 1).unwrap();
        group.set("b", 22).unwrap();
        group.accumulate_child("c", 333).unwrap();
        assert_eq!(
            group.render_cell(true, &Palette::plain()),
            "      1      22     333"
        );
    }

    #[test]
    fn test_group_rejects_scalar_assignment() {
        let mut group = random_group();
        assert!(group.accumulate(Value::Int(1)).is_err());
        assert!(group.set_value(Value::Int(1)).is_err());
    }
}
