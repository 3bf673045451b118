use crate::format::{center, rjust};
use crate::group::MetricGroup;
use crate::style::Palette;
use crate::value::{Value, ValueKind};
use crate::{Error, Result};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

/// Title, subtitle and column width of a metric, with the rendered header
/// cells cached once computed.
///
/// The width only grows while the subtitle is resolved; after that the cached
/// cells pin the column for the rest of the run.
#[derive(Debug, Clone)]
pub struct Header {
    title: String,
    subtitle: String,
    width: usize,
    rendered_title: Option<String>,
    rendered_subtitle: Option<String>,
}

impl Header {
    pub fn new(title: impl Into<String>, width: usize) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            width,
            rendered_title: None,
            rendered_subtitle: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        self.subtitle = subtitle.into();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn subtitle_rendered(&self) -> bool {
        self.rendered_subtitle.is_some()
    }

    pub fn cached_subtitle(&self) -> Option<&str> {
        self.rendered_subtitle.as_deref()
    }

    pub(crate) fn cache_subtitle(&mut self, rendered: String) -> String {
        self.rendered_subtitle = Some(rendered.clone());
        rendered
    }

    /// Right-justified subtitle cell. Resolves the column width on first call.
    pub fn render_subtitle(&mut self, palette: &Palette) -> String {
        if let Some(cached) = &self.rendered_subtitle {
            return cached.clone();
        }

        let subtitle_len = self.subtitle.chars().count();
        let title_len = self.title.chars().count();
        self.width = self.width.max(subtitle_len).max(title_len + 2);

        let rendered = palette.subtitle(&rjust(&self.subtitle, self.width));
        self.cache_subtitle(rendered)
    }

    /// Centered title cell, dash-filled to the column width.
    ///
    /// Callers resolve the width through the subtitle first.
    pub fn render_title(&mut self, palette: &Palette) -> String {
        if let Some(cached) = &self.rendered_title {
            return cached.clone();
        }

        let rendered = palette.title(&center(&self.title, self.width, '-'));
        self.rendered_title = Some(rendered.clone());
        rendered
    }
}

/// A renderable, accumulable table cell.
pub trait Metric: fmt::Debug {
    fn header(&self) -> &Header;

    fn header_mut(&mut self) -> &mut Header;

    fn value(&self) -> Value;

    /// Console form of the value, a single blank when unset.
    fn display(&self) -> String;

    /// Type assignments are coerced into; `None` rejects assignment.
    fn value_kind(&self) -> Option<ValueKind> {
        None
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        Err(unsupported(self.title(), value))
    }

    fn accumulate(&mut self, delta: Value) -> Result<()> {
        Err(unsupported(self.title(), delta))
    }

    fn deaccumulate(&mut self, delta: Value) -> Result<()> {
        Err(unsupported(self.title(), delta))
    }

    /// Value as written to the CSV row.
    fn to_persisted(&self) -> String {
        self.display()
    }

    /// Called after a committed line has been written.
    fn reset(&mut self) {}

    fn title(&self) -> &str {
        self.header().title()
    }

    fn subtitle(&self) -> &str {
        self.header().subtitle()
    }

    fn width(&self) -> usize {
        self.header().width()
    }

    fn render_subtitle(&mut self, palette: &Palette) -> String {
        self.header_mut().render_subtitle(palette)
    }

    fn render_title(&mut self, palette: &Palette) -> String {
        if !self.header().subtitle_rendered() {
            self.render_subtitle(palette);
        }
        self.header_mut().render_title(palette)
    }

    /// Value right-justified to the column width, unstyled.
    fn cell_text(&self) -> String {
        rjust(&self.display(), self.width())
    }

    fn render_cell(&mut self, commit: bool, palette: &Palette) -> String {
        palette.value(commit, &self.cell_text())
    }

    /// Compares the current value only; metric type and identity are ignored.
    fn compare(&self, other: &Value) -> Option<Ordering> {
        self.value().partial_cmp(other)
    }

    fn as_group(&self) -> Option<&MetricGroup> {
        None
    }

    fn as_group_mut(&mut self) -> Option<&mut MetricGroup> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub(crate) fn unsupported(metric: &str, value: Value) -> Error {
    Error::UnsupportedValue {
        metric: metric.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_widens_to_title() {
        let mut header = Header::new("requests", 7);
        let subtitle = header.render_subtitle(&Palette::plain());
        assert_eq!(header.width(), 10);
        assert_eq!(subtitle, " ".repeat(10));
    }

    #[test]
    fn test_subtitle_keeps_wider_default() {
        let mut header = Header::new("rx", 7);
        header.set_subtitle("bytes");
        let subtitle = header.render_subtitle(&Palette::plain());
        assert_eq!(header.width(), 7);
        assert_eq!(subtitle, "  bytes");
    }

    #[test]
    fn test_rendered_header_is_cached() {
        let palette = Palette::plain();
        let mut header = Header::new("count", 7);
        header.render_subtitle(&palette);
        let title = header.render_title(&palette);
        assert_eq!(title, "-count-");

        header.set_width(20);
        assert_eq!(header.render_title(&palette), title);
        assert_eq!(header.render_subtitle(&palette), " ".repeat(7));
    }
}
