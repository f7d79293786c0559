use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Widget as _},
};

use crate::models::Avatar;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: &str = "\u{2580}";

/// Rectangle in terminal cells, corners inclusive of `(x0, y0)` and exclusive
/// of `(x1, y1)`. Corners are normalized so either diagonal may be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl CellRect {
    pub fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// The part of this rectangle that lies inside the viewport
    pub fn clip(&self, viewport: Rect) -> Rect {
        let rect = Rect::new(self.x0, self.y0, self.x1 - self.x0, self.y1 - self.y0);
        rect.intersection(viewport)
    }
}

/// A positioned, titled element produced for a single render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub title: String,
    pub rect: CellRect,
    pub kind: WidgetKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    Text(Text<'static>),
    Image(Avatar),
    List { rows: Vec<String> },
    Gauge { percent: u16, label: String },
}

impl Widget {
    pub fn new(title: impl Into<String>, rect: CellRect, kind: WidgetKind) -> Self {
        Self {
            title: title.into(),
            rect,
            kind,
        }
    }
}

/// Paint a widget into the buffer, clipped to the viewport
pub fn render(widget: &Widget, viewport: Rect, buf: &mut Buffer) {
    let area = widget.rect.clip(viewport);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(widget.title.clone());

    match &widget.kind {
        WidgetKind::Text(text) => render_text(area, buf, block, text),
        WidgetKind::Image(avatar) => render_image(area, buf, block, avatar),
        WidgetKind::List { rows } => render_list(area, buf, block, rows),
        WidgetKind::Gauge { percent, label } => render_gauge(area, buf, block, *percent, label),
    }
}

fn render_text(area: Rect, buf: &mut Buffer, block: Block, text: &Text<'static>) {
    Paragraph::new(text.clone()).block(block).render(area, buf);
}

fn render_list(area: Rect, buf: &mut Buffer, block: Block, rows: &[String]) {
    let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row.as_str())).collect();

    List::new(items)
        .style(Style::default().fg(Color::Yellow))
        .block(block)
        .render(area, buf);
}

fn render_gauge(area: Rect, buf: &mut Buffer, block: Block, percent: u16, label: &str) {
    Gauge::default()
        .block(block.border_style(Style::default().fg(Color::White)))
        .gauge_style(Style::default().fg(Color::Yellow))
        .percent(percent.min(100))
        .label(Span::styled(label.to_string(), Style::default().fg(Color::Blue)))
        .render(area, buf);
}

/// Draw the avatar with half blocks, two pixels per cell
fn render_image(area: Rect, buf: &mut Buffer, block: Block, avatar: &Avatar) {
    let inner = block.inner(area);
    block.render(area, buf);

    if avatar.is_empty() || inner.width == 0 || inner.height == 0 {
        return;
    }

    let rows = f64::from(inner.height) * 2.0;
    let cols = f64::from(inner.width);

    for cy in 0..inner.height {
        for cx in 0..inner.width {
            let fx = f64::from(cx) / cols;
            let top = avatar.sample(fx, f64::from(cy * 2) / rows);
            let bottom = avatar.sample(fx, f64::from(cy * 2 + 1) / rows);

            if let (Some(top), Some(bottom)) = (top, bottom) {
                buf[(inner.x + cx, inner.y + cy)]
                    .set_symbol(HALF_BLOCK)
                    .set_fg(Color::Rgb(top[0], top[1], top[2]))
                    .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
        }
    }
}
