//! Counting aid rendering.
//!
//! Pools sit side by side above the accumulator. Every shape is one glyph in
//! a two-cell slot, stacked bottom-up in columns of five, with an extra gap
//! after each pair of columns so tens stand out. While drawing, the
//! interactive regions are recorded into a [`HitMap`] for the input layer.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use tally_engine::manipulator::{
    COLUMN_HEIGHT, Column, GestureTarget, PayloadKind, PoolLabel, Session, ShapeId,
};
use tally_engine::{HitMap, Region};

use crate::theme::{Glyphs, Palette, styles};

/// Width of one shape slot.
const SLOT_WIDTH: u16 = 2;
/// Pool boxes never get narrower than this, so "moved" fits.
const MIN_POOL_INNER: u16 = 5;
const STACK_HEIGHT: u16 = COLUMN_HEIGHT as u16;
/// Pools row (boxed), arrow row, accumulator row (boxed).
pub(crate) const MANIPULATOR_HEIGHT: u16 = (STACK_HEIGHT + 2) * 2 + 1;

/// Per-frame render inputs that are not part of the session.
pub(crate) struct AidView<'a> {
    pub palette: &'a Palette,
    pub glyphs: &'a Glyphs,
    /// Shape highlighted for keyboard activation.
    pub selected: Option<ShapeId>,
}

/// Saturates at `u16::MAX`; such a stack never fits and takes the
/// too-small fallback.
fn stack_width(columns: &[Column<'_>]) -> u16 {
    column_offsets(columns)
        .last()
        .map_or(0, |last| last.saturating_add(SLOT_WIDTH))
}

/// x offset of each column within a stack.
fn column_offsets(columns: &[Column<'_>]) -> Vec<u16> {
    let mut x = 0u16;
    columns
        .iter()
        .map(|column| {
            let at = x;
            x = x.saturating_add(SLOT_WIDTH + u16::from(column.closes_ten()));
            at
        })
        .collect()
}

/// Draw the counting aid into `area`. Returns `false` (and records nothing)
/// when the area cannot fit it.
pub(crate) fn draw_manipulator(
    frame: &mut Frame,
    session: &Session,
    area: Rect,
    view: &AidView<'_>,
    hit_map: &mut HitMap,
) -> bool {
    let palette = view.palette;
    let arrangement = session.arrangement();
    let gesture = session.gesture();
    let payload = gesture.payload().map(|payload| payload.kind());

    let mut pools: Vec<(PoolLabel, &[Column<'_>])> = vec![
        (PoolLabel::Primary, arrangement.primary.as_slice()),
        (PoolLabel::Secondary, arrangement.secondary.as_slice()),
    ];
    if let Some(tertiary) = &arrangement.tertiary {
        pools.push((PoolLabel::Tertiary, tertiary.as_slice()));
    }

    let plus_width = view.glyphs.plus.width() as u16 + 2;
    let box_widths: Vec<u16> = pools
        .iter()
        .map(|(_, columns)| stack_width(columns).max(MIN_POOL_INNER).saturating_add(2))
        .collect();
    let pools_width = box_widths
        .iter()
        .fold(0u16, |total, width| total.saturating_add(*width))
        .saturating_add(plus_width * (pools.len() as u16).saturating_sub(1));
    let acc_width = stack_width(&arrangement.accumulator)
        .max(MIN_POOL_INNER + 8)
        .saturating_add(2);

    if area.height < MANIPULATOR_HEIGHT || area.width < pools_width.max(acc_width) {
        let message = Paragraph::new(Line::from(Span::styled(
            "Make the window bigger to use the counting aid",
            Style::default().fg(palette.text_muted),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(message, area);
        return false;
    }

    // Pools row, centered.
    let pool_height = STACK_HEIGHT + 2;
    let mut x = area.x + (area.width - pools_width) / 2;
    let addends = session.addends();
    for (i, ((pool, columns), width)) in pools.iter().zip(&box_widths).enumerate() {
        if i > 0 {
            let plus = Rect::new(x, area.y + pool_height / 2, plus_width, 1);
            frame.render_widget(
                Paragraph::new(view.glyphs.plus)
                    .alignment(Alignment::Center)
                    .style(styles::title(palette)),
                plus,
            );
            x += plus_width;
        }
        let rect = Rect::new(x, area.y, *width, pool_height);
        let count = addends.count(*pool).unwrap_or(0);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::border(palette))
            .title(Span::styled(
                format!(" {count} "),
                Style::default().fg(palette.text_secondary),
            ));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        if columns.is_empty() && count > 0 {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "moved",
                    Style::default().fg(palette.text_muted),
                ))
                .alignment(Alignment::Center),
                Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1),
            );
        }

        let group_dragged = matches!(payload, Some(PayloadKind::Group));
        draw_stack(frame.buffer_mut(), columns, inner, view, |id| {
            if *pool == PoolLabel::Primary {
                group_dragged
            } else {
                payload == Some(PayloadKind::Single(id))
            }
        });

        if *pool == PoolLabel::Primary {
            hit_map.push_target(region(rect), GestureTarget::PrimaryGroup);
        } else {
            record_shapes(hit_map, columns, inner);
        }
        x += width;
    }

    // Arrow row.
    let arrow = Rect::new(area.x, area.y + pool_height, area.width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            view.glyphs.arrow_down,
            Style::default().fg(palette.text_muted),
        ))
        .alignment(Alignment::Center),
        arrow,
    );

    // Accumulator.
    let acc_rect = Rect::new(
        area.x + (area.width - acc_width) / 2,
        area.y + pool_height + 1,
        acc_width,
        pool_height,
    );
    let border_style = if gesture.is_hovering_drop_target() {
        styles::drop_highlight(palette)
    } else {
        Style::default().fg(palette.primary)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(
            format!(" Total: {} ", session.total()),
            styles::title(palette),
        ));
    let inner = block.inner(acc_rect);
    frame.render_widget(block, acc_rect);
    draw_stack(
        frame.buffer_mut(),
        &arrangement.accumulator,
        inner,
        view,
        |_| false,
    );
    hit_map.set_drop_target(region(acc_rect));
    true
}

fn draw_stack(
    buf: &mut Buffer,
    columns: &[Column<'_>],
    inner: Rect,
    view: &AidView<'_>,
    is_dragged: impl Fn(ShapeId) -> bool,
) {
    let offset = (inner.width.saturating_sub(stack_width(columns))) / 2;
    for (column, dx) in columns.iter().zip(column_offsets(columns)) {
        for (k, shape) in column.shapes.iter().enumerate() {
            let x = inner.x + offset + dx;
            let y = inner.bottom() - 1 - k as u16;
            let mut style = Style::default().fg(view.palette.shape(shape.visual_tag()));
            if is_dragged(shape.id()) {
                style = style.add_modifier(Modifier::DIM);
            }
            if view.selected == Some(shape.id()) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            buf.set_string(x, y, view.glyphs.shape, style);
        }
    }
}

fn record_shapes(hit_map: &mut HitMap, columns: &[Column<'_>], inner: Rect) {
    let offset = (inner.width.saturating_sub(stack_width(columns))) / 2;
    for (column, dx) in columns.iter().zip(column_offsets(columns)) {
        for (k, shape) in column.shapes.iter().enumerate() {
            let slot = Region::new(
                inner.x + offset + dx,
                inner.bottom() - 1 - k as u16,
                SLOT_WIDTH,
                1,
            );
            hit_map.push_target(slot, GestureTarget::Shape(shape.id()));
        }
    }
}

fn region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}
