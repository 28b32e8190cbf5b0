//! TUI rendering for tally using ratatui.

mod effects;
mod input;
mod manipulator;
mod theme;

pub use effects::apply_effect;
pub use input::{InputPump, apply_event, handle_events, handle_mouse};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table},
};
use tally_engine::{
    App, CellMark, Feedback, GRID_CELLS, GRID_SIZE, GridDrillState, HitMap, Modal, Player,
    PracticeState, PracticeView, Screen, SelectState, ordered_headers, required_exp, table_sum,
};

use self::manipulator::{AidView, MANIPULATOR_HEIGHT, draw_manipulator};

const EXP_BAR_WIDTH: usize = 12;
/// Width of one sum sheet column.
const SHEET_CELL: u16 = 4;

/// Main draw function. Rebuilds the hit map from what ends up on screen.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let elapsed = app.frame_elapsed();
    let view = app.view_mut();
    for slot in [&mut view.modal_effect, &mut view.answer_effect] {
        let finished = slot.as_mut().is_some_and(|effect| {
            effect.advance(elapsed);
            effect.is_finished()
        });
        if finished {
            *slot = None;
        }
    }

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let mut hit_map = HitMap::default();
    match app.screen() {
        Screen::PlayerSelect(state) => draw_player_select(frame, app, state, &palette, &glyphs),
        Screen::Practice(state) => {
            draw_practice(frame, app, state, &palette, &glyphs, &mut hit_map);
        }
        Screen::Table { round } => draw_sum_table(frame, app, round, &palette, &glyphs),
        Screen::GridDrill { round, drill } => {
            draw_grid_drill(frame, app, round, drill, &palette, &glyphs);
        }
    }

    if let Some(modal) = app.modal() {
        draw_modal(frame, app, modal, &palette, &glyphs);
        // Nothing under a modal is interactive.
        hit_map.clear();
    }
    app.view_mut().hit_map = hit_map;
}

fn key_hints(palette: &Palette, hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {label}  "), styles::key_hint(palette)));
    }
    Line::from(spans)
}

fn avatar(player: &Player, glyphs: &Glyphs) -> String {
    if glyphs.avatars {
        format!("{} ", player.avatar)
    } else {
        String::new()
    }
}

fn exp_bar(player: &Player, glyphs: &Glyphs) -> String {
    let filled = ((player.level_progress() * EXP_BAR_WIDTH as f64).round() as usize)
        .min(EXP_BAR_WIDTH);
    format!(
        "{}{}",
        glyphs.bar_full.repeat(filled),
        glyphs.bar_empty.repeat(EXP_BAR_WIDTH - filled)
    )
}

// ============================================================================
// Player select
// ============================================================================

fn draw_player_select(
    frame: &mut Frame,
    app: &App,
    state: &SelectState,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Players
            Constraint::Length(1), // Rename / difficulty
            Constraint::Length(1), // Key hints
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let title = Paragraph::new(vec![
        Line::from(Span::styled("Tally", styles::title(palette))),
        Line::from(Span::styled(
            "Who is practicing today?",
            Style::default().fg(palette.text_secondary),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let mut lines = Vec::new();
    for (i, player) in app.roster().players().iter().enumerate() {
        let selected = i == state.selected();
        let prefix = if selected { glyphs.selected } else { " " };
        let style = if selected {
            Style::default()
                .fg(palette.text_primary)
                .bg(palette.bg_highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {prefix} {}{}", avatar(player, glyphs), player.name.as_str()),
                style,
            ),
            Span::styled(
                format!(
                    "  Lv {}  {}/{} exp",
                    player.level,
                    player.exp,
                    required_exp(player.level)
                ),
                Style::default().fg(palette.text_muted),
            ),
        ]));
        lines.push(Line::from(""));
    }
    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::border(palette))
            .padding(Padding::horizontal(1))
            .title(Span::styled(" Players ", styles::title(palette))),
    );
    frame.render_widget(list, chunks[1]);

    let info = if let Some(draft) = state.rename_draft() {
        Line::from(vec![
            Span::styled(" New name: ", Style::default().fg(palette.accent)),
            Span::styled(
                format!("{draft}_"),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(" Difficulty: ", Style::default().fg(palette.text_muted)),
            Span::styled(
                app.difficulty().label(),
                Style::default().fg(palette.warning),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(info), chunks[2]);

    let hints = if state.rename_draft().is_some() {
        key_hints(palette, &[("Enter", "save"), ("Esc", "cancel")])
    } else {
        key_hints(
            palette,
            &[
                ("↑↓", "select"),
                ("Enter", "start"),
                ("e", "rename"),
                ("d", "difficulty"),
                ("q", "quit"),
            ],
        )
    };
    frame.render_widget(Paragraph::new(hints), chunks[3]);
    draw_status_bar(frame, app, chunks[4], palette);
}

// ============================================================================
// Practice
// ============================================================================

fn draw_practice(
    frame: &mut Frame,
    app: &App,
    state: &PracticeState,
    palette: &Palette,
    glyphs: &Glyphs,
    hit_map: &mut HitMap,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(3), // Problem
            Constraint::Length(3), // Answer
            Constraint::Min(1),    // Counting aid
            Constraint::Length(1), // Key hints
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, state, chunks[0], palette, glyphs);

    let problem = Paragraph::new(Line::from(Span::styled(
        format!("{} = ?", state.problem()),
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.primary))
            .title(Span::styled(
                format!(" Question {} ", state.question_number()),
                styles::title(palette),
            )),
    );
    frame.render_widget(problem, chunks[1]);

    draw_answer(frame, app, state, chunks[2], palette);

    if let Some(session) = state.hint() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::border(palette))
            .title(Span::styled(" Counting aid ", styles::title(palette)));
        let inner = block.inner(chunks[3]);
        frame.render_widget(block, chunks[3]);
        let aid_area = Rect {
            height: inner.height.min(MANIPULATOR_HEIGHT),
            ..inner
        };
        let view = AidView {
            palette,
            glyphs,
            selected: state.selected_shape(),
        };
        draw_manipulator(frame, session, aid_area, &view, hit_map);
    } else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Press h to count with shapes",
                Style::default().fg(palette.text_muted),
            ))
            .alignment(Alignment::Center),
            chunks[3],
        );
    }

    let hints: &[(&str, &str)] = if state.is_hint_open() {
        &[
            ("0-9", "answer"),
            ("Enter", "check"),
            ("g", "move group"),
            ("←→", "pick shape"),
            ("Space", "move shape"),
            ("r", "reset"),
            ("h", "hide"),
        ]
    } else {
        &[
            ("0-9", "answer"),
            ("Enter", "check"),
            ("n", "next"),
            ("h", "hint"),
            ("v", "views"),
            ("d", "difficulty"),
            ("p", "players"),
            ("q", "quit"),
        ]
    };
    frame.render_widget(Paragraph::new(key_hints(palette, hints)), chunks[4]);
    draw_status_bar(frame, app, chunks[5], palette);
}

fn draw_header(
    frame: &mut Frame,
    app: &App,
    state: &PracticeState,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let Some(player) = app.current_player() else {
        return;
    };
    let mut stats = vec![
        Span::styled(
            format!(" Score: {}", state.score()),
            Style::default().fg(palette.success),
        ),
        Span::styled("  │  ", Style::default().fg(palette.text_muted)),
        Span::styled(
            app.difficulty().label(),
            Style::default().fg(palette.warning),
        ),
    ];
    stats.push(Span::styled("  │ ", Style::default().fg(palette.text_muted)));
    let current = app.practice_view();
    for view in PracticeView::ALL {
        let style = if current == Some(view) {
            Style::default()
                .fg(palette.text_primary)
                .bg(palette.bg_highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_muted)
        };
        stats.push(Span::raw(" "));
        stats.push(Span::styled(format!(" {} ", view.label()), style));
    }
    if app.is_saved_indicator_visible() {
        stats.push(Span::styled("  ", Style::default()));
        stats.push(Span::styled(glyphs.saved, Style::default().fg(palette.success)));
    }
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}{}", avatar(player, glyphs), player.name.as_str()),
                styles::title(palette),
            ),
            Span::styled(
                format!("  Lv {} ", player.level),
                Style::default().fg(palette.accent),
            ),
            Span::styled(exp_bar(player, glyphs), Style::default().fg(palette.primary)),
            Span::styled(
                format!(" {}/{} exp", player.exp, required_exp(player.level)),
                Style::default().fg(palette.text_muted),
            ),
        ]),
        Line::from(stats),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_answer(frame: &mut Frame, app: &App, state: &PracticeState, area: Rect, palette: &Palette) {
    let feedback = state.feedback();
    let feedback_style = match feedback {
        Feedback::Correct { .. } => Style::default().fg(palette.success),
        Feedback::Wrong => Style::default().fg(palette.error),
        Feedback::EnterNumber => Style::default().fg(palette.warning),
        Feedback::None => Style::default(),
    };
    let cursor = if state.is_solved() { "" } else { "_" };
    let mut spans = vec![
        Span::styled(" Answer: ", Style::default().fg(palette.text_secondary)),
        Span::styled(
            format!("{}{cursor}", state.answer()),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(message) = feedback.message() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(message, feedback_style));
    }

    let width = (Line::from(spans.clone()).width() as u16 + 4).min(area.width);
    let base = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };
    let rect = app
        .view()
        .answer_effect
        .as_ref()
        .map_or(base, |effect| apply_effect(effect, base, area));

    let border = match feedback {
        Feedback::Wrong => palette.error,
        Feedback::Correct { .. } => palette.success,
        _ => palette.bg_border,
    };
    let answer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(answer, rect);
}

// ============================================================================
// Sum sheets
// ============================================================================

fn sheet_layout(frame: &Frame) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(1), // Caption
            Constraint::Min(1),    // Sheet
            Constraint::Length(1), // Key hints
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area())
}

/// The sheet box, centered at the top of `area`.
fn sheet_rect(area: Rect) -> Rect {
    let columns = GRID_SIZE as u16 + 1;
    // One space between columns, plus the border.
    let width = (columns * SHEET_CELL + columns - 1 + 2).min(area.width);
    let height = (GRID_SIZE as u16 + 1 + 2).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        height,
        ..area
    }
}

fn sheet_cell<'a>(text: impl Into<String>, style: Style) -> Cell<'a> {
    Cell::from(Line::from(Span::styled(text.into(), style)).alignment(Alignment::Center))
}

/// A 10×10 sheet: "+" in the corner, headers along the top and left.
fn sheet<'a>(
    top: &[u32; GRID_SIZE],
    left: &[u32; GRID_SIZE],
    title: &'static str,
    palette: &Palette,
    cell: impl Fn(usize, usize) -> Cell<'a>,
) -> Table<'a> {
    let header_style = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        std::iter::once(sheet_cell("+", styles::title(palette)))
            .chain(top.iter().map(|n| sheet_cell(n.to_string(), header_style))),
    );
    let rows = left.iter().enumerate().map(|(row, n)| {
        Row::new(
            std::iter::once(sheet_cell(n.to_string(), header_style))
                .chain((0..GRID_SIZE).map(|col| cell(row, col))),
        )
    });
    Table::new(rows, [Constraint::Length(SHEET_CELL); GRID_SIZE + 1])
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(styles::border(palette))
                .title(Span::styled(title, styles::title(palette))),
        )
}

fn draw_sum_table(
    frame: &mut Frame,
    app: &App,
    round: &PracticeState,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let chunks = sheet_layout(frame);
    draw_header(frame, app, round, chunks[0], palette, glyphs);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Add the number on the left to the number on top.",
            Style::default().fg(palette.text_secondary),
        ))
        .alignment(Alignment::Center),
        chunks[1],
    );

    let headers = ordered_headers();
    let value_style = Style::default().fg(palette.text_primary);
    let table = sheet(&headers, &headers, " Sum table ", palette, |row, col| {
        sheet_cell(table_sum(row, col).to_string(), value_style)
    });
    frame.render_widget(table, sheet_rect(chunks[2]));

    let hints = key_hints(
        palette,
        &[
            ("v", "next view"),
            ("Esc", "flashcards"),
            ("p", "players"),
            ("q", "quit"),
        ],
    );
    frame.render_widget(Paragraph::new(hints), chunks[3]);
    draw_status_bar(frame, app, chunks[4], palette);
}

fn draw_grid_drill(
    frame: &mut Frame,
    app: &App,
    round: &PracticeState,
    drill: &GridDrillState,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let chunks = sheet_layout(frame);
    draw_header(frame, app, round, chunks[0], palette, glyphs);

    let caption = if drill.is_all_correct() {
        Span::styled(
            format!("{0} All {GRID_CELLS} correct! Well done! {0}", glyphs.star),
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!(
                "Fill in each sum.  {}/{GRID_CELLS} correct",
                drill.correct_count()
            ),
            Style::default().fg(palette.text_secondary),
        )
    };
    frame.render_widget(
        Paragraph::new(caption).alignment(Alignment::Center),
        chunks[1],
    );

    let cursor = drill.cursor();
    let table = sheet(drill.top(), drill.left(), " Grid drill ", palette, |row, col| {
        let entry = drill.entry(row, col);
        let mut style = match drill.mark(row, col) {
            Some(CellMark::Right) => Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
            Some(CellMark::Wrong) => Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::CROSSED_OUT),
            None => Style::default().fg(palette.text_muted),
        };
        if (row, col) == cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let text = if entry.is_empty() { glyphs.blank } else { entry };
        sheet_cell(text.to_string(), style)
    });
    frame.render_widget(table, sheet_rect(chunks[2]));

    let hints = key_hints(
        palette,
        &[
            ("0-9", "answer"),
            ("←↑↓→", "move"),
            ("Enter", "next cell"),
            ("s", "shuffle"),
            ("c", "clear"),
            ("v", "next view"),
            ("Esc", "flashcards"),
        ],
    );
    frame.render_widget(Paragraph::new(hints), chunks[3]);
    draw_status_bar(frame, app, chunks[4], palette);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let Some(message) = app.status_message() else {
        return;
    };
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("Warning: {message}"),
            Style::default().fg(palette.warning),
        ),
    ]));
    frame.render_widget(status, area);
}

// ============================================================================
// Modals
// ============================================================================

fn draw_modal(frame: &mut Frame, app: &App, modal: Modal, palette: &Palette, glyphs: &Glyphs) {
    let area = frame.area();
    let (title, headline, detail) = match modal {
        Modal::LevelUp { level } => (
            " Level up! ",
            format!("{0} Level {level}! {0}", glyphs.star),
            "You are getting stronger!".to_string(),
        ),
        Modal::Congrats { score } => (
            " Great job! ",
            format!("{0} {score} correct! {0}", glyphs.star),
            "Keep going!".to_string(),
        ),
    };
    let lines = vec![
        Line::from(Span::styled(
            headline,
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            detail,
            Style::default().fg(palette.text_primary),
        )),
        Line::from(""),
        key_hints(palette, &[("Enter", "continue")]),
    ];

    let width = 40.min(area.width);
    let height = (lines.len() as u16 + 4).min(area.height);
    let base = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let rect = app
        .view()
        .modal_effect
        .as_ref()
        .map_or(base, |effect| apply_effect(effect, base, area));

    // Clear background
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::uniform(1))
        .title(Span::styled(title, styles::title(palette)));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}
