use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::{delete_book, update_book_field, BookFilter, FilterMode, QueryError};
use crate::models::{action_label, Book, BookField, LoanAction};

use super::dispatch::{classify, CellAction};
use super::forms::{CreateFocus, CreateForm, EditFocus, EditForm, EditTarget, FormKey, FormOutcome};
use super::grid::{Grid, GridColumn};
use super::helpers::{centered_rect, display_width, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Columns never shrink below this, so "X" and "+" stay clickable.
const MIN_COLUMN_WIDTH: u16 = 3;
/// Long titles are cut off rather than pushing later columns off screen.
const MAX_COLUMN_WIDTH: u16 = 24;
const COLUMN_SPACING: u16 = 1;
const PAGE_ROWS: isize = 10;

const TITLE: &str = "图书管理";
const QUERY_ERROR_TEXT: &str = "查询语法错误！";

/// Fine-grained modes. Exactly one of them owns the keyboard at a time; the
/// form variants hold everything needed to resume once the form is closed.
enum Mode {
    Normal,
    Query(QueryInput),
    Editing(EditForm),
    Creating(CreateForm),
}

/// Text being typed into the query bar.
struct QueryInput {
    text: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Screen regions from the last frame, used to resolve mouse clicks.
struct HitMap {
    query: Rect,
    /// Table rows below the header.
    body: Rect,
    columns: Vec<Rect>,
    offset: usize,
}

enum ClickTarget {
    Query,
    Cell { row: usize, column: usize },
}

impl HitMap {
    fn locate(&self, pos: Position) -> Option<ClickTarget> {
        if self.query.contains(pos) {
            return Some(ClickTarget::Query);
        }
        if !self.body.contains(pos) {
            return None;
        }
        let row = self.offset + usize::from(pos.y - self.body.y);
        let column = self
            .columns
            .iter()
            .position(|rect| pos.x >= rect.x && pos.x < rect.x.saturating_add(rect.width))?;
        Some(ClickTarget::Cell { row, column })
    }
}

/// Top-level controller: owns the connection, the grid projection, the
/// active filter text, and whichever form is currently open.
pub struct App {
    conn: Connection,
    filter_mode: FilterMode,
    grid: Grid,
    /// Query-bar text the grid is currently filtered by.
    filter_text: String,
    query_error: Option<String>,
    cursor_row: usize,
    cursor_col: usize,
    table_state: TableState,
    mode: Mode,
    status: Option<StatusMessage>,
    hit_map: Option<HitMap>,
}

impl App {
    /// Build the controller and load every book into the grid.
    pub fn new(conn: Connection, filter_mode: FilterMode) -> Result<Self, QueryError> {
        let mut grid = Grid::new(filter_mode.has_loan_actions());
        let count = grid.load(&conn, &BookFilter::All)?;
        info!(count, ?filter_mode, "loaded books");

        Ok(Self {
            conn,
            filter_mode,
            grid,
            filter_text: String::new(),
            query_error: None,
            cursor_row: 0,
            cursor_col: 0,
            table_state: TableState::default(),
            mode: Mode::Normal,
            status: None,
            hit_map: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// SQLite's complaint about the last rejected filter, while the inline
    /// error indicator is showing.
    pub fn query_error(&self) -> Option<&str> {
        self.query_error.as_deref()
    }

    /// Cursor position as (row, column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.mode, Mode::Editing(_) | Mode::Creating(_))
    }

    pub fn is_query_focused(&self) -> bool {
        matches!(self.mode, Mode::Query(_))
    }

    /// Feed one key press to whatever currently owns the keyboard. Returns
    /// `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Query(input) => self.handle_query_key(code, input),
            Mode::Editing(form) => self.handle_edit_key(code, form),
            Mode::Creating(form) => self.handle_create_key(code, form),
        };

        exit
    }

    /// Activate the cell under a left click. Clicks are ignored while a form
    /// is open; clicking the query bar focuses it.
    pub fn handle_click(&mut self, x: u16, y: u16) {
        if self.is_form_open() {
            return;
        }
        let target = self
            .hit_map
            .as_ref()
            .and_then(|hit| hit.locate(Position::new(x, y)));

        match target {
            Some(ClickTarget::Query) => {
                if !self.is_query_focused() {
                    self.mode = self.open_query();
                }
            }
            Some(ClickTarget::Cell { row, column }) => {
                if row < self.grid.row_count() {
                    self.mode = Mode::Normal;
                    self.activate_cell(row, column);
                }
            }
            None => {}
        }
    }

    /// Activate (`row`, `column`) as if it had been clicked. Only honoured
    /// while the grid has focus.
    pub fn activate_cell(&mut self, row: usize, column: usize) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        if row < self.grid.row_count() && column < self.grid.column_count() {
            self.cursor_row = row;
            self.cursor_col = column;
        }
        self.mode = self.activate(row, column);
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::PageUp => self.move_cursor(-PAGE_ROWS, 0),
            KeyCode::PageDown => self.move_cursor(PAGE_ROWS, 0),
            KeyCode::Home => self.cursor_row = 0,
            KeyCode::End => self.cursor_row = self.grid.sentinel_row(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return self.activate(self.cursor_row, self.cursor_col);
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                return self.open_query();
            }
            KeyCode::Char('c') if self.filter_mode == FilterMode::Sql => {
                return self.open_create();
            }
            KeyCode::Char('r') => {
                let text = self.filter_text.clone();
                if self.apply_filter(&text) {
                    self.set_status("已刷新。", StatusKind::Info);
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_query_key(&mut self, code: KeyCode, mut input: QueryInput) -> Mode {
        match code {
            KeyCode::Esc => {
                if self.filter_mode == FilterMode::Search && !self.filter_text.is_empty() {
                    self.apply_filter("");
                }
                self.query_error = None;
                return Mode::Normal;
            }
            KeyCode::Enter => {
                return if self.apply_filter(&input.text) {
                    Mode::Normal
                } else {
                    Mode::Query(input)
                };
            }
            KeyCode::Down => {
                self.query_error = None;
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                input.text.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => input.text.push(ch),
            _ => return Mode::Query(input),
        }

        if self.filter_mode == FilterMode::Search {
            self.apply_filter(&input.text);
        }
        Mode::Query(input)
    }

    fn handle_edit_key(&mut self, code: KeyCode, mut form: EditForm) -> Mode {
        match form.handle_key(code) {
            FormKey::Continue => Mode::Editing(form),
            FormKey::Cancel => {
                self.finish_edit(form.target, FormOutcome::Cancelled);
                Mode::Normal
            }
            FormKey::Confirm => match form.submit(&self.conn) {
                Ok(value) => {
                    self.finish_edit(form.target, FormOutcome::Submitted(value));
                    Mode::Normal
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                    Mode::Editing(form)
                }
            },
        }
    }

    fn handle_create_key(&mut self, code: KeyCode, mut form: CreateForm) -> Mode {
        match form.handle_key(code) {
            FormKey::Continue => Mode::Creating(form),
            FormKey::Cancel => {
                self.finish_create(FormOutcome::Cancelled);
                Mode::Normal
            }
            FormKey::Confirm => match form.submit(&self.conn) {
                Ok(book) => {
                    self.finish_create(FormOutcome::Submitted(book));
                    Mode::Normal
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                    Mode::Creating(form)
                }
            },
        }
    }

    fn activate(&mut self, row: usize, column: usize) -> Mode {
        match classify(&self.grid, row, column) {
            CellAction::Create => self.open_create(),
            CellAction::Delete { row, id } => {
                if let Err(err) = self.delete_row(row, id) {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
                Mode::Normal
            }
            CellAction::Toggle { row, id, action } => {
                if let Err(err) = self.toggle_status(row, id, action) {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
                Mode::Normal
            }
            CellAction::Edit {
                row,
                id,
                field,
                current,
            } => {
                self.clear_status();
                Mode::Editing(EditForm::new(EditTarget { row, id, field }, &current))
            }
            CellAction::Ignore => Mode::Normal,
        }
    }

    fn open_create(&mut self) -> Mode {
        self.clear_status();
        Mode::Creating(CreateForm::default())
    }

    fn open_query(&mut self) -> Mode {
        self.clear_status();
        Mode::Query(QueryInput {
            text: self.filter_text.clone(),
        })
    }

    fn finish_edit(&mut self, target: EditTarget, outcome: FormOutcome<String>) {
        match outcome {
            FormOutcome::Cancelled => {
                debug!(id = target.id, field = target.field.column(), "edit cancelled");
                self.set_status("已取消修改。", StatusKind::Info);
            }
            FormOutcome::Submitted(value) => {
                self.grid
                    .patch_cell(target.row, target.field.grid_column(), &value);
                if target.field == BookField::Status {
                    if let Some(column) = self.grid.action_column() {
                        self.grid
                            .patch_cell(target.row, column, action_label(&value));
                    }
                }
                self.set_status(
                    format!("已更新 #{} 的{}。", target.id, target.field.label()),
                    StatusKind::Info,
                );
            }
        }
    }

    fn finish_create(&mut self, outcome: FormOutcome<Book>) {
        match outcome {
            FormOutcome::Cancelled => {
                debug!("create cancelled");
                self.set_status("已取消新建。", StatusKind::Info);
            }
            FormOutcome::Submitted(book) => {
                self.grid.append_created(&book);
                self.cursor_row = self.grid.sentinel_row().saturating_sub(1);
                self.cursor_col = BookField::Name.grid_column();
                self.set_status(format!("已新建 {book}。"), StatusKind::Info);
            }
        }
    }

    fn delete_row(&mut self, row: usize, id: i64) -> anyhow::Result<()> {
        delete_book(&self.conn, id)?;
        self.grid.remove(row);
        self.clamp_cursor();
        self.set_status(format!("已删除 #{id}。"), StatusKind::Info);
        Ok(())
    }

    fn toggle_status(&mut self, row: usize, id: i64, action: LoanAction) -> anyhow::Result<()> {
        let next = action.next_status();
        update_book_field(&self.conn, id, BookField::Status, next)?;
        self.grid
            .patch_cell(row, BookField::Status.grid_column(), next);
        if let Some(column) = self.grid.action_column() {
            self.grid.patch_cell(row, column, action_label(next));
        }
        self.set_status(
            format!("#{id} 已{}，状态：{next}。", action.label()),
            StatusKind::Info,
        );
        Ok(())
    }

    /// Reload the grid under `text`. On success `text` becomes the active
    /// filter; a rejected fragment raises the inline indicator and leaves the
    /// rows alone.
    fn apply_filter(&mut self, text: &str) -> bool {
        let filter = self.filter_mode.filter_for(text);
        match self.grid.load(&self.conn, &filter) {
            Ok(count) => {
                debug!(count, ?filter, "grid reloaded");
                self.filter_text = text.to_string();
                self.query_error = None;
                self.clamp_cursor();
                true
            }
            Err(err) if err.is_invalid_filter() => {
                warn!(%err, "rejected filter");
                let message = err.to_string();
                self.set_status(message.clone(), StatusKind::Error);
                self.query_error = Some(message);
                false
            }
            Err(err) => {
                let err = anyhow::Error::from(err);
                self.set_status(surface_error(&err), StatusKind::Error);
                false
            }
        }
    }

    fn move_cursor(&mut self, rows: isize, columns: isize) {
        let max_row = self.grid.row_count().saturating_sub(1) as isize;
        let max_col = self.grid.column_count().saturating_sub(1) as isize;
        self.cursor_row = (self.cursor_row as isize + rows).clamp(0, max_row) as usize;
        self.cursor_col = (self.cursor_col as isize + columns).clamp(0, max_col) as usize;
    }

    fn clamp_cursor(&mut self) {
        self.move_cursor(0, 0);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [title_area, manual_area, query_area, error_area, table_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .areas(area);

        let title = Paragraph::new(TITLE)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(title, title_area);

        let manual = Paragraph::new(self.manual_text()).style(Style::default().fg(Color::Gray));
        frame.render_widget(manual, manual_area);

        self.draw_query_bar(frame, query_area);
        self.draw_query_error(frame, error_area);
        self.draw_grid(frame, table_area, query_area);
        self.draw_footer(frame, footer_area);

        match &self.mode {
            Mode::Editing(form) => self.draw_edit_form(frame, area, form),
            Mode::Creating(form) => self.draw_create_form(frame, area, form),
            Mode::Normal | Mode::Query(_) => {}
        }
    }

    fn manual_text(&self) -> &'static str {
        match self.filter_mode {
            FilterMode::Sql => {
                "使用说明：点击+号创建新书数据，点击X删除数据，点击单元格修改数据，在下面的输入框输入SQL语句查询数据。"
            }
            FilterMode::Search => {
                "使用说明：点击+号创建新书数据，点击X删除数据，点击借出/归还切换状态，点击单元格修改数据，在下面的输入框输入关键字搜索。"
            }
        }
    }

    fn draw_query_bar(&self, frame: &mut Frame, area: Rect) {
        let focused = self.is_query_focused();
        let text = match &self.mode {
            Mode::Query(input) => input.text.as_str(),
            _ => self.filter_text.as_str(),
        };

        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let title = match self.filter_mode {
            FilterMode::Sql => "查询",
            FilterMode::Search => "搜索",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);
        let inner = block.inner(area);

        let line = if text.is_empty() && !focused {
            let placeholder = match self.filter_mode {
                FilterMode::Sql => "输入SQL查询语句：（WHERE 后面的部分）",
                FilterMode::Search => "输入关键字搜索：ID、书名、作者、ISBN、所在位置",
            };
            Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(text.to_string())
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if focused {
            frame.set_cursor_position((inner.x + display_width(text), inner.y));
        }
    }

    fn draw_query_error(&self, frame: &mut Frame, area: Rect) {
        let Some(detail) = &self.query_error else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(
                QUERY_ERROR_TEXT,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(detail.clone(), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_grid(&mut self, frame: &mut Frame, area: Rect, query_area: Rect) {
        let constraints: Vec<Constraint> = self
            .column_widths()
            .into_iter()
            .map(Constraint::Length)
            .collect();

        let header = Row::new(self.grid.headers().into_iter().map(|label| {
            Cell::from(label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }));

        let rows: Vec<Row<'static>> = (0..self.grid.row_count())
            .map(|row| {
                let cells = (0..self.grid.column_count())
                    .map(|column| {
                        let text = self.grid.cell(row, column).unwrap_or_default().to_string();
                        Cell::from(text).style(self.cell_style(row, column))
                    })
                    .collect::<Vec<_>>();
                Row::new(cells)
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("共 {} 本", self.grid.record_count()));
        let inner = block.inner(area);

        let table = Table::new(rows, constraints.clone())
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .flex(Flex::Start)
            .block(block);
        self.table_state.select(Some(self.cursor_row));
        frame.render_stateful_widget(table, area, &mut self.table_state);

        let body = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let columns = Layout::horizontal(constraints)
            .flex(Flex::Start)
            .spacing(COLUMN_SPACING)
            .split(inner)
            .to_vec();
        self.hit_map = Some(HitMap {
            query: query_area,
            body,
            columns,
            offset: self.table_state.offset(),
        });
    }

    /// Width of each column: its widest cell or header, within bounds.
    fn column_widths(&self) -> Vec<u16> {
        let headers = self.grid.headers();
        (0..self.grid.column_count())
            .map(|column| {
                let header = headers.get(column).map_or(0, |label| display_width(label));
                let widest = (0..self.grid.row_count())
                    .filter_map(|row| self.grid.cell(row, column))
                    .map(display_width)
                    .max()
                    .unwrap_or(0);
                header.max(widest).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn cell_style(&self, row: usize, column: usize) -> Style {
        if row == self.cursor_row && column == self.cursor_col {
            return Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }

        let mut style = if self.grid.is_sentinel(row) {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            match self.grid.column_kind(column) {
                Some(GridColumn::Delete) => Style::default().fg(Color::Red),
                Some(GridColumn::Action) => Style::default().fg(Color::Cyan),
                _ => Style::default(),
            }
        };
        if row == self.cursor_row {
            style = style.bg(Color::DarkGray);
        }
        style
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let key = |label: &'static str| Span::styled(label, key_style);

        match &self.mode {
            Mode::Query(_) => Line::from(vec![
                key("[Enter]"),
                Span::raw(" 应用   "),
                key("[Esc]"),
                Span::raw(if self.filter_mode == FilterMode::Search {
                    " 清除并返回"
                } else {
                    " 返回表格"
                }),
            ]),
            Mode::Editing(_) | Mode::Creating(_) => Line::from(vec![
                key("[Enter]"),
                Span::raw(" 确定   "),
                key("[Tab]"),
                Span::raw(" 切换   "),
                key("[Esc]"),
                Span::raw(" 取消"),
            ]),
            Mode::Normal => {
                let mut spans = vec![
                    key("[←↑↓→]"),
                    Span::raw(" 移动   "),
                    key("[Enter]"),
                    Span::raw(" 点击单元格   "),
                    key("[/]"),
                    Span::raw(if self.filter_mode == FilterMode::Search {
                        " 搜索   "
                    } else {
                        " 查询   "
                    }),
                ];
                if self.filter_mode == FilterMode::Sql {
                    spans.push(key("[c]"));
                    spans.push(Span::raw(" 新建   "));
                }
                spans.extend([key("[r]"), Span::raw(" 刷新   "), key("[q]"), Span::raw(" 退出")]);
                Line::from(spans)
            }
        }
    }

    fn draw_edit_form(&self, frame: &mut Frame, area: Rect, form: &EditForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("修改 #{}", form.target.id))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.input_line(), Line::from(""), form.buttons_line(), Line::from("")];
        lines.push(hint_or_error(form.error.as_deref()));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        if form.focus == EditFocus::Input {
            let prefix = display_width(&format!("{}: ", form.label()));
            frame.set_cursor_position((inner.x + prefix + display_width(&form.value), inner.y));
        }
    }

    fn draw_create_form(&self, frame: &mut Frame, area: Rect, form: &CreateForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("新建图书").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = form.field_lines();
        lines.push(Line::from(""));
        lines.push(form.buttons_line());
        lines.push(Line::from(""));
        lines.push(hint_or_error(form.error.as_deref()));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        if let CreateFocus::Field(idx) = form.focus {
            let label = BookField::ALL[idx].label();
            let prefix = display_width(&format!("{label}: "));
            frame.set_cursor_position((
                inner.x + prefix + display_width(&form.values[idx]),
                inner.y + idx as u16,
            ));
        }
    }
}

fn hint_or_error(error: Option<&str>) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "Enter 确定 • Tab 切换 • Esc 取消",
            Style::default().fg(Color::Gray),
        )),
    }
}
