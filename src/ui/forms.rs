use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use rusqlite::Connection;

use crate::db::{create_book, update_book_field};
use crate::models::{Book, BookField, NewBook};

const CONFIRM_LABEL: &str = "确定";
const CANCEL_LABEL: &str = "取消";

/// Result a modal form hands back to whoever opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    Submitted(T),
    Cancelled,
}

/// What a key press asks the surrounding app to do with an open form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormKey {
    Continue,
    Confirm,
    Cancel,
}

/// Which record and field an edit form writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EditTarget {
    pub(crate) row: usize,
    pub(crate) id: i64,
    pub(crate) field: BookField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditFocus {
    Input,
    Confirm,
    Cancel,
}

/// Single-field editor opened from a grid cell.
#[derive(Debug, Clone)]
pub(crate) struct EditForm {
    pub(crate) target: EditTarget,
    pub(crate) value: String,
    pub(crate) focus: EditFocus,
    pub(crate) error: Option<String>,
}

impl EditForm {
    pub(crate) fn new(target: EditTarget, current: &str) -> Self {
        Self {
            target,
            value: current.to_string(),
            focus: EditFocus::Input,
            error: None,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        self.target.field.label()
    }

    /// Enter on the input and Enter on the confirm button both map to
    /// [`FormKey::Confirm`]; the app closes the form once it is saved.
    pub(crate) fn handle_key(&mut self, code: KeyCode) -> FormKey {
        match code {
            KeyCode::Esc => FormKey::Cancel,
            KeyCode::Enter => match self.focus {
                EditFocus::Input | EditFocus::Confirm => FormKey::Confirm,
                EditFocus::Cancel => FormKey::Cancel,
            },
            KeyCode::Tab | KeyCode::Down => {
                self.focus = match self.focus {
                    EditFocus::Input => EditFocus::Confirm,
                    EditFocus::Confirm => EditFocus::Cancel,
                    EditFocus::Cancel => EditFocus::Input,
                };
                FormKey::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = match self.focus {
                    EditFocus::Input => EditFocus::Cancel,
                    EditFocus::Confirm => EditFocus::Input,
                    EditFocus::Cancel => EditFocus::Confirm,
                };
                FormKey::Continue
            }
            // Arrows only hop between the buttons; the input keeps focus.
            KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    EditFocus::Confirm => EditFocus::Cancel,
                    EditFocus::Cancel => EditFocus::Confirm,
                    EditFocus::Input => EditFocus::Input,
                };
                FormKey::Continue
            }
            KeyCode::Backspace => {
                if self.focus == EditFocus::Input {
                    self.value.pop();
                    self.error = None;
                }
                FormKey::Continue
            }
            KeyCode::Char(ch) => {
                if self.focus == EditFocus::Input && !ch.is_control() {
                    self.value.push(ch);
                    self.error = None;
                }
                FormKey::Continue
            }
            _ => FormKey::Continue,
        }
    }

    /// Write the value to the store and return it for the grid to display.
    pub(crate) fn submit(&self, conn: &Connection) -> Result<String> {
        update_book_field(conn, self.target.id, self.target.field, &self.value)?;
        Ok(self.value.clone())
    }

    pub(crate) fn input_line(&self) -> Line<'static> {
        let style = if self.focus == EditFocus::Input {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("{}: ", self.label())),
            Span::styled(self.value.clone(), style),
        ])
    }

    pub(crate) fn buttons_line(&self) -> Line<'static> {
        buttons_line(
            self.focus == EditFocus::Confirm,
            self.focus == EditFocus::Cancel,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CreateFocus {
    Field(usize),
    Confirm,
    Cancel,
}

impl Default for CreateFocus {
    fn default() -> Self {
        CreateFocus::Field(0)
    }
}

/// Six-field form used to insert a new book. Every field is optional.
#[derive(Debug, Clone, Default)]
pub(crate) struct CreateForm {
    pub(crate) values: [String; 6],
    pub(crate) focus: CreateFocus,
    pub(crate) error: Option<String>,
}

impl CreateForm {
    const LAST_FIELD: usize = BookField::ALL.len() - 1;

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> FormKey {
        match code {
            KeyCode::Esc => FormKey::Cancel,
            KeyCode::Enter => match self.focus {
                CreateFocus::Field(idx) if idx < Self::LAST_FIELD => {
                    self.focus = CreateFocus::Field(idx + 1);
                    FormKey::Continue
                }
                CreateFocus::Field(_) | CreateFocus::Confirm => FormKey::Confirm,
                CreateFocus::Cancel => FormKey::Cancel,
            },
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormKey::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_previous();
                FormKey::Continue
            }
            KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    CreateFocus::Confirm => CreateFocus::Cancel,
                    CreateFocus::Cancel => CreateFocus::Confirm,
                    field => field,
                };
                FormKey::Continue
            }
            KeyCode::Backspace => {
                if let CreateFocus::Field(idx) = self.focus {
                    self.values[idx].pop();
                    self.error = None;
                }
                FormKey::Continue
            }
            KeyCode::Char(ch) => {
                if let CreateFocus::Field(idx) = self.focus {
                    if !ch.is_control() {
                        self.values[idx].push(ch);
                        self.error = None;
                    }
                }
                FormKey::Continue
            }
            _ => FormKey::Continue,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            CreateFocus::Field(idx) if idx < Self::LAST_FIELD => CreateFocus::Field(idx + 1),
            CreateFocus::Field(_) => CreateFocus::Confirm,
            CreateFocus::Confirm => CreateFocus::Cancel,
            CreateFocus::Cancel => CreateFocus::Field(0),
        };
    }

    fn focus_previous(&mut self) {
        self.focus = match self.focus {
            CreateFocus::Field(0) => CreateFocus::Cancel,
            CreateFocus::Field(idx) => CreateFocus::Field(idx - 1),
            CreateFocus::Confirm => CreateFocus::Field(Self::LAST_FIELD),
            CreateFocus::Cancel => CreateFocus::Confirm,
        };
    }

    pub(crate) fn new_book(&self) -> NewBook {
        let [name, author, publish, isbn, status, location] = self.values.clone();
        NewBook {
            name,
            author,
            publish,
            isbn,
            status,
            location,
        }
    }

    /// Insert the record and return it as stored, id included.
    pub(crate) fn submit(&self, conn: &Connection) -> Result<Book> {
        create_book(conn, &self.new_book())
    }

    pub(crate) fn field_lines(&self) -> Vec<Line<'static>> {
        BookField::ALL
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let value = &self.values[idx];
                let active = self.focus == CreateFocus::Field(idx);
                let (display, style) = if value.is_empty() {
                    let style = if active {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    (if active { String::new() } else { "<optional>".to_string() }, style)
                } else if active {
                    (value.clone(), Style::default().fg(Color::Yellow))
                } else {
                    (value.clone(), Style::default())
                };
                Line::from(vec![
                    Span::raw(format!("{}: ", field.label())),
                    Span::styled(display, style),
                ])
            })
            .collect()
    }

    pub(crate) fn buttons_line(&self) -> Line<'static> {
        buttons_line(
            self.focus == CreateFocus::Confirm,
            self.focus == CreateFocus::Cancel,
        )
    }
}

fn buttons_line(confirm_active: bool, cancel_active: bool) -> Line<'static> {
    let button = |label: &str, active: bool| {
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!("[ {label} ]"), style)
    };
    Line::from(vec![
        button(CONFIRM_LABEL, confirm_active),
        Span::raw("  "),
        button(CANCEL_LABEL, cancel_active),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ensure_schema, fetch_book, fetch_books, BookFilter};

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().expect("db");
        ensure_schema(&conn).expect("schema");
        conn
    }

    fn type_text(form: &mut CreateForm, text: &str) {
        for ch in text.chars() {
            assert_eq!(form.handle_key(KeyCode::Char(ch)), FormKey::Continue);
        }
    }

    #[test]
    fn edit_form_starts_with_current_value() {
        let target = EditTarget {
            row: 0,
            id: 1,
            field: BookField::Author,
        };
        let mut form = EditForm::new(target, "Herbert");
        assert_eq!(form.label(), "作者");

        form.handle_key(KeyCode::Backspace);
        form.handle_key(KeyCode::Char('!'));
        assert_eq!(form.value, "Herber!");
    }

    #[test]
    fn edit_form_confirm_routes_agree() {
        let target = EditTarget {
            row: 0,
            id: 1,
            field: BookField::Name,
        };
        let mut form = EditForm::new(target, "x");
        assert_eq!(form.handle_key(KeyCode::Enter), FormKey::Confirm);

        form.handle_key(KeyCode::Tab);
        assert_eq!(form.focus, EditFocus::Confirm);
        form.handle_key(KeyCode::Char('y'));
        assert_eq!(form.value, "x");
        assert_eq!(form.handle_key(KeyCode::Enter), FormKey::Confirm);

        form.handle_key(KeyCode::Tab);
        assert_eq!(form.handle_key(KeyCode::Enter), FormKey::Cancel);
        assert_eq!(form.handle_key(KeyCode::Esc), FormKey::Cancel);
    }

    #[test]
    fn edit_form_arrows_keep_the_input_focused() {
        let target = EditTarget {
            row: 0,
            id: 1,
            field: BookField::Name,
        };
        let mut form = EditForm::new(target, "Dune");
        form.handle_key(KeyCode::Left);
        form.handle_key(KeyCode::Right);
        assert_eq!(form.focus, EditFocus::Input);
        assert_eq!(form.handle_key(KeyCode::Enter), FormKey::Confirm);

        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Right);
        assert_eq!(form.focus, EditFocus::Cancel);
        form.handle_key(KeyCode::Left);
        assert_eq!(form.focus, EditFocus::Confirm);
    }

    #[test]
    fn edit_submit_writes_the_field() -> Result<()> {
        let conn = memory_db();
        let book = create_book(&conn, &NewBook::default())?;
        let mut form = EditForm::new(
            EditTarget {
                row: 0,
                id: book.id,
                field: BookField::Isbn,
            },
            "",
        );
        for ch in "978-7".chars() {
            form.handle_key(KeyCode::Char(ch));
        }

        assert_eq!(form.submit(&conn)?, "978-7");
        assert_eq!(fetch_book(&conn, book.id)?.expect("row").isbn, "978-7");
        Ok(())
    }

    #[test]
    fn create_form_walks_fields_then_confirms() {
        let mut form = CreateForm::default();
        type_text(&mut form, "Dune");
        for _ in 0..5 {
            assert_eq!(form.handle_key(KeyCode::Enter), FormKey::Continue);
        }
        assert_eq!(form.focus, CreateFocus::Field(5));
        type_text(&mut form, "A1");
        assert_eq!(form.handle_key(KeyCode::Enter), FormKey::Confirm);

        let book = form.new_book();
        assert_eq!(book.name, "Dune");
        assert_eq!(book.location, "A1");
        assert_eq!(book.author, "");
    }

    #[test]
    fn create_form_focus_wraps() {
        let mut form = CreateForm::default();
        form.handle_key(KeyCode::BackTab);
        assert_eq!(form.focus, CreateFocus::Cancel);
        form.handle_key(KeyCode::Left);
        assert_eq!(form.focus, CreateFocus::Confirm);
        form.handle_key(KeyCode::Up);
        assert_eq!(form.focus, CreateFocus::Field(5));
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Tab);
        assert_eq!(form.handle_key(KeyCode::Enter), FormKey::Cancel);
    }

    #[test]
    fn create_submit_inserts_once() -> Result<()> {
        let conn = memory_db();
        let mut form = CreateForm::default();
        type_text(&mut form, "Emma");

        let created = form.submit(&conn)?;
        assert_eq!(created.name, "Emma");
        assert_eq!(created.status, "");
        assert_eq!(fetch_books(&conn, &BookFilter::All)?, vec![created]);
        Ok(())
    }
}
