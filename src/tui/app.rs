use anyhow::Result;
use crossterm::event::Event;
use ratatui::{
    buffer::Buffer,
    crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Layout, Rect},
    style::{
        palette::{
            material::{BLUE, GREEN, RED},
            tailwind::SLATE,
        },
        Color, Modifier, Style, Stylize,
    },
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph,
        StatefulWidget, Widget,
    },
    DefaultTerminal, Frame,
};
use tracing::{info, warn};

use super::input::TextInput;
use crate::config::UiConfig;
use crate::tasks::{Task, TaskError, TaskId, TaskList};

const TODO_HEADER_STYLE: Style = Style::new().fg(SLATE.c100).bg(BLUE.c800);
const NORMAL_ROW_BG: Color = SLATE.c950;
const ALT_ROW_BG_COLOR: Color = SLATE.c900;
const SELECTED_STYLE: Style = Style::new().bg(SLATE.c800).add_modifier(Modifier::BOLD);
const TEXT_FG_COLOR: Color = SLATE.c200;
const COMPLETED_TEXT_FG_COLOR: Color = GREEN.c500;
const ERROR_FG_COLOR: Color = RED.c400;
const FOCUSED_BORDER_COLOR: Color = BLUE.c400;

const EDIT_POPUP_WIDTH: u16 = 44;
const EDIT_POPUP_HEIGHT: u16 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Typing into the new-task line.
    Adding,
    /// Edit popup open for `id`.
    Editing { id: TaskId, input: TextInput },
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

pub struct App {
    tasks: TaskList,
    state: ListState,
    input: TextInput,
    mode: Mode,
    status: Option<String>,
    ui: UiConfig,
    exit: bool,
}

const fn alternate_colors(i: usize) -> Color {
    if i % 2 == 0 {
        NORMAL_ROW_BG
    } else {
        ALT_ROW_BG_COLOR
    }
}

impl App {
    pub fn new(tasks: TaskList, ui: UiConfig) -> Self {
        let mut state = ListState::default();
        if !tasks.is_empty() {
            state.select(Some(0));
        }
        Self {
            tasks,
            state,
            input: TextInput::default(),
            mode: Mode::Normal,
            status: None,
            ui,
            exit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        info!(tasks = self.tasks.len(), "session ended");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn handle_events(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event)
            }
            _ => Ok(()),
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        self.status = None;
        match self.mode {
            Mode::Normal => self.handle_normal_key(key_event),
            Mode::Adding => self.handle_adding_key(key_event),
            Mode::Editing { .. } => self.handle_editing_key(key_event),
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, key_event: KeyEvent) {
        let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit(),
            KeyCode::Char('a') | KeyCode::Char('i') => self.mode = Mode::Adding,
            KeyCode::Up if shift => self.move_selected(Direction::Up),
            KeyCode::Down if shift => self.move_selected(Direction::Down),
            KeyCode::Char('K') => self.move_selected(Direction::Up),
            KeyCode::Char('J') => self.move_selected(Direction::Down),
            KeyCode::Char('h') => self.select_none(),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),
            KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle_current(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_editor(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_current(),
            _ => {}
        }
    }

    fn handle_adding_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => self.submit_new_task(),
            _ => {
                self.input.handle_key(key_event);
            }
        }
    }

    fn handle_editing_key(&mut self, key_event: KeyEvent) {
        let Mode::Editing { id, input } = &mut self.mode else {
            return;
        };
        match key_event.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let id = *id;
                let title = input.take();
                self.mode = Mode::Normal;
                if let Err(err) = self.tasks.edit(id, title) {
                    self.report(err);
                }
            }
            _ => {
                input.handle_key(key_event);
            }
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }

    // Cursor moves clamp immediately rather than using `ListState::select_*`,
    // which leave out-of-range indices until the next render.
    fn select_none(&mut self) {
        self.state.select(None);
    }

    fn select_next(&mut self) {
        let next = match self.state.selected() {
            Some(i) => i.saturating_add(1).min(self.tasks.len().saturating_sub(1)),
            None => 0,
        };
        self.select_index(next);
    }

    fn select_previous(&mut self) {
        let previous = match self.state.selected() {
            Some(i) => i.saturating_sub(1),
            None => self.tasks.len().saturating_sub(1),
        };
        self.select_index(previous);
    }

    fn select_first(&mut self) {
        self.select_index(0);
    }

    fn select_last(&mut self) {
        self.select_index(self.tasks.len().saturating_sub(1));
    }

    fn select_index(&mut self, index: usize) {
        if !self.tasks.is_empty() {
            self.state.select(Some(index));
        }
    }

    /// The task under the list cursor.
    fn current_task(&self) -> Option<TaskId> {
        self.state
            .selected()
            .and_then(|i| self.tasks.items().get(i))
            .map(Task::id)
    }

    fn submit_new_task(&mut self) {
        let added = self.tasks.add(self.input.text()).map(Task::id);
        match added {
            Ok(_) => {
                self.input.take();
                if self.state.selected().is_none() {
                    self.select_last();
                }
            }
            Err(err) => self.report(err),
        }
    }

    fn toggle_current(&mut self) {
        let Some(id) = self.current_task() else {
            return;
        };
        if let Err(err) = self.tasks.toggle_complete(id) {
            self.report(err);
        }
    }

    fn open_editor(&mut self) {
        let Some(task) = self.current_task().and_then(|id| self.tasks.get(id)) else {
            return;
        };
        self.mode = Mode::Editing {
            id: task.id(),
            input: TextInput::with_text(&task.title),
        };
    }

    fn remove_current(&mut self) {
        let Some(id) = self.current_task() else {
            return;
        };
        match self.tasks.remove(id) {
            Ok(_) => match self.state.selected() {
                _ if self.tasks.is_empty() => self.state.select(None),
                Some(i) => self.state.select(Some(i.min(self.tasks.len() - 1))),
                None => {}
            },
            Err(err) => self.report(err),
        }
    }

    /// Reorders the first checked task; the cursor follows it if it was on it.
    fn move_selected(&mut self, direction: Direction) {
        let Some(id) = self.tasks.find_selected().map(Task::id) else {
            self.status = Some("Check a task to move it".to_string());
            return;
        };
        let follow = self.current_task() == Some(id);
        let moved = match direction {
            Direction::Up => self.tasks.move_up(id),
            Direction::Down => self.tasks.move_down(id),
        };
        match moved {
            Ok(()) if follow => self.state.select(self.tasks.position(id)),
            Ok(()) => {}
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: TaskError) {
        warn!(error = %err, "task operation failed");
        self.status = Some(err.to_string());
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.ui.title.as_str())
            .bold()
            .centered()
            .render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.mode == Mode::Adding;
        let border = if focused {
            Style::new().fg(FOCUSED_BORDER_COLOR)
        } else {
            Style::new()
        };
        let block = Block::bordered().title(" New task ").border_style(border);
        Paragraph::new(self.input.line(&self.ui.input_hint, focused))
            .block(block)
            .render(area, buf);
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::new()
            .title(Line::raw("Tasks").centered())
            .borders(Borders::TOP)
            .border_set(symbols::border::EMPTY)
            .border_style(TODO_HEADER_STYLE)
            .bg(NORMAL_ROW_BG);

        let items: Vec<ListItem> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| ListItem::from(task).bg(alternate_colors(i)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(SELECTED_STYLE)
            .highlight_symbol(">")
            .highlight_spacing(HighlightSpacing::Always);

        // Both `Widget` and `StatefulWidget` define `render`.
        StatefulWidget::render(list, area, buf, &mut self.state);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if let Some(status) = &self.status {
            Paragraph::new(Span::styled(status.as_str(), Style::new().fg(ERROR_FG_COLOR)))
                .render(area, buf);
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let hints: &[(&str, &str)] = match self.mode {
            Mode::Normal => &[
                ("a", "add"),
                ("space", "check"),
                ("e", "edit"),
                ("d", "delete"),
                ("K/J", "move"),
                ("q", "quit"),
            ],
            Mode::Adding => &[("enter", "add"), ("esc", "done")],
            Mode::Editing { .. } => &[("enter", "save"), ("esc", "cancel")],
        };
        let spans: Vec<Span> = hints
            .iter()
            .flat_map(|(key, action)| [format!(" <{key}>").blue().bold(), format!(" {action}").into()])
            .collect();
        Paragraph::new(Line::from(spans)).centered().render(area, buf);
    }

    fn render_edit_popup(&self, area: Rect, buf: &mut Buffer) {
        let Mode::Editing { input, .. } = &self.mode else {
            return;
        };
        let popup = centered_rect(area, EDIT_POPUP_WIDTH, EDIT_POPUP_HEIGHT);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(Line::raw(" Edit Task ").centered())
            .border_style(Style::new().fg(FOCUSED_BORDER_COLOR));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let [_, input_area, _, hint_area, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        Paragraph::new(input.line("", true)).render(input_area, buf);
        Paragraph::new(Line::from(vec![
            "[Enter]".yellow(),
            " Save  ".into(),
            "[Esc]".yellow(),
            " Cancel".into(),
        ]))
        .centered()
        .render(hint_area, buf);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [header_area, input_area, list_area, status_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(header_area, buf);
        self.render_input(input_area, buf);
        self.render_list(list_area, buf);
        self.render_status(status_area, buf);
        self.render_footer(footer_area, buf);
        self.render_edit_popup(area, buf);
    }
}

impl From<&Task> for ListItem<'_> {
    fn from(value: &Task) -> Self {
        let line = if value.completed {
            Line::styled(format!(" [x] {}", value.title), COMPLETED_TEXT_FG_COLOR)
        } else {
            Line::styled(format!(" [ ] {}", value.title), TEXT_FG_COLOR)
        };
        ListItem::new(line)
    }
}
