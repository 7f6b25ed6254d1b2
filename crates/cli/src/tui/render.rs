use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use rstnav_core::browser::{Browser, Column, DetailPane, DetailView, Entry, EntryList, Mode};

/// Styles used by every view; passed down explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Style,
    pub border_focused: Style,
    pub title: Style,
    pub selected: Style,
    pub selected_inactive: Style,
    pub muted: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Style::new().fg(Color::DarkGray),
            border_focused: Style::new().fg(Color::LightBlue),
            title: Style::new().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
            selected: Style::new()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            selected_inactive: Style::new().add_modifier(Modifier::REVERSED),
            muted: Style::new().fg(Color::Gray),
            error: Style::new().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        }
    }
}

pub fn draw(frame: &mut Frame, browser: &Browser, theme: &Theme) {
    let [main, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match (browser.mode(), browser.detail()) {
        (Mode::Detail, Some(view)) => draw_detail(frame, main, view, browser.stack_depth(), theme),
        _ => draw_overview(frame, main, browser, theme),
    }
    draw_status(frame, status, browser, theme);
}

fn draw_overview(frame: &mut Frame, area: Rect, browser: &Browser, theme: &Theme) {
    let [repos, files, symbols] = Layout::horizontal([
        Constraint::Percentage(20),
        Constraint::Percentage(40),
        Constraint::Percentage(40),
    ])
    .areas(area);

    let active = browser.active();
    draw_list(
        frame,
        repos,
        "Repositories",
        browser.repos(),
        active == Column::Repositories,
        theme,
    );
    draw_list(frame, files, "Files", browser.files(), active == Column::Files, theme);
    draw_list(
        frame,
        symbols,
        "Symbols",
        browser.symbols(),
        active == Column::Symbols,
        theme,
    );
}

fn draw_detail(frame: &mut Frame, area: Rect, view: &DetailView, depth: usize, theme: &Theme) {
    let [header, body, edges] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(8),
    ])
    .areas(area);

    let detail = &view.detail;
    let mut location = format!("{}:{}  [{}]", detail.file, detail.line, detail.kind);
    if depth > 0 {
        location.push_str(&format!("  (depth {})", depth));
    }
    let header_text = vec![
        Line::styled(detail.signature.clone(), theme.title),
        Line::styled(location, theme.muted),
    ];
    frame.render_widget(
        Paragraph::new(header_text).block(bordered(&detail.name, false, theme)),
        header,
    );

    let code = detail
        .code
        .clone()
        .unwrap_or_else(|| "(no body extracted)".to_string());
    let scroll = u16::try_from(view.scroll).unwrap_or(u16::MAX);
    frame.render_widget(
        Paragraph::new(code)
            .scroll((scroll, 0))
            .block(bordered("Body", view.focus == DetailPane::Body, theme)),
        body,
    );

    let [dependencies, references] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(edges);
    draw_list(
        frame,
        dependencies,
        "Dependencies (r)",
        &view.dependencies,
        view.focus == DetailPane::Dependencies,
        theme,
    );
    draw_list(
        frame,
        references,
        "References (R)",
        &view.references,
        view.focus == DetailPane::References,
        theme,
    );
}

fn draw_status(frame: &mut Frame, area: Rect, browser: &Browser, theme: &Theme) {
    let line = match browser.status() {
        Some(error) => Line::styled(format!("Error: {}", error), theme.error),
        None => {
            let hints = match browser.mode() {
                Mode::Overview => "h/l focus  j/k move  enter open  q quit",
                Mode::Detail => "j/k move  gg/G top/bottom  r/R/tab focus  l jump  h back  q close",
            };
            Line::styled(hints, theme.muted)
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn bordered<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .title(Span::styled(title, theme.title))
        .border_style(if focused {
            theme.border_focused
        } else {
            theme.border
        })
}

fn entry_item<'a>(entry: &'a Entry, theme: &Theme) -> ListItem<'a> {
    match entry {
        Entry::Repo { name } => ListItem::new(name.as_str()),
        Entry::File { path } => ListItem::new(path.as_str()),
        Entry::Symbol {
            name,
            signature,
            line,
            ..
        } => ListItem::new(vec![
            Line::from(name.as_str()),
            Line::styled(format!("  {} (line {})", signature, line), theme.muted),
        ]),
        Entry::RefEdge { name, file, .. } => {
            let mut spans = vec![Span::raw(name.as_str())];
            if let Some(file) = file {
                spans.push(Span::styled(format!("  {}", file), theme.muted));
            }
            ListItem::new(Line::from(spans))
        }
    }
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    list: &EntryList,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem> = list
        .entries()
        .iter()
        .map(|entry| entry_item(entry, theme))
        .collect();
    let widget = List::new(items)
        .block(bordered(title, focused, theme))
        .highlight_style(if focused {
            theme.selected
        } else {
            theme.selected_inactive
        })
        .highlight_symbol("> ");

    let selected = (!list.is_empty()).then_some(list.selected_index());
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(widget, area, &mut state);
}
