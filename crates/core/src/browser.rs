//! Two-mode navigation state machine behind the terminal browser.
//!
//! The browser never touches the disk itself. Every user [`Action`] and every
//! completed [`LoadResult`] updates the state and yields an [`Effect`]; at most
//! one [`LoadRequest`] is issued per step. Loads are executed by the caller
//! (usually off the UI thread) with [`LoadRequest::execute`].

use crate::error::RstError;
use crate::query::{QueryEngine, SymbolDetail, SymbolSummary};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Overview,
    Detail,
}

/// Overview columns, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Column {
    Repositories,
    Files,
    Symbols,
}

impl Column {
    pub fn index(self) -> usize {
        self as usize
    }

    fn left(self) -> Self {
        match self {
            Column::Repositories | Column::Files => Column::Repositories,
            Column::Symbols => Column::Files,
        }
    }

    fn right(self) -> Self {
        match self {
            Column::Repositories => Column::Files,
            Column::Files | Column::Symbols => Column::Symbols,
        }
    }
}

/// Sub-pane focus in detail mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPane {
    Body,
    Dependencies,
    References,
}

impl DetailPane {
    fn next(self) -> Self {
        match self {
            DetailPane::Body => DetailPane::Dependencies,
            DetailPane::Dependencies => DetailPane::References,
            DetailPane::References => DetailPane::Body,
        }
    }
}

/// A row in one of the browser's lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Repo {
        name: String,
    },
    File {
        path: String,
    },
    Symbol {
        id: String,
        name: String,
        signature: String,
        line: u32,
    },
    RefEdge {
        id: String,
        name: String,
        file: Option<String>,
    },
}

impl Entry {
    pub fn label(&self) -> &str {
        match self {
            Entry::Repo { name } => name,
            Entry::File { path } => path,
            Entry::Symbol { name, .. } => name,
            Entry::RefEdge { name, .. } => name,
        }
    }
}

impl From<SymbolSummary> for Entry {
    fn from(summary: SymbolSummary) -> Self {
        Entry::Symbol {
            id: summary.id,
            name: summary.name,
            signature: summary.signature,
            line: summary.line,
        }
    }
}

/// A list with a clamped selection cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<Entry>,
    selected: usize,
}

impl EntryList {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            selected: 0,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    fn replace(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.selected = 0;
    }

    fn clear(&mut self) {
        self.replace(Vec::new());
    }

    fn move_by(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    fn first(&mut self) {
        self.selected = 0;
    }

    fn last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }
}

/// A loaded symbol detail plus the view state of its panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub detail: SymbolDetail,
    pub focus: DetailPane,
    /// First visible line of the body.
    pub scroll: usize,
    pub dependencies: EntryList,
    pub references: EntryList,
}

impl DetailView {
    fn new(detail: SymbolDetail) -> Self {
        let edges = |relations: &[crate::query::Relation]| {
            EntryList::new(
                relations
                    .iter()
                    .map(|r| Entry::RefEdge {
                        id: r.id.clone(),
                        name: r.name.clone(),
                        file: r.file.clone(),
                    })
                    .collect(),
            )
        };
        Self {
            dependencies: edges(&detail.dependencies),
            references: edges(&detail.references),
            detail,
            focus: DetailPane::Body,
            scroll: 0,
        }
    }

    fn body_lines(&self) -> usize {
        self.detail.code.as_deref().map_or(0, |code| code.lines().count())
    }

    fn move_by(&mut self, delta: isize) {
        match self.focus {
            DetailPane::Body => {
                let max_scroll = self.body_lines().saturating_sub(1);
                self.scroll = self.scroll.saturating_add_signed(delta).min(max_scroll);
            }
            DetailPane::Dependencies => self.dependencies.move_by(delta),
            DetailPane::References => self.references.move_by(delta),
        }
    }

    fn top(&mut self) {
        match self.focus {
            DetailPane::Body => self.scroll = 0,
            DetailPane::Dependencies => self.dependencies.first(),
            DetailPane::References => self.references.first(),
        }
    }

    fn bottom(&mut self) {
        match self.focus {
            DetailPane::Body => self.scroll = self.body_lines().saturating_sub(1),
            DetailPane::Dependencies => self.dependencies.last(),
            DetailPane::References => self.references.last(),
        }
    }

    fn selected_edge(&self) -> Option<&str> {
        let list = match self.focus {
            DetailPane::Body => return None,
            DetailPane::Dependencies => &self.dependencies,
            DetailPane::References => &self.references,
        };
        match list.selected()? {
            Entry::RefEdge { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// User intents, already decoded from raw key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Close,
    FocusDependencies,
    FocusReferences,
    CycleFocus,
    Top,
    Bottom,
    Quit,
}

/// Where a detail load was started from; results are only applied while the
/// browser is still in the matching mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOrigin {
    Overview,
    Jump,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Repositories,
    Files {
        repo: String,
    },
    Symbols {
        repo: String,
        file: String,
    },
    /// Symbols are always opened by their exact id.
    Detail {
        repo: String,
        id: String,
        origin: DetailOrigin,
    },
}

#[derive(Debug)]
pub enum LoadResult {
    Repositories(Result<Vec<String>, RstError>),
    Files {
        repo: String,
        result: Result<Vec<String>, RstError>,
    },
    Symbols {
        repo: String,
        file: String,
        result: Result<Vec<SymbolSummary>, RstError>,
    },
    Detail {
        origin: DetailOrigin,
        result: Result<SymbolDetail, RstError>,
    },
}

impl LoadRequest {
    /// Runs the request against the index. Blocking.
    pub fn execute(self, engine: &QueryEngine) -> LoadResult {
        match self {
            LoadRequest::Repositories => LoadResult::Repositories(engine.repositories()),
            LoadRequest::Files { repo } => {
                let result = engine.list_files(&repo);
                LoadResult::Files { repo, result }
            }
            LoadRequest::Symbols { repo, file } => {
                let result = engine.list_symbols(&repo, &file);
                LoadResult::Symbols { repo, file, result }
            }
            LoadRequest::Detail { repo, id, origin } => LoadResult::Detail {
                origin,
                result: engine.symbol_by_id(&repo, &id),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Load(LoadRequest),
    Quit,
}

fn selected_repo_name(repos: &EntryList) -> Option<&str> {
    match repos.selected()? {
        Entry::Repo { name } => Some(name),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browser {
    mode: Mode,
    active: Column,
    repos: EntryList,
    files: EntryList,
    symbols: EntryList,
    detail: Option<DetailView>,
    stack: Vec<DetailView>,
    status: Option<String>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Overview,
            active: Column::Repositories,
            repos: EntryList::default(),
            files: EntryList::default(),
            symbols: EntryList::default(),
            detail: None,
            stack: Vec::new(),
            status: None,
        }
    }

    /// The first load: the repository list.
    pub fn start(&self) -> Effect {
        Effect::Load(LoadRequest::Repositories)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active(&self) -> Column {
        self.active
    }

    pub fn repos(&self) -> &EntryList {
        &self.repos
    }

    pub fn files(&self) -> &EntryList {
        &self.files
    }

    pub fn symbols(&self) -> &EntryList {
        &self.symbols
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Last load error, cleared by the next user action.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn selected_repo(&self) -> Option<&str> {
        selected_repo_name(&self.repos)
    }

    fn selected_file(&self) -> Option<&str> {
        match self.files.selected()? {
            Entry::File { path } => Some(path),
            _ => None,
        }
    }

    fn load_files(&self) -> Effect {
        match self.selected_repo() {
            Some(repo) => Effect::Load(LoadRequest::Files {
                repo: repo.to_string(),
            }),
            None => Effect::None,
        }
    }

    fn load_symbols(&self) -> Effect {
        match (self.selected_repo(), self.selected_file()) {
            (Some(repo), Some(file)) => Effect::Load(LoadRequest::Symbols {
                repo: repo.to_string(),
                file: file.to_string(),
            }),
            _ => Effect::None,
        }
    }

    /// Reloads the column that depends on the active one.
    fn sync_active(&self) -> Effect {
        match self.active {
            Column::Repositories => self.load_files(),
            Column::Files => self.load_symbols(),
            Column::Symbols => Effect::None,
        }
    }

    fn open_selected_symbol(&self) -> Effect {
        let Some(repo) = self.selected_repo() else {
            return Effect::None;
        };
        match self.symbols.selected() {
            Some(Entry::Symbol { id, .. }) => Effect::Load(LoadRequest::Detail {
                repo: repo.to_string(),
                id: id.clone(),
                origin: DetailOrigin::Overview,
            }),
            _ => Effect::None,
        }
    }

    pub fn update(&mut self, action: Action) -> Effect {
        self.status = None;
        if action == Action::Quit {
            return Effect::Quit;
        }
        match self.mode {
            Mode::Overview => self.update_overview(action),
            Mode::Detail => self.update_detail(action),
        }
    }

    fn update_overview(&mut self, action: Action) -> Effect {
        match action {
            Action::Up | Action::Down => {
                let delta = if action == Action::Up { -1 } else { 1 };
                match self.active {
                    Column::Repositories => self.repos.move_by(delta),
                    Column::Files => self.files.move_by(delta),
                    Column::Symbols => self.symbols.move_by(delta),
                }
                self.sync_active()
            }
            Action::Left => {
                self.active = self.active.left();
                self.sync_active()
            }
            Action::Right | Action::Confirm if self.active == Column::Symbols => {
                self.open_selected_symbol()
            }
            Action::Right | Action::Confirm => {
                self.active = self.active.right();
                self.sync_active()
            }
            _ => Effect::None,
        }
    }

    fn update_detail(&mut self, action: Action) -> Effect {
        let Some(view) = self.detail.as_mut() else {
            self.mode = Mode::Overview;
            return Effect::None;
        };
        match action {
            Action::Up => view.move_by(-1),
            Action::Down => view.move_by(1),
            Action::Top => view.top(),
            Action::Bottom => view.bottom(),
            Action::FocusDependencies => view.focus = DetailPane::Dependencies,
            Action::FocusReferences => view.focus = DetailPane::References,
            Action::CycleFocus => view.focus = view.focus.next(),
            Action::Right | Action::Confirm => {
                let (Some(repo), Some(id)) = (selected_repo_name(&self.repos), view.selected_edge())
                else {
                    return Effect::None;
                };
                return Effect::Load(LoadRequest::Detail {
                    repo: repo.to_string(),
                    id: id.to_string(),
                    origin: DetailOrigin::Jump,
                });
            }
            Action::Left | Action::Back => match self.stack.pop() {
                Some(previous) => self.detail = Some(previous),
                None => self.leave_detail(),
            },
            Action::Close => {
                self.stack.clear();
                self.leave_detail();
            }
            Action::Quit => return Effect::Quit,
        }
        Effect::None
    }

    fn leave_detail(&mut self) {
        self.mode = Mode::Overview;
        self.detail = None;
        self.active = Column::Symbols;
    }

    /// Applies a finished load; stale results are dropped.
    pub fn apply(&mut self, result: LoadResult) -> Effect {
        match result {
            LoadResult::Repositories(Ok(repos)) => {
                self.repos
                    .replace(repos.into_iter().map(|name| Entry::Repo { name }).collect());
                if self.repos.is_empty() {
                    self.files.clear();
                    self.symbols.clear();
                }
                self.load_files()
            }
            LoadResult::Files { repo, result } => {
                if self.selected_repo() != Some(repo.as_str()) {
                    debug!("dropping stale file list for {}", repo);
                    return Effect::None;
                }
                match result {
                    Ok(files) => {
                        self.files
                            .replace(files.into_iter().map(|path| Entry::File { path }).collect());
                        if self.files.is_empty() {
                            self.symbols.clear();
                        }
                        self.load_symbols()
                    }
                    Err(e) => self.fail(e),
                }
            }
            LoadResult::Symbols { repo, file, result } => {
                if self.selected_repo() != Some(repo.as_str())
                    || self.selected_file() != Some(file.as_str())
                {
                    debug!("dropping stale symbol list for {}", file);
                    return Effect::None;
                }
                match result {
                    Ok(symbols) => {
                        self.symbols
                            .replace(symbols.into_iter().map(Entry::from).collect());
                        Effect::None
                    }
                    Err(e) => self.fail(e),
                }
            }
            LoadResult::Detail { origin, result } => {
                let detail = match result {
                    Ok(detail) => detail,
                    Err(e) => return self.fail(e),
                };
                match (origin, self.mode) {
                    (DetailOrigin::Overview, Mode::Overview) => {
                        self.stack.clear();
                        self.detail = Some(DetailView::new(detail));
                        self.mode = Mode::Detail;
                    }
                    (DetailOrigin::Jump, Mode::Detail) => {
                        if let Some(current) = self.detail.take() {
                            self.stack.push(current);
                        }
                        self.detail = Some(DetailView::new(detail));
                    }
                    _ => debug!("dropping stale symbol detail for {}", detail.name),
                }
                Effect::None
            }
            LoadResult::Repositories(Err(e)) => self.fail(e),
        }
    }

    fn fail(&mut self, error: RstError) -> Effect {
        debug!("load failed: {}", error);
        self.status = Some(error.to_string());
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SymbolKind;
    use crate::query::Relation;

    const REPO: &str = "github_com_acme_widget";
    const X: &str = "scip-go gomod m v `m/pkg`/X().";
    const Y: &str = "scip-go gomod m v `m/pkg`/Y().";

    fn summary(id: &str, line: u32) -> SymbolSummary {
        SymbolSummary {
            id: id.to_string(),
            name: crate::symbol::extract_name(id).to_string(),
            kind: SymbolKind::Function,
            signature: format!("func {}", crate::symbol::extract_name(id)),
            line,
        }
    }

    fn relation(id: &str) -> Relation {
        Relation {
            id: id.to_string(),
            name: crate::symbol::extract_name(id).to_string(),
            file: Some("pkg/a.go".to_string()),
            line: 1,
        }
    }

    fn detail(id: &str, deps: &[&str], refs: &[&str]) -> SymbolDetail {
        SymbolDetail {
            id: id.to_string(),
            name: crate::symbol::extract_name(id).to_string(),
            container: crate::symbol::extract_key(id).to_string(),
            kind: SymbolKind::Function,
            signature: format!("func {}", crate::symbol::extract_name(id)),
            documentation: None,
            file: "pkg/a.go".to_string(),
            line: 3,
            dependencies: deps.iter().map(|d| relation(d)).collect(),
            references: refs.iter().map(|r| relation(r)).collect(),
            code: Some("func X() {\n\tY()\n}".to_string()),
        }
    }

    /// A browser showing REPO / pkg/a.go / [X, Y] with the Symbols column active.
    fn loaded() -> Browser {
        let mut browser = Browser::new();
        assert_eq!(browser.start(), Effect::Load(LoadRequest::Repositories));

        let effect = browser.apply(LoadResult::Repositories(Ok(vec![REPO.to_string()])));
        assert_eq!(
            effect,
            Effect::Load(LoadRequest::Files {
                repo: REPO.to_string()
            })
        );
        let effect = browser.apply(LoadResult::Files {
            repo: REPO.to_string(),
            result: Ok(vec!["pkg/a.go".to_string(), "pkg/b.go".to_string()]),
        });
        assert_eq!(
            effect,
            Effect::Load(LoadRequest::Symbols {
                repo: REPO.to_string(),
                file: "pkg/a.go".to_string()
            })
        );
        browser.apply(LoadResult::Symbols {
            repo: REPO.to_string(),
            file: "pkg/a.go".to_string(),
            result: Ok(vec![summary(X, 3), summary(Y, 9)]),
        });

        browser.update(Action::Right);
        browser.update(Action::Right);
        assert_eq!(browser.active(), Column::Symbols);
        browser
    }

    fn open_x(browser: &mut Browser) {
        let effect = browser.update(Action::Confirm);
        assert_eq!(
            effect,
            Effect::Load(LoadRequest::Detail {
                repo: REPO.to_string(),
                id: X.to_string(),
                origin: DetailOrigin::Overview,
            })
        );
        browser.apply(LoadResult::Detail {
            origin: DetailOrigin::Overview,
            result: Ok(detail(X, &[Y], &[])),
        });
    }

    #[test]
    fn test_confirm_opens_the_selected_row_by_id() {
        let mut browser = loaded();
        let shadow = "scip-go gomod m v `m/pkg/inner`/X().";
        browser.apply(LoadResult::Symbols {
            repo: REPO.to_string(),
            file: "pkg/a.go".to_string(),
            result: Ok(vec![summary(X, 3), summary(shadow, 3)]),
        });

        browser.update(Action::Down);
        assert_eq!(
            browser.update(Action::Confirm),
            Effect::Load(LoadRequest::Detail {
                repo: REPO.to_string(),
                id: shadow.to_string(),
                origin: DetailOrigin::Overview,
            })
        );
    }

    #[test]
    fn test_columns_do_not_wrap() {
        let mut browser = loaded();
        assert_eq!(browser.update(Action::Left), Effect::Load(LoadRequest::Symbols {
            repo: REPO.to_string(),
            file: "pkg/a.go".to_string(),
        }));
        assert_eq!(browser.active(), Column::Files);
        browser.update(Action::Left);
        assert_eq!(browser.active(), Column::Repositories);
        assert_eq!(
            browser.update(Action::Left),
            Effect::Load(LoadRequest::Files {
                repo: REPO.to_string()
            })
        );
        assert_eq!(browser.active(), Column::Repositories);
    }

    #[test]
    fn test_moving_in_files_reloads_symbols() {
        let mut browser = loaded();
        browser.update(Action::Left);
        let effect = browser.update(Action::Down);
        assert_eq!(
            effect,
            Effect::Load(LoadRequest::Symbols {
                repo: REPO.to_string(),
                file: "pkg/b.go".to_string()
            })
        );
        // clamped at the end of the list
        browser.update(Action::Down);
        assert_eq!(browser.files().selected_index(), 1);
        assert_eq!(browser.update(Action::Down), effect);
    }

    #[test]
    fn test_moving_in_symbols_loads_nothing() {
        let mut browser = loaded();
        assert_eq!(browser.update(Action::Down), Effect::None);
        assert_eq!(browser.symbols().selected_index(), 1);
    }

    #[test]
    fn test_confirm_enters_detail_with_body_focus() {
        let mut browser = loaded();
        open_x(&mut browser);

        assert_eq!(browser.mode(), Mode::Detail);
        let view = browser.detail().unwrap();
        assert_eq!(view.focus, DetailPane::Body);
        assert_eq!(view.detail.id, X);
        assert_eq!(view.dependencies.entries()[0].label(), "Y");
    }

    #[test]
    fn test_back_with_empty_stack_returns_to_symbols() {
        let mut browser = loaded();
        browser.update(Action::Left);
        browser.update(Action::Right);
        open_x(&mut browser);

        assert_eq!(browser.update(Action::Back), Effect::None);
        assert_eq!(browser.mode(), Mode::Overview);
        assert_eq!(browser.active(), Column::Symbols);
        assert!(browser.detail().is_none());
    }

    #[test]
    fn test_jump_and_back_restores_identical_detail() {
        let mut browser = loaded();
        open_x(&mut browser);
        browser.update(Action::Down);
        let before = browser.detail().unwrap().clone();

        browser.update(Action::FocusDependencies);
        let effect = browser.update(Action::Confirm);
        assert_eq!(
            effect,
            Effect::Load(LoadRequest::Detail {
                repo: REPO.to_string(),
                id: Y.to_string(),
                origin: DetailOrigin::Jump,
            })
        );
        browser.apply(LoadResult::Detail {
            origin: DetailOrigin::Jump,
            result: Ok(detail(Y, &[], &[X])),
        });
        assert_eq!(browser.detail().unwrap().detail.id, Y);
        assert_eq!(browser.stack_depth(), 1);

        browser.update(Action::Back);
        let restored = browser.detail().unwrap();
        assert_eq!(restored.detail, before.detail);
        assert_eq!(restored.scroll, before.scroll);
        assert_eq!(browser.stack_depth(), 0);
        assert_eq!(browser.mode(), Mode::Detail);
    }

    #[test]
    fn test_close_clears_stack() {
        let mut browser = loaded();
        open_x(&mut browser);
        browser.update(Action::FocusDependencies);
        browser.update(Action::Confirm);
        browser.apply(LoadResult::Detail {
            origin: DetailOrigin::Jump,
            result: Ok(detail(Y, &[], &[X])),
        });

        browser.update(Action::Close);
        assert_eq!(browser.mode(), Mode::Overview);
        assert_eq!(browser.active(), Column::Symbols);
        assert_eq!(browser.stack_depth(), 0);
    }

    #[test]
    fn test_failed_jump_keeps_current_detail() {
        let mut browser = loaded();
        open_x(&mut browser);
        browser.update(Action::FocusDependencies);
        browser.update(Action::Confirm);

        browser.apply(LoadResult::Detail {
            origin: DetailOrigin::Jump,
            result: Err(RstError::NotFound("symbol 'Y'".to_string())),
        });
        assert_eq!(browser.detail().unwrap().detail.id, X);
        assert_eq!(browser.stack_depth(), 0);
        assert_eq!(browser.status(), Some("Not found: symbol 'Y'"));

        browser.update(Action::Down);
        assert_eq!(browser.status(), None);
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut browser = loaded();
        let snapshot = browser.clone();

        browser.apply(LoadResult::Symbols {
            repo: REPO.to_string(),
            file: "pkg/b.go".to_string(),
            result: Ok(vec![summary(Y, 1)]),
        });
        browser.apply(LoadResult::Files {
            repo: "other".to_string(),
            result: Ok(vec![]),
        });
        browser.apply(LoadResult::Detail {
            origin: DetailOrigin::Jump,
            result: Ok(detail(Y, &[], &[])),
        });
        assert_eq!(browser, snapshot);
    }

    #[test]
    fn test_body_scroll_and_focus_cycle() {
        let mut browser = loaded();
        open_x(&mut browser);

        browser.update(Action::Bottom);
        assert_eq!(browser.detail().unwrap().scroll, 2);
        browser.update(Action::Down);
        assert_eq!(browser.detail().unwrap().scroll, 2);
        browser.update(Action::Top);
        assert_eq!(browser.detail().unwrap().scroll, 0);

        browser.update(Action::CycleFocus);
        assert_eq!(browser.detail().unwrap().focus, DetailPane::Dependencies);
        browser.update(Action::FocusReferences);
        assert_eq!(browser.detail().unwrap().focus, DetailPane::References);
        // no references to jump to
        assert_eq!(browser.update(Action::Confirm), Effect::None);
        browser.update(Action::CycleFocus);
        assert_eq!(browser.detail().unwrap().focus, DetailPane::Body);
    }

    #[test]
    fn test_empty_repository_list_clears_columns() {
        let mut browser = loaded();
        assert_eq!(browser.apply(LoadResult::Repositories(Ok(vec![]))), Effect::None);
        assert!(browser.files().is_empty());
        assert!(browser.symbols().is_empty());
        assert_eq!(browser.update(Action::Quit), Effect::Quit);
    }
}
