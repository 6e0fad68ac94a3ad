use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use evaldash_core::draft::TaskDraft;
use evaldash_core::{ChartPipeline, FormSession, StoreHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tasks,
    Analysis,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    ApiEndpoint,
    ApiKey,
    DatasetType,
    DatasetPath,
    Indicators,
}

impl FormField {
    const ORDER: [Self; 7] = [
        Self::Name,
        Self::Description,
        Self::ApiEndpoint,
        Self::ApiKey,
        Self::DatasetType,
        Self::DatasetPath,
        Self::Indicators,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::ApiEndpoint => "Agent endpoint",
            Self::ApiKey => "Agent API key",
            Self::DatasetType => "Dataset type",
            Self::DatasetPath => "Dataset path",
            Self::Indicators => "Indicators",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Side effect decided by key handling; executed by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RefreshTasks,
    SubmitCreate,
    StartEdit(i64),
    SubmitEdit,
    ConfirmPending,
    ViewResult(i64),
    /// Silent stats load when the system view becomes active.
    LoadStats,
    /// User-requested stats refresh, acknowledged in the footer.
    RefreshStats,
}

/// All dashboard state, owned by the event loop and passed to the
/// renderer by reference. Key handling is pure: it mutates local state
/// and returns the network action to run, if any.
pub struct DashApp {
    pub store: StoreHandle,
    pub forms: FormSession,
    pub charts: ChartPipeline,
    pub view: View,
    pub input_mode: InputMode,
    pub form_kind: Option<FormKind>,
    pub form_field: FormField,
    pub indicator_cursor: usize,
    pub selected: usize,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl DashApp {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            forms: FormSession::new(),
            charts: ChartPipeline::new(),
            view: View::Tasks,
            input_mode: InputMode::Normal,
            form_kind: None,
            form_field: FormField::Name,
            indicator_cursor: 0,
            selected: 0,
            notice: None,
            should_quit: false,
        }
    }

    pub fn set_view(&mut self, view: View) {
        if self.view == View::Analysis && view != View::Analysis {
            self.charts.view_unmounted();
        }
        self.view = view;
        self.notice = None;
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.notice = Some(Notice::Info(msg.into()));
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.notice = Some(Notice::Error(msg.into()));
    }

    pub fn selected_task_id(&self) -> Option<i64> {
        let store = self.store.lock();
        store.tasks.get(self.selected).map(|t| t.id)
    }

    fn task_count(&self) -> usize {
        self.store.lock().tasks.len()
    }

    fn indicator_count(&self) -> usize {
        self.store.lock().indicators.len()
    }

    /// The edit surface currently accepting input, if any.
    fn active_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        match self.form_kind {
            Some(FormKind::Create) => self.forms.create_draft_mut(),
            Some(FormKind::Edit) => self.forms.edit_draft_mut(),
            None => None,
        }
    }

    pub fn open_create_form(&mut self) {
        self.forms.start_create();
        self.form_kind = Some(FormKind::Create);
        self.form_field = FormField::Name;
        self.indicator_cursor = 0;
        self.input_mode = InputMode::Form;
    }

    /// Called by the loop once an edit draft has loaded.
    pub fn open_edit_form(&mut self) {
        self.form_kind = Some(FormKind::Edit);
        self.form_field = FormField::Name;
        self.indicator_cursor = 0;
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form_kind = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        if self.forms.pending_action().is_some() {
            return self.handle_confirm_key(key);
        }
        match self.input_mode {
            InputMode::Form => self.handle_form_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmPending),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.forms.dismiss_pending();
                None
            }
            _ => None,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('1') => {
                self.set_view(View::Tasks);
                None
            }
            KeyCode::Char('2') => {
                self.set_view(View::Analysis);
                None
            }
            KeyCode::Char('3') => {
                self.set_view(View::System);
                Some(Action::LoadStats)
            }
            KeyCode::Tab => {
                let next = match self.view {
                    View::Tasks => View::Analysis,
                    View::Analysis => View::System,
                    View::System => View::Tasks,
                };
                self.set_view(next);
                (next == View::System).then_some(Action::LoadStats)
            }
            _ => match self.view {
                View::Tasks => self.handle_tasks_key(key),
                View::System => self.handle_system_key(key),
                View::Analysis => None,
            },
        }
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.task_count().saturating_sub(1);
                self.selected = (self.selected + 1).min(max);
                None
            }
            KeyCode::Char('r') => Some(Action::RefreshTasks),
            KeyCode::Char('n') => {
                self.open_create_form();
                None
            }
            KeyCode::Char('e') => match self.selected_task_id() {
                Some(id) => Some(Action::StartEdit(id)),
                None => {
                    self.error("no task selected");
                    None
                }
            },
            KeyCode::Char('s') => match self.selected_task_id() {
                Some(id) => {
                    self.forms.request_start(id);
                    None
                }
                None => {
                    self.error("no task selected");
                    None
                }
            },
            KeyCode::Char('d') => match self.selected_task_id() {
                Some(id) => {
                    self.forms.request_delete(id);
                    None
                }
                None => {
                    self.error("no task selected");
                    None
                }
            },
            KeyCode::Enter | KeyCode::Char('v') => match self.selected_task_id() {
                Some(id) => Some(Action::ViewResult(id)),
                None => {
                    self.error("no task selected");
                    None
                }
            },
            _ => None,
        }
    }

    fn handle_system_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('r') => Some(Action::RefreshStats),
            _ => None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                match self.form_kind {
                    Some(FormKind::Create) => self.forms.cancel_create(),
                    Some(FormKind::Edit) => self.forms.cancel_edit(),
                    None => {}
                }
                self.close_form();
                None
            }
            KeyCode::Enter => match self.form_kind {
                Some(FormKind::Create) => Some(Action::SubmitCreate),
                Some(FormKind::Edit) => Some(Action::SubmitEdit),
                None => None,
            },
            KeyCode::Tab | KeyCode::Down => {
                self.form_field = self.form_field.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form_field = self.form_field.prev();
                None
            }
            KeyCode::Left if self.form_field == FormField::Indicators => {
                self.indicator_cursor = self.indicator_cursor.saturating_sub(1);
                None
            }
            KeyCode::Right if self.form_field == FormField::Indicators => {
                let max = self.indicator_count().saturating_sub(1);
                self.indicator_cursor = (self.indicator_cursor + 1).min(max);
                None
            }
            KeyCode::Char(' ') if self.form_field == FormField::Indicators => {
                let id = {
                    let store = self.store.lock();
                    store.indicators.get(self.indicator_cursor).map(|i| i.id)
                };
                if let Some(id) = id {
                    if let Some(draft) = self.active_draft_mut() {
                        draft.toggle_indicator(id);
                    }
                }
                None
            }
            KeyCode::Backspace => {
                let field = self.form_field;
                if let Some(draft) = self.active_draft_mut() {
                    if let Some(text) = field_mut(draft, field) {
                        text.pop();
                    }
                }
                None
            }
            KeyCode::Char(c) => {
                let field = self.form_field;
                if let Some(draft) = self.active_draft_mut() {
                    if let Some(text) = field_mut(draft, field) {
                        text.push(c);
                    }
                }
                None
            }
            _ => None,
        }
    }
}

fn field_mut(draft: &mut TaskDraft, field: FormField) -> Option<&mut String> {
    match field {
        FormField::Name => Some(&mut draft.name),
        FormField::Description => Some(&mut draft.description),
        FormField::ApiEndpoint => Some(&mut draft.api_endpoint),
        FormField::ApiKey => Some(&mut draft.api_key),
        FormField::DatasetType => Some(&mut draft.dataset_type),
        FormField::DatasetPath => Some(&mut draft.dataset_path),
        FormField::Indicators => None,
    }
}

/// Read a draft field for rendering.
pub fn field_value(draft: &TaskDraft, field: FormField) -> Option<&str> {
    match field {
        FormField::Name => Some(&draft.name),
        FormField::Description => Some(&draft.description),
        FormField::ApiEndpoint => Some(&draft.api_endpoint),
        FormField::ApiKey => Some(&draft.api_key),
        FormField::DatasetType => Some(&draft.dataset_type),
        FormField::DatasetPath => Some(&draft.dataset_path),
        FormField::Indicators => None,
    }
}
