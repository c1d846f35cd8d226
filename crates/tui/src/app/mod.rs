mod forms;
mod tasks;

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use crossterm::event::{self, Event, KeyEvent};
use flow_browser::{
    BrowserError, CapitalFlowPage, CoarseType, DateRange, FetchTicket, FilterPatch, PageOptions,
    QuickDate,
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use forms::{DialogField, DialogForm, RangeField, RangeForm};
use tasks::{Completion, ModalConfirm, Tasks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Keyword,
    Range,
    Dialog,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
}

/// Open delete confirmation. The reply goes to the running delete task.
#[derive(Debug)]
pub struct ConfirmState {
    pub id: i64,
    pub label: String,
    reply: Option<oneshot::Sender<bool>>,
}

impl ConfirmState {
    /// The operator confirmed and the delete is running.
    pub fn answered(&self) -> bool {
        self.reply.is_none()
    }
}

#[derive(Debug)]
pub struct AppState {
    pub page: CapitalFlowPage,
    pub selected: usize,
    pub editing_keyword: bool,
    pub range_form: Option<RangeForm>,
    pub dialog: Option<DialogForm>,
    pub confirm: Option<ConfirmState>,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

impl AppState {
    pub fn mode(&self) -> Mode {
        if self.confirm.is_some() {
            Mode::Confirm
        } else if self.page.filters().dialog_open {
            Mode::Dialog
        } else if self.range_form.is_some() {
            Mode::Range
        } else if self.editing_keyword {
            Mode::Keyword
        } else {
            Mode::List
        }
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.page.table().rows().get(self.selected).map(|row| row.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.page.table().rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
        });
    }
}

pub struct App {
    tasks: Tasks,
    completions: mpsc::UnboundedReceiver<Completion>,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let (tasks, completions) = Tasks::new(client);
        let page = CapitalFlowPage::new(PageOptions {
            timezone: config.timezone()?,
            page_size: config.page_size,
        });

        Ok(Self {
            tasks,
            completions,
            state: AppState {
                page,
                selected: 0,
                editing_keyword: false,
                range_form: None,
                dialog: None,
                confirm: None,
                toast: None,
                base_url: config.base_url.clone(),
            },
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tasks.load_categories();
        let ticket = self.state.page.mount(self.today());
        self.launch(ticket);

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            self.drain_completions();

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn today(&self) -> NaiveDate {
        Utc::now()
            .with_timezone(&self.state.page.timezone())
            .date_naive()
    }

    fn launch(&self, ticket: Option<FetchTicket>) {
        if let Some(ticket) = ticket {
            self.tasks.fetch(ticket);
        }
    }

    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions.try_recv() {
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Categories(result) => {
                if let Err(err) = &result {
                    self.state
                        .notify(ToastLevel::Error, format!("Categories unavailable: {err}"));
                }
                self.state.page.categories_loaded(result);
            }
            Completion::Fetch { seq, result } => {
                match self.state.page.fetch_settled(seq, result) {
                    Ok(true) => {
                        self.state.clamp_selection();
                        if matches!(self.state.toast, Some(ToastState { level: ToastLevel::Error, .. })) {
                            self.state.toast = None;
                        }
                    }
                    Ok(false) => {}
                    Err(err) => self.report(&err),
                }
            }
            Completion::Delete(outcome) => {
                self.state.confirm = None;
                match self.state.page.delete_settled(outcome) {
                    Ok(Some(ticket)) => {
                        self.state.notify(ToastLevel::Success, "Record deleted.");
                        self.tasks.fetch(ticket);
                    }
                    Ok(None) => {}
                    Err(err) => self.report(&err),
                }
            }
            Completion::Saved(Ok(())) => {
                self.state.dialog = None;
                let ticket = self.state.page.dialog_succeeded();
                self.launch(ticket);
                self.state.notify(ToastLevel::Success, "Record saved.");
            }
            Completion::Saved(Err(failure)) => {
                let err = BrowserError::Mutation(failure);
                tracing::warn!("save failed: {err}");
                if let Some(dialog) = self.state.dialog.as_mut() {
                    dialog.saving = false;
                    dialog.error = Some(err.to_string());
                }
            }
        }
    }

    fn report(&mut self, err: &BrowserError) {
        if err.is_surfaced() {
            self.state.notify(ToastLevel::Error, err.to_string());
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.mode() {
            Mode::Confirm => self.handle_confirm(action),
            Mode::Dialog => self.handle_dialog(action),
            Mode::Range => self.handle_range(action),
            Mode::Keyword => self.handle_keyword(action),
            Mode::List => self.handle_list(action),
        }
    }

    fn handle_list(&mut self, action: AppAction) {
        let today = self.today();
        match action {
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Up | AppAction::Input('k') => {
                self.state.selected = self.state.selected.saturating_sub(1);
            }
            AppAction::Down | AppAction::Input('j') => {
                self.state.selected += 1;
                self.state.clamp_selection();
            }
            AppAction::Right | AppAction::Input('n') => {
                let ticket = self.state.page.next_page();
                self.launch(ticket);
            }
            AppAction::Left | AppAction::Input('p') => {
                let ticket = self.state.page.prev_page();
                self.launch(ticket);
            }
            AppAction::Input('c') => {
                let current = self.state.page.filters().category_id;
                let next = self.state.page.catalog().next_after(current);
                self.apply_patch(FilterPatch::new().category_id(next));
            }
            AppAction::Input('y') => {
                if self.state.page.filters().category_id.is_some() {
                    self.state
                        .notify(ToastLevel::Info, "Clear the category to filter by type.");
                    return;
                }
                let next = match self.state.page.filters().coarse_type {
                    None => Some(CoarseType::Income),
                    Some(CoarseType::Income) => Some(CoarseType::Expense),
                    Some(CoarseType::Expense) => None,
                };
                self.apply_patch(FilterPatch::new().coarse_type(next));
            }
            AppAction::Input(ch @ ('[' | ']')) => {
                let delta = if ch == '[' { -1 } else { 1 };
                let range = self
                    .state
                    .page
                    .filters()
                    .date_range
                    .map_or_else(|| DateRange::month_of(today), |r| r.shifted_month(delta));
                self.apply_patch(FilterPatch::new().date_range(Some(range)));
            }
            AppAction::Input('1') => {
                let ticket = self.state.page.quick_date(QuickDate::Today, today);
                self.launch(ticket);
            }
            AppAction::Input('2') => {
                let ticket = self.state.page.quick_date(QuickDate::Yesterday, today);
                self.launch(ticket);
            }
            AppAction::Input('/') => self.state.editing_keyword = true,
            AppAction::Input('g') => {
                let range = self.state.page.filters().date_range;
                self.state.range_form = Some(RangeForm::from_range(range));
            }
            AppAction::Submit | AppAction::Input('r') => self.search(),
            AppAction::Input('R') => match self.state.page.refresh() {
                Ok(ticket) => self.tasks.fetch(ticket),
                Err(err) => self.state.notify(ToastLevel::Info, err.to_string()),
            },
            AppAction::Input('x') => {
                let ticket = self.state.page.reset(today);
                self.state.selected = 0;
                self.launch(ticket);
            }
            AppAction::Input('a') => {
                self.state.page.open_create();
                let now = Utc::now().with_timezone(&self.state.page.timezone());
                self.state.dialog = Some(DialogForm::for_create(self.state.page.catalog(), now));
            }
            AppAction::Input('e') => self.open_edit(),
            AppAction::Input('d') => self.request_delete(),
            _ => {}
        }
    }

    fn handle_keyword(&mut self, action: AppAction) {
        let mut keyword = self.state.page.filters().search_keyword.clone();
        match action {
            AppAction::Input(ch) => {
                keyword.push(ch);
                self.state.page.set_keyword(keyword);
            }
            AppAction::Backspace => {
                keyword.pop();
                self.state.page.set_keyword(keyword);
            }
            AppAction::Submit => {
                self.state.editing_keyword = false;
                self.search();
            }
            AppAction::Cancel => self.state.editing_keyword = false,
            _ => {}
        }
    }

    fn handle_range(&mut self, action: AppAction) {
        let Some(form) = self.state.range_form.as_mut() else {
            return;
        };
        match action {
            AppAction::Input(ch) => form.active_field_mut().push(ch),
            AppAction::Backspace => {
                form.active_field_mut().pop();
            }
            AppAction::NextField | AppAction::Up | AppAction::Down => form.next_field(),
            AppAction::Submit => match form.parse() {
                Ok(range) => {
                    self.state.range_form = None;
                    self.apply_patch(FilterPatch::new().date_range(range));
                }
                Err(message) => form.error = Some(message),
            },
            AppAction::Cancel => self.state.range_form = None,
            _ => {}
        }
    }

    fn handle_dialog(&mut self, action: AppAction) {
        let tz = self.state.page.timezone();
        let Some(form) = self.state.dialog.as_mut() else {
            self.state.page.dialog_cancelled();
            return;
        };
        if form.saving {
            return;
        }

        match action {
            AppAction::Input(ch) => {
                if let Some(text) = form.active_text_mut() {
                    text.push(ch);
                }
            }
            AppAction::Backspace => {
                if let Some(text) = form.active_text_mut() {
                    text.pop();
                }
            }
            AppAction::Left | AppAction::Right if form.focus == DialogField::Category => {
                form.cycle_category(self.state.page.catalog(), action == AppAction::Right);
            }
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::Submit => match form.to_draft(tz) {
                Ok(draft) => {
                    form.saving = true;
                    form.error = None;
                    self.tasks.save(form.record_id, draft);
                }
                Err(message) => form.error = Some(message),
            },
            AppAction::Cancel => {
                self.state.dialog = None;
                self.state.page.dialog_cancelled();
            }
            _ => {}
        }
    }

    fn handle_confirm(&mut self, action: AppAction) {
        let Some(confirm) = self.state.confirm.as_mut() else {
            return;
        };
        let Some(reply) = confirm.reply.take() else {
            // Already confirmed; Esc hides the modal, the outcome still arrives.
            if action == AppAction::Cancel {
                self.state.confirm = None;
            }
            return;
        };

        let answer = match action {
            AppAction::Input('y') | AppAction::Submit => true,
            AppAction::Input('n') | AppAction::Cancel => false,
            _ => {
                confirm.reply = Some(reply);
                return;
            }
        };
        // The task may already be gone; its outcome arrives either way.
        let _ = reply.send(answer);
        if !answer {
            self.state.confirm = None;
        }
    }

    fn apply_patch(&mut self, patch: FilterPatch) {
        let ticket = self.state.page.update_filters(patch);
        if ticket.is_some() {
            self.state.selected = 0;
        }
        self.launch(ticket);
    }

    fn search(&mut self) {
        match self.state.page.search() {
            Ok(ticket) => {
                self.state.selected = 0;
                self.tasks.fetch(ticket);
            }
            Err(err) => self.state.notify(ToastLevel::Info, err.to_string()),
        }
    }

    fn open_edit(&mut self) {
        let Some(id) = self.state.selected_id() else {
            return;
        };
        match self.state.page.open_edit(id) {
            Ok(()) => {
                self.state.dialog = self
                    .state
                    .page
                    .filters()
                    .active_record
                    .as_ref()
                    .map(DialogForm::for_edit);
            }
            Err(err) => self.report(&err),
        }
    }

    fn request_delete(&mut self) {
        let Some(id) = self.state.selected_id() else {
            return;
        };
        match self.state.page.request_delete(id) {
            Ok(Some(id)) => {
                let label = self
                    .state
                    .page
                    .table()
                    .find(id)
                    .map(|row| format!("{} {} {}", row.display_date, row.category_name, row.display_amount))
                    .unwrap_or_default();
                let (tx, rx) = oneshot::channel();
                self.state.confirm = Some(ConfirmState {
                    id,
                    label,
                    reply: Some(tx),
                });
                self.tasks.delete(id, ModalConfirm(rx));
            }
            Ok(None) => self
                .state
                .notify(ToastLevel::Info, "A delete is already in progress."),
            Err(err) => self.report(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        App::new(&AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn keyword_editing_captures_letters() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state.mode(), Mode::Keyword);

        for ch in "qa".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);

        assert!(!app.should_quit);
        assert_eq!(app.state.mode(), Mode::List);
        assert_eq!(app.state.page.filters().search_keyword, "qx");

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn range_editor_reports_bad_input_and_applies_good_input() {
        let mut app = app();
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.state.mode(), Mode::Range);

        for ch in "2026-10-01".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.state.range_form.as_ref().unwrap().error.is_some());

        press(&mut app, KeyCode::Tab);
        for ch in "2026-10-05".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state.mode(), Mode::List);
        let range = app.state.page.filters().date_range.unwrap();
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
        assert!(matches!(app.state.page.status(), flow_browser::FetchStatus::Fetching));
    }

    fn open_confirm(app: &mut App) -> oneshot::Receiver<bool> {
        let (tx, rx) = oneshot::channel();
        app.state.confirm = Some(ConfirmState {
            id: 3,
            label: "2026-10-05 12:00 Groceries -10.00".to_string(),
            reply: Some(tx),
        });
        rx
    }

    #[tokio::test]
    async fn declining_delete_closes_modal_at_once() {
        let mut app = app();
        let mut rx = open_confirm(&mut app);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state.mode(), Mode::Confirm);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(rx.try_recv(), Ok(false));
        assert!(app.state.confirm.is_none());
        assert_eq!(app.state.mode(), Mode::List);
    }

    #[tokio::test]
    async fn confirmed_delete_can_be_dismissed_while_running() {
        let mut app = app();
        let mut rx = open_confirm(&mut app);

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(rx.try_recv(), Ok(true));
        assert!(app.state.confirm.as_ref().unwrap().answered());

        press(&mut app, KeyCode::Esc);
        assert!(app.state.confirm.is_none());
    }

    #[tokio::test]
    async fn failed_save_keeps_dialog_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state.mode(), Mode::Dialog);

        app.apply_completion(Completion::Saved(Err(flow_browser::RemoteFailure::Rejected(
            "price required".to_string(),
        ))));
        assert_eq!(app.state.mode(), Mode::Dialog);
        let error = app.state.dialog.as_ref().unwrap().error.clone().unwrap();
        assert!(error.contains("price required"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.mode(), Mode::List);
        assert!(app.state.dialog.is_none());
    }
}
