mod account_managers;
mod assignments;
mod logins;
mod organizations;
mod session;
mod settings;
mod setup;
mod students;
mod teachers;

use std::time::{Duration, Instant};
use iced::{Subscription, Task};
use tracing::{debug, error, warn};
use crate::api::options::{fetch_level_options, LevelKind};
use crate::api::resources;
use crate::app::state::{CascadeId, DeleteTarget, Screen, Toast, ToastKind, TOAST_TTL_SECS};
use crate::cascade::{Applied, FetchRequest};
use crate::confirm::{ChallengeOutcome, DeleteChallenge};
use crate::error::ApiError;
use crate::validation::FieldErrors;
use super::{App, Message};

impl App {
    pub fn new() -> (Self, Task<Message>) {
        (Self::default(), Task::none())
    }

    pub fn title(&self) -> String {
        match &self.session {
            Some(user) => match &user.organization_name {
                Some(org) => format!("School Admin · {} · {}", org, user.name),
                None => format!("School Admin · {}", user.name),
            },
            None => "School Admin".to_string(),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.toasts.is_empty() {
            Subscription::none()
        } else {
            iced::time::every(Duration::from_secs(1)).map(Message::Tick)
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoginEmailChanged(v) => {
                self.login_email = v;
                Task::none()
            }
            Message::LoginPasswordChanged(v) => {
                self.login_password = v;
                Task::none()
            }
            Message::LoginPressed => self.sign_in(),
            Message::LoggedIn(result) => self.signed_in(result),
            Message::Logout => self.sign_out(),
            Message::Navigate(screen) => self.enter_screen(screen),
            Message::Tick(now) => {
                self.toasts
                    .retain(|t| now.duration_since(t.created) < Duration::from_secs(TOAST_TTL_SECS));
                Task::none()
            }
            Message::DismissToast(id) => {
                self.toasts.retain(|t| t.id != id);
                Task::none()
            }
            Message::CascadeSelected(id, level, value) => self.select_in_cascade(id, level, value),
            Message::CascadeOptionsLoaded(id, ticket, result) => {
                let Some(cascade) = self.cascade_mut(id) else {
                    debug!("Options for closed cascade {:?} ignored", id);
                    return Task::none();
                };
                match cascade.apply(ticket, result) {
                    Applied::Updated => self.cascade_changed(id),
                    Applied::Stale => Task::none(),
                    Applied::Failed(err) => {
                        self.report_error("Could not load options", &err);
                        Task::none()
                    }
                }
            }
            Message::RequestDelete(target, description) => {
                self.delete_challenge = Some(DeleteChallenge::roll(target, description));
                Task::none()
            }
            Message::DeleteAnswerChanged(answer) => {
                if let Some(challenge) = &mut self.delete_challenge {
                    challenge.input = answer;
                    challenge.error = None;
                }
                Task::none()
            }
            Message::ConfirmDelete => self.confirm_delete(),
            Message::CancelDelete => {
                self.delete_challenge = None;
                Task::none()
            }
            Message::Deleted(target, result) => self.deleted(target, result),
            Message::RefreshDashboard => self.load_dashboard(),
            Message::DashboardLoaded(result) => {
                self.dashboard.is_loading = false;
                match result {
                    Ok(stats) => self.dashboard.stats = Some(stats),
                    Err(err) => self.report_error("Could not load dashboard", &err),
                }
                Task::none()
            }
            // Organizations
            Message::OrgSearchChanged(v) => {
                self.organizations.search = v;
                Task::none()
            }
            Message::OrgApplyFilter => self.apply_organization_filter(),
            Message::OrgResetFilter => self.reset_organization_filter(),
            Message::OrgPageRequested(page) => self.load_organizations(page),
            Message::OrganizationsLoaded(result) => self.organizations_loaded(result),
            Message::OpenOrganizationForm(org) => self.open_organization_form(org),
            Message::CloseOrganizationForm => {
                self.organizations.form = None;
                Task::none()
            }
            Message::OrgFormFieldChanged(field, value) => {
                if let Some(form) = &mut self.organizations.form {
                    form.set(field, value);
                }
                Task::none()
            }
            Message::OrgFormManagerSelected(manager) => {
                if let Some(form) = &mut self.organizations.form {
                    form.account_manager = Some(manager);
                }
                Task::none()
            }
            Message::AccountManagerOptionsLoaded(result) => {
                match result {
                    Ok(managers) => self.organizations.account_managers = managers,
                    Err(err) => self.report_error("Could not load account managers", &err),
                }
                Task::none()
            }
            Message::SubmitOrganization => self.submit_organization(),
            Message::OrganizationSaved(result) => self.organization_saved(result),
            Message::ToggleOrganizationStatus(id) => self.toggle_organization_status(id),
            Message::OrganizationStatusToggled(result) => match result {
                Ok(()) => {
                    self.toast(ToastKind::Success, "Organization status updated.");
                    self.load_organizations(self.organizations.pagination.current_page)
                }
                Err(err) => {
                    self.report_error("Could not change organization status", &err);
                    Task::none()
                }
            },
            // Setup
            Message::SetupFieldChanged(field, value) => {
                self.setup.set(field, value);
                Task::none()
            }
            Message::CreateStructure(kind) => self.create_structure(kind),
            Message::StructureCreated(kind, result) => self.structure_created(kind, result),
            Message::SubjectsLoaded(department_id, result) => self.subjects_loaded(department_id, result),
            // Logins
            Message::LoginTypeSelected(login_type) => self.select_login_type(login_type),
            Message::LoginFieldChanged(field, value) => {
                self.logins.set(field, value);
                Task::none()
            }
            Message::SubmitLogin => self.submit_login(),
            Message::LoginCreated(result) => self.login_created(result),
            Message::DownloadTemplate(template) => {
                Task::perform(crate::csv_template::save_template(template), Message::TemplateSaved)
            }
            Message::TemplateSaved(result) => {
                match result {
                    Ok(path) => self.toast(ToastKind::Success, format!("Template saved to {}", path.display())),
                    Err(crate::error::TemplateError::Cancelled) => {}
                    Err(err) => {
                        error!("Template download failed: {}", err);
                        self.toast(ToastKind::Error, err.to_string());
                    }
                }
                Task::none()
            }
            // Account managers
            Message::ManagerSearchChanged(v) => {
                self.account_managers.search = v;
                Task::none()
            }
            Message::ManagerApplySearch => {
                self.account_managers.applied_search = self.account_managers.search.trim().to_string();
                self.load_account_managers(1)
            }
            Message::ManagerPageRequested(page) => self.load_account_managers(page),
            Message::AccountManagersLoaded(result) => self.account_managers_loaded(result),
            Message::ToggleManagerForm(open) => {
                self.account_managers.form = open.then(Default::default);
                Task::none()
            }
            Message::ManagerFieldChanged(field, value) => {
                if let Some(form) = &mut self.account_managers.form {
                    form.set(field, value);
                }
                Task::none()
            }
            Message::SubmitManager => self.submit_account_manager(),
            Message::ManagerSaved(result) => self.account_manager_saved(result),
            // Students
            Message::StudentSearchChanged(v) => {
                self.students.search = v;
                Task::none()
            }
            Message::StudentApplyFilter => self.apply_student_filter(),
            Message::StudentResetFilter => self.reset_student_filter(),
            Message::StudentPageRequested(page) => self.load_students(page),
            Message::StudentsLoaded(result) => self.students_loaded(result),
            Message::ToggleStudentForm(open) => self.toggle_student_form(open),
            Message::StudentFieldChanged(field, value) => {
                if let Some(form) = &mut self.students.form {
                    form.set(field, value);
                }
                Task::none()
            }
            Message::ChooseBirthDate => {
                if let Some(form) = &mut self.students.form {
                    form.show_date_picker = true;
                }
                Task::none()
            }
            Message::CancelBirthDate => {
                if let Some(form) = &mut self.students.form {
                    form.show_date_picker = false;
                }
                Task::none()
            }
            Message::SubmitBirthDate(date) => {
                if let Some(form) = &mut self.students.form {
                    form.date_of_birth = Some(date);
                    form.show_date_picker = false;
                    form.errors.remove("dateOfBirth");
                }
                Task::none()
            }
            Message::SubmitStudent => self.submit_student(),
            Message::StudentSaved(result) => self.student_saved(result),
            // Teachers
            Message::TeacherSearchChanged(v) => {
                self.teachers.search = v;
                Task::none()
            }
            Message::TeacherApplySearch => {
                self.teachers.applied_search = self.teachers.search.trim().to_string();
                self.load_teachers(1)
            }
            Message::TeacherPageRequested(page) => self.load_teachers(page),
            Message::TeachersLoaded(result) => self.teachers_loaded(result),
            Message::ToggleTeacherForm(open) => self.toggle_teacher_form(open),
            Message::TeacherFieldChanged(field, value) => {
                if let Some(form) = &mut self.teachers.form {
                    form.set(field, value);
                }
                Task::none()
            }
            Message::SubmitTeacher => self.submit_teacher(),
            Message::TeacherSaved(result) => self.teacher_saved(result),
            // Assignments
            Message::LoadAssignments => self.load_assignments(),
            Message::AssignmentsLoaded(result) => self.assignments_loaded(result),
            Message::ToggleDepartment(id) => {
                self.assignments.expansion.toggle_department(&id);
                Task::none()
            }
            Message::ToggleSection(key) => {
                self.assignments.expansion.toggle_section(&key);
                Task::none()
            }
            Message::ToggleAssignmentForm(open) => self.toggle_assignment_form(open),
            Message::AssignmentTeacherSelected(teacher) => {
                if let Some(form) = &mut self.assignments.form {
                    form.teacher = Some(teacher);
                    form.errors.remove("teacher");
                }
                Task::none()
            }
            Message::AssignmentSubjectToggled(subject_id, checked) => {
                if let Some(form) = &mut self.assignments.form {
                    if checked {
                        form.selected_subjects.insert(subject_id);
                    } else {
                        form.selected_subjects.remove(&subject_id);
                    }
                    form.errors.remove("subjects");
                }
                Task::none()
            }
            Message::AssignmentClassTeacherToggled(checked) => {
                if let Some(form) = &mut self.assignments.form {
                    form.is_class_teacher = checked;
                }
                Task::none()
            }
            Message::AssignmentOptionsLoaded(department_id, result) => {
                self.assignment_options_loaded(department_id, result)
            }
            Message::SubmitAssignment => self.submit_assignment(),
            Message::AssignmentSaved(result) => self.assignment_saved(result),
            // Settings
            Message::ThemeSelected(name) => self.select_theme(name),
            Message::SettingsApiUrlChanged(url) => {
                self.settings.api_base_url = url;
                self.settings.error = None;
                Task::none()
            }
            Message::SettingsPageLimitSelected(limit) => {
                self.settings.page_limit = limit;
                Task::none()
            }
            Message::SaveSettings => self.save_settings(),
            Message::NoOp => Task::none(),
        }
    }

    pub(crate) fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.next_toast_id += 1;
        self.toasts.push(Toast {
            id: self.next_toast_id,
            kind,
            message: message.into(),
            created: Instant::now(),
        });
    }

    pub(crate) fn report_error(&mut self, context: &str, err: &ApiError) {
        error!("{}: {}", context, err);
        self.toast(ToastKind::Error, err.user_message());
    }

    /// Logs a failed submission. The toast is skipped when the server errors went under fields.
    pub(crate) fn report_form_failure(&mut self, context: &str, err: &ApiError, toast: Option<String>) {
        error!("{}: {}", context, err);
        if let Some(message) = toast {
            self.toast(ToastKind::Error, message);
        }
    }

    /// Switches screen and kicks off whatever that screen needs loaded.
    pub(crate) fn enter_screen(&mut self, screen: Screen) -> Task<Message> {
        let Some(role) = self.role() else {
            self.current_screen = Screen::Login;
            return Task::none();
        };
        if !screen.allowed_for(role) {
            warn!("{:?} may not open {:?}", role, screen);
            return Task::none();
        }
        self.current_screen = screen;
        match screen {
            Screen::Login => Task::none(),
            Screen::Dashboard => self.load_dashboard(),
            Screen::Organizations => {
                let root = self.load_cascade_root(CascadeId::OrganizationFilter);
                Task::batch([root, self.load_organizations(self.organizations.pagination.current_page)])
            }
            Screen::OrganizationSetup => self.load_cascade_root(CascadeId::Setup),
            Screen::Logins => self.load_cascade_root(CascadeId::LoginForm),
            Screen::AccountManagers => self.load_account_managers(self.account_managers.pagination.current_page),
            Screen::Students => {
                let root = self.load_cascade_root(CascadeId::StudentFilter);
                Task::batch([root, self.load_students(self.students.pagination.current_page)])
            }
            Screen::Teachers => self.load_teachers(self.teachers.pagination.current_page),
            Screen::Assignments => self.load_assignments(),
            Screen::Settings => {
                self.settings.api_base_url = self.config.api_base_url.clone();
                self.settings.page_limit = self.config.page_limit;
                self.settings.error = None;
                Task::none()
            }
        }
    }

    fn load_dashboard(&mut self) -> Task<Message> {
        self.dashboard.is_loading = true;
        Task::perform(resources::dashboard_stats(self.api.clone()), Message::DashboardLoaded)
    }

    /// Turns a cascade fetch request into a task whose result is routed back by `id`.
    pub(crate) fn fetch_options(&self, id: CascadeId, request: FetchRequest<LevelKind>) -> Task<Message> {
        let scope = if id.is_org_scoped() { self.organization_scope() } else { None };
        let ticket = request.ticket;
        debug!("Fetching {:?} options for {:?} (parent {:?})", request.key, id, request.parent_key);
        Task::perform(
            fetch_level_options(self.api.clone(), request.key, request.lineage, scope),
            move |result| Message::CascadeOptionsLoaded(id, ticket, result),
        )
    }

    /// Loads root options once; later visits reuse them.
    pub(crate) fn load_cascade_root(&mut self, id: CascadeId) -> Task<Message> {
        let request = match self.cascade_mut(id) {
            Some(cascade) if cascade.options(0).is_empty() && !cascade.is_loading(0) => cascade.load_root(),
            _ => None,
        };
        request.map_or_else(Task::none, |req| self.fetch_options(id, req))
    }

    pub(crate) fn refresh_cascade_level(&mut self, id: CascadeId, level: usize) -> Task<Message> {
        let request = self.cascade_mut(id).and_then(|c| c.refresh(level));
        request.map_or_else(Task::none, |req| self.fetch_options(id, req))
    }

    fn select_in_cascade(&mut self, id: CascadeId, level: usize, value: String) -> Task<Message> {
        let Some(cascade) = self.cascade_mut(id) else {
            return Task::none();
        };
        let request = cascade.select_at(level, &value);
        let fetch = request.map_or_else(Task::none, |req| self.fetch_options(id, req));
        self.clear_cascade_errors(id);
        Task::batch([fetch, self.cascade_changed(id)])
    }

    /// Selections changed, either by the user or by a refresh dropping a vanished value.
    fn cascade_changed(&mut self, id: CascadeId) -> Task<Message> {
        match id {
            CascadeId::Setup => self.sync_setup_subjects(),
            CascadeId::AssignmentForm => self.sync_assignment_options(),
            _ => Task::none(),
        }
    }

    fn clear_cascade_errors(&mut self, id: CascadeId) {
        let errors = match id {
            CascadeId::OrganizationForm => self.organizations.form.as_mut().map(|f| &mut f.errors),
            CascadeId::StudentForm => self.students.form.as_mut().map(|f| &mut f.errors),
            CascadeId::TeacherForm => self.teachers.form.as_mut().map(|f| &mut f.errors),
            CascadeId::LoginForm => Some(&mut self.logins.errors),
            CascadeId::Setup => Some(&mut self.setup.errors),
            CascadeId::AssignmentForm => self.assignments.form.as_mut().map(|f| &mut f.errors),
            CascadeId::OrganizationFilter | CascadeId::StudentFilter => None,
        };
        if let Some(errors) = errors {
            for kind in [
                LevelKind::Country,
                LevelKind::State,
                LevelKind::District,
                LevelKind::Organization,
                LevelKind::Department,
                LevelKind::Class,
                LevelKind::Section,
            ] {
                errors.remove(kind.field());
            }
        }
    }

    fn confirm_delete(&mut self) -> Task<Message> {
        let Some(challenge) = &mut self.delete_challenge else {
            return Task::none();
        };
        if challenge.submit() == ChallengeOutcome::Rejected {
            return Task::none();
        }
        let Some(challenge) = self.delete_challenge.take() else {
            return Task::none();
        };
        let target = challenge.target;
        let client = self.api.clone();
        let request = target.clone();
        Task::perform(
            async move {
                match request {
                    DeleteTarget::Organization(id) => resources::delete_organization(client, id).await,
                    DeleteTarget::AccountManager(id) => resources::delete_account_manager(client, id).await,
                    DeleteTarget::Structure(kind, id) => resources::delete_structure(client, kind, id).await,
                    DeleteTarget::Student(id) => resources::delete_student(client, id).await,
                    DeleteTarget::Teacher(id) => resources::delete_teacher(client, id).await,
                    DeleteTarget::Assignment(id) => resources::delete_assignment(client, id).await,
                }
            },
            move |result| Message::Deleted(target.clone(), result),
        )
    }

    fn deleted(&mut self, target: DeleteTarget, result: Result<(), ApiError>) -> Task<Message> {
        if let Err(err) = result {
            self.report_error("Delete failed", &err);
            return Task::none();
        }
        self.toast(ToastKind::Success, "Deleted successfully.");
        match target {
            DeleteTarget::Organization(_) => {
                let page = page_after_delete(self.organizations.pagination.current_page, self.organizations.rows.len());
                self.load_organizations(page)
            }
            DeleteTarget::AccountManager(_) => {
                let page = page_after_delete(
                    self.account_managers.pagination.current_page,
                    self.account_managers.rows.len(),
                );
                self.load_account_managers(page)
            }
            DeleteTarget::Structure(kind, _) => self.structure_deleted(kind),
            DeleteTarget::Student(_) => {
                let page = page_after_delete(self.students.pagination.current_page, self.students.rows.len());
                self.load_students(page)
            }
            DeleteTarget::Teacher(_) => {
                let page = page_after_delete(self.teachers.pagination.current_page, self.teachers.rows.len());
                self.load_teachers(page)
            }
            DeleteTarget::Assignment(_) => self.load_assignments(),
        }
    }
}

/// Stay on the current page unless its last row was just removed.
fn page_after_delete(current_page: u32, rows_on_page: usize) -> u32 {
    if rows_on_page <= 1 && current_page > 1 {
        current_page - 1
    } else {
        current_page
    }
}

/// Applies server field errors to a form, or raises a toast when there are none.
pub(crate) fn apply_failure(errors: &mut FieldErrors, err: &ApiError) -> Option<String> {
    errors.absorb(err.field_errors());
    if err.field_errors().is_empty() {
        Some(err.user_message())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FieldError;
    use crate::config::AppConfig;
    use crate::models::{Role, SessionUser};

    fn signed_in(role: Role) -> App {
        let mut app = App::with_config(AppConfig::default());
        app.session = Some(SessionUser {
            id: "u1".into(),
            name: "Admin".into(),
            email: "admin@example.com".into(),
            role,
            organization_id: Some("org-1".into()),
            organization_name: Some("Greenwood High".into()),
        });
        app
    }

    #[test]
    fn last_row_on_page_moves_back() {
        assert_eq!(page_after_delete(3, 1), 2);
        assert_eq!(page_after_delete(3, 4), 3);
        assert_eq!(page_after_delete(1, 1), 1);
    }

    #[test]
    fn server_field_errors_replace_toast() {
        let mut errors = FieldErrors::new();
        let err = ApiError::Rejected {
            message: "Validation failed".into(),
            errors: vec![FieldError { field: "email".into(), message: "taken".into() }],
        };
        assert_eq!(apply_failure(&mut errors, &err), None);
        assert_eq!(errors.get("email"), Some("taken"));
        let err = ApiError::Network("refused".into());
        assert!(apply_failure(&mut errors, &err).is_some());
    }

    #[test]
    fn wrong_answer_keeps_dialog_open() {
        let mut app = signed_in(Role::OrgAdmin);
        app.delete_challenge = Some(DeleteChallenge::with_operands(
            DeleteTarget::Student("s1".into()),
            "Delete student",
            2,
            3,
        ));
        let _ = app.update(Message::DeleteAnswerChanged("5".into()));
        let _ = app.update(Message::ConfirmDelete);
        let challenge = app.delete_challenge.as_ref().expect("dialog stays open");
        assert!(challenge.input.is_empty());
        assert!(challenge.error.is_some());

        let _ = app.update(Message::DeleteAnswerChanged(" 6 ".into()));
        let _ = app.update(Message::ConfirmDelete);
        assert!(app.delete_challenge.is_none());
    }

    #[test]
    fn toasts_expire_on_tick() {
        let mut app = signed_in(Role::MasterAdmin);
        app.toast(ToastKind::Info, "hello");
        let created = app.toasts[0].created;
        let _ = app.update(Message::Tick(created + Duration::from_secs(1)));
        assert_eq!(app.toasts.len(), 1);
        let _ = app.update(Message::Tick(created + Duration::from_secs(TOAST_TTL_SECS + 1)));
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn role_gates_navigation() {
        let mut app = signed_in(Role::OrgAdmin);
        app.current_screen = Screen::Students;
        let _ = app.update(Message::Navigate(Screen::Organizations));
        assert_eq!(app.current_screen, Screen::Students);
        let _ = app.update(Message::Navigate(Screen::Settings));
        assert_eq!(app.current_screen, Screen::Settings);
    }

    #[test]
    fn stale_cascade_result_is_ignored_by_update() {
        let mut app = signed_in(Role::MasterAdmin);
        let first = app.logins.chain.select_at(0, "India").unwrap();
        let _ = app.update(Message::CascadeSelected(CascadeId::LoginForm, 0, "Nepal".into()));
        let _ = app.update(Message::CascadeOptionsLoaded(
            CascadeId::LoginForm,
            first.ticket,
            Ok(vec![crate::cascade::SelectOption::plain("Karnataka")]),
        ));
        assert!(app.logins.chain.options(1).is_empty());
        assert!(app.logins.chain.is_loading(1));
        assert!(app.toasts.is_empty());
    }
}
