use iced::Task;
use tracing::{debug, info};
use crate::api::resources;
use crate::app::state::{AssignmentForm, CascadeId, ToastKind, CLASS_CHAIN};
use crate::cascade::SelectOption;
use crate::error::ApiError;
use crate::models::{AssignmentPayload, AssignmentRecord, NamedRecord, Subject};
use crate::validation::FieldErrors;
use super::apply_failure;
use super::super::{App, Message};

fn build_assignment(form: &AssignmentForm) -> Result<AssignmentPayload, FieldErrors> {
    let mut errors = FieldErrors::new();
    for (level, kind) in CLASS_CHAIN.iter().enumerate() {
        errors.selection(kind.field(), &kind.label().to_lowercase(), form.placement.selected(level));
    }
    errors.selection("teacher", "teacher", form.teacher.as_ref().map(|t| t.value.as_str()));
    if form.selected_subjects.is_empty() {
        errors.insert("subjects", "Please select at least one subject");
    }
    errors.into_result()?;

    let placement = |level: usize| form.placement.selected(level).unwrap_or_default().to_string();
    Ok(AssignmentPayload {
        department_id: placement(0),
        class_id: placement(1),
        section_id: placement(2),
        teacher_id: form.teacher.as_ref().map(|t| t.value.clone()).unwrap_or_default(),
        subject_ids: form.selected_subjects.iter().cloned().collect(),
        is_class_teacher: form.is_class_teacher,
    })
}

impl App {
    pub(crate) fn load_assignments(&mut self) -> Task<Message> {
        self.assignments.is_loading = true;
        Task::perform(resources::list_assignments(self.api.clone()), Message::AssignmentsLoaded)
    }

    pub(crate) fn assignments_loaded(&mut self, result: Result<Vec<AssignmentRecord>, ApiError>) -> Task<Message> {
        self.assignments.is_loading = false;
        match result {
            Ok(records) => self.assignments.records = records,
            Err(err) => self.report_error("Could not load assignments", &err),
        }
        Task::none()
    }

    pub(crate) fn toggle_assignment_form(&mut self, open: bool) -> Task<Message> {
        if !open {
            self.assignments.form = None;
            return Task::none();
        }
        self.assignments.form = Some(AssignmentForm::default());
        self.load_cascade_root(CascadeId::AssignmentForm)
    }

    /// Reloads teachers and subjects whenever the chosen department changes.
    pub(crate) fn sync_assignment_options(&mut self) -> Task<Message> {
        let Some(form) = &mut self.assignments.form else {
            return Task::none();
        };
        let department = form.placement.selected(0).map(str::to_string);
        if department == form.options_for {
            return Task::none();
        }
        form.teachers.clear();
        form.teacher = None;
        form.subjects.clear();
        form.selected_subjects.clear();
        form.options_for = department.clone();
        form.options_loading = department.is_some();

        let Some(department_id) = department else {
            return Task::none();
        };
        let client = self.api.clone();
        let key = department_id.clone();
        Task::perform(
            async move {
                tokio::try_join!(
                    resources::teacher_options(client.clone(), department_id.clone()),
                    resources::list_subjects(client, department_id),
                )
            },
            move |result| Message::AssignmentOptionsLoaded(key.clone(), result),
        )
    }

    pub(crate) fn assignment_options_loaded(
        &mut self,
        department_id: String,
        result: Result<(Vec<NamedRecord>, Vec<Subject>), ApiError>,
    ) -> Task<Message> {
        let Some(form) = &mut self.assignments.form else {
            return Task::none();
        };
        if form.options_for.as_deref() != Some(department_id.as_str()) {
            debug!("Dropping teacher/subject options for department {}", department_id);
            return Task::none();
        }
        form.options_loading = false;
        match result {
            Ok((teachers, subjects)) => {
                form.teachers = teachers.into_iter().map(SelectOption::from).collect();
                form.subjects = subjects;
            }
            Err(err) => self.report_error("Could not load teachers and subjects", &err),
        }
        Task::none()
    }

    pub(crate) fn submit_assignment(&mut self) -> Task<Message> {
        let Some(form) = &mut self.assignments.form else {
            return Task::none();
        };
        if form.is_saving {
            return Task::none();
        }
        match build_assignment(form) {
            Ok(payload) => {
                form.errors.clear();
                form.is_saving = true;
                Task::perform(resources::create_assignment(self.api.clone(), payload), Message::AssignmentSaved)
            }
            Err(errors) => {
                form.errors = errors;
                Task::none()
            }
        }
    }

    pub(crate) fn assignment_saved(&mut self, result: Result<AssignmentRecord, ApiError>) -> Task<Message> {
        match result {
            Ok(record) => {
                info!("Assigned teacher {} to section {}", record.teacher_id, record.section_id);
                self.assignments.form = None;
                self.toast(ToastKind::Success, "Teacher assigned successfully.");
                self.load_assignments()
            }
            Err(err) => {
                let toast = match &mut self.assignments.form {
                    Some(form) => {
                        form.is_saving = false;
                        apply_failure(&mut form.errors, &err)
                    }
                    None => Some(err.user_message()),
                };
                self.report_form_failure("Could not save assignment", &err, toast);
                Task::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::Screen;
    use crate::config::AppConfig;
    use super::*;

    fn app_with_form() -> App {
        let mut app = App::with_config(AppConfig::default());
        app.current_screen = Screen::Assignments;
        let _ = app.update(Message::ToggleAssignmentForm(true));
        app
    }

    fn departments() -> Vec<SelectOption> {
        vec![SelectOption::new("d1", "Science"), SelectOption::new("d2", "Arts")]
    }

    fn load_departments(app: &mut App) {
        let form = app.assignments.form.as_mut().unwrap();
        let request = form.placement.load_root().unwrap();
        let _ = app.update(Message::CascadeOptionsLoaded(CascadeId::AssignmentForm, request.ticket, Ok(departments())));
    }

    #[test]
    fn department_change_reloads_teacher_options() {
        let mut app = app_with_form();
        load_departments(&mut app);
        let _ = app.update(Message::CascadeSelected(CascadeId::AssignmentForm, 0, "d1".into()));
        let form = app.assignments.form.as_ref().unwrap();
        assert_eq!(form.options_for.as_deref(), Some("d1"));
        assert!(form.options_loading);
    }

    #[test]
    fn late_options_for_previous_department_are_dropped() {
        let mut app = app_with_form();
        load_departments(&mut app);
        let _ = app.update(Message::CascadeSelected(CascadeId::AssignmentForm, 0, "d1".into()));
        let _ = app.update(Message::CascadeSelected(CascadeId::AssignmentForm, 0, "d2".into()));
        let stale = (vec![NamedRecord { id: "t1".into(), name: "Meera".into() }], vec![]);
        let _ = app.update(Message::AssignmentOptionsLoaded("d1".into(), Ok(stale)));
        let form = app.assignments.form.as_ref().unwrap();
        assert!(form.teachers.is_empty());
        assert!(form.options_loading);

        let fresh = (
            vec![NamedRecord { id: "t2".into(), name: "Arun".into() }],
            vec![Subject { id: "s1".into(), name: "History".into(), code: None }],
        );
        let _ = app.update(Message::AssignmentOptionsLoaded("d2".into(), Ok(fresh)));
        let form = app.assignments.form.as_ref().unwrap();
        assert_eq!(form.teachers, vec![SelectOption::new("t2", "Arun")]);
        assert_eq!(form.subjects.len(), 1);
        assert!(!form.options_loading);
    }

    #[test]
    fn reopened_form_ignores_classes_requested_before_closing() {
        let mut app = app_with_form();
        load_departments(&mut app);
        let first = app.assignments.form.as_mut().unwrap().placement.select_at(0, "d1").unwrap();

        let _ = app.update(Message::ToggleAssignmentForm(false));
        let _ = app.update(Message::ToggleAssignmentForm(true));
        load_departments(&mut app);
        let second = app.assignments.form.as_mut().unwrap().placement.select_at(0, "d2").unwrap();

        let science = vec![SelectOption::new("c-sci", "Grade 5 Science")];
        let arts = vec![SelectOption::new("c-arts", "Grade 5 Arts")];
        let _ = app.update(Message::CascadeOptionsLoaded(CascadeId::AssignmentForm, first.ticket, Ok(science)));
        let _ = app.update(Message::CascadeOptionsLoaded(CascadeId::AssignmentForm, second.ticket, Ok(arts.clone())));

        let form = app.assignments.form.as_ref().unwrap();
        assert_eq!(form.placement.selected(0), Some("d2"));
        assert_eq!(form.placement.options(1), arts.as_slice());
        assert!(!form.placement.is_loading(1));
    }

    #[test]
    fn subjects_and_teacher_are_required() {
        let mut form = AssignmentForm::default();
        form.placement.preset(0, SelectOption::new("d1", "Science"));
        form.placement.preset(1, SelectOption::new("c1", "Grade 5"));
        form.placement.preset(2, SelectOption::new("s1", "A"));
        let errors = build_assignment(&form).unwrap_err();
        assert_eq!(errors.len(), 2);

        form.teacher = Some(SelectOption::new("t1", "Meera"));
        form.selected_subjects.insert("sub1".into());
        form.is_class_teacher = true;
        let payload = build_assignment(&form).unwrap();
        assert_eq!(payload.subject_ids, vec!["sub1".to_string()]);
        assert!(payload.is_class_teacher);
    }
}
