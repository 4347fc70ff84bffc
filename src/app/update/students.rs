use iced::Task;
use iced_aw::date_picker::Date;
use tracing::info;
use crate::api::resources::{self, StudentFilter};
use crate::app::state::{CascadeId, StudentForm, ToastKind, CLASS_CHAIN};
use crate::error::ApiError;
use crate::models::{Page, Student, StudentPayload};
use crate::pagination::Pagination;
use crate::validation::FieldErrors;
use super::apply_failure;
use super::super::{App, Message};

/// `YYYY-MM-DD`, as the API stores birth dates.
pub(crate) fn iso_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
}

fn build_student(form: &StudentForm) -> Result<StudentPayload, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require("name", "Name", &form.name);
    errors.email("email", &form.email);
    errors.mobile("phone", &form.phone);
    errors.aadhar("aadhar", &form.aadhar);
    errors.require("rollNumber", "Roll number", &form.roll_number);
    for (level, kind) in CLASS_CHAIN.iter().enumerate() {
        errors.selection(kind.field(), &kind.label().to_lowercase(), form.placement.selected(level));
    }
    if form.date_of_birth.is_none() {
        errors.insert("dateOfBirth", "Date of birth is required");
    }
    errors.into_result()?;

    let placement = |level: usize| form.placement.selected(level).unwrap_or_default().to_string();
    Ok(StudentPayload {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        aadhar: form.aadhar.trim().to_string(),
        roll_number: form.roll_number.trim().to_string(),
        department_id: placement(0),
        class_id: placement(1),
        section_id: placement(2),
        date_of_birth: form.date_of_birth.map(iso_date).unwrap_or_default(),
    })
}

impl App {
    pub(crate) fn load_students(&mut self, page: u32) -> Task<Message> {
        self.students.is_loading = true;
        Task::perform(
            resources::list_students(
                self.api.clone(),
                self.students.applied.clone(),
                page.max(1),
                self.students.pagination.limit,
            ),
            Message::StudentsLoaded,
        )
    }

    pub(crate) fn students_loaded(&mut self, result: Result<Page<Student>, ApiError>) -> Task<Message> {
        self.students.is_loading = false;
        match result {
            Ok(page) => {
                let limit = self.students.pagination.limit;
                self.students.pagination = Pagination::new(page.current_page, limit, page.total_count);
                self.students.rows = page.items;
            }
            Err(err) => self.report_error("Could not load students", &err),
        }
        Task::none()
    }

    pub(crate) fn apply_student_filter(&mut self) -> Task<Message> {
        let filter = &self.students.filter;
        self.students.applied = StudentFilter {
            department_id: filter.selected(0).map(str::to_string),
            class_id: filter.selected(1).map(str::to_string),
            section_id: filter.selected(2).map(str::to_string),
            search: self.students.search.trim().to_string(),
        };
        self.load_students(1)
    }

    pub(crate) fn reset_student_filter(&mut self) -> Task<Message> {
        self.students.filter.select_at(0, "");
        self.students.search.clear();
        self.students.applied = StudentFilter::default();
        self.load_students(1)
    }

    pub(crate) fn toggle_student_form(&mut self, open: bool) -> Task<Message> {
        if !open {
            self.students.form = None;
            return Task::none();
        }
        self.students.form = Some(StudentForm::default());
        self.load_cascade_root(CascadeId::StudentForm)
    }

    pub(crate) fn submit_student(&mut self) -> Task<Message> {
        let Some(form) = &mut self.students.form else {
            return Task::none();
        };
        if form.is_saving {
            return Task::none();
        }
        match build_student(form) {
            Ok(payload) => {
                form.errors.clear();
                form.is_saving = true;
                Task::perform(resources::create_student(self.api.clone(), payload), Message::StudentSaved)
            }
            Err(errors) => {
                form.errors = errors;
                Task::none()
            }
        }
    }

    pub(crate) fn student_saved(&mut self, result: Result<Student, ApiError>) -> Task<Message> {
        match result {
            Ok(student) => {
                info!("Created student {} ({})", student.name, student.id);
                self.students.form = None;
                self.toast(ToastKind::Success, format!("Student {} added.", student.name));
                self.load_students(1)
            }
            Err(err) => {
                let toast = match &mut self.students.form {
                    Some(form) => {
                        form.is_saving = false;
                        apply_failure(&mut form.errors, &err)
                    }
                    None => Some(err.user_message()),
                };
                self.report_form_failure("Could not add student", &err, toast);
                Task::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cascade::SelectOption;
    use crate::config::AppConfig;
    use super::*;

    fn filled_form() -> StudentForm {
        let mut form = StudentForm {
            name: "Kiran".into(),
            email: "kiran@example.com".into(),
            phone: "9876543210".into(),
            aadhar: "123412341234".into(),
            roll_number: "17".into(),
            date_of_birth: Some(Date::from_ymd(2012, 4, 9)),
            ..StudentForm::default()
        };
        form.placement.preset(0, SelectOption::new("d1", "Primary"));
        form.placement.preset(1, SelectOption::new("c1", "Grade 5"));
        form.placement.preset(2, SelectOption::new("s1", "A"));
        form
    }

    #[test]
    fn complete_form_builds_payload() {
        let payload = build_student(&filled_form()).unwrap();
        assert_eq!(payload.section_id, "s1");
        assert_eq!(payload.date_of_birth, "2012-04-09");
    }

    #[test]
    fn missing_section_and_short_aadhar_are_reported() {
        let mut form = filled_form();
        form.placement.select_at(2, "");
        form.aadhar = "1234".into();
        form.date_of_birth = None;
        let errors = build_student(&form).unwrap_err();
        assert_eq!(errors.get("section"), Some("Please select a section"));
        assert_eq!(errors.get("aadhar"), Some("Aadhar number must be exactly 12 digits"));
        assert_eq!(errors.get("dateOfBirth"), Some("Date of birth is required"));
    }

    #[test]
    fn opening_form_loads_departments() {
        let mut app = App::with_config(AppConfig::default());
        let _ = app.update(Message::ToggleStudentForm(true));
        let form = app.students.form.as_ref().unwrap();
        assert!(form.placement.is_loading(0));
        let _ = app.update(Message::ToggleStudentForm(false));
        assert!(app.students.form.is_none());
    }

    #[test]
    fn birth_date_picker_round_trip() {
        let mut app = App::with_config(AppConfig::default());
        let _ = app.update(Message::ToggleStudentForm(true));
        let _ = app.update(Message::ChooseBirthDate);
        assert!(app.students.form.as_ref().unwrap().show_date_picker);
        let _ = app.update(Message::SubmitBirthDate(Date::from_ymd(2011, 1, 30)));
        let form = app.students.form.as_ref().unwrap();
        assert!(!form.show_date_picker);
        assert_eq!(form.date_of_birth.map(iso_date).as_deref(), Some("2011-01-30"));
    }
}
