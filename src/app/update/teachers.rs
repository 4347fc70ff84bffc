use iced::Task;
use tracing::info;
use crate::api::resources;
use crate::app::state::{CascadeId, TeacherForm, ToastKind};
use crate::error::ApiError;
use crate::models::{Page, Teacher, TeacherPayload};
use crate::pagination::Pagination;
use crate::validation::FieldErrors;
use super::apply_failure;
use super::super::{App, Message};

fn build_teacher(form: &TeacherForm) -> Result<TeacherPayload, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require("name", "Name", &form.name);
    errors.email("email", &form.email);
    errors.mobile("phone", &form.phone);
    errors.require("qualification", "Qualification", &form.qualification);
    let experience = errors.years("experience", "Experience", &form.experience);
    errors.selection("department", "department", form.department.selected(0));
    errors.into_result()?;

    Ok(TeacherPayload {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        qualification: form.qualification.trim().to_string(),
        experience: experience.unwrap_or_default(),
        department_id: form.department.selected(0).unwrap_or_default().to_string(),
    })
}

impl App {
    pub(crate) fn load_teachers(&mut self, page: u32) -> Task<Message> {
        self.teachers.is_loading = true;
        Task::perform(
            resources::list_teachers(
                self.api.clone(),
                self.teachers.applied_search.clone(),
                page.max(1),
                self.teachers.pagination.limit,
            ),
            Message::TeachersLoaded,
        )
    }

    pub(crate) fn teachers_loaded(&mut self, result: Result<Page<Teacher>, ApiError>) -> Task<Message> {
        self.teachers.is_loading = false;
        match result {
            Ok(page) => {
                let limit = self.teachers.pagination.limit;
                self.teachers.pagination = Pagination::new(page.current_page, limit, page.total_count);
                self.teachers.rows = page.items;
            }
            Err(err) => self.report_error("Could not load teachers", &err),
        }
        Task::none()
    }

    pub(crate) fn toggle_teacher_form(&mut self, open: bool) -> Task<Message> {
        if !open {
            self.teachers.form = None;
            return Task::none();
        }
        self.teachers.form = Some(TeacherForm::default());
        self.load_cascade_root(CascadeId::TeacherForm)
    }

    pub(crate) fn submit_teacher(&mut self) -> Task<Message> {
        let Some(form) = &mut self.teachers.form else {
            return Task::none();
        };
        if form.is_saving {
            return Task::none();
        }
        match build_teacher(form) {
            Ok(payload) => {
                form.errors.clear();
                form.is_saving = true;
                Task::perform(resources::create_teacher(self.api.clone(), payload), Message::TeacherSaved)
            }
            Err(errors) => {
                form.errors = errors;
                Task::none()
            }
        }
    }

    pub(crate) fn teacher_saved(&mut self, result: Result<Teacher, ApiError>) -> Task<Message> {
        match result {
            Ok(teacher) => {
                info!("Created teacher {} ({})", teacher.name, teacher.id);
                self.teachers.form = None;
                self.toast(ToastKind::Success, format!("Teacher {} added.", teacher.name));
                self.load_teachers(1)
            }
            Err(err) => {
                let toast = match &mut self.teachers.form {
                    Some(form) => {
                        form.is_saving = false;
                        apply_failure(&mut form.errors, &err)
                    }
                    None => Some(err.user_message()),
                };
                self.report_form_failure("Could not add teacher", &err, toast);
                Task::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cascade::SelectOption;
    use super::*;

    #[test]
    fn experience_must_be_numeric() {
        let mut form = TeacherForm {
            name: "Meera".into(),
            email: "meera@example.com".into(),
            phone: "9876543210".into(),
            qualification: "M.Sc".into(),
            experience: "ten".into(),
            ..TeacherForm::default()
        };
        form.department.preset(0, SelectOption::new("d1", "Science"));
        let errors = build_teacher(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("experience").is_some());

        form.experience = "7".into();
        let payload = build_teacher(&form).unwrap();
        assert_eq!(payload.experience, 7);
        assert_eq!(payload.department_id, "d1");
    }

    #[test]
    fn department_is_required() {
        let form = TeacherForm {
            name: "Meera".into(),
            email: "meera@example.com".into(),
            phone: "9876543210".into(),
            qualification: "M.Sc".into(),
            experience: "3".into(),
            ..TeacherForm::default()
        };
        let errors = build_teacher(&form).unwrap_err();
        assert_eq!(errors.get("department"), Some("Please select a department"));
    }
}
