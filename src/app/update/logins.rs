use iced::Task;
use tracing::info;
use crate::api::resources;
use crate::app::state::{LoginsPage, ToastKind, CLASS_LEVEL, DEPARTMENT_LEVEL, ORG_LEVEL, ORGANIZATION_CHAIN, SECTION_LEVEL};
use crate::error::ApiError;
use crate::models::{LoginType, NewLogin};
use crate::validation::FieldErrors;
use super::apply_failure;
use super::super::{App, Message};

fn needs_staff_details(login_type: LoginType) -> bool {
    matches!(login_type, LoginType::Hod | LoginType::Teacher)
}

/// Checks the form and builds the request body, or returns the per-field messages.
fn build_login(page: &LoginsPage) -> Result<NewLogin, FieldErrors> {
    let mut errors = FieldErrors::new();
    let login_type = page.login_type;
    let depth = login_type.required_depth();
    for (level, kind) in ORGANIZATION_CHAIN.iter().enumerate().take(depth) {
        errors.selection(kind.field(), &kind.label().to_lowercase(), page.chain.selected(level));
    }
    errors.require("name", "Name", &page.name);
    errors.email("email", &page.email);
    errors.mobile("phone", &page.phone);
    errors.password("password", &page.password);

    let mut experience = None;
    if needs_staff_details(login_type) {
        errors.require("qualification", "Qualification", &page.qualification);
        experience = errors.years("experience", "Experience", &page.experience);
    }
    if login_type == LoginType::Student {
        errors.require("rollNumber", "Roll number", &page.roll_number);
    }
    errors.into_result()?;

    let pick = |level: usize| (level < depth).then(|| page.chain.selected(level).map(str::to_string)).flatten();
    let organization_id = pick(ORG_LEVEL).unwrap_or_default();
    Ok(NewLogin {
        login_type,
        name: page.name.trim().to_string(),
        email: page.email.trim().to_string(),
        phone: page.phone.trim().to_string(),
        password: page.password.clone(),
        organization_ids: vec![organization_id.clone()],
        organization_id,
        department_id: pick(DEPARTMENT_LEVEL),
        class_id: pick(CLASS_LEVEL),
        section_id: pick(SECTION_LEVEL),
        qualification: needs_staff_details(login_type).then(|| page.qualification.trim().to_string()),
        experience,
        roll_number: (login_type == LoginType::Student).then(|| page.roll_number.trim().to_string()),
    })
}

impl App {
    pub(crate) fn select_login_type(&mut self, login_type: LoginType) -> Task<Message> {
        let page = &mut self.logins;
        page.login_type = login_type;
        page.errors.clear();
        let depth = login_type.required_depth();
        if depth < page.chain.len() {
            // Levels below what this type needs are dropped.
            page.chain.select_at(depth, "");
        }
        if !needs_staff_details(login_type) {
            page.qualification.clear();
            page.experience.clear();
        }
        if login_type != LoginType::Student {
            page.roll_number.clear();
        }
        Task::none()
    }

    pub(crate) fn submit_login(&mut self) -> Task<Message> {
        if self.logins.is_saving {
            return Task::none();
        }
        match build_login(&self.logins) {
            Ok(login) => {
                self.logins.errors.clear();
                self.logins.is_saving = true;
                Task::perform(resources::create_login(self.api.clone(), login), Message::LoginCreated)
            }
            Err(errors) => {
                self.logins.errors = errors;
                Task::none()
            }
        }
    }

    pub(crate) fn login_created(&mut self, result: Result<(), ApiError>) -> Task<Message> {
        self.logins.is_saving = false;
        match result {
            Ok(()) => {
                info!("Created {} login for {}", self.logins.login_type, self.logins.email);
                let message = format!("{} login created for {}.", self.logins.login_type, self.logins.name.trim());
                self.logins.clear_personal_fields();
                self.toast(ToastKind::Success, message);
            }
            Err(err) => {
                let toast = apply_failure(&mut self.logins.errors, &err);
                self.report_form_failure("Could not create login", &err, toast);
            }
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use crate::cascade::SelectOption;
    use super::*;

    fn page_with_chain(depth: usize) -> LoginsPage {
        let mut page = LoginsPage::default();
        let values = [
            SelectOption::plain("India"),
            SelectOption::plain("Karnataka"),
            SelectOption::plain("Bangalore"),
            SelectOption::new("org-1", "Greenwood High"),
            SelectOption::new("d1", "Science"),
            SelectOption::new("c1", "Grade 5"),
            SelectOption::new("s1", "A"),
        ];
        for (level, option) in values.into_iter().enumerate().take(depth) {
            page.chain.preset(level, option);
        }
        page.name = "Asha Rao".into();
        page.email = "asha@example.com".into();
        page.phone = "9876543210".into();
        page.password = "secret123".into();
        page
    }

    #[test]
    fn principal_stops_at_organization() {
        let page = page_with_chain(7);
        let login = build_login(&page).unwrap();
        assert_eq!(login.organization_id, "org-1");
        assert_eq!(login.organization_ids, vec!["org-1".to_string()]);
        assert_eq!(login.department_id, None);
        assert_eq!(login.qualification, None);
    }

    #[test]
    fn teacher_needs_department_and_experience() {
        let mut page = page_with_chain(4);
        page.login_type = LoginType::Teacher;
        page.experience = "abc".into();
        let errors = build_login(&page).unwrap_err();
        assert_eq!(errors.get("department"), Some("Please select a department"));
        assert_eq!(errors.get("qualification"), Some("Qualification is required"));
        assert_eq!(errors.get("experience"), Some("Experience must be a whole number of years"));
    }

    #[test]
    fn student_carries_full_placement() {
        let mut page = page_with_chain(7);
        page.login_type = LoginType::Student;
        page.roll_number = " 42 ".into();
        let login = build_login(&page).unwrap();
        assert_eq!(login.section_id.as_deref(), Some("s1"));
        assert_eq!(login.roll_number.as_deref(), Some("42"));
        assert_eq!(login.experience, None);
    }

    #[test]
    fn switching_type_drops_deeper_levels() {
        let mut app = App::with_config(crate::config::AppConfig::default());
        app.logins = page_with_chain(7);
        app.logins.login_type = LoginType::Student;
        let _ = app.update(Message::LoginTypeSelected(LoginType::Hod));
        assert_eq!(app.logins.chain.selected(DEPARTMENT_LEVEL), Some("d1"));
        assert_eq!(app.logins.chain.selected(CLASS_LEVEL), None);
        assert_eq!(app.logins.chain.selected(SECTION_LEVEL), None);
    }

    #[test]
    fn success_keeps_organization_chain() {
        let mut app = App::with_config(crate::config::AppConfig::default());
        app.logins = page_with_chain(4);
        app.logins.is_saving = true;
        let _ = app.update(Message::LoginCreated(Ok(())));
        assert!(app.logins.name.is_empty());
        assert_eq!(app.logins.chain.selected(ORG_LEVEL), Some("org-1"));
        assert_eq!(app.toasts.len(), 1);
    }
}
