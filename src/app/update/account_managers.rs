use iced::Task;
use tracing::info;
use crate::api::resources;
use crate::app::state::ToastKind;
use crate::error::ApiError;
use crate::models::{AccountManager, AccountManagerPayload, Page};
use crate::pagination::Pagination;
use crate::validation::FieldErrors;
use super::apply_failure;
use super::super::{App, Message};

impl App {
    pub(crate) fn load_account_managers(&mut self, page: u32) -> Task<Message> {
        self.account_managers.is_loading = true;
        Task::perform(
            resources::list_account_managers(
                self.api.clone(),
                self.account_managers.applied_search.clone(),
                page.max(1),
                self.account_managers.pagination.limit,
            ),
            Message::AccountManagersLoaded,
        )
    }

    pub(crate) fn account_managers_loaded(
        &mut self,
        result: Result<Page<AccountManager>, ApiError>,
    ) -> Task<Message> {
        self.account_managers.is_loading = false;
        match result {
            Ok(page) => {
                let limit = self.account_managers.pagination.limit;
                self.account_managers.pagination = Pagination::new(page.current_page, limit, page.total_count);
                self.account_managers.rows = page.items;
            }
            Err(err) => self.report_error("Could not load account managers", &err),
        }
        Task::none()
    }

    pub(crate) fn submit_account_manager(&mut self) -> Task<Message> {
        let Some(form) = &mut self.account_managers.form else {
            return Task::none();
        };
        if form.is_saving {
            return Task::none();
        }
        let mut errors = FieldErrors::new();
        errors.require("name", "Name", &form.name);
        errors.email("email", &form.email);
        errors.mobile("phone", &form.phone);
        form.errors = errors;
        if !form.errors.is_empty() {
            return Task::none();
        }
        form.is_saving = true;
        let payload = AccountManagerPayload {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
        };
        Task::perform(resources::create_account_manager(self.api.clone(), payload), Message::ManagerSaved)
    }

    pub(crate) fn account_manager_saved(&mut self, result: Result<AccountManager, ApiError>) -> Task<Message> {
        match result {
            Ok(manager) => {
                info!("Created account manager {} ({})", manager.name, manager.id);
                self.account_managers.form = None;
                self.toast(ToastKind::Success, format!("Account manager {} created.", manager.name));
                self.load_account_managers(1)
            }
            Err(err) => {
                let toast = match &mut self.account_managers.form {
                    Some(form) => {
                        form.is_saving = false;
                        apply_failure(&mut form.errors, &err)
                    }
                    None => Some(err.user_message()),
                };
                self.report_form_failure("Could not create account manager", &err, toast);
                Task::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::ManagerField;
    use crate::config::AppConfig;
    use super::*;

    #[test]
    fn search_is_applied_from_first_page() {
        let mut app = App::with_config(AppConfig::default());
        app.account_managers.pagination = Pagination::new(3, 10, 40);
        let _ = app.update(Message::ManagerSearchChanged("  ravi ".into()));
        let _ = app.update(Message::ManagerApplySearch);
        assert_eq!(app.account_managers.applied_search, "ravi");
        assert!(app.account_managers.is_loading);
    }

    #[test]
    fn invalid_phone_blocks_submit() {
        let mut app = App::with_config(AppConfig::default());
        let _ = app.update(Message::ToggleManagerForm(true));
        let _ = app.update(Message::ManagerFieldChanged(ManagerField::Name, "Ravi".into()));
        let _ = app.update(Message::ManagerFieldChanged(ManagerField::Email, "ravi@example.com".into()));
        let _ = app.update(Message::ManagerFieldChanged(ManagerField::Phone, "12345".into()));
        let _ = app.update(Message::SubmitManager);
        let form = app.account_managers.form.as_ref().unwrap();
        assert!(!form.is_saving);
        assert_eq!(form.errors.len(), 1);
        assert_eq!(form.errors.get("phone"), Some("Phone number must be exactly 10 digits"));
    }

    #[test]
    fn saved_manager_closes_form() {
        let mut app = App::with_config(AppConfig::default());
        let _ = app.update(Message::ToggleManagerForm(true));
        let manager = AccountManager {
            id: "m1".into(),
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            phone: "9876543210".into(),
            organization_count: 0,
        };
        let _ = app.update(Message::ManagerSaved(Ok(manager)));
        assert!(app.account_managers.form.is_none());
        assert_eq!(app.toasts.len(), 1);
    }
}
