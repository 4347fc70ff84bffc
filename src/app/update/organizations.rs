use iced::Task;
use tracing::info;
use crate::api::resources::{self, OrganizationFilter};
use crate::app::state::{CascadeId, OrganizationForm, ToastKind};
use crate::error::ApiError;
use crate::models::{Organization, OrganizationPayload, Page};
use crate::pagination::Pagination;
use crate::validation::FieldErrors;
use super::apply_failure;
use super::super::{App, Message};

impl App {
    pub(crate) fn load_organizations(&mut self, page: u32) -> Task<Message> {
        let page_state = &mut self.organizations;
        page_state.is_loading = true;
        Task::perform(
            resources::list_organizations(
                self.api.clone(),
                page_state.applied.clone(),
                page.max(1),
                page_state.pagination.limit,
            ),
            Message::OrganizationsLoaded,
        )
    }

    pub(crate) fn organizations_loaded(&mut self, result: Result<Page<Organization>, ApiError>) -> Task<Message> {
        self.organizations.is_loading = false;
        match result {
            Ok(page) => {
                let limit = self.organizations.pagination.limit;
                self.organizations.pagination = Pagination::new(page.current_page, limit, page.total_count);
                self.organizations.rows = page.items;
            }
            Err(err) => self.report_error("Could not load organizations", &err),
        }
        Task::none()
    }

    pub(crate) fn apply_organization_filter(&mut self) -> Task<Message> {
        let filter = &self.organizations.filter;
        self.organizations.applied = OrganizationFilter {
            country: filter.selected(0).map(str::to_string),
            state: filter.selected(1).map(str::to_string),
            district: filter.selected(2).map(str::to_string),
            search: self.organizations.search.trim().to_string(),
        };
        self.load_organizations(1)
    }

    pub(crate) fn reset_organization_filter(&mut self) -> Task<Message> {
        self.organizations.filter.select_at(0, "");
        self.organizations.search.clear();
        self.organizations.applied = OrganizationFilter::default();
        self.load_organizations(1)
    }

    pub(crate) fn open_organization_form(&mut self, organization: Option<Organization>) -> Task<Message> {
        let form = match &organization {
            Some(org) => OrganizationForm::editing(org),
            None => OrganizationForm::blank(),
        };
        let preset_depth = form.location.levels().iter().take_while(|l| l.selected().is_some()).count();
        self.organizations.form = Some(form);

        let managers = Task::perform(
            resources::all_account_managers(self.api.clone()),
            Message::AccountManagerOptionsLoaded,
        );
        let mut tasks = vec![managers];
        // Preset levels only hold their own value; fetch full option lists down to the first open level.
        for level in 0..=preset_depth.min(2) {
            tasks.push(self.refresh_cascade_level(CascadeId::OrganizationForm, level));
        }
        Task::batch(tasks)
    }

    fn validate_organization(form: &OrganizationForm) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", "Organization name", &form.name);
        errors.email("email", &form.email);
        errors.mobile("phone", &form.phone);
        errors.require("address", "Address", &form.address);
        errors.selection("country", "country", form.location.selected(0));
        errors.selection("state", "state", form.location.selected(1));
        errors.selection("district", "district", form.location.selected(2));
        errors
    }

    pub(crate) fn submit_organization(&mut self) -> Task<Message> {
        let Some(form) = &mut self.organizations.form else {
            return Task::none();
        };
        if form.is_saving {
            return Task::none();
        }
        form.errors = Self::validate_organization(form);
        if !form.errors.is_empty() {
            return Task::none();
        }
        form.is_saving = true;
        let payload = OrganizationPayload {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            country: form.location.selected(0).unwrap_or_default().to_string(),
            state: form.location.selected(1).unwrap_or_default().to_string(),
            district: form.location.selected(2).unwrap_or_default().to_string(),
            account_manager_id: form.account_manager.as_ref().map(|m| m.id.clone()),
        };
        let client = self.api.clone();
        match form.editing_id.clone() {
            Some(id) => Task::perform(resources::update_organization(client, id, payload), Message::OrganizationSaved),
            None => Task::perform(resources::create_organization(client, payload), Message::OrganizationSaved),
        }
    }

    pub(crate) fn organization_saved(&mut self, result: Result<Organization, ApiError>) -> Task<Message> {
        match result {
            Ok(org) => {
                let updated = self.organizations.form.as_ref().is_some_and(|f| f.editing_id.is_some());
                info!("Saved organization {} ({})", org.name, org.id);
                self.organizations.form = None;
                self.toast(
                    ToastKind::Success,
                    if updated { "Organization updated successfully." } else { "Organization created successfully." },
                );
                self.load_organizations(if updated { self.organizations.pagination.current_page } else { 1 })
            }
            Err(err) => {
                let toast = match &mut self.organizations.form {
                    Some(form) => {
                        form.is_saving = false;
                        apply_failure(&mut form.errors, &err)
                    }
                    None => Some(err.user_message()),
                };
                self.report_form_failure("Could not save organization", &err, toast);
                Task::none()
            }
        }
    }

    pub(crate) fn toggle_organization_status(&mut self, id: String) -> Task<Message> {
        Task::perform(
            resources::toggle_organization_status(self.api.clone(), id),
            Message::OrganizationStatusToggled,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::api::FieldError;
    use crate::cascade::SelectOption;
    use crate::config::AppConfig;
    use super::*;

    fn organization() -> Organization {
        Organization {
            id: "o1".into(),
            name: "Greenwood High".into(),
            email: "office@greenwood.edu".into(),
            phone: "9876543210".into(),
            address: "12 MG Road".into(),
            country: "India".into(),
            state: "Karnataka".into(),
            district: "Bangalore".into(),
            is_active: true,
            account_manager_id: None,
            account_manager_name: None,
        }
    }

    #[test]
    fn loaded_page_updates_pagination() {
        let mut app = App::with_config(AppConfig { page_limit: 5, ..AppConfig::default() });
        let _ = app.update(Message::OrganizationsLoaded(Ok(Page {
            items: vec![organization()],
            total_count: 23,
            current_page: 5,
            limit: 5,
        })));
        let p = app.organizations.pagination;
        assert_eq!((p.start_item(), p.end_item(), p.total_pages()), (21, 23, 5));
        assert_eq!(app.organizations.rows.len(), 1);
    }

    #[test]
    fn filter_captures_selected_locations() {
        let mut app = App::with_config(AppConfig::default());
        app.organizations.filter.preset(0, SelectOption::plain("India"));
        app.organizations.search = "  green ".into();
        let _ = app.update(Message::OrgApplyFilter);
        assert_eq!(app.organizations.applied.country.as_deref(), Some("India"));
        assert_eq!(app.organizations.applied.state, None);
        assert_eq!(app.organizations.applied.search, "green");
        assert!(app.organizations.is_loading);
    }

    #[test]
    fn editing_form_presets_location() {
        let mut app = App::with_config(AppConfig::default());
        let _ = app.update(Message::OpenOrganizationForm(Some(organization())));
        let form = app.organizations.form.as_ref().unwrap();
        assert_eq!(form.location.selected(2), Some("Bangalore"));
        assert!(form.location.is_loading(0));
        assert!(form.location.is_loading(1));
        assert!(form.location.is_loading(2));
    }

    #[test]
    fn blank_form_is_validated_before_sending() {
        let mut app = App::with_config(AppConfig::default());
        let _ = app.update(Message::OpenOrganizationForm(None));
        let _ = app.update(Message::SubmitOrganization);
        let form = app.organizations.form.as_ref().unwrap();
        assert!(!form.is_saving);
        assert_eq!(form.errors.get("name"), Some("Organization name is required"));
        assert_eq!(form.errors.get("country"), Some("Please select a country"));
    }

    #[test]
    fn server_field_errors_stay_on_form() {
        let mut app = App::with_config(AppConfig::default());
        let _ = app.update(Message::OpenOrganizationForm(None));
        app.organizations.form.as_mut().unwrap().is_saving = true;
        let err = ApiError::Rejected {
            message: "Validation failed".into(),
            errors: vec![FieldError { field: "email".into(), message: "Email already registered".into() }],
        };
        let _ = app.update(Message::OrganizationSaved(Err(err)));
        let form = app.organizations.form.as_ref().unwrap();
        assert!(!form.is_saving);
        assert_eq!(form.errors.get("email"), Some("Email already registered"));
        assert!(app.toasts.is_empty());
    }
}
