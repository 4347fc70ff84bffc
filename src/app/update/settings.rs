use iced::Task;
use tracing::{info, warn};
use crate::app::state::ToastKind;
use crate::config::{save_config, theme_from_str, PAGE_LIMITS};
use super::super::{App, Message};

/// Trimmed base URL without a trailing slash, or a message saying what is wrong with it.
fn normalize_api_url(raw: &str) -> Result<String, String> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err("API base URL is required".to_string());
    }
    let host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| "API base URL must start with http:// or https://".to_string())?;
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err("API base URL is not valid".to_string());
    }
    Ok(url.to_string())
}

impl App {
    pub(crate) fn select_theme(&mut self, name: &'static str) -> Task<Message> {
        let Some(theme) = theme_from_str(name) else {
            warn!("Unknown theme {}", name);
            return Task::none();
        };
        self.theme = theme;
        self.config.theme_name = name.to_string();
        if let Err(err) = save_config(&self.config) {
            warn!("Theme not persisted: {}", err);
        }
        Task::none()
    }

    pub(crate) fn save_settings(&mut self) -> Task<Message> {
        let url = match normalize_api_url(&self.settings.api_base_url) {
            Ok(url) => url,
            Err(message) => {
                self.settings.error = Some(message);
                return Task::none();
            }
        };
        let limit = self.settings.page_limit;
        if !PAGE_LIMITS.contains(&limit) {
            self.settings.error = Some("Pick one of the offered page sizes".to_string());
            return Task::none();
        }
        self.settings.error = None;
        self.settings.api_base_url = url.clone();
        self.api.set_base_url(&url);
        self.config.api_base_url = url;
        self.apply_page_limit(limit);

        match save_config(&self.config) {
            Ok(path) => {
                info!("Settings saved to {:?}", path);
                self.toast(ToastKind::Success, "Settings saved.");
            }
            Err(err) => {
                warn!("Could not save settings: {}", err);
                self.toast(ToastKind::Error, format!("Settings applied but not saved: {}", err));
            }
        }
        Task::none()
    }

    fn apply_page_limit(&mut self, limit: u32) {
        if self.config.page_limit == limit {
            return;
        }
        self.config.page_limit = limit;
        // Lists restart on their first page with the new size.
        for pagination in [
            &mut self.organizations.pagination,
            &mut self.account_managers.pagination,
            &mut self.students.pagination,
            &mut self.teachers.pagination,
        ] {
            pagination.limit = limit;
            pagination.current_page = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_is_normalized() {
        assert_eq!(normalize_api_url(" https://api.school.in/api/ ").unwrap(), "https://api.school.in/api");
        assert!(normalize_api_url("ftp://files").is_err());
        assert!(normalize_api_url("http://").is_err());
        assert!(normalize_api_url("   ").is_err());
    }

    #[test]
    fn page_limit_resets_lists() {
        let mut app = App::with_config(crate::config::AppConfig::default());
        app.students.pagination.current_page = 4;
        app.apply_page_limit(20);
        assert_eq!(app.students.pagination.limit, 20);
        assert_eq!(app.students.pagination.current_page, 1);
        assert_eq!(app.config.page_limit, 20);
    }
}
