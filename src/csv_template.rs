use std::fs;
use std::path::PathBuf;
use tokio::task::spawn_blocking;
use tracing::info;
use crate::error::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvTemplate {
    Logins,
    Students,
    Teachers,
}

impl CsvTemplate {
    pub fn header(self) -> &'static str {
        match self {
            CsvTemplate::Logins => {
                "loginType,name,email,phone,qualification,department,subject,experience,studentName,class,rollNumber"
            }
            CsvTemplate::Students => "name,email,phone,aadhar,rollNumber,department,class,section,dateOfBirth",
            CsvTemplate::Teachers => "name,email,phone,qualification,department,experience",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            CsvTemplate::Logins => "login_template.csv",
            CsvTemplate::Students => "student_template.csv",
            CsvTemplate::Teachers => "teacher_template.csv",
        }
    }

    pub fn contents(self) -> String {
        format!("{}\n", self.header())
    }
}

/// Asks for a destination with the native save dialog and writes the template there.
pub async fn save_template(template: CsvTemplate) -> Result<PathBuf, TemplateError> {
    spawn_blocking(move || {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(template.file_name())
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return Err(TemplateError::Cancelled);
        };
        fs::write(&path, template.contents()).map_err(|err| TemplateError::Write {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        info!("Wrote {:?} template to {:?}", template, path);
        Ok(path)
    })
    .await
    .unwrap_or_else(|join_err| {
        Err(TemplateError::Write {
            path: PathBuf::from(template.file_name()),
            reason: join_err.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_header_is_exact() {
        assert_eq!(
            CsvTemplate::Logins.contents().as_bytes(),
            b"loginType,name,email,phone,qualification,department,subject,experience,studentName,class,rollNumber\n"
        );
    }

    #[test]
    fn every_template_is_a_single_header_line() {
        for template in [CsvTemplate::Logins, CsvTemplate::Students, CsvTemplate::Teachers] {
            let contents = template.contents();
            assert_eq!(contents.lines().count(), 1);
            assert!(contents.ends_with('\n'));
            assert!(!contents.contains(' '));
            assert!(template.file_name().ends_with(".csv"));
        }
    }
}
