use super::form::FormState;
use radiolab_api::endpoints::{
    projects::{CreateProject, Project, ProjectUpdate},
    reports::{NewReport, ReportUpdate},
    AngleMeasurement,
};
use thiserror::Error;

pub const PROJECT_NAME: usize = 0;
pub const PROJECT_PATIENT_ID: usize = 1;
pub const PROJECT_DESCRIPTION: usize = 2;

pub const REPORT_NAME: usize = 0;
pub const REPORT_NOTES: usize = 1;

/// Display format used for project and report dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Type \"{expected}\" exactly to confirm")]
    ConfirmationMismatch { expected: String },

    #[error("Select at least one radiograph")]
    NoFiles,

    #[error("Run the analysis before saving a report")]
    NotAnalyzed,
}

fn required(form: &FormState, index: usize) -> Result<String, ValidationError> {
    let value = form.value(index);
    if value.is_empty() {
        let field = form.field(index).map(|f| f.label).unwrap_or("Field");
        return Err(ValidationError::Required { field });
    }
    Ok(value.to_string())
}

fn optional(form: &FormState, index: usize) -> Option<String> {
    let value = form.value(index);
    (!value.is_empty()).then(|| value.to_string())
}

pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Validate the project form and build the create request
pub fn validate_new_project(form: &FormState, date: &str) -> Result<CreateProject, ValidationError> {
    let name = required(form, PROJECT_NAME)?;
    let patient_id = required(form, PROJECT_PATIENT_ID)?;

    let request = CreateProject::new(name, patient_id).date(date);
    Ok(match optional(form, PROJECT_DESCRIPTION) {
        Some(description) => request.description(description),
        None => request,
    })
}

/// Validate the project form against the loaded project. Only changed fields are kept.
pub fn validate_project_changes(
    form: &FormState,
    original: &Project,
) -> Result<ProjectUpdate, ValidationError> {
    let name = required(form, PROJECT_NAME)?;
    let patient_id = required(form, PROJECT_PATIENT_ID)?;
    let description = form.value(PROJECT_DESCRIPTION).to_string();

    let original_description = original.description.as_deref().unwrap_or("").trim();

    Ok(ProjectUpdate {
        name: (name != original.name).then_some(name),
        patient_id: (patient_id != original.patient_id).then_some(patient_id),
        description: (description != original_description).then_some(description),
        ..Default::default()
    })
}

pub fn validate_report_edit(form: &FormState) -> Result<ReportUpdate, ValidationError> {
    let name = required(form, REPORT_NAME)?;
    Ok(ReportUpdate {
        name: Some(name),
        notes: Some(form.value(REPORT_NOTES).to_string()),
    })
}

/// Build the report saved from the analysis screen. One image is recorded per report.
pub fn validate_new_report(
    form: &FormState,
    project: &Project,
    angles: Vec<AngleMeasurement>,
    date: &str,
) -> Result<NewReport, ValidationError> {
    let name = required(form, REPORT_NAME)?;
    if angles.is_empty() {
        return Err(ValidationError::NotAnalyzed);
    }

    Ok(NewReport::for_project(project, name)
        .date(date)
        .notes(form.value(REPORT_NOTES))
        .image_count(1u32)
        .angles(angles))
}

/// Typed confirmation for destructive project deletion. The name must match exactly.
pub fn confirm_project_name(typed: &str, project_name: &str) -> Result<(), ValidationError> {
    if typed == project_name {
        Ok(())
    } else {
        Err(ValidationError::ConfirmationMismatch {
            expected: project_name.to_string(),
        })
    }
}

pub fn default_analysis_name(project: &Project, image_number: usize) -> String {
    format!("Analysis - {} - Image {}", project.patient_id, image_number)
}

pub fn default_analysis_notes(project: &Project, image_number: usize) -> String {
    format!(
        "Radiograph analysis for patient {}. Image {}.",
        project.patient_id, image_number
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::form::TextField;
    use radiolab_api::endpoints::ProjectId;

    fn project() -> Project {
        Project {
            id: ProjectId::new(4),
            name: "Alpha".to_string(),
            patient_id: "PAC-1".to_string(),
            description: Some("Initial assessment".to_string()),
            date: "15/04/2025".to_string(),
            image_count: 3,
            report_count: 2,
        }
    }

    fn project_form(name: &str, patient_id: &str, description: &str) -> FormState {
        FormState::new(vec![
            TextField::required("Name").with_value(name),
            TextField::required("Patient ID").with_value(patient_id),
            TextField::optional("Description").with_value(description),
        ])
    }

    fn report_form(name: &str, notes: &str) -> FormState {
        FormState::new(vec![
            TextField::required("Name").with_value(name),
            TextField::optional("Notes").with_value(notes),
        ])
    }

    // ========================================================================
    // Project form
    // ========================================================================

    #[test]
    fn test_new_project_requires_name() {
        let err = validate_new_project(&project_form("  ", "PAC-1", ""), "01/01/2025").unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "Name" });
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_new_project_requires_patient_id() {
        let err = validate_new_project(&project_form("Alpha", "", ""), "01/01/2025").unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "Patient ID" });
    }

    #[test]
    fn test_new_project_trims_fields() {
        let request =
            validate_new_project(&project_form(" Alpha ", " PAC-1 ", "  "), "01/01/2025").unwrap();
        let project = request.project();

        assert_eq!(project.name, "Alpha");
        assert_eq!(project.patient_id, "PAC-1");
        assert_eq!(project.description, None);
        assert_eq!(project.date.as_deref(), Some("01/01/2025"));
        assert_eq!(project.image_count, 0);
    }

    #[test]
    fn test_project_changes_only_include_edited_fields() {
        let update =
            validate_project_changes(&project_form("Alpha", "PAC-7", "Initial assessment"), &project())
                .unwrap();

        assert_eq!(
            update,
            ProjectUpdate {
                patient_id: Some("PAC-7".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unchanged_project_form_is_empty_update() {
        let update = validate_project_changes(
            &project_form("Alpha", "PAC-1", "Initial assessment"),
            &project(),
        )
        .unwrap();
        assert!(update.is_empty());
    }

    // ========================================================================
    // Reports
    // ========================================================================

    #[test]
    fn test_report_edit_trims_and_requires_name() {
        assert_eq!(
            validate_report_edit(&report_form("", "x")).unwrap_err(),
            ValidationError::Required { field: "Name" }
        );

        let update = validate_report_edit(&report_form("  Follow-up ", " stable ")).unwrap();
        assert_eq!(update.name.as_deref(), Some("Follow-up"));
        assert_eq!(update.notes.as_deref(), Some("stable"));
    }

    #[test]
    fn test_new_report_copies_project_fields() {
        let angles = vec![AngleMeasurement::new("Hallux Valgus angle", "23°")];
        let report = validate_new_report(
            &report_form("Analysis - PAC-1 - Image 1", "notes"),
            &project(),
            angles.clone(),
            "02/02/2025",
        )
        .unwrap();

        assert_eq!(report.project_id, ProjectId::new(4));
        assert_eq!(report.project_name, "Alpha");
        assert_eq!(report.patient_id, "PAC-1");
        assert_eq!(report.image_count, 1);
        assert_eq!(report.angles, angles);
        assert_eq!(report.date, "02/02/2025");
    }

    #[test]
    fn test_new_report_needs_measurements() {
        let err = validate_new_report(&report_form("Name", ""), &project(), Vec::new(), "x")
            .unwrap_err();
        assert_eq!(err, ValidationError::NotAnalyzed);
    }

    // ========================================================================
    // Confirmation and defaults
    // ========================================================================

    #[test]
    fn test_confirmation_must_match_exactly() {
        assert!(confirm_project_name("Alpha", "Alpha").is_ok());
        assert!(confirm_project_name("alpha", "Alpha").is_err());
        assert!(confirm_project_name("Alpha ", "Alpha").is_err());
    }

    #[test]
    fn test_default_analysis_text() {
        assert_eq!(
            default_analysis_name(&project(), 2),
            "Analysis - PAC-1 - Image 2"
        );
        assert_eq!(
            default_analysis_notes(&project(), 1),
            "Radiograph analysis for patient PAC-1. Image 1."
        );
    }
}
