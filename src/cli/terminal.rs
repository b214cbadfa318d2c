//! Terminal implementations of the dialog's notifier and file picker

use crate::cli::utils::{expand_home, messages};
use async_trait::async_trait;
use helmrepo::dialog::{FileFilter, FilePicker, OpenDialogOptions, OpenDialogResult};
use helmrepo::{Notifier, ServiceError};
use inquire::validator::Validation;
use inquire::{CustomUserError, InquireError, Text};
use std::path::Path;
use tracing::debug;

/// Prints notifications to stdout/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_success(&self, content: &str) {
        println!("{}", messages::ok(content));
    }

    fn notify_error(&self, content: &str) {
        eprintln!("{}", messages::error(content));
    }
}

/// File picker backed by an inquire text prompt.
/// Esc (or an empty answer) counts as canceling the picker.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquireFilePicker;

pub(crate) fn filter_hint(filters: &[FileFilter]) -> String {
    filters
        .iter()
        .map(|f| format!("{}: {}", f.name, f.extensions.join(", ")))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Note printed when the chosen file falls outside the slot's own filter.
/// The trailing "Any" filter still lets such a file through.
pub(crate) fn filter_mismatch(filters: &[FileFilter], path: &Path) -> Option<String> {
    let preferred = filters.first()?;
    if preferred.matches(path) {
        return None;
    }
    Some(format!(
        "{} is not a typical {} ({}), using it anyway",
        path.display(),
        preferred.name.to_lowercase(),
        preferred.extensions.join(", ")
    ))
}

/// Map the prompt answer to a picker result
pub(crate) fn to_dialog_result(answer: Option<String>) -> OpenDialogResult {
    match answer.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => OpenDialogResult::selected(expand_home(path)),
        _ => OpenDialogResult::canceled(),
    }
}

fn prompt_for_file(options: OpenDialogOptions) -> Result<OpenDialogResult, InquireError> {
    let help = format!("{} | Esc: keep current value", filter_hint(&options.filters));
    let initial = options
        .default_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let label = format!("{} ({})", options.message, options.button_label);

    let answer = Text::new(&label)
        .with_initial_value(&initial)
        .with_help_message(&help)
        .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
            let input = input.trim();
            if input.is_empty() || expand_home(input).is_file() {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("File does not exist".into()))
            }
        })
        .prompt_skippable()?;

    let result = to_dialog_result(answer);
    if let Some(note) = result
        .first_path()
        .and_then(|path| filter_mismatch(&options.filters, path))
    {
        eprintln!("{}", messages::info(&note));
    }
    Ok(result)
}

#[async_trait]
impl FilePicker for InquireFilePicker {
    async fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> Result<OpenDialogResult, ServiceError> {
        debug!("Opening file prompt: {}", options.message);

        let result = tokio::task::spawn_blocking(move || prompt_for_file(options))
            .await
            .map_err(|e| ServiceError::Custom(format!("File prompt task failed: {}", e)))?;

        match result {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) => Ok(OpenDialogResult::canceled()),
            Err(InquireError::OperationInterrupted) => Err(ServiceError::Interrupted),
            Err(e) => Err(ServiceError::Custom(format!("File prompt failed: {}", e))),
        }
    }
}
