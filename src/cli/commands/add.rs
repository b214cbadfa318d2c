//! Add command - register a custom Helm repository

use crate::cli::error::{CliError, CliResult};
use crate::cli::terminal::{ConsoleNotifier, InquireFilePicker};
use crate::cli::utils::messages;
use clap::Args;
use helmrepo::dialog::{AddRepoDialog, DialogCollaborators, FileSlot, SubmitOutcome};
use helmrepo::validation::{validate_field, FieldError};
use helmrepo::{DialogVisibility, RepoField, ServiceConfig, TomlRepositoryManager};
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, Password, PasswordDisplayMode, Text};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Add a custom Helm chart repository
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Repository name (omit to start the interactive dialog)
    #[arg(long, requires = "url")]
    pub name: Option<String>,

    /// Repository URL
    #[arg(long)]
    pub url: Option<String>,

    /// Username for the chart repository
    #[arg(long)]
    pub username: Option<String>,

    /// Password for the chart repository
    #[arg(long)]
    pub password: Option<String>,

    /// Skip TLS certificate checks for the repository
    #[arg(long)]
    pub insecure_skip_tls_verify: bool,

    /// CA bundle used to verify the repository certificate
    #[arg(long)]
    pub ca_file: Option<PathBuf>,

    /// Client key file
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Client certificate file
    #[arg(long)]
    pub cert_file: Option<PathBuf>,
}

impl AddArgs {
    fn is_interactive(&self) -> bool {
        self.name.is_none()
    }

    fn sets_options(&self) -> bool {
        self.insecure_skip_tls_verify
            || self.username.is_some()
            || self.password.is_some()
            || self.ca_file.is_some()
            || self.key_file.is_some()
            || self.cert_file.is_some()
    }

    /// Copy the flags into the dialog's draft, expanding "More" when they touch it
    fn apply_to(self, dialog: &AddRepoDialog) {
        if self.sets_options() && !dialog.show_options() {
            dialog.toggle_options();
        }

        let text_fields = [
            (RepoField::Name, self.name),
            (RepoField::Url, self.url),
            (RepoField::Username, self.username),
            (RepoField::Password, self.password),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                dialog.set_field(field, value);
            }
        }

        let path_fields = [
            (RepoField::CaFile, self.ca_file),
            (RepoField::KeyFile, self.key_file),
            (RepoField::CertFile, self.cert_file),
        ];
        for (field, value) in path_fields {
            if let Some(path) = value {
                dialog.set_field(field, path.display().to_string());
            }
        }

        dialog.set_insecure_skip_tls_verify(self.insecure_skip_tls_verify);
    }
}

pub async fn execute_add(args: AddArgs, config: ServiceConfig) -> CliResult<()> {
    execute_add_with_visibility(args, config, DialogVisibility::global().clone()).await
}

pub(crate) async fn execute_add_with_visibility(
    args: AddArgs,
    config: ServiceConfig,
    visibility: DialogVisibility,
) -> CliResult<()> {
    let store = Arc::new(TomlRepositoryManager::new(config.repositories_path.clone()));
    let dialog = AddRepoDialog::new(
        DialogCollaborators {
            manager: store.clone(),
            picker: Arc::new(InquireFilePicker),
            notifier: Arc::new(ConsoleNotifier),
        },
        move || debug!("Repository list changed"),
    )
    .with_visibility(visibility)
    .with_config(config.dialog);

    if open_with_flags(&dialog, args) {
        return run_wizard(&dialog, store.config_path()).await;
    }

    let outcome = dialog.submit().await?;
    dialog.close();
    outcome_to_result(outcome)
}

/// Show the dialog pre-filled from the flags; returns whether the wizard should run
fn open_with_flags(dialog: &AddRepoDialog, args: AddArgs) -> bool {
    dialog.open();
    let interactive = args.is_interactive();
    args.apply_to(dialog);
    interactive
}

fn outcome_to_result(outcome: SubmitOutcome) -> CliResult<()> {
    match outcome {
        SubmitOutcome::Added => Ok(()),
        SubmitOutcome::Failed(reason) => Err(CliError::AddFailed(reason)),
        SubmitOutcome::Invalid(errors) => Err(CliError::Validation(
            errors
                .iter()
                .map(FieldError::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

async fn run_wizard(dialog: &AddRepoDialog, repositories_path: &Path) -> CliResult<()> {
    println!("Add custom Helm Repo");
    println!(
        "{}",
        messages::info(&format!(
            "Repositories file: {}",
            repositories_path.display()
        ))
    );

    let result = wizard_rounds(dialog).await;
    dialog.close();
    result
}

async fn wizard_rounds(dialog: &AddRepoDialog) -> CliResult<()> {
    loop {
        edit_form(dialog).await?;

        let outcome = dialog.submit().await?;
        if outcome == SubmitOutcome::Added {
            return Ok(());
        }

        // The draft is still there; offer another round of edits
        let retry = Confirm::new("Edit and try again?")
            .with_default(true)
            .prompt()?;
        if !retry {
            return outcome_to_result(outcome);
        }
    }
}

async fn edit_form(dialog: &AddRepoDialog) -> CliResult<()> {
    prompt_field(dialog, RepoField::Name)?;
    prompt_field(dialog, RepoField::Url)?;

    let more = Confirm::new("More (security settings and credentials)?")
        .with_default(dialog.show_options())
        .prompt()?;
    if more != dialog.show_options() {
        dialog.toggle_options();
    }

    if dialog.show_options() {
        edit_options(dialog).await?;
    }
    Ok(())
}

async fn edit_options(dialog: &AddRepoDialog) -> CliResult<()> {
    println!("Security settings");
    let skip_tls = Confirm::new("Skip TLS certificate checks for the repository")
        .with_default(dialog.draft().insecure_skip_tls_verify)
        .prompt()?;
    dialog.set_insecure_skip_tls_verify(skip_tls);

    for slot in FileSlot::ALL {
        let selection = dialog.select_file(slot).await?;
        debug!("{}: {:?}", slot.label(), selection);
    }

    println!("Chart Repository Credentials");
    prompt_field(dialog, RepoField::Username)?;

    let password = Password::new(RepoField::Password.label())
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Esc: keep current value")
        .prompt_skippable()?;
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        dialog.set_field(RepoField::Password, password);
    }
    Ok(())
}

/// Prompt for a text field, pre-filled with the draft value and checked by the field's validators
fn prompt_field(dialog: &AddRepoDialog, field: RepoField) -> CliResult<()> {
    let current = dialog.draft().field(field).to_string();
    let value = Text::new(field.label())
        .with_initial_value(&current)
        .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
            Ok(match validate_field(field, input) {
                Ok(()) => Validation::Valid,
                Err(e) => Validation::Invalid(e.message.into()),
            })
        })
        .prompt()?;
    dialog.set_field(field, value);
    Ok(())
}
