//! File-selection bridge for the certificate and key slots

use super::{AddRepoDialog, BusyGuard, DialogError, DialogResult};
use crate::core::repository::RepoField;
use crate::core::service::ServiceError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions offered when picking a client key
pub const KEY_EXTENSIONS: &[&str] = &["key", "keystore", "jks", "p12", "pfx", "pem"];

/// Extensions offered when picking a CA bundle or client certificate
pub const CERT_EXTENSIONS: &[&str] = &[
    "crt",
    "cer",
    "ca-bundle",
    "p7b",
    "p7c",
    "p7s",
    "p12",
    "pfx",
    "pem",
];

/// Draft fields that can be filled from a file picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSlot {
    Ca,
    Key,
    Cert,
}

impl FileSlot {
    /// In the order the form shows them
    pub const ALL: [FileSlot; 3] = [FileSlot::Key, FileSlot::Ca, FileSlot::Cert];

    pub fn field(self) -> RepoField {
        match self {
            FileSlot::Ca => RepoField::CaFile,
            FileSlot::Key => RepoField::KeyFile,
            FileSlot::Cert => RepoField::CertFile,
        }
    }

    pub fn label(self) -> &'static str {
        self.field().label()
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileSlot::Key => KEY_EXTENSIONS,
            FileSlot::Ca | FileSlot::Cert => CERT_EXTENSIONS,
        }
    }

    /// Picker filter restricted to this slot's extensions
    pub fn filter(self) -> FileFilter {
        FileFilter::new(self.label(), self.extensions())
    }
}

/// Named set of extensions; `*` matches every file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Fallback filter accepting any file
    pub fn any() -> Self {
        Self::new("Any", &["*"])
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.iter().any(|e| e == "*") {
            return true;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let file_name = file_name.to_ascii_lowercase();
        // Compound extensions such as "ca-bundle" are matched on the file name suffix
        self.extensions
            .iter()
            .any(|e| file_name.ends_with(&format!(".{}", e.to_ascii_lowercase())))
    }
}

/// Behaviour flags passed to the platform picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDialogProperty {
    OpenFile,
    ShowHiddenFiles,
}

/// Request for a single-file open dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialogOptions {
    /// Starting location; the slot's current value when set
    pub default_path: Option<PathBuf>,
    pub filters: Vec<FileFilter>,
    pub message: String,
    pub button_label: String,
    pub properties: Vec<OpenDialogProperty>,
}

impl OpenDialogOptions {
    /// Options used when browsing for `slot`
    pub fn for_slot(slot: FileSlot, current_value: &str) -> Self {
        Self {
            default_path: (!current_value.is_empty()).then(|| PathBuf::from(current_value)),
            filters: vec![slot.filter(), FileFilter::any()],
            message: "Select file".to_string(),
            button_label: "Use file".to_string(),
            properties: vec![OpenDialogProperty::OpenFile, OpenDialogProperty::ShowHiddenFiles],
        }
    }
}

/// Answer of the platform picker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenDialogResult {
    pub canceled: bool,
    pub file_paths: Vec<PathBuf>,
}

impl OpenDialogResult {
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            file_paths: Vec::new(),
        }
    }

    pub fn selected(path: impl Into<PathBuf>) -> Self {
        Self {
            canceled: false,
            file_paths: vec![path.into()],
        }
    }

    /// The chosen file, if the user picked one
    pub fn first_path(&self) -> Option<&Path> {
        if self.canceled {
            return None;
        }
        self.file_paths.first().map(PathBuf::as_path)
    }
}

/// Platform file-open dialog
#[async_trait]
pub trait FilePicker: Send + Sync {
    async fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> Result<OpenDialogResult, ServiceError>;
}

/// What a file-selection request did to the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// The path was written into the slot
    Selected(String),
    /// The user dismissed the picker; nothing changed
    Canceled,
    /// The dialog closed while the picker was open; the path was dropped
    Discarded,
}

impl AddRepoDialog {
    /// Browse for a file and store its path in `slot`
    pub async fn select_file(&self, slot: FileSlot) -> DialogResult<FileSelection> {
        let _busy =
            BusyGuard::acquire(&self.selecting).ok_or(DialogError::Busy("File selection"))?;

        let field = slot.field();
        let (session, options) = self.with_form(|form| {
            (
                form.session(),
                OpenDialogOptions::for_slot(slot, form.draft.field(field)),
            )
        });

        let result = self
            .collaborators
            .picker
            .show_open_dialog(options)
            .await
            .map_err(DialogError::Picker)?;

        let Some(path) = result.first_path() else {
            debug!("File selection for {} canceled", slot.label());
            return Ok(FileSelection::Canceled);
        };
        let path = path.to_string_lossy().into_owned();

        let applied = self.with_form(|form| {
            if form.session() != session {
                return false;
            }
            *form.draft.field_mut(field) = path.clone();
            true
        });

        if !applied {
            debug!(
                "Dropping file selection for {}: dialog closed meanwhile",
                slot.label()
            );
            return Ok(FileSelection::Discarded);
        }

        debug!("Selected {} for {}", path, slot.label());
        Ok(FileSelection::Selected(path))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dialog::tests::AcceptAll;
    use crate::dialog::{DialogCollaborators, DialogVisibility};
    use crate::events::NotificationBus;
    use std::sync::{Arc, Mutex};
    use tokio::sync::{oneshot, Notify};

    /// Picker returning a fixed answer and recording the options it was given
    struct ScriptedPicker {
        answer: OpenDialogResult,
        seen: Mutex<Vec<OpenDialogOptions>>,
    }

    impl ScriptedPicker {
        fn new(answer: OpenDialogResult) -> Arc<Self> {
            Arc::new(Self {
                answer,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl FilePicker for ScriptedPicker {
        async fn show_open_dialog(
            &self,
            options: OpenDialogOptions,
        ) -> Result<OpenDialogResult, ServiceError> {
            self.seen.lock().unwrap().push(options);
            Ok(self.answer.clone())
        }
    }

    /// Picker that blocks until released
    struct GatedPicker {
        entered: Notify,
        release: Mutex<Option<oneshot::Receiver<OpenDialogResult>>>,
    }

    #[async_trait]
    impl FilePicker for GatedPicker {
        async fn show_open_dialog(
            &self,
            _options: OpenDialogOptions,
        ) -> Result<OpenDialogResult, ServiceError> {
            let release = self.release.lock().unwrap().take().unwrap();
            self.entered.notify_one();
            Ok(release.await.unwrap())
        }
    }

    struct FailingPicker;

    #[async_trait]
    impl FilePicker for FailingPicker {
        async fn show_open_dialog(
            &self,
            _options: OpenDialogOptions,
        ) -> Result<OpenDialogResult, ServiceError> {
            Err(ServiceError::Custom("no display".to_string()))
        }
    }

    fn dialog_with(picker: Arc<dyn FilePicker>) -> AddRepoDialog {
        AddRepoDialog::new(
            DialogCollaborators {
                manager: Arc::new(AcceptAll),
                picker,
                notifier: Arc::new(NotificationBus::new()),
            },
            || {},
        )
        .with_visibility(DialogVisibility::new())
    }

    #[test]
    fn test_slot_extension_sets() {
        assert_eq!(
            FileSlot::Key.extensions(),
            &["key", "keystore", "jks", "p12", "pfx", "pem"]
        );
        assert_eq!(FileSlot::Ca.extensions(), CERT_EXTENSIONS);
        assert_eq!(FileSlot::Cert.extensions(), CERT_EXTENSIONS);
        assert_eq!(FileSlot::Ca.field(), RepoField::CaFile);
    }

    #[test]
    fn test_filter_matching() {
        let filter = FileSlot::Ca.filter();
        assert!(filter.matches(Path::new("/certs/ca.pem")));
        assert!(filter.matches(Path::new("/certs/bundle.CA-BUNDLE")));
        assert!(!filter.matches(Path::new("/certs/client.key")));
        assert!(!filter.matches(Path::new("/certs/pem")));
        assert!(FileFilter::any().matches(Path::new("/anything")));
    }

    #[test]
    fn test_options_for_slot() {
        let options = OpenDialogOptions::for_slot(FileSlot::Key, "/certs/old.key");
        assert_eq!(options.default_path, Some(PathBuf::from("/certs/old.key")));
        assert_eq!(options.filters.len(), 2);
        assert_eq!(options.filters[0].name, "Key file");
        assert_eq!(options.filters[1], FileFilter::any());
        assert_eq!(options.message, "Select file");
        assert_eq!(options.button_label, "Use file");
        assert!(options.properties.contains(&OpenDialogProperty::OpenFile));

        let options = OpenDialogOptions::for_slot(FileSlot::Cert, "");
        assert_eq!(options.default_path, None);
    }

    #[tokio::test]
    async fn test_selected_path_fills_slot() {
        let picker = ScriptedPicker::new(OpenDialogResult::selected("/certs/ca.pem"));
        let dialog = dialog_with(picker.clone());

        let selection = dialog.select_file(FileSlot::Ca).await.unwrap();

        assert_eq!(selection, FileSelection::Selected("/certs/ca.pem".to_string()));
        assert_eq!(dialog.draft().ca_file, "/certs/ca.pem");
        assert!(dialog.draft().cert_file.is_empty());
        assert!(!dialog.is_selecting_file());
    }

    #[tokio::test]
    async fn test_canceled_picker_leaves_slot_unchanged() {
        let picker = ScriptedPicker::new(OpenDialogResult {
            canceled: true,
            file_paths: vec![PathBuf::from("/ignored.pem")],
        });
        let dialog = dialog_with(picker.clone());
        dialog.set_field(RepoField::CertFile, "/certs/existing.crt");

        let selection = dialog.select_file(FileSlot::Cert).await.unwrap();

        assert_eq!(selection, FileSelection::Canceled);
        assert_eq!(dialog.draft().cert_file, "/certs/existing.crt");

        let seen = picker.seen.lock().unwrap();
        assert_eq!(
            seen[0].default_path,
            Some(PathBuf::from("/certs/existing.crt"))
        );
    }

    #[tokio::test]
    async fn test_empty_selection_is_a_cancel() {
        let picker = ScriptedPicker::new(OpenDialogResult::default());
        let dialog = dialog_with(picker);

        let selection = dialog.select_file(FileSlot::Key).await.unwrap();
        assert_eq!(selection, FileSelection::Canceled);
        assert!(dialog.draft().key_file.is_empty());
    }

    #[tokio::test]
    async fn test_only_first_path_is_used() {
        let picker = ScriptedPicker::new(OpenDialogResult {
            canceled: false,
            file_paths: vec![PathBuf::from("/a.key"), PathBuf::from("/b.key")],
        });
        let dialog = dialog_with(picker);

        dialog.select_file(FileSlot::Key).await.unwrap();
        assert_eq!(dialog.draft().key_file, "/a.key");
    }

    #[tokio::test]
    async fn test_picker_failure_changes_nothing() {
        let dialog = dialog_with(Arc::new(FailingPicker));
        dialog.set_field(RepoField::KeyFile, "/certs/k.key");

        let err = dialog.select_file(FileSlot::Key).await.unwrap_err();
        assert!(matches!(err, DialogError::Picker(_)));
        assert_eq!(dialog.draft().key_file, "/certs/k.key");
        assert!(!dialog.is_selecting_file());
    }

    #[tokio::test]
    async fn test_concurrent_selection_is_rejected_and_stale_result_dropped() {
        let (release, gate) = oneshot::channel();
        let picker = Arc::new(GatedPicker {
            entered: Notify::new(),
            release: Mutex::new(Some(gate)),
        });
        let dialog = dialog_with(picker.clone());
        dialog.open();

        let pending = dialog.select_file(FileSlot::Ca);
        let check = async {
            picker.entered.notified().await;
            assert!(dialog.is_selecting_file());

            let second = dialog.select_file(FileSlot::Cert).await;
            assert!(matches!(second, Err(DialogError::Busy(_))));

            dialog.close();
            dialog.open();
            dialog.set_field(RepoField::Name, "fresh");
            release
                .send(OpenDialogResult::selected("/certs/late.pem"))
                .unwrap();
        };

        let (selection, ()) = tokio::join!(pending, check);

        assert_eq!(selection.unwrap(), FileSelection::Discarded);
        let draft = dialog.draft();
        assert_eq!(draft.name, "fresh");
        assert!(draft.ca_file.is_empty());
        assert!(!dialog.is_selecting_file());
    }
    #[tokio::test]
    async fn test_close_of_hidden_dialog_discards_pending_selection() {
        let (release, gate) = oneshot::channel();
        let picker = Arc::new(GatedPicker {
            entered: Notify::new(),
            release: Mutex::new(Some(gate)),
        });
        let dialog = dialog_with(picker.clone());
        assert!(!dialog.is_open());

        let pending = dialog.select_file(FileSlot::Ca);
        let check = async {
            picker.entered.notified().await;
            dialog.close();
            release
                .send(OpenDialogResult::selected("/certs/late.pem"))
                .unwrap();
        };

        let (selection, ()) = tokio::join!(pending, check);

        assert_eq!(selection.unwrap(), FileSelection::Discarded);
        assert!(dialog.draft().is_empty());
    }
}
