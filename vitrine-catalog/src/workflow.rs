//! Catalog CRUD workflow.
//!
//! One [`CatalogWorkflow`] per entity owns its list and its editor. Every
//! successful mutation is followed by a full reload; nothing is patched in
//! place. Failures are logged, reported to the operator through the
//! [`Notifier`], and returned as a [`VitrineError`].

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use vitrine_auth::StepUpGrant;
use vitrine_core::{Notification, Notifier, Order, Query, RowStore, VitrineError};

use crate::asset::AssetInputResolver;
use crate::entity::CatalogEntity;
use crate::form::validate_form;

const GENERIC_FAILURE: &str = "Une erreur est survenue. Veuillez réessayer.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Listed,
}

/// Whether the editor creates a record or updates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(String),
}

#[derive(Debug, Clone)]
pub enum Editor<E> {
    Closed,
    Editing {
        target: EditTarget,
        form: E,
        asset: AssetInputResolver,
        error: Option<String>,
    },
    Submitting {
        target: EditTarget,
        form: E,
        asset: AssetInputResolver,
    },
    ConfirmingDelete {
        id: String,
    },
}

/// Flat view of [`Editor`] for state checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Closed,
    EditingNew,
    EditingExisting,
    Submitting,
    ConfirmingDelete,
}

impl<E> Editor<E> {
    pub fn phase(&self) -> EditorPhase {
        match self {
            Editor::Closed => EditorPhase::Closed,
            Editor::Editing {
                target: EditTarget::New,
                ..
            } => EditorPhase::EditingNew,
            Editor::Editing { .. } => EditorPhase::EditingExisting,
            Editor::Submitting { .. } => EditorPhase::Submitting,
            Editor::ConfirmingDelete { .. } => EditorPhase::ConfirmingDelete,
        }
    }
}

pub struct CatalogWorkflow<E: CatalogEntity> {
    store: Arc<dyn RowStore>,
    notifier: Arc<dyn Notifier>,
    list_state: ListState,
    items: Vec<E>,
    editor: Editor<E>,
}

impl<E: CatalogEntity> CatalogWorkflow<E> {
    pub fn new(store: Arc<dyn RowStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            list_state: ListState::Idle,
            items: Vec::new(),
            editor: Editor::Closed,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn list_state(&self) -> ListState {
        self.list_state
    }

    pub fn editor(&self) -> &Editor<E> {
        &self.editor
    }

    pub fn phase(&self) -> EditorPhase {
        self.editor.phase()
    }

    /// Query every row, newest first, and replace the list wholesale.
    pub async fn load(&mut self) -> Result<(), VitrineError> {
        let previous = self.list_state;
        self.list_state = ListState::Loading;

        let query = Query::new().order_by(Order::desc(E::ORDER_COLUMN));
        let rows = guarded(self.store.select(E::TABLE, &query)).await;
        let loaded = rows.and_then(|rows| rows.into_iter().map(E::from_row).collect::<Result<Vec<_>, _>>());

        match loaded {
            Ok(items) => {
                tracing::debug!(table = E::TABLE, count = items.len(), "catalog list loaded");
                self.items = items;
                self.list_state = ListState::Listed;
                Ok(())
            }
            Err(err) => {
                self.list_state = match previous {
                    ListState::Listed => ListState::Listed,
                    _ => ListState::Idle,
                };
                Err(self.report("load", err))
            }
        }
    }

    pub fn open_new(&mut self) {
        self.open(EditTarget::New, E::default());
    }

    /// Open the editor on a listed record.
    pub fn open_existing(&mut self, id: &str) -> Result<(), VitrineError> {
        let form = self
            .items
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
            .ok_or_else(|| VitrineError::not_found(format!("No {} with id {}", E::TABLE, id)))?;
        self.open(EditTarget::Existing(id.to_string()), form);
        Ok(())
    }

    fn open(&mut self, target: EditTarget, form: E) {
        let asset = AssetInputResolver::with_initial(E::BUCKET, form.asset())
            .with_notifier(self.notifier.clone());
        self.editor = Editor::Editing {
            target,
            form,
            asset,
            error: None,
        };
    }

    pub fn form_mut(&mut self) -> Option<&mut E> {
        match &mut self.editor {
            Editor::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn asset_mut(&mut self) -> Option<&mut AssetInputResolver> {
        match &mut self.editor {
            Editor::Editing { asset, .. } => Some(asset),
            _ => None,
        }
    }

    /// Close the editor without saving.
    pub fn cancel(&mut self) {
        if !matches!(self.editor, Editor::Submitting { .. }) {
            self.editor = Editor::Closed;
        }
    }

    /// Validate, then insert or update. On success the list is reloaded and
    /// the editor closed; on failure the editor stays open with the error.
    pub async fn submit(&mut self) -> Result<(), VitrineError> {
        if !matches!(self.editor, Editor::Editing { .. }) {
            return Err(VitrineError::bad_request("Nothing is being edited"));
        }
        let Editor::Editing {
            target,
            mut form,
            asset,
            ..
        } = std::mem::replace(&mut self.editor, Editor::Closed)
        else {
            return Err(VitrineError::bad_request("Nothing is being edited"));
        };

        if asset.is_busy() {
            let err = VitrineError::conflict("Wait for the upload to finish before saving");
            self.editor = Editor::Editing {
                target,
                form,
                asset,
                error: Some(err.message.clone()),
            };
            return Err(err);
        }

        form.set_asset(asset.resolved().to_string());

        if let Err(err) = validate_form(&form, &format!("{} is invalid", E::LABEL)) {
            tracing::debug!(table = E::TABLE, errors = ?err.errors, "form rejected");
            self.notifier
                .notify(Notification::failure("Formulaire incomplet", err.message.clone()));
            self.editor = Editor::Editing {
                target,
                form,
                asset,
                error: Some(err.message.clone()),
            };
            return Err(err);
        }

        self.editor = Editor::Submitting {
            target: target.clone(),
            form: form.clone(),
            asset: asset.clone(),
        };

        let saved = match form.to_row() {
            Ok(row) => match &target {
                EditTarget::New => guarded(self.store.insert(E::TABLE, row)).await,
                EditTarget::Existing(id) => guarded(self.store.update(E::TABLE, id, row)).await,
            },
            Err(err) => Err(err),
        };

        match saved {
            Ok(_) => {
                tracing::info!(table = E::TABLE, target = ?target, "catalog record saved");
                self.editor = Editor::Closed;
                self.notifier.notify(Notification::success(
                    "Succès",
                    format!("{} enregistré avec succès", E::LABEL),
                ));
                self.load().await
            }
            Err(err) => {
                let err = self.report("save", err);
                self.editor = Editor::Editing {
                    target,
                    form,
                    asset,
                    error: Some(err.message.clone()),
                };
                Err(err)
            }
        }
    }

    pub fn request_delete(&mut self, id: impl Into<String>) {
        if !matches!(self.editor, Editor::Submitting { .. }) {
            self.editor = Editor::ConfirmingDelete { id: id.into() };
        }
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.editor, Editor::ConfirmingDelete { .. }) {
            self.editor = Editor::Closed;
        }
    }

    /// Issue the confirmed delete, then reload once. Refused with
    /// `Forbidden` when the step-up grant has lapsed.
    pub async fn confirm_delete(&mut self, grant: &StepUpGrant) -> Result<(), VitrineError> {
        if let Err(err) = grant.ensure_valid() {
            let err = VitrineError::normalize(err);
            self.notifier
                .notify(Notification::failure("Accès refusé", err.message.clone()));
            return Err(err);
        }
        if !matches!(self.editor, Editor::ConfirmingDelete { .. }) {
            return Err(VitrineError::bad_request("No delete awaiting confirmation"));
        }
        let Editor::ConfirmingDelete { id } = std::mem::replace(&mut self.editor, Editor::Closed) else {
            return Err(VitrineError::bad_request("No delete awaiting confirmation"));
        };

        match guarded(self.store.delete(E::TABLE, &id)).await {
            Ok(()) => {
                tracing::info!(table = E::TABLE, id = %id, "catalog record deleted");
                self.notifier.notify(Notification::success(
                    "Succès",
                    format!("{} supprimé avec succès", E::LABEL),
                ));
                self.load().await
            }
            Err(err) => Err(self.report("delete", err)),
        }
    }

    fn report(&self, action: &'static str, err: VitrineError) -> VitrineError {
        tracing::error!(
            table = E::TABLE,
            action,
            kind = err.name(),
            error = %err.message,
            "catalog operation failed"
        );
        self.notifier
            .notify(Notification::failure("Erreur", GENERIC_FAILURE));
        err
    }
}

/// Await a row-store call, normalizing its error and any panic.
pub(crate) async fn guarded<T, F>(call: F) -> Result<T, VitrineError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result.map_err(VitrineError::normalize),
        Err(_) => {
            tracing::error!("row store panicked");
            Err(VitrineError::general_error("Unexpected row store failure"))
        }
    }
}
