//! Interactive editing session.
//!
//! A [`Session`] owns the active subtitle document for one user-facing
//! workflow: transcribe, edit, translate (with a one-step way back),
//! export. The core provides no locking across sessions; each session
//! belongs to one caller at a time.

use std::path::Path;

use crate::subtitles::{
    self, EditError, ExportError, ExportFormat, ExportOptions, SubtitleDocument, SubtitleError,
};
use crate::translate::{translate_document, TranslateError, TranslationModel};

/// The active document plus the pre-translation backup.
#[derive(Debug, Default)]
pub struct Session {
    document: SubtitleDocument,
    original: Option<SubtitleDocument>,
}

impl Session {
    /// Create a session with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session around an existing document.
    pub fn with_document(document: SubtitleDocument) -> Self {
        Self {
            document,
            original: None,
        }
    }

    /// Replace the active document wholesale.
    ///
    /// Loading discards the translation backup; a rollback would
    /// otherwise restore text belonging to the previous media.
    pub fn load(&mut self, document: SubtitleDocument) {
        self.document = document;
        self.original = None;
    }

    /// The active document.
    pub fn document(&self) -> &SubtitleDocument {
        &self.document
    }

    /// Mutable access for the post-processing tools.
    pub fn document_mut(&mut self) -> &mut SubtitleDocument {
        &mut self.document
    }

    /// Whether a translation backup exists.
    pub fn can_rollback(&self) -> bool {
        self.original.is_some()
    }

    /// Replace the text of one entry.
    pub fn edit_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        self.document.edit_text(index, text)
    }

    /// Translate the document, keeping the current version for one
    /// rollback step.
    ///
    /// On translation failure the session is left untouched. A second
    /// translation replaces the backup, so rollback always restores the
    /// most recent pre-translation state.
    pub fn apply_translation(
        &mut self,
        model: &dyn TranslationModel,
        source: &str,
        target: &str,
    ) -> Result<(), TranslateError> {
        let translated = translate_document(model, &self.document, source, target)?;
        self.original = Some(std::mem::replace(&mut self.document, translated));
        Ok(())
    }

    /// Restore the pre-translation document.
    ///
    /// The backup stays in place, so calling this again after another
    /// look at the translation restores the same text. Fails when the
    /// session has never translated.
    pub fn rollback(&mut self) -> Result<(), EditError> {
        match &self.original {
            Some(original) => {
                self.document = original.clone();
                Ok(())
            }
            None => Err(EditError::invalid_argument(
                "rollback",
                "original subtitles are already loaded",
            )),
        }
    }

    /// Serialize the active document.
    pub fn export(
        &self,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        subtitles::export(&self.document, format, options)
    }

    /// Serialize the active document to a file.
    pub fn export_to_file(
        &self,
        path: impl AsRef<Path>,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<(), SubtitleError> {
        subtitles::export_to_file(&self.document, path, format, options)
    }
}
