//! Error types for `embalse-core`.
//!
//! Data-access errors carry the store error for logging. Errors that end up
//! in front of an admin (validation, submission, login) display as short
//! Spanish sentences, ready to render next to the form.

use embalse_store::StoreError;

/// Errors from the two-step create operations of the data access layer.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No store is configured; the data access layer is in no-op mode.
    #[error("content store is not configured")]
    NotConfigured,

    /// The image upload step failed. Nothing was inserted.
    #[error("image upload failed: {0}")]
    Upload(StoreError),

    /// The insert step failed. A preceding upload is not rolled back.
    #[error("insert failed: {0}")]
    Insert(StoreError),

    /// The payload could not be encoded, or a stored row does not match
    /// the model.
    #[error("row could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The insert succeeded but the row sent back does not match the model.
    #[error("row stored but could not be read back: {0}")]
    Unreadable(serde_json::Error),
}

/// A required field is missing or malformed. Caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("El título es obligatorio.")]
    MissingTitle,

    #[error("La descripción es obligatoria.")]
    MissingDescription,

    #[error("Por favor selecciona una imagen.")]
    MissingImage,

    #[error("El archivo debe ser una imagen.")]
    NotAnImage,

    #[error("La fecha es obligatoria.")]
    MissingDate,

    #[error("La fecha \"{value}\" no es válida.")]
    InvalidDate { value: String },

    #[error("Categoría desconocida: \"{value}\".")]
    UnknownCategory { value: String },

    #[error("Sección desconocida: \"{value}\".")]
    UnknownSection { value: String },
}

/// Why a panel's create form did not produce a record.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Client-side validation failed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The store is not configured.
    #[error("El almacenamiento de contenido no está configurado.")]
    NotConfigured,

    /// The image could not be uploaded.
    #[error("Error al subir la imagen. Verifica que el bucket 'highlight-images' existe.")]
    Upload,

    /// The card row could not be inserted.
    #[error("Error al crear la tarjeta.")]
    CardNotCreated,

    /// The event row could not be inserted.
    #[error("Error al crear el evento.")]
    EventNotCreated,

    /// The row was stored but the store's reply could not be read; the
    /// reloaded list shows what was saved.
    #[error("Guardado. No se pudo leer la respuesta del almacenamiento; revisa la lista.")]
    Unconfirmed,
}

/// A login attempt that did not authenticate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The password check answered and said no.
    #[error("{0}")]
    Rejected(String),

    /// The password check could not be reached.
    #[error("Error de conexión.")]
    Unreachable,

    /// No password check is configured.
    #[error("Autenticación no configurada.")]
    NotConfigured,
}
