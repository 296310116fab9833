use thiserror::Error;
use wasm_bindgen::JsValue;

/// Which stage of loading a track went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Parse,
}

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Failed to fetch '{reference}': {message}")]
    Fetch { reference: String, message: String },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Document ended inside <{element}>")]
    UnexpectedEof { element: &'static str },

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}

impl TrackError {
    pub fn fetch(reference: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            reference: reference.into(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Fetch { .. } => FailureKind::Fetch,
            Self::XmlParse(_)
            | Self::UnexpectedEof { .. }
            | Self::MissingAttribute { .. }
            | Self::InvalidAttribute { .. } => FailureKind::Parse,
        }
    }
}

impl From<TrackError> for JsValue {
    fn from(e: TrackError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
