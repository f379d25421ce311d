//! User-facing failure descriptions.
//!
//! Every failed annotation or discovery ends in exactly one [`Diagnostic`].
//! The classifiers here are pure functions of status and body so they can be
//! exercised without a provider.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::providers::ProviderErrorBody;

/// Longest raw body excerpt quoted in a message.
const DETAIL_LIMIT: usize = 300;

/// Kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    NoCredential,
    DiscoveryFailed,
    AllModelsExhausted,
    QuotaExceeded,
    PermissionDenied,
    BadInput,
    Timeout,
    ProviderError,
    Unexpected,
}

impl DiagnosticCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCredential => "no_credential",
            Self::DiscoveryFailed => "discovery_failed",
            Self::AllModelsExhausted => "all_models_exhausted",
            Self::QuotaExceeded => "quota_exceeded",
            Self::PermissionDenied => "permission_denied",
            Self::BadInput => "bad_input",
            Self::Timeout => "timeout",
            Self::ProviderError => "provider_error",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, presentable failure.
///
/// `message` is multi-line: an emoji-prefixed upper-case title, the likely
/// cause, then what to do about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub message: String,
    /// HTTP status returned by the provider, when one was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<u16>,
    /// Number of models attempted, set for [`DiagnosticCategory::AllModelsExhausted`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models_tried: Option<usize>,
}

impl Diagnostic {
    fn new(category: DiagnosticCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider_status: None,
            models_tried: None,
        }
    }

    fn with_status(mut self, status: u16) -> Self {
        self.provider_status = Some(status);
        self
    }

    /// The request carried no usable text.
    pub fn empty_text() -> Self {
        Self::new(DiagnosticCategory::BadInput, "No se proporcionó texto")
    }

    /// No provider key is configured.
    pub fn no_credential() -> Self {
        Self::new(
            DiagnosticCategory::NoCredential,
            "🔑 API KEY NO CONFIGURADA\n\n\
             No hay una clave de Google Gemini disponible.\n\n\
             • Define GOOGLE_API_KEY en tu archivo .env o en el entorno\n\
             • O guárdala en el llavero con: avatar models auth\n\
             • Consigue una key gratuita en: aistudio.google.com",
        )
    }

    /// The model listing failed or could not be read.
    ///
    /// `status` is `None` for transport failures.
    pub fn discovery_failed(status: Option<u16>, detail: &str) -> Self {
        let cause = match status {
            Some(400) => "API Key inválida o mal formada.".to_string(),
            Some(403) => "API Key sin permisos para la API de Gemini.".to_string(),
            Some(code) => format!("Google respondió HTTP {code} al listar los modelos."),
            None => "No se pudo conectar con Google para obtener los modelos disponibles."
                .to_string(),
        };
        let mut message = format!("🔍 NO SE PUDIERON LISTAR LOS MODELOS\n\n{cause}\n\n");
        if !detail.is_empty() {
            message.push_str(&format!("Detalle: {}\n\n", truncate(detail)));
        }
        message.push_str(
            "Usa el botón '🔍 TEST API GEMINI' (o `avatar models list`) para diagnosticar.\n\
             Verifica tu conexión a internet.",
        );

        let diagnostic = Self::new(DiagnosticCategory::DiscoveryFailed, message);
        match status {
            Some(code) => diagnostic.with_status(code),
            None => diagnostic,
        }
    }

    /// Every model was skipped as unavailable, or none were usable.
    pub fn all_models_exhausted(tried: usize) -> Self {
        let cause = if tried == 0 {
            "Tu API key no tiene ningún modelo de texto utilizable.".to_string()
        } else {
            format!("Se probaron {tried} modelos y ninguno respondió correctamente.")
        };
        let mut diagnostic = Self::new(
            DiagnosticCategory::AllModelsExhausted,
            format!(
                "🔍 NINGÚN MODELO FUNCIONÓ\n\n{cause}\n\n\
                 Usa el botón '🔍 TEST API GEMINI' (o `avatar models list`) para ver qué modelos tienes disponibles.\n\
                 Puede ser un problema de cuota o permisos."
            ),
        );
        diagnostic.models_tried = Some(tried);
        diagnostic
    }

    /// A call did not answer within its budget.
    pub fn timeout(budget: Duration) -> Self {
        Self::new(
            DiagnosticCategory::Timeout,
            format!(
                "⏱️ TIEMPO DE ESPERA AGOTADO\n\n\
                 Gemini no respondió en {} segundos.\n\
                 Verifica tu conexión a internet.",
                budget.as_secs()
            ),
        )
    }

    /// Anything the flow does not otherwise expect.
    pub fn unexpected(description: impl fmt::Display) -> Self {
        Self::new(
            DiagnosticCategory::Unexpected,
            format!("❌ Error inesperado: {description}"),
        )
    }

    /// Map a transport or crate error that ended the flow.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Timeout(budget) => Self::timeout(*budget),
            other => Self::unexpected(other),
        }
    }
}

/// Provider detail for a failed call: `error.message`, else the start of the body.
pub fn provider_detail(body: &str) -> String {
    ProviderErrorBody::parse(body)
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| truncate(body))
}

fn truncate(body: &str) -> String {
    body.chars().take(DETAIL_LIMIT).collect()
}

/// Whether a failed generation call means "this model is not available, try
/// the next one".
///
/// 404 always is. A 400 is model-scoped when the structured error says
/// `NOT_FOUND` or `FAILED_PRECONDITION`, when its message names the model,
/// or when the body is not a structured error. Other 400s are about the
/// payload.
pub fn is_model_unavailable(status: u16, body: &str, model: &str) -> bool {
    match status {
        404 => true,
        400 => match ProviderErrorBody::parse(body) {
            None => true,
            Some(parsed) => {
                let error = parsed.error;
                matches!(
                    error.status.as_deref(),
                    Some("NOT_FOUND") | Some("FAILED_PRECONDITION")
                ) || error.message.contains(model)
                    || error.message.contains("models/")
            }
        },
        _ => false,
    }
}

/// Classify the generation response that stopped the fallback.
pub fn classify_failure(status: u16, body: &str) -> Diagnostic {
    let detail = provider_detail(body);

    let diagnostic = match status {
        429 => Diagnostic::new(
            DiagnosticCategory::QuotaExceeded,
            "⚠️ CUOTA DE GEMINI AGOTADA\n\n\
             Has superado el límite gratuito de la API de Google.\n\n\
             Opciones:\n\
             • Espera unos minutos (cuota/minuto) o mañana (cuota/día)\n\
             • Nueva key gratuita en: aistudio.google.com\n\
             • Plan de pago en: console.cloud.google.com",
        ),
        403 => Diagnostic::new(
            DiagnosticCategory::PermissionDenied,
            format!(
                "🚫 API KEY SIN PERMISOS\n\n\
                 La API key configurada no tiene acceso a Gemini.\n\n\
                 • Ve a aistudio.google.com → API Keys\n\
                 • Genera una nueva key y actualiza GOOGLE_API_KEY\n\n\
                 Detalle: {detail}"
            ),
        ),
        400 => Diagnostic::new(
            DiagnosticCategory::BadInput,
            format!(
                "📋 ERROR EN EL TEXTO\n\n\
                 El texto es demasiado largo o tiene caracteres no permitidos.\n\n\
                 Detalle: {detail}"
            ),
        ),
        _ => {
            let code = ProviderErrorBody::parse(body)
                .and_then(|b| b.error.code)
                .unwrap_or(status);
            Diagnostic::new(
                DiagnosticCategory::ProviderError,
                format!(
                    "❌ ERROR GEMINI (HTTP {code})\n\n\
                     Revisa tu API key (GOOGLE_API_KEY).\n\n\
                     Detalle: {detail}"
                ),
            )
        }
    };

    diagnostic.with_status(status)
}
