/// Protocol types shared by the SuiteCRM session manager and the PDF generator
use serde::Serialize;
use serde_json::Value;

/// Path of the SuiteCRM v4.1 REST endpoint, relative to the base URL
pub const REST_PATH: &str = "/service/v4_1/rest.php";

/// Path of the PDF entry point, relative to the base URL
pub const PDF_ENTRY_POINT: &str = "/index.php?entryPoint=generatePdf";

/// Module name SuiteCRM uses for FITAC records
pub const FITAC_MODULE: &str = "Fitac_fitac";

/// Application name reported on login
pub const APPLICATION_NAME: &str = "TEFI Rust Client";

/// Error number SuiteCRM returns for an invalid session
pub const INVALID_SESSION_NUMBER: i64 = 11;

/// Error name SuiteCRM returns for an invalid session
pub const INVALID_SESSION_NAME: &str = "Invalid Session ID";

/// Cookie set by the PDF entry point when the login session has expired
pub const LOGIN_ERROR_COOKIE: &str = "loginErrorMessage";
pub const SESSION_EXPIRED_LABEL: &str = "LBL_SESSION_EXPIRED";

/// Client-side view of the remote session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(String),
}

impl SessionState {
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated(token) => Some(token),
            SessionState::Unauthenticated => None,
        }
    }
}

/// RPC methods used against the REST endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteCrmMethod {
    Login,
    Logout,
}

impl SuiteCrmMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteCrmMethod::Login => "login",
            SuiteCrmMethod::Logout => "logout",
        }
    }
}

/// Form-encoded RPC envelope
#[derive(Debug, Clone, Serialize)]
pub struct SuiteCrmRequest {
    pub method: &'static str,
    pub input_type: &'static str,
    pub response_type: &'static str,
    pub rest_data: String,
}

impl SuiteCrmRequest {
    pub fn new(method: SuiteCrmMethod, args: &Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: method.as_str(),
            input_type: "JSON",
            response_type: "JSON",
            rest_data: serde_json::to_string(args)?,
        })
    }
}

/// Fields of interest in an RPC response. Logout answers with `null`, which maps to all-None.
#[derive(Debug, Clone, Default)]
pub struct SuiteCrmResponse {
    pub id: Option<String>,
    pub number: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SuiteCrmResponse {
    /// Fields are read independently; one of unexpected shape does not hide the others.
    pub fn from_value(value: Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            id: text("id"),
            number: value.get("number").and_then(|n| match n {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            name: text("name"),
            description: text("description"),
        }
    }

    /// Either marker is enough to treat the session as expired.
    pub fn is_session_expired(&self) -> bool {
        self.number == Some(INVALID_SESSION_NUMBER)
            || self.name.as_deref() == Some(INVALID_SESSION_NAME)
    }
}

/// One PDF request: which record, which template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfRequest {
    pub fitac_id: String,
    pub template_id: String,
}

impl PdfRequest {
    pub fn new(fitac_id: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            fitac_id: fitac_id.into(),
            template_id: template_id.into(),
        }
    }

    /// Form fields in the order the entry point receives them
    pub fn form_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("module", FITAC_MODULE),
            ("task", "pdf"),
            ("templateID", self.template_id.as_str()),
            ("uid", self.fitac_id.as_str()),
        ]
    }
}

/// True when any `set-cookie` value carries `loginErrorMessage=LBL_SESSION_EXPIRED`.
pub fn cookies_signal_expiry<'a, I>(set_cookie_values: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    set_cookie_values.into_iter().any(|header| {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(key, value)| key.trim() == LOGIN_ERROR_COOKIE && value.trim() == SESSION_EXPIRED_LABEL)
    })
}
