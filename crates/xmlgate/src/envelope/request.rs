//! Typed view of a request that passed validation

use std::fmt;

use crate::tree::Occurrence;

/// Request kinds carried inside `<function>`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FunctionKind {
    GetApiSession,
    ReadByName,
    Create,
}

impl FunctionKind {
    /// Element name inside `<function>`
    pub const fn tag(self) -> &'static str {
        match self {
            Self::GetApiSession => "getapisession",
            Self::ReadByName => "readbyname",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Sender details from `<control>`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Control {
    pub sender_id: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub password: String,
    pub control_id: String,
    pub unique_id: String,
    pub dtd_version: String,
    pub include_whitespace: String,
}

/// Credentials from `<authentication>`
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "method", rename_all = "lowercase"))]
pub enum Credentials {
    Session {
        #[cfg_attr(feature = "serde", serde(skip))]
        session_id: String,
    },
    Login {
        user_id: String,
        company_id: String,
        #[cfg_attr(feature = "serde", serde(skip))]
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session { .. } => f.debug_struct("Session").finish_non_exhaustive(),
            Self::Login {
                user_id,
                company_id,
                ..
            } => f
                .debug_struct("Login")
                .field("user_id", user_id)
                .field("company_id", company_id)
                .finish_non_exhaustive(),
        }
    }
}

/// `<readbyname>` query
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadByName {
    pub object: String,
    pub keys: String,
    pub fields: String,
    pub return_format: Option<String>,
    pub docparid: Option<String>,
}

/// Function payload
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "payload", rename_all = "lowercase"))]
pub enum FunctionCall {
    GetApiSession,
    ReadByName(ReadByName),
    /// Contents are passed through unvalidated
    Create(Occurrence),
}

impl FunctionCall {
    pub const fn kind(&self) -> FunctionKind {
        match self {
            Self::GetApiSession => FunctionKind::GetApiSession,
            Self::ReadByName(_) => FunctionKind::ReadByName,
            Self::Create(_) => FunctionKind::Create,
        }
    }
}

/// A request envelope that passed every structural check
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidatedRequest {
    pub control: Control,
    pub credentials: Credentials,
    /// `controlid` attribute of `<function>`
    pub control_id: String,
    pub call: FunctionCall,
}

impl ValidatedRequest {
    pub const fn kind(&self) -> FunctionKind {
        self.call.kind()
    }
}
