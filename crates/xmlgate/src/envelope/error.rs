//! Envelope validation failures

use std::fmt;
use thiserror::Error;

/// Required children of `<control>`, in the order they are checked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlField {
    SenderId,
    Password,
    ControlId,
    UniqueId,
    DtdVersion,
    IncludeWhitespace,
}

impl ControlField {
    pub const ALL: [Self; 6] = [
        Self::SenderId,
        Self::Password,
        Self::ControlId,
        Self::UniqueId,
        Self::DtdVersion,
        Self::IncludeWhitespace,
    ];

    /// Element name inside `<control>`
    pub const fn tag(self) -> &'static str {
        match self {
            Self::SenderId => "senderid",
            Self::Password => "password",
            Self::ControlId => "controlid",
            Self::UniqueId => "uniqueid",
            Self::DtdVersion => "dtdversion",
            Self::IncludeWhitespace => "includewhitespace",
        }
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// First structural violation found in a request envelope
///
/// The `Display` text is the message returned to the client.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Missing <request> element")]
    MissingRequest,
    #[error("Missing <control> element")]
    MissingControl,
    #[error("Missing or invalid <{0}> in <control>")]
    InvalidControlField(ControlField),
    #[error("Missing <operation> element")]
    MissingOperation,
    #[error("Missing <authentication> element")]
    MissingAuthentication,
    /// Reported for both a bad `<sessionid>` and an incomplete `<login>`
    #[error("Missing or invalid <sessionid> in <authentication>")]
    InvalidCredentials,
    #[error("Missing <content> element")]
    MissingContent,
    #[error("Missing <function> element")]
    MissingFunction,
    #[error("Missing <getapisession>, <readbyname>, or <create> element in <function>")]
    MissingFunctionVariant,
    #[error("Missing controlid attribute in <function>")]
    MissingFunctionControlId,
    #[error("Missing required fields in <readbyname>: object, keys, or fields")]
    IncompleteReadByName,
    #[error("<getapisession> should be a tag without fields")]
    GetApiSessionNotEmpty,
}
