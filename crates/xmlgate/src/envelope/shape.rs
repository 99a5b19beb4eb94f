//! One-pass decoding of a [`Tree`] into optional envelope levels
//!
//! Decoding never fails: anything missing or unusable is `None`. The ordered
//! checks in [`EnvelopeShape::check`] then decide which violation to report.

use tracing::{debug, warn};

use crate::envelope::error::{ControlField, EnvelopeError};
use crate::envelope::request::{
    Control, Credentials, FunctionCall, ReadByName, ValidatedRequest,
};
use crate::tree::{Occurrence, Tree};

#[derive(Debug)]
pub(crate) struct EnvelopeShape<'a> {
    request: Option<RequestShape<'a>>,
}

#[derive(Debug)]
struct RequestShape<'a> {
    control: Option<ControlShape<'a>>,
    operation: Option<OperationShape<'a>>,
}

#[derive(Debug)]
struct ControlShape<'a> {
    /// Indexed like [`ControlField::ALL`]
    values: [Option<&'a str>; 6],
}

#[derive(Debug)]
struct OperationShape<'a> {
    authentication: Option<AuthenticationShape<'a>>,
    content: Option<ContentShape<'a>>,
}

#[derive(Debug)]
struct AuthenticationShape<'a> {
    session_id: Option<&'a str>,
    login: Option<LoginShape<'a>>,
}

#[derive(Debug)]
struct LoginShape<'a> {
    user_id: Option<&'a str>,
    company_id: Option<&'a str>,
    password: Option<&'a str>,
}

#[derive(Debug)]
struct ContentShape<'a> {
    function: Option<FunctionShape<'a>>,
}

#[derive(Debug)]
struct FunctionShape<'a> {
    raw: &'a Occurrence,
    control_id: Option<&'a str>,
    get_api_session: Option<&'a Occurrence>,
    read_by_name: Option<ReadByNameShape<'a>>,
    create: Option<&'a Occurrence>,
}

#[derive(Debug)]
struct ReadByNameShape<'a> {
    object: Option<&'a str>,
    keys: Option<&'a str>,
    fields: Option<&'a str>,
    return_format: Option<&'a str>,
    docparid: Option<&'a str>,
}

/// First occurrence of a child that carries content
fn section<'a>(parent: &'a Occurrence, name: &str) -> Option<&'a Occurrence> {
    parent.first(name).filter(|child| child.is_filled())
}

/// Text of a child that carries content; a nested node without text counts as present
fn value<'a>(parent: &'a Occurrence, name: &str) -> Option<&'a str> {
    section(parent, name).map(|child| child.as_text().unwrap_or_default())
}

impl<'a> EnvelopeShape<'a> {
    pub(crate) fn decode(tree: &'a Tree) -> Self {
        let request = tree
            .get("request")
            .filter(|request| request.is_filled())
            .map(RequestShape::decode);
        Self { request }
    }

    /// Run the ordered checks; the first failure wins
    pub(crate) fn check(self) -> Result<ValidatedRequest, EnvelopeError> {
        let request = self.request.ok_or(EnvelopeError::MissingRequest)?;
        let control = request.control.ok_or(EnvelopeError::MissingControl)?.check()?;

        let operation = request.operation.ok_or(EnvelopeError::MissingOperation)?;
        let credentials = operation
            .authentication
            .ok_or(EnvelopeError::MissingAuthentication)?
            .check()?;

        let function = operation
            .content
            .ok_or(EnvelopeError::MissingContent)?
            .function
            .ok_or(EnvelopeError::MissingFunction)?;
        debug!(function = ?function.raw, "parsed function element");

        let (control_id, call) = function.check()?;
        Ok(ValidatedRequest {
            control,
            credentials,
            control_id,
            call,
        })
    }
}

impl<'a> RequestShape<'a> {
    fn decode(request: &'a Occurrence) -> Self {
        Self {
            control: section(request, "control").map(ControlShape::decode),
            operation: section(request, "operation").map(OperationShape::decode),
        }
    }
}

impl<'a> ControlShape<'a> {
    fn decode(control: &'a Occurrence) -> Self {
        Self {
            values: ControlField::ALL.map(|field| value(control, field.tag())),
        }
    }

    fn check(self) -> Result<Control, EnvelopeError> {
        let mut values = ControlField::ALL.into_iter().zip(self.values);
        let mut next = || match values.next() {
            Some((_, Some(value))) => Ok(value.to_string()),
            Some((field, None)) => Err(EnvelopeError::InvalidControlField(field)),
            None => Err(EnvelopeError::MissingControl),
        };

        Ok(Control {
            sender_id: next()?,
            password: next()?,
            control_id: next()?,
            unique_id: next()?,
            dtd_version: next()?,
            include_whitespace: next()?,
        })
    }
}

impl<'a> OperationShape<'a> {
    fn decode(operation: &'a Occurrence) -> Self {
        Self {
            authentication: section(operation, "authentication").map(AuthenticationShape::decode),
            content: section(operation, "content").map(ContentShape::decode),
        }
    }
}

impl<'a> AuthenticationShape<'a> {
    fn decode(authentication: &'a Occurrence) -> Self {
        Self {
            session_id: value(authentication, "sessionid"),
            login: section(authentication, "login").map(|login| LoginShape {
                user_id: value(login, "userid"),
                company_id: value(login, "companyid"),
                password: value(login, "password"),
            }),
        }
    }

    fn check(self) -> Result<Credentials, EnvelopeError> {
        if let Some(session_id) = self.session_id {
            return Ok(Credentials::Session {
                session_id: session_id.to_string(),
            });
        }

        match self.login {
            Some(LoginShape {
                user_id: Some(user_id),
                company_id: Some(company_id),
                password: Some(password),
            }) => Ok(Credentials::Login {
                user_id: user_id.to_string(),
                company_id: company_id.to_string(),
                password: password.to_string(),
            }),
            _ => Err(EnvelopeError::InvalidCredentials),
        }
    }
}

impl<'a> ContentShape<'a> {
    fn decode(content: &'a Occurrence) -> Self {
        Self {
            function: section(content, "function").map(FunctionShape::decode),
        }
    }
}

impl<'a> FunctionShape<'a> {
    fn decode(function: &'a Occurrence) -> Self {
        let node = function.as_node();
        Self {
            raw: function,
            control_id: node
                .and_then(|node| node.attribute("controlid"))
                .filter(|id| !id.is_empty()),
            get_api_session: function.first("getapisession"),
            read_by_name: section(function, "readbyname").map(ReadByNameShape::decode),
            create: section(function, "create"),
        }
    }

    fn check(self) -> Result<(String, FunctionCall), EnvelopeError> {
        if self.get_api_session.is_none() && self.read_by_name.is_none() && self.create.is_none() {
            warn!(function = ?self.raw, "function element has no recognized variant");
            return Err(EnvelopeError::MissingFunctionVariant);
        }

        let control_id = self
            .control_id
            .ok_or(EnvelopeError::MissingFunctionControlId)?
            .to_string();

        let read_by_name = self.read_by_name.map(ReadByNameShape::check).transpose()?;

        if self.get_api_session.is_some_and(Occurrence::is_filled) {
            return Err(EnvelopeError::GetApiSessionNotEmpty);
        }

        let call = match (self.get_api_session, read_by_name, self.create) {
            (Some(_), _, _) => FunctionCall::GetApiSession,
            (None, Some(query), _) => FunctionCall::ReadByName(query),
            (None, None, Some(create)) => FunctionCall::Create(create.clone()),
            (None, None, None) => return Err(EnvelopeError::MissingFunctionVariant),
        };

        Ok((control_id, call))
    }
}

impl<'a> ReadByNameShape<'a> {
    fn decode(query: &'a Occurrence) -> Self {
        Self {
            object: value(query, "object"),
            keys: value(query, "keys"),
            fields: value(query, "fields"),
            return_format: value(query, "returnformat"),
            docparid: value(query, "docparid"),
        }
    }

    fn check(self) -> Result<ReadByName, EnvelopeError> {
        match (self.object, self.keys, self.fields) {
            (Some(object), Some(keys), Some(fields)) => Ok(ReadByName {
                object: object.to_string(),
                keys: keys.to_string(),
                fields: fields.to_string(),
                return_format: self.return_format.map(str::to_string),
                docparid: self.docparid.map(str::to_string),
            }),
            _ => Err(EnvelopeError::IncompleteReadByName),
        }
    }
}
