//! Response rendering and the request pipeline

use tracing::{debug, info};

use crate::envelope::{validate, Outcome};
use crate::error::Error;
use crate::tree::{parse_tree_bytes, Tree, TreeOptions};
use crate::xml::model::{Document, Element};
use crate::xml::parser::Config;
use crate::xml::writer::{self, WriteOptions};

/// Customer id returned for every accepted request
pub const PLACEHOLDER_CUSTOMER_ID: &str = "CUST-12345";

/// Message returned for every accepted request
pub const SUCCESS_MESSAGE: &str = "Request processed successfully";

/// Response document sent back to the client
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Error { message: String },
    Success { customer_id: String },
}

impl Response {
    /// Map a validation outcome to its response
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Ok(_) => Self::success(),
            Err(err) => Self::error(err.to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn success() -> Self {
        Self::Success {
            customer_id: PLACEHOLDER_CUSTOMER_ID.to_string(),
        }
    }

    /// Response for a body that is not well-formed XML
    pub fn invalid_xml(err: &Error) -> Self {
        Self::error(format!("Invalid XML: {err}"))
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// HTTP status code for the response
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Error { .. } => 400,
            Self::Success { .. } => 200,
        }
    }

    /// Build the response document
    pub fn to_document(&self) -> Document {
        let root = match self {
            Self::Error { message } => Element::new("response")
                .with_child(Element::new("status").with_text("error"))
                .with_child(Element::new("message").with_text(message.as_str())),
            Self::Success { customer_id } => Element::new("response")
                .with_child(Element::new("status").with_text("success"))
                .with_child(Element::new("message").with_text(SUCCESS_MESSAGE))
                .with_child(
                    Element::new("data").with_child(
                        Element::new("CUSTOMER")
                            .with_child(Element::new("CUSTOMERID").with_text(customer_id.as_str())),
                    ),
                ),
        };
        Document { root }
    }

    /// Pretty-printed XML with declaration
    pub fn to_xml(&self) -> String {
        self.to_xml_with(WriteOptions::default())
    }

    pub fn to_xml_with(&self, options: WriteOptions) -> String {
        writer::to_string(&self.to_document(), options)
    }
}

/// Limits and folding options for [`process_with`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    pub parser: Config,
    pub tree: TreeOptions,
}

/// Parse, validate and render one request body
pub fn process(body: &str) -> Response {
    process_with(body, &ProcessOptions::default())
}

/// [`process`] with explicit parser limits and tree options
pub fn process_with(body: &str, options: &ProcessOptions) -> Response {
    process_bytes(body.as_bytes(), options)
}

/// [`process_with`] for a raw request body
pub fn process_bytes(body: &[u8], options: &ProcessOptions) -> Response {
    let tree = if body.iter().all(u8::is_ascii_whitespace) {
        Tree::empty()
    } else {
        match parse_tree_bytes(body, options.parser, &options.tree) {
            Ok(tree) => tree,
            Err(err) => {
                debug!(error = %err, "request body is not well-formed xml");
                return Response::invalid_xml(&err);
            }
        }
    };
    respond(&tree)
}

/// Validate a tree and render the outcome
pub fn respond(tree: &Tree) -> Response {
    let outcome = validate(tree);
    match &outcome {
        Ok(request) => info!(
            function = %request.kind(),
            control_id = %request.control_id,
            "request accepted"
        ),
        Err(err) => info!(reason = %err, "request rejected"),
    }
    Response::from_outcome(&outcome)
}
