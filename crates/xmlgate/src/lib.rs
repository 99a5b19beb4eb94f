//! xmlgate - validating endpoint core for intacct-style XML API requests
//!
//! A request body goes through three stages: XML text is parsed and folded
//! into an occurrence [`Tree`], the tree is checked by
//! [`envelope::validate`], and the outcome is rendered as a [`Response`].
//!
//! # Quick Start
//!
//! ```
//! let body = r#"<request>
//!   <control>
//!     <senderid>acme</senderid><password>pw</password><controlid>c1</controlid>
//!     <uniqueid>false</uniqueid><dtdversion>3.0</dtdversion>
//!     <includewhitespace>false</includewhitespace>
//!   </control>
//!   <operation>
//!     <authentication><sessionid>s1</sessionid></authentication>
//!     <content><function controlid="f1"><getapisession/></function></content>
//!   </operation>
//! </request>"#;
//!
//! let response = xmlgate::process(body);
//! assert_eq!(response.status_code(), 200);
//! assert!(response.to_xml().contains("<CUSTOMERID>CUST-12345</CUSTOMERID>"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod lexer;

pub mod xml;
pub use xml::{
    Config as XmlConfig, Document as XmlDocument, Element as XmlElement, Parser as XmlParser,
};

pub mod tree;
pub use tree::{parse_tree, parse_tree_bytes, Node, Occurrence, Tree, TreeOptions};

pub mod envelope;
pub use envelope::{validate, EnvelopeError, FunctionKind, Outcome, ValidatedRequest};

pub mod response;
pub use response::{process, process_bytes, process_with, respond, ProcessOptions, Response};
