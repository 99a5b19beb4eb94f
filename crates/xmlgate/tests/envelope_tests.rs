use xmlgate::envelope::{ControlField, Credentials, FunctionCall, ReadByName};
use xmlgate::{parse_tree, process, validate, EnvelopeError, FunctionKind, Response, Tree};

const SUCCESS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<response>
  <status>success</status>
  <message>Request processed successfully</message>
  <data>
    <CUSTOMER>
      <CUSTOMERID>CUST-12345</CUSTOMERID>
    </CUSTOMER>
  </data>
</response>";

struct Envelope {
    control: Vec<(&'static str, &'static str)>,
    authentication: String,
    function: String,
}

impl Envelope {
    fn new() -> Self {
        Self {
            control: vec![
                ("senderid", "acme"),
                ("password", "sender-pw"),
                ("controlid", "ctl"),
                ("uniqueid", "false"),
                ("dtdversion", "3.0"),
                ("includewhitespace", "false"),
            ],
            authentication: "<sessionid>sess</sessionid>".to_string(),
            function: "<function controlid=\"fn-1\"><getapisession/></function>".to_string(),
        }
    }

    fn without_control(mut self, name: &str) -> Self {
        self.control.retain(|(field, _)| *field != name);
        self
    }

    fn authentication(mut self, inner: &str) -> Self {
        self.authentication = inner.to_string();
        self
    }

    fn function(mut self, function: &str) -> Self {
        self.function = function.to_string();
        self
    }

    fn xml(&self) -> String {
        let control: String = self
            .control
            .iter()
            .map(|(name, value)| format!("<{name}>{value}</{name}>"))
            .collect();
        format!(
            "<request><control>{control}</control><operation>\
             <authentication>{}</authentication><content>{}</content>\
             </operation></request>",
            self.authentication, self.function
        )
    }

    fn tree(&self) -> Result<Tree, xmlgate::Error> {
        parse_tree(&self.xml())
    }
}

#[test]
fn missing_request_is_a_400() {
    for body in ["", "<response/>", "<request/>"] {
        let response = process(body);
        assert_eq!(response.status_code(), 400);
        assert_eq!(response, Response::error("Missing <request> element"));
    }
}

#[test]
fn each_missing_control_field_is_named() -> Result<(), xmlgate::Error> {
    for field in ControlField::ALL {
        let tree = Envelope::new().without_control(field.tag()).tree()?;
        assert_eq!(validate(&tree), Err(EnvelopeError::InvalidControlField(field)));
    }
    Ok(())
}

#[test]
fn only_the_first_missing_control_field_is_reported() -> Result<(), xmlgate::Error> {
    let tree = Envelope::new()
        .without_control("includewhitespace")
        .without_control("password")
        .without_control("uniqueid")
        .tree()?;
    let body = Envelope::new()
        .without_control("includewhitespace")
        .without_control("password")
        .xml();
    assert_eq!(
        process(&body),
        Response::error("Missing or invalid <password> in <control>")
    );
    assert_eq!(
        validate(&tree),
        Err(EnvelopeError::InvalidControlField(ControlField::Password))
    );
    Ok(())
}

#[test]
fn session_or_complete_login_authenticates() -> Result<(), xmlgate::Error> {
    let session = Envelope::new().tree()?;
    assert!(matches!(
        validate(&session).map(|r| r.credentials),
        Ok(Credentials::Session { .. })
    ));

    let login = Envelope::new()
        .authentication(
            "<login><userid>u</userid><companyid>c</companyid><password>p</password></login>",
        )
        .tree()?;
    assert!(matches!(
        validate(&login).map(|r| r.credentials),
        Ok(Credentials::Login { .. })
    ));
    Ok(())
}

#[test]
fn failed_credentials_always_mention_sessionid() -> Result<(), xmlgate::Error> {
    let attempts = [
        "<other/>",
        "<sessionid></sessionid>",
        "<login/>",
        "<login><userid>u</userid><companyid>c</companyid></login>",
        "<login><companyid>c</companyid><password>p</password></login>",
        "<login><userid>u</userid><companyid></companyid><password>p</password></login>",
    ];
    for attempt in attempts {
        let tree = Envelope::new().authentication(attempt).tree()?;
        let outcome = validate(&tree);
        assert_eq!(outcome, Err(EnvelopeError::InvalidCredentials), "{attempt}");
        assert_eq!(
            Response::from_outcome(&outcome),
            Response::error("Missing or invalid <sessionid> in <authentication>")
        );
    }
    Ok(())
}

#[test]
fn read_by_name_with_empty_keys_fails_even_with_get_api_session() {
    let body = Envelope::new()
        .function(
            "<function controlid=\"f\"><getapisession/>\
             <readbyname><object>CUSTOMER</object><keys/><fields>CUSTOMERID</fields></readbyname>\
             </function>",
        )
        .xml();
    assert_eq!(
        process(&body),
        Response::error("Missing required fields in <readbyname>: object, keys, or fields")
    );
}

#[test]
fn get_api_session_must_be_empty() {
    for inner in ["<sessionid>x</sessionid>", "token", "<a><b/></a>"] {
        let body = Envelope::new()
            .function(&format!(
                "<function controlid=\"f\"><getapisession>{inner}</getapisession></function>"
            ))
            .xml();
        assert_eq!(
            process(&body),
            Response::error("<getapisession> should be a tag without fields")
        );
    }
}

#[test]
fn valid_read_by_name_renders_the_customer_document() -> Result<(), xmlgate::Error> {
    let envelope = Envelope::new().function(
        "<function controlid=\"read-7\"><readbyname>\
         <object>CUSTOMER</object><keys>1</keys><fields>CUSTOMERID</fields>\
         </readbyname></function>",
    );

    let request = validate(&envelope.tree()?);
    assert_eq!(request.as_ref().map(|r| r.kind()), Ok(FunctionKind::ReadByName));
    assert_eq!(request.as_ref().map(|r| r.control_id.as_str()), Ok("read-7"));
    assert_eq!(
        request.map(|r| r.call),
        Ok(FunctionCall::ReadByName(ReadByName {
            object: "CUSTOMER".to_string(),
            keys: "1".to_string(),
            fields: "CUSTOMERID".to_string(),
            return_format: None,
            docparid: None,
        }))
    );

    let response = process(&envelope.xml());
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.to_xml(), SUCCESS_XML);
    Ok(())
}

#[test]
fn success_does_not_depend_on_request_content() {
    let first = process(&Envelope::new().xml());
    let second = process(
        &Envelope::new()
            .function("<function controlid=\"other\"><create><VENDOR/></create></function>")
            .xml(),
    );
    assert_eq!(first.to_xml(), SUCCESS_XML);
    assert_eq!(second.to_xml(), SUCCESS_XML);
}

#[test]
fn validating_twice_gives_the_same_outcome() -> Result<(), xmlgate::Error> {
    let trees = [
        Envelope::new().tree()?,
        Envelope::new().without_control("dtdversion").tree()?,
        Envelope::new().function("<function/>").tree()?,
    ];
    for tree in &trees {
        assert_eq!(validate(tree), validate(tree));
    }
    Ok(())
}
