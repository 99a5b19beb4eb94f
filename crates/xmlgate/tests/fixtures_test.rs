use std::fs;
use xmlgate::process;

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        let response = process(&content);
        if !response.is_success() {
            return Err(std::io::Error::other(format!(
                "valid fixture rejected: {path:?}: {response:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        let response = process(&content);
        if response.status_code() != 400 {
            return Err(std::io::Error::other(format!(
                "invalid fixture accepted: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixture_messages() -> Result<(), Box<dyn std::error::Error>> {
    let cases = [
        (
            "missing_uniqueid.xml",
            "Missing or invalid <uniqueid> in <control>",
        ),
        (
            "readbyname_without_fields.xml",
            "Missing required fields in <readbyname>: object, keys, or fields",
        ),
        (
            "function_without_controlid.xml",
            "Missing controlid attribute in <function>",
        ),
    ];
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for (file, expected) in cases {
        let content = fs::read_to_string(format!("{invalid_dir}/{file}"))?;
        assert_eq!(process(&content), xmlgate::Response::error(expected), "{file}");
    }
    Ok(())
}
