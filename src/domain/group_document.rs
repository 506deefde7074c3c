use crate::domain::member_set::MemberSet;
use crate::error::UpdateError;
use serde::Serialize;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Serialize)]
#[serde(rename = "computer_group")]
struct ComputerGroupXml<'a> {
    id: &'a str,
    name: &'a str,
    computer_additions: ComputerAdditionsXml<'a>,
}

#[derive(Debug, Serialize)]
struct ComputerAdditionsXml<'a> {
    #[serde(rename = "computer")]
    computers: Vec<ComputerXml<'a>>,
}

#[derive(Debug, Serialize)]
struct ComputerXml<'a> {
    name: &'a str,
}

/// Body of the static group update call.
#[derive(Debug, Clone)]
pub struct GroupUpdateDocument {
    pub id: String,
    pub name: String,
    pub members: MemberSet,
}

impl GroupUpdateDocument {
    pub fn new(id: impl Into<String>, name: impl Into<String>, members: MemberSet) -> Self {
        GroupUpdateDocument {
            id: id.into(),
            name: name.into(),
            members,
        }
    }

    /// Serializes through quick-xml so markup in names is escaped.
    /// Characters XML 1.0 cannot represent at all are rejected.
    pub fn to_xml(&self) -> Result<String, UpdateError> {
        check_xml_chars("group id", &self.id)?;
        check_xml_chars("group name", &self.name)?;
        for member in self.members.iter() {
            check_xml_chars("device name", member)?;
        }

        let document = ComputerGroupXml {
            id: &self.id,
            name: &self.name,
            computer_additions: ComputerAdditionsXml {
                computers: self.members.iter().map(|name| ComputerXml { name }).collect(),
            },
        };

        let body = quick_xml::se::to_string(&document)
            .map_err(|e| UpdateError::Payload(e.to_string()))?;
        Ok(format!("{}{}", XML_DECLARATION, body))
    }
}

// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn check_xml_chars(field: &str, value: &str) -> Result<(), UpdateError> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(UpdateError::Payload(format!(
            "{} {:?} contains U+{:04X}, which XML cannot carry",
            field, value, c as u32
        ))),
        None => Ok(()),
    }
}
