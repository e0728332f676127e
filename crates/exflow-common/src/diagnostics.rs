//! Diagnostic types and message lookup for unhandled-exception reports.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Error,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNHANDLED_EXCEPTION: u32 = 1001;
    pub const UNHANDLED_EXCEPTIONS: u32 = 1002;
    pub const UNHANDLED_CLOSER_EXCEPTION: u32 = 1003;
    pub const THROWN_HERE: u32 = 1100;
}

pub mod diagnostic_messages {
    pub const UNHANDLED_EXCEPTION: &str = "Unhandled exception: {0}";
    pub const UNHANDLED_EXCEPTIONS: &str = "Unhandled exceptions: {0}";
    pub const UNHANDLED_CLOSER_EXCEPTION: &str =
        "Unhandled exception from auto-closeable resource: {0}";
    pub const THROWN_HERE: &str = "'{0}' is thrown here.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNHANDLED_EXCEPTION,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::UNHANDLED_EXCEPTION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNHANDLED_EXCEPTIONS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::UNHANDLED_EXCEPTIONS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNHANDLED_CLOSER_EXCEPTION,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::UNHANDLED_CLOSER_EXCEPTION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::THROWN_HERE,
        category: DiagnosticCategory::Message,
        message: diagnostic_messages::THROWN_HERE,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

/// An analysis diagnostic with optional related locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: diagnostic_codes::THROWN_HERE,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
