//! Which stored formats the editor can present as plain text.

/// Mimetypes the backend converts to and from editable text
pub const TEXT_EDITABLE_MIMETYPES: &[&str] = &[
    "text/plain",
    "text/html",
    "text/css",
    "text/javascript",
    "application/json",
    "application/xml",
    "text/xml",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub fn is_text_editable(mimetype: &str) -> bool {
    TEXT_EDITABLE_MIMETYPES.contains(&mimetype)
}
