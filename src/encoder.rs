//! # Body Encoder
//!
//! Picks the body encoding for a draft and produces the bytes together with
//! the matching `Content-Type`.
//!
//! Selection order:
//! 1. any attachment forces `multipart/form-data`
//! 2. no fields, or a GET request, means no body
//! 3. `--format form` gives `application/x-www-form-urlencoded`
//! 4. everything else is `application/json`

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::draft::{Draft, Format};
use crate::error::{ReqError, Result};
use crate::request_url::encode_fields;
use crate::value::stringify;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Opens attachment files by path
pub trait AttachmentSource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Reads attachments from the filesystem, expanding a leading `~`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAttachments;

impl AttachmentSource for FsAttachments {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let expanded = shellexpand::tilde(path);
        Ok(Box::new(File::open(&*expanded)?))
    }
}

/// Body encoding chosen for a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    None,
    Json,
    Form,
    Multipart,
}

impl Encoding {
    pub fn select(draft: &Draft) -> Self {
        if !draft.files.is_empty() {
            Encoding::Multipart
        } else if draft.body.is_empty() || draft.method == "GET" {
            Encoding::None
        } else if draft.format == Format::Form {
            Encoding::Form
        } else {
            Encoding::Json
        }
    }
}

/// An encoded request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Encode the draft's body, or `None` when the request carries no body.
pub fn encode(draft: &Draft, source: &dyn AttachmentSource) -> Result<Option<EncodedBody>> {
    let encoding = Encoding::select(draft);
    tracing::debug!(?encoding, "encoding request body");

    let body = match encoding {
        Encoding::None => return Ok(None),
        Encoding::Json => {
            let object: Map<String, Value> = draft
                .body
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            EncodedBody {
                content_type: JSON_CONTENT_TYPE.to_string(),
                bytes: Bytes::from(Value::Object(object).to_string()),
            }
        }
        Encoding::Form => EncodedBody {
            content_type: FORM_CONTENT_TYPE.to_string(),
            bytes: Bytes::from(encode_fields(&draft.body)),
        },
        Encoding::Multipart => encode_multipart(draft, source)?,
    };
    Ok(Some(body))
}

fn encode_multipart(draft: &Draft, source: &dyn AttachmentSource) -> Result<EncodedBody> {
    let mut writer = MultipartWriter::new();

    for (field, path) in &draft.files {
        let attachment_err = |err: io::Error| ReqError::Attachment {
            path: path.clone(),
            source: err,
        };
        let mut reader = source.open(path).map_err(attachment_err)?;
        writer
            .write_file(field, base_name(path), &mut reader)
            .map_err(attachment_err)?;
    }
    for (field, value) in &draft.body {
        writer.write_field(field, &stringify(value));
    }

    let (content_type, bytes) = writer.finish();
    Ok(EncodedBody {
        content_type,
        bytes: Bytes::from(bytes),
    })
}

fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// Buffers a `multipart/form-data` body
pub(crate) struct MultipartWriter {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartWriter {
    fn new() -> Self {
        Self::with_boundary(uuid::Uuid::new_v4().simple().to_string())
    }

    fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
        }
    }

    /// Append a file part, copying `reader` to the end
    fn write_file(&mut self, field: &str, filename: &str, reader: &mut dyn Read) -> io::Result<()> {
        let header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            self.boundary,
            escape_quotes(field),
            escape_quotes(filename)
        );
        self.buf.extend_from_slice(header.as_bytes());
        io::copy(reader, &mut self.buf)?;
        self.buf.extend_from_slice(b"\r\n");
        Ok(())
    }

    /// Append a plain form field
    fn write_field(&mut self, field: &str, value: &str) {
        let part = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            self.boundary,
            escape_quotes(field),
            value
        );
        self.buf.extend_from_slice(part.as_bytes());
    }

    /// Close the body; returns the Content-Type (with boundary) and the bytes
    fn finish(mut self) -> (String, Vec<u8>) {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("{MULTIPART_CONTENT_TYPE}; boundary={}", self.boundary),
            self.buf,
        )
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
