//! # URL Composer
//!
//! Builds `scheme://host/seg1/seg2`. GET requests carry their body fields in
//! the query string instead of the message body.

use std::collections::BTreeMap;

use serde_json::Value;
use url::form_urlencoded;

use crate::draft::Draft;
use crate::value::stringify;

/// Target URL for the draft
pub fn compose(draft: &Draft) -> String {
    let url = format!("{}://{}/{}", draft.scheme, draft.host, draft.path.join("/"));
    if draft.method == "GET" && !draft.body.is_empty() {
        format!("{url}?{}", encode_fields(&draft.body))
    } else {
        url
    }
}

/// `application/x-www-form-urlencoded` encoding of body fields, keys sorted.
pub fn encode_fields(fields: &BTreeMap<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key, &stringify(value));
    }
    serializer.finish()
}
