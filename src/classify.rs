// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::store::schema::DataTypeCode;

/// §4.6 step 7 / §6 content-type dispatch.
pub enum Classification {
    Html,
    Image,
    Binary(DataTypeCode),
    /// Recognized as "other binary" but nothing in CONTENT_TYPES matched a
    /// known document type; stored with no payload.
    UnrecognizedBinary,
}

/// Dispatches on the raw `Content-Type` header value (the `mime` crate
/// strips any `; charset=...` parameter for us), per §6's recognized types
/// table.
pub fn classify(content_type: &str) -> Classification {
    let Ok(parsed) = content_type.parse::<mime::Mime>() else {
        return Classification::UnrecognizedBinary;
    };
    if parsed.type_() == mime::TEXT && parsed.subtype() == mime::HTML {
        return Classification::Html;
    }
    if parsed.type_() == mime::IMAGE {
        return Classification::Image;
    }
    match (parsed.type_().as_str(), parsed.subtype().as_str()) {
        ("application", "pdf") => Classification::Binary(DataTypeCode::Pdf),
        ("application", "msword") => Classification::Binary(DataTypeCode::Doc),
        ("application", "vnd.openxmlformats-officedocument.wordprocessingml.document") => {
            Classification::Binary(DataTypeCode::Docx)
        }
        ("application", "vnd.ms-powerpoint") => Classification::Binary(DataTypeCode::Ppt),
        ("application", "vnd.openxmlformats-officedocument.presentationml.presentation") => {
            Classification::Binary(DataTypeCode::Pptx)
        }
        _ => Classification::UnrecognizedBinary,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifies_html_ignoring_charset_param() {
        assert!(matches!(classify("text/html; charset=utf-8"), Classification::Html));
    }

    #[test]
    fn classifies_images() {
        assert!(matches!(classify("image/png"), Classification::Image));
    }

    #[test]
    fn classifies_known_documents() {
        assert!(matches!(
            classify("application/pdf"),
            Classification::Binary(DataTypeCode::Pdf)
        ));
        assert!(matches!(
            classify("application/vnd.openxmlformats-officedocument.presentationml.presentation"),
            Classification::Binary(DataTypeCode::Pptx)
        ));
    }

    #[test]
    fn unrecognized_type_is_binary_without_payload() {
        assert!(matches!(
            classify("application/octet-stream"),
            Classification::UnrecognizedBinary
        ));
    }
}
