//! Note Capture Common Library
//!
//! バックエンドREST APIのワイヤ型とData URLユーティリティ

pub mod types;
pub mod error;
pub mod data_url;
pub mod parser;

pub use types::{
    CreateNoteResponse, GenerationStatus, NoteSummary, NotesResponse, ThumbnailEntry,
    ThumbnailsResponse, UploadResponse, PROCESSING_STARTED,
};
pub use error::{Error, Result};
pub use data_url::{
    decode_data_url, encode_image, extract_base64_from_data_url, to_jpeg_data_url,
};
pub use parser::{
    body_preview, parse_create_note_response, parse_generation_status, parse_response,
    parse_thumbnails_response, parse_upload_response,
};
