//! Cliente da API REST do GitHub

pub mod api;
pub mod pagination;
pub mod response;
pub mod transport;

pub use api::{ApiClient, ApiResult, RawResponse, RequestOptions};
pub use pagination::PagedResult;
pub use response::{is_json_response, is_valid_response, next_page_link};
pub use transport::{Transport, USER_AGENT};
