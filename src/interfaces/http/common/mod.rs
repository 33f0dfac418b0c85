//! Building blocks shared by all HTTP modules

pub mod dto;
pub mod error;
pub mod query;
pub mod response;
pub mod validated_json;
pub mod verbs;

pub use dto::{parse_all, CountResponse, EntityFields, GeoLocationDto};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use query::ListQuery;
pub use response::{
    collection_json, count_json, created_json, etag_of, ok_json, render_collection, render_entity,
    wants_geojson, GEOJSON, TOTAL_COUNT_HEADER,
};
pub use validated_json::{parse_body, ValidatedJson};
pub use verbs::{expect_count, normalize_method, RequestVerb, Scope, COUNT};
