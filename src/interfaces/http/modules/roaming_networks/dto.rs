//! Roaming network DTOs

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Body of `CREATE /RNs/{roamingNetworkId}`; may be empty
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CreateRoamingNetworkRequest {
    /// Language code → text
    #[schema(value_type = Option<Object>)]
    pub name: Option<Value>,
    /// Language code → text
    #[schema(value_type = Option<Object>)]
    pub description: Option<Value>,
}
