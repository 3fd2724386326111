mod builder;
mod canonical;
mod query;

pub use builder::HttpUrlBuilder;
pub use canonical::{
    canonicalize, is_percent_encoded, percent_decode, Canonicalize, EncodeSet,
    FRAGMENT_ENCODE_SET, PATH_SEGMENT_ENCODE_SET, QUERY_COMPONENT_ENCODE_SET,
    QUERY_COMPONENT_REENCODE_SET, QUERY_ENCODE_SET,
};
pub use query::{names_and_values_to_query_string, query_string_to_names_and_values, QueryParameters};
